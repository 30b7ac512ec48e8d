//! Layer sources for a [`Chain`](super::Chain).
//!
//! Every source is converted into one of three shapes before lookup:
//! - a plain ordered mapping (the only mutable shape),
//! - a set of keys that all map to one shared value,
//! - a snapshot of a record's named fields.

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::fmt;

use super::ChainError;

/// A value exposing a fixed set of named fields.
///
/// Implement this for plain structs that should act as a read-only layer.
pub trait Record<V> {
    /// Field names in declaration order.
    fn field_names(&self) -> Vec<&str>;

    /// Value of `name`, or `None` if the record has no such field.
    fn field(&self, name: &str) -> Option<V>;
}

/// Shape of a layer, reported in errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    Map,
    Keys,
    Record,
}

impl LayerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayerKind::Map => "map",
            LayerKind::Keys => "keys",
            LayerKind::Record => "record",
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field snapshot of a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordLayer<V> {
    type_name: String,
    fields: IndexMap<String, V>,
}

impl<V> RecordLayer<V> {
    /// Name of the type the fields were taken from.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn fields(&self) -> &IndexMap<String, V> {
        &self.fields
    }
}

/// One ordered source in a chain.
#[derive(Debug, Clone, PartialEq)]
pub enum Layer<V> {
    /// Plain key-value mapping.
    Map(IndexMap<String, V>),
    /// Keys that all resolve to `value`.
    Keys { keys: IndexSet<String>, value: V },
    /// Named fields of a record.
    Record(RecordLayer<V>),
}

impl<V> Layer<V> {
    /// Build a mapping layer from key-value pairs.
    pub fn map<K, I>(pairs: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Layer::Map(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// An empty mapping layer, useful as a writable top layer.
    pub fn empty() -> Self {
        Layer::Map(IndexMap::new())
    }

    /// Build a key-set layer where every key resolves to `value`.
    pub fn keys<K, I>(keys: I, value: V) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = K>,
    {
        Layer::Keys { keys: keys.into_iter().map(Into::into).collect(), value }
    }

    /// Snapshot the named fields of `record`.
    pub fn record<R: Record<V>>(record: &R) -> Self {
        let fields = record
            .field_names()
            .into_iter()
            .filter_map(|name| record.field(name).map(|value| (name.to_string(), value)))
            .collect();
        Layer::Record(RecordLayer { type_name: short_type_name::<R>(), fields })
    }

    pub fn kind(&self) -> LayerKind {
        match self {
            Layer::Map(_) => LayerKind::Map,
            Layer::Keys { .. } => LayerKind::Keys,
            Layer::Record(_) => LayerKind::Record,
        }
    }

    /// Only mapping layers accept writes.
    pub fn is_mutable(&self) -> bool {
        matches!(self, Layer::Map(_))
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        match self {
            Layer::Map(map) => map.get(key),
            Layer::Keys { keys, value } => keys.contains(key).then_some(value),
            Layer::Record(record) => record.fields.get(key),
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        match self {
            Layer::Map(map) => map.contains_key(key),
            Layer::Keys { keys, .. } => keys.contains(key),
            Layer::Record(record) => record.fields.contains_key(key),
        }
    }

    /// Keys in layer order.
    pub fn keys_iter(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        match self {
            Layer::Map(map) => Box::new(map.keys().map(String::as_str)),
            Layer::Keys { keys, .. } => Box::new(keys.iter().map(String::as_str)),
            Layer::Record(record) => Box::new(record.fields.keys().map(String::as_str)),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Layer::Map(map) => map.len(),
            Layer::Keys { keys, .. } => keys.len(),
            Layer::Record(record) => record.fields.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert into a mapping layer, returning the replaced value.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Result<Option<V>, ChainError> {
        match self {
            Layer::Map(map) => Ok(map.insert(key.into(), value)),
            other => Err(ChainError::ImmutableLayer(other.kind())),
        }
    }

    /// Remove from a mapping layer. Remaining keys keep their order.
    pub fn remove(&mut self, key: &str) -> Result<V, ChainError> {
        match self {
            Layer::Map(map) => {
                map.shift_remove(key).ok_or_else(|| ChainError::KeyNotFound(key.to_string()))
            }
            other => Err(ChainError::ImmutableLayer(other.kind())),
        }
    }
}

impl Layer<JsonValue> {
    /// Adapt any serializable value with named fields into a record layer.
    ///
    /// Succeeds only when `value` serializes to a JSON object: structs with
    /// named fields and maps qualify, tuples, scalars and sequences do not.
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self, ChainError> {
        let type_name = short_type_name::<T>();
        match serde_json::to_value(value) {
            Ok(JsonValue::Object(object)) => Ok(Layer::Record(RecordLayer {
                type_name,
                fields: object.into_iter().collect(),
            })),
            Ok(_) => Err(ChainError::NotARecord { type_name }),
            Err(err) => Err(ChainError::Serialize(err.to_string())),
        }
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for Layer<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Layer::map(iter)
    }
}

impl<V> From<IndexMap<String, V>> for Layer<V> {
    fn from(map: IndexMap<String, V>) -> Self {
        Layer::Map(map)
    }
}

/// Whether `value` can be viewed as a record with named fields.
pub fn is_record_like<T: Serialize>(value: &T) -> bool {
    matches!(serde_json::to_value(value), Ok(JsonValue::Object(_)))
}

fn short_type_name<T: ?Sized>() -> String {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct GroupUser {
        group: u32,
        user: u32,
    }

    impl Record<u32> for GroupUser {
        fn field_names(&self) -> Vec<&str> {
            vec!["group", "user"]
        }

        fn field(&self, name: &str) -> Option<u32> {
            match name {
                "group" => Some(self.group),
                "user" => Some(self.user),
                _ => None,
            }
        }
    }

    #[derive(Serialize)]
    struct FileConfig {
        file: String,
        config: bool,
    }

    #[derive(Serialize)]
    struct Pair(u8, u8);

    #[test]
    fn test_record_layer_keeps_field_order() {
        let layer = Layer::record(&GroupUser { group: 20, user: 501 });
        assert_eq!(layer.kind(), LayerKind::Record);
        assert_eq!(layer.keys_iter().collect::<Vec<_>>(), vec!["group", "user"]);
        assert_eq!(layer.get("user"), Some(&501));
        match &layer {
            Layer::Record(record) => assert_eq!(record.type_name(), "GroupUser"),
            other => panic!("unexpected layer {other:?}"),
        }
    }

    #[test]
    fn test_keys_layer_maps_every_key_to_value() {
        let layer = Layer::keys(["a", "b"], 0);
        assert_eq!(layer.get("a"), Some(&0));
        assert_eq!(layer.get("b"), Some(&0));
        assert!(layer.get("c").is_none());
        assert_eq!(layer.len(), 2);
    }

    #[test]
    fn test_only_map_layers_are_mutable() {
        let mut keys = Layer::keys(["a"], 1);
        assert_eq!(keys.insert("b", 2), Err(ChainError::ImmutableLayer(LayerKind::Keys)));
        assert_eq!(keys.remove("a"), Err(ChainError::ImmutableLayer(LayerKind::Keys)));

        let mut map: Layer<i32> = Layer::empty();
        assert_eq!(map.insert("a", 1), Ok(None));
        assert_eq!(map.insert("a", 2), Ok(Some(1)));
        assert_eq!(map.remove("a"), Ok(2));
        assert_eq!(map.remove("a"), Err(ChainError::KeyNotFound("a".to_string())));
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut layer = Layer::map([("a", 1), ("b", 2), ("c", 3)]);
        layer.remove("a").unwrap();
        assert_eq!(layer.keys_iter().collect::<Vec<_>>(), vec!["b", "c"]);
    }

    #[test]
    fn test_from_serialize_struct() {
        let layer =
            Layer::from_serialize(&FileConfig { file: "a.toml".into(), config: true }).unwrap();
        assert_eq!(layer.get("file"), Some(&json!("a.toml")));
        assert_eq!(layer.get("config"), Some(&json!(true)));
        assert!(!layer.is_mutable());
    }

    #[test]
    fn test_from_serialize_rejects_tuples_and_scalars() {
        assert!(matches!(
            Layer::from_serialize(&Pair(1, 2)),
            Err(ChainError::NotARecord { type_name }) if type_name == "Pair"
        ));
        assert!(Layer::from_serialize(&3).is_err());
        assert!(!is_record_like(&"text"));
        assert!(is_record_like(&FileConfig { file: String::new(), config: false }));
    }
}
