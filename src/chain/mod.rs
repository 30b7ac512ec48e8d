//! Layered key-value lookup
//!
//! A [`Chain`] presents one mapping view over an ordered list of [`Layer`]s.
//! Lookups always scan from the first (topmost) layer to the last; how the
//! values found along the way are reconciled is decided by the [`MergeMode`].
//! Writes and deletes only ever touch the first layer.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

pub mod layer;
pub mod loader;

pub use layer::{is_record_like, Layer, LayerKind, Record, RecordLayer};
pub use loader::load_layer;

/// How values for the same key across layers are reconciled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MergeMode {
    /// Every value found, first layer to last.
    All,
    /// Value from the first layer containing the key.
    First,
    /// The single distinct value across all layers containing the key.
    #[default]
    Unique,
}

impl MergeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MergeMode::All => "all",
            MergeMode::First => "first",
            MergeMode::Unique => "unique",
        }
    }
}

impl std::fmt::Display for MergeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainError {
    #[error("conflicting values for key '{key}': {}", .values.join(", "))]
    Conflict { key: String, values: Vec<String> },

    #[error("key '{0}' not found in the first layer")]
    KeyNotFound(String),

    #[error("first layer is a {0} layer and cannot be modified")]
    ImmutableLayer(LayerKind),

    #[error("chain has no layers")]
    NoLayers,

    #[error("{type_name} does not serialize to a record with named fields")]
    NotARecord { type_name: String },

    #[error("failed to serialize record: {0}")]
    Serialize(String),
}

/// Result of [`Chain::get`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Lookup<V> {
    /// Values collected in `All` mode, first layer to last.
    Many(Vec<V>),
    /// A resolved value or the configured default.
    One(V),
    /// No value and no default.
    Missing,
}

impl<V> Lookup<V> {
    /// The single value, if the lookup produced exactly one.
    pub fn single(&self) -> Option<&V> {
        match self {
            Lookup::One(value) => Some(value),
            Lookup::Many(values) if values.len() == 1 => values.first(),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        match self {
            Lookup::Missing => true,
            Lookup::Many(values) => values.is_empty(),
            Lookup::One(_) => false,
        }
    }

    pub fn into_vec(self) -> Vec<V> {
        match self {
            Lookup::Many(values) => values,
            Lookup::One(value) => vec![value],
            Lookup::Missing => Vec::new(),
        }
    }
}

/// Ordered layers merged into one lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct Chain<V> {
    layers: Vec<Layer<V>>,
    mode: MergeMode,
    default: Option<V>,
    default_when_empty: bool,
}

impl<V> Default for Chain<V> {
    fn default() -> Self {
        Self { layers: Vec::new(), mode: MergeMode::default(), default: None, default_when_empty: false }
    }
}

impl<V> Chain<V> {
    pub fn new<I>(layers: I) -> Self
    where
        I: IntoIterator<Item = Layer<V>>,
    {
        Self { layers: layers.into_iter().collect(), ..Self::default() }
    }

    pub fn with_mode(mut self, mode: MergeMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_default(mut self, default: V) -> Self {
        self.default = Some(default);
        self
    }

    /// In `All` mode, answer a lookup that found nothing with `[default]`
    /// instead of an empty sequence.
    pub fn default_when_empty(mut self, enabled: bool) -> Self {
        self.default_when_empty = enabled;
        self
    }

    pub fn mode(&self) -> MergeMode {
        self.mode
    }

    pub fn default_value(&self) -> Option<&V> {
        self.default.as_ref()
    }

    pub fn layers(&self) -> &[Layer<V>] {
        &self.layers
    }

    /// Append `layer` below every existing layer.
    pub fn push_layer(&mut self, layer: Layer<V>) {
        self.layers.push(layer);
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.layers.iter().any(|layer| layer.contains_key(key))
    }

    /// Union of keys over all layers, in first-seen order.
    pub fn keys(&self) -> Vec<&str> {
        let mut seen = IndexSet::new();
        for layer in &self.layers {
            seen.extend(layer.keys_iter());
        }
        seen.into_iter().collect()
    }

    pub fn len(&self) -> usize {
        self.keys().len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.iter().all(Layer::is_empty)
    }

    fn found<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a V> + 'a {
        self.layers.iter().filter_map(move |layer| layer.get(key))
    }

    /// Write `value` into the first layer.
    pub fn set(&mut self, key: impl Into<String>, value: V) -> Result<Option<V>, ChainError> {
        let top = self.layers.first_mut().ok_or(ChainError::NoLayers)?;
        let key = key.into();
        tracing::debug!(key = %key, "setting key in first layer");
        top.insert(key, value)
    }

    /// Remove `key` from the first layer. Deeper layers are never consulted.
    pub fn delete(&mut self, key: &str) -> Result<V, ChainError> {
        let top = self.layers.first_mut().ok_or(ChainError::NoLayers)?;
        tracing::debug!(key, "deleting key from first layer");
        top.remove(key)
    }
}

impl<V: Clone> Chain<V> {
    /// A new chain with `layer` on top of this chain's layers.
    pub fn new_child(&self, layer: Layer<V>) -> Self {
        let mut layers = Vec::with_capacity(self.layers.len() + 1);
        layers.push(layer);
        layers.extend(self.layers.iter().cloned());
        Self { layers, ..self.without_layers() }
    }

    /// This chain without its first layer.
    pub fn parents(&self) -> Self {
        Self { layers: self.layers.iter().skip(1).cloned().collect(), ..self.without_layers() }
    }

    fn without_layers(&self) -> Self {
        Self {
            layers: Vec::new(),
            mode: self.mode,
            default: self.default.clone(),
            default_when_empty: self.default_when_empty,
        }
    }

    /// Every value for `key`, first layer to last. Ignores the default.
    pub fn get_all(&self, key: &str) -> Vec<V> {
        self.found(key).cloned().collect()
    }

    /// Value from the first layer holding `key`, else the default.
    pub fn get_first(&self, key: &str) -> Option<V> {
        self.found(key).next().or(self.default.as_ref()).cloned()
    }

    /// First visible value for every key.
    pub fn flatten(&self) -> IndexMap<String, V> {
        let mut merged = IndexMap::new();
        for layer in &self.layers {
            for key in layer.keys_iter() {
                if !merged.contains_key(key) {
                    if let Some(value) = layer.get(key) {
                        merged.insert(key.to_string(), value.clone());
                    }
                }
            }
        }
        merged
    }
}

impl<V: Clone + PartialEq + Debug> Chain<V> {
    /// The one distinct value for `key` across layers, else the default.
    pub fn get_unique(&self, key: &str) -> Result<Option<V>, ChainError> {
        let mut distinct: Vec<&V> = Vec::new();
        for value in self.found(key) {
            if !distinct.contains(&value) {
                distinct.push(value);
            }
        }

        match distinct.as_slice() {
            [] => Ok(self.default.clone()),
            [value] => Ok(Some((*value).clone())),
            values => {
                let values: Vec<String> = values.iter().map(|v| format!("{v:?}")).collect();
                tracing::debug!(key, ?values, "layers disagree on key");
                Err(ChainError::Conflict { key: key.to_string(), values })
            }
        }
    }

    /// Look `key` up according to the chain's merge mode.
    pub fn get(&self, key: &str) -> Result<Lookup<V>, ChainError> {
        let lookup = match self.mode {
            MergeMode::All => {
                let values = self.get_all(key);
                match (&self.default, values.is_empty() && self.default_when_empty) {
                    (Some(default), true) => Lookup::Many(vec![default.clone()]),
                    _ => Lookup::Many(values),
                }
            }
            MergeMode::First => self.get_first(key).map_or(Lookup::Missing, Lookup::One),
            MergeMode::Unique => self.get_unique(key)?.map_or(Lookup::Missing, Lookup::One),
        };
        Ok(lookup)
    }
}
