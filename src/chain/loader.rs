//! Layer loading from TOML, YAML and JSON files

use super::Layer;
use anyhow::{Context, Result};
use serde_json::{Map, Value as JsonValue};
use std::fs;
use std::path::Path;

/// Load a mapping layer from a configuration file.
///
/// The format is chosen by extension. The top level of the document must be a
/// table; its keys become the layer's keys in document order.
pub fn load_layer(path: &Path) -> Result<Layer<JsonValue>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed reading layer file: {}", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();

    let value: JsonValue = match ext.as_str() {
        "toml" => {
            let raw: toml::Value = toml::from_str(&content)
                .with_context(|| format!("Invalid TOML syntax: {}", path.display()))?;
            serde_json::to_value(raw)
                .with_context(|| format!("Unrepresentable TOML value in {}", path.display()))?
        }
        "yaml" | "yml" => serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid YAML syntax: {}", path.display()))?,
        "json" => serde_json::from_str(&content)
            .with_context(|| format!("Invalid JSON syntax: {}", path.display()))?,
        other => anyhow::bail!(
            "Unsupported layer extension '.{}' for file {}",
            other,
            path.display()
        ),
    };

    let table = into_table(value)
        .with_context(|| format!("Top level of {} is not a table", path.display()))?;
    tracing::debug!("loaded {} keys from {}", table.len(), path.display());
    Ok(Layer::map(table))
}

fn into_table(value: JsonValue) -> Result<Map<String, JsonValue>> {
    match value {
        JsonValue::Object(map) => Ok(map),
        // An empty YAML document parses as null.
        JsonValue::Null => Ok(Map::new()),
        other => anyhow::bail!("expected a table, found {}", kind_name(&other)),
    }
}

fn kind_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "a table",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_load_toml_layer_keeps_document_order() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("base.toml");
        fs::write(&path, "zeta = 1\nalpha = 'x'\n[nested]\nkey = true\n").expect("write");

        let layer = load_layer(&path).expect("layer");
        assert_eq!(layer.keys_iter().collect::<Vec<_>>(), vec!["zeta", "alpha", "nested"]);
        assert_eq!(layer.get("alpha"), Some(&json!("x")));
        assert_eq!(layer.get("nested"), Some(&json!({"key": true})));
    }

    #[test]
    fn test_load_yaml_and_json_layers() {
        let tmp = TempDir::new().expect("tmp");
        let yaml = tmp.path().join("a.yml");
        fs::write(&yaml, "a: 1\nb: [1, 2]\n").expect("write");
        let json_path = tmp.path().join("b.json");
        fs::write(&json_path, r#"{"a": 2}"#).expect("write");

        assert_eq!(load_layer(&yaml).expect("yaml").get("b"), Some(&json!([1, 2])));
        assert_eq!(load_layer(&json_path).expect("json").get("a"), Some(&json!(2)));
    }

    #[test]
    fn test_empty_yaml_is_empty_layer() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("empty.yaml");
        fs::write(&path, "").expect("write");
        assert!(load_layer(&path).expect("layer").is_empty());
    }

    #[test]
    fn test_non_table_document_is_rejected() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("list.json");
        fs::write(&path, "[1, 2, 3]").expect("write");
        let err = load_layer(&path).unwrap_err();
        assert!(format!("{err:#}").contains("an array"));
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("layer.ini");
        fs::write(&path, "a=1").expect("write");
        assert!(load_layer(&path).is_err());
    }
}
