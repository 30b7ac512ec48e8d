//! Precedence merge of CLI flags, environment and config file

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value as JsonValue;

use super::Config;
use crate::chain::{Chain, Layer, MergeMode};
use crate::env::parse_bool;

/// Settings given on the command line. `None` leaves the lower layers in
/// charge.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CliOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colorize: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<MergeMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<JsonValue>,
}

/// Resolve every setting from the first layer that provides it:
/// CLI, then `COLORIZE` from the environment, then the config file.
pub fn merge_cli_with_config(cli: &CliOverrides, file: &Config) -> Result<Config> {
    let env_layer = match parse_bool("COLORIZE") {
        Some(colorize) => Layer::map([("colorize", JsonValue::Bool(colorize))]),
        None => Layer::empty(),
    };

    let chain = Chain::new([
        Layer::from_serialize(cli).context("Failed reading CLI overrides")?,
        env_layer,
        Layer::from_serialize(file).context("Failed reading config file settings")?,
    ])
    .with_mode(MergeMode::First);

    let merged = JsonValue::Object(chain.flatten().into_iter().collect());
    serde_json::from_value(merged).context("Failed merging configuration")
}
