//! Configuration loading and merging
//!
//! Handles loading from config files, environment variables, and CLI arguments
//! with proper precedence (CLI > Env > File > Defaults).

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

use crate::chain::MergeMode;

pub mod loader;
pub mod merge;

pub use loader::load_config;
pub use merge::{merge_cli_with_config, CliOverrides};

/// Settings shared by the CLI commands.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Force colored output on or off.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colorize: Option<bool>,

    /// Merge mode for `get`.
    pub mode: MergeMode,

    /// Value returned when a key is in no layer. An explicit `null` is kept.
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "present_value")]
    pub default: Option<JsonValue>,
}

/// A field that is present is `Some`, even when its value is `null`.
fn present_value<'de, D>(deserializer: D) -> Result<Option<JsonValue>, D::Error>
where
    D: Deserializer<'de>,
{
    JsonValue::deserialize(deserializer).map(Some)
}
