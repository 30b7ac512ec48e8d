//! `get` and `merge` command implementations

use anyhow::Result;
use clap::Args;
use serde_json::Value as JsonValue;
use std::path::PathBuf;

use super::utils::{parse_assignment, parse_value};
use crate::chain::{load_layer, Chain, Layer, Lookup, MergeMode};
use crate::config::{CliOverrides, Config};

#[derive(Args)]
pub struct GetArgs {
    /// Key to look up
    #[arg(value_name = "KEY")]
    pub key: String,

    /// Layer files, topmost first (repeatable)
    #[arg(short, long = "layer", value_name = "FILE")]
    pub layers: Vec<PathBuf>,

    /// How values from several layers are reconciled
    #[arg(short, long, value_enum)]
    pub mode: Option<MergeMode>,

    /// Value returned when no layer has the key (parsed as JSON when possible)
    #[arg(short, long, value_name = "VALUE")]
    pub default: Option<String>,

    /// In `all` mode, answer with [DEFAULT] instead of [] when nothing is found
    #[arg(long)]
    pub default_when_empty: bool,

    /// Write KEY=VALUE into the topmost layer before the lookup (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub assignments: Vec<String>,
}

impl GetArgs {
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            colorize: None,
            mode: self.mode,
            default: self.default.as_deref().map(parse_value),
        }
    }
}

#[derive(Args)]
pub struct MergeArgs {
    /// Layer files, topmost first (repeatable)
    #[arg(short, long = "layer", value_name = "FILE", required = true)]
    pub layers: Vec<PathBuf>,
}

fn build_chain(top: Layer<JsonValue>, files: &[PathBuf]) -> Result<Chain<JsonValue>> {
    let mut chain = Chain::new([top]);
    for path in files {
        chain.push_layer(load_layer(path)?);
    }
    Ok(chain)
}

pub fn run(args: GetArgs, config: &Config) -> Result<()> {
    let mut chain = build_chain(Layer::empty(), &args.layers)?
        .with_mode(config.mode)
        .default_when_empty(args.default_when_empty);
    if let Some(default) = &config.default {
        chain = chain.with_default(default.clone());
    }

    for raw in &args.assignments {
        let (key, value) = parse_assignment(raw)?;
        chain.set(key, value)?;
    }

    let lookup = chain.get(&args.key)?;
    if lookup == Lookup::Missing {
        anyhow::bail!("Key '{}' not found in any layer", args.key);
    }
    println!("{}", serde_json::to_string_pretty(&lookup)?);
    Ok(())
}

pub fn run_merge(args: MergeArgs) -> Result<()> {
    let chain = build_chain(Layer::empty(), &args.layers)?;
    println!("{}", serde_json::to_string_pretty(&chain.flatten())?);
    Ok(())
}
