//! Command-line interface for huti
//!
//! Exposes the layered lookup, status symbols and a few lookups of the
//! environment as subcommands.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{load_config, merge_cli_with_config, CliOverrides, Config};

mod get;
mod symbol;
mod utils;
mod which;

/// Small utility helpers: layered lookups, status symbols, executables and environment values
#[derive(Parser)]
#[command(name = "huti")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (default: huti.toml / .huti.toml / huti.yaml in the current directory)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Force colored output
    #[arg(long, global = true, conflicts_with = "no_color")]
    color: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Look a key up across layered TOML/YAML/JSON files
    Get(get::GetArgs),

    /// Print the merged view of layered files (first visible value per key)
    Merge(get::MergeArgs),

    /// Print a status symbol with a message
    Symbol(symbol::SymbolArgs),

    /// Locate an executable on PATH
    Which(which::WhichArgs),

    /// Classify an environment variable's value
    Env(which::EnvArgs),

    /// Show the huti version
    Version,
}

impl Cli {
    fn colorize(&self) -> Option<bool> {
        match (self.color, self.no_color) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    let cwd = std::env::current_dir()?;
    let file_config = load_config(&cwd, cli.config.as_deref())?;

    let colorize = cli.colorize();
    match cli.command {
        Commands::Get(args) => {
            let config = settings(&file_config, colorize, args.overrides())?;
            get::run(args, &config)
        }
        Commands::Merge(args) => get::run_merge(args),
        Commands::Symbol(args) => {
            let config = settings(&file_config, colorize, CliOverrides::default())?;
            symbol::run(args, &config)
        }
        Commands::Which(args) => which::run(args),
        Commands::Env(args) => which::run_env(args),
        Commands::Version => {
            println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn settings(file: &Config, colorize: Option<bool>, overrides: CliOverrides) -> Result<Config> {
    let overrides = CliOverrides { colorize, ..overrides };
    merge_cli_with_config(&overrides, file)
}
