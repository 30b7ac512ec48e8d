//! `symbol` command implementation

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::color::{Output, Symbol};
use crate::config::Config;

#[derive(Args)]
pub struct SymbolArgs {
    /// Symbol name (OK, ERROR, WARNING, ...)
    #[arg(value_enum, ignore_case = true)]
    pub symbol: Symbol,

    /// Bold text after the symbol
    #[arg(default_value = "")]
    pub first: String,

    /// Italic text after the separator
    #[arg(default_value = "")]
    pub other: String,

    /// Separator between FIRST and OTHER
    #[arg(short, long, default_value = ":")]
    pub separator: String,

    /// Write to stdout instead of stderr
    #[arg(long)]
    pub stdout: bool,

    /// Do not print a trailing newline
    #[arg(short = 'n', long)]
    pub no_newline: bool,

    /// Append to FILE instead of stderr/stdout
    #[arg(short, long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Exit with CODE after printing
    #[arg(short, long, value_name = "CODE")]
    pub exit: Option<i32>,
}

pub fn run(args: SymbolArgs, config: &Config) -> Result<()> {
    let output = Output {
        stderr: !args.stdout,
        newline: !args.no_newline,
        colorize: config.colorize,
        file: args.file,
    };
    args.symbol.print(&args.first, &args.other, &args.separator, &output)?;
    if let Some(code) = args.exit {
        std::process::exit(code);
    }
    Ok(())
}
