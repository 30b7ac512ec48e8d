//! `which` and `env` command implementations

use anyhow::Result;
use clap::Args;

use crate::env::parse_env;
use crate::paths::tilde;
use crate::process::which_required;

#[derive(Args)]
pub struct WhichArgs {
    /// Executable name or path
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Abbreviate the home directory as ~
    #[arg(short, long)]
    pub tilde: bool,
}

pub fn run(args: WhichArgs) -> Result<()> {
    let path = which_required(&args.name)?;
    if args.tilde {
        println!("{}", tilde(&path));
    } else {
        println!("{}", path.display());
    }
    Ok(())
}

#[derive(Args)]
pub struct EnvArgs {
    /// Environment variable name
    #[arg(value_name = "NAME")]
    pub name: String,
}

pub fn run_env(args: EnvArgs) -> Result<()> {
    let Some(value) = parse_env(&args.name) else {
        anyhow::bail!("Environment variable {} is not set", args.name);
    };
    println!("{}: {}", value.kind(), value);
    Ok(())
}
