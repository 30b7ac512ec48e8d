//! huti: command-line front end for the huti helpers

use anyhow::Result;

fn main() -> Result<()> {
    huti::cli::run()
}
