//! `init` command: write a default config file if none exists.

use terramosaic::config::ConfigFile;

use crate::error::CliError;

pub fn run() -> Result<(), CliError> {
    let path = ConfigFile::ensure_exists()?;
    println!("Configuration file: {}", path.display());
    println!("Set [mapbox] access_token there, or export MAPBOX_ACCESS_TOKEN.");
    Ok(())
}
