//! Arguments and helpers shared across CLI commands.

use std::path::{Path, PathBuf};

use clap::Args;
use terramosaic::config::ConfigFile;

use crate::error::CliError;

/// Environment variable holding the Mapbox access token.
pub const ACCESS_TOKEN_ENV: &str = "MAPBOX_ACCESS_TOKEN";

/// Geographic area and zoom level of a request.
#[derive(Debug, Clone, Args)]
pub struct AreaArgs {
    /// Southern edge in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub min_lat: f64,

    /// Northern edge in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub max_lat: f64,

    /// Western edge in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub min_lng: f64,

    /// Eastern edge in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub max_lng: f64,

    /// Tile zoom level (0-22)
    #[arg(long)]
    pub zoom: u8,
}

/// Loads the config file at `path`, or the default one.
pub fn load_config(path: Option<&Path>) -> Result<ConfigFile, CliError> {
    let config = match path {
        Some(p) => ConfigFile::load_from(p)?,
        None => ConfigFile::load()?,
    };
    Ok(config)
}

/// Picks the access token: command line, then environment, then config file.
pub fn resolve_access_token(
    cli: Option<String>,
    env: Option<String>,
    file: Option<String>,
) -> Result<String, CliError> {
    [cli, env, file]
        .into_iter()
        .flatten()
        .map(|t| t.trim().to_string())
        .find(|t| !t.is_empty())
        .ok_or_else(|| {
            CliError::Config(format!(
                "no Mapbox access token; use --access-token, set {} or add \
                 access_token to the [mapbox] section of config.ini",
                ACCESS_TOKEN_ENV
            ))
        })
}

/// Resolves the output path against the current directory for display.
pub fn display_path(path: &Path) -> PathBuf {
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
