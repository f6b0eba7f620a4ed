//! `render` command: fetch tiles and build the elevation raster.

use std::path::{Path, PathBuf};

use clap::Args;
use terramosaic::config::ConfigFile;
use terramosaic::mosaic::GdalMosaicBuilder;
use terramosaic::provider::{ImageFormat, MapType, MapboxTileSource, ReqwestClient};
use terramosaic::render::{RenderParams, Renderer};
use tracing::debug;

use super::common::{display_path, load_config, resolve_access_token, AreaArgs, ACCESS_TOKEN_ENV};
use crate::error::CliError;

#[derive(Debug, Clone, Args)]
pub struct RenderArgs {
    #[command(flatten)]
    pub area: AreaArgs,

    /// Output raster path (e.g. elevation.tif)
    #[arg(long, short)]
    pub output: PathBuf,

    /// Map type: satellite, terrain or streets [default: from config, else terrain]
    #[arg(long, value_parser = parse_map_type)]
    pub map_type: Option<MapType>,

    /// Number of concurrent fetch workers [default: from config, else 4]
    #[arg(long)]
    pub workers: Option<usize>,

    /// Tile encoding, e.g. jpeg-90 or png-raw [default: from config, else jpeg-90]
    #[arg(long, value_parser = parse_image_format)]
    pub image_format: Option<ImageFormat>,

    /// Request 512 px high-density tiles
    #[arg(long)]
    pub high_resolution: bool,

    /// Mapbox access token (overrides MAPBOX_ACCESS_TOKEN and config.ini)
    #[arg(long)]
    pub access_token: Option<String>,
}

fn parse_map_type(s: &str) -> Result<MapType, String> {
    s.parse::<MapType>().map_err(|e| e.to_string())
}

fn parse_image_format(s: &str) -> Result<ImageFormat, String> {
    s.parse::<ImageFormat>().map_err(|e| e.to_string())
}

impl RenderArgs {
    /// Render parameters, with the map type defaulting to the config file's.
    pub fn params(&self, config: &ConfigFile) -> RenderParams {
        RenderParams {
            min_lat: self.area.min_lat,
            max_lat: self.area.max_lat,
            min_lng: self.area.min_lng,
            max_lng: self.area.max_lng,
            zoom: self.area.zoom,
            output: self.output.clone(),
            map_type: self
                .map_type
                .unwrap_or(config.render.map_type)
                .to_string(),
        }
    }

    /// Applies command-line overrides on top of the config file.
    pub fn apply_overrides(&self, mut config: ConfigFile) -> ConfigFile {
        if let Some(workers) = self.workers {
            config.render.workers = workers;
        }
        if let Some(format) = self.image_format {
            config.render.image_format = format;
        }
        if self.high_resolution {
            config.render.high_resolution = true;
        }
        config
    }
}

pub fn run(args: RenderArgs, config_path: Option<&Path>) -> Result<(), CliError> {
    let config = args.apply_overrides(load_config(config_path)?);

    let token = resolve_access_token(
        args.access_token.clone(),
        std::env::var(ACCESS_TOKEN_ENV).ok(),
        config.mapbox.access_token.clone(),
    )?;

    let http_client = ReqwestClient::with_timeout(config.mapbox.timeout)
        .map_err(|e| CliError::HttpClient(e.to_string()))?;
    let source = MapboxTileSource::new(http_client, token);
    let mosaic = GdalMosaicBuilder::new(config.gdal_config());
    let render_config = config.render_config();
    debug!(?render_config, "Render configuration");

    let renderer = Renderer::new(source, mosaic, render_config);
    let params = args.params(&config);
    let report = renderer.render(&params)?;

    println!("Rendered {}", display_path(&report.output).display());
    println!("  Tiles:   {}", report.tiles);
    println!("  Written: {}", report.written);
    if report.failed > 0 {
        println!("  Failed:  {} (skipped)", report.failed);
    }
    Ok(())
}
