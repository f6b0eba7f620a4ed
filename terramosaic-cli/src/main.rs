//! Terramosaic CLI - Command-line interface
//!
//! Renders elevation rasters for a bounding box from Mapbox terrain tiles.

mod commands;
mod error;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use terramosaic::logging::{init_logging, DEFAULT_LOG_LEVEL};

use commands::render::RenderArgs;
use commands::tiles::TilesArgs;
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "terramosaic")]
#[command(version, about = "Render elevation rasters from Mapbox terrain tiles", long_about = None)]
struct Cli {
    /// Config file [default: ~/.terramosaic/config.ini]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Also write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch the tiles covering an area and build one elevation raster
    Render(RenderArgs),
    /// List the tiles covering an area without fetching them
    Tiles(TilesArgs),
    /// Create a default config file if none exists
    Init,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        e.exit();
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let level = if cli.verbose { "debug" } else { DEFAULT_LOG_LEVEL };
    let _logging_guard = init_logging(level, cli.log_file.as_deref())
        .map_err(|e| CliError::LoggingInit(e.to_string()))?;

    match cli.command {
        Command::Render(args) => commands::render::run(args, cli.config.as_deref()),
        Command::Tiles(args) => commands::tiles::run(args),
        Command::Init => commands::init::run(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_render() {
        let cli = Cli::try_parse_from([
            "terramosaic",
            "render",
            "--min-lat",
            "10",
            "--max-lat",
            "10.1",
            "--min-lng",
            "-20.5",
            "--max-lng",
            "-20",
            "--zoom",
            "10",
            "--output",
            "out.tif",
            "--workers",
            "8",
            "--image-format",
            "png-raw",
        ])
        .unwrap();

        match cli.command {
            Command::Render(args) => {
                assert_eq!(args.area.min_lng, -20.5);
                assert_eq!(args.area.zoom, 10);
                assert_eq!(args.output, PathBuf::from("out.tif"));
                assert_eq!(args.workers, Some(8));
                assert_eq!(
                    args.image_format,
                    Some(terramosaic::provider::ImageFormat::PngRaw)
                );
                assert!(args.map_type.is_none());
            }
            other => panic!("Expected render command, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_tiles_with_global_flags() {
        let cli = Cli::try_parse_from([
            "terramosaic",
            "tiles",
            "--min-lat",
            "10",
            "--max-lat",
            "10.1",
            "--min-lng",
            "20",
            "--max-lng",
            "20.1",
            "--zoom",
            "10",
            "--verbose",
            "--config",
            "/tmp/terramosaic.ini",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/terramosaic.ini")));
        assert!(matches!(cli.command, Command::Tiles(_)));
    }

    #[test]
    fn test_render_requires_output() {
        let result = Cli::try_parse_from([
            "terramosaic",
            "render",
            "--min-lat",
            "10",
            "--max-lat",
            "10.1",
            "--min-lng",
            "20",
            "--max-lng",
            "20.1",
            "--zoom",
            "10",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_map_type_rejected_at_parse() {
        let result = Cli::try_parse_from([
            "terramosaic",
            "render",
            "--min-lat",
            "10",
            "--max-lat",
            "10.1",
            "--min-lng",
            "20",
            "--max-lng",
            "20.1",
            "--zoom",
            "10",
            "-o",
            "out.tif",
            "--map-type",
            "foo",
        ]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_invalid_image_format_rejected() {
        let result = Cli::try_parse_from([
            "terramosaic",
            "render",
            "--min-lat",
            "10",
            "--max-lat",
            "10.1",
            "--min-lng",
            "20",
            "--max-lng",
            "20.1",
            "--zoom",
            "10",
            "-o",
            "out.tif",
            "--image-format",
            "gif",
        ]);
        assert!(result.is_err());
    }
}
