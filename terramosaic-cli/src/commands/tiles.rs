//! `tiles` command: list the tiles a render would fetch, without fetching.

use clap::Args;
use terramosaic::coord::{BoundingBox, TileCoord};
use terramosaic::enumerate::{tile_count, tiles_for_bbox, MAX_TILES};
use terramosaic::RenderError;

use super::common::AreaArgs;
use crate::error::CliError;

#[derive(Debug, Clone, Args)]
pub struct TilesArgs {
    #[command(flatten)]
    pub area: AreaArgs,
}

pub fn run(args: TilesArgs) -> Result<(), CliError> {
    let zoom = args.area.zoom;
    let bbox = bounding_box(&args.area).map_err(CliError::Tiles)?;
    println!(
        "{} tiles at zoom {} (limit {})",
        tile_count(&bbox, zoom).map_err(CliError::Tiles)?,
        zoom,
        MAX_TILES
    );

    for tile in plan(&bbox, zoom).map_err(CliError::Tiles)? {
        println!("  {}  {}", tile, tile.bounds());
    }
    Ok(())
}

fn bounding_box(area: &AreaArgs) -> Result<BoundingBox, RenderError> {
    BoundingBox::new(area.min_lat, area.max_lat, area.min_lng, area.max_lng)
        .map_err(|e| RenderError::Configuration(e.to_string()))
}

/// Enumerates the tiles covering `bbox`.
fn plan(bbox: &BoundingBox, zoom: u8) -> Result<Vec<TileCoord>, RenderError> {
    tiles_for_bbox(bbox, zoom)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area(zoom: u8) -> AreaArgs {
        AreaArgs {
            min_lat: 10.0,
            max_lat: 10.1,
            min_lng: 20.0,
            max_lng: 20.1,
            zoom,
        }
    }

    #[test]
    fn test_plan_small_area() {
        let bbox = bounding_box(&area(10)).unwrap();
        let tiles = plan(&bbox, 10).unwrap();
        assert_eq!(tiles.len(), 2);
        assert_eq!(tiles[0].to_string(), "10/568/483");
    }

    #[test]
    fn test_plan_over_limit() {
        let bbox = bounding_box(&AreaArgs {
            max_lat: 11.0,
            max_lng: 21.0,
            ..area(16)
        })
        .unwrap();
        assert!(matches!(
            plan(&bbox, 16),
            Err(RenderError::Configuration(_))
        ));
    }

    #[test]
    fn test_inverted_area_reported_as_tiles_error() {
        let args = TilesArgs {
            area: AreaArgs {
                min_lat: 10.2,
                ..area(10)
            },
        };
        let err = run(args).unwrap_err();

        assert!(matches!(
            err,
            CliError::Tiles(RenderError::Configuration(_))
        ));
        assert!(err.to_string().starts_with("Cannot list tiles:"));
    }
}
