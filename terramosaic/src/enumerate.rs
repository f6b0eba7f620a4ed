//! Tile enumeration over a bounding box.

use crate::coord::{to_tile_coords, BoundingBox, CoordError, TileCoord};
use crate::error::{RenderError, RenderResult};

/// Upper bound on the number of tiles one render may fetch.
pub const MAX_TILES: u64 = 300;

/// Inclusive tile index ranges covering a bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TileRange {
    x_min: u32,
    x_max: u32,
    y_min: u32,
    y_max: u32,
    zoom: u8,
}

impl TileRange {
    fn covering(bbox: &BoundingBox, zoom: u8) -> Result<Self, CoordError> {
        // North-west corner gives the smallest indices.
        let nw = to_tile_coords(bbox.max_lat, bbox.min_lng, zoom)?;
        let se = to_tile_coords(bbox.min_lat, bbox.max_lng, zoom)?;

        Ok(Self {
            x_min: nw.x.min(se.x),
            x_max: nw.x.max(se.x),
            y_min: nw.y.min(se.y),
            y_max: nw.y.max(se.y),
            zoom,
        })
    }

    fn count(&self) -> u64 {
        u64::from(self.x_max - self.x_min + 1) * u64::from(self.y_max - self.y_min + 1)
    }
}

fn configuration(err: CoordError) -> RenderError {
    RenderError::Configuration(err.to_string())
}

/// Number of tiles covering `bbox` at `zoom`, without allocating them.
pub fn tile_count(bbox: &BoundingBox, zoom: u8) -> RenderResult<u64> {
    TileRange::covering(bbox, zoom)
        .map(|r| r.count())
        .map_err(configuration)
}

/// Enumerates the tiles covering `bbox` at `zoom`.
///
/// Tiles are ordered north to south, then west to east. Fails with
/// [`RenderError::Configuration`] when more than [`MAX_TILES`] tiles would be
/// needed; the check happens before the list is built.
pub fn tiles_for_bbox(bbox: &BoundingBox, zoom: u8) -> RenderResult<Vec<TileCoord>> {
    let range = TileRange::covering(bbox, zoom).map_err(configuration)?;

    let count = range.count();
    if count > MAX_TILES {
        return Err(RenderError::Configuration(format!(
            "too many map tiles ({} > {}); narrow the bounding box or lower the zoom",
            count, MAX_TILES
        )));
    }

    let mut tiles = Vec::with_capacity(count as usize);
    for y in range.y_min..=range.y_max {
        for x in range.x_min..=range.x_max {
            tiles.push(TileCoord {
                x,
                y,
                z: range.zoom,
            });
        }
    }
    Ok(tiles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_small_box_at_zoom_10() {
        let bbox = BoundingBox::new(10.0, 10.1, 20.0, 20.1).unwrap();
        let tiles = tiles_for_bbox(&bbox, 10).unwrap();

        assert_eq!(
            tiles,
            vec![
                TileCoord { x: 568, y: 483, z: 10 },
                TileCoord { x: 569, y: 483, z: 10 },
            ]
        );
        assert_eq!(tile_count(&bbox, 10).unwrap(), 2);
    }

    #[test]
    fn test_zoom_zero_is_single_tile() {
        let bbox = BoundingBox::new(-80.0, 80.0, -170.0, 170.0).unwrap();
        let tiles = tiles_for_bbox(&bbox, 0).unwrap();
        assert_eq!(tiles, vec![TileCoord { x: 0, y: 0, z: 0 }]);
    }

    #[test]
    fn test_order_is_rows_then_columns() {
        let bbox = BoundingBox::new(-10.0, 10.0, -10.0, 10.0).unwrap();
        let tiles = tiles_for_bbox(&bbox, 4).unwrap();

        let mut sorted = tiles.clone();
        sorted.sort_by_key(|t| (t.y, t.x));
        assert_eq!(tiles, sorted);
    }

    #[test]
    fn test_too_many_tiles() {
        let bbox = BoundingBox::new(0.0, 10.0, 0.0, 10.0).unwrap();
        assert!(tile_count(&bbox, 12).unwrap() > MAX_TILES);

        let err = tiles_for_bbox(&bbox, 12).unwrap_err();
        match err {
            RenderError::Configuration(msg) => {
                assert!(msg.contains("too many map tiles"));
                assert!(msg.contains("300"));
            }
            other => panic!("Expected Configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_exactly_at_cap_is_allowed() {
        // 20 x 15 tiles at zoom 10 around the equator.
        let bbox = BoundingBox::new(
            crate::coord::tile_to_lat_lon(&TileCoord { x: 0, y: 527, z: 10 }).0 + 1e-6,
            crate::coord::tile_to_lat_lon(&TileCoord { x: 0, y: 512, z: 10 }).0 - 1e-6,
            crate::coord::tile_to_lat_lon(&TileCoord { x: 512, y: 0, z: 10 }).1 + 1e-6,
            crate::coord::tile_to_lat_lon(&TileCoord { x: 532, y: 0, z: 10 }).1 - 1e-6,
        )
        .unwrap();

        assert_eq!(tile_count(&bbox, 10).unwrap(), 300);
        assert_eq!(tiles_for_bbox(&bbox, 10).unwrap().len(), 300);
    }

    #[test]
    fn test_invalid_zoom_is_configuration_error() {
        let bbox = BoundingBox::new(10.0, 10.1, 20.0, 20.1).unwrap();
        assert!(matches!(
            tiles_for_bbox(&bbox, 23),
            Err(RenderError::Configuration(_))
        ));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_tiles_cover_unique_and_in_range(
                min_lat in -80.0..79.0_f64,
                lat_span in 0.001..1.0_f64,
                min_lng in -179.0..178.0_f64,
                lng_span in 0.001..1.0_f64,
                zoom in 0u8..=12
            ) {
                let bbox = BoundingBox::new(
                    min_lat,
                    min_lat + lat_span,
                    min_lng,
                    min_lng + lng_span,
                )?;
                let count = tile_count(&bbox, zoom)?;
                prop_assume!(count <= MAX_TILES);

                let tiles = tiles_for_bbox(&bbox, zoom)?;
                prop_assert_eq!(tiles.len() as u64, count);

                let unique: HashSet<_> = tiles.iter().copied().collect();
                prop_assert_eq!(unique.len(), tiles.len());

                let n = crate::coord::tiles_per_axis(zoom);
                for t in &tiles {
                    prop_assert!(u64::from(t.x) < n && u64::from(t.y) < n);
                    prop_assert_eq!(t.z, zoom);
                }

                // Every corner of the box lies in some enumerated tile.
                for (lat, lng) in [
                    (bbox.min_lat, bbox.min_lng),
                    (bbox.min_lat, bbox.max_lng),
                    (bbox.max_lat, bbox.min_lng),
                    (bbox.max_lat, bbox.max_lng),
                ] {
                    let corner = to_tile_coords(lat, lng, zoom)?;
                    prop_assert!(unique.contains(&corner));
                }
            }
        }
    }
}
