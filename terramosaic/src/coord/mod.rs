//! Coordinate conversion module
//!
//! Provides conversions between geographic coordinates (latitude/longitude),
//! Web Mercator tile coordinates and pixel positions inside a tile.

mod types;

pub use types::{
    tiles_per_axis, BoundingBox, CoordError, TileCoord, MAX_LAT, MAX_LON, MAX_ZOOM, MIN_LAT,
    MIN_LON, MIN_ZOOM,
};

use std::f64::consts::PI;

/// Converts geographic coordinates to tile coordinates.
///
/// Points on the eastern antimeridian or the southern Mercator limit are
/// clamped into the last tile of the grid.
///
/// # Arguments
///
/// * `lat` - Latitude in degrees (-85.05112878 to 85.05112878)
/// * `lon` - Longitude in degrees (-180.0 to 180.0)
/// * `zoom` - Zoom level (0 to 22)
///
/// # Returns
///
/// A `Result` containing the tile coordinates or an error if inputs are invalid.
#[inline]
pub fn to_tile_coords(lat: f64, lon: f64, zoom: u8) -> Result<TileCoord, CoordError> {
    // Validate inputs
    if !(MIN_LAT..=MAX_LAT).contains(&lat) {
        return Err(CoordError::InvalidLatitude(lat));
    }
    if !(MIN_LON..=MAX_LON).contains(&lon) {
        return Err(CoordError::InvalidLongitude(lon));
    }
    if zoom > MAX_ZOOM {
        return Err(CoordError::InvalidZoom(zoom));
    }

    let n = 2.0_f64.powi(zoom as i32);
    let last = (tiles_per_axis(zoom) - 1) as u32;

    let x = ((lon + 180.0) / 360.0 * n) as u32;

    let lat_rad = lat.to_radians();
    let y = ((1.0 - lat_rad.tan().asinh() / PI) / 2.0 * n).max(0.0) as u32;

    Ok(TileCoord {
        x: x.min(last),
        y: y.min(last),
        z: zoom,
    })
}

/// Converts tile coordinates back to geographic coordinates.
///
/// Returns the latitude/longitude of the tile's northwest corner.
#[inline]
pub fn tile_to_lat_lon(tile: &TileCoord) -> (f64, f64) {
    let n = 2.0_f64.powi(tile.z as i32);

    let lon = tile.x as f64 / n * 360.0 - 180.0;

    // Inverse Web Mercator
    let y = tile.y as f64 / n;
    let lat = (PI * (1.0 - 2.0 * y)).sinh().atan().to_degrees();

    (lat, lon)
}

/// Projects a pixel position inside a tile to latitude/longitude.
///
/// `px`/`py` are measured from the tile's northwest corner in pixels of a
/// `tile_size`×`tile_size` image. Fractional positions are allowed.
#[inline]
pub fn pixel_to_lat_lon(tile: &TileCoord, tile_size: u32, px: f64, py: f64) -> (f64, f64) {
    let world = 2.0_f64.powi(tile.z as i32) * tile_size as f64;
    let gx = tile.x as f64 * tile_size as f64 + px;
    let gy = tile.y as f64 * tile_size as f64 + py;

    let lon = gx / world * 360.0 - 180.0;
    let lat = (PI * (1.0 - 2.0 * gy / world)).sinh().atan().to_degrees();

    (lat, lon)
}

/// Projects latitude/longitude to a (fractional) pixel position inside a tile.
///
/// Inverse of [`pixel_to_lat_lon`]. The result may lie outside
/// `0..tile_size` when the location is not covered by the tile.
#[inline]
pub fn lat_lon_to_pixel(tile: &TileCoord, tile_size: u32, lat: f64, lon: f64) -> (f64, f64) {
    let world = 2.0_f64.powi(tile.z as i32) * tile_size as f64;

    let gx = (lon + 180.0) / 360.0 * world;
    let gy = (1.0 - lat.to_radians().tan().asinh() / PI) / 2.0 * world;

    (
        gx - tile.x as f64 * tile_size as f64,
        gy - tile.y as f64 * tile_size as f64,
    )
}
