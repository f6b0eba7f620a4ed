//! Decoded tile pixels with Web Mercator projection.

use image::RgbaImage;
use thiserror::Error;

use crate::coord::{lat_lon_to_pixel, pixel_to_lat_lon, TileCoord};

/// Base offset of the terrain-RGB encoding, in meters.
const TERRAIN_RGB_BASE: f64 = -10000.0;

/// Height step of one terrain-RGB unit, in meters.
const TERRAIN_RGB_STEP: f64 = 0.1;

/// Projected pixel positions within this distance of an integer are snapped
/// to it before indexing.
const PIXEL_SNAP: f64 = 1e-6;

/// Per-pixel decode failures.
///
/// These never abort a render; the pixel is skipped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("image decode failed: {0}")]
    Image(String),

    #[error("tile image must be square, got {width}x{height}")]
    NotSquare { width: u32, height: u32 },

    #[error("pixel ({px}, {py}) outside {width}x{height} tile")]
    PixelOutOfRange {
        px: u32,
        py: u32,
        width: u32,
        height: u32,
    },

    #[error("location ({lat}, {lon}) not covered by tile {tile}")]
    OutsideTile { lat: f64, lon: f64, tile: TileCoord },

    #[error("no elevation data at pixel ({px}, {py})")]
    NoData { px: u32, py: u32 },
}

/// Decodes a terrain-RGB pixel to meters above sea level.
#[inline]
pub fn decode_terrain_rgb(r: u8, g: u8, b: u8) -> f64 {
    let value = (r as u32) * 65536 + (g as u32) * 256 + b as u32;
    TERRAIN_RGB_BASE + value as f64 * TERRAIN_RGB_STEP
}

/// One fetched map tile, decoded to RGBA.
#[derive(Debug, Clone)]
pub struct TileRaster {
    tile: TileCoord,
    image: RgbaImage,
}

impl TileRaster {
    /// Wraps an already decoded image.
    pub fn new(tile: TileCoord, image: RgbaImage) -> Result<Self, DecodeError> {
        let (width, height) = image.dimensions();
        if width != height || width == 0 {
            return Err(DecodeError::NotSquare { width, height });
        }
        Ok(Self { tile, image })
    }

    /// Decodes an encoded image (PNG, JPEG, ...) fetched for `tile`.
    pub fn from_bytes(tile: TileCoord, bytes: &[u8]) -> Result<Self, DecodeError> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| DecodeError::Image(e.to_string()))?
            .to_rgba8();
        Self::new(tile, image)
    }

    pub fn tile(&self) -> TileCoord {
        self.tile
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Projects pixel `(px, py)` (from the northwest corner) to `(lat, lon)`.
    pub fn pixel_to_location(&self, px: u32, py: u32) -> Result<(f64, f64), DecodeError> {
        self.check_pixel(px, py)?;
        Ok(pixel_to_lat_lon(
            &self.tile,
            self.width(),
            px as f64,
            py as f64,
        ))
    }

    /// Decodes the terrain-RGB elevation of the pixel covering `(lat, lon)`.
    ///
    /// Fully transparent pixels carry no data.
    pub fn elevation_at(&self, lat: f64, lon: f64) -> Result<f64, DecodeError> {
        let (fx, fy) = lat_lon_to_pixel(&self.tile, self.width(), lat, lon);
        let (px, py) = match (snap(fx), snap(fy)) {
            (Some(px), Some(py)) if px < self.width() && py < self.height() => (px, py),
            _ => {
                return Err(DecodeError::OutsideTile {
                    lat,
                    lon,
                    tile: self.tile,
                })
            }
        };
        self.elevation_at_pixel(px, py)
    }

    /// Decodes the terrain-RGB elevation stored at pixel `(px, py)`.
    pub fn elevation_at_pixel(&self, px: u32, py: u32) -> Result<f64, DecodeError> {
        self.check_pixel(px, py)?;
        let [r, g, b, a] = self.image.get_pixel(px, py).0;
        if a == 0 {
            return Err(DecodeError::NoData { px, py });
        }
        Ok(decode_terrain_rgb(r, g, b))
    }

    fn check_pixel(&self, px: u32, py: u32) -> Result<(), DecodeError> {
        if px >= self.width() || py >= self.height() {
            return Err(DecodeError::PixelOutOfRange {
                px,
                py,
                width: self.width(),
                height: self.height(),
            });
        }
        Ok(())
    }
}

fn snap(v: f64) -> Option<u32> {
    if !v.is_finite() {
        return None;
    }
    let rounded = v.round();
    let idx = if (v - rounded).abs() < PIXEL_SNAP {
        rounded
    } else {
        v.floor()
    };
    if idx < 0.0 || idx > u32::MAX as f64 {
        None
    } else {
        Some(idx as u32)
    }
}
