//! Per-pixel elevation extraction.

use tracing::debug;

use crate::tile::{DecodeError, TileRaster};

/// One elevation sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Degrees east
    pub longitude: f64,
    /// Degrees north
    pub latitude: f64,
    /// Meters above sea level
    pub elevation: f64,
}

/// Extracts one sample per decodable pixel of `raster`.
///
/// Pixels are visited column by column: the horizontal index is the outer
/// loop and the vertical index the inner one. Pixels that fail to project or
/// decode are skipped.
pub fn extract_samples(raster: &TileRaster) -> Vec<Sample> {
    let (width, height) = (raster.width(), raster.height());
    let mut samples = Vec::with_capacity(width as usize * height as usize);
    let mut skipped = 0usize;

    for px in 0..width {
        for py in 0..height {
            match sample_pixel(raster, px, py) {
                Ok(sample) => samples.push(sample),
                Err(e) => {
                    skipped += 1;
                    debug!(tile = %raster.tile(), px, py, error = %e, "Skipping pixel");
                }
            }
        }
    }

    if skipped > 0 {
        debug!(
            tile = %raster.tile(),
            skipped,
            kept = samples.len(),
            "Pixels skipped during extraction"
        );
    }
    samples
}

fn sample_pixel(raster: &TileRaster, px: u32, py: u32) -> Result<Sample, DecodeError> {
    let (latitude, longitude) = raster.pixel_to_location(px, py)?;
    let elevation = raster.elevation_at_pixel(px, py)?;
    Ok(Sample {
        longitude,
        latitude,
        elevation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::TileCoord;
    use crate::tile::decode_terrain_rgb;
    use image::{Rgba, RgbaImage};

    fn raster(img: RgbaImage) -> TileRaster {
        TileRaster::new(TileCoord::new(568, 483, 10).unwrap(), img).unwrap()
    }

    #[test]
    fn test_all_pixels_sampled() {
        let r = raster(RgbaImage::from_pixel(8, 8, Rgba([0x01, 0x86, 0xAA, 255])));
        let samples = extract_samples(&r);

        assert_eq!(samples.len(), 64);
        assert!(samples.iter().all(|s| (s.elevation - 1.0).abs() < 1e-9));
    }

    #[test]
    fn test_samples_within_tile_extent() {
        let r = raster(RgbaImage::from_pixel(8, 8, Rgba([0, 0, 0, 255])));
        let bounds = r.tile().bounds();

        for s in extract_samples(&r) {
            assert!(bounds.contains(s.latitude, s.longitude));
        }
    }

    #[test]
    fn test_column_major_order() {
        let r = raster(RgbaImage::from_pixel(3, 3, Rgba([0, 0, 0, 255])));
        let samples = extract_samples(&r);

        // First three samples share a column: same longitude, latitude falling.
        assert_eq!(samples[0].longitude, samples[1].longitude);
        assert_eq!(samples[1].longitude, samples[2].longitude);
        assert!(samples[0].latitude > samples[1].latitude);
        assert!(samples[1].latitude > samples[2].latitude);
        // Next column starts further east.
        assert!(samples[3].longitude > samples[2].longitude);
    }

    #[test]
    fn test_no_data_pixels_skipped() {
        let mut img = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        img.put_pixel(1, 2, Rgba([0, 0, 0, 0]));
        img.put_pixel(3, 0, Rgba([0, 0, 0, 0]));

        let samples = extract_samples(&raster(img));
        assert_eq!(samples.len(), 14);
    }

    #[test]
    fn test_deep_zoom_samples_keep_their_own_pixel() {
        // Near the map origin at zoom 22 the projected round trip drifts
        // by more than the snapping tolerance.
        let size = 512;
        let mut img = RgbaImage::new(size, size);
        for (px, py, p) in img.enumerate_pixels_mut() {
            *p = Rgba([0, (px % 256) as u8, (py % 256) as u8, 255]);
        }
        let r = TileRaster::new(TileCoord::new(0, 0, 22).unwrap(), img).unwrap();

        let samples = extract_samples(&r);
        assert_eq!(samples.len(), (size * size) as usize);
        for (i, s) in samples.iter().enumerate() {
            let px = i as u32 / size;
            let py = i as u32 % size;
            let expected = decode_terrain_rgb(0, (px % 256) as u8, (py % 256) as u8);
            assert_eq!(s.elevation, expected, "pixel ({}, {})", px, py);
        }
    }

    #[test]
    fn test_fully_transparent_tile_yields_nothing() {
        let r = raster(RgbaImage::new(4, 4));
        assert!(extract_samples(&r).is_empty());
    }
}
