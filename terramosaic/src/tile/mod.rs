//! Decoded map tiles
//!
//! A [`TileRaster`] holds the pixels of one fetched tile together with its
//! grid position, and knows how to project pixels to geographic coordinates
//! and decode terrain-RGB elevation.

mod raster;

pub use raster::{decode_terrain_rgb, DecodeError, TileRaster};
