//! CLI command implementations.
//!
//! - [`init`] - Configuration initialization
//! - [`render`] - Fetch tiles and build the elevation raster
//! - [`tiles`] - Dry run listing the tiles a render would fetch

pub mod common;
pub mod init;
pub mod render;
pub mod tiles;
