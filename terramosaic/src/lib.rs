//! Terramosaic - elevation rasters from remote terrain tiles
//!
//! This library fetches the map tiles covering a bounding box with a bounded
//! pool of worker threads, decodes per-pixel elevation from each tile, and
//! merges the results into one georeferenced raster.
//!
//! # Example
//!
//! ```no_run
//! use std::path::PathBuf;
//! use terramosaic::config::RenderConfig;
//! use terramosaic::mosaic::GdalMosaicBuilder;
//! use terramosaic::provider::{MapboxTileSource, ReqwestClient};
//! use terramosaic::render::{RenderParams, Renderer};
//!
//! let source = MapboxTileSource::new(ReqwestClient::new()?, "pk.your_token");
//! let renderer = Renderer::new(source, GdalMosaicBuilder::default(), RenderConfig::default());
//!
//! let report = renderer.render(&RenderParams {
//!     min_lat: 10.0,
//!     max_lat: 10.1,
//!     min_lng: 20.0,
//!     max_lng: 20.1,
//!     zoom: 10,
//!     output: PathBuf::from("elevation.tif"),
//!     map_type: "terrain".to_string(),
//! })?;
//! println!("{} of {} tiles rendered", report.written, report.tiles);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod coord;
pub mod enumerate;
pub mod error;
pub mod extract;
pub mod logging;
pub mod mosaic;
pub mod pool;
pub mod provider;
pub mod render;
pub mod tile;
pub mod writer;

pub use error::{RenderError, RenderResult};
