//! Render pipeline configuration.

use std::path::{Path, PathBuf};

use crate::mosaic::GdalConfig;
use crate::pool::{PoolConfig, DEFAULT_WORKERS};
use crate::provider::ImageFormat;

/// Tunables for one render.
///
/// # Example
///
/// ```
/// use terramosaic::config::RenderConfig;
/// use terramosaic::provider::ImageFormat;
///
/// let config = RenderConfig::default();
/// assert_eq!(config.workers(), 4);
/// assert_eq!(config.image_format(), ImageFormat::Jpeg90);
///
/// let config = RenderConfig::new()
///     .with_workers(8)
///     .with_high_resolution(true);
/// assert_eq!(config.pool_config().workers, 8);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    workers: usize,
    image_format: ImageFormat,
    high_resolution: bool,
    scratch_root: Option<PathBuf>,
    gdal: GdalConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            image_format: ImageFormat::default(),
            high_resolution: false,
            scratch_root: None,
            gdal: GdalConfig::default(),
        }
    }
}

impl RenderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of fetch workers. Values below 1 are raised to 1.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Set the encoding tiles are requested in. Default: JPEG quality 90.
    pub fn with_image_format(mut self, format: ImageFormat) -> Self {
        self.image_format = format;
        self
    }

    /// Request double-density (512 px) tiles.
    pub fn with_high_resolution(mut self, high_resolution: bool) -> Self {
        self.high_resolution = high_resolution;
        self
    }

    /// Create scratch directories under `root` instead of the system
    /// temporary directory.
    pub fn with_scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.scratch_root = Some(root.into());
        self
    }

    pub fn with_gdal(mut self, gdal: GdalConfig) -> Self {
        self.gdal = gdal;
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn image_format(&self) -> ImageFormat {
        self.image_format
    }

    pub fn high_resolution(&self) -> bool {
        self.high_resolution
    }

    pub fn scratch_root(&self) -> Option<&Path> {
        self.scratch_root.as_deref()
    }

    pub fn gdal(&self) -> &GdalConfig {
        &self.gdal
    }

    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig::new(self.workers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RenderConfig::default();
        assert_eq!(config.workers(), DEFAULT_WORKERS);
        assert_eq!(config.image_format(), ImageFormat::Jpeg90);
        assert!(!config.high_resolution());
        assert!(config.scratch_root().is_none());
        assert_eq!(config.gdal(), &GdalConfig::default());
    }

    #[test]
    fn test_builder() {
        let config = RenderConfig::new()
            .with_workers(0)
            .with_image_format(ImageFormat::PngRaw)
            .with_scratch_root("/var/tmp/terramosaic");

        assert_eq!(config.workers(), 1);
        assert_eq!(config.image_format(), ImageFormat::PngRaw);
        assert_eq!(
            config.scratch_root(),
            Some(Path::new("/var/tmp/terramosaic"))
        );
    }
}
