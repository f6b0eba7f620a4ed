//! Settings structs for each section of the INI config file.

use std::path::PathBuf;

use super::render::RenderConfig;
use crate::mosaic::{GdalConfig, DEFAULT_GDAL_CACHE_MB};
use crate::pool::DEFAULT_WORKERS;
use crate::provider::{ImageFormat, MapType, DEFAULT_TIMEOUT_SECS};

/// Complete configuration loaded from config.ini.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    pub mapbox: MapboxSettings,
    pub render: RenderSettings,
    pub gdal: GdalSettings,
}

/// `[mapbox]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct MapboxSettings {
    /// Access token; the command line and environment take precedence.
    pub access_token: Option<String>,
    /// HTTP request timeout in seconds
    pub timeout: u64,
}

impl Default for MapboxSettings {
    fn default() -> Self {
        Self {
            access_token: None,
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// `[render]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    pub map_type: MapType,
    pub workers: usize,
    pub image_format: ImageFormat,
    pub high_resolution: bool,
    /// Parent directory for scratch space; system temp dir when unset
    pub scratch_dir: Option<PathBuf>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            map_type: MapType::Terrain,
            workers: DEFAULT_WORKERS,
            image_format: ImageFormat::default(),
            high_resolution: false,
            scratch_dir: None,
        }
    }
}

/// `[gdal]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct GdalSettings {
    pub translate: String,
    pub warp: String,
    pub cache_max_mb: u32,
    pub warp_memory_mb: u32,
}

impl Default for GdalSettings {
    fn default() -> Self {
        let gdal = GdalConfig::default();
        Self {
            translate: gdal.translate_program().to_string(),
            warp: gdal.warp_program().to_string(),
            cache_max_mb: DEFAULT_GDAL_CACHE_MB,
            warp_memory_mb: DEFAULT_GDAL_CACHE_MB,
        }
    }
}

impl ConfigFile {
    /// GDAL tool settings as a [`GdalConfig`].
    pub fn gdal_config(&self) -> GdalConfig {
        GdalConfig::new()
            .with_translate_program(&self.gdal.translate)
            .with_warp_program(&self.gdal.warp)
            .with_cache_max_mb(self.gdal.cache_max_mb)
            .with_warp_memory_mb(self.gdal.warp_memory_mb)
    }

    /// Render tunables as a [`RenderConfig`].
    pub fn render_config(&self) -> RenderConfig {
        let config = RenderConfig::new()
            .with_workers(self.render.workers)
            .with_image_format(self.render.image_format)
            .with_high_resolution(self.render.high_resolution)
            .with_gdal(self.gdal_config());

        match &self.render.scratch_dir {
            Some(dir) => config.with_scratch_root(dir),
            None => config,
        }
    }
}
