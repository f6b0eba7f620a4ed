//! INI serialization: `ConfigFile` → commented INI string.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let access_token = config.mapbox.access_token.as_deref().unwrap_or("");
    let scratch_dir = config
        .render
        .scratch_dir
        .as_deref()
        .map(path_to_string)
        .unwrap_or_default();

    format!(
        r#"[mapbox]
; Mapbox access token. MAPBOX_ACCESS_TOKEN and --access-token take precedence.
; Get one at: https://www.mapbox.com/
access_token = {}
; HTTP request timeout in seconds (default: 30)
timeout = {}

[render]
; Map type to fetch: satellite, terrain, streets (default: terrain)
map_type = {}
; Number of concurrent tile fetch workers (default: 4)
workers = {}
; Tile encoding: png, png-32, png-64, png-128, png-256, png-raw,
; jpeg-70, jpeg-80, jpeg-90 (default: jpeg-90)
image_format = {}
; Request 512 px high-density tiles (default: false)
high_resolution = {}
; Parent directory for scratch files. Empty means the system temp directory.
scratch_dir = {}

[gdal]
; GDAL executables, looked up on PATH unless absolute
translate = {}
warp = {}
; GDAL_CACHEMAX and gdalwarp -wm, in megabytes (default: 3000)
cache_max_mb = {}
warp_memory_mb = {}
"#,
        access_token,
        config.mapbox.timeout,
        config.render.map_type,
        config.render.workers,
        config.render.image_format,
        config.render.high_resolution,
        scratch_dir,
        config.gdal.translate,
        config.gdal.warp,
        config.gdal.cache_max_mb,
        config.gdal.warp_memory_mb,
    )
}

fn path_to_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
