//! INI parsing: `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to struct fields.

use std::path::PathBuf;
use std::str::FromStr;

use ini::{Ini, Properties};

use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [mapbox] section
    if let Some(section) = ini.section(Some("mapbox")) {
        if let Some(v) = non_empty(section, "access_token") {
            config.mapbox.access_token = Some(v.to_string());
        }
        if let Some(v) = section.get("timeout") {
            config.mapbox.timeout = parse_positive(v, "mapbox", "timeout", "seconds")?;
        }
    }

    // [render] section
    if let Some(section) = ini.section(Some("render")) {
        if let Some(v) = section.get("map_type") {
            config.render.map_type = parse_with(
                v,
                "render",
                "map_type",
                "must be one of: satellite, terrain, streets",
            )?;
        }
        if let Some(v) = section.get("workers") {
            config.render.workers = parse_positive(v, "render", "workers", "threads")?;
        }
        if let Some(v) = section.get("image_format") {
            config.render.image_format = parse_with(
                v,
                "render",
                "image_format",
                "must be one of: png, png-32, png-64, png-128, png-256, png-raw, \
                 jpeg-70, jpeg-80, jpeg-90",
            )?;
        }
        if let Some(v) = section.get("high_resolution") {
            config.render.high_resolution = parse_bool(v).ok_or_else(|| invalid(
                "render",
                "high_resolution",
                v,
                "must be true or false",
            ))?;
        }
        if let Some(v) = non_empty(section, "scratch_dir") {
            config.render.scratch_dir = Some(expand_tilde(v));
        }
    }

    // [gdal] section
    if let Some(section) = ini.section(Some("gdal")) {
        if let Some(v) = non_empty(section, "translate") {
            config.gdal.translate = expand_tilde(v).to_string_lossy().into_owned();
        }
        if let Some(v) = non_empty(section, "warp") {
            config.gdal.warp = expand_tilde(v).to_string_lossy().into_owned();
        }
        if let Some(v) = section.get("cache_max_mb") {
            config.gdal.cache_max_mb = parse_positive(v, "gdal", "cache_max_mb", "megabytes")?;
        }
        if let Some(v) = section.get("warp_memory_mb") {
            config.gdal.warp_memory_mb =
                parse_positive(v, "gdal", "warp_memory_mb", "megabytes")?;
        }
    }

    Ok(config)
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn non_empty<'a>(section: &'a Properties, key: &str) -> Option<&'a str> {
    section.get(key).map(str::trim).filter(|v| !v.is_empty())
}

fn parse_with<T: FromStr>(
    value: &str,
    section: &str,
    key: &str,
    reason: &str,
) -> Result<T, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(section, key, value, reason))
}

fn parse_positive<T>(
    value: &str,
    section: &str,
    key: &str,
    unit: &str,
) -> Result<T, ConfigFileError>
where
    T: FromStr + PartialOrd + Default,
{
    let reason = format!("must be a positive integer ({})", unit);
    let parsed: T = parse_with(value, section, key, &reason)?;
    if parsed <= T::default() {
        return Err(invalid(section, key, value, &reason));
    }
    Ok(parsed)
}

/// Parse a boolean value from a config string.
/// Accepts: true/false, yes/no, 1/0, on/off (case-insensitive)
pub(super) fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{ImageFormat, MapType};
    use std::path::Path;
    use tempfile::TempDir;

    fn load(contents: &str) -> Result<ConfigFile, ConfigFileError> {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");
        std::fs::write(&config_path, contents).unwrap();
        ConfigFile::load_from(&config_path)
    }

    #[test]
    fn test_full_config() {
        let config = load(
            r#"
[mapbox]
access_token = pk.abc
timeout = 10

[render]
map_type = satellite
workers = 12
image_format = png-raw
high_resolution = yes
scratch_dir = /data/scratch

[gdal]
translate = /opt/gdal/bin/gdal_translate
warp = /opt/gdal/bin/gdalwarp
cache_max_mb = 1024
warp_memory_mb = 512
"#,
        )
        .unwrap();

        assert_eq!(config.mapbox.access_token.as_deref(), Some("pk.abc"));
        assert_eq!(config.mapbox.timeout, 10);
        assert_eq!(config.render.map_type, MapType::Satellite);
        assert_eq!(config.render.workers, 12);
        assert_eq!(config.render.image_format, ImageFormat::PngRaw);
        assert!(config.render.high_resolution);
        assert_eq!(
            config.render.scratch_dir.as_deref(),
            Some(Path::new("/data/scratch"))
        );
        assert_eq!(config.gdal.warp, "/opt/gdal/bin/gdalwarp");
        assert_eq!(config.gdal.cache_max_mb, 1024);

        let render = config.render_config();
        assert_eq!(render.workers(), 12);
        assert_eq!(render.gdal().warp_memory_mb(), 512);
        assert_eq!(render.scratch_root(), Some(Path::new("/data/scratch")));
    }

    #[test]
    fn test_partial_config() {
        let config = load("[render]\nworkers = 2\n").unwrap();
        let default = ConfigFile::default();

        assert_eq!(config.render.workers, 2);
        assert_eq!(config.mapbox, default.mapbox);
        assert_eq!(config.gdal, default.gdal);
    }

    #[test]
    fn test_empty_token_ignored() {
        let config = load("[mapbox]\naccess_token =   \n").unwrap();
        assert!(config.mapbox.access_token.is_none());
    }

    #[test]
    fn test_invalid_map_type() {
        let err = load("[render]\nmap_type = foo\n").unwrap_err();
        match err {
            ConfigFileError::InvalidValue {
                section, key, value, ..
            } => {
                assert_eq!(section, "render");
                assert_eq!(key, "map_type");
                assert_eq!(value, "foo");
            }
            other => panic!("Expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_workers_rejected() {
        assert!(matches!(
            load("[render]\nworkers = 0\n"),
            Err(ConfigFileError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_bad_boolean_rejected() {
        assert!(matches!(
            load("[render]\nhigh_resolution = maybe\n"),
            Err(ConfigFileError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("2"), None);
    }

    #[test]
    fn test_expand_tilde() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde("~/scratch"), home.join("scratch"));
        }
        assert_eq!(expand_tilde("/absolute/path"), PathBuf::from("/absolute/path"));
    }
}
