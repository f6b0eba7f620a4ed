//! Provider types and traits

use std::fmt;
use std::str::FromStr;

use crate::coord::TileCoord;
use crate::tile::TileRaster;

/// Errors that can occur while fetching a single tile.
///
/// These are per-tile failures: the pipeline logs them and moves on.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// HTTP request failed
    HttpError(String),
    /// Zoom level not supported by this provider
    UnsupportedZoom(u8),
    /// Map type name not known to any provider
    UnsupportedMapType(String),
    /// Image format name not known to any provider
    UnsupportedFormat(String),
    /// Response body could not be decoded as an image
    InvalidResponse(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::HttpError(msg) => write!(f, "HTTP error: {}", msg),
            ProviderError::UnsupportedZoom(zoom) => {
                write!(f, "Zoom level {} not supported by provider", zoom)
            }
            ProviderError::UnsupportedMapType(name) => write!(
                f,
                "Unknown map type '{}' (expected satellite, terrain or streets)",
                name
            ),
            ProviderError::UnsupportedFormat(name) => {
                write!(f, "Unknown image format '{}'", name)
            }
            ProviderError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
        }
    }
}

impl std::error::Error for ProviderError {}

/// Kind of map a tile is requested from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapType {
    Satellite,
    Terrain,
    Streets,
}

impl MapType {
    /// All map types, in the order they are listed to users.
    pub const ALL: [MapType; 3] = [MapType::Satellite, MapType::Terrain, MapType::Streets];

    /// Name accepted on the command line and in render parameters.
    pub fn name(&self) -> &'static str {
        match self {
            MapType::Satellite => "satellite",
            MapType::Terrain => "terrain",
            MapType::Streets => "streets",
        }
    }

    /// Mapbox tileset identifier.
    pub fn map_id(&self) -> &'static str {
        match self {
            MapType::Satellite => "mapbox.satellite",
            MapType::Terrain => "mapbox.terrain-rgb",
            MapType::Streets => "mapbox.streets",
        }
    }
}

impl fmt::Display for MapType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MapType {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MapType::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| ProviderError::UnsupportedMapType(s.to_string()))
    }
}

/// Raster encoding requested from the tile server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageFormat {
    Png,
    Png32,
    Png64,
    Png128,
    Png256,
    PngRaw,
    Jpeg70,
    Jpeg80,
    #[default]
    Jpeg90,
}

impl ImageFormat {
    const ALL: [ImageFormat; 9] = [
        ImageFormat::Png,
        ImageFormat::Png32,
        ImageFormat::Png64,
        ImageFormat::Png128,
        ImageFormat::Png256,
        ImageFormat::PngRaw,
        ImageFormat::Jpeg70,
        ImageFormat::Jpeg80,
        ImageFormat::Jpeg90,
    ];

    /// URL file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Png32 => "png32",
            ImageFormat::Png64 => "png64",
            ImageFormat::Png128 => "png128",
            ImageFormat::Png256 => "png256",
            ImageFormat::PngRaw => "pngraw",
            ImageFormat::Jpeg70 => "jpg70",
            ImageFormat::Jpeg80 => "jpg80",
            ImageFormat::Jpeg90 => "jpg90",
        }
    }

    /// Human-facing name, as used in configuration files.
    pub fn name(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Png32 => "png-32",
            ImageFormat::Png64 => "png-64",
            ImageFormat::Png128 => "png-128",
            ImageFormat::Png256 => "png-256",
            ImageFormat::PngRaw => "png-raw",
            ImageFormat::Jpeg70 => "jpeg-70",
            ImageFormat::Jpeg80 => "jpeg-80",
            ImageFormat::Jpeg90 => "jpeg-90",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ImageFormat {
    type Err = ProviderError;

    /// Accepts either the configuration name (`jpeg-90`) or the URL
    /// extension (`jpg90`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        ImageFormat::ALL
            .into_iter()
            .find(|f| f.name() == lower || f.extension() == lower)
            .ok_or_else(|| ProviderError::UnsupportedFormat(s.to_string()))
    }
}

/// Capability to fetch one decoded map tile.
///
/// Implementations must be shareable across worker threads.
pub trait TileSource: Send + Sync {
    /// Fetches and decodes the tile at `tile`.
    ///
    /// `high_resolution` requests the double-density (512 px) variant.
    fn fetch_tile(
        &self,
        map_type: MapType,
        tile: TileCoord,
        format: ImageFormat,
        high_resolution: bool,
    ) -> Result<TileRaster, ProviderError>;

    /// Returns the source's name for logging and identification.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_type_from_str() {
        assert_eq!("satellite".parse::<MapType>().unwrap(), MapType::Satellite);
        assert_eq!("terrain".parse::<MapType>().unwrap(), MapType::Terrain);
        assert_eq!("streets".parse::<MapType>().unwrap(), MapType::Streets);
    }

    #[test]
    fn test_unknown_map_type() {
        let err = "foo".parse::<MapType>().unwrap_err();
        assert_eq!(err, ProviderError::UnsupportedMapType("foo".to_string()));
        assert!(err.to_string().contains("'foo'"));
    }

    #[test]
    fn test_map_ids() {
        assert_eq!(MapType::Terrain.map_id(), "mapbox.terrain-rgb");
        assert_eq!(MapType::Satellite.map_id(), "mapbox.satellite");
        assert_eq!(MapType::Streets.map_id(), "mapbox.streets");
    }

    #[test]
    fn test_image_format_parsing() {
        assert_eq!("jpeg-90".parse::<ImageFormat>().unwrap(), ImageFormat::Jpeg90);
        assert_eq!("jpg90".parse::<ImageFormat>().unwrap(), ImageFormat::Jpeg90);
        assert_eq!("PNG-RAW".parse::<ImageFormat>().unwrap(), ImageFormat::PngRaw);
        assert!(matches!(
            "tiff".parse::<ImageFormat>(),
            Err(ProviderError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_default_format_is_jpeg_90() {
        assert_eq!(ImageFormat::default(), ImageFormat::Jpeg90);
        assert_eq!(ImageFormat::default().extension(), "jpg90");
    }
}
