//! Mapbox Raster Tiles API source.
//!
//! # URL Pattern
//!
//! `https://api.mapbox.com/v4/{map_id}/{z}/{x}/{y}{@2x}.{ext}?access_token={token}`
//!
//! - `map_id` is `mapbox.satellite`, `mapbox.terrain-rgb` or `mapbox.streets`
//! - `@2x` selects the 512 px high-density variant
//! - `ext` selects the encoding, e.g. `jpg90` or `pngraw`
//!
//! Elevation is only meaningful for the `terrain` map type; other map types
//! are fetched the same way and decoded with the terrain-RGB formula as-is.

use tracing::trace;

use crate::coord::{TileCoord, MAX_ZOOM, MIN_ZOOM};
use crate::provider::{HttpClient, ImageFormat, MapType, ProviderError, TileSource};
use crate::tile::TileRaster;

/// Base URL of the Raster Tiles API.
pub const MAPBOX_BASE_URL: &str = "https://api.mapbox.com/v4";

/// Tile source backed by the Mapbox Raster Tiles API.
///
/// # Example
///
/// ```ignore
/// use terramosaic::provider::{MapboxTileSource, ReqwestClient};
///
/// let client = ReqwestClient::new()?;
/// let source = MapboxTileSource::new(client, "pk.your_token");
/// ```
pub struct MapboxTileSource<C: HttpClient> {
    http_client: C,
    access_token: String,
    base_url: String,
}

impl<C: HttpClient> MapboxTileSource<C> {
    pub fn new(http_client: C, access_token: impl Into<String>) -> Self {
        Self {
            http_client,
            access_token: access_token.into(),
            base_url: MAPBOX_BASE_URL.to_string(),
        }
    }

    /// Points the source at a different API host (mirrors, test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Builds the tile URL for the given request.
    fn build_url(
        &self,
        map_type: MapType,
        tile: TileCoord,
        format: ImageFormat,
        high_resolution: bool,
    ) -> String {
        format!(
            "{}/{}/{}/{}/{}{}.{}?access_token={}",
            self.base_url,
            map_type.map_id(),
            tile.z,
            tile.x,
            tile.y,
            if high_resolution { "@2x" } else { "" },
            format.extension(),
            self.access_token
        )
    }
}

impl<C: HttpClient> TileSource for MapboxTileSource<C> {
    fn fetch_tile(
        &self,
        map_type: MapType,
        tile: TileCoord,
        format: ImageFormat,
        high_resolution: bool,
    ) -> Result<TileRaster, ProviderError> {
        if !(MIN_ZOOM..=MAX_ZOOM).contains(&tile.z) {
            return Err(ProviderError::UnsupportedZoom(tile.z));
        }

        let url = self.build_url(map_type, tile, format, high_resolution);
        let body = self.http_client.get(&url)?;
        trace!(tile = %tile, bytes = body.len(), "Tile downloaded");

        TileRaster::from_bytes(tile, &body)
            .map_err(|e| ProviderError::InvalidResponse(format!("tile {}: {}", tile, e)))
    }

    fn name(&self) -> &str {
        "Mapbox"
    }
}
