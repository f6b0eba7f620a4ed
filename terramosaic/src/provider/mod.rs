//! Map tile provider abstraction
//!
//! This module provides the [`TileSource`] capability used by the fetch
//! workers, the [`HttpClient`] seam beneath it, and the Mapbox implementation.
//!
//! ```ignore
//! use terramosaic::provider::{MapboxTileSource, ReqwestClient};
//!
//! let http_client = ReqwestClient::new()?;
//! let source = MapboxTileSource::new(http_client, token);
//! ```

mod http;
mod mapbox;
mod types;

pub use http::{HttpClient, ReqwestClient, DEFAULT_TIMEOUT_SECS};
pub use mapbox::{MapboxTileSource, MAPBOX_BASE_URL};
pub use types::{ImageFormat, MapType, ProviderError, TileSource};

#[cfg(test)]
pub use http::tests::MockHttpClient;
