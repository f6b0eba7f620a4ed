//! Render error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::mosaic::MosaicError;

/// Fatal errors that stop a render.
///
/// Per-tile fetch failures ([`crate::provider::ProviderError`]) and per-pixel
/// decode failures ([`crate::tile::DecodeError`]) never surface here; they are
/// logged and skipped.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Invalid request, detected before any work starts.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Scratch storage failure.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The raster-merge step failed.
    #[error("mosaic failed: {0}")]
    ExternalTool(#[from] MosaicError),
}

impl RenderError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        RenderError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias for render operations.
pub type RenderResult<T> = Result<T, RenderError>;
