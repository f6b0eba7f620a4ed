//! Raster mosaic construction
//!
//! Once every tile has settled, the scratch directory holds one sample file
//! per written tile. A [`MosaicBuilder`] merges those files into the final
//! georeferenced raster. [`GdalMosaicBuilder`] does this with the GDAL
//! command-line tools.

mod gdal;

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub use gdal::{sort_samples, GdalConfig, GdalMosaicBuilder, DEFAULT_GDAL_CACHE_MB};

/// Errors from the raster-merge step.
#[derive(Debug, Error)]
pub enum MosaicError {
    #[error("no sample files to merge")]
    NoInputs,

    #[error("'{tool}' is not available: {reason}")]
    ToolUnavailable { tool: String, reason: String },

    #[error("'{tool}' failed ({status}): {stderr}")]
    ToolFailed {
        tool: String,
        status: String,
        stderr: String,
    },

    #[error("malformed sample row {line} in {}: {reason}", path.display())]
    MalformedSample {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl MosaicError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        MosaicError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Merges the per-tile sample files of a render into one raster.
pub trait MosaicBuilder: Send + Sync {
    /// Builds `output` from the sample files in `scratch_dir`.
    ///
    /// Every sample file is complete and closed when this is called.
    fn build(&self, scratch_dir: &Path, output: &Path) -> Result<(), MosaicError>;
}
