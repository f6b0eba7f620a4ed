//! Scratch sample files, one per tile.
//!
//! Each file is plain CSV: a header row `x,y,z` (the axis names GDAL's XYZ
//! driver expects) followed by `longitude,latitude,elevation` rows.

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::coord::TileCoord;
use crate::error::{RenderError, RenderResult};
use crate::extract::Sample;

/// Header row of every sample file.
pub const SAMPLE_HEADER: &str = "x,y,z";

/// Extension of sample files.
pub const SAMPLE_EXTENSION: &str = "csv";

/// File name used for `tile`'s samples.
pub fn sample_file_name(tile: TileCoord) -> String {
    format!("{}_{}_{}.{}", tile.x, tile.y, tile.z, SAMPLE_EXTENSION)
}

/// Writes `samples` for `tile` into a new file under `dir`.
///
/// Fails if the file already exists. The file is flushed and closed before
/// this returns.
pub fn write_tile(dir: &Path, tile: TileCoord, samples: &[Sample]) -> RenderResult<PathBuf> {
    let path = dir.join(sample_file_name(tile));

    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .map_err(|e| RenderError::io(&path, e))?;

    let mut out = BufWriter::new(file);
    write_samples(&mut out, samples).map_err(|e| RenderError::io(&path, e))?;

    out.into_inner()
        .map_err(|e| RenderError::io(&path, e.into_error()))?;

    Ok(path)
}

fn write_samples<W: Write>(out: &mut W, samples: &[Sample]) -> std::io::Result<()> {
    writeln!(out, "{}", SAMPLE_HEADER)?;
    for s in samples {
        writeln!(out, "{},{},{}", s.longitude, s.latitude, s.elevation)?;
    }
    out.flush()
}
