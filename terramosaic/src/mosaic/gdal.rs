//! GDAL command-line mosaic builder.
//!
//! Each `<tile>.csv` is sorted into `<tile>.xyz` (rows ordered by latitude,
//! then longitude, as the XYZ driver requires), converted with
//! `gdal_translate` into `<tile>.tif`, and all tiles are merged with
//! `gdalwarp`.

use std::cmp::Ordering;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use super::{MosaicBuilder, MosaicError};
use crate::writer::SAMPLE_EXTENSION;

/// Default GDAL block cache and warp memory, in megabytes.
pub const DEFAULT_GDAL_CACHE_MB: u32 = 3000;

/// GDAL tool locations and memory limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GdalConfig {
    translate_program: String,
    warp_program: String,
    cache_max_mb: u32,
    warp_memory_mb: u32,
}

impl Default for GdalConfig {
    fn default() -> Self {
        Self {
            translate_program: "gdal_translate".to_string(),
            warp_program: "gdalwarp".to_string(),
            cache_max_mb: DEFAULT_GDAL_CACHE_MB,
            warp_memory_mb: DEFAULT_GDAL_CACHE_MB,
        }
    }
}

impl GdalConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific `gdal_translate` executable.
    pub fn with_translate_program(mut self, program: impl Into<String>) -> Self {
        self.translate_program = program.into();
        self
    }

    /// Use a specific `gdalwarp` executable.
    pub fn with_warp_program(mut self, program: impl Into<String>) -> Self {
        self.warp_program = program.into();
        self
    }

    /// Set `GDAL_CACHEMAX` for the warp step.
    pub fn with_cache_max_mb(mut self, mb: u32) -> Self {
        self.cache_max_mb = mb;
        self
    }

    /// Set the warp working memory (`-wm`).
    pub fn with_warp_memory_mb(mut self, mb: u32) -> Self {
        self.warp_memory_mb = mb;
        self
    }

    pub fn translate_program(&self) -> &str {
        &self.translate_program
    }

    pub fn warp_program(&self) -> &str {
        &self.warp_program
    }

    pub fn cache_max_mb(&self) -> u32 {
        self.cache_max_mb
    }

    pub fn warp_memory_mb(&self) -> u32 {
        self.warp_memory_mb
    }
}

/// Mosaic builder that shells out to GDAL.
#[derive(Debug, Clone, Default)]
pub struct GdalMosaicBuilder {
    config: GdalConfig,
}

impl GdalMosaicBuilder {
    pub fn new(config: GdalConfig) -> Self {
        Self { config }
    }

    /// Checks that both GDAL tools can be run.
    pub fn check_tools(&self) -> Result<(), MosaicError> {
        check_tool_available(&self.config.translate_program)?;
        check_tool_available(&self.config.warp_program)?;
        Ok(())
    }

    fn translate(&self, xyz: &Path, tif: &Path) -> Result<(), MosaicError> {
        let mut cmd = Command::new(&self.config.translate_program);
        cmd.arg(xyz).arg(tif);
        run_tool(&self.config.translate_program, cmd)
    }

    fn warp(&self, tifs: &[PathBuf], output: &Path) -> Result<(), MosaicError> {
        let cache_max = self.config.cache_max_mb.to_string();
        let warp_memory = self.config.warp_memory_mb.to_string();

        let mut cmd = Command::new(&self.config.warp_program);
        cmd.args([
            "--config",
            "GDAL_CACHEMAX",
            cache_max.as_str(),
            "-wm",
            warp_memory.as_str(),
        ])
        .args(tifs)
        .arg(output);
        run_tool(&self.config.warp_program, cmd)
    }
}

impl MosaicBuilder for GdalMosaicBuilder {
    fn build(&self, scratch_dir: &Path, output: &Path) -> Result<(), MosaicError> {
        let inputs = sample_files(scratch_dir)?;
        if inputs.is_empty() {
            return Err(MosaicError::NoInputs);
        }
        self.check_tools()?;

        info!(files = inputs.len(), output = %output.display(), "Building mosaic");

        let mut tifs = Vec::with_capacity(inputs.len());
        for csv in &inputs {
            let xyz = csv.with_extension("xyz");
            let rows = sort_samples(csv, &xyz)?;
            let tif = csv.with_extension("tif");
            self.translate(&xyz, &tif)?;
            debug!(file = %tif.display(), rows, "Tile raster created");
            tifs.push(tif);
        }

        self.warp(&tifs, output)?;
        info!(output = %output.display(), "Mosaic complete");
        Ok(())
    }
}

/// Lists sample files in `dir`, sorted by path.
fn sample_files(dir: &Path) -> Result<Vec<PathBuf>, MosaicError> {
    let entries = fs::read_dir(dir).map_err(|e| MosaicError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| MosaicError::io(dir, e))?.path();
        if path.extension().and_then(|e| e.to_str()) == Some(SAMPLE_EXTENSION) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Copies the header of `input` to `output`, followed by its data rows
/// sorted by latitude and then longitude, both ascending.
///
/// Returns the number of data rows written.
pub fn sort_samples(input: &Path, output: &Path) -> Result<usize, MosaicError> {
    let text = fs::read_to_string(input).map_err(|e| MosaicError::io(input, e))?;
    let mut lines = text.lines();
    let header = lines.next().unwrap_or_default();

    let mut rows = Vec::new();
    for (idx, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let (lon, lat) = parse_position(line).map_err(|reason| MosaicError::MalformedSample {
            path: input.to_path_buf(),
            line: idx + 2,
            reason,
        })?;
        rows.push((lat, lon, line));
    }

    rows.sort_by(|a, b| match a.0.total_cmp(&b.0) {
        Ordering::Equal => a.1.total_cmp(&b.1),
        other => other,
    });

    let file = fs::File::create(output).map_err(|e| MosaicError::io(output, e))?;
    let mut out = BufWriter::new(file);
    let write = |out: &mut BufWriter<fs::File>| -> std::io::Result<()> {
        writeln!(out, "{}", header)?;
        for (_, _, line) in &rows {
            writeln!(out, "{}", line)?;
        }
        out.flush()
    };
    write(&mut out).map_err(|e| MosaicError::io(output, e))?;

    Ok(rows.len())
}

fn parse_position(line: &str) -> Result<(f64, f64), String> {
    let mut fields = line.split(',');
    let mut next = |name: &str| -> Result<f64, String> {
        let field = fields
            .next()
            .ok_or_else(|| format!("missing {}", name))?
            .trim();
        field
            .parse::<f64>()
            .map_err(|e| format!("bad {} '{}': {}", name, field, e))
    };
    let lon = next("longitude")?;
    let lat = next("latitude")?;
    Ok((lon, lat))
}

/// Check if a specific tool is available.
fn check_tool_available(tool: &str) -> Result<(), MosaicError> {
    match Command::new(tool).arg("--version").output() {
        Ok(output) if output.status.success() => Ok(()),
        Ok(output) => Err(MosaicError::ToolUnavailable {
            tool: tool.to_string(),
            reason: format!(
                "'--version' exited with {}. Please ensure GDAL is properly installed.",
                output.status
            ),
        }),
        Err(e) => Err(MosaicError::ToolUnavailable {
            tool: tool.to_string(),
            reason: format!(
                "{}. Install GDAL with your package manager (e.g. 'apt install gdal-bin')",
                e
            ),
        }),
    }
}

fn run_tool(tool: &str, mut cmd: Command) -> Result<(), MosaicError> {
    debug!(command = ?cmd, "Running GDAL tool");
    let output = cmd.output().map_err(|e| MosaicError::ToolUnavailable {
        tool: tool.to_string(),
        reason: e.to_string(),
    })?;

    if !output.status.success() {
        return Err(MosaicError::ToolFailed {
            tool: tool.to_string(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(())
}
