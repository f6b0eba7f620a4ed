//! Render entry point.
//!
//! A render walks through a fixed sequence of phases:
//!
//! ```text
//! Enumerating -> Fetching -> AllTilesSettled -> MosaicBuilding -> Done
//!       \            \                               \
//!        +------------+-------------------------------+--> Failed
//! ```
//!
//! The scratch directory lives exactly as long as the [`RenderJob`] and is
//! removed whatever the outcome.

use std::fmt;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{error, info};

use crate::config::RenderConfig;
use crate::coord::{BoundingBox, TileCoord};
use crate::enumerate::tiles_for_bbox;
use crate::error::{RenderError, RenderResult};
use crate::mosaic::MosaicBuilder;
use crate::pool::{FetchJob, FetchWorkerPool};
use crate::provider::{MapType, TileSource};

/// Prefix of scratch directory names.
pub const SCRATCH_PREFIX: &str = "terrain-rgb";

/// Parameters of one render request.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderParams {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
    pub zoom: u8,
    pub output: PathBuf,
    /// `"satellite"`, `"terrain"` or `"streets"`
    pub map_type: String,
}

impl RenderParams {
    pub fn bounding_box(&self) -> RenderResult<BoundingBox> {
        BoundingBox::new(self.min_lat, self.max_lat, self.min_lng, self.max_lng)
            .map_err(|e| RenderError::Configuration(e.to_string()))
    }

    pub fn parse_map_type(&self) -> RenderResult<MapType> {
        self.map_type
            .parse::<MapType>()
            .map_err(|e| RenderError::Configuration(e.to_string()))
    }
}

/// Phase of a render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPhase {
    Enumerating,
    Fetching,
    AllTilesSettled,
    MosaicBuilding,
    Done,
    Failed,
}

impl RenderPhase {
    /// Whether moving from `self` to `next` is allowed.
    pub fn can_advance_to(self, next: RenderPhase) -> bool {
        use RenderPhase::*;
        matches!(
            (self, next),
            (Enumerating, Fetching)
                | (Fetching, AllTilesSettled)
                | (AllTilesSettled, MosaicBuilding)
                | (MosaicBuilding, Done)
                | (Enumerating | Fetching | MosaicBuilding, Failed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, RenderPhase::Done | RenderPhase::Failed)
    }
}

impl fmt::Display for RenderPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RenderPhase::Enumerating => "enumerating",
            RenderPhase::Fetching => "fetching",
            RenderPhase::AllTilesSettled => "all tiles settled",
            RenderPhase::MosaicBuilding => "building mosaic",
            RenderPhase::Done => "done",
            RenderPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Tracks and logs phase transitions.
#[derive(Debug)]
struct PhaseTracker {
    phase: RenderPhase,
}

impl PhaseTracker {
    fn new() -> Self {
        info!(phase = %RenderPhase::Enumerating, "Render started");
        Self {
            phase: RenderPhase::Enumerating,
        }
    }

    fn advance(&mut self, next: RenderPhase) {
        debug_assert!(
            self.phase.can_advance_to(next),
            "invalid render transition {} -> {}",
            self.phase,
            next
        );
        info!(from = %self.phase, to = %next, "Render phase");
        self.phase = next;
    }

    /// Moves to `Failed` and hands the error back.
    fn fail(&mut self, err: RenderError) -> RenderError {
        error!(phase = %self.phase, error = %err, "Render failed");
        self.advance(RenderPhase::Failed);
        err
    }
}

/// One render in progress: what is being rendered and its scratch space.
///
/// Dropping the job removes the scratch directory and everything in it.
#[derive(Debug)]
pub struct RenderJob {
    bbox: BoundingBox,
    zoom: u8,
    map_type: MapType,
    output: PathBuf,
    scratch: TempDir,
}

impl RenderJob {
    /// Creates the job and its scratch directory.
    pub fn create(
        bbox: BoundingBox,
        zoom: u8,
        map_type: MapType,
        output: PathBuf,
        scratch_root: Option<&Path>,
    ) -> RenderResult<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(SCRATCH_PREFIX);
        let scratch = match scratch_root {
            Some(root) => builder
                .tempdir_in(root)
                .map_err(|e| RenderError::io(root, e))?,
            None => builder
                .tempdir()
                .map_err(|e| RenderError::io(std::env::temp_dir(), e))?,
        };

        info!(scratch = %scratch.path().display(), "Scratch directory created");
        Ok(Self {
            bbox,
            zoom,
            map_type,
            output,
            scratch,
        })
    }

    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn map_type(&self) -> MapType {
        self.map_type
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn scratch_dir(&self) -> &Path {
        self.scratch.path()
    }

    fn fetch_job(&self, config: &RenderConfig) -> FetchJob<'_> {
        FetchJob {
            map_type: self.map_type,
            format: config.image_format(),
            high_resolution: config.high_resolution(),
            scratch_dir: self.scratch.path(),
        }
    }
}

/// Summary of a finished render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderReport {
    /// Tiles covering the bounding box.
    pub tiles: usize,
    /// Tiles whose samples reached the mosaic.
    pub written: usize,
    /// Tiles skipped because their fetch failed.
    pub failed: usize,
    pub output: PathBuf,
}

/// Runs renders against a tile source and a mosaic builder.
pub struct Renderer<S, M> {
    source: S,
    mosaic: M,
    config: RenderConfig,
}

impl<S, M> Renderer<S, M>
where
    S: TileSource,
    M: MosaicBuilder,
{
    pub fn new(source: S, mosaic: M, config: RenderConfig) -> Self {
        Self {
            source,
            mosaic,
            config,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn mosaic(&self) -> &M {
        &self.mosaic
    }

    /// Renders the elevation raster described by `params`.
    ///
    /// Request validation happens first; an invalid map type or bounding
    /// box, or more than [`crate::enumerate::MAX_TILES`] tiles, fails
    /// before any scratch space is created or any tile is fetched.
    pub fn render(&self, params: &RenderParams) -> RenderResult<RenderReport> {
        let map_type = params.parse_map_type()?;

        let mut phase = PhaseTracker::new();
        let (bbox, tiles) = match self.plan(params) {
            Ok(plan) => plan,
            Err(e) => return Err(phase.fail(e)),
        };
        let job = match RenderJob::create(
            bbox,
            params.zoom,
            map_type,
            params.output.clone(),
            self.config.scratch_root(),
        ) {
            Ok(job) => job,
            Err(e) => return Err(phase.fail(e)),
        };
        info!(
            bbox = %job.bbox(),
            zoom = job.zoom(),
            map_type = %job.map_type(),
            tiles = tiles.len(),
            "Tiles enumerated"
        );

        phase.advance(RenderPhase::Fetching);
        let pool = FetchWorkerPool::new(self.config.pool_config());
        let report = match pool.run(&self.source, &job.fetch_job(&self.config), tiles) {
            Ok(report) => report,
            Err(e) => return Err(phase.fail(e)),
        };
        phase.advance(RenderPhase::AllTilesSettled);

        phase.advance(RenderPhase::MosaicBuilding);
        if let Err(e) = self.mosaic.build(job.scratch_dir(), job.output()) {
            return Err(phase.fail(e.into()));
        }
        phase.advance(RenderPhase::Done);

        info!(
            output = %job.output().display(),
            written = report.written,
            failed = report.failed,
            "Render complete"
        );
        Ok(RenderReport {
            tiles: report.submitted,
            written: report.written,
            failed: report.failed,
            output: job.output().to_path_buf(),
        })
    }

    fn plan(&self, params: &RenderParams) -> RenderResult<(BoundingBox, Vec<TileCoord>)> {
        let bbox = params.bounding_box()?;
        let tiles = tiles_for_bbox(&bbox, params.zoom)?;
        Ok((bbox, tiles))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(map_type: &str) -> RenderParams {
        RenderParams {
            min_lat: 10.0,
            max_lat: 10.1,
            min_lng: 20.0,
            max_lng: 20.1,
            zoom: 10,
            output: PathBuf::from("out.tif"),
            map_type: map_type.to_string(),
        }
    }

    #[test]
    fn test_phase_transitions() {
        use RenderPhase::*;

        assert!(Enumerating.can_advance_to(Fetching));
        assert!(Fetching.can_advance_to(AllTilesSettled));
        assert!(AllTilesSettled.can_advance_to(MosaicBuilding));
        assert!(MosaicBuilding.can_advance_to(Done));
        assert!(Fetching.can_advance_to(Failed));

        assert!(!Enumerating.can_advance_to(MosaicBuilding));
        assert!(!Done.can_advance_to(Failed));
        assert!(!Failed.can_advance_to(Enumerating));
        assert!(!Fetching.can_advance_to(Fetching));
    }

    #[test]
    fn test_terminal_phases() {
        assert!(RenderPhase::Done.is_terminal());
        assert!(RenderPhase::Failed.is_terminal());
        assert!(!RenderPhase::Fetching.is_terminal());
    }

    #[test]
    fn test_params_validation() {
        assert_eq!(params("terrain").parse_map_type().unwrap(), MapType::Terrain);
        assert!(matches!(
            params("foo").parse_map_type(),
            Err(RenderError::Configuration(_))
        ));

        let mut inverted = params("terrain");
        inverted.min_lat = 11.0;
        assert!(matches!(
            inverted.bounding_box(),
            Err(RenderError::Configuration(_))
        ));
    }

    #[test]
    fn test_job_scratch_removed_on_drop() {
        let root = tempfile::TempDir::new().unwrap();
        let bbox = params("terrain").bounding_box().unwrap();

        let job = RenderJob::create(
            bbox,
            10,
            MapType::Terrain,
            PathBuf::from("out.tif"),
            Some(root.path()),
        )
        .unwrap();
        assert_eq!(job.bbox(), &bbox);
        assert_eq!(job.zoom(), 10);
        assert_eq!(job.map_type(), MapType::Terrain);
        assert_eq!(job.output(), Path::new("out.tif"));

        let scratch = job.scratch_dir().to_path_buf();
        std::fs::write(scratch.join("1_2_3.csv"), "x,y,z\n").unwrap();

        assert!(scratch.starts_with(root.path()));
        assert!(scratch
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with(SCRATCH_PREFIX));

        drop(job);
        assert!(!scratch.exists());
    }

    #[test]
    fn test_job_missing_scratch_root() {
        let root = tempfile::TempDir::new().unwrap();
        let bbox = params("terrain").bounding_box().unwrap();

        let result = RenderJob::create(
            bbox,
            10,
            MapType::Terrain,
            PathBuf::from("out.tif"),
            Some(&root.path().join("missing")),
        );
        assert!(matches!(result, Err(RenderError::Io { .. })));
    }
}
