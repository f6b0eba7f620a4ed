//! Bounded fetch worker pool.
//!
//! The calling thread feeds every tile into a bounded queue and then blocks
//! on a [`CompletionCounter`] until each tile has settled, successfully or
//! not. Workers fetch, extract and write one tile at a time.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;

use parking_lot::{Condvar, Mutex};
use tracing::{debug, error, info, warn};

use crate::coord::TileCoord;
use crate::error::{RenderError, RenderResult};
use crate::extract::extract_samples;
use crate::provider::{ImageFormat, MapType, TileSource};
use crate::writer::write_tile;

/// Default number of fetch workers.
pub const DEFAULT_WORKERS: usize = 4;

/// Pool sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    /// Number of worker threads (minimum 1).
    pub workers: usize,
}

impl PoolConfig {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    /// Capacity of the tile queue.
    pub fn queue_capacity(&self) -> usize {
        self.workers.max(1) * 2
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::new(DEFAULT_WORKERS)
    }
}

/// Counts outstanding tiles; waiters wake when it reaches zero.
#[derive(Debug)]
pub struct CompletionCounter {
    remaining: Mutex<usize>,
    zero: Condvar,
}

impl CompletionCounter {
    pub fn new(count: usize) -> Self {
        Self {
            remaining: Mutex::new(count),
            zero: Condvar::new(),
        }
    }

    /// Marks `n` items as settled.
    pub fn settle(&self, n: usize) {
        let mut remaining = self.remaining.lock();
        *remaining = remaining.saturating_sub(n);
        if *remaining == 0 {
            self.zero.notify_all();
        }
    }

    /// Returns a guard that settles one item when dropped, also on unwind.
    pub fn settle_on_drop(&self) -> SettleGuard<'_> {
        SettleGuard { counter: self }
    }

    pub fn remaining(&self) -> usize {
        *self.remaining.lock()
    }

    /// Blocks until every item has settled.
    pub fn wait(&self) {
        let mut remaining = self.remaining.lock();
        while *remaining > 0 {
            self.zero.wait(&mut remaining);
        }
    }
}

/// Settles one item of a [`CompletionCounter`] on drop.
pub struct SettleGuard<'a> {
    counter: &'a CompletionCounter,
}

impl Drop for SettleGuard<'_> {
    fn drop(&mut self) {
        self.counter.settle(1);
    }
}

/// What every tile of one render is fetched as, and where samples go.
#[derive(Debug, Clone, Copy)]
pub struct FetchJob<'a> {
    pub map_type: MapType,
    pub format: ImageFormat,
    pub high_resolution: bool,
    pub scratch_dir: &'a Path,
}

/// Outcome of one pool run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolReport {
    /// Tiles handed to the pool.
    pub submitted: usize,
    /// Tiles whose sample file was written.
    pub written: usize,
    /// Tiles skipped because the fetch failed.
    pub failed: usize,
    /// Tiles drained without fetching after a fatal error.
    pub aborted: usize,
    /// Written sample files, sorted by path.
    pub files: Vec<PathBuf>,
}

#[derive(Default)]
struct Shared {
    files: Mutex<Vec<PathBuf>>,
    failed: AtomicUsize,
    aborted: AtomicUsize,
    abort: AtomicBool,
    first_error: Mutex<Option<RenderError>>,
}

impl Shared {
    fn record_fatal(&self, err: RenderError) {
        let mut slot = self.first_error.lock();
        if slot.is_none() {
            *slot = Some(err);
        }
        self.abort.store(true, Ordering::Release);
    }
}

/// Fixed-size pool of fetch workers.
#[derive(Debug, Clone, Default)]
pub struct FetchWorkerPool {
    config: PoolConfig,
}

impl FetchWorkerPool {
    pub fn new(config: PoolConfig) -> Self {
        Self {
            config: PoolConfig::new(config.workers),
        }
    }

    /// Fetches, extracts and writes every tile, returning once all settled.
    ///
    /// Fetch failures are logged and counted. The first sample-file I/O
    /// failure stops further fetching; the remaining tiles are drained and
    /// the error is returned.
    pub fn run<S>(
        &self,
        source: &S,
        job: &FetchJob<'_>,
        tiles: Vec<TileCoord>,
    ) -> RenderResult<PoolReport>
    where
        S: TileSource + ?Sized,
    {
        let submitted = tiles.len();
        let workers = self.config.workers;
        info!(
            tiles = submitted,
            workers,
            source = source.name(),
            map_type = %job.map_type,
            "Fetching tiles"
        );

        let counter = CompletionCounter::new(submitted);
        let shared = Shared::default();
        let (tx, rx) = crossbeam_channel::bounded::<TileCoord>(self.config.queue_capacity());

        thread::scope(|scope| {
            for id in 0..workers {
                let rx = rx.clone();
                let counter = &counter;
                let shared = &shared;
                scope.spawn(move || {
                    for tile in rx.iter() {
                        let _settled = counter.settle_on_drop();
                        process_tile(id, source, job, tile, shared);
                    }
                });
            }
            drop(rx);

            let mut sent = 0;
            for tile in tiles {
                if tx.send(tile).is_err() {
                    break;
                }
                sent += 1;
            }
            drop(tx);
            // Only reachable if every worker has gone away.
            counter.settle(submitted - sent);

            counter.wait();
        });

        let mut files = std::mem::take(&mut *shared.files.lock());
        files.sort();
        let report = PoolReport {
            submitted,
            written: files.len(),
            failed: shared.failed.load(Ordering::Acquire),
            aborted: shared.aborted.load(Ordering::Acquire),
            files,
        };

        if let Some(err) = shared.first_error.lock().take() {
            error!(
                written = report.written,
                aborted = report.aborted,
                error = %err,
                "Fetch phase aborted"
            );
            return Err(err);
        }

        info!(
            submitted = report.submitted,
            written = report.written,
            failed = report.failed,
            "All tiles settled"
        );
        Ok(report)
    }
}

fn process_tile<S>(worker: usize, source: &S, job: &FetchJob<'_>, tile: TileCoord, shared: &Shared)
where
    S: TileSource + ?Sized,
{
    if shared.abort.load(Ordering::Acquire) {
        shared.aborted.fetch_add(1, Ordering::AcqRel);
        return;
    }

    debug!(worker, tile = %tile, "Fetching tile");
    let raster = match source.fetch_tile(job.map_type, tile, job.format, job.high_resolution) {
        Ok(raster) => raster,
        Err(e) => {
            warn!(worker, tile = %tile, error = %e, "Tile fetch failed, skipping");
            shared.failed.fetch_add(1, Ordering::AcqRel);
            return;
        }
    };

    let samples = extract_samples(&raster);
    match write_tile(job.scratch_dir, tile, &samples) {
        Ok(path) => {
            debug!(worker, tile = %tile, samples = samples.len(), "Tile written");
            shared.files.lock().push(path);
        }
        Err(e) => shared.record_fatal(e),
    }
}
