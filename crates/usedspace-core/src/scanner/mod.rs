/// Scanner module — populates a [`SizeStore`] from a directory subtree.
///
/// The walk runs on a background thread that fans out over a bounded
/// `jwalk` worker pool. Workers insert straight into the shared store.
/// The store is only handed back through [`ScanHandle::wait`], which
/// consumes the handle: completion is observed exactly once, and nothing
/// can read a partially-populated store.
mod parallel;
pub mod progress;

use crate::error::{Error, Result};
use crate::model::{Entry, SharedStore, SizeStore};
use progress::ScanProgress;

use crossbeam_channel::Receiver;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tracing::info;

/// Maximum number of progress messages that may queue up in the channel.
///
/// Progress is advisory: when the channel is full (or nobody is draining
/// it) further messages are dropped rather than stalling the workers.
pub const PROGRESS_CHANNEL_CAPACITY: usize = 4_096;

/// Tunables for a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Upper bound on concurrent directory-reading workers. `0` is treated as `1`.
    pub threads: usize,
    /// Send a `ScanProgress::Update` roughly every this many entries.
    /// `0` disables updates.
    pub progress_interval: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            threads: num_cpus::get(),
            progress_interval: 5_000,
        }
    }
}

impl ScanConfig {
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_progress_interval(mut self, every: u64) -> Self {
        self.progress_interval = every;
        self
    }
}

/// Counters produced by the walk itself.
#[derive(Debug, Clone, Copy)]
pub(crate) struct WalkStats {
    pub skipped: u64,
    pub duration: Duration,
}

/// Result of a completed scan. Directory sizes are still zero: run
/// [`crate::rollup::rollup`] before querying.
#[derive(Debug)]
pub struct ScanReport {
    pub root: PathBuf,
    pub store: SharedStore,
    /// Number of entries in the store, root included.
    pub entries: usize,
    /// Objects left out because they could not be stat'ed or listed.
    pub skipped: u64,
    pub duration: Duration,
}

/// Handle to a running scan.
pub struct ScanHandle {
    /// Advisory progress from the workers.
    pub progress_rx: Receiver<ScanProgress>,
    root: PathBuf,
    store: SharedStore,
    done_rx: Receiver<WalkStats>,
    thread: Option<thread::JoinHandle<()>>,
}

impl ScanHandle {
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Non-blocking: `true` once the completion signal is ready to be taken.
    pub fn is_finished(&self) -> bool {
        !self.done_rx.is_empty()
    }

    /// Block until every worker has finished, then hand over the store.
    pub fn wait(mut self) -> Result<ScanReport> {
        let stats = self.done_rx.recv().map_err(|_| Error::ScanInterrupted)?;
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }

        let entries = self.store.len();
        info!(
            "Scan of {} finished: {} entries, {} skipped, {:?}",
            self.root.display(),
            entries,
            stats.skipped,
            stats.duration
        );

        Ok(ScanReport {
            root: self.root,
            store: self.store,
            entries,
            skipped: stats.skipped,
            duration: stats.duration,
        })
    }
}

/// Start scanning `root_path` on a background thread.
///
/// The root is checked up front: if it cannot be stat'ed or listed, or is
/// not a directory, the scan never starts and the error is returned here.
/// Failures on anything below the root are skipped.
pub fn start_scan(root_path: PathBuf, config: ScanConfig) -> Result<ScanHandle> {
    let meta = std::fs::metadata(&root_path).map_err(|source| Error::RootUnreadable {
        path: root_path.clone(),
        source,
    })?;
    if !meta.is_dir() {
        return Err(Error::RootNotDirectory { path: root_path });
    }
    std::fs::read_dir(&root_path).map_err(|source| Error::RootUnreadable {
        path: root_path.clone(),
        source,
    })?;

    let (progress_tx, progress_rx) =
        crossbeam_channel::bounded::<ScanProgress>(PROGRESS_CHANNEL_CAPACITY);
    let (done_tx, done_rx) = crossbeam_channel::bounded::<WalkStats>(1);

    let store = SizeStore::shared();
    store.set(Entry::directory(root_path.clone()));

    let worker_store = store.clone();
    let worker_root = root_path.clone();

    let thread = thread::Builder::new()
        .name("usedspace-scanner".into())
        .spawn(move || {
            info!(
                "Starting scan of {} with {} workers",
                worker_root.display(),
                config.threads.max(1)
            );
            let stats =
                parallel::scan_parallel(&worker_root, &config, &worker_store, &progress_tx);
            let _ = done_tx.send(stats);
        })
        .expect("failed to spawn scanner thread");

    Ok(ScanHandle {
        progress_rx,
        root: root_path,
        store,
        done_rx,
        thread: Some(thread),
    })
}
