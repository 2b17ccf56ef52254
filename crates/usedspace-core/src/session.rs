/// A scanned, rolled-up tree ready to serve a presentation layer.
///
/// `Session` is the pull-based surface a UI talks to: it owns nothing but a
/// handle to the store and the root path, and every call re-reads the
/// store. Nothing is pushed to observers; after a successful delete the
/// caller re-queries whatever it displays.
use crate::details::{self, Properties};
use crate::error::{Error, Result};
use crate::model::{Entry, SharedStore};
use crate::mutation::{self, Deletion};
use crate::query;
use crate::rollup::rollup;
use crate::scanner::{start_scan, ScanConfig, ScanReport};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug)]
pub struct Session {
    root: PathBuf,
    store: SharedStore,
    skipped: u64,
    scan_duration: Duration,
}

impl Session {
    /// Scan `root`, wait for every worker, then roll sizes up.
    pub fn open(root: PathBuf, config: ScanConfig) -> Result<Self> {
        let report = start_scan(root, config)?.wait()?;
        Ok(Self::from_report(report))
    }

    /// Finish a scan that was started and awaited by the caller.
    pub fn from_report(report: ScanReport) -> Self {
        rollup(&report.store, &report.root);
        Self {
            root: report.root,
            store: report.store,
            skipped: report.skipped,
            scan_duration: report.duration,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Total bytes of every file under the root.
    pub fn total_size(&self) -> u64 {
        self.store.get(&self.root).map(|r| r.size).unwrap_or(0)
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Objects that could not be read during the scan.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    pub fn scan_duration(&self) -> Duration {
        self.scan_duration
    }

    pub fn get(&self, path: &Path) -> Option<Entry> {
        self.store.get(path)
    }

    pub fn direct_children(&self, dir: &Path) -> Vec<Entry> {
        query::direct_children(&self.store, dir)
    }

    pub fn children_checked(&self, dir: &Path) -> Result<Vec<Entry>> {
        query::children_checked(&self.store, dir)
    }

    pub fn delete(&self, entry: &Entry) -> Result<Deletion> {
        mutation::delete_entry(&self.store, entry, &self.root)
    }

    /// Properties of a stored object. Unknown paths are reported as stale.
    pub fn properties(&self, path: &Path) -> Result<Properties> {
        let entry = self.store.get(path).ok_or_else(|| Error::StaleReference {
            path: path.to_path_buf(),
        })?;
        details::properties(&entry)
    }
}
