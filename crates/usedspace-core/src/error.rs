/// Error taxonomy for the size-aggregation engine.
///
/// Per-object scan failures are deliberately absent: they are absorbed by
/// the scanner and surface only as advisory `ScanProgress::Skipped`
/// messages plus a counter in the `ScanReport`.
use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias used throughout the engine.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The scan root could not be stat'ed or listed. Fatal to the scan.
    #[error("cannot read scan root {}: {source}", .path.display())]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The scan root exists but is not a directory.
    #[error("scan root {} is not a directory", .path.display())]
    RootNotDirectory { path: PathBuf },

    /// The target no longer exists on disk. Nothing in the store was touched.
    #[error("{} doesn't exist anymore", .path.display())]
    StaleReference { path: PathBuf },

    /// The scan root may never be deleted through the engine.
    #[error("refusing to delete the scan root {}", .path.display())]
    RootProtected { path: PathBuf },

    /// The filesystem removal failed. Nothing in the store was touched.
    #[error("{} can't be removed: {source}", .path.display())]
    Deletion {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The scan thread went away without signalling completion.
    #[error("scan thread exited before signalling completion")]
    ScanInterrupted,
}
