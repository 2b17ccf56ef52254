/// Deletion with incremental repair of the aggregate sizes.
///
/// The filesystem removal happens first. Only when it succeeds is the store
/// touched, and then the whole repair (ancestor sizes, the entry itself and,
/// for directories, every stored descendant) is applied in one transaction.
/// A failed removal leaves the store exactly as it was.
use crate::error::{Error, Result};
use crate::model::{ancestor_chain, Entry, SizeStore};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// What a successful [`delete_entry`] did to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deletion {
    pub path: PathBuf,
    /// Bytes subtracted from every ancestor up to the root.
    pub freed: u64,
    /// Stored descendants removed along with a deleted directory.
    pub purged: usize,
}

/// Delete `entry` from disk, then repair the store.
///
/// Only the path of `entry` is taken from the caller; its kind and size
/// come from the stored record.
///
/// - The scan root (or anything above it) is refused with
///   [`Error::RootProtected`].
/// - A path outside the scanned tree, or one the store does not know,
///   yields [`Error::StaleReference`], as does a target that has already
///   vanished from disk.
/// - A removal failure yields [`Error::Deletion`] with the cause.
///
/// None of these touch the store or the disk beyond the failed removal.
pub fn delete_entry(store: &SizeStore, entry: &Entry, root: &Path) -> Result<Deletion> {
    let path = entry.path.as_path();

    if root.starts_with(path) {
        return Err(Error::RootProtected {
            path: path.to_path_buf(),
        });
    }

    let stale = || Error::StaleReference {
        path: path.to_path_buf(),
    };

    if !path.starts_with(root) {
        return Err(stale());
    }
    let stored = store.get(path).ok_or_else(stale)?;

    if let Err(err) = std::fs::symlink_metadata(path) {
        if err.kind() == ErrorKind::NotFound {
            return Err(stale());
        }
    }

    let removed = if stored.is_dir {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };
    if let Err(source) = removed {
        warn!("Failed to delete {}: {source}", path.display());
        return Err(Error::Deletion {
            path: path.to_path_buf(),
            source,
        });
    }

    let deletion = store.transaction(|tx| {
        for ancestor in ancestor_chain(path, root) {
            tx.update_size(ancestor, |size| size.saturating_sub(stored.size));
        }

        let purged = if stored.is_dir {
            tx.remove_descendants(path)
        } else {
            0
        };
        tx.remove(path);

        Deletion {
            path: path.to_path_buf(),
            freed: stored.size,
            purged,
        }
    });

    info!(
        "Deleted {} ({} bytes, {} stale descendants purged)",
        deletion.path.display(),
        deletion.freed,
        deletion.purged
    );
    Ok(deletion)
}
