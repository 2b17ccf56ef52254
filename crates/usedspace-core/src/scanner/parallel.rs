/// Parallel directory walker using `jwalk`.
///
/// `jwalk` reads directories on a rayon pool. Each time a worker finishes
/// reading one directory, `process_read_dir` runs on that same worker: the
/// children are stat'ed there (outside any lock) and inserted into the
/// shared store as one batch, so a directory listing costs a single write
/// lock no matter how many entries it has.
///
/// The consuming loop on the scan thread only drives the walk and picks up
/// directories that could not be listed. Those directories keep their own
/// entry; only their contents are missing.
use super::progress::ScanProgress;
use super::{ScanConfig, WalkStats};
use crate::model::{Entry, SharedStore};
use crossbeam_channel::Sender;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Walk `root_path` and insert one entry per object below it.
///
/// The root's own entry must already be in `store`.
pub(crate) fn scan_parallel(
    root_path: &Path,
    config: &ScanConfig,
    store: &SharedStore,
    progress_tx: &Sender<ScanProgress>,
) -> WalkStats {
    let start = Instant::now();

    let found = Arc::new(AtomicU64::new(1)); // the root
    let skipped = Arc::new(AtomicU64::new(0));

    let worker_store = store.clone();
    let worker_tx = progress_tx.clone();
    let worker_found = found.clone();
    let worker_skipped = skipped.clone();
    let worker_root = root_path.to_path_buf();
    let interval = config.progress_interval;

    let walker = jwalk::WalkDir::new(root_path)
        .skip_hidden(false)
        .follow_links(false)
        .sort(false)
        .parallelism(jwalk::Parallelism::RayonNewPool(config.threads.max(1)))
        .process_read_dir(move |depth, _dir, _state, children| {
            // The synthetic read that yields the root itself: already stored.
            if depth.is_none() {
                return;
            }

            let mut batch = Vec::with_capacity(children.len());
            for child in children.iter() {
                // Unreadable entries are reported by the consuming loop.
                let Ok(child) = child else { continue };
                let path = child.path();
                if path == worker_root {
                    continue;
                }

                if child.file_type().is_dir() {
                    batch.push(Entry::directory(path));
                    continue;
                }

                // Symlinks are recorded with their own length, never followed.
                match std::fs::symlink_metadata(&path) {
                    Ok(meta) => batch.push(Entry::file(path, meta.len())),
                    Err(err) => {
                        worker_skipped.fetch_add(1, Ordering::Relaxed);
                        debug!("Skipping {}: {err}", path.display());
                        report(
                            &worker_tx,
                            ScanProgress::Skipped {
                                path: path.to_string_lossy().into_owned(),
                                message: err.to_string(),
                            },
                        );
                    }
                }
            }

            let added = batch.len() as u64;
            let last_path = batch
                .last()
                .map(|e: &Entry| e.path.to_string_lossy().into_owned());
            worker_store.set_many(batch);

            let before = worker_found.fetch_add(added, Ordering::Relaxed);
            if interval > 0 && before / interval != (before + added) / interval {
                report(
                    &worker_tx,
                    ScanProgress::Update {
                        entries_found: before + added,
                        current_path: last_path.unwrap_or_default(),
                    },
                );
            }
        });

    for entry_result in walker {
        let (err_path, message) = match entry_result {
            Ok(entry) => match &entry.read_children_error {
                // The directory itself is stored; its contents are not.
                Some(err) => (entry.path().to_string_lossy().into_owned(), err.to_string()),
                None => continue,
            },
            Err(err) => (
                err.path()
                    .map(|p| p.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                err.to_string(),
            ),
        };
        skipped.fetch_add(1, Ordering::Relaxed);
        debug!("Skipping {err_path}: {message}");
        report(
            progress_tx,
            ScanProgress::Skipped {
                path: err_path,
                message,
            },
        );
    }

    let stats = WalkStats {
        skipped: skipped.load(Ordering::Relaxed),
        duration: start.elapsed(),
    };
    debug!(
        "Walk of {} complete: {} entries found, {} skipped in {:?}",
        root_path.display(),
        found.load(Ordering::Relaxed),
        stats.skipped,
        stats.duration
    );
    stats
}

/// Progress is advisory: never block a worker on a full or abandoned channel.
#[inline]
fn report(tx: &Sender<ScanProgress>, msg: ScanProgress) {
    let _ = tx.try_send(msg);
}
