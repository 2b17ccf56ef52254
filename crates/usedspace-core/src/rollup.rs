/// Bottom-up size rollup: turns raw file sizes into cumulative directory sizes.
///
/// Runs once, after the scan's completion signal, on a single thread and
/// inside one store transaction. For every file, its size is added to each
/// directory on its ancestor chain up to and including the scan root.
/// Directories never contribute their own size field to an ancestor.
use crate::model::{ancestor_chain, SizeStore};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::debug;

/// Compute every directory's cumulative size under `root`.
///
/// Directory sizes are reset first, so calling this again on an unchanged
/// store gives the same result rather than double counting.
///
/// Returns the root's total.
pub fn rollup(store: &SizeStore, root: &Path) -> u64 {
    let start = Instant::now();

    store.transaction(|tx| {
        tx.reset_directory_sizes();

        let files: Vec<(PathBuf, u64)> = tx
            .entries()
            .filter(|entry| !entry.is_dir)
            .map(|entry| (entry.path.clone(), entry.size))
            .collect();

        for (path, size) in &files {
            for ancestor in ancestor_chain(path, root) {
                // An ancestor can be missing if its directory entry was skipped.
                tx.update_size(ancestor, |s| s + size);
            }
        }

        let total = tx.get(root).map(|r| r.size).unwrap_or(0);
        debug!(
            "Rollup of {} files under {} complete in {:?}: {} bytes",
            files.len(),
            root.display(),
            start.elapsed(),
            total
        );
        total
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Entry;

    fn p(s: &str) -> PathBuf {
        PathBuf::from(s)
    }

    fn sample_store() -> SizeStore {
        // /r
        //   a        100
        //   b/
        //     c       50
        //     d/
        //       e     25
        //   empty/
        let store = SizeStore::new();
        store.set_many(vec![
            Entry::directory(p("/r")),
            Entry::file(p("/r/a"), 100),
            Entry::directory(p("/r/b")),
            Entry::file(p("/r/b/c"), 50),
            Entry::directory(p("/r/b/d")),
            Entry::file(p("/r/b/d/e"), 25),
            Entry::directory(p("/r/empty")),
        ]);
        store
    }

    fn size(store: &SizeStore, path: &str) -> u64 {
        store.get(&p(path)).map(|e| e.size).unwrap()
    }

    #[test]
    fn test_rollup_sums_descendant_files() {
        let store = sample_store();
        let total = rollup(&store, &p("/r"));

        assert_eq!(total, 175);
        assert_eq!(size(&store, "/r"), 175);
        assert_eq!(size(&store, "/r/b"), 75);
        assert_eq!(size(&store, "/r/b/d"), 25);
        assert_eq!(size(&store, "/r/empty"), 0);
        // File sizes are left alone.
        assert_eq!(size(&store, "/r/a"), 100);
        assert_eq!(size(&store, "/r/b/d/e"), 25);
    }

    #[test]
    fn test_rollup_is_repeatable() {
        let store = sample_store();
        rollup(&store, &p("/r"));
        rollup(&store, &p("/r"));
        assert_eq!(size(&store, "/r"), 175);
        assert_eq!(size(&store, "/r/b"), 75);
    }

    #[test]
    fn test_rollup_ignores_raw_directory_sizes() {
        let store = SizeStore::new();
        // A directory record carrying a bogus filesystem-reported size.
        store.set(Entry {
            path: p("/r"),
            size: 4096,
            is_dir: true,
        });
        store.set(Entry {
            path: p("/r/sub"),
            size: 4096,
            is_dir: true,
        });
        store.set(Entry::file(p("/r/sub/f"), 10));

        rollup(&store, &p("/r"));

        assert_eq!(size(&store, "/r"), 10);
        assert_eq!(size(&store, "/r/sub"), 10);
    }

    #[test]
    fn test_rollup_does_not_climb_above_root() {
        let store = SizeStore::new();
        store.set(Entry::directory(p("/")));
        store.set(Entry::directory(p("/r")));
        store.set(Entry::file(p("/r/a"), 9));

        rollup(&store, &p("/r"));

        assert_eq!(size(&store, "/r"), 9);
        assert_eq!(size(&store, "/"), 0);
    }
}
