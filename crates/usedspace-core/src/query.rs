/// Child listing: the read-only query the presentation layer lives on.
use crate::error::{Error, Result};
use crate::model::{Entry, SizeStore};
use std::path::Path;

/// Direct children of `dir`, largest first.
///
/// Equal sizes are ordered by path so repeated calls with no intervening
/// mutation return identical sequences. An unknown or childless `dir`
/// yields an empty vec.
pub fn direct_children(store: &SizeStore, dir: &Path) -> Vec<Entry> {
    let mut children = store.children_of(dir);
    children.sort_unstable_by(|a, b| b.size.cmp(&a.size).then_with(|| a.path.cmp(&b.path)));
    children
}

/// Like [`direct_children`], but first checks that `dir` still exists on
/// disk and reports [`Error::StaleReference`] when it does not.
pub fn children_checked(store: &SizeStore, dir: &Path) -> Result<Vec<Entry>> {
    if std::fs::symlink_metadata(dir).is_err() {
        return Err(Error::StaleReference {
            path: dir.to_path_buf(),
        });
    }
    Ok(direct_children(store, dir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn p(s: &str) -> PathBuf {
        PathBuf::from(s)
    }

    fn names(entries: &[Entry]) -> Vec<String> {
        entries.iter().map(Entry::name).collect()
    }

    #[test]
    fn test_children_sorted_by_size_descending() {
        let store = SizeStore::new();
        store.set_many(vec![
            Entry::directory(p("/r")),
            Entry::file(p("/r/small"), 10),
            Entry::file(p("/r/big"), 1000),
            Entry {
                path: p("/r/dir"),
                size: 500,
                is_dir: true,
            },
            Entry::file(p("/r/dir/nested"), 500),
        ]);

        let children = direct_children(&store, &p("/r"));
        assert_eq!(names(&children), vec!["big", "dir", "small"]);
    }

    #[test]
    fn test_ties_are_broken_by_path() {
        let store = SizeStore::new();
        for name in ["m", "z", "a", "q"] {
            store.set(Entry::file(p(&format!("/r/{name}")), 42));
        }

        let first = direct_children(&store, &p("/r"));
        let second = direct_children(&store, &p("/r"));
        assert_eq!(names(&first), vec!["a", "m", "q", "z"]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_for_childless_and_unknown_dirs() {
        let store = SizeStore::new();
        store.set(Entry::directory(p("/r")));
        store.set(Entry::directory(p("/r/empty")));

        assert!(direct_children(&store, &p("/r/empty")).is_empty());
        assert!(direct_children(&store, &p("/nowhere")).is_empty());
    }

    #[test]
    fn test_children_checked_reports_missing_dir() {
        let store = SizeStore::new();
        let missing = p("/definitely/not/a/real/usedspace/dir");
        match children_checked(&store, &missing) {
            Err(Error::StaleReference { path }) => assert_eq!(path, missing),
            other => panic!("expected StaleReference, got {other:?}"),
        }
    }
}
