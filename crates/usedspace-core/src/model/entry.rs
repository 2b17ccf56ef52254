/// One record per filesystem object seen by the scanner.
///
/// Entries are keyed by their full path. A file's `size` is the length the
/// filesystem reported at scan time and is never re-read. A directory's
/// `size` is an aggregate owned entirely by the engine: it starts at zero
/// and is filled in by the rollup pass.
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    /// Full path of the object. Unique key in the store.
    pub path: PathBuf,

    /// Raw byte length for files; cumulative descendant total for directories.
    pub size: u64,

    /// Fixed at creation.
    pub is_dir: bool,
}

impl Entry {
    /// Create a file entry with its on-disk length.
    pub fn file(path: PathBuf, size: u64) -> Self {
        Self {
            path,
            size,
            is_dir: false,
        }
    }

    /// Create a directory entry. The filesystem's own directory size is
    /// meaningless here, so it always starts at zero.
    pub fn directory(path: PathBuf) -> Self {
        Self {
            path,
            size: 0,
            is_dir: true,
        }
    }

    /// Final path component, or the whole path for roots like `/`.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.to_string_lossy().into_owned())
    }

    /// Immediate parent directory, if any.
    pub fn parent(&self) -> Option<&Path> {
        self.path.parent()
    }
}

/// Walk the ancestor chain of `path`: its parent, grandparent, ... up to and
/// including `root`, never beyond.
///
/// Yields nothing for `root` itself or for a path that does not live under
/// `root`.
pub fn ancestor_chain<'a>(path: &'a Path, root: &'a Path) -> impl Iterator<Item = &'a Path> {
    path.ancestors()
        .skip(1)
        .take_while(move |ancestor| ancestor.starts_with(root))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ancestor_chain_stops_at_root() {
        let chain: Vec<&Path> =
            ancestor_chain(Path::new("/r/b/c/d.txt"), Path::new("/r")).collect();
        assert_eq!(
            chain,
            vec![Path::new("/r/b/c"), Path::new("/r/b"), Path::new("/r")]
        );
    }

    #[test]
    fn test_ancestor_chain_empty_for_root_and_outsiders() {
        assert_eq!(ancestor_chain(Path::new("/r"), Path::new("/r")).count(), 0);
        assert_eq!(
            ancestor_chain(Path::new("/other/x"), Path::new("/r")).count(),
            0
        );
        // Component-wise prefix, not string prefix.
        assert_eq!(
            ancestor_chain(Path::new("/rr/x"), Path::new("/r")).count(),
            0
        );
    }

    #[test]
    fn test_entry_name() {
        assert_eq!(Entry::file(PathBuf::from("/r/a.txt"), 1).name(), "a.txt");
        assert_eq!(Entry::directory(PathBuf::from("/")).name(), "/");
    }
}
