/// The shared size store: every `Entry` the engine knows about, keyed by path.
///
/// Scan workers insert concurrently (one write lock per directory batch).
/// After the scan the store has a single logical writer, and multi-step
/// read-modify-write chains (rollup, deletion repair) run inside one
/// [`SizeStore::transaction`] so readers never see a half-updated chain.
///
/// A parent→children index is maintained alongside the entries so child
/// listings cost O(children) rather than O(store).
use super::entry::Entry;
use parking_lot::{RwLock, RwLockWriteGuard};
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A store shared between the scan workers and the post-scan caller.
pub type SharedStore = Arc<SizeStore>;

#[derive(Debug, Default)]
pub struct SizeStore {
    inner: RwLock<StoreInner>,
}

#[derive(Debug, Default)]
struct StoreInner {
    entries: HashMap<PathBuf, Entry>,
    /// parent path -> paths of its direct children present in `entries`.
    children: HashMap<PathBuf, BTreeSet<PathBuf>>,
}

impl StoreInner {
    fn insert(&mut self, entry: Entry) {
        if let Some(parent) = entry.path.parent() {
            self.children
                .entry(parent.to_path_buf())
                .or_default()
                .insert(entry.path.clone());
        }
        self.entries.insert(entry.path.clone(), entry);
    }

    fn remove(&mut self, path: &Path) -> Option<Entry> {
        let removed = self.entries.remove(path)?;
        if let Some(parent) = path.parent() {
            if let Some(siblings) = self.children.get_mut(parent) {
                siblings.remove(path);
                if siblings.is_empty() {
                    self.children.remove(parent);
                }
            }
        }
        Some(removed)
    }

    /// Remove every entry strictly below `path`. Returns how many were removed.
    fn remove_descendants(&mut self, path: &Path) -> usize {
        let mut stack = vec![path.to_path_buf()];
        let mut doomed = Vec::new();
        while let Some(dir) = stack.pop() {
            if let Some(kids) = self.children.remove(&dir) {
                for kid in kids {
                    stack.push(kid.clone());
                    doomed.push(kid);
                }
            }
        }
        for kid in &doomed {
            self.entries.remove(kid);
        }
        doomed.len()
    }
}

impl SizeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store wrapped for sharing.
    pub fn shared() -> SharedStore {
        Arc::new(Self::new())
    }

    /// Snapshot of the entry at `path`.
    pub fn get(&self, path: &Path) -> Option<Entry> {
        self.inner.read().entries.get(path).cloned()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.inner.read().entries.contains_key(path)
    }

    /// Insert or replace the entry keyed by `entry.path`.
    pub fn set(&self, entry: Entry) {
        self.inner.write().insert(entry);
    }

    /// Insert a batch under a single write-lock acquisition.
    pub fn set_many<I>(&self, entries: I)
    where
        I: IntoIterator<Item = Entry>,
    {
        let mut inner = self.inner.write();
        for entry in entries {
            inner.insert(entry);
        }
    }

    /// Remove the entry at `path`, returning it if it was present.
    pub fn remove(&self, path: &Path) -> Option<Entry> {
        self.inner.write().remove(path)
    }

    /// Snapshot of every key. Mutations after the call are not reflected.
    pub fn keys(&self) -> Vec<PathBuf> {
        self.inner.read().entries.keys().cloned().collect()
    }

    /// Snapshot of the entries whose immediate parent is `dir`, unordered.
    pub fn children_of(&self, dir: &Path) -> Vec<Entry> {
        let inner = self.inner.read();
        inner
            .children
            .get(dir)
            .map(|kids| {
                kids.iter()
                    .filter_map(|kid| inner.entries.get(kid).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().entries.is_empty()
    }

    /// Run `f` with exclusive access to the store.
    ///
    /// Everything `f` does is applied as one uninterrupted step from the
    /// point of view of other readers and writers.
    pub fn transaction<R>(&self, f: impl FnOnce(&mut Transaction<'_>) -> R) -> R {
        let mut tx = Transaction {
            inner: self.inner.write(),
        };
        f(&mut tx)
    }
}

/// Exclusive, lock-holding view of the store handed out by
/// [`SizeStore::transaction`].
pub struct Transaction<'a> {
    inner: RwLockWriteGuard<'a, StoreInner>,
}

impl Transaction<'_> {
    pub fn get(&self, path: &Path) -> Option<&Entry> {
        self.inner.entries.get(path)
    }

    /// Every entry currently in the store, in no particular order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.inner.entries.values()
    }

    /// Replace the size of the entry at `path` with `f(old)`.
    ///
    /// Returns `false` (and does nothing) when no such entry exists.
    pub fn update_size(&mut self, path: &Path, f: impl FnOnce(u64) -> u64) -> bool {
        match self.inner.entries.get_mut(path) {
            Some(entry) => {
                entry.size = f(entry.size);
                true
            }
            None => false,
        }
    }

    /// Zero the size of every directory entry.
    pub fn reset_directory_sizes(&mut self) {
        for entry in self.inner.entries.values_mut() {
            if entry.is_dir {
                entry.size = 0;
            }
        }
    }

    pub fn remove(&mut self, path: &Path) -> Option<Entry> {
        self.inner.remove(path)
    }

    /// Remove every entry strictly below `path`, leaving `path` itself.
    pub fn remove_descendants(&mut self, path: &Path) -> usize {
        self.inner.remove_descendants(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn p(s: &str) -> PathBuf {
        PathBuf::from(s)
    }

    #[test]
    fn test_set_get_remove() {
        let store = SizeStore::new();
        store.set(Entry::directory(p("/r")));
        store.set(Entry::file(p("/r/a"), 100));

        assert_eq!(store.get(&p("/r/a")), Some(Entry::file(p("/r/a"), 100)));
        assert_eq!(store.len(), 2);

        let removed = store.remove(&p("/r/a"));
        assert_eq!(removed.map(|e| e.size), Some(100));
        assert!(store.get(&p("/r/a")).is_none());
        assert!(store.children_of(&p("/r")).is_empty());
        assert!(store.remove(&p("/r/a")).is_none());
    }

    #[test]
    fn test_set_replaces_existing_entry() {
        let store = SizeStore::new();
        store.set(Entry::file(p("/r/a"), 1));
        store.set(Entry::file(p("/r/a"), 2));
        assert_eq!(store.len(), 1);
        assert_eq!(store.children_of(&p("/r")).len(), 1);
        assert_eq!(store.get(&p("/r/a")).map(|e| e.size), Some(2));
    }

    #[test]
    fn test_keys_is_a_snapshot() {
        let store = SizeStore::new();
        store.set_many(vec![
            Entry::directory(p("/r")),
            Entry::file(p("/r/a"), 1),
            Entry::file(p("/r/b"), 2),
        ]);
        let keys = store.keys();
        store.remove(&p("/r/a"));
        assert_eq!(keys.len(), 3);
        assert_eq!(store.keys().len(), 2);
    }

    #[test]
    fn test_concurrent_inserts_are_not_lost() {
        let store = SizeStore::shared();
        let workers: Vec<_> = (0..8)
            .map(|w| {
                let store = store.clone();
                thread::spawn(move || {
                    for i in 0..500 {
                        store.set(Entry::file(p(&format!("/r/w{w}/f{i}")), i));
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        assert_eq!(store.len(), 8 * 500);
        for w in 0..8 {
            assert_eq!(store.children_of(&p(&format!("/r/w{w}"))).len(), 500);
        }
    }

    #[test]
    fn test_transaction_remove_descendants() {
        let store = SizeStore::new();
        store.set_many(vec![
            Entry::directory(p("/r")),
            Entry::directory(p("/r/b")),
            Entry::directory(p("/r/b/x")),
            Entry::file(p("/r/b/x/y"), 5),
            Entry::file(p("/r/b/c"), 50),
            Entry::file(p("/r/bb"), 7),
        ]);

        let purged = store.transaction(|tx| tx.remove_descendants(&p("/r/b")));

        assert_eq!(purged, 3);
        assert!(store.contains(&p("/r/b")));
        assert!(store.contains(&p("/r/bb")));
        assert!(!store.contains(&p("/r/b/x/y")));
        assert!(store.children_of(&p("/r/b")).is_empty());
    }

    #[test]
    fn test_update_size_on_missing_entry() {
        let store = SizeStore::new();
        let touched = store.transaction(|tx| tx.update_size(&p("/nope"), |s| s + 1));
        assert!(!touched);
        assert!(store.is_empty());
    }
}
