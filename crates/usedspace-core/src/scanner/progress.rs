/// Progress updates sent from the scan workers to whoever is showing the
/// "please wait" placeholder.
///
/// These are advisory and may be dropped. Completion is NOT a progress
/// message: it is signalled exactly once through [`super::ScanHandle::wait`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanProgress {
    /// Periodic update with a running total.
    Update {
        entries_found: u64,
        current_path: String,
    },
    /// A non-root object could not be stat'ed or listed and was left out of
    /// the store. The scan carries on.
    Skipped { path: String, message: String },
}
