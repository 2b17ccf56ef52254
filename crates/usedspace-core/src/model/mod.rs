/// Data model for the UsedSpace engine.
///
/// Re-exports the entry record and the shared store that owns every entry.
pub mod entry;
pub mod store;

pub use entry::{ancestor_chain, Entry};
pub use store::{SharedStore, SizeStore, Transaction};
