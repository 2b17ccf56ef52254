/// UsedSpace Core — the size-aggregation engine.
///
/// This crate contains all business logic with zero UI dependencies.
/// A frontend drives it in a fixed order: scan, wait for completion, roll
/// sizes up once, then serve child listings and deletions.
///
/// # Modules
///
/// - [`model`] — `Entry` records and the shared `SizeStore`.
/// - [`scanner`] — Background parallel filesystem scan with a one-shot completion signal.
/// - [`rollup`] — Bottom-up cumulative directory sizes.
/// - [`query`] — Direct-children listings ranked by size.
/// - [`mutation`] — Deletion with incremental ancestor repair.
/// - [`details`] — Per-object properties for a details view.
/// - [`session`] — The above tied together behind one handle.
pub mod details;
pub mod error;
pub mod model;
pub mod mutation;
pub mod query;
pub mod rollup;
pub mod scanner;
pub mod session;

pub use error::{Error, Result};
pub use model::{Entry, SharedStore, SizeStore};
pub use session::Session;
