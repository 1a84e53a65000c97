//! File versioning: immutable snapshots kept in append-only histories.
//!
//! Each call to `add_version` records a new snapshot of a file, enabling
//! lookups like "what did this file contain at version 3?" or "as of
//! yesterday?".

mod history;
mod shared;
mod store;
mod version;

pub(crate) use history::VersionHistory;
pub use shared::shared_store;
pub use store::{InMemoryVersionStore, VersionStore};
pub use version::{HistorySummary, Version, VersionDraft};
