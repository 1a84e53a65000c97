//! verso-core - Core library for verso.
//!
//! This crate provides a concurrent, versioned, in-memory store that maps a
//! file identifier to an append-only history of immutable versions.
//!
//! # Example
//!
//! ```
//! use verso_core::{InMemoryVersionStore, VersionStore};
//!
//! let store = InMemoryVersionStore::new();
//! store.add_version("a.txt", b"v1".to_vec())?;
//! store.add_version("a.txt", b"v2".to_vec())?;
//!
//! let versions = store.list_versions("a.txt")?;
//! assert_eq!(versions.len(), 2);
//! assert_eq!(store.get_version("a.txt", 1)?.payload, b"v1");
//! assert!(store.get_version("a.txt", 3).is_err());
//! # Ok::<(), verso_core::VersoError>(())
//! ```

pub mod config;
pub mod error;
pub mod versioning;

// Re-export commonly used types
pub use config::StoreConfig;
pub use error::{ErrorCode, VersoError, VersoResult};
pub use versioning::{
    shared_store, HistorySummary, InMemoryVersionStore, Version, VersionDraft, VersionStore,
};
