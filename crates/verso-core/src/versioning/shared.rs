//! Process-wide shared store.

use once_cell::sync::Lazy;

use crate::config::StoreConfig;
use crate::versioning::InMemoryVersionStore;

static SHARED: Lazy<InMemoryVersionStore> = Lazy::new(|| {
    let config = StoreConfig::from_env();
    tracing::info!(
        initial_capacity = config.initial_capacity,
        "Initialized shared version store"
    );
    InMemoryVersionStore::with_config(config).unwrap_or_else(|e| {
        tracing::warn!("Falling back to default store limits: {}", e);
        InMemoryVersionStore::new()
    })
});

/// The store shared by every caller in this process.
///
/// Built from [`StoreConfig::from_env`] on first use. Prefer constructing an
/// [`InMemoryVersionStore`] and passing it by reference; this exists for
/// callers that cannot thread a store through.
pub fn shared_store() -> &'static InMemoryVersionStore {
    &SHARED
}
