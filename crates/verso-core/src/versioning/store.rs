//! Version storage layer with point-in-time query support.
//!
//! Provides a lock-protected in-memory registry of file histories.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use tracing::{debug, trace, warn};

use crate::config::StoreConfig;
use crate::error::{ErrorCode, VersoError, VersoResult};
use crate::versioning::{HistorySummary, Version, VersionDraft, VersionHistory};

/// Trait for file version storage operations
pub trait VersionStore: Send + Sync {
    /// Append a new version of a file
    fn add_version(&self, file_id: &str, payload: Vec<u8>) -> VersoResult<Version> {
        self.add_version_with(file_id, VersionDraft::new(payload))
    }

    /// Append a new version with author and description
    fn add_version_with(&self, file_id: &str, draft: VersionDraft) -> VersoResult<Version>;

    /// Get a specific version by id
    fn get_version(&self, file_id: &str, version_id: u32) -> VersoResult<Version>;

    /// Get all versions of a file (ordered by id)
    fn list_versions(&self, file_id: &str) -> VersoResult<Vec<Version>>;

    /// Get the latest version of a file
    fn latest_version(&self, file_id: &str) -> VersoResult<Version>;

    /// Get file state at a specific point in time
    fn version_at(&self, file_id: &str, timestamp: DateTime<Utc>) -> VersoResult<Version>;

    /// Get versions within a time range
    fn versions_in_range(
        &self,
        file_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> VersoResult<Vec<Version>>;

    /// Get version summary for a file
    fn summary(&self, file_id: &str) -> VersoResult<HistorySummary>;

    /// Get the id the next appended version of a file will receive
    fn next_version_id(&self, file_id: &str) -> VersoResult<u32>;

    /// Identifiers of every file with at least one version, sorted
    fn file_ids(&self) -> VersoResult<Vec<String>>;

    /// Count total versions in store
    fn count_all(&self) -> VersoResult<usize>;
}

/// In-memory version store guarded by a single reader/writer lock.
///
/// Any number of lookups run together; appends take the lock exclusively, so
/// readers never observe a half-written version.
pub struct InMemoryVersionStore {
    histories: RwLock<HashMap<String, VersionHistory>>,
    config: StoreConfig,
}

impl InMemoryVersionStore {
    /// Create an empty store with default limits.
    pub fn new() -> Self {
        Self::from_valid_config(StoreConfig::default())
    }

    /// Create an empty store with the given limits.
    ///
    /// Fails with a configuration error if the limits are unusable.
    pub fn with_config(config: StoreConfig) -> VersoResult<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: StoreConfig) -> Self {
        Self {
            histories: RwLock::new(HashMap::with_capacity(config.initial_capacity)),
            config,
        }
    }

    fn read(&self) -> VersoResult<RwLockReadGuard<'_, HashMap<String, VersionHistory>>> {
        self.histories.read().map_err(|e| {
            warn!("Version store lock is poisoned");
            VersoError::from(e)
        })
    }

    fn write(&self) -> VersoResult<RwLockWriteGuard<'_, HashMap<String, VersionHistory>>> {
        self.histories.write().map_err(|e| {
            warn!("Version store lock is poisoned");
            VersoError::from(e)
        })
    }

    /// Run `f` against the history of `file_id` under the read lock.
    fn with_history<T>(
        &self,
        file_id: &str,
        f: impl FnOnce(&VersionHistory) -> VersoResult<T>,
    ) -> VersoResult<T> {
        let histories = self.read()?;
        let history = histories
            .get(file_id)
            .ok_or_else(|| VersoError::file_not_found(file_id))?;
        f(history)
    }

    fn validate(&self, file_id: &str, draft: &VersionDraft) -> VersoResult<()> {
        if file_id.is_empty() {
            return Err(VersoError::validation(
                "file identifier must not be empty",
                ErrorCode::ValEmptyFileId,
            ));
        }

        if file_id.len() > self.config.max_file_id_len {
            return Err(VersoError::validation_with_suggestion(
                format!(
                    "file identifier is {} bytes, limit is {}",
                    file_id.len(),
                    self.config.max_file_id_len
                ),
                ErrorCode::ValFileIdTooLong,
                "Use a shorter identifier or raise max_file_id_len",
            ));
        }

        if let Some(limit) = self.config.max_payload_bytes {
            if draft.payload.len() > limit {
                return Err(VersoError::validation_with_suggestion(
                    format!(
                        "payload is {} bytes, limit is {}",
                        draft.payload.len(),
                        limit
                    ),
                    ErrorCode::ValPayloadTooLarge,
                    "Split the content or raise max_payload_bytes",
                ));
            }
        }

        Ok(())
    }
}

impl Default for InMemoryVersionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionStore for InMemoryVersionStore {
    fn add_version_with(&self, file_id: &str, draft: VersionDraft) -> VersoResult<Version> {
        self.validate(file_id, &draft)?;

        let mut histories = self.write()?;
        let version = match histories.get_mut(file_id) {
            Some(history) => history.append(draft, Utc::now())?,
            None => {
                // Only register the history once the append has succeeded.
                let mut history = VersionHistory::new(file_id);
                let version = history.append(draft, Utc::now())?;
                histories.insert(file_id.to_string(), history);
                version
            }
        };
        drop(histories);

        debug!(
            file_id,
            version_id = version.id,
            bytes = version.payload.len(),
            "Added version"
        );
        Ok(version)
    }

    fn get_version(&self, file_id: &str, version_id: u32) -> VersoResult<Version> {
        trace!(file_id, version_id, "Getting version");
        self.with_history(file_id, |history| {
            history
                .get(version_id)
                .cloned()
                .ok_or_else(|| VersoError::version_not_found(file_id, version_id))
        })
    }

    fn list_versions(&self, file_id: &str) -> VersoResult<Vec<Version>> {
        trace!(file_id, "Listing versions");
        self.with_history(file_id, |history| Ok(history.snapshot()))
    }

    fn latest_version(&self, file_id: &str) -> VersoResult<Version> {
        self.with_history(file_id, |history| {
            history
                .latest()
                .cloned()
                .ok_or_else(|| VersoError::file_not_found(file_id))
        })
    }

    fn version_at(&self, file_id: &str, timestamp: DateTime<Utc>) -> VersoResult<Version> {
        self.with_history(file_id, |history| {
            history.at(timestamp).cloned().ok_or_else(|| VersoError::NotFound {
                message: format!(
                    "file '{}' has no version at or before {}",
                    file_id,
                    timestamp.to_rfc3339()
                ),
                code: ErrorCode::VersionNotFound,
                file_id: file_id.to_string(),
                version_id: None,
            })
        })
    }

    fn versions_in_range(
        &self,
        file_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> VersoResult<Vec<Version>> {
        self.with_history(file_id, |history| Ok(history.in_range(start, end)))
    }

    fn summary(&self, file_id: &str) -> VersoResult<HistorySummary> {
        self.with_history(file_id, |history| {
            history
                .summary()
                .ok_or_else(|| VersoError::file_not_found(file_id))
        })
    }

    fn next_version_id(&self, file_id: &str) -> VersoResult<u32> {
        let histories = self.read()?;
        match histories.get(file_id) {
            Some(history) => history.next_id(),
            None => Ok(1),
        }
    }

    fn file_ids(&self) -> VersoResult<Vec<String>> {
        let histories = self.read()?;
        let mut ids: Vec<String> = histories.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }

    fn count_all(&self) -> VersoResult<usize> {
        let histories = self.read()?;
        Ok(histories.values().map(VersionHistory::len).sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_version_store_crud() {
        let store = InMemoryVersionStore::new();

        store.add_version("a.txt", b"v1".to_vec()).unwrap();
        store.add_version("a.txt", b"v2".to_vec()).unwrap();

        let all = store.list_versions("a.txt").unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, 1);
        assert_eq!(all[0].payload, b"v1");
        assert_eq!(all[1].id, 2);
        assert_eq!(all[1].payload, b"v2");

        let v1 = store.get_version("a.txt", 1).unwrap();
        assert_eq!(v1.payload, b"v1");

        let err = store.get_version("a.txt", 3).unwrap_err();
        assert_eq!(err.code(), ErrorCode::VersionNotFound);
    }

    #[test]
    fn test_unknown_file_is_not_found() {
        let store = InMemoryVersionStore::new();

        assert_eq!(
            store.get_version("missing", 1).unwrap_err().code(),
            ErrorCode::FileNotFound
        );
        assert_eq!(
            store.list_versions("missing").unwrap_err().code(),
            ErrorCode::FileNotFound
        );
        assert!(store.latest_version("missing").unwrap_err().is_not_found());
        assert!(store.summary("missing").unwrap_err().is_not_found());
    }

    #[test]
    fn test_unknown_file_time_queries_are_not_found() {
        let store = InMemoryVersionStore::new();
        let now = Utc::now();

        let err = store.version_at("missing", now).unwrap_err();
        assert_eq!(err.code(), ErrorCode::FileNotFound);

        let err = store
            .versions_in_range("missing", now - chrono::Duration::days(1), now)
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::FileNotFound);
    }

    #[test]
    fn test_with_config_rejects_zero_file_id_len() {
        let config = StoreConfig::builder().max_file_id_len(0).build();

        let err = InMemoryVersionStore::with_config(config).err().unwrap();
        assert!(matches!(err, VersoError::Configuration(_)));
    }

    #[test]
    fn test_version_at_before_first_version_suggests_listing() {
        let store = InMemoryVersionStore::new();
        let before = Utc::now() - chrono::Duration::seconds(1);
        store.add_version("doc", b"one".to_vec()).unwrap();

        let err = store.version_at("doc", before).unwrap_err();
        assert_eq!(err.code(), ErrorCode::VersionNotFound);
        assert_eq!(
            err.suggestion(),
            Some("Use list_versions to see the available version ids")
        );
    }

    #[test]
    fn test_add_version_with_attribution() {
        let store = InMemoryVersionStore::new();

        let v = store
            .add_version_with(
                "testfile.txt",
                VersionDraft::new("Version 1 data")
                    .authored_by("user123")
                    .with_description("Initial version"),
            )
            .unwrap();

        assert_eq!(v.id, 1);
        let stored = store.get_version("testfile.txt", 1).unwrap();
        assert_eq!(stored.author.as_deref(), Some("user123"));
        assert_eq!(stored.description.as_deref(), Some("Initial version"));
    }

    #[test]
    fn test_histories_are_independent() {
        let store = InMemoryVersionStore::new();

        store.add_version("file1.txt", b"1.0".to_vec()).unwrap();
        store.add_version("file1.txt", b"1.1".to_vec()).unwrap();
        let v = store.add_version("file2.txt", b"2.0".to_vec()).unwrap();

        assert_eq!(v.id, 1);
        assert_eq!(store.file_ids().unwrap(), vec!["file1.txt", "file2.txt"]);
        assert_eq!(store.count_all().unwrap(), 3);
    }

    #[test]
    fn test_latest_and_next_id() {
        let store = InMemoryVersionStore::new();
        assert_eq!(store.next_version_id("doc").unwrap(), 1);

        store.add_version("doc", b"one".to_vec()).unwrap();
        store.add_version("doc", b"two".to_vec()).unwrap();

        assert_eq!(store.latest_version("doc").unwrap().payload, b"two");
        assert_eq!(store.next_version_id("doc").unwrap(), 3);
    }

    #[test]
    fn test_version_at_and_range() {
        let store = InMemoryVersionStore::new();
        let before = Utc::now() - chrono::Duration::seconds(1);

        store.add_version("doc", b"one".to_vec()).unwrap();
        store.add_version("doc", b"two".to_vec()).unwrap();

        let now = Utc::now();
        assert_eq!(store.version_at("doc", now).unwrap().payload, b"two");
        assert_eq!(
            store.version_at("doc", before).unwrap_err().code(),
            ErrorCode::VersionNotFound
        );

        assert_eq!(store.versions_in_range("doc", before, now).unwrap().len(), 2);
        assert!(store
            .versions_in_range("doc", before - chrono::Duration::days(1), before)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_summary_counts_bytes() {
        let store = InMemoryVersionStore::new();
        store.add_version("doc", b"abc".to_vec()).unwrap();
        store.add_version("doc", b"defg".to_vec()).unwrap();

        let summary = store.summary("doc").unwrap();
        assert_eq!(summary.file_id, "doc");
        assert_eq!(summary.total_versions, 2);
        assert_eq!(summary.latest_version, 2);
        assert_eq!(summary.total_bytes, 7);
    }

    #[test]
    fn test_validation_leaves_history_unchanged() {
        let store = InMemoryVersionStore::with_config(
            StoreConfig::builder()
                .max_payload_bytes(4)
                .max_file_id_len(8)
                .build(),
        )
        .unwrap();

        store.add_version("doc", b"ok".to_vec()).unwrap();

        let err = store.add_version("doc", b"too long".to_vec()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValPayloadTooLarge);
        assert!(err.suggestion().is_some());

        let err = store.add_version("", b"x".to_vec()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValEmptyFileId);

        let err = store
            .add_version("much-too-long-name", b"x".to_vec())
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValFileIdTooLong);

        assert_eq!(store.list_versions("doc").unwrap().len(), 1);
        assert_eq!(store.file_ids().unwrap(), vec!["doc"]);
    }

    #[test]
    fn test_poisoned_lock_reports_storage_error() {
        let store = Arc::new(InMemoryVersionStore::new());
        store.add_version("doc", b"v1".to_vec()).unwrap();

        let poisoner = Arc::clone(&store);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.histories.write().unwrap();
            panic!("writer panicked");
        })
        .join();

        let err = store.add_version("doc", b"v2".to_vec()).unwrap_err();
        assert!(err.is_storage());
        assert_eq!(err.code(), ErrorCode::StoLockPoisoned);

        let err = store.list_versions("doc").unwrap_err();
        assert!(err.is_storage());
    }

    #[test]
    fn test_concurrent_readers_and_writers() {
        let store = InMemoryVersionStore::new();
        store.add_version("concurrencytest.txt", b"Initial data".to_vec()).unwrap();

        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..10 {
                        let v = store.get_version("concurrencytest.txt", 1).unwrap();
                        assert_eq!(v.payload, b"Initial data");
                    }
                });
            }
            for writer in 0..2 {
                let store = &store;
                s.spawn(move || {
                    for j in 0..5 {
                        store
                            .add_version(
                                "concurrencytest.txt",
                                format!("New version {writer}-{j}").into_bytes(),
                            )
                            .unwrap();
                    }
                });
            }
        });

        assert_eq!(store.list_versions("concurrencytest.txt").unwrap().len(), 11);
    }
}
