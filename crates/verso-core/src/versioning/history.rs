//! Append-only version history for a single file.

use chrono::{DateTime, Utc};

use crate::error::{ErrorCode, VersoError, VersoResult};
use crate::versioning::{HistorySummary, Version, VersionDraft};

/// Id following a history of `len` versions of `file_id`.
fn id_after(file_id: &str, len: usize) -> VersoResult<u32> {
    u32::try_from(len)
        .ok()
        .and_then(|len| len.checked_add(1))
        .ok_or_else(|| {
            VersoError::storage(
                format!("version id space exhausted for file '{}'", file_id),
                ErrorCode::StoIdExhausted,
            )
        })
}

/// Ordered versions of one file. Position `i` always holds id `i + 1`.
#[derive(Debug, Clone)]
pub(crate) struct VersionHistory {
    file_id: String,
    versions: Vec<Version>,
}

impl VersionHistory {
    /// Create an empty history for the given file.
    pub fn new(file_id: impl Into<String>) -> Self {
        Self {
            file_id: file_id.into(),
            versions: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    /// Id the next appended version will receive.
    pub fn next_id(&self) -> VersoResult<u32> {
        id_after(&self.file_id, self.versions.len())
    }

    /// Append a draft, returning a copy of the stored version.
    ///
    /// The history is left untouched when this fails.
    pub fn append(
        &mut self,
        draft: VersionDraft,
        created_at: DateTime<Utc>,
    ) -> VersoResult<Version> {
        let id = self.next_id()?;
        let version = draft.into_version(&self.file_id, id, created_at);
        self.versions.push(version.clone());
        Ok(version)
    }

    /// Look up a version by id.
    pub fn get(&self, id: u32) -> Option<&Version> {
        let index = usize::try_from(id).ok()?.checked_sub(1)?;
        self.versions.get(index)
    }

    pub fn latest(&self) -> Option<&Version> {
        self.versions.last()
    }

    /// Newest version recorded at or before `timestamp`.
    pub fn at(&self, timestamp: DateTime<Utc>) -> Option<&Version> {
        self.versions.iter().rev().find(|v| v.created_at <= timestamp)
    }

    /// Versions recorded within `start..=end`, in id order.
    pub fn in_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<Version> {
        self.versions
            .iter()
            .filter(|v| v.created_at >= start && v.created_at <= end)
            .cloned()
            .collect()
    }

    /// Owned copy of every version.
    pub fn snapshot(&self) -> Vec<Version> {
        self.versions.clone()
    }

    pub fn summary(&self) -> Option<HistorySummary> {
        let first = self.versions.first()?;
        let last = self.versions.last()?;

        Some(HistorySummary {
            file_id: self.file_id.clone(),
            total_versions: last.id,
            latest_version: last.id,
            first_created: first.created_at,
            last_modified: last.created_at,
            total_bytes: self.versions.iter().map(|v| v.payload.len() as u64).sum(),
        })
    }
}
