//! File version types.
//!
//! A [`Version`] is an immutable snapshot of a file's content. Callers describe
//! what to append with a [`VersionDraft`]; the store assigns the id and the
//! creation time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An immutable snapshot of a file at one point in its history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    /// Sequential id within this file (1, 2, 3...)
    pub id: u32,
    /// File this version belongs to
    pub file_id: String,
    /// Content at this version
    pub payload: Vec<u8>,
    /// When this version was recorded
    pub created_at: DateTime<Utc>,
    /// Who recorded the change (if known)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Optional description of the change
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Version {
    /// Payload interpreted as UTF-8, if it is valid.
    pub fn payload_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.payload).ok()
    }

    /// Payload size in bytes.
    pub fn size(&self) -> usize {
        self.payload.len()
    }
}

/// Content and attribution for a version that has not been stored yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionDraft {
    pub payload: Vec<u8>,
    pub author: Option<String>,
    pub description: Option<String>,
}

impl VersionDraft {
    /// Create a draft holding the given content.
    pub fn new(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            payload: payload.into(),
            author: None,
            description: None,
        }
    }

    /// Builder: set author
    pub fn authored_by(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Builder: set change description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    /// Stamp the draft with its id and creation time.
    pub(crate) fn into_version(
        self,
        file_id: &str,
        id: u32,
        created_at: DateTime<Utc>,
    ) -> Version {
        Version {
            id,
            file_id: file_id.to_string(),
            payload: self.payload,
            created_at,
            author: self.author,
            description: self.description,
        }
    }
}

impl From<Vec<u8>> for VersionDraft {
    fn from(payload: Vec<u8>) -> Self {
        Self::new(payload)
    }
}

impl From<&[u8]> for VersionDraft {
    fn from(payload: &[u8]) -> Self {
        Self::new(payload)
    }
}

impl From<&str> for VersionDraft {
    fn from(payload: &str) -> Self {
        Self::new(payload)
    }
}

impl From<String> for VersionDraft {
    fn from(payload: String) -> Self {
        Self::new(payload)
    }
}

/// Summary of the recorded history of one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySummary {
    pub file_id: String,
    pub total_versions: u32,
    pub latest_version: u32,
    pub first_created: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
    pub total_bytes: u64,
}
