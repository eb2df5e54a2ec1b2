//! Storage keys considered during resolution.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// An object-storage key together with its last-modified time.
///
/// # Example
///
/// ```
/// use s3repo_core::CandidateKey;
///
/// let key = CandidateKey::new("app-1.2.3-7.tar.gz", chrono::DateTime::UNIX_EPOCH);
/// assert_eq!(key.basename(), "app-1.2.3-7.tar");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CandidateKey {
    /// Full object key as listed by the store.
    pub key: String,
    /// Last-modified timestamp reported by the store.
    pub last_modified: DateTime<Utc>,
}

impl CandidateKey {
    /// Create a candidate from a key and its modification time.
    pub fn new(key: impl Into<String>, last_modified: DateTime<Utc>) -> Self {
        Self {
            key: key.into(),
            last_modified,
        }
    }

    /// The key with its final extension removed.
    pub fn basename(&self) -> &str {
        strip_extension(&self.key)
    }
}

impl std::fmt::Display for CandidateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key)
    }
}

/// Strip the final `.`-delimited extension from a key.
///
/// Only the last path element is inspected, so a dot inside a directory name
/// never counts as an extension.
///
/// # Example
///
/// ```
/// use s3repo_core::strip_extension;
///
/// assert_eq!(strip_extension("svc-1.2.3-7.tar.gz"), "svc-1.2.3-7.tar");
/// assert_eq!(strip_extension("svc-7"), "svc-7");
/// assert_eq!(strip_extension("v1.0/svc-7"), "v1.0/svc-7");
/// ```
pub fn strip_extension(key: &str) -> &str {
    let name_start = key.rfind('/').map_or(0, |idx| idx + 1);
    match key[name_start..].rfind('.') {
        Some(dot) => &key[..name_start + dot],
        None => key,
    }
}

/// Listing prefix shared by every artifact of a service (`<service>-`).
pub fn key_prefix(service: &str) -> String {
    format!("{service}-")
}
