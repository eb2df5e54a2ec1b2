use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{FetchedObject, ObjectStore, StoreError};
use crate::types::CandidateKey;

/// An in-process bucket, used for tests and offline runs.
///
/// Objects are listed in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    bucket: String,
    objects: Vec<(CandidateKey, Vec<u8>)>,
}

impl MemoryStore {
    /// Create an empty store named `bucket`.
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            objects: Vec::new(),
        }
    }

    /// Add an object, replacing any existing one with the same key.
    pub fn insert(&mut self, key: &str, last_modified: DateTime<Utc>, data: Vec<u8>) {
        let candidate = CandidateKey::new(key, last_modified);
        if let Some(slot) = self.objects.iter_mut().find(|(c, _)| c.key == key) {
            *slot = (candidate, data);
        } else {
            self.objects.push((candidate, data));
        }
    }

    /// Builder form of [`MemoryStore::insert`].
    pub fn with_object(mut self, key: &str, last_modified: DateTime<Utc>, data: &[u8]) -> Self {
        self.insert(key, last_modified, data.to_vec());
        self
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn list_keys(&self, prefix: &str) -> Result<Vec<CandidateKey>, StoreError> {
        Ok(self
            .objects
            .iter()
            .filter(|(c, _)| c.key.starts_with(prefix))
            .map(|(c, _)| c.clone())
            .collect())
    }

    async fn fetch(&self, key: &str) -> Result<FetchedObject, StoreError> {
        let (_, data) = self
            .objects
            .iter()
            .find(|(c, _)| c.key == key)
            .ok_or_else(|| StoreError::NotFound {
                key: key.to_string(),
            })?;

        Ok(FetchedObject {
            content_length: Some(data.len() as u64),
            body: Box::pin(std::io::Cursor::new(data.clone())),
        })
    }
}
