//! Object storage seam.
//!
//! Resolution only needs two capabilities from a bucket: list keys under a
//! prefix with their modification times, and stream one object back.

mod memory;
#[cfg(feature = "s3")]
pub mod s3;

use std::fmt;
use std::pin::Pin;

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::AsyncRead;

use crate::types::CandidateKey;

pub use memory::MemoryStore;

/// Failure reported by an [`ObjectStore`].
#[derive(Error, Debug)]
pub enum StoreError {
    /// Listing the bucket failed.
    #[error("Failed to list `{bucket}` with prefix `{prefix}`: {message}")]
    List {
        /// Bucket being listed.
        bucket: String,
        /// Key prefix of the listing.
        prefix: String,
        /// Error reported by the backend.
        message: String,
    },

    /// Retrieving an object failed.
    #[error("Failed to fetch `{bucket}/{key}`: {message}")]
    Fetch {
        /// Bucket holding the object.
        bucket: String,
        /// Requested key.
        key: String,
        /// Error reported by the backend.
        message: String,
    },

    /// The requested key does not exist.
    #[error("Object `{key}` not found")]
    NotFound {
        /// Requested key.
        key: String,
    },
}

/// Streaming body of a retrieved object.
pub struct FetchedObject {
    /// Object bytes.
    pub body: Pin<Box<dyn AsyncRead + Send>>,
    /// Advertised size, when the backend reports one.
    pub content_length: Option<u64>,
}

impl fmt::Debug for FetchedObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchedObject")
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// A flat bucket of artifacts.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Name of the bucket, for diagnostics.
    fn bucket(&self) -> &str;

    /// Every key starting with `prefix`, in listing order.
    async fn list_keys(&self, prefix: &str) -> Result<Vec<CandidateKey>, StoreError>;

    /// Open `key` for reading.
    async fn fetch(&self, key: &str) -> Result<FetchedObject, StoreError>;
}
