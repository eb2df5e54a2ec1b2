//! Errors surfaced to callers of the core.

use thiserror::Error;

use crate::pattern::CompileError;
use crate::store::StoreError;

/// Top-level error for resolution and retrieval.
#[derive(Error, Debug)]
pub enum Error {
    /// The version pattern could not be compiled.
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// The object store rejected a request.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Writing the artifact locally failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The key cannot be used as a path below the destination directory.
    #[error("Refusing to write `{key}` outside the destination directory")]
    UnsafeKey {
        /// Offending key.
        key: String,
    },

    /// The listing was empty, so there is nothing to resolve.
    #[error("No files found to update the service {service}")]
    NoArtifacts {
        /// Service whose listing was empty.
        service: String,
    },

    /// Invalid configuration supplied by the caller.
    #[error("{0}")]
    Config(String),
}

/// Result alias using the core [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;
