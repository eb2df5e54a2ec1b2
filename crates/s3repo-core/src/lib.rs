//! s3repo core
//!
//! Resolves which artifact in a flat object-storage bucket is the current
//! build of a service.
//!
//! # Overview
//!
//! A version pattern such as `1.%S-%B` is compiled together with the service
//! name into an anchored [`Matcher`]. The [`select`] pass runs every listed
//! key through the matcher, keeps the compatible ones and picks a single
//! winner: the highest `%B` build number, or the most recently modified key
//! when the pattern yields nothing usable.
//!
//! # Architecture
//!
//! - **Pure core**: [`pattern`] and [`selector`] never touch the network or the
//!   filesystem. [`resolve()`] chains them for a candidate list.
//! - **Seams**: [`store::ObjectStore`] abstracts the bucket, and
//!   [`reporter::SelectionObserver`] / [`reporter::ProgressSink`] receive
//!   diagnostics instead of writing to process-wide state.

pub mod error;
pub mod io;
pub mod pattern;
pub mod reporter;
pub mod resolve;
pub mod selector;
pub mod store;
pub mod types;

pub use error::{Error, Result};
pub use pattern::{CompileError, DEFAULT_PREFIX, MatchResult, Matcher, legacy_pattern};
pub use reporter::{NullReporter, ProgressSink, SelectionObserver, TracingReporter};
pub use resolve::{resolve, resolve_from_store, resolve_with};
pub use selector::{SelectionOutcome, WinReason, Winner, select, select_with};
pub use store::{FetchedObject, MemoryStore, ObjectStore, StoreError};
pub use types::{CandidateKey, key_prefix, strip_extension};
