//! Local side of artifact retrieval.

pub mod download;

pub use download::download;
