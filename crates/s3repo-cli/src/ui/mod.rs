//! Terminal output for listings and downloads.

pub mod list;
pub mod progress;
