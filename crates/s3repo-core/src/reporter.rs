//! Reporter traits for dependency injection
//!
//! Selection and download report what they are doing through these traits
//! instead of a global logger, so callers decide where diagnostics go.

use crate::selector::Winner;

/// Receives diagnostics from the selection pass.
pub trait SelectionObserver: Send + Sync {
    /// A pattern was compiled into the given expression.
    fn pattern_compiled(&self, template: &str, expr: &str);

    /// A candidate's basename was tested against the pattern.
    fn candidate_checked(&self, key: &str, basename: &str, matched: bool);

    /// A compatible candidate carried a usable build number.
    fn build_found(&self, key: &str, build: u64);

    /// A compatible candidate's build text could not be parsed; it is skipped.
    fn build_unparsable(&self, key: &str, text: &str);

    /// No build-number winner was found; recency decides among `candidates` keys.
    fn recency_fallback(&self, candidates: usize);

    /// The selection pass settled on a winner.
    fn winner_selected(&self, winner: &Winner);
}

/// Receives byte-level progress while an artifact is retrieved.
pub trait ProgressSink: Send + Sync {
    /// The transfer of `key` started; `total` is the advertised size, if any.
    fn started(&self, key: &str, total: Option<u64>);

    /// `current` bytes of `key` have been written so far.
    fn advanced(&self, key: &str, current: u64, total: Option<u64>);

    /// The transfer completed after `bytes` bytes.
    fn finished(&self, key: &str, bytes: u64);
}

impl<T: SelectionObserver + ?Sized> SelectionObserver for std::sync::Arc<T> {
    fn pattern_compiled(&self, template: &str, expr: &str) {
        (**self).pattern_compiled(template, expr);
    }
    fn candidate_checked(&self, key: &str, basename: &str, matched: bool) {
        (**self).candidate_checked(key, basename, matched);
    }
    fn build_found(&self, key: &str, build: u64) {
        (**self).build_found(key, build);
    }
    fn build_unparsable(&self, key: &str, text: &str) {
        (**self).build_unparsable(key, text);
    }
    fn recency_fallback(&self, candidates: usize) {
        (**self).recency_fallback(candidates);
    }
    fn winner_selected(&self, winner: &Winner) {
        (**self).winner_selected(winner);
    }
}

impl<T: ProgressSink + ?Sized> ProgressSink for std::sync::Arc<T> {
    fn started(&self, key: &str, total: Option<u64>) {
        (**self).started(key, total);
    }
    fn advanced(&self, key: &str, current: u64, total: Option<u64>) {
        (**self).advanced(key, current, total);
    }
    fn finished(&self, key: &str, bytes: u64) {
        (**self).finished(key, bytes);
    }
}

/// A no-op reporter for silent operations (e.g. tests, library use).
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl SelectionObserver for NullReporter {
    fn pattern_compiled(&self, _: &str, _: &str) {}
    fn candidate_checked(&self, _: &str, _: &str, _: bool) {}
    fn build_found(&self, _: &str, _: u64) {}
    fn build_unparsable(&self, _: &str, _: &str) {}
    fn recency_fallback(&self, _: usize) {}
    fn winner_selected(&self, _: &Winner) {}
}

impl ProgressSink for NullReporter {
    fn started(&self, _: &str, _: Option<u64>) {}
    fn advanced(&self, _: &str, _: u64, _: Option<u64>) {}
    fn finished(&self, _: &str, _: u64) {}
}

/// Forwards every event to `tracing` at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl SelectionObserver for TracingReporter {
    fn pattern_compiled(&self, template: &str, expr: &str) {
        tracing::debug!(template, expr, "compiled version pattern");
    }

    fn candidate_checked(&self, key: &str, basename: &str, matched: bool) {
        tracing::debug!(key, basename, matched, "checking file");
    }

    fn build_found(&self, key: &str, build: u64) {
        tracing::debug!(key, build, "build number");
    }

    fn build_unparsable(&self, key: &str, text: &str) {
        tracing::debug!(key, text, "skipping unparsable build number");
    }

    fn recency_fallback(&self, candidates: usize) {
        tracing::debug!(candidates, "no build winner, falling back to most recent");
    }

    fn winner_selected(&self, winner: &Winner) {
        tracing::debug!(key = %winner.key, reason = ?winner.reason, "selected");
    }
}

impl ProgressSink for TracingReporter {
    fn started(&self, key: &str, total: Option<u64>) {
        tracing::debug!(key, ?total, "download started");
    }

    fn advanced(&self, key: &str, current: u64, total: Option<u64>) {
        tracing::trace!(key, current, ?total, "download progress");
    }

    fn finished(&self, key: &str, bytes: u64) {
        tracing::debug!(key, bytes, "download finished");
    }
}
