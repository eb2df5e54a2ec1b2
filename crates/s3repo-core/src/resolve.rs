//! Entry points chaining compilation and selection.

use crate::pattern::{CompileError, Matcher};
use crate::reporter::{NullReporter, SelectionObserver};
use crate::selector::{SelectionOutcome, select_with};
use crate::store::ObjectStore;
use crate::types::{CandidateKey, key_prefix};

/// Compile `template` for `service` and select among `candidates`.
///
/// An empty `candidates` slice is not an error: the outcome simply has no
/// winner.
///
/// # Errors
///
/// Returns [`CompileError`] if the pattern is invalid.
///
/// # Example
///
/// ```
/// use chrono::DateTime;
/// use s3repo_core::{CandidateKey, resolve};
///
/// let candidates = vec![
///     CandidateKey::new("app-1.0-3.zip", DateTime::UNIX_EPOCH),
///     CandidateKey::new("app-1.0-10.zip", DateTime::UNIX_EPOCH),
/// ];
/// let outcome = resolve("app", "%W-%B", &candidates).unwrap();
/// assert_eq!(outcome.winner_key(), Some("app-1.0-10.zip"));
/// ```
pub fn resolve(
    service: &str,
    template: &str,
    candidates: &[CandidateKey],
) -> Result<SelectionOutcome, CompileError> {
    resolve_with(service, template, candidates, &NullReporter)
}

/// [`resolve`] with diagnostics sent to `observer`.
///
/// # Errors
///
/// Returns [`CompileError`] if the pattern is invalid.
pub fn resolve_with(
    service: &str,
    template: &str,
    candidates: &[CandidateKey],
    observer: &dyn SelectionObserver,
) -> Result<SelectionOutcome, CompileError> {
    let matcher = Matcher::compile(service, template)?;
    observer.pattern_compiled(template, matcher.as_str());
    Ok(select_with(&matcher, candidates, observer))
}

/// List `<service>-*` from `store` and resolve the listing.
///
/// The pattern is compiled before the store is contacted, so an invalid
/// pattern never costs a request.
///
/// # Errors
///
/// Returns [`crate::Error::Compile`] for an invalid pattern and
/// [`crate::Error::Store`] if listing fails.
pub async fn resolve_from_store(
    store: &dyn ObjectStore,
    service: &str,
    template: &str,
    observer: &dyn SelectionObserver,
) -> crate::Result<SelectionOutcome> {
    let matcher = Matcher::compile(service, template)?;
    observer.pattern_compiled(template, matcher.as_str());

    let prefix = key_prefix(service);
    tracing::debug!(
        bucket = store.bucket(),
        prefix = %prefix,
        pattern = matcher.as_str(),
        "querying bucket"
    );
    let candidates = store.list_keys(&prefix).await?;

    Ok(select_with(&matcher, &candidates, observer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::{TimeZone, Utc};

    fn store() -> MemoryStore {
        MemoryStore::new("artifacts")
            .with_object("app-1.0-3.zip", Utc.timestamp_opt(100, 0).unwrap(), b"3")
            .with_object("app-1.0-10.zip", Utc.timestamp_opt(200, 0).unwrap(), b"10")
            .with_object("web-1.0-99.zip", Utc.timestamp_opt(300, 0).unwrap(), b"99")
            .with_object("app-1.0-7.zip", Utc.timestamp_opt(150, 0).unwrap(), b"7")
    }

    #[test]
    fn test_resolve_examples() {
        let t = |s| Utc.timestamp_opt(s, 0).unwrap();
        let candidates = vec![
            CandidateKey::new("app-1.0-3.zip", t(1)),
            CandidateKey::new("app-1.0-10.zip", t(2)),
            CandidateKey::new("app-1.0-7.zip", t(3)),
        ];
        let outcome = resolve("app", "%W-%B", &candidates).unwrap();
        assert_eq!(outcome.compatible.len(), 3);
        assert_eq!(outcome.winner_key(), Some("app-1.0-10.zip"));

        let other = vec![CandidateKey::new("other-1.zip", t(1))];
        let outcome = resolve("app", "%W-%B", &other).unwrap();
        assert!(outcome.compatible.is_empty());
        assert_eq!(outcome.winner_key(), Some("other-1.zip"));

        let outcome = resolve("app", "%W-%B", &[]).unwrap();
        assert!(outcome.is_empty());
    }

    #[test]
    fn test_resolve_propagates_compile_error() {
        let err = resolve("app", "%B.%B", &[]).unwrap_err();
        assert_eq!(err.template, "%B.%B");
    }

    #[tokio::test]
    async fn test_resolve_from_store_uses_service_prefix() {
        let outcome = resolve_from_store(&store(), "app", "%W-%B", &NullReporter)
            .await
            .unwrap();

        let keys: Vec<&str> = outcome.compatible.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["app-1.0-3.zip", "app-1.0-10.zip", "app-1.0-7.zip"]);
        assert_eq!(outcome.winner_key(), Some("app-1.0-10.zip"));
    }

    #[tokio::test]
    async fn test_resolve_from_store_unknown_service() {
        let outcome = resolve_from_store(&store(), "db", "%W-%B", &NullReporter)
            .await
            .unwrap();
        assert!(outcome.is_empty());
    }

    #[tokio::test]
    async fn test_resolve_from_store_bad_pattern() {
        let err = resolve_from_store(&store(), "app", "%B%B", &NullReporter)
            .await
            .unwrap_err();
        assert!(matches!(err, crate::Error::Compile(_)));
    }
}
