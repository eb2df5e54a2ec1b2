use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use s3repo_core::io::download;
use s3repo_core::{ObjectStore, ProgressSink, SelectionObserver, resolve_from_store};

use crate::config::{Config, NameOutput};

/// Download the current artifact of the configured service.
///
/// Returns the path of the written file.
pub async fn update(
    config: &Config,
    store: &dyn ObjectStore,
    observer: &dyn SelectionObserver,
    progress: &dyn ProgressSink,
    out: &mut dyn Write,
) -> Result<PathBuf> {
    let destination = config.destination()?;
    let outcome = resolve_from_store(store, &config.service, &config.pattern, observer).await?;
    let winner = outcome.require_winner(&config.service)?;
    tracing::debug!(service = %config.service, key = %winner.key, "updating to selected artifact");

    let path = download(store, &winner.key.key, destination, progress)
        .await
        .with_context(|| format!("Failed to download {}", winner.key))?;
    tracing::debug!(path = %path.display(), "artifact downloaded");

    match &config.name_output {
        NameOutput::Print => writeln!(out, "{}", path.display())?,
        NameOutput::Store(file) => tokio::fs::write(file, path.display().to_string())
            .await
            .with_context(|| format!("Failed to write {}", file.display()))?,
        NameOutput::Silent => {}
    }

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Cli;
    use chrono::{TimeZone, Utc};
    use clap::Parser;
    use s3repo_core::{MemoryStore, NullReporter};
    use std::path::Path;

    fn config(dest: &Path, extra: &[&str]) -> Config {
        let dest = dest.to_str().unwrap();
        let mut args = vec!["s3repo", "-s", "app", "-b", "builds", "-w", "%W-%B", "-d", dest];
        args.extend_from_slice(extra);
        args.push("update");
        Config::from_cli(&Cli::try_parse_from(args).unwrap()).unwrap()
    }

    fn store() -> MemoryStore {
        let t = |s| Utc.timestamp_opt(s, 0).unwrap();
        MemoryStore::new("builds")
            .with_object("app-1.0-3.zip", t(10), b"three")
            .with_object("app-1.0-10.zip", t(20), b"ten")
            .with_object("app-1.0-7.zip", t(30), b"seven")
    }

    #[tokio::test]
    async fn test_update_downloads_winner() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = Vec::new();
        let path = update(&config(dir.path(), &[]), &store(), &NullReporter, &NullReporter, &mut out)
            .await
            .unwrap();

        assert_eq!(path, dir.path().join("app-1.0-10.zip"));
        assert_eq!(std::fs::read(&path).unwrap(), b"ten");
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_update_prints_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = Vec::new();
        let path = update(&config(dir.path(), &["-p"]), &store(), &NullReporter, &NullReporter, &mut out)
            .await
            .unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), format!("{}\n", path.display()));
    }

    #[tokio::test]
    async fn test_update_stores_name() {
        let dir = tempfile::tempdir().unwrap();
        let name_file = dir.path().join("current");
        let name_arg = name_file.to_str().unwrap();
        let dest = dir.path().join("releases");
        let mut out = Vec::new();

        let path = update(
            &config(&dest, &["-n", name_arg]),
            &store(),
            &NullReporter,
            &NullReporter,
            &mut out,
        )
        .await
        .unwrap();

        assert_eq!(
            std::fs::read_to_string(&name_file).unwrap(),
            path.display().to_string()
        );
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_update_falls_back_to_most_recent() {
        let dir = tempfile::tempdir().unwrap();
        let t = |s| Utc.timestamp_opt(s, 0).unwrap();
        let store = MemoryStore::new("builds")
            .with_object("app-nightly.zip", t(50), b"new")
            .with_object("app-stable.zip", t(10), b"old");
        let mut out = Vec::new();

        let path = update(&config(dir.path(), &[]), &store, &NullReporter, &NullReporter, &mut out)
            .await
            .unwrap();
        assert_eq!(path, dir.path().join("app-nightly.zip"));
    }

    #[tokio::test]
    async fn test_update_empty_bucket() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = Vec::new();
        let err = update(
            &config(dir.path(), &[]),
            &MemoryStore::new("builds"),
            &NullReporter,
            &NullReporter,
            &mut out,
        )
        .await
        .unwrap_err();

        assert_eq!(err.to_string(), "No files found to update the service app");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
