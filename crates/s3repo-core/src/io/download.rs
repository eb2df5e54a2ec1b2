//! Streams a selected artifact from the store to disk with progress reporting.

use std::path::{Component, Path, PathBuf};

use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt, BufWriter};

use crate::reporter::ProgressSink;
use crate::store::ObjectStore;
use crate::{Error, Result};

const CHUNK_SIZE: usize = 64 * 1024;

/// Download `key` into `destination`, returning the written path.
///
/// The destination directory is created if needed and the file is named
/// after the key. Bytes go to a `.part` sibling first, which is renamed
/// into place once the body has been read completely and removed if the
/// transfer fails.
///
/// # Errors
///
/// Returns [`Error::UnsafeKey`] if the key would resolve outside
/// `destination`, [`Error::Store`] if the object cannot be opened and
/// [`Error::Io`] if reading the body or writing the file fails.
pub async fn download(
    store: &dyn ObjectStore,
    key: &str,
    destination: &Path,
    progress: &dyn ProgressSink,
) -> Result<PathBuf> {
    let dest_path = destination.join(relative_key_path(key)?);
    let part_path = part_path(&dest_path);
    if let Some(parent) = dest_path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let object = store.fetch(key).await?;
    let total = object.content_length;

    progress.started(key, total);
    let written = match write_body(object.body, &part_path, key, total, progress).await {
        Ok(written) => written,
        Err(e) => {
            let _ = tokio::fs::remove_file(&part_path).await;
            return Err(e.into());
        }
    };
    if let Err(e) = tokio::fs::rename(&part_path, &dest_path).await {
        let _ = tokio::fs::remove_file(&part_path).await;
        return Err(e.into());
    }
    progress.finished(key, written);

    tracing::debug!(key, path = %dest_path.display(), bytes = written, "artifact written");
    Ok(dest_path)
}

/// The key as a relative path made only of plain segments.
fn relative_key_path(key: &str) -> Result<&Path> {
    let path = Path::new(key);
    let mut components = path.components().peekable();
    let plain = components.peek().is_some()
        && components.all(|c| matches!(c, Component::Normal(_)));
    if plain {
        Ok(path)
    } else {
        Err(Error::UnsafeKey {
            key: key.to_string(),
        })
    }
}

fn part_path(dest_path: &Path) -> PathBuf {
    let mut name = dest_path.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    dest_path.with_file_name(name)
}

async fn write_body(
    mut body: impl AsyncRead + Unpin,
    path: &Path,
    key: &str,
    total: Option<u64>,
    progress: &dyn ProgressSink,
) -> std::io::Result<u64> {
    let mut writer = BufWriter::new(File::create(path).await?);
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut written: u64 = 0;

    loop {
        let n = body.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        writer.write_all(&buf[..n]).await?;
        written += n as u64;
        progress.advanced(key, written, total);
    }
    writer.flush().await?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::NullReporter;
    use crate::store::MemoryStore;
    use crate::store::{FetchedObject, StoreError};
    use crate::types::CandidateKey;
    use async_trait::async_trait;
    use chrono::DateTime;
    use std::io;
    use std::pin::Pin;
    use std::sync::Mutex;
    use std::task::{Context, Poll};

    #[derive(Default)]
    struct Recording {
        events: Mutex<Vec<(u64, Option<u64>)>>,
        finished: Mutex<Option<u64>>,
    }

    impl ProgressSink for Recording {
        fn started(&self, _: &str, total: Option<u64>) {
            self.events.lock().unwrap().push((0, total));
        }
        fn advanced(&self, _: &str, current: u64, total: Option<u64>) {
            self.events.lock().unwrap().push((current, total));
        }
        fn finished(&self, _: &str, bytes: u64) {
            *self.finished.lock().unwrap() = Some(bytes);
        }
    }

    #[tokio::test]
    async fn test_download_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("releases");
        let store = MemoryStore::new("b").with_object("app-1-2.zip", DateTime::UNIX_EPOCH, b"payload");

        let path = download(&store, "app-1-2.zip", &dest, &NullReporter)
            .await
            .unwrap();

        assert_eq!(path, dest.join("app-1-2.zip"));
        assert_eq!(std::fs::read(&path).unwrap(), b"payload");
    }

    #[tokio::test]
    async fn test_download_reports_progress() {
        let dir = tempfile::tempdir().unwrap();
        let data = vec![7u8; CHUNK_SIZE * 2 + 10];
        let store = MemoryStore::new("b").with_object("app-9.bin", DateTime::UNIX_EPOCH, &data);
        let recording = Recording::default();

        download(&store, "app-9.bin", dir.path(), &recording)
            .await
            .unwrap();

        let events = recording.events.lock().unwrap();
        let total = Some(data.len() as u64);
        assert_eq!(events.first(), Some(&(0, total)));
        assert_eq!(events.last(), Some(&(data.len() as u64, total)));
        assert_eq!(*recording.finished.lock().unwrap(), Some(data.len() as u64));
    }

    #[tokio::test]
    async fn test_download_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryStore::new("b");
        let err = download(&store, "app-1.zip", dir.path(), &NullReporter)
            .await
            .unwrap_err();
        assert!(matches!(err, crate::Error::Store(_)));
        assert!(!dir.path().join("app-1.zip").exists());
    }

    /// Yields a few bytes, then fails like a dropped connection.
    struct BrokenStore;

    struct ResetReader;

    impl AsyncRead for ResetReader {
        fn poll_read(
            self: Pin<&mut Self>,
            _: &mut Context<'_>,
            _: &mut tokio::io::ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            Poll::Ready(Err(io::Error::new(
                io::ErrorKind::ConnectionReset,
                "connection reset",
            )))
        }
    }

    #[async_trait]
    impl ObjectStore for BrokenStore {
        fn bucket(&self) -> &str {
            "b"
        }

        async fn list_keys(&self, _: &str) -> Result<Vec<CandidateKey>, StoreError> {
            Ok(Vec::new())
        }

        async fn fetch(&self, _: &str) -> Result<FetchedObject, StoreError> {
            let body = io::Cursor::new(b"partial".to_vec()).chain(ResetReader);
            Ok(FetchedObject {
                body: Box::pin(body),
                content_length: Some(1024),
            })
        }
    }

    #[tokio::test]
    async fn test_download_interrupted_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let recording = Recording::default();

        let err = download(&BrokenStore, "app-1-2.zip", dir.path(), &recording)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Io(ref e) if e.kind() == io::ErrorKind::ConnectionReset));
        assert!(!dir.path().join("app-1-2.zip").exists());
        assert!(!dir.path().join("app-1-2.zip.part").exists());
        assert_eq!(*recording.finished.lock().unwrap(), None);
    }

    #[tokio::test]
    async fn test_download_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("app-1-2.zip"), b"old").unwrap();
        let store = MemoryStore::new("b").with_object("app-1-2.zip", DateTime::UNIX_EPOCH, b"new");

        let path = download(&store, "app-1-2.zip", dir.path(), &NullReporter)
            .await
            .unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"new");
        assert!(!dir.path().join("app-1-2.zip.part").exists());
    }

    #[tokio::test]
    async fn test_download_rejects_keys_leaving_destination() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("releases");
        let store = MemoryStore::new("b")
            .with_object("app-x/../../escape.zip", DateTime::UNIX_EPOCH, b"payload")
            .with_object("/etc/app-1.zip", DateTime::UNIX_EPOCH, b"payload");

        for key in ["app-x/../../escape.zip", "/etc/app-1.zip", ""] {
            let err = download(&store, key, &dest, &NullReporter)
                .await
                .unwrap_err();
            assert!(matches!(err, Error::UnsafeKey { .. }), "{key}: {err:?}");
        }
        assert!(!dir.path().join("escape.zip").exists());
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn test_download_nested_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryStore::new("b").with_object("app-1/build-2.zip", DateTime::UNIX_EPOCH, b"x");

        let path = download(&store, "app-1/build-2.zip", dir.path(), &NullReporter)
            .await
            .unwrap();

        assert_eq!(path, dir.path().join("app-1").join("build-2.zip"));
        assert_eq!(std::fs::read(&path).unwrap(), b"x");
    }
}
