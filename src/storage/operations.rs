//! Storage operations
//!
//! Handles file system operations for the HTTP API including list, upload,
//! delete and batch delete. Every name that reaches the filesystem goes
//! through the naming and validation rules first.

use log::{error, info, warn};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::StorageError;
use crate::storage::naming::{to_original_name, to_storage_name};
use crate::storage::results::{BatchDeleteResult, StoredFile};
use crate::storage::validation::{base_file_name, resolve_in_root};
use crate::utils::unix_now;

const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Flat file store rooted at a single directory
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the storage root if it is missing.
    pub async fn ensure_root(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// Lists stored files sorted by their display name.
    ///
    /// A missing root means nothing has been uploaded yet and yields an
    /// empty list.
    pub async fn list(&self) -> Result<Vec<StoredFile>, StorageError> {
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                error!("Failed to read storage root {}: {}", self.root.display(), e);
                return Err(e.into());
            }
        };

        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() {
                continue;
            }
            let unique_name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(raw) => {
                    warn!("Skipping non UTF-8 file name {:?}", raw);
                    continue;
                }
            };
            let original_name = to_original_name(&unique_name).to_string();
            files.push(StoredFile {
                unique_name,
                original_name,
            });
        }

        files.sort_by(|a, b| a.original_name.cmp(&b.original_name));
        Ok(files)
    }

    /// Stores the content of `reader` under a fresh timestamped name.
    ///
    /// Only the base name of `original_name` is kept. If the copy fails the
    /// partial file is removed again.
    pub async fn upload<R>(&self, original_name: &str, reader: R) -> Result<StoredFile, StorageError>
    where
        R: AsyncRead,
    {
        self.upload_at(original_name, reader, unix_now()).await
    }

    /// Same as [`FileStore::upload`] with an explicit timestamp.
    pub async fn upload_at<R>(
        &self,
        original_name: &str,
        reader: R,
        now: u64,
    ) -> Result<StoredFile, StorageError>
    where
        R: AsyncRead,
    {
        let Some(base_name) = base_file_name(original_name) else {
            warn!("Rejected upload with unsafe file name {:?}", original_name);
            return Err(StorageError::InvalidFileName(original_name.to_string()));
        };

        let unique_name = to_storage_name(base_name, now);
        let file_path = resolve_in_root(&self.root, &unique_name)?;

        let mut file = fs::File::create(&file_path).await.map_err(|e| {
            error!("Failed to create {}: {}", file_path.display(), e);
            e
        })?;

        tokio::pin!(reader);
        let written = match write_body(&mut reader, &mut file).await {
            Ok(written) => written,
            Err(e) => {
                drop(file);
                if let Err(rm) = fs::remove_file(&file_path).await {
                    error!("Failed to remove partial upload {}: {}", file_path.display(), rm);
                }
                warn!("Discarded partial upload {}: {}", unique_name, e);
                return Err(e);
            }
        };

        info!("Stored {} ({} bytes)", unique_name, written);

        Ok(StoredFile {
            unique_name,
            original_name: base_name.to_string(),
        })
    }

    /// Deletes a single file by its storage name.
    pub async fn delete(&self, name: &str) -> Result<(), StorageError> {
        let file_path = resolve_in_root(&self.root, name)?;

        match fs::remove_file(&file_path).await {
            Ok(()) => {
                info!("Deleted file {}", name);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StorageError::FileNotFound(name.to_string()))
            }
            Err(e) => {
                error!("Failed to delete file {}: {}", file_path.display(), e);
                Err(e.into())
            }
        }
    }

    /// Deletes every name independently and reports which ones went away.
    pub async fn batch_delete<I, S>(&self, names: I) -> BatchDeleteResult
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut result = BatchDeleteResult::default();

        for name in names {
            let name = name.into();
            match self.delete(&name).await {
                Ok(()) => result.success.push(name),
                Err(e) => {
                    warn!("Batch delete of {:?} failed: {}", name, e);
                    result.failed.push(name);
                }
            }
        }

        result
    }
}

/// Copies the whole body into `file`.
///
/// Failing to read the body is reported as [`StorageError::UploadInterrupted`];
/// failing to write it is a plain I/O error.
async fn write_body<R, W>(reader: &mut R, file: &mut W) -> Result<u64, StorageError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = vec![0u8; COPY_BUFFER_SIZE];
    let mut written = 0u64;

    loop {
        let n = reader
            .read(&mut buf)
            .await
            .map_err(StorageError::UploadInterrupted)?;
        if n == 0 {
            break;
        }
        file.write_all(&buf[..n]).await?;
        written += n as u64;
    }

    file.flush().await?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;
    use futures_util::stream;
    use std::io;
    use tempfile::tempdir;
    use tokio_util::io::StreamReader;

    fn store_in(dir: &Path) -> FileStore {
        FileStore::new(dir.join("uploads"))
    }

    #[tokio::test]
    async fn list_missing_root_is_empty() {
        let temp = tempdir().expect("tempdir");
        let store = store_in(temp.path());
        assert!(store.list().await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn upload_then_list_includes_original_name() {
        let temp = tempdir().expect("tempdir");
        let store = store_in(temp.path());
        store.ensure_root().await.expect("root");

        let stored = store
            .upload_at("notes.txt", &b"hello"[..], 1700000000)
            .await
            .expect("upload");
        assert_eq!(stored.unique_name, "1700000000-notes.txt");
        assert_eq!(stored.original_name, "notes.txt");

        let on_disk = std::fs::read(store.root().join("1700000000-notes.txt")).expect("read");
        assert_eq!(on_disk, b"hello");

        let files = store.list().await.expect("list");
        assert_eq!(files, vec![stored]);
    }

    #[tokio::test]
    async fn list_sorts_by_display_name_and_skips_directories() {
        let temp = tempdir().expect("tempdir");
        let store = store_in(temp.path());
        store.ensure_root().await.expect("root");

        std::fs::write(store.root().join("300-alpha.txt"), b"").expect("write");
        std::fs::write(store.root().join("100-charlie.txt"), b"").expect("write");
        std::fs::write(store.root().join("200-bravo.txt"), b"").expect("write");
        std::fs::write(store.root().join("plain"), b"").expect("write");
        std::fs::create_dir(store.root().join("999-subdir")).expect("mkdir");

        let names: Vec<String> = store
            .list()
            .await
            .expect("list")
            .into_iter()
            .map(|f| f.original_name)
            .collect();
        assert_eq!(names, vec!["alpha.txt", "bravo.txt", "charlie.txt", "plain"]);
    }

    #[tokio::test]
    async fn upload_rejects_names_without_a_base() {
        let temp = tempdir().expect("tempdir");
        let store = store_in(temp.path());
        store.ensure_root().await.expect("root");

        for name in ["", "..", "dir/", "..\\.."] {
            let result = store.upload_at(name, &b"x"[..], 1).await;
            assert!(matches!(result, Err(StorageError::InvalidFileName(_))));
        }
        assert!(store.list().await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn upload_keeps_only_the_base_name() {
        let temp = tempdir().expect("tempdir");
        let store = store_in(temp.path());
        store.ensure_root().await.expect("root");

        let nested = store.upload_at("x/a.txt", &b"1"[..], 5).await.expect("upload");
        assert_eq!(nested.unique_name, "5-a.txt");
        assert_eq!(nested.original_name, "a.txt");

        let windows = store
            .upload_at("C:\\docs\\b.txt", &b"2"[..], 6)
            .await
            .expect("upload");
        assert_eq!(windows.unique_name, "6-b.txt");

        let escaping = store
            .upload_at("../../escape.txt", &b"3"[..], 7)
            .await
            .expect("upload");
        assert_eq!(escaping.unique_name, "7-escape.txt");
        assert!(store.root().join("7-escape.txt").exists());
        assert!(!temp.path().join("escape.txt").exists());
    }

    #[tokio::test]
    async fn interrupted_upload_leaves_no_file_behind() {
        let temp = tempdir().expect("tempdir");
        let store = store_in(temp.path());
        store.ensure_root().await.expect("root");

        let chunks = vec![
            Ok(Bytes::from_static(b"first half of the body")),
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "client went away")),
        ];
        let reader = StreamReader::new(stream::iter(chunks));

        let result = store.upload_at("big.bin", reader, 9).await;
        assert!(matches!(
            result,
            Err(StorageError::UploadInterrupted(ref e)) if e.kind() == io::ErrorKind::ConnectionReset
        ));
        assert!(!store.root().join("9-big.bin").exists());
        assert!(store.list().await.expect("list").is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn list_skips_non_utf8_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp = tempdir().expect("tempdir");
        let store = store_in(temp.path());
        store.ensure_root().await.expect("root");

        let raw = OsStr::from_bytes(b"100-bad\xffname.txt");
        if std::fs::write(store.root().join(raw), b"").is_err() {
            // some filesystems refuse non UTF-8 names outright
            return;
        }
        std::fs::write(store.root().join("200-good.txt"), b"").expect("write");

        let names: Vec<String> = store
            .list()
            .await
            .expect("list")
            .into_iter()
            .map(|f| f.unique_name)
            .collect();
        assert_eq!(names, vec!["200-good.txt"]);
    }

    #[tokio::test]
    async fn upload_without_root_is_io_error() {
        let temp = tempdir().expect("tempdir");
        let store = store_in(temp.path());

        let result = store.upload_at("a.txt", &b"x"[..], 1).await;
        assert!(matches!(result, Err(StorageError::IoError(_))));
    }

    #[tokio::test]
    async fn delete_twice_succeeds_once() {
        let temp = tempdir().expect("tempdir");
        let store = store_in(temp.path());
        store.ensure_root().await.expect("root");
        std::fs::write(store.root().join("a.txt"), b"data").expect("write");

        assert!(store.delete("a.txt").await.is_ok());
        assert!(matches!(
            store.delete("a.txt").await,
            Err(StorageError::FileNotFound(_))
        ));
    }

    #[tokio::test]
    async fn delete_rejects_traversal() {
        let temp = tempdir().expect("tempdir");
        let store = store_in(temp.path());
        store.ensure_root().await.expect("root");
        std::fs::write(temp.path().join("outside.txt"), b"keep").expect("write");

        let result = store.delete("../outside.txt").await;
        assert!(matches!(result, Err(StorageError::InvalidFileName(_))));
        assert!(temp.path().join("outside.txt").exists());
    }

    #[tokio::test]
    async fn batch_delete_partitions_outcomes_in_input_order() {
        let temp = tempdir().expect("tempdir");
        let store = store_in(temp.path());
        store.ensure_root().await.expect("root");
        std::fs::write(store.root().join("a.txt"), b"").expect("write");
        std::fs::write(store.root().join("b.txt"), b"").expect("write");

        let result = store
            .batch_delete(["b.txt", "../../etc/passwd", "missing.txt", "a.txt"])
            .await;

        assert_eq!(result.success, vec!["b.txt", "a.txt"]);
        assert_eq!(result.failed, vec!["../../etc/passwd", "missing.txt"]);
        assert!(store.list().await.expect("list").is_empty());
    }
}
