//! Local filesystem metadata store.
//!
//! Entries live in a single flat directory, one `<fingerprint>.json` file per
//! key, accessed via `tokio::fs` for async I/O.

use crate::backend::{EntryInfoStream, deserialize, serialize};
use crate::error::{ErrorKind, Result};
use crate::{EntryInfo, Fingerprint, MetadataStore};
use async_stream::stream;
use async_trait::async_trait;
use std::fs::create_dir_all as sync_create_dir;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs::{self, DirEntry};
use unfurl_extract::models::MetadataDocument;

const EXTENSION: &str = "json";

/// Local filesystem metadata store.
///
/// Writes go to a uniquely named temporary file in the same directory which
/// is then renamed over the entry, so concurrent writers to one key are
/// last-write-wins and a reader never sees a half-written file.
///
/// # Examples
///
/// ```no_run
/// use unfurl_storage::backend::LocalStore;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = LocalStore::new("local", "/var/cache/unfurl/previews")?;
/// # Ok(())
/// # }
/// ```
pub struct LocalStore {
    name: String,
    root: PathBuf,
    temp_counter: AtomicU64,
}
impl LocalStore {
    /// Create a new local store rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidRoot`](ErrorKind::InvalidRoot) if the path is not
    /// absolute or exists but is not a directory. The directory (and its
    /// parents) are created if missing.
    pub fn new(name: impl Into<String>, root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_absolute() {
            exn::bail!(ErrorKind::InvalidRoot(root));
        }
        if root.exists() {
            if !root.is_dir() {
                exn::bail!(ErrorKind::InvalidRoot(root));
            }
        } else {
            // Use non-async here; it'll only happen once on startup and it's
            // not worth the hassle of making the constructor async.
            sync_create_dir(&root).map_err(|e| Self::map_io_error(e, &root))?;
        }
        Ok(Self { name: name.into(), root, temp_counter: AtomicU64::new(0) })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_path(&self, key: &Fingerprint) -> PathBuf {
        self.root.join(format!("{key}.{EXTENSION}"))
    }

    /// Temporary files start with a dot and end in `.tmp`, so they never parse
    /// as an entry when listing.
    fn temp_path(&self, key: &Fingerprint) -> PathBuf {
        let n = self.temp_counter.fetch_add(1, Ordering::Relaxed);
        self.root.join(format!(".{key}.{}.{n}.tmp", process::id()))
    }

    fn map_io_error(e: std::io::Error, path: &Path) -> ErrorKind {
        match e.kind() {
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied(path.to_path_buf()),
            _ => ErrorKind::Io(e),
        }
    }

    fn map_entry_error(e: std::io::Error, key: &Fingerprint, path: &Path) -> ErrorKind {
        match e.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::NotFound(key.clone()),
            _ => Self::map_io_error(e, path),
        }
    }

    /// `None` for anything in the directory that isn't an entry (temporary
    /// files, subdirectories, stray files).
    async fn process_entry(entry: DirEntry) -> Result<Option<EntryInfo>> {
        let path = entry.path();
        let Some(fingerprint) = path
            .extension()
            .filter(|ext| *ext == EXTENSION)
            .and(path.file_stem())
            .and_then(|stem| stem.to_str())
            .and_then(|stem| stem.parse::<Fingerprint>().ok())
        else {
            return Ok(None);
        };
        let metadata = entry.metadata().await.map_err(|e| Self::map_io_error(e, &path))?;
        if !metadata.is_file() {
            return Ok(None);
        }
        let modified = metadata.modified().map_err(ErrorKind::Io)?.into();
        Ok(Some(EntryInfo { fingerprint, size: metadata.len(), modified }))
    }
}

#[async_trait]
impl MetadataStore for LocalStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn exists(&self, key: &Fingerprint) -> Result<bool> {
        let path = self.entry_path(key);
        Ok(fs::try_exists(&path).await.map_err(|e| Self::map_io_error(e, &path))?)
    }

    async fn read(&self, key: &Fingerprint) -> Result<MetadataDocument> {
        let path = self.entry_path(key);
        let bytes = fs::read(&path).await.map_err(|e| Self::map_entry_error(e, key, &path))?;
        deserialize(key, &bytes)
    }

    async fn write(&self, key: &Fingerprint, document: &MetadataDocument) -> Result<()> {
        let bytes = serialize(document)?;
        let path = self.entry_path(key);
        let temp = self.temp_path(key);
        fs::write(&temp, &bytes).await.map_err(|e| Self::map_io_error(e, &temp))?;
        if let Err(e) = fs::rename(&temp, &path).await {
            if let Err(cleanup) = fs::remove_file(&temp).await {
                tracing::debug!(path = %temp.display(), error = %cleanup, "Could not remove temporary file");
            }
            exn::bail!(Self::map_io_error(e, &path));
        }
        Ok(())
    }

    async fn delete(&self, key: &Fingerprint) -> Result<()> {
        let path = self.entry_path(key);
        Ok(fs::remove_file(&path).await.map_err(|e| Self::map_entry_error(e, key, &path))?)
    }

    fn list_stream(&self) -> EntryInfoStream<'_> {
        Box::pin(stream! {
            let mut entries = match fs::read_dir(&self.root).await {
                Ok(entries) => entries,
                // The directory vanishing after construction is just an empty cache.
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => return,
                Err(err) => {
                    yield Err(exn::Exn::from(Self::map_io_error(err, &self.root)));
                    return;
                }
            };
            loop {
                let entry = match entries.next_entry().await {
                    Ok(Some(entry)) => entry,
                    Ok(None) => break,
                    Err(e) => { yield Err(exn::Exn::from(Self::map_io_error(e, &self.root))); continue; },
                };
                match Self::process_entry(entry).await {
                    Ok(Some(info)) => yield Ok(info),
                    Ok(None) => {},
                    Err(e) => yield Err(e),
                }
            }
        })
    }
}
