//! In-memory metadata store for testing.

use super::{EntryInfoStream, deserialize, serialize};
use crate::error::{ErrorKind, Result};
use crate::{EntryInfo, Fingerprint, MetadataStore};
use async_stream::stream;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use time::OffsetDateTime;
use tokio::sync::RwLock;
use unfurl_extract::models::MetadataDocument;

/// In-memory metadata store for testing.
///
/// Entries are kept in their serialized form in a `HashMap` behind a
/// [`RwLock`], so reads go through the same (de)serialization as a real store
/// and corrupt entries can be seeded with [`insert_raw`](Self::insert_raw).
/// Writes can be made to fail with [`set_failing_writes`](Self::set_failing_writes)
/// and are counted.
///
/// # Examples
///
/// ```
/// use unfurl_storage::{Fingerprint, MetadataStore, backend::MemoryStore};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let key = Fingerprint::of("https://example.com/");
/// let store = MemoryStore::default();
/// store.insert_raw(key.clone(), b"{ not json").await;
/// assert!(store.exists(&key).await?);
/// assert!(store.read(&key).await.is_err());
/// # Ok(())
/// # }
/// ```
pub struct MemoryStore {
    name: String,
    storage: RwLock<HashMap<Fingerprint, (OffsetDateTime, Vec<u8>)>>,
    failing_writes: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryStore {
    /// Change the name of the memory store.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Store bytes under a key exactly as given, bypassing serialization.
    pub async fn insert_raw(&self, key: Fingerprint, bytes: impl Into<Vec<u8>>) {
        self.storage.write().await.insert(key, (OffsetDateTime::now_utc(), bytes.into()));
    }

    /// The stored bytes for a key, if any.
    pub async fn raw(&self, key: &Fingerprint) -> Option<Vec<u8>> {
        self.storage.read().await.get(key).map(|(_, bytes)| bytes.clone())
    }

    pub async fn len(&self) -> usize {
        self.storage.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.storage.read().await.is_empty()
    }

    /// Make every subsequent write fail with a permission error.
    pub fn set_failing_writes(&self, failing: bool) {
        self.failing_writes.store(failing, Ordering::SeqCst);
    }

    /// Number of write attempts, failed ones included.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}
impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            name: "memory".to_string(),
            storage: RwLock::default(),
            failing_writes: AtomicBool::new(false),
            writes: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl MetadataStore for MemoryStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn exists(&self, key: &Fingerprint) -> Result<bool> {
        Ok(self.storage.read().await.contains_key(key))
    }

    async fn read(&self, key: &Fingerprint) -> Result<MetadataDocument> {
        let guard = self.storage.read().await;
        let (_modified, bytes) = guard.get(key).ok_or_else(|| exn::Exn::from(ErrorKind::NotFound(key.clone())))?;
        deserialize(key, bytes)
    }

    async fn write(&self, key: &Fingerprint, document: &MetadataDocument) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.failing_writes.load(Ordering::SeqCst) {
            exn::bail!(ErrorKind::PermissionDenied(format!("memory://{key}").into()));
        }
        let bytes = serialize(document)?;
        self.storage.write().await.insert(key.clone(), (OffsetDateTime::now_utc(), bytes));
        Ok(())
    }

    async fn delete(&self, key: &Fingerprint) -> Result<()> {
        self.storage
            .write()
            .await
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| exn::Exn::from(ErrorKind::NotFound(key.clone())))
    }

    fn list_stream(&self) -> EntryInfoStream<'_> {
        Box::pin(stream! {
            // Snapshot under the read lock, then drop it before yielding to
            // avoid holding the lock across yield points.
            let entries: Vec<EntryInfo> = {
                let guard = self.storage.read().await;
                guard
                    .iter()
                    .map(|(key, (modified, bytes))| EntryInfo {
                        fingerprint: key.clone(),
                        size: bytes.len() as u64,
                        modified: *modified,
                    })
                    .collect()
            };
            for entry in entries {
                yield Ok(entry);
            }
        })
    }
}
