//! Metadata store trait and implementations.
//!
//! This module defines the `MetadataStore` trait, a small CRUD interface keyed
//! by [`Fingerprint`] over serialized [`MetadataDocument`]s, along with its
//! implementations (local directory, read-only decorator, and an in-memory
//! store for tests).

mod local;
#[cfg(feature = "mock")]
mod mock;
mod ro;

pub use self::local::LocalStore;
#[cfg(feature = "mock")]
pub use self::mock::MemoryStore;
pub use self::ro::ReadOnlyStore;
use crate::Fingerprint;
use crate::error::{ErrorKind, Result};
use async_trait::async_trait;
use exn::ResultExt;
use futures::{Stream, TryStreamExt};
use std::pin::Pin;
use time::OffsetDateTime;
use unfurl_extract::models::MetadataDocument;

type EntryInfoStream<'a> = Pin<Box<dyn Stream<Item = Result<EntryInfo>> + Send + 'a>>;

/// A cached entry as seen by a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    pub fingerprint: Fingerprint,
    /// Serialized size in bytes
    pub size: u64,
    /// Last time the entry was written
    pub modified: OffsetDateTime,
}

/// Unified interface for metadata stores.
///
/// Entries are never expired by a store; they live until overwritten or
/// explicitly deleted. Writing the same key concurrently from several tasks is
/// allowed: the last completed write wins, and a reader never observes a
/// partially written entry.
///
/// # Examples
///
/// ```
/// use unfurl_storage::{Fingerprint, MetadataStore, error::Result};
///
/// async fn cached_title(store: &dyn MetadataStore, url: &str) -> Result<Option<String>> {
///     let key = Fingerprint::of(url);
///     if !store.exists(&key).await? {
///         return Ok(None);
///     }
///     let document = store.read(&key).await?;
///     Ok(document.general_title().map(str::to_string))
/// }
/// ```
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Name of the store, used for logging only.
    fn name(&self) -> &str;

    /// Check if an entry exists. A missing entry is `Ok(false)`, never an
    /// error.
    async fn exists(&self, key: &Fingerprint) -> Result<bool>;

    /// Read and deserialize an entry.
    ///
    /// Returns [`NotFound`](crate::error::ErrorKind::NotFound) if there is no
    /// entry, and [`CorruptData`](crate::error::ErrorKind::CorruptData) if the
    /// stored bytes aren't a metadata document.
    async fn read(&self, key: &Fingerprint) -> Result<MetadataDocument>;

    /// Serialize and store a document, replacing any existing entry.
    async fn write(&self, key: &Fingerprint, document: &MetadataDocument) -> Result<()>;

    /// Remove an entry.
    ///
    /// Returns [`NotFound`](crate::error::ErrorKind::NotFound) if there is no
    /// entry.
    async fn delete(&self, key: &Fingerprint) -> Result<()>;

    /// Stream every entry in the store, in no particular order.
    ///
    /// # Examples
    ///
    /// ```
    /// use futures::TryStreamExt;
    /// # use unfurl_storage::{MetadataStore, error::Result};
    /// # async fn example(store: &dyn MetadataStore) -> Result<()> {
    /// let mut stream = store.list_stream();
    /// while let Some(entry) = stream.try_next().await? {
    ///     println!("{}: {} bytes", entry.fingerprint, entry.size);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    fn list_stream(&self) -> EntryInfoStream<'_>;

    /// List every entry in the store.
    ///
    /// Default implementation of this method is to collect all the results
    /// from [`list_stream()`](Self::list_stream) into a [`Vec`] before
    /// returning.
    async fn list(&self) -> Result<Vec<EntryInfo>> {
        self.list_stream().try_collect().await
    }
}

/// Canonical on-disk representation of a document: indented JSON.
pub(crate) fn serialize(document: &MetadataDocument) -> Result<Vec<u8>> {
    serde_json::to_vec_pretty(document).or_raise(|| ErrorKind::Serialize)
}

pub(crate) fn deserialize(key: &Fingerprint, bytes: &[u8]) -> Result<MetadataDocument> {
    serde_json::from_slice(bytes).or_raise(|| ErrorKind::CorruptData(key.clone()))
}
