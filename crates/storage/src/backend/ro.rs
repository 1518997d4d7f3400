//! Read-only metadata store.
//!
//! Wraps another store and prevents write operations from executing, while
//! still indicating success on return.

use crate::backend::EntryInfoStream;
use crate::error::Result;
use crate::{Fingerprint, MetadataStore, StoreHandle};
use async_trait::async_trait;
use unfurl_extract::models::MetadataDocument;

/// Read-only metadata store.
///
/// Wraps another store and silently drops all write operations, logging an
/// [`info event`](tracing::Event). Useful for builds that must not modify a
/// shared, checked-in cache.
#[derive(Clone)]
pub struct ReadOnlyStore {
    inner: StoreHandle,
}
impl ReadOnlyStore {
    pub fn new(inner: StoreHandle) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl MetadataStore for ReadOnlyStore {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn exists(&self, key: &Fingerprint) -> Result<bool> {
        self.inner.exists(key).await
    }

    async fn read(&self, key: &Fingerprint) -> Result<MetadataDocument> {
        self.inner.read(key).await
    }

    async fn write(&self, key: &Fingerprint, _document: &MetadataDocument) -> Result<()> {
        tracing::info!(store = self.inner.name(), key = %key, "Skipping write during read-only mode");
        Ok(())
    }

    async fn delete(&self, key: &Fingerprint) -> Result<()> {
        tracing::info!(store = self.inner.name(), key = %key, "Skipping delete during read-only mode");
        Ok(())
    }

    fn list_stream(&self) -> EntryInfoStream<'_> {
        self.inner.list_stream()
    }
}
