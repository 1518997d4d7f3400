//! Scripted metadata source for testing.

use crate::error::{ErrorKind, Result};
use crate::models::MetadataDocument;
use crate::source::MetadataSource;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

/// Scripted [`MetadataSource`] for testing.
///
/// Serves pre-registered documents per URL and answers anything else with
/// [`ErrorKind::Unavailable`]. It can be switched into a failing mode at any
/// point (every fetch errors with [`ErrorKind::Network`]), counts how often it
/// was invoked, and can simulate slow networks with a per-fetch delay.
///
/// # Examples
///
/// ```
/// use unfurl_extract::{MetadataSource, MockSource, models::MetadataDocument};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let source = MockSource::with_documents([("https://example.com/", MetadataDocument::default())]);
/// assert!(source.fetch("https://example.com/").await.is_ok());
///
/// source.set_failing(true);
/// assert!(source.fetch("https://example.com/").await.is_err());
/// assert_eq!(source.calls(), 2);
/// # }
/// ```
#[derive(Default)]
pub struct MockSource {
    documents: Mutex<HashMap<String, MetadataDocument>>,
    failing: AtomicBool,
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl MockSource {
    pub fn with_documents(documents: impl IntoIterator<Item = (impl Into<String>, MetadataDocument)>) -> Self {
        Self {
            documents: Mutex::new(documents.into_iter().map(|(url, doc)| (url.into(), doc)).collect()),
            ..Default::default()
        }
    }

    /// A source where every fetch fails.
    pub fn failing() -> Self {
        let source = Self::default();
        source.set_failing(true);
        source
    }

    /// Sleep for `delay` inside every fetch before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn insert(&self, url: impl Into<String>, document: MetadataDocument) {
        self.lock().insert(url.into(), document);
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of times [`fetch`](MetadataSource::fetch) has been invoked.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, MetadataDocument>> {
        // A poisoned lock only means another test thread panicked mid-insert.
        self.documents.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl MetadataSource for MockSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch(&self, url: &str) -> Result<MetadataDocument> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            exn::bail!(ErrorKind::Network);
        }
        let document = self.lock().get(url).cloned();
        match document {
            Some(document) => Ok(document),
            None => exn::bail!(ErrorKind::Unavailable(url.to_string())),
        }
    }
}
