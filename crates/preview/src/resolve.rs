//! Cache-first preview resolution.

use crate::coalesce::SingleFlight;
use crate::format::{Formatter, error_fragment};
use tracing::instrument;
use unfurl_extract::SourceHandle;
use unfurl_extract::models::MetadataDocument;
use unfurl_storage::{Fingerprint, StoreHandle};

/// Which path produced a fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Formatted from a stored document; the source wasn't consulted.
    Cached(String),
    /// Fetched from the source (and written to the store, if it allowed).
    Fetched(String),
    /// The source failed; the fragment is the error fragment.
    Failed(String),
}
impl Outcome {
    pub fn html(&self) -> &str {
        match self {
            Self::Cached(html) | Self::Fetched(html) | Self::Failed(html) => html,
        }
    }

    pub fn into_html(self) -> String {
        match self {
            Self::Cached(html) | Self::Fetched(html) | Self::Failed(html) => html,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Turns URLs into preview fragments, fetching each page's metadata at most
/// once and keeping it in a [`MetadataStore`](unfurl_storage::MetadataStore)
/// forever after.
///
/// Resolution never fails from the caller's point of view: store problems are
/// logged and worked around, and a failed fetch renders the
/// [`error_fragment`]. The resolver is `Send + Sync`; share it by reference or
/// in an `Arc` and resolve as many URLs concurrently as needed.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use unfurl_extract::{MockSource, models::{General, MetadataDocument}};
/// use unfurl_preview::{Formatter, Resolver};
/// use unfurl_storage::backend::MemoryStore;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let document = MetadataDocument {
///     general: Some(General { title: Some("Hello World".into()), ..Default::default() }),
///     ..Default::default()
/// };
/// let source = Arc::new(MockSource::with_documents([("https://example.com/a", document)]));
/// let resolver = Resolver::new(Arc::new(MemoryStore::default()), source.clone(), Formatter::new().unwrap());
///
/// let first = resolver.resolve("https://example.com/a").await;
/// // Served from the store this time.
/// source.set_failing(true);
/// assert_eq!(resolver.resolve("https://example.com/a").await, first);
/// # }
/// ```
pub struct Resolver {
    store: StoreHandle,
    source: SourceHandle,
    formatter: Formatter,
    in_flight: Option<SingleFlight<Fingerprint, Option<MetadataDocument>>>,
}
impl Resolver {
    /// A resolver that coalesces concurrent resolutions of the same URL.
    pub fn new(store: StoreHandle, source: SourceHandle, formatter: Formatter) -> Self {
        Self { store, source, formatter, in_flight: Some(SingleFlight::new()) }
    }

    /// Enable or disable coalescing. With it, callers that miss the cache
    /// while a fetch of the same URL is already running wait for that fetch
    /// and share its result, failure included. Without it, each of them
    /// fetches and writes on its own; the store settles on the last write.
    pub fn with_coalescing(mut self, enabled: bool) -> Self {
        self.in_flight = enabled.then(SingleFlight::new);
        self
    }

    pub fn formatter(&self) -> &Formatter {
        &self.formatter
    }

    /// Resolve `url` to a preview fragment.
    pub async fn resolve(&self, url: &str) -> String {
        self.resolve_outcome(url).await.into_html()
    }

    /// Resolve `url`, reporting which path produced the fragment.
    #[instrument(skip(self), fields(key))]
    pub async fn resolve_outcome(&self, url: &str) -> Outcome {
        let key = Fingerprint::of(url);
        tracing::Span::current().record("key", key.as_str());

        if let Some(document) = self.cached(&key).await {
            return Outcome::Cached(self.formatter.format(url, &document));
        }

        let fetched = match &self.in_flight {
            Some(flights) => flights.run(&key, || self.fetch_and_store(url, &key)).await,
            None => self.fetch_and_store(url, &key).await,
        };
        match fetched {
            Some(document) => Outcome::Fetched(self.formatter.format(url, &document)),
            None => Outcome::Failed(error_fragment(url)),
        }
    }

    /// Fetch `url` and persist the result on a best-effort basis. `None` means
    /// the source failed; the failure is logged here.
    async fn fetch_and_store(&self, url: &str, key: &Fingerprint) -> Option<MetadataDocument> {
        let document = match self.source.fetch(url).await {
            Ok(document) => document,
            Err(err) => {
                tracing::warn!(source = self.source.name(), error = %err, "Fetching metadata failed");
                return None;
            },
        };
        if let Err(err) = self.store.write(key, &document).await {
            tracing::warn!(
                store = self.store.name(),
                error = %err,
                "Could not persist metadata; it will be fetched again next time"
            );
        }
        Some(document)
    }

    /// The stored document for `key`, or `None` if it has to be fetched.
    async fn cached(&self, key: &Fingerprint) -> Option<MetadataDocument> {
        match self.store.exists(key).await {
            Ok(true) => {},
            Ok(false) => {
                tracing::debug!(store = self.store.name(), "Cache miss");
                return None;
            },
            Err(err) => {
                tracing::warn!(store = self.store.name(), error = %err, "Could not check cache; fetching instead");
                return None;
            },
        }
        match self.store.read(key).await {
            Ok(document) => {
                tracing::debug!(store = self.store.name(), "Cache hit");
                Some(document)
            },
            // Deleted between the two calls.
            Err(err) if err.is_not_found() => {
                tracing::debug!(store = self.store.name(), "Cache entry vanished; fetching instead");
                None
            },
            Err(err) => {
                tracing::warn!(store = self.store.name(), error = %err, "Unreadable cache entry; fetching again");
                None
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use unfurl_extract::MockSource;
    use unfurl_extract::models::General;
    use unfurl_storage::MetadataStore;
    use unfurl_storage::backend::MemoryStore;

    const URL: &str = "https://example.com/a";

    fn document(title: &str) -> MetadataDocument {
        MetadataDocument {
            general: Some(General { title: Some(title.to_string()), ..Default::default() }),
            ..Default::default()
        }
    }

    fn resolver(store: &Arc<MemoryStore>, source: &Arc<MockSource>) -> Resolver {
        Resolver::new(store.clone(), source.clone(), Formatter::new().unwrap())
    }

    #[tokio::test]
    async fn test_miss_then_hit() {
        let store = Arc::new(MemoryStore::default());
        let source = Arc::new(MockSource::with_documents([(URL, document("Hello"))]));
        let resolver = resolver(&store, &source);

        let first = resolver.resolve_outcome(URL).await;
        assert!(matches!(&first, Outcome::Fetched(html) if html.contains("Hello")));
        assert_eq!(store.read(&Fingerprint::of(URL)).await.unwrap(), document("Hello"));

        let second = resolver.resolve_outcome(URL).await;
        assert_eq!(second, Outcome::Cached(first.into_html()));
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_fetch_failure_renders_error_and_writes_nothing() {
        let store = Arc::new(MemoryStore::default());
        let source = Arc::new(MockSource::failing());
        let outcome = resolver(&store, &source).resolve_outcome(URL).await;
        assert!(outcome.is_failed());
        assert_eq!(outcome.html(), error_fragment(URL));
        assert!(store.is_empty().await);
        assert_eq!(store.writes(), 0);
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_refetched_and_overwritten() {
        let store = Arc::new(MemoryStore::default());
        let key = Fingerprint::of(URL);
        store.insert_raw(key.clone(), "{ definitely not json").await;
        let source = Arc::new(MockSource::with_documents([(URL, document("Fresh"))]));

        let outcome = resolver(&store, &source).resolve_outcome(URL).await;
        assert!(matches!(&outcome, Outcome::Fetched(html) if html.contains("Fresh")));
        assert_eq!(store.read(&key).await.unwrap(), document("Fresh"));
    }

    #[tokio::test]
    async fn test_corrupt_entry_and_failing_source() {
        let store = Arc::new(MemoryStore::default());
        store.insert_raw(Fingerprint::of(URL), "[]").await;
        let source = Arc::new(MockSource::failing());
        let outcome = resolver(&store, &source).resolve_outcome(URL).await;
        assert_eq!(outcome, Outcome::Failed(error_fragment(URL)));
    }

    #[tokio::test]
    async fn test_write_failure_still_previews() {
        let store = Arc::new(MemoryStore::default());
        store.set_failing_writes(true);
        let source = Arc::new(MockSource::with_documents([(URL, document("Unsaved"))]));
        let resolver = resolver(&store, &source);

        let outcome = resolver.resolve_outcome(URL).await;
        assert!(matches!(&outcome, Outcome::Fetched(html) if html.contains("Unsaved")));
        assert_eq!(store.writes(), 1);
        // Nothing was stored, so the next call fetches again.
        assert!(matches!(resolver.resolve_outcome(URL).await, Outcome::Fetched(_)));
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_empty_document_is_cached_too() {
        let store = Arc::new(MemoryStore::default());
        let source = Arc::new(MockSource::with_documents([(URL, MetadataDocument::default())]));
        let resolver = resolver(&store, &source);
        assert!(matches!(resolver.resolve_outcome(URL).await, Outcome::Fetched(_)));
        assert!(matches!(resolver.resolve_outcome(URL).await, Outcome::Cached(_)));
    }

    #[tokio::test]
    async fn test_exact_url_bytes_are_distinct_keys() {
        let store = Arc::new(MemoryStore::default());
        let source = Arc::new(MockSource::with_documents([
            ("https://example.com", document("No slash")),
            ("https://example.com/", document("Slash")),
        ]));
        let resolver = resolver(&store, &source);
        assert!(resolver.resolve("https://example.com").await.contains("No slash"));
        assert!(resolver.resolve("https://example.com/").await.contains("Slash"));
        assert_eq!(store.len().await, 2);
    }
}
