use crate::error::Result;
use crate::models::MetadataDocument;
use async_trait::async_trait;
use std::sync::Arc;

/// Something that can turn a URL into a [`MetadataDocument`].
///
/// Fetching may suspend on network I/O for as long as the implementation
/// allows; callers impose no timeout of their own, so an implementation that
/// talks to the network should offer one (see `HttpSource`). Failures are not
/// retried by the caller.
///
/// # Examples
///
/// ```
/// use unfurl_extract::{MetadataSource, error::Result};
///
/// async fn title_of(source: &dyn MetadataSource, url: &str) -> Result<Option<String>> {
///     let document = source.fetch(url).await?;
///     Ok(document.og_title().or(document.general_title()).map(str::to_string))
/// }
/// ```
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Name of the source, used for logging only.
    fn name(&self) -> &str;

    /// Fetch the page at `url` and extract its metadata.
    async fn fetch(&self, url: &str) -> Result<MetadataDocument>;
}

pub type SourceHandle = Arc<dyn MetadataSource + Send + Sync>;
