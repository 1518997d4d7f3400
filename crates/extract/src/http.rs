//! Network-backed metadata source.

use crate::error::{ErrorKind, Result};
use crate::models::MetadataDocument;
use crate::source::MetadataSource;
use async_trait::async_trait;
use exn::ResultExt;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Url};
use std::time::Duration;
use tracing::instrument;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml;q=0.9,*/*;q=0.1";

/// Options for [`HttpSource`].
#[derive(Debug, Clone)]
pub struct HttpOptions {
    /// Whole-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    pub user_agent: String,
    /// Bytes of body read before giving up on the rest of the page. Page
    /// metadata lives in `<head>`, so the tail of a huge page is never needed.
    pub max_bytes: usize,
}
impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(30)),
            user_agent: concat!("unfurl/", env!("CARGO_PKG_VERSION")).to_string(),
            max_bytes: 2 * 1024 * 1024,
        }
    }
}

/// Fetches pages over HTTP(S) and runs them through the
/// [`Extractor`](crate::Extractor).
///
/// Non-success statuses and non-HTML responses are errors. Relative Open
/// Graph image URLs are resolved against the final (post-redirect) page URL.
pub struct HttpSource {
    client: Client,
    max_bytes: usize,
}
impl HttpSource {
    pub fn new(options: HttpOptions) -> Result<Self> {
        let mut builder = Client::builder().user_agent(options.user_agent).gzip(true).brotli(true);
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().or_raise(|| ErrorKind::Client)?;
        Ok(Self { client, max_bytes: options.max_bytes })
    }

    fn check_content_type(value: Option<&str>) -> Result<()> {
        // A missing header is given the benefit of the doubt.
        let Some(value) = value else {
            return Ok(());
        };
        let mime = value.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
        if mime.is_empty() || mime.contains("html") {
            return Ok(());
        }
        exn::bail!(ErrorKind::UnsupportedContent(mime))
    }
}

#[async_trait]
impl MetadataSource for HttpSource {
    fn name(&self) -> &str {
        "http"
    }

    #[instrument(skip(self), fields(bytes))]
    async fn fetch(&self, url: &str) -> Result<MetadataDocument> {
        let mut response =
            self.client.get(url).header(ACCEPT, ACCEPT_HTML).send().await.or_raise(|| ErrorKind::Network)?;
        let status = response.status();
        if !status.is_success() {
            exn::bail!(ErrorKind::Status(status.as_u16()));
        }
        Self::check_content_type(response.headers().get(CONTENT_TYPE).and_then(|v| v.to_str().ok()))?;
        let base = response.url().clone();

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.or_raise(|| ErrorKind::Network)? {
            let remaining = self.max_bytes.saturating_sub(body.len());
            body.extend_from_slice(&chunk[..chunk.len().min(remaining)]);
            if body.len() >= self.max_bytes {
                tracing::debug!(
                    max_bytes = self.max_bytes,
                    "Response body truncated; metadata is expected in the head"
                );
                break;
            }
        }
        tracing::Span::current().record("bytes", body.len());

        let mut document = crate::extract(&body);
        absolutize_images(&mut document, &base);
        Ok(document)
    }
}

fn absolutize_images(document: &mut MetadataDocument, base: &Url) {
    let Some(images) = document.open_graph.as_mut().and_then(|og| og.image.as_mut()) else {
        return;
    };
    for url in images.urls_mut() {
        if Url::parse(url).is_err()
            && let Ok(absolute) = base.join(url)
        {
            *url = absolute.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PAGE: &str = r#"<html><head>
        <title>Hello World</title>
        <meta name="description" content="A page.">
        <meta property="og:image" content="/images/cover.png">
        </head><body></body></html>"#;

    async fn serve(route: &str, response: ResponseTemplate) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET")).and(path(route)).respond_with(response).mount(&server).await;
        server
    }

    #[rstest]
    #[case(None, true)]
    #[case(Some("text/html; charset=utf-8"), true)]
    #[case(Some("application/xhtml+xml"), true)]
    #[case(Some("application/pdf"), false)]
    #[case(Some("image/png"), false)]
    fn test_check_content_type(#[case] value: Option<&str>, #[case] ok: bool) {
        assert_eq!(HttpSource::check_content_type(value).is_ok(), ok);
    }

    #[tokio::test]
    async fn test_fetch_extracts_metadata() {
        let server = serve("/a", ResponseTemplate::new(200).set_body_raw(PAGE, "text/html")).await;
        let source = HttpSource::new(HttpOptions::default()).unwrap();
        let document = source.fetch(&format!("{}/a", server.uri())).await.unwrap();
        assert_eq!(document.general_title(), Some("Hello World"));
        assert_eq!(document.general_description(), Some("A page."));
        assert_eq!(document.og_image(), Some(format!("{}/images/cover.png", server.uri()).as_str()));
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let server = serve("/missing", ResponseTemplate::new(404)).await;
        let source = HttpSource::new(HttpOptions::default()).unwrap();
        let err = source.fetch(&format!("{}/missing", server.uri())).await.unwrap_err();
        assert_eq!(*err, ErrorKind::Status(404));
    }

    #[tokio::test]
    async fn test_fetch_rejects_binary_content() {
        let server = serve("/file.pdf", ResponseTemplate::new(200).set_body_raw("%PDF-1.7", "application/pdf")).await;
        let source = HttpSource::new(HttpOptions::default()).unwrap();
        let err = source.fetch(&format!("{}/file.pdf", server.uri())).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::UnsupportedContent(mime) if mime == "application/pdf"));
    }

    #[tokio::test]
    async fn test_fetch_truncates_large_bodies() {
        let padding = "x".repeat(4096);
        let html = format!(
            "<html><head><title>Early</title></head><body>{padding}\
             <meta property=\"og:title\" content=\"Late\"></body></html>"
        );
        let server = serve("/big", ResponseTemplate::new(200).set_body_raw(html, "text/html")).await;
        let options = HttpOptions { max_bytes: 1024, ..Default::default() };
        let source = HttpSource::new(options).unwrap();
        let document = source.fetch(&format!("{}/big", server.uri())).await.unwrap();
        assert_eq!(document.general_title(), Some("Early"));
        assert_eq!(document.og_title(), None);
    }

    #[tokio::test]
    async fn test_fetch_malformed_url() {
        let source = HttpSource::new(HttpOptions::default()).unwrap();
        let err = source.fetch("not a url at all").await.unwrap_err();
        assert_eq!(*err, ErrorKind::Network);
    }

    #[tokio::test]
    async fn test_fetch_times_out() {
        let server =
            serve("/slow", ResponseTemplate::new(200).set_body_raw(PAGE, "text/html").set_delay(Duration::from_secs(5)))
                .await;
        let options = HttpOptions { timeout: Some(Duration::from_millis(100)), ..Default::default() };
        let source = HttpSource::new(options).unwrap();
        let err = source.fetch(&format!("{}/slow", server.uri())).await.unwrap_err();
        assert_eq!(*err, ErrorKind::Network);
    }
}
