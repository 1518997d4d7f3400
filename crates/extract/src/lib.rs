mod consts;
pub mod error;
mod extract;
#[cfg(feature = "http")]
mod http;
#[cfg(feature = "mock")]
mod mock;
pub mod models;
mod source;

use tracing::instrument;

pub use crate::extract::Extractor;
#[cfg(feature = "http")]
pub use crate::http::{HttpOptions, HttpSource};
#[cfg(feature = "mock")]
pub use crate::mock::MockSource;
use crate::models::MetadataDocument;
pub use crate::source::{MetadataSource, SourceHandle};

/// Easy, top-level entrypoint for extracting a [`MetadataDocument`] from raw
/// HTML bytes.
///
/// Accepts raw bytes, instead of requiring HTML to be valid UTF-8. Invalid byte
/// sequences are replaced with U+FFFD during parsing. See [`Extractor`] for
/// more details.
#[instrument(skip(html), fields(html_size = html.as_ref().len()))]
pub fn extract(html: impl AsRef<[u8]>) -> MetadataDocument {
    let html = String::from_utf8_lossy(html.as_ref());
    Extractor::from_html(&html).document()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_tolerates_invalid_utf8() {
        let mut html = b"<html><head><title>Caf".to_vec();
        html.push(0xff);
        html.extend_from_slice(b"</title></head></html>");
        let document = extract(&html);
        assert_eq!(document.general_title(), Some("Caf\u{fffd}"));
    }

    #[test]
    fn test_extract_empty_input() {
        assert!(extract(b"").is_empty());
    }
}
