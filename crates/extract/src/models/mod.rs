mod author;
mod document;
mod image;

pub use self::author::{Author, Person};
pub use self::document::{General, MetadataDocument, OpenGraph, StructuredData};
pub use self::image::{Image, Images};

/// Keys a section doesn't model are kept verbatim, so documents written by
/// other extractors survive a trip through the cache unchanged.
pub type Extra = serde_json::Map<String, serde_json::Value>;

/// Treat empty (or whitespace-only) strings the same as absent ones.
fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.trim().is_empty())
}
