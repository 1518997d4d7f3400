use super::{Author, Extra, Images, non_empty};
use serde::{Deserialize, Serialize};

/// Structured metadata describing a single web page.
///
/// Created once per URL by a [`MetadataSource`](crate::MetadataSource) and
/// never mutated afterwards; the cache stores it verbatim. Every field is
/// optional, and a missing field (or a whole missing section) is a normal
/// state rather than an error.
///
/// On the wire the document uses camelCase keys:
///
/// ```json
/// {
///   "general": { "title": "Hello World", "description": "A page." },
///   "openGraph": { "title": "Hello", "image": [{ "url": "https://example.com/a.png" }] },
///   "structuredData": { "author": { "name": "Jane Doe" } }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub general: Option<General>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_graph: Option<OpenGraph>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structured_data: Option<StructuredData>,
    #[serde(flatten)]
    pub extra: Extra,
}
impl MetadataDocument {
    /// `true` when no section carries anything at all.
    pub fn is_empty(&self) -> bool {
        self.general.as_ref().is_none_or(General::is_empty)
            && self.open_graph.as_ref().is_none_or(OpenGraph::is_empty)
            && self.structured_data.as_ref().is_none_or(StructuredData::is_empty)
            && self.extra.is_empty()
    }

    pub fn general_title(&self) -> Option<&str> {
        self.general.as_ref().and_then(|g| non_empty(g.title.as_ref()))
    }

    pub fn general_description(&self) -> Option<&str> {
        self.general.as_ref().and_then(|g| non_empty(g.description.as_ref()))
    }

    pub fn og_title(&self) -> Option<&str> {
        self.open_graph.as_ref().and_then(|og| non_empty(og.title.as_ref()))
    }

    pub fn og_description(&self) -> Option<&str> {
        self.open_graph.as_ref().and_then(|og| non_empty(og.description.as_ref()))
    }

    /// URL of the first Open Graph image, whether the document holds one
    /// image or an ordered list of them.
    pub fn og_image(&self) -> Option<&str> {
        self.open_graph.as_ref().and_then(|og| og.image.as_ref()).and_then(Images::first_url)
    }

    pub fn author_name(&self) -> Option<&str> {
        self.structured_data.as_ref().and_then(|sd| sd.author.as_ref()).and_then(Author::name)
    }
}

/// Plain HTML metadata (`<title>`, `<meta name="description">`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct General {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}
impl General {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.canonical.is_none()
            && self.lang.is_none()
            && self.extra.is_empty()
    }
}

/// Open Graph protocol properties (`og:*`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenGraph {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Images>,
    #[serde(flatten)]
    pub extra: Extra,
}
impl OpenGraph {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.site_name.is_none()
            && self.kind.is_none()
            && self.url.is_none()
            && self.image.is_none()
            && self.extra.is_empty()
    }
}

/// Data pulled from JSON-LD (`<script type="application/ld+json">`) blocks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
    #[serde(flatten)]
    pub extra: Extra,
}
impl StructuredData {
    pub fn is_empty(&self) -> bool {
        self.author.is_none() && self.extra.is_empty()
    }
}
