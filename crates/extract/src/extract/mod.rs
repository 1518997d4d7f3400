//! Metadata extraction from raw HTML documents.

mod open_graph;
mod structured;

use crate::consts;
use crate::models::{General, MetadataDocument, OpenGraph, StructuredData};
use scraper::{ElementRef, Html};
use std::convert::Infallible;
use std::str::FromStr;
use tracing::instrument;

pub(crate) use self::open_graph::OpenGraphBuilder;

#[derive(Debug)]
pub struct Extractor {
    document: Html,
}
impl Extractor {
    pub fn from_document(document: Html) -> Self {
        Self { document }
    }

    pub fn from_html(html: &str) -> Self {
        Self::from_document(Html::parse_document(html))
    }

    /// Builds the [`MetadataDocument`] for the page.
    ///
    /// Never fails: HTML parsing is error-tolerant and a page without any
    /// recognisable metadata simply yields an empty document. Sections with
    /// nothing in them are left out entirely.
    #[instrument(level = "trace")]
    pub fn document(&self) -> MetadataDocument {
        MetadataDocument {
            general: Some(self.general()).filter(|g| !g.is_empty()),
            open_graph: Some(self.open_graph()).filter(|og| !og.is_empty()),
            structured_data: Some(self.structured_data()).filter(|sd| !sd.is_empty()),
            extra: Default::default(),
        }
    }

    fn general(&self) -> General {
        General {
            title: self.document.select(&consts::TITLE_SELECTOR).next().map(text).filter(|t| !t.is_empty()),
            description: self.named_meta("description"),
            canonical: self.canonical(),
            lang: self
                .document
                .select(&consts::HTML_SELECTOR)
                .next()
                .and_then(|el| el.value().attr("lang"))
                .map(str::trim)
                .filter(|lang| !lang.is_empty())
                .map(str::to_string),
            extra: Default::default(),
        }
    }

    fn named_meta(&self, name: &str) -> Option<String> {
        self.document.select(&consts::META_SELECTOR).find_map(|el| {
            let element = el.value();
            element
                .attr("name")
                .filter(|n| n.trim().eq_ignore_ascii_case(name))
                .and_then(|_| element.attr("content"))
                .map(str::trim)
                .filter(|content| !content.is_empty())
                .map(str::to_string)
        })
    }

    fn canonical(&self) -> Option<String> {
        self.document.select(&consts::LINK_SELECTOR).find_map(|el| {
            let element = el.value();
            let rel = element.attr("rel")?;
            rel.split_ascii_whitespace()
                .any(|r| r.eq_ignore_ascii_case("canonical"))
                .then(|| element.attr("href"))
                .flatten()
                .map(str::trim)
                .filter(|href| !href.is_empty())
                .map(str::to_string)
        })
    }

    fn open_graph(&self) -> OpenGraph {
        let mut builder = OpenGraphBuilder::default();
        for el in self.document.select(&consts::META_SELECTOR) {
            let element = el.value();
            // Plenty of sites use `name="og:..."` instead of `property`.
            let Some(property) = element.attr("property").or_else(|| element.attr("name")) else {
                continue;
            };
            if let Some(content) = element.attr("content") {
                builder.push(property, content);
            }
        }
        builder.build()
    }

    fn structured_data(&self) -> StructuredData {
        let blocks = self
            .document
            .select(&consts::SCRIPT_SELECTOR)
            .filter(|el| el.value().attr("type").is_some_and(|t| t.trim().eq_ignore_ascii_case(consts::JSON_LD_TYPE)))
            .map(|el| el.text().collect::<String>());
        StructuredData { author: structured::find_author(blocks), extra: Default::default() }
    }
}
impl FromStr for Extractor {
    type Err = Infallible;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::from_html(s))
    }
}
impl From<Html> for Extractor {
    fn from(document: Html) -> Self {
        Self::from_document(document)
    }
}
impl From<Extractor> for MetadataDocument {
    fn from(extractor: Extractor) -> Self {
        extractor.document()
    }
}

/// Element text with runs of whitespace collapsed to single spaces.
fn text(el: ElementRef<'_>) -> String {
    el.text().flat_map(str::split_whitespace).collect::<Vec<_>>().join(" ")
}
