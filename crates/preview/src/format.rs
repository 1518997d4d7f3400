//! Link preview HTML fragments.
//!
//! A [`MetadataDocument`] is reduced to a handful of escaped text fields which
//! are then rendered through an [upon] template. The default template produces
//! a two-anchor card: a link icon (plus a lazily loaded image when the page
//! has one) and the title, description, optional author and domain.
//!
//! # Template Variables
//!
//! | Variable      | Type             | Description                                   |
//! |---------------|------------------|-----------------------------------------------|
//! | `url`         | `String`         | The link itself                               |
//! | `domain`      | `String`         | Host part of the link, or the whole link      |
//! | `title`       | `String`         | Truncated title, may be empty                 |
//! | `description` | `String`         | Truncated description, may be empty           |
//! | `author`      | `String`         | Author name, may be empty                     |
//! | `image`       | `Option<String>` | First Open Graph image URL                    |
//! | `placeholder` | `String`         | 1×1 transparent GIF data URI for lazy images  |
//!
//! Every value is HTML-escaped before it reaches the template, and upon's
//! default formatter doesn't escape again, so values go in verbatim.

use crate::error::{Error, ErrorKind, Result};
use crate::rules::{self, Rules};
use crate::{display_domain, escape_html, truncate};
use exn::ResultExt;
use std::path::Path;
use std::str::FromStr;
use tracing::instrument;
use unfurl_extract::models::MetadataDocument;
use upon::{Engine, Template};

/// Eager `src` of preview images; the real URL goes in `data-src`.
pub const PLACEHOLDER_IMAGE: &str = "data:image/gif;base64,R0lGODlhAQABAAD/ACwAAAAAAQABAAACADs=";

const LINK_ICON: &str = concat!(
    r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 67.733 67.733">"##,
    r##"<path fill="#424242" d="M0 0h67.733v67.733H0z"/>"##,
    r##"<path fill="#fff" d="M33.867 13.547a20.32 20.32 0 00-20.32 20.32 20.32 20.32 0 0020.32 20.32 20.32"##,
    r##" 20.32 0 0020.32-20.32H50.8A16.933 16.933 0 0133.867 50.8a16.933 16.933 0 01-16.934-16.933 16.933"##,
    r##" 16.933 0 0116.934-16.934z"/>"##,
    r##"<path fill="#fff" d="M26.383 36.361l4.99 4.99 19.955-19.957 4.99 4.99V11.415H41.35l4.99 4.99L26.382"##,
    r##" 36.36"/></svg>"##,
);

/// Template used unless configuration provides another one.
pub fn default_template() -> String {
    [
        r#"<div class="lp"><a class="lp-img" href="{{ url }}" target="_blank">"#,
        LINK_ICON,
        r#"{% if image %}"#,
        r#"<img src="{{ placeholder }}" data-src="{{ image }}" alt="{{ title }}" loading="lazy">"#,
        r#"{% endif %}"#,
        r#"</a><a class="lp-meta" href="{{ url }}" target="_blank">"#,
        r#"<span class="lp-title">{{ title }}<br></span><span class="lp-desc">{{ description }}</span>"#,
        r#"<div class="mt-1 text-sm">{% if author %}<span class="lp-author">{{ author }}</span> - {% endif %}"#,
        r#"<span class="lp-url">{{ domain }}</span></div></a></div>"#,
    ]
    .concat()
}

/// Fixed, visually distinct fragment shown when a page's metadata couldn't be
/// retrieved.
pub fn error_fragment(url: &str) -> String {
    format!(
        r#"<div style="color:#ff0000; font-weight:bold">ERROR: Did not receive metadata for {}</div>"#,
        escape_html(url)
    )
}

/// The escaped, truncated values a preview is rendered from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields {
    pub url: String,
    pub domain: String,
    pub title: String,
    pub description: String,
    pub author: String,
    pub image: Option<String>,
}
impl Fields {
    fn to_value(&self) -> upon::Value {
        upon::value! {
            url: self.url.as_str(),
            domain: self.domain.as_str(),
            title: self.title.as_str(),
            description: self.description.as_str(),
            author: self.author.as_str(),
            image: self.image.as_deref(),
            placeholder: PLACEHOLDER_IMAGE,
        }
    }
}

/// Turns a URL and its [`MetadataDocument`] into an HTML fragment.
///
/// Constructed via [`FromStr`] (or [`new`](Self::new) for the default
/// template), which compiles the template eagerly so that syntax errors
/// surface at creation time rather than at render time. The compiled
/// template is reusable across any number of [`format`](Self::format) calls
/// and threads.
///
/// # Examples
///
/// ```
/// use unfurl_extract::models::{General, MetadataDocument};
/// use unfurl_preview::Formatter;
///
/// let document = MetadataDocument {
///     general: Some(General { title: Some("Hello & Goodbye".into()), ..Default::default() }),
///     ..Default::default()
/// };
/// let html = Formatter::new().unwrap().format("https://example.com/a", &document);
/// assert!(html.contains("Hello &amp; Goodbye"));
/// assert!(html.contains(r#"<span class="lp-url">example.com</span>"#));
/// ```
pub struct Formatter {
    engine: Engine<'static>,
    template: Template<'static>,
    rules: Rules,
}
impl FromStr for Formatter {
    type Err = Error;

    /// Compiles the given template source. Returns [`ErrorKind::Template`] if
    /// the syntax is invalid.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let engine = Engine::new();
        let template = engine.compile(s.to_string()).or_raise(|| ErrorKind::Template)?;
        Ok(Self { engine, template, rules: Rules::default() })
    }
}
impl Formatter {
    /// A formatter using [`default_template`].
    pub fn new() -> Result<Self> {
        default_template().parse()
    }

    /// A formatter using the template stored at `path`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).or_raise(|| ErrorKind::TemplateFile(path.to_path_buf()))?;
        source.parse()
    }

    pub fn with_rules(mut self, rules: Rules) -> Self {
        self.rules = rules;
        self
    }

    /// Selects, escapes and truncates every field of a preview.
    pub fn fields(&self, url: &str, document: &MetadataDocument) -> Fields {
        let text = |field: &[rules::Rule]| escape_html(rules::select(field, document).unwrap_or_default()).into_owned();
        Fields {
            url: escape_html(url).into_owned(),
            domain: escape_html(display_domain(url)).into_owned(),
            title: truncate(&text(&self.rules.title), crate::MAX_CHARS).into_owned(),
            description: truncate(&text(&self.rules.description), crate::MAX_CHARS).into_owned(),
            author: text(&self.rules.author).trim().to_string(),
            image: rules::select(&self.rules.image, document).map(|image| escape_html(image.trim()).into_owned()),
        }
    }

    /// Renders the preview fragment for `url`.
    ///
    /// Never fails: documents with nothing in them still produce a complete
    /// fragment, and a template that errors while rendering is logged and
    /// replaced by the [`error_fragment`].
    #[instrument(level = "trace", skip(self, document))]
    pub fn format(&self, url: &str, document: &MetadataDocument) -> String {
        let fields = self.fields(url, document);
        match self.template.render(&self.engine, fields.to_value()).to_string() {
            Ok(html) => html.replace(['\r', '\n'], " "),
            Err(err) => {
                tracing::error!(error = %err, "Preview template failed to render");
                error_fragment(url)
            },
        }
    }
}
