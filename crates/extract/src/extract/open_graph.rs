use crate::models::{Image, Images, OpenGraph};
use serde_json::Value;

/// Accumulates `og:*` properties in document order.
///
/// `og:image` (or an `og:image:url` when the latest image already has a URL)
/// starts a new image; the remaining `og:image:*` structured properties
/// describe whichever image came last. For single-valued properties the first
/// occurrence wins.
#[derive(Debug, Default)]
pub(crate) struct OpenGraphBuilder {
    graph: OpenGraph,
    images: Vec<Image>,
}
impl OpenGraphBuilder {
    pub(crate) fn push(&mut self, property: &str, content: &str) {
        let content = content.trim();
        if content.is_empty() {
            return;
        }
        let property = property.trim().to_ascii_lowercase();
        let Some(key) = property.strip_prefix("og:") else {
            return;
        };
        match key {
            "title" => set_once(&mut self.graph.title, content),
            "description" => set_once(&mut self.graph.description, content),
            "site_name" => set_once(&mut self.graph.site_name, content),
            "type" => set_once(&mut self.graph.kind, content),
            "url" => set_once(&mut self.graph.url, content),
            "image" => self.images.push(Image::new(content)),
            "image:url" => match self.images.last_mut() {
                Some(image) if image.url.is_none() => image.url = Some(content.to_string()),
                _ => self.images.push(Image::new(content)),
            },
            "image:secure_url" => self.latest_image().secure_url = Some(content.to_string()),
            "image:type" => self.latest_image().kind = Some(content.to_string()),
            "image:alt" => self.latest_image().alt = Some(content.to_string()),
            "image:width" | "image:height" => {
                let dimension = key.trim_start_matches("image:").to_string();
                self.latest_image().extra.insert(dimension, Value::String(content.to_string()));
            },
            _ => {},
        }
    }

    /// The image that structured properties attach to, created on demand
    /// when a page lists `og:image:*` before any `og:image`.
    fn latest_image(&mut self) -> &mut Image {
        if self.images.is_empty() {
            self.images.push(Image::default());
        }
        let last = self.images.len() - 1;
        &mut self.images[last]
    }

    pub(crate) fn build(mut self) -> OpenGraph {
        if !self.images.is_empty() {
            self.graph.image = Some(Images::from(self.images));
        }
        self.graph
    }
}

fn set_once(field: &mut Option<String>, value: &str) {
    if field.is_none() {
        *field = Some(value.to_string());
    }
}
