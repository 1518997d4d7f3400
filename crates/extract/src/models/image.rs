use super::{Extra, non_empty};
use serde::{Deserialize, Serialize};

/// The `openGraph.image` value: extractors disagree on whether this is a
/// single image, a list of images, or a bare URL string, so all three shapes
/// are accepted and written back out as they came in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Images {
    Url(String),
    Many(Vec<Image>),
    One(Image),
}
impl Images {
    /// URL of the first image. An image without one hides any that follow.
    pub fn first_url(&self) -> Option<&str> {
        match self {
            Images::Url(url) => Some(url.as_str()).filter(|u| !u.trim().is_empty()),
            Images::One(image) => image.url(),
            Images::Many(images) => images.first().and_then(Image::url),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Images::Url(_) | Images::One(_) => 1,
            Images::Many(images) => images.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Mutable access to every image URL, for rewriting relative URLs.
    pub fn urls_mut(&mut self) -> Vec<&mut String> {
        match self {
            Images::Url(url) => vec![url],
            Images::One(image) => image.urls_mut(),
            Images::Many(images) => images.iter_mut().flat_map(Image::urls_mut).collect(),
        }
    }
}
impl From<Vec<Image>> for Images {
    fn from(mut images: Vec<Image>) -> Self {
        match images.len() {
            1 => Images::One(images.remove(0)),
            _ => Images::Many(images),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secure_url: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    /// Width, height and anything else a source recorded about the image.
    #[serde(flatten)]
    pub extra: Extra,
}
impl Image {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: Some(url.into()), ..Default::default() }
    }

    /// Prefers `url`, falling back to `secureUrl`.
    pub fn url(&self) -> Option<&str> {
        non_empty(self.url.as_ref()).or_else(|| non_empty(self.secure_url.as_ref()))
    }

    fn urls_mut(&mut self) -> Vec<&mut String> {
        self.url.iter_mut().chain(self.secure_url.iter_mut()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(r#""https://example.com/a.png""#, Some("https://example.com/a.png"), 1)]
    #[case(r#"{"url": "https://example.com/a.png", "width": "1200"}"#, Some("https://example.com/a.png"), 1)]
    #[case(
        r#"[{"url": "https://example.com/a.png"}, {"url": "https://example.com/b.png"}]"#,
        Some("https://example.com/a.png"),
        2
    )]
    #[case(r#"[{"width": 10}, {"url": "https://example.com/b.png"}]"#, None, 2)]
    #[case(r#"{"secureUrl": "https://example.com/s.png"}"#, Some("https://example.com/s.png"), 1)]
    #[case(r#"[]"#, None, 0)]
    #[case(r#"{"url": ""}"#, None, 1)]
    fn test_first_url(#[case] json: &str, #[case] expected: Option<&str>, #[case] len: usize) {
        let images: Images = serde_json::from_str(json).unwrap();
        assert_eq!(images.first_url(), expected);
        assert_eq!(images.len(), len);
    }

    #[test]
    fn test_shape_is_preserved() {
        for json in [r#""https://a/b.png""#, r#"{"url":"https://a/b.png"}"#, r#"[{"url":"https://a/b.png"}]"#] {
            let images: Images = serde_json::from_str(json).unwrap();
            assert_eq!(serde_json::to_string(&images).unwrap(), json);
        }
    }

    #[test]
    fn test_from_vec() {
        assert!(matches!(Images::from(vec![Image::new("a")]), Images::One(_)));
        assert!(matches!(Images::from(vec![Image::new("a"), Image::new("b")]), Images::Many(_)));
    }
}
