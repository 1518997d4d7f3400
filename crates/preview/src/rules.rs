//! Field selection rules.
//!
//! Each preview field is filled from an ordered list of rules: the first rule
//! that yields non-blank text wins, and a field with no winner is empty.

use unfurl_extract::models::MetadataDocument;

/// Picks one candidate value for a field out of a document.
pub type Rule = fn(&MetadataDocument) -> Option<&str>;

/// Ordered rules for every field of a preview.
#[derive(Debug, Clone)]
pub struct Rules {
    pub title: Vec<Rule>,
    pub description: Vec<Rule>,
    pub author: Vec<Rule>,
    pub image: Vec<Rule>,
}
impl Default for Rules {
    /// Open Graph first, then plain HTML metadata; author from structured data;
    /// the first Open Graph image.
    fn default() -> Self {
        Self {
            title: vec![MetadataDocument::og_title, MetadataDocument::general_title],
            description: vec![MetadataDocument::og_description, MetadataDocument::general_description],
            author: vec![MetadataDocument::author_name],
            image: vec![MetadataDocument::og_image],
        }
    }
}

/// Evaluates `rules` top-down, returning the first non-blank value.
pub fn select<'a>(rules: &[Rule], document: &'a MetadataDocument) -> Option<&'a str> {
    rules.iter().filter_map(|rule| rule(document)).find(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use unfurl_extract::models::{Author, General, Image, Images, OpenGraph, Person, StructuredData};

    fn document(og_title: Option<&str>, general_title: Option<&str>) -> MetadataDocument {
        MetadataDocument {
            general: Some(General { title: general_title.map(str::to_string), ..Default::default() }),
            open_graph: Some(OpenGraph { title: og_title.map(str::to_string), ..Default::default() }),
            ..Default::default()
        }
    }

    #[test]
    fn test_first_rule_wins() {
        let rules = Rules::default();
        assert_eq!(select(&rules.title, &document(Some("OG"), Some("General"))), Some("OG"));
    }

    #[test]
    fn test_falls_through_to_next_rule() {
        let rules = Rules::default();
        assert_eq!(select(&rules.title, &document(None, Some("General"))), Some("General"));
        assert_eq!(select(&rules.title, &document(Some("   "), Some("General"))), Some("General"));
    }

    #[test]
    fn test_no_rule_matches() {
        let rules = Rules::default();
        assert_eq!(select(&rules.title, &document(None, None)), None);
        assert_eq!(select(&rules.description, &MetadataDocument::default()), None);
        assert_eq!(select(&rules.author, &MetadataDocument::default()), None);
        assert_eq!(select(&rules.image, &MetadataDocument::default()), None);
    }

    #[test]
    fn test_author_and_image() {
        let rules = Rules::default();
        let doc = MetadataDocument {
            open_graph: Some(OpenGraph {
                image: Some(Images::Many(vec![
                    Image::new("https://example.com/1.png"),
                    Image::new("https://example.com/2.png"),
                ])),
                ..Default::default()
            }),
            structured_data: Some(StructuredData {
                author: Some(Author::List(vec![
                    Author::Person(Person::default()),
                    Author::Person(Person::new("Jane")),
                ])),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(select(&rules.author, &doc), Some("Jane"));
        assert_eq!(select(&rules.image, &doc), Some("https://example.com/1.png"));
    }

    #[test]
    fn test_custom_rules() {
        fn canonical(document: &MetadataDocument) -> Option<&str> {
            document.general.as_ref().and_then(|g| g.canonical.as_deref())
        }
        let doc = MetadataDocument {
            general: Some(General { canonical: Some("https://example.com/c".to_string()), ..Default::default() }),
            ..Default::default()
        };
        let rules: Vec<Rule> = vec![MetadataDocument::og_title, canonical];
        assert_eq!(select(&rules, &doc), Some("https://example.com/c"));
    }
}
