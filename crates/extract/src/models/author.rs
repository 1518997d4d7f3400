use super::{Extra, non_empty};
use serde::{Deserialize, Serialize};

/// The `structuredData.author` value.
///
/// JSON-LD allows a name string, a `Person`/`Organization` object, or an
/// array of either.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Author {
    Name(String),
    List(Vec<Author>),
    Person(Person),
}
impl Author {
    /// The first non-empty name, depth first.
    pub fn name(&self) -> Option<&str> {
        match self {
            Author::Name(name) => Some(name.as_str()).filter(|n| !n.trim().is_empty()),
            Author::Person(person) => non_empty(person.name.as_ref()),
            Author::List(authors) => authors.iter().find_map(Author::name),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Person {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}
impl Person {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: Some(name.into()), extra: Extra::new() }
    }
}
