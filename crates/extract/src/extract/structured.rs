use crate::models::Author;
use serde_json::Value;

/// Finds the first usable `author` across a page's JSON-LD blocks.
///
/// Blocks that aren't valid JSON are skipped; pages ship broken JSON-LD more
/// often than you'd hope.
pub(crate) fn find_author(blocks: impl IntoIterator<Item = String>) -> Option<Author> {
    blocks.into_iter().filter_map(|block| serde_json::from_str::<Value>(block.trim()).ok()).find_map(|v| search(&v))
}

/// Depth-first search through top-level objects, arrays and `@graph` nodes.
fn search(value: &Value) -> Option<Author> {
    match value {
        Value::Array(items) => items.iter().find_map(search),
        Value::Object(object) => {
            if let Some(author) = object.get("author")
                && let Ok(author) = serde_json::from_value::<Author>(author.clone())
                && author.name().is_some()
            {
                return Some(author);
            }
            object.get("@graph").and_then(search)
        },
        _ => None,
    }
}
