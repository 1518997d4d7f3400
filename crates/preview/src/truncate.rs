//! Character-budget truncation for escaped preview text.

use memchr::memrchr;
use std::borrow::Cow;

/// Maximum length, in characters, of a preview title or description.
pub const MAX_CHARS: usize = 180;
pub const ELLIPSIS: char = '…';

/// Trims `text`, then shortens it to at most `max_chars` characters plus a
/// trailing [`ELLIPSIS`].
///
/// `text` is expected to be HTML-escaped already, so the budget counts escaped
/// characters (`&amp;` is five). The cut is made at the last whitespace at or
/// before character `max_chars`; text with no such whitespace is cut hard,
/// backing off so an `&...;` entity is never split.
///
/// ```
/// use unfurl_preview::truncate;
///
/// assert_eq!(truncate("  short  ", 180), "short");
/// assert_eq!(truncate("one two three", 9), "one two…");
/// assert_eq!(truncate("abc&amp;def", 6), "abc…");
/// ```
pub fn truncate(text: &str, max_chars: usize) -> Cow<'_, str> {
    let text = text.trim();
    let Some((limit, next)) = text.char_indices().nth(max_chars) else {
        return Cow::Borrowed(text);
    };
    // Characters 0..=max_chars: a whitespace exactly at the limit is still a
    // valid place to cut.
    let window = &text[..limit + next.len_utf8()];
    let kept = match window.char_indices().rev().find(|(_, c)| c.is_whitespace()) {
        Some((position, _)) => window[..position].trim_end(),
        None => hard_cut(&text[..limit]),
    };
    let mut truncated = String::with_capacity(kept.len() + ELLIPSIS.len_utf8());
    truncated.push_str(kept);
    truncated.push(ELLIPSIS);
    Cow::Owned(truncated)
}

/// Drops a trailing, unterminated `&...` so the cut never splits an entity.
fn hard_cut(candidate: &str) -> &str {
    let bytes = candidate.as_bytes();
    if let Some(amp) = memrchr(b'&', bytes)
        && memrchr(b';', bytes).is_none_or(|semi| semi < amp)
    {
        return &candidate[..amp];
    }
    candidate
}
