use std::borrow::Cow;

/// Replaces `& < > " '` with their HTML entities.
///
/// Returns the input unchanged (and unallocated) when there is nothing to
/// escape.
///
/// ```
/// use unfurl_preview::escape_html;
///
/// assert_eq!(escape_html("Tom & Jerry's <show>"), "Tom &amp; Jerry&#039;s &lt;show&gt;");
/// ```
pub fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }
    let mut escaped = String::with_capacity(text.len() + text.len() / 4);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            c => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}
