//! Link detection in free-form theme descriptions.
//!
//! A link is `http://` or `https://` (any case) followed by everything up to
//! the next whitespace or double quote. Trailing punctuation such as a period
//! at the end of a sentence stays part of the match.
//!
//! Newlines become `<br />` only after links are substituted, so a link at
//! the end of a line never takes the markup into its `href`.

use once_cell::sync::Lazy;
use regex::Regex;

static LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)https?://[^\s"]+"#).expect("link pattern is valid"));

/// Render a description as HTML: escape angle brackets, turn links into
/// anchors and newlines into `<br />`.
pub fn encode_description(text: &str) -> String {
    let escaped = text.replace('<', "&lt;").replace('>', "&gt;");
    let linked = LINK_RE.replace_all(&escaped, r#"<a href="$0">$0</a>"#);
    linked.replace('\n', "<br />")
}

/// Links in `text`, in the order they appear.
pub fn extract_links(text: &str) -> Vec<String> {
    LINK_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Links across several descriptions, keeping description order and
/// duplicates.
pub fn extract_all_links<I, S>(descriptions: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    descriptions
        .into_iter()
        .flat_map(|desc| extract_links(desc.as_ref()))
        .collect()
}
