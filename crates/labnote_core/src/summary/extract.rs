//! Plain-text extraction from static HTML reports.

use once_cell::sync::Lazy;
use regex::Regex;

static SCRIPT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script\b.*?</script\s*>").expect("valid script regex"));
static STYLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<style\b.*?</style\s*>").expect("valid style regex"));
static COMMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid comment regex"));
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid tag regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

const ENTITIES: &[(&str, &str)] = &[
    ("&nbsp;", " "),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&apos;", "'"),
    // Must stay last so `&amp;lt;` decodes to `&lt;`, not `<`.
    ("&amp;", "&"),
];

/// Extracts readable text from an HTML report.
///
/// Script/style blocks and comments are dropped, tags become spaces, common
/// entities are decoded and whitespace runs collapse to one space.
pub fn extract_report_text(html: &str) -> String {
    let text = SCRIPT_RE.replace_all(html, " ");
    let text = STYLE_RE.replace_all(&text, " ");
    let text = COMMENT_RE.replace_all(&text, " ");
    let text = TAG_RE.replace_all(&text, " ");
    let mut decoded = text.into_owned();
    for (entity, replacement) in ENTITIES {
        decoded = decoded.replace(entity, replacement);
    }
    WHITESPACE_RE.replace_all(&decoded, " ").trim().to_string()
}

/// Truncates `text` to at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}
