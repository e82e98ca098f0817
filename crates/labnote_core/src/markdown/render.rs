//! Ordered rule pipeline turning an entry body into display markup.
//!
//! # Invariants
//! - Rules run in a fixed order; later rules never see markup of stashed
//!   fragments (images, fenced code, inline code).
//! - Rendering is total: unmatched syntax is passed through unchanged.
//! - Line-anchored rules run before newlines are converted to breaks.
//! - Literal sentinel characters in the body come back out unchanged.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

const STASH_OPEN: char = '\u{E000}';
const STASH_CLOSE: char = '\u{E001}';
const PARAGRAPH_BREAK: &str = r#"<div class="paragraph-break"></div>"#;
const LINE_BREAK: &str = "<br/>";

static IMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[([^\]\n]*)\]\(img-(\d+)\)").expect("valid image regex"));
static FENCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?ms)^```[^`\n]*\n(.*?)^```[ \t]*$").expect("valid fenced code regex")
});
static INLINE_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"`([^`]+)`").expect("valid inline code regex"));
static TABLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^(\|.+\|)[ \t]*\n(\|[-| :]+\|)[ \t]*$((?:\n\|.+\|[ \t]*$)*)")
        .expect("valid table regex")
});
static H3_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^### (.+)$").expect("valid h3 regex"));
static H2_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^## (.+)$").expect("valid h2 regex"));
static H1_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^# (.+)$").expect("valid h1 regex"));
static BOLD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("valid bold regex"));
static ITALIC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.+?)\*").expect("valid italic regex"));
static CHECKED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^- \[x\] (.+)$").expect("valid checked item regex"));
static UNCHECKED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^- \[ \] (.+)$").expect("valid unchecked item regex"));
static BULLET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^- (.+)$").expect("valid bullet regex"));
static NUMBERED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\d+\. (.+)$").expect("valid numbered item regex"));
static STASH_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\x{E000}(\d+)\x{E001}").expect("valid stash token regex"));

/// Renders an entry body into display markup.
///
/// `images` resolves `![alt](img-<N>)` placeholders by position. Missing or
/// malformed indexes leave the placeholder text untouched. CRLF line endings
/// are treated as LF.
pub fn render(body: &str, images: &[String]) -> String {
    if body.is_empty() {
        return String::new();
    }

    let body = body.replace("\r\n", "\n");
    let mut stash = Stash::default();
    let text = hide_sentinels(&body, &mut stash);
    let text = replace_images(&text, images, &mut stash);
    let text = replace_fenced_code(&text, &mut stash);
    let text = replace_inline_code(&text, &mut stash);
    let text = replace_tables(&text);
    let text = replace_headings(&text);
    let text = replace_emphasis(&text);
    let text = replace_checklist(&text);
    let text = replace_lists(&text);
    let text = replace_breaks(&text);
    stash.restore(&text)
}

/// Markup fragments hidden from later rules behind private-use sentinels.
#[derive(Default)]
struct Stash {
    fragments: Vec<String>,
}

impl Stash {
    fn hold(&mut self, markup: &str) -> String {
        // Fragments may wrap earlier tokens (an image inside a code span).
        let resolved = self.restore(markup);
        let token = format!("{STASH_OPEN}{}{STASH_CLOSE}", self.fragments.len());
        self.fragments.push(resolved);
        token
    }

    fn restore(&self, text: &str) -> String {
        if !text.contains(STASH_OPEN) {
            return text.to_string();
        }
        STASH_TOKEN_RE
            .replace_all(text, |caps: &Captures<'_>| {
                caps[1]
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| self.fragments.get(index))
                    .cloned()
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}

/// Stashes literal sentinel characters so body text can never form a token.
fn hide_sentinels(text: &str, stash: &mut Stash) -> String {
    if !text.contains([STASH_OPEN, STASH_CLOSE]) {
        return text.to_string();
    }
    let mut hidden = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch == STASH_OPEN || ch == STASH_CLOSE {
            hidden.push_str(&stash.hold(ch.encode_utf8(&mut [0; 4])));
        } else {
            hidden.push(ch);
        }
    }
    hidden
}

fn replace_images(text: &str, images: &[String], stash: &mut Stash) -> String {
    IMAGE_RE
        .replace_all(text, |caps: &Captures<'_>| {
            let source = caps[2]
                .parse::<usize>()
                .ok()
                .and_then(|index| images.get(index));
            match source {
                Some(source) => stash.hold(&format!(
                    r#"<img class="md-image" src="{}" alt="{}"/>"#,
                    escape_attribute(source),
                    escape_attribute(&caps[1])
                )),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

fn replace_fenced_code(text: &str, stash: &mut Stash) -> String {
    FENCE_RE
        .replace_all(text, |caps: &Captures<'_>| {
            let inner = caps[1].strip_suffix('\n').unwrap_or(&caps[1]);
            stash.hold(&format!(
                r#"<pre class="code-block"><code>{inner}</code></pre>"#
            ))
        })
        .into_owned()
}

fn replace_inline_code(text: &str, stash: &mut Stash) -> String {
    INLINE_CODE_RE
        .replace_all(text, |caps: &Captures<'_>| {
            stash.hold(&format!(r#"<code class="inline-code">{}</code>"#, &caps[1]))
        })
        .into_owned()
}

fn replace_tables(text: &str) -> String {
    TABLE_RE
        .replace_all(text, |caps: &Captures<'_>| {
            let header = table_cells(&caps[1])
                .into_iter()
                .map(|cell| format!("<th>{cell}</th>"))
                .collect::<String>();
            let rows = caps[3]
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(|row| {
                    let cells = table_cells(row)
                        .into_iter()
                        .map(|cell| format!("<td>{cell}</td>"))
                        .collect::<String>();
                    format!("<tr>{cells}</tr>")
                })
                .collect::<String>();
            format!(
                r#"<table class="md-table"><thead><tr>{header}</tr></thead><tbody>{rows}</tbody></table>"#
            )
        })
        .into_owned()
}

/// Splits one table row on `|`, trimming cells and dropping blank ones.
fn table_cells(row: &str) -> Vec<&str> {
    row.split('|')
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .collect()
}

fn replace_headings(text: &str) -> String {
    let text = H3_RE.replace_all(text, r#"<h4 class="md-h4">${1}</h4>"#);
    let text = H2_RE.replace_all(&text, r#"<h3 class="md-h3">${1}</h3>"#);
    H1_RE
        .replace_all(&text, r#"<h2 class="md-h2">${1}</h2>"#)
        .into_owned()
}

fn replace_emphasis(text: &str) -> String {
    // Bold first: the single-asterisk rule would split `**` pairs.
    let text = BOLD_RE.replace_all(text, "<strong>${1}</strong>");
    ITALIC_RE.replace_all(&text, "<em>${1}</em>").into_owned()
}

fn replace_checklist(text: &str) -> String {
    let text = CHECKED_RE.replace_all(text, "<div class=\"checkbox checked\">\u{2713} ${1}</div>");
    UNCHECKED_RE
        .replace_all(&text, "<div class=\"checkbox\">\u{25CB} ${1}</div>")
        .into_owned()
}

fn replace_lists(text: &str) -> String {
    let text = BULLET_RE.replace_all(text, r#"<div class="list-item">${1}</div>"#);
    NUMBERED_RE
        .replace_all(&text, r#"<div class="list-item numbered">${1}</div>"#)
        .into_owned()
}

fn replace_breaks(text: &str) -> String {
    text.replace("\n\n", PARAGRAPH_BREAK).replace('\n', LINE_BREAK)
}

fn escape_attribute(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}
