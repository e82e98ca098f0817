//! Short plain-text projections of entry bodies for list cards.

const CARD_PREVIEW_CHARS: usize = 120;

/// Returns the first 120 characters of `body` with `#`, `*` and backticks
/// removed.
///
/// The cut happens before symbol removal, so heavily formatted bodies yield
/// shorter previews.
pub fn card_preview(body: &str) -> String {
    body.chars()
        .take(CARD_PREVIEW_CHARS)
        .filter(|ch| !matches!(ch, '#' | '*' | '`'))
        .collect()
}

/// Returns whether [`card_preview`] dropped part of `body`.
pub fn is_truncated(body: &str) -> bool {
    body.chars().nth(CARD_PREVIEW_CHARS).is_some()
}

#[cfg(test)]
mod tests {
    use super::{card_preview, is_truncated};

    #[test]
    fn preview_strips_markdown_symbols() {
        assert_eq!(
            card_preview("## Objective\n**2,341** genes `x`"),
            " Objective\n2,341 genes x"
        );
    }

    #[test]
    fn preview_is_capped_by_characters_not_bytes() {
        let body = "\u{3b1}".repeat(200);
        let preview = card_preview(&body);
        assert_eq!(preview.chars().count(), 120);
        assert!(is_truncated(&body));
        assert!(!is_truncated("short"));
    }
}
