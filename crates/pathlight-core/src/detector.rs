//! CSS selector vs free text classification.
//!
//! Guide authors write either a selector (`#save`, `button[data-testid="x"]`)
//! or the visible label of a button (`Save & Test`). A bare tag name such as
//! `button` is deliberately classified as text: authors far more often mean a
//! button labelled "button" than every `<button>` on the page.

use regex::Regex;
use std::sync::LazyLock;

static SELECTOR_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // #id, .class, [attr
        r"^#[A-Za-z_][\w-]*",
        r"^\.-?[A-Za-z_][\w-]*",
        r"^\[\s*[A-Za-z_][\w-]*",
        // tag[attr
        r"^[A-Za-z][\w-]*\[\s*[A-Za-z_][\w-]*",
        // :pseudo prefix, tag:pseudo
        r"^::?[A-Za-z][\w-]*",
        r"^[A-Za-z][\w-]*::?[A-Za-z][\w-]*",
        // token > token, token + token, token ~ token
        r#"[\w\])"'*]\s*[>+~]\s*[\w#.\[:*]"#,
    ]
    .into_iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Returns true when `input` looks like a CSS selector rather than free text.
pub fn is_selector(input: &str) -> bool {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return false;
    }

    SELECTOR_PATTERNS.iter().any(|re| re.is_match(trimmed))
}
