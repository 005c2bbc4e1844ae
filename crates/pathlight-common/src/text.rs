//! Text extraction helpers shared by the query engine and the generator.
//!
//! Both sides must agree on what "the text of an element" is, otherwise a
//! generated `:contains()` selector would fail to find its own element.

use scraper::ElementRef;

/// Collapse runs of whitespace into single spaces and trim.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// All descendant text (the DOM `textContent`), whitespace-normalized.
pub fn text_content(element: ElementRef<'_>) -> String {
    normalize_whitespace(&element.text().collect::<String>())
}

/// Descendant text with every text node trimmed and joined by single spaces.
///
/// Unlike [`text_content`], adjacent inline elements never run together:
/// `<b>Save</b><i>All</i>` yields `"Save All"`.
pub fn spaced_text(element: ElementRef<'_>) -> String {
    let parts: Vec<&str> = element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();
    normalize_whitespace(&parts.join(" "))
}

/// Text of direct text-node children only, concatenated as-is, then
/// whitespace-normalized: `<p>foo<b>x</b>bar</p>` yields `"foobar"`.
pub fn direct_text(element: ElementRef<'_>) -> String {
    let joined: String = element
        .children()
        .filter_map(|node| node.value().as_text().map(|t| &**t))
        .collect();
    normalize_whitespace(&joined)
}

/// Case-insensitive, whitespace-tolerant substring test.
pub fn contains_text(haystack: &str, needle: &str) -> bool {
    normalize_whitespace(haystack)
        .to_lowercase()
        .contains(&normalize_whitespace(needle).to_lowercase())
}
