//! Heuristics for attribute values that will not survive a rebuild.

use regex::Regex;
use std::sync::LazyLock;

static AUTO_ID_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // UUID
        r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$",
        // React useId: ":r1:", "«r1»"
        r"^:[A-Za-z0-9]+:$",
        r"^«[A-Za-z0-9]+»$",
        // leading digit
        r"^\d",
        // bundler and CSS-in-JS prefixes
        r"^(css|sc|jsx|emotion|chakra|mui)-",
        r"^_",
        r"^react-select-\d+",
        // counters
        r"\d{3,}",
    ]
    .into_iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static PLAIN_IDENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[A-Za-z_][A-Za-z0-9_-]*$").unwrap());

static GENERATED_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(css|sc|jsx|emotion|theme)-|^_").unwrap());

/// Mixed letter/digit runs such as `a1b2c3` or `Xy8kLm`.
static HASH_LIKE_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]*\d[A-Za-z\d]*$|[-_][A-Za-z]*\d[A-Za-z\d]{4,}$").unwrap());

const STATE_CLASSES: &[&str] = &[
    "active", "focus", "focused", "hover", "disabled", "selected", "open", "show", "hidden",
    "visible", "checked",
];

pub fn is_auto_generated_id(id: &str) -> bool {
    id.trim().is_empty() || is_opaque_token(id) || AUTO_ID_PATTERNS.iter().any(|re| re.is_match(id))
}

fn is_opaque_token(value: &str) -> bool {
    value.len() >= 16
        && value.chars().all(|c| c.is_ascii_alphanumeric())
        && value.chars().any(|c| c.is_ascii_digit())
}

pub fn is_plain_identifier(value: &str) -> bool {
    PLAIN_IDENT.is_match(value)
}

pub fn is_meaningful_class(class: &str) -> bool {
    if !is_plain_identifier(class) || class.contains(':') {
        return false;
    }
    if GENERATED_CLASS.is_match(class) || HASH_LIKE_CLASS.is_match(class) {
        return false;
    }
    if class.starts_with("is-") || class.starts_with("has-") {
        return false;
    }
    !STATE_CLASSES.contains(&class)
}

/// Up to `limit` classes worth putting in a selector, in source order.
pub fn meaningful_classes<'c>(classes: impl Iterator<Item = &'c str>, limit: usize) -> Vec<&'c str> {
    classes.filter(|c| is_meaningful_class(c)).take(limit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_generated_ids() {
        for id in [
            "550e8400-e29b-41d4-a716-446655440000",
            ":r0:",
            "«r3»",
            "1abc",
            "css-1x2y3z",
            "_hash",
            "react-select-2-input",
            "field-1024",
            "aB3dE5gH7jK9mN1p",
            "",
        ] {
            assert!(is_auto_generated_id(id), "expected generated: {id:?}");
        }
        for id in ["save-btn", "username", "panel-title", "step2", "dashboardsearchinput"] {
            assert!(!is_auto_generated_id(id), "expected stable: {id:?}");
        }
    }

    #[test]
    fn test_meaningful_classes() {
        let kept = meaningful_classes(
            [
                "css-abc123",
                "save-button",
                "_abc123def",
                "theme-dark",
                "button__primary--active",
                "a1b2c3",
                "hover:bg-blue",
                "active",
                "is-open",
                "btn-x7k2p9q",
                "primary-action",
            ]
            .into_iter(),
            3,
        );
        assert_eq!(kept, vec!["save-button", "button__primary--active", "primary-action"]);
    }
}
