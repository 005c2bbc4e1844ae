//! "Does this target exist?" checks used by a tutorial runner before it acts.

use crate::detector::is_selector;
use crate::preprocess::SelectorPreprocessor;
use crate::query::QueryEngine;
use pathlight_common::text::spaced_text;
use pathlight_common::{Document, ElementRef};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::debug;

const MIN_SUGGESTION_SIMILARITY: f64 = 0.6;

const NAV_MENU_ITEM: &str = "data-testid Nav menu item";

static NAV_MENU_HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"a\[data-testid=['"]data-testid Nav menu item['"]\]\[href=['"]([^'"]+)['"]\]"#)
        .unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetAction {
    Highlight,
    Button,
    FormFill,
    Hover,
    Navigate,
    Sequence,
}

impl TargetAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Highlight => "highlight",
            Self::Button => "button",
            Self::FormFill => "formfill",
            Self::Hover => "hover",
            Self::Navigate => "navigate",
            Self::Sequence => "sequence",
        }
    }
}

impl fmt::Display for TargetAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown target action '{0}'")]
pub struct UnknownAction(pub String);

impl FromStr for TargetAction {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "highlight" => Ok(Self::Highlight),
            "button" => Ok(Self::Button),
            "formfill" | "form-fill" => Ok(Self::FormFill),
            "hover" => Ok(Self::Hover),
            "navigate" => Ok(Self::Navigate),
            "sequence" => Ok(Self::Sequence),
            other => Err(UnknownAction(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LookupStrategy {
    ButtonText,
    Selector,
}

impl LookupStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ButtonText => "button-text",
            Self::Selector => "selector",
        }
    }
}

/// Remedy a runner can apply when the target is missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "type")]
pub enum FixHint {
    /// The item sits in a collapsed navigation section.
    ExpandParentNavigation { href: String },
}

#[derive(Debug, Clone)]
pub struct TargetMatch<'a> {
    pub descriptor: String,
    pub resolved_selector: String,
    pub strategy: LookupStrategy,
    pub elements: Vec<ElementRef<'a>>,
    pub used_fallback: bool,
    pub effective_selector: Option<String>,
    /// Human-readable reason when nothing matched.
    pub error: Option<String>,
    pub fix: Option<FixHint>,
    /// Closest existing button label after a failed text lookup.
    pub suggestion: Option<String>,
}

impl TargetMatch<'_> {
    pub fn found(&self) -> bool {
        !self.elements.is_empty()
    }
}

/// Buttons whose text equals `text` (case-insensitive); if none, those containing it.
pub fn find_buttons_by_text<'a>(doc: &'a Document, text: &str) -> Vec<ElementRef<'a>> {
    let wanted = text.trim().to_lowercase();
    if wanted.is_empty() {
        return Vec::new();
    }

    let mut exact = Vec::new();
    let mut partial = Vec::new();
    for button in doc
        .root()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "button")
    {
        let label = spaced_text(button).to_lowercase();
        if label.is_empty() {
            continue;
        }
        if label == wanted {
            exact.push(button);
        } else if label.contains(&wanted) {
            partial.push(button);
        }
    }

    if exact.is_empty() { partial } else { exact }
}

pub struct TargetLookup<'a, 'r> {
    doc: &'a Document,
    preprocessor: SelectorPreprocessor<'r>,
}

impl<'a, 'r> TargetLookup<'a, 'r> {
    pub fn new(doc: &'a Document, preprocessor: SelectorPreprocessor<'r>) -> Self {
        Self { doc, preprocessor }
    }

    pub fn find(&self, descriptor: &str, action: TargetAction) -> TargetMatch<'a> {
        let resolved = self.preprocessor.resolve(descriptor);

        let by_text = action == TargetAction::Button
            && !is_selector(descriptor)
            && !self.preprocessor.has_semantic_prefix(descriptor);
        if by_text {
            let elements = find_buttons_by_text(self.doc, descriptor);
            debug!(descriptor, matches = elements.len(), "Button text lookup");
            let suggestion = if elements.is_empty() {
                closest_button_label(self.doc, descriptor)
            } else {
                None
            };
            let error = elements
                .is_empty()
                .then(|| format!("No buttons found containing text: \"{descriptor}\""));
            return TargetMatch {
                descriptor: descriptor.to_string(),
                resolved_selector: resolved,
                strategy: LookupStrategy::ButtonText,
                elements,
                used_fallback: false,
                effective_selector: None,
                error,
                fix: None,
                suggestion,
            };
        }

        let result = QueryEngine::new(self.doc).query_all(&resolved);
        let (error, fix) = if result.is_empty() {
            missing_target(descriptor, &resolved)
        } else {
            (None, None)
        };

        TargetMatch {
            descriptor: descriptor.to_string(),
            resolved_selector: resolved,
            strategy: LookupStrategy::Selector,
            elements: result.elements,
            used_fallback: result.used_fallback,
            effective_selector: result.effective_selector,
            error,
            fix,
            suggestion: None,
        }
    }
}

/// Most similar non-empty button label, if it is close enough to be a likely typo.
pub fn closest_button_label(doc: &Document, text: &str) -> Option<String> {
    let wanted = text.trim().to_lowercase();
    doc.root()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "button")
        .map(spaced_text)
        .filter(|label| !label.is_empty())
        .map(|label| {
            let score = strsim::normalized_levenshtein(&wanted, &label.to_lowercase());
            (label, score)
        })
        .filter(|(_, score)| *score >= MIN_SUGGESTION_SIMILARITY)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(label, _)| label)
}

fn missing_target(descriptor: &str, resolved: &str) -> (Option<String>, Option<FixHint>) {
    if resolved.contains(NAV_MENU_ITEM) {
        if let Some(caps) = NAV_MENU_HREF.captures(resolved) {
            return (
                Some("Navigation menu item not found - may need section expansion".to_string()),
                Some(FixHint::ExpandParentNavigation {
                    href: caps[1].to_string(),
                }),
            );
        }
        return (Some("Navigation menu item not found".to_string()), None);
    }
    (Some(format!("Element not found: {descriptor}")), None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_parsing() {
        assert_eq!("Button".parse::<TargetAction>().unwrap(), TargetAction::Button);
        assert_eq!("form-fill".parse::<TargetAction>().unwrap(), TargetAction::FormFill);
        assert!("click".parse::<TargetAction>().is_err());
    }

    #[test]
    fn test_missing_nav_item_suggests_expansion() {
        let (error, fix) = missing_target(
            "x",
            r#"a[data-testid='data-testid Nav menu item'][href='/alerting/list']"#,
        );
        assert!(error.unwrap().contains("section expansion"));
        assert_eq!(
            fix,
            Some(FixHint::ExpandParentNavigation {
                href: "/alerting/list".into()
            })
        );
    }
}
