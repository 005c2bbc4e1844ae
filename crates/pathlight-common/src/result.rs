use scraper::ElementRef;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of resolving one selector against a document.
///
/// An empty `elements` with `used_fallback == false` is a genuine "not found".
/// An empty result with `used_fallback == true` means the resolver could not
/// interpret the selector; `effective_selector` then carries a marker such as
/// `INVALID_HAS_SYNTAX` or `UNSUPPORTED`.
#[derive(Debug, Clone)]
pub struct ResolutionResult<'a> {
    pub elements: Vec<ElementRef<'a>>,
    pub used_fallback: bool,
    pub original_selector: String,
    pub effective_selector: Option<String>,
}

impl<'a> ResolutionResult<'a> {
    /// Result produced by native selector evaluation.
    pub fn native(selector: &str, elements: Vec<ElementRef<'a>>) -> Self {
        Self {
            elements,
            used_fallback: false,
            original_selector: selector.to_string(),
            effective_selector: None,
        }
    }

    /// Result produced by one of the fallback strategies.
    pub fn fallback(
        selector: &str,
        elements: Vec<ElementRef<'a>>,
        effective: impl Into<String>,
    ) -> Self {
        Self {
            elements,
            used_fallback: true,
            original_selector: selector.to_string(),
            effective_selector: Some(effective.into()),
        }
    }

    /// Empty result tagged with a diagnostic marker.
    pub fn failed(selector: &str, marker: impl Into<String>) -> Self {
        Self::fallback(selector, vec![], marker)
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn first(&self) -> Option<ElementRef<'a>> {
        self.elements.first().copied()
    }
}

/// How a generated selector was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectorMethod {
    DataTestid,
    Id,
    AriaLabel,
    Href,
    Name,
    Label,
    ButtonText,
    Contains,
    Compound,
}

impl SelectorMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DataTestid => "data-testid",
            Self::Id => "id",
            Self::AriaLabel => "aria-label",
            Self::Href => "href",
            Self::Name => "name",
            Self::Label => "label",
            Self::ButtonText => "button-text",
            Self::Contains => "contains",
            Self::Compound => "compound",
        }
    }
}

impl fmt::Display for SelectorMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which disambiguation step narrowed a non-unique selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContextStrategy {
    ParentContext,
    Contains,
    NthMatch,
}

impl ContextStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ParentContext => "parent-context",
            Self::Contains => "contains",
            Self::NthMatch => "nth-match",
        }
    }
}

impl fmt::Display for ContextStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Diagnostic record for a generated selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectorInfo {
    pub selector: String,
    pub method: SelectorMethod,
    pub is_unique: bool,
    pub match_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_strategy: Option<ContextStrategy>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_info_serializes_kebab_tags() {
        let info = SelectorInfo {
            selector: "button:nth-match(2)".into(),
            method: SelectorMethod::Compound,
            is_unique: true,
            match_count: 1,
            context_strategy: Some(ContextStrategy::NthMatch),
        };

        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["method"], "compound");
        assert_eq!(json["contextStrategy"], "nth-match");
        assert_eq!(json["isUnique"], true);
        assert_eq!(json["matchCount"], 1);
    }

    #[test]
    fn test_method_display_matches_serde_tag() {
        for method in [
            SelectorMethod::DataTestid,
            SelectorMethod::ButtonText,
            SelectorMethod::AriaLabel,
        ] {
            let json = serde_json::to_value(method).unwrap();
            assert_eq!(json, method.to_string());
        }
    }
}
