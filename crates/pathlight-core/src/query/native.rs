//! Native selector evaluation through `scraper`.
//!
//! Parse failures come back as `EngineError` so callers branch on a tag
//! instead of catching anything.

use crate::selector::scan;
use pathlight_common::{Document, ElementRef};
use scraper::Selector;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("Native engine rejected selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },
}

/// Where a native selector is evaluated.
#[derive(Debug, Clone, Copy)]
pub enum Scope<'a> {
    Document,
    /// Descendants of the element, never the element itself.
    Element(ElementRef<'a>),
}

pub fn compile(selector: &str) -> Result<Selector, EngineError> {
    Selector::parse(selector).map_err(|e| EngineError::InvalidSelector {
        selector: selector.to_string(),
        reason: format!("{e:?}"),
    })
}

pub fn select<'a>(
    doc: &'a Document,
    scope: Scope<'a>,
    selector: &str,
) -> Result<Vec<ElementRef<'a>>, EngineError> {
    let compiled = compile(selector)?;
    Ok(match scope {
        Scope::Document => doc.html().select(&compiled).collect(),
        Scope::Element(el) => el.select(&compiled).collect(),
    })
}

/// Children of `parent` matching `selector`. The child relation binds the
/// first compound of `selector`, as in `:scope > a b`.
pub fn select_children<'a>(
    parent: ElementRef<'a>,
    selector: &str,
) -> Result<Vec<ElementRef<'a>>, EngineError> {
    if scan::is_compound(selector) {
        let compiled = compile(selector)?;
        return Ok(parent
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|child| compiled.matches(child))
            .collect());
    }

    let compiled = compile(&format!(":scope > {selector}"))?;
    Ok(parent.select(&compiled).collect())
}

/// Whether `element` itself satisfies a compound fragment such as `.active`.
pub fn matches_fragment(element: ElementRef<'_>, fragment: &str) -> Result<bool, EngineError> {
    let compiled = compile(&format!("*{fragment}"))?;
    Ok(compiled.matches(&element))
}
