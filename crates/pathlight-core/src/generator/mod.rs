//! Element to selector generation.
//!
//! The generator picks the most stable attribute available, then narrows the
//! candidate until it matches a single element, counting matches with the
//! same [`QueryEngine`] that will later resolve the selector.

pub mod filters;
pub mod hierarchy;

use crate::config::GeneratorConfig;
use crate::query::QueryEngine;
use crate::semantic::escape_attr_value;
use hierarchy::{attr, is_button, stable_id, tag};
use pathlight_common::text::text_content;
use pathlight_common::{ContextStrategy, Document, ElementRef, SelectorInfo, SelectorMethod};
use tracing::debug;
use url::Url;

const MAX_CLASSES: usize = 3;

const FORM_CONTROLS: &[&str] = &["input", "select", "textarea", "button"];

const TEXT_TARGET_ROLES: &[&str] = &["link", "menuitem", "tab"];

#[derive(Debug, Clone, PartialEq, Eq)]
struct Candidate {
    selector: String,
    method: SelectorMethod,
    context: Option<ContextStrategy>,
}

impl Candidate {
    fn new(selector: String, method: SelectorMethod) -> Self {
        Self {
            selector,
            method,
            context: None,
        }
    }
}

pub struct SelectorGenerator<'a, 'c> {
    engine: QueryEngine<'a>,
    config: &'c GeneratorConfig,
}

impl<'a, 'c> SelectorGenerator<'a, 'c> {
    pub fn new(doc: &'a Document, config: &'c GeneratorConfig) -> Self {
        Self {
            engine: QueryEngine::new(doc),
            config,
        }
    }

    pub fn generate(&self, element: ElementRef<'a>) -> String {
        self.describe(element).selector
    }

    pub fn describe(&self, element: ElementRef<'a>) -> SelectorInfo {
        let target = self.resolve_target(element);
        let candidate = self.primary_candidate(target);
        let candidate = self.disambiguate(target, candidate);

        let matches = self.engine.query_all(&candidate.selector).elements;
        let is_unique = matches.len() == 1 && matches[0].id() == target.id();
        debug!(selector = %candidate.selector, method = %candidate.method, matches = matches.len(), "Generated selector");

        SelectorInfo {
            selector: candidate.selector,
            method: candidate.method,
            is_unique,
            match_count: matches.len(),
            context_strategy: candidate.context,
        }
    }

    /// The element the selector will point at after hierarchy walking.
    pub fn resolve_target(&self, element: ElementRef<'a>) -> ElementRef<'a> {
        hierarchy::resolve_target(self.engine.document(), element, self.config.max_walk_depth)
    }

    /// First candidate that matches anything; the compound selector otherwise.
    fn primary_candidate(&self, el: ElementRef<'a>) -> Candidate {
        let mut candidates = self.candidates(el);
        let fallback = Candidate::new(compound_selector(el), SelectorMethod::Compound);
        match candidates
            .iter()
            .position(|candidate| self.engine.count(&candidate.selector) >= 1)
        {
            Some(index) => candidates.swap_remove(index),
            None => {
                if !candidates.is_empty() {
                    debug!(tried = candidates.len(), "No candidate matched, using compound selector");
                }
                fallback
            }
        }
    }

    /// Attribute and text candidates for `el`, most stable first.
    fn candidates(&self, el: ElementRef<'a>) -> Vec<Candidate> {
        let tag = tag(el);
        let mut out = Vec::new();

        if let Some(selector) = hierarchy::test_id_selector(el) {
            out.push(Candidate::new(selector, SelectorMethod::DataTestid));
        }

        if let Some(id) = stable_id(el) {
            out.push(Candidate::new(hierarchy::id_selector(id), SelectorMethod::Id));
        }

        let text = self.usable_text(el);

        if let Some(label) = attr(el, "aria-label") {
            if !is_button(el) || text.is_none() {
                out.push(Candidate::new(
                    format!("{tag}[aria-label=\"{}\"]", escape_attr_value(label)),
                    SelectorMethod::AriaLabel,
                ));
            }
        }

        if tag == "a" {
            if let Some(selector) = self.href_selector(el) {
                out.push(Candidate::new(selector, SelectorMethod::Href));
            }
        }

        if FORM_CONTROLS.contains(&tag) {
            if let Some(name) = attr(el, "name") {
                out.push(Candidate::new(
                    format!("{tag}[name=\"{}\"]", escape_attr_value(name)),
                    SelectorMethod::Name,
                ));
            }
        }

        if tag == "label" {
            if let Some(target) = attr(el, "for") {
                out.push(Candidate::new(
                    format!("label[for=\"{}\"]", escape_attr_value(target)),
                    SelectorMethod::Label,
                ));
            }
            if let Some(text) = &text {
                out.push(Candidate::new(contains_selector("label", text), SelectorMethod::Label));
            }
        }

        if is_button(el) {
            if let Some(text) = &text {
                let selector = contains_selector(tag, text);
                if self.config.is_generic_word(text) {
                    if let Some(context) = hierarchy::ancestor_context(el) {
                        out.push(Candidate {
                            selector: format!("{context} {selector}"),
                            method: SelectorMethod::ButtonText,
                            context: Some(ContextStrategy::ParentContext),
                        });
                    }
                }
                out.push(Candidate::new(selector, SelectorMethod::ButtonText));
            }
        }

        let text_target =
            tag == "a" || attr(el, "role").is_some_and(|role| TEXT_TARGET_ROLES.contains(&role));
        if text_target {
            if let Some(text) = &text {
                out.push(Candidate::new(contains_selector(tag, text), SelectorMethod::Contains));
            }
        }

        out
    }

    /// Normalized `href` selector, only when it identifies a single link.
    fn href_selector(&self, el: ElementRef<'a>) -> Option<String> {
        let raw = attr(el, "href")?.trim();
        if raw == "#" {
            return None;
        }
        if let Ok(url) = Url::parse(raw) {
            if !matches!(url.scheme(), "http" | "https") {
                return None;
            }
        }

        let normalized = normalize_href(raw);
        if normalized.is_empty() {
            return None;
        }

        let op = if normalized.len() == raw.len() { "=" } else { "^=" };
        let selector = format!("a[href{op}\"{}\"]", escape_attr_value(&normalized));
        (self.engine.count(&selector) == 1).then_some(selector)
    }

    fn usable_text(&self, el: ElementRef<'a>) -> Option<String> {
        let text = text_content(el);
        (!text.is_empty() && text.chars().count() <= self.config.max_text_length).then_some(text)
    }

    /// Narrow `candidate` until it matches only `target`: ancestor context,
    /// then element text, then position.
    fn disambiguate(&self, target: ElementRef<'a>, mut candidate: Candidate) -> Candidate {
        let mut count = self.engine.count(&candidate.selector);
        if count <= 1 {
            return candidate;
        }

        if candidate.context.is_none() {
            if let Some(context) = hierarchy::ancestor_context(target) {
                let narrowed = format!("{context} {}", candidate.selector);
                let narrowed_count = self.engine.count(&narrowed);
                if narrowed_count >= 1 && narrowed_count < count {
                    candidate.selector = narrowed;
                    candidate.context = Some(ContextStrategy::ParentContext);
                    count = narrowed_count;
                    if count == 1 {
                        return candidate;
                    }
                }
            }
        }

        if !candidate.selector.contains(":contains(") {
            if let Some(text) = self.usable_text(target) {
                let narrowed = format!(
                    "{}:contains(\"{}\")",
                    candidate.selector,
                    escape_attr_value(&text)
                );
                let narrowed_count = self.engine.count(&narrowed);
                if narrowed_count >= 1 && narrowed_count < count {
                    candidate.selector = narrowed;
                    candidate.context = Some(ContextStrategy::Contains);
                    count = narrowed_count;
                    if count == 1 {
                        return candidate;
                    }
                }
            }
        }

        let matches = self.engine.query_all(&candidate.selector).elements;
        if let Some(position) = matches.iter().position(|el| el.id() == target.id()) {
            candidate.selector = format!("{}:nth-match({})", candidate.selector, position + 1);
            candidate.context = Some(ContextStrategy::NthMatch);
        }
        candidate
    }
}

fn contains_selector(tag: &str, text: &str) -> String {
    format!("{tag}:contains(\"{}\")", escape_attr_value(text))
}

/// `tag.class...`, with `[type]` for inputs.
fn compound_selector(el: ElementRef<'_>) -> String {
    let tag = tag(el);
    let mut selector = tag.to_string();

    if tag == "input" {
        if let Some(kind) = attr(el, "type") {
            selector.push_str(&format!("[type=\"{}\"]", escape_attr_value(kind)));
        }
    }

    for class in filters::meaningful_classes(el.value().classes(), MAX_CLASSES) {
        selector.push('.');
        selector.push_str(class);
    }
    selector
}

/// Strip query string and fragment.
pub fn normalize_href(raw: &str) -> String {
    if let Ok(mut url) = Url::parse(raw) {
        url.set_query(None);
        url.set_fragment(None);
        let normalized = url.to_string();
        if raw.starts_with(&normalized) {
            return normalized;
        }
    }
    raw.split(['?', '#']).next().unwrap_or_default().to_string()
}
