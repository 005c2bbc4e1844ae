//! Selector resolution for interactive guides.
//!
//! Turns author-written target descriptors (CSS, semantic references such as
//! `grafana:components.RefreshPicker.runButtonV2`, or button labels) into
//! elements of an HTML document, and generates robust selectors for elements.

pub mod config;
pub mod detector;
pub mod generator;
pub mod lookup;
pub mod preprocess;
pub mod query;
pub mod selector;
pub mod semantic;

pub use config::{GeneratorConfig, PathlightConfig, ResolverConfig};
pub use detector::is_selector;
pub use generator::SelectorGenerator;
pub use lookup::{find_buttons_by_text, TargetAction, TargetLookup, TargetMatch};
pub use preprocess::{resolve_descriptor, SelectorPreprocessor};
pub use query::QueryEngine;
pub use semantic::{SemanticRegistry, TranslateError};

pub use pathlight_common::text::text_content;
pub use pathlight_common::{
    ContextStrategy, Document, ElementRef, ResolutionResult, SelectorInfo, SelectorMethod,
};

/// Resolve `selector` against `doc`.
pub fn query_all<'a>(doc: &'a Document, selector: &str) -> ResolutionResult<'a> {
    QueryEngine::new(doc).query_all(selector)
}

pub fn query_one<'a>(doc: &'a Document, selector: &str) -> Option<ElementRef<'a>> {
    QueryEngine::new(doc).query_one(selector)
}

/// Best selector for `element`, using default generator settings.
pub fn generate_selector<'a>(doc: &'a Document, element: ElementRef<'a>) -> String {
    let config = GeneratorConfig::default();
    SelectorGenerator::new(doc, &config).generate(element)
}

pub fn describe_selector<'a>(doc: &'a Document, element: ElementRef<'a>) -> SelectorInfo {
    let config = GeneratorConfig::default();
    SelectorGenerator::new(doc, &config).describe(element)
}
