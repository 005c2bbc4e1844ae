//! Semantic reference expansion.
//!
//! Descriptors of the form `grafana:components.Panels.Panel.title:CPU` are
//! rewritten into plain CSS before they reach the query engine. Everything
//! else passes through untouched, and so does any reference the registry
//! cannot translate.

use crate::semantic::SemanticRegistry;
use tracing::{debug, warn};

pub const DEFAULT_SEMANTIC_PREFIX: &str = "grafana";

pub struct SelectorPreprocessor<'r> {
    registry: &'r SemanticRegistry,
    prefix: String,
}

impl<'r> SelectorPreprocessor<'r> {
    pub fn new(registry: &'r SemanticRegistry) -> Self {
        Self::with_prefix(registry, DEFAULT_SEMANTIC_PREFIX)
    }

    /// `prefix` is the scheme name without the trailing colon.
    pub fn with_prefix(registry: &'r SemanticRegistry, prefix: &str) -> Self {
        Self {
            registry,
            prefix: format!("{}:", prefix.trim_end_matches(':')),
        }
    }

    pub fn has_semantic_prefix(&self, descriptor: &str) -> bool {
        descriptor.starts_with(&self.prefix)
    }

    /// Expand a semantic reference, or return `descriptor` unchanged.
    pub fn resolve(&self, descriptor: &str) -> String {
        let Some(reference) = descriptor.strip_prefix(&self.prefix) else {
            return descriptor.to_string();
        };

        let (path, param) = split_reference(reference);
        match self.registry.translate(path, param) {
            Ok(selector) => {
                debug!(descriptor, %selector, "Expanded semantic reference");
                selector
            }
            Err(e) => {
                warn!(descriptor, error = %e, "Semantic reference not resolved, using it verbatim");
                descriptor.to_string()
            }
        }
    }
}

/// Split `path[:param]` on the last colon, only when a non-empty parameter follows.
fn split_reference(reference: &str) -> (&str, Option<&str>) {
    match reference.rsplit_once(':') {
        Some((path, param)) if !param.is_empty() => (path, Some(param)),
        _ => (reference, None),
    }
}

/// Resolve with the default prefix.
pub fn resolve_descriptor(descriptor: &str, registry: &SemanticRegistry) -> String {
    SelectorPreprocessor::new(registry).resolve(descriptor)
}
