use super::eval::Evaluator;
use super::native::{self, Scope};
use crate::selector::{self, scan};
use pathlight_common::{Document, ElementRef, ResolutionResult};
use tracing::{debug, warn};

pub const UNSUPPORTED: &str = "UNSUPPORTED";
pub const TESTID_NOT_FOUND: &str = "TESTID_NOT_FOUND";

const TEST_ID_ATTR: &str = "data-testid";

/// Native-first selector resolution with fallbacks for `:contains()`,
/// `:has()`, `:text()` and `:nth-match()`.
pub struct QueryEngine<'a> {
    doc: &'a Document,
}

impl<'a> QueryEngine<'a> {
    pub fn new(doc: &'a Document) -> Self {
        Self { doc }
    }

    pub fn document(&self) -> &'a Document {
        self.doc
    }

    /// First match, if any.
    pub fn query_one(&self, selector: &str) -> Option<ElementRef<'a>> {
        self.query_all(selector).first()
    }

    pub fn count(&self, selector: &str) -> usize {
        self.query_all(selector).elements.len()
    }

    pub fn query_all(&self, selector: &str) -> ResolutionResult<'a> {
        let native = match native::select(self.doc, Scope::Document, selector) {
            Ok(elements) if !is_complex(selector) => {
                return ResolutionResult::native(selector, elements);
            }
            Ok(elements) => Some(elements),
            Err(e) => {
                debug!(selector, error = %e, "Native evaluation failed");
                None
            }
        };

        self.resolve_complex(selector, native)
    }

    fn resolve_complex(
        &self,
        selector: &str,
        native: Option<Vec<ElementRef<'a>>>,
    ) -> ResolutionResult<'a> {
        let list = match selector::parse(selector) {
            Ok(list) => list,
            Err(e) => {
                warn!(selector, error = %e, "Malformed selector");
                return ResolutionResult::failed(selector, e.marker());
            }
        };

        if !list.has_custom_clauses() {
            if is_test_id_hierarchy(selector) {
                return self.resolve_test_id(selector, native);
            }
            return match native {
                Some(elements) => ResolutionResult::native(selector, elements),
                None => {
                    warn!(selector, "Unsupported selector: no custom pseudo-class and native evaluation failed");
                    ResolutionResult::failed(selector, UNSUPPORTED)
                }
            };
        }

        if list.only_has_clauses() {
            if let Some(elements) = native.filter(|els| !els.is_empty()) {
                debug!(selector, "Using native :has() result");
                return ResolutionResult::native(selector, elements);
            }
        }

        let mut evaluator = Evaluator::new(self.doc);
        match evaluator.eval_list(&list, &[Scope::Document]) {
            Ok(elements) => {
                let effective = match evaluator.take_shortfall() {
                    Some(shortfall) if elements.is_empty() => shortfall,
                    _ => list.to_string(),
                };
                debug!(selector, effective = %effective, matches = elements.len(), "Resolved with fallback");
                ResolutionResult::fallback(selector, elements, effective)
            }
            Err(e) => {
                let marker = list
                    .pseudos()
                    .first()
                    .map(|p| format!("ERROR_IN_{}", p.marker_stem()))
                    .unwrap_or_else(|| UNSUPPORTED.to_string());
                warn!(selector, error = %e, "Fallback evaluation failed");
                ResolutionResult::failed(selector, marker)
            }
        }
    }

    /// Test-id hierarchies: trust native matches, otherwise tolerate wrapper
    /// elements by relaxing `>` into a descendant combinator.
    fn resolve_test_id(
        &self,
        selector: &str,
        native: Option<Vec<ElementRef<'a>>>,
    ) -> ResolutionResult<'a> {
        if let Some(elements) = native.filter(|els| !els.is_empty()) {
            return ResolutionResult::native(selector, elements);
        }

        if scan::has_top_level(selector, '>') {
            let relaxed = scan::relax_child_combinators(selector);
            if let Ok(elements) = native::select(self.doc, Scope::Document, &relaxed) {
                if !elements.is_empty() {
                    debug!(selector, relaxed = %relaxed, "Matched after relaxing child combinators");
                    return ResolutionResult::fallback(selector, elements, relaxed);
                }
            }
        }

        ResolutionResult::failed(selector, TESTID_NOT_FOUND)
    }
}

/// Selectors that need custom handling even when the native engine accepts them.
pub fn is_complex(selector: &str) -> bool {
    selector.contains(":contains(")
        || selector.contains(":has(")
        || selector.contains(":text(")
        || selector.contains(":nth-match(")
        || is_test_id_hierarchy(selector)
}

/// A test-id selector with a top-level combinator in at least one branch.
/// Spaces inside attribute values do not count.
fn is_test_id_hierarchy(selector: &str) -> bool {
    selector.contains(TEST_ID_ATTR)
        && scan::split_top_level(selector, ',')
            .into_iter()
            .any(|branch| !scan::is_compound(branch))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_complex() {
        assert!(is_complex("p:contains(x)"));
        assert!(is_complex("div:has(p)"));
        assert!(is_complex("p:text(x)"));
        assert!(is_complex("li:nth-match(2)"));
        assert!(is_complex(r#"[data-testid="a"] button"#));
        assert!(is_complex(r#"[data-testid="a"]>button"#));
        assert!(!is_complex(r#"button[data-testid="a"]"#));
        assert!(!is_complex("div > span"));
        assert!(!is_complex(r#"button[data-testid="Save button"]"#));
        assert!(!is_complex(r#"[data-testid="x y"], [aria-label="x y"]"#));
        assert!(is_complex(r#"[aria-label="x"], [data-testid="x y"] span"#));
    }
}
