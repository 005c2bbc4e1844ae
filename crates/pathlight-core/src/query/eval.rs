//! Set-at-a-time evaluation of a parsed selector tree.
//!
//! Each expression turns a set of scopes into a set of elements: the base is
//! selected natively inside every scope, clauses filter the combined set in
//! order, and a tail is evaluated with the survivors as its scopes. Working on
//! whole sets keeps `:nth-match()` global across containers.

use super::native::{self, EngineError, Scope};
use crate::selector::{Combinator, PseudoClause, SelectorExpr, SelectorList};
use pathlight_common::text::{contains_text, direct_text, text_content};
use pathlight_common::{Document, ElementRef};

pub(crate) struct Evaluator<'a> {
    doc: &'a Document,
    shortfall: Option<String>,
}

impl<'a> Evaluator<'a> {
    pub fn new(doc: &'a Document) -> Self {
        Self {
            doc,
            shortfall: None,
        }
    }

    /// First `:nth-match()` that ran out of candidates, formatted for diagnostics.
    pub fn take_shortfall(&mut self) -> Option<String> {
        self.shortfall.take()
    }

    pub fn eval_list(
        &mut self,
        list: &SelectorList,
        scopes: &[Scope<'a>],
    ) -> Result<Vec<ElementRef<'a>>, EngineError> {
        let mut found = Vec::new();
        for expr in &list.0 {
            found.extend(self.eval_expr(expr, scopes)?);
        }
        Ok(self.doc.in_document_order(found))
    }

    fn eval_expr(
        &mut self,
        expr: &SelectorExpr,
        scopes: &[Scope<'a>],
    ) -> Result<Vec<ElementRef<'a>>, EngineError> {
        let mut current = self.eval_base(expr, scopes)?;

        for clause in &expr.clauses {
            current = self.apply_clause(clause, current)?;
        }

        match &expr.tail {
            Some(tail) => {
                let containers: Vec<Scope<'a>> = current.into_iter().map(Scope::Element).collect();
                self.eval_expr(tail, &containers)
            }
            None => Ok(current),
        }
    }

    fn eval_base(
        &self,
        expr: &SelectorExpr,
        scopes: &[Scope<'a>],
    ) -> Result<Vec<ElementRef<'a>>, EngineError> {
        let base = expr.base_selector();
        let mut found = Vec::new();

        for scope in scopes {
            match (expr.leading, scope) {
                (Combinator::Child, Scope::Element(parent)) => {
                    found.extend(native::select_children(*parent, &base)?);
                }
                _ => found.extend(native::select(self.doc, *scope, &base)?),
            }
        }

        Ok(self.doc.in_document_order(found))
    }

    fn apply_clause(
        &mut self,
        clause: &PseudoClause,
        current: Vec<ElementRef<'a>>,
    ) -> Result<Vec<ElementRef<'a>>, EngineError> {
        match clause {
            PseudoClause::Contains(text) => Ok(current
                .into_iter()
                .filter(|el| contains_text(&text_content(*el), text))
                .collect()),
            PseudoClause::Text(text) => Ok(current
                .into_iter()
                .filter(|el| contains_text(&direct_text(*el), text))
                .collect()),
            PseudoClause::Has(inner) => {
                let mut kept = Vec::new();
                for el in current {
                    if !self.eval_list(inner, &[Scope::Element(el)])?.is_empty() {
                        kept.push(el);
                    }
                }
                Ok(kept)
            }
            PseudoClause::NthMatch { index, prefix } => match current.get(index - 1) {
                Some(el) => Ok(vec![*el]),
                None => {
                    if self.shortfall.is_none() {
                        self.shortfall = Some(format!(
                            "{prefix} (wanted {index}, found {})",
                            current.len()
                        ));
                    }
                    Ok(Vec::new())
                }
            },
            PseudoClause::Native(fragment) => {
                let mut kept = Vec::new();
                for el in current {
                    if native::matches_fragment(el, fragment)? {
                        kept.push(el);
                    }
                }
                Ok(kept)
            }
        }
    }
}
