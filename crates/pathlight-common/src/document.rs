//! In-memory HTML document that every resolution runs against.
//!
//! Wraps a parsed `scraper::Html` tree. Elements handed out by the resolver
//! are `ElementRef`s borrowing this document, so a `ResolutionResult` can
//! never outlive the page it was computed from.

use scraper::{ElementRef, Html};
use std::collections::HashSet;

pub struct Document {
    html: Html,
}

impl Document {
    /// Parse a full HTML document.
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
        }
    }

    pub fn html(&self) -> &Html {
        &self.html
    }

    /// The `<html>` element.
    pub fn root(&self) -> ElementRef<'_> {
        self.html.root_element()
    }

    /// Re-order `elements` into document order, dropping duplicates.
    pub fn in_document_order<'a>(&'a self, elements: Vec<ElementRef<'a>>) -> Vec<ElementRef<'a>> {
        if elements.len() < 2 {
            return elements;
        }

        let wanted: HashSet<_> = elements.iter().map(|e| e.id()).collect();
        self.root()
            .descendants()
            .filter(|node| wanted.contains(&node.id()))
            .filter_map(ElementRef::wrap)
            .collect()
    }

    /// Element ancestors from nearest to farthest, stopping before `<body>`.
    pub fn ancestors_within_body<'a>(element: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        element
            .ancestors()
            .filter_map(ElementRef::wrap)
            .take_while(|el| !matches!(el.value().name(), "body" | "html"))
            .collect()
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.root().descendants().count())
            .finish()
    }
}
