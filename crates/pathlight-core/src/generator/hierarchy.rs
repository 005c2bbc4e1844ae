//! Choosing which element a selector should really point at.

use super::filters::{is_auto_generated_id, is_plain_identifier};
use crate::semantic::escape_attr_value;
use pathlight_common::{Document, ElementRef};

pub const TEST_ID_ATTR: &str = "data-testid";

const INTERACTIVE_TAGS: &[&str] = &[
    "a", "button", "input", "select", "textarea", "label", "summary", "option",
];

const INTERACTIVE_ROLES: &[&str] = &[
    "button", "link", "menuitem", "tab", "checkbox", "radio", "switch", "option", "combobox",
    "textbox",
];

pub fn tag(element: ElementRef<'_>) -> &str {
    element.value().name()
}

pub fn attr<'a>(element: ElementRef<'a>, name: &str) -> Option<&'a str> {
    element.value().attr(name).filter(|v| !v.trim().is_empty())
}

pub fn test_id<'a>(element: ElementRef<'a>) -> Option<&'a str> {
    attr(element, TEST_ID_ATTR)
}

pub fn stable_id<'a>(element: ElementRef<'a>) -> Option<&'a str> {
    element.value().id().filter(|id| !is_auto_generated_id(id))
}

pub fn is_interactive(element: ElementRef<'_>) -> bool {
    INTERACTIVE_TAGS.contains(&tag(element))
        || attr(element, "role").is_some_and(|role| INTERACTIVE_ROLES.contains(&role))
}

pub fn is_button(element: ElementRef<'_>) -> bool {
    tag(element) == "button" || attr(element, "role") == Some("button")
}

pub fn is_toggle_input(element: ElementRef<'_>) -> bool {
    tag(element) == "input"
        && attr(element, "type").is_some_and(|t| t.eq_ignore_ascii_case("radio") || t.eq_ignore_ascii_case("checkbox"))
}

/// `tag[data-testid="v"]` when the element has a test id.
pub fn test_id_selector(element: ElementRef<'_>) -> Option<String> {
    test_id(element).map(|v| format!("{}[{TEST_ID_ATTR}=\"{}\"]", tag(element), escape_attr_value(v)))
}

/// `#id`, or `[id="..."]` when the id is not a plain CSS identifier.
pub fn id_selector(id: &str) -> String {
    if is_plain_identifier(id) {
        format!("#{id}")
    } else {
        format!("[id=\"{}\"]", escape_attr_value(id))
    }
}

/// The element a selector should target for a click on `element`.
///
/// Radio buttons and checkboxes are replaced by their label. Anything else
/// without its own identifier climbs at most `max_depth` ancestors to the
/// nearest one carrying a test id or an interactive tag or role.
pub fn resolve_target<'a>(doc: &'a Document, element: ElementRef<'a>, max_depth: usize) -> ElementRef<'a> {
    if is_toggle_input(element) {
        if let Some(label) = associated_label(doc, element) {
            return label;
        }
    }

    if test_id(element).is_some() || stable_id(element).is_some() || is_interactive(element) {
        return element;
    }

    Document::ancestors_within_body(element)
        .into_iter()
        .take(max_depth)
        .find(|ancestor| test_id(*ancestor).is_some() || is_interactive(*ancestor))
        .unwrap_or(element)
}

/// `<label for=id>` anywhere in the document, else a wrapping `<label>`.
pub fn associated_label<'a>(doc: &'a Document, input: ElementRef<'a>) -> Option<ElementRef<'a>> {
    let by_for = input.value().id().and_then(|id| {
        doc.html()
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .find(|el| tag(*el) == "label" && el.value().attr("for") == Some(id))
    });

    by_for.or_else(|| {
        input
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find(|el| tag(*el) == "label")
    })
}

/// Selector for the nearest ancestor with a test id or stable id.
pub fn ancestor_context(element: ElementRef<'_>) -> Option<String> {
    Document::ancestors_within_body(element)
        .into_iter()
        .find_map(|ancestor| test_id_selector(ancestor).or_else(|| stable_id(ancestor).map(id_selector)))
}
