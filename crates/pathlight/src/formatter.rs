use pathlight_common::text::text_content;
use pathlight_common::{ElementRef, ResolutionResult};
use pathlight_core::TargetMatch;
use pathlight_core::lookup::FixHint;

const MAX_PREVIEW_CHARS: usize = 40;

/// `[n] tag#id.class "text"`
pub fn format_element(index: usize, element: ElementRef<'_>) -> String {
    let value = element.value();
    let mut label = value.name().to_string();
    if let Some(id) = value.id() {
        label.push('#');
        label.push_str(id);
    }
    for class in value.classes() {
        label.push('.');
        label.push_str(class);
    }
    if let Some(test_id) = value.attr("data-testid") {
        label.push_str(&format!("[data-testid=\"{test_id}\"]"));
    }

    let text = text_content(element);
    if text.is_empty() {
        format!("[{index}] {label}")
    } else {
        format!("[{index}] {label} \"{}\"", preview(&text))
    }
}

fn preview(text: &str) -> String {
    if text.chars().count() <= MAX_PREVIEW_CHARS {
        return text.to_string();
    }
    let cut: String = text.chars().take(MAX_PREVIEW_CHARS).collect();
    format!("{cut}...")
}

pub fn format_elements(elements: &[ElementRef<'_>]) -> String {
    elements
        .iter()
        .enumerate()
        .map(|(i, el)| format_element(i + 1, *el))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_resolution(result: &ResolutionResult<'_>) -> String {
    let mut output = format!(
        "Found {} element(s) for {}",
        result.elements.len(),
        result.original_selector
    );
    if result.used_fallback {
        output.push_str(&format!(
            "\nFallback: {}",
            result.effective_selector.as_deref().unwrap_or("-")
        ));
    }
    if !result.is_empty() {
        output.push('\n');
        output.push_str(&format_elements(&result.elements));
    }
    output
}

pub fn format_target(found: &TargetMatch<'_>) -> String {
    let mut output = format!(
        "Target {} ({}): {} element(s)",
        found.descriptor,
        found.strategy.as_str(),
        found.elements.len()
    );
    if found.resolved_selector != found.descriptor {
        output.push_str(&format!("\nResolved: {}", found.resolved_selector));
    }
    if found.used_fallback {
        output.push_str(&format!(
            "\nFallback: {}",
            found.effective_selector.as_deref().unwrap_or("-")
        ));
    }
    if let Some(error) = &found.error {
        output.push_str(&format!("\nError: {error}"));
    }
    if let Some(suggestion) = &found.suggestion {
        output.push_str(&format!("\nDid you mean \"{suggestion}\"?"));
    }
    if let Some(FixHint::ExpandParentNavigation { href }) = &found.fix {
        output.push_str(&format!("\nFix: expand the navigation section containing {href}"));
    }
    if found.found() {
        output.push('\n');
        output.push_str(&format_elements(&found.elements));
    }
    output
}
