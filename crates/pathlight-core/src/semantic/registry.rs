//! Semantic selector registry.
//!
//! A nested mapping from dot-path segments to either a literal attribute value
//! or a template taking one parameter. The host platform owns the content; this
//! module only walks it.
//!
//! ```yaml
//! components:
//!   RefreshPicker:
//!     runButtonV2: "data-testid RefreshPicker run button"
//!   Panels:
//!     Panel:
//!       title:
//!         template: "data-testid Panel header {}"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

const BUILTIN_REGISTRY: &str = include_str!("builtin.yaml");

/// Placeholder replaced by the caller-supplied parameter in templates.
pub const PARAM_PLACEHOLDER: &str = "{}";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RegistryNode {
    /// Literal attribute value.
    Value(String),
    /// Value produced from a parameter.
    Template(TemplateEntry),
    Group(BTreeMap<String, RegistryNode>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplateEntry {
    pub template: String,
}

/// Tagged outcome of walking a path through the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Found(String),
    PathMissing { segment: String },
    WrongType { reason: String },
    NeedsParameter,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    #[error("Semantic path '{path}' not found: segment '{segment}' does not exist")]
    NotFound { path: String, segment: String },

    #[error("Semantic path '{path}' is invalid: {reason}")]
    InvalidType { path: String, reason: String },

    #[error("Semantic path '{path}' requires a parameter")]
    MissingParameter { path: String },
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Failed to parse registry: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Registry root must be a mapping")]
    NotAMapping,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SemanticRegistry {
    root: BTreeMap<String, RegistryNode>,
}

impl SemanticRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry shipped with the crate.
    pub fn builtin() -> Self {
        // The embedded file is covered by tests; failing to parse it is a build defect.
        Self::from_yaml_str(BUILTIN_REGISTRY).unwrap_or_default()
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, RegistryError> {
        match serde_yaml::from_str::<RegistryNode>(yaml)? {
            RegistryNode::Group(root) => Ok(Self { root }),
            _ => Err(RegistryError::NotAMapping),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Overlay `other` on top of this registry. Leaves in `other` win;
    /// groups present in both are merged recursively.
    pub fn merge(&mut self, other: SemanticRegistry) {
        merge_groups(&mut self.root, other.root);
    }

    /// Walk `path` and return the tagged lookup outcome.
    pub fn lookup(&self, path: &str, param: Option<&str>) -> Lookup {
        if path.trim().is_empty() {
            return Lookup::WrongType {
                reason: "path is empty".into(),
            };
        }

        let segments: Vec<&str> = path.split('.').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Lookup::WrongType {
                reason: "path contains an empty segment".into(),
            };
        }

        walk(&self.root, &segments, param)
    }

    /// Translate a semantic path into an OR-selector covering both attribute
    /// conventions used by the host platform.
    pub fn translate(&self, path: &str, param: Option<&str>) -> Result<String, TranslateError> {
        match self.lookup(path, param) {
            Lookup::Found(value) => Ok(attribute_selector(&value)),
            Lookup::PathMissing { segment } => Err(TranslateError::NotFound {
                path: path.to_string(),
                segment,
            }),
            Lookup::WrongType { reason } => Err(TranslateError::InvalidType {
                path: path.to_string(),
                reason,
            }),
            Lookup::NeedsParameter => Err(TranslateError::MissingParameter {
                path: path.to_string(),
            }),
        }
    }
}

fn walk(group: &BTreeMap<String, RegistryNode>, segments: &[&str], param: Option<&str>) -> Lookup {
    let Some((head, rest)) = segments.split_first() else {
        return Lookup::WrongType {
            reason: "path resolves to a group, not a value".into(),
        };
    };

    let Some(node) = group.get(*head) else {
        return Lookup::PathMissing {
            segment: head.to_string(),
        };
    };

    match node {
        RegistryNode::Group(children) => {
            if rest.is_empty() {
                Lookup::WrongType {
                    reason: "path resolves to a group, not a value".into(),
                }
            } else {
                walk(children, rest, param)
            }
        }
        // A leaf reached before the path is exhausted: the next segment does not exist.
        _ if !rest.is_empty() => Lookup::PathMissing {
            segment: rest[0].to_string(),
        },
        RegistryNode::Value(value) => non_empty(value.clone()),
        RegistryNode::Template(TemplateEntry { template }) => match param.filter(|p| !p.is_empty()) {
            Some(p) => non_empty(template.replace(PARAM_PLACEHOLDER, p)),
            None => Lookup::NeedsParameter,
        },
    }
}

fn non_empty(value: String) -> Lookup {
    if value.trim().is_empty() {
        Lookup::WrongType {
            reason: "path resolves to an empty value".into(),
        }
    } else {
        Lookup::Found(value)
    }
}

fn merge_groups(base: &mut BTreeMap<String, RegistryNode>, overlay: BTreeMap<String, RegistryNode>) {
    for (key, node) in overlay {
        match (base.get_mut(&key), node) {
            (Some(RegistryNode::Group(existing)), RegistryNode::Group(incoming)) => {
                merge_groups(existing, incoming);
            }
            (_, node) => {
                base.insert(key, node);
            }
        }
    }
}

/// Escape a value for use inside a double-quoted CSS string. Control
/// characters become hex escapes (`\a ` for a newline); a raw newline
/// would end the string and make the selector invalid.
pub fn escape_attr_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' | '"' => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => out.push_str(&format!("\\{:x} ", c as u32)),
            c => out.push(c),
        }
    }
    out
}

fn attribute_selector(value: &str) -> String {
    let escaped = escape_attr_value(value);
    format!("[data-testid=\"{escaped}\"], [aria-label=\"{escaped}\"]")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> SemanticRegistry {
        SemanticRegistry::from_yaml_str(
            r#"
components:
  Button:
    save: "data-testid Save"
    empty: ""
  Panel:
    title:
      template: "data-testid Panel header {}"
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_lookup_literal() {
        assert_eq!(
            registry().lookup("components.Button.save", None),
            Lookup::Found("data-testid Save".into())
        );
    }

    #[test]
    fn test_lookup_template_with_param() {
        assert_eq!(
            registry().lookup("components.Panel.title", Some("CPU")),
            Lookup::Found("data-testid Panel header CPU".into())
        );
        assert_eq!(
            registry().lookup("components.Panel.title", None),
            Lookup::NeedsParameter
        );
        assert_eq!(
            registry().lookup("components.Panel.title", Some("")),
            Lookup::NeedsParameter
        );
    }

    #[test]
    fn test_lookup_failures() {
        let reg = registry();
        assert!(matches!(
            reg.lookup("components.Missing.save", None),
            Lookup::PathMissing { segment } if segment == "Missing"
        ));
        assert!(matches!(
            reg.lookup("components.Button.save.deeper", None),
            Lookup::PathMissing { segment } if segment == "deeper"
        ));
        assert!(matches!(reg.lookup("components.Button", None), Lookup::WrongType { .. }));
        assert!(matches!(reg.lookup("components.Button.empty", None), Lookup::WrongType { .. }));
        assert!(matches!(reg.lookup("", None), Lookup::WrongType { .. }));
        assert!(matches!(reg.lookup("components..save", None), Lookup::WrongType { .. }));
    }

    #[test]
    fn test_translate_builds_or_selector() {
        assert_eq!(
            registry().translate("components.Button.save", None).unwrap(),
            r#"[data-testid="data-testid Save"], [aria-label="data-testid Save"]"#
        );
    }

    #[test]
    fn test_translate_escapes_quotes() {
        let reg = SemanticRegistry::from_yaml_str("a:\n  b: 'say \"hi\"'\n").unwrap();
        assert_eq!(
            reg.translate("a.b", None).unwrap(),
            r#"[data-testid="say \"hi\""], [aria-label="say \"hi\""]"#
        );
    }

    #[test]
    fn test_escape_control_characters() {
        assert_eq!(escape_attr_value("multi\nline"), r"multi\a line");
        assert_eq!(escape_attr_value("tab\there"), r"tab\9 here");
        assert_eq!(escape_attr_value(r"C:\dir"), r"C:\\dir");

        let reg = SemanticRegistry::from_yaml_str("a:\n  b: \"one\\ntwo\"\n").unwrap();
        assert_eq!(
            reg.translate("a.b", None).unwrap(),
            r#"[data-testid="one\a two"], [aria-label="one\a two"]"#
        );
    }

    #[test]
    fn test_merge_overlays_leaves_and_keeps_siblings() {
        let mut reg = registry();
        let overlay = SemanticRegistry::from_yaml_str(
            "components:\n  Button:\n    save: \"custom save\"\n    cancel: \"custom cancel\"\n",
        )
        .unwrap();
        reg.merge(overlay);

        assert_eq!(reg.lookup("components.Button.save", None), Lookup::Found("custom save".into()));
        assert_eq!(
            reg.lookup("components.Button.cancel", None),
            Lookup::Found("custom cancel".into())
        );
        assert!(matches!(reg.lookup("components.Panel.title", Some("x")), Lookup::Found(_)));
    }

    #[test]
    fn test_root_must_be_mapping() {
        assert!(matches!(
            SemanticRegistry::from_yaml_str("just a string"),
            Err(RegistryError::NotAMapping)
        ));
    }

    #[test]
    fn test_builtin_registry_parses() {
        let reg = SemanticRegistry::from_yaml_str(BUILTIN_REGISTRY).unwrap();
        assert!(matches!(
            reg.lookup("components.NavMenu.item", None),
            Lookup::Found(v) if v == "data-testid Nav menu item"
        ));
    }
}
