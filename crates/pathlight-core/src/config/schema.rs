use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathlightConfig {
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Scheme marking a semantic reference, without the colon.
    #[serde(default = "default_semantic_prefix")]
    pub semantic_prefix: String,
    /// Extra registry files merged over the built-in set, later files winning.
    #[serde(default)]
    pub registry_paths: Vec<PathBuf>,
    #[serde(default = "default_use_builtin_registry")]
    pub use_builtin_registry: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            semantic_prefix: default_semantic_prefix(),
            registry_paths: Vec::new(),
            use_builtin_registry: default_use_builtin_registry(),
        }
    }
}

fn default_semantic_prefix() -> String {
    crate::preprocess::DEFAULT_SEMANTIC_PREFIX.to_string()
}

fn default_use_builtin_registry() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// How many ancestors a non-interactive leaf may climb to find its target.
    #[serde(default = "default_max_walk_depth")]
    pub max_walk_depth: usize,
    /// Single-word button labels that need surrounding context.
    #[serde(default = "default_generic_words")]
    pub generic_words: Vec<String>,
    /// Longest element text used in a `:contains()` clause.
    #[serde(default = "default_max_text_length")]
    pub max_text_length: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_walk_depth: default_max_walk_depth(),
            generic_words: default_generic_words(),
            max_text_length: default_max_text_length(),
        }
    }
}

impl GeneratorConfig {
    pub fn is_generic_word(&self, text: &str) -> bool {
        let text = text.trim();
        !text.contains(char::is_whitespace)
            && self.generic_words.iter().any(|w| w.eq_ignore_ascii_case(text))
    }
}

fn default_max_walk_depth() -> usize {
    5
}

fn default_max_text_length() -> usize {
    80
}

fn default_generic_words() -> Vec<String> {
    [
        "save", "ok", "cancel", "submit", "close", "edit", "delete", "add", "apply", "next",
        "back", "yes", "no", "done", "confirm", "remove", "update", "create", "continue", "run",
        "open", "more",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
