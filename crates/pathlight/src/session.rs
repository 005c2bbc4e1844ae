//! One loaded page plus the resolver state every command runs against.

use crate::formatter;
use pathlight_core::lookup::UnknownAction;
use pathlight_core::{
    Document, PathlightConfig, QueryEngine, SelectorGenerator, SelectorPreprocessor,
    SemanticRegistry, TargetAction, TargetLookup, is_selector,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No HTML document loaded (use --html <file>)")]
    NoDocument,
    #[error("Unknown command '{0}'. Type 'help' for a list of commands")]
    UnknownCommand(String),
    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),
    #[error(transparent)]
    Action(#[from] UnknownAction),
    #[error("No element matches '{0}'")]
    NoMatch(String),
    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub const HELP: &str = "\
Commands:
  query <selector>              resolve a selector, listing every match
  one <selector>                first match only
  generate <selector>           best selector for the first match, as JSON
  classify <input>              selector or free text
  resolve <descriptor>          expand a semantic reference
  find <action> <descriptor>    target lookup (highlight, button, formfill, hover, navigate)
  help                          this text";

pub struct Session {
    document: Option<Document>,
    registry: SemanticRegistry,
    config: PathlightConfig,
}

impl Session {
    pub fn new(
        document: Option<Document>,
        registry: SemanticRegistry,
        config: PathlightConfig,
    ) -> Self {
        Self {
            document,
            registry,
            config,
        }
    }

    fn document(&self) -> Result<&Document, SessionError> {
        self.document.as_ref().ok_or(SessionError::NoDocument)
    }

    fn preprocessor(&self) -> SelectorPreprocessor<'_> {
        SelectorPreprocessor::with_prefix(&self.registry, &self.config.resolver.semantic_prefix)
    }

    /// Dispatch one REPL or script line.
    pub fn execute_line(&self, line: &str) -> Result<String, SessionError> {
        let line = line.trim();
        let (verb, rest) = line
            .split_once(char::is_whitespace)
            .map(|(v, r)| (v, r.trim()))
            .unwrap_or((line, ""));

        let arg = |name: &'static str| {
            if rest.is_empty() {
                Err(SessionError::MissingArgument(name))
            } else {
                Ok(rest)
            }
        };

        match verb.to_ascii_lowercase().as_str() {
            "query" => self.query(arg("selector")?),
            "one" => self.query_one(arg("selector")?),
            "generate" => self.generate(arg("selector")?),
            "classify" => Ok(self.classify(arg("input")?)),
            "resolve" => Ok(self.resolve(arg("descriptor")?)),
            "find" => {
                let (action, descriptor) = rest
                    .split_once(char::is_whitespace)
                    .ok_or(SessionError::MissingArgument("action and descriptor"))?;
                self.find(descriptor.trim(), action.parse()?)
            }
            "help" => Ok(HELP.to_string()),
            other => Err(SessionError::UnknownCommand(other.to_string())),
        }
    }

    pub fn query(&self, selector: &str) -> Result<String, SessionError> {
        let doc = self.document()?;
        let resolved = self.preprocessor().resolve(selector);
        let result = QueryEngine::new(doc).query_all(&resolved);
        Ok(formatter::format_resolution(&result))
    }

    pub fn query_one(&self, selector: &str) -> Result<String, SessionError> {
        let doc = self.document()?;
        let resolved = self.preprocessor().resolve(selector);
        QueryEngine::new(doc)
            .query_one(&resolved)
            .map(|el| formatter::format_element(1, el))
            .ok_or_else(|| SessionError::NoMatch(selector.to_string()))
    }

    /// `SelectorInfo` JSON for the first element `selector` matches.
    pub fn generate(&self, selector: &str) -> Result<String, SessionError> {
        let doc = self.document()?;
        let resolved = self.preprocessor().resolve(selector);
        let element = QueryEngine::new(doc)
            .query_one(&resolved)
            .ok_or_else(|| SessionError::NoMatch(selector.to_string()))?;

        let info = SelectorGenerator::new(doc, &self.config.generator).describe(element);
        Ok(serde_json::to_string_pretty(&info)?)
    }

    pub fn classify(&self, input: &str) -> String {
        if is_selector(input) { "selector" } else { "text" }.to_string()
    }

    pub fn resolve(&self, descriptor: &str) -> String {
        self.preprocessor().resolve(descriptor)
    }

    pub fn find(&self, descriptor: &str, action: TargetAction) -> Result<String, SessionError> {
        let doc = self.document()?;
        let found = TargetLookup::new(doc, self.preprocessor()).find(descriptor, action);
        Ok(formatter::format_target(&found))
    }
}
