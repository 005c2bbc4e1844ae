pub mod registry;

pub use registry::{
    escape_attr_value, Lookup, RegistryError, RegistryNode, SemanticRegistry, TemplateEntry,
    TranslateError,
};
