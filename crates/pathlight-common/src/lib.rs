pub mod document;
pub mod result;
pub mod text;

pub use document::Document;
pub use result::{ContextStrategy, ResolutionResult, SelectorInfo, SelectorMethod};
pub use scraper::ElementRef;
