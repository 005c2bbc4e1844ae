pub mod engine;
mod eval;
pub mod native;

pub use engine::{is_complex, QueryEngine, TESTID_NOT_FOUND, UNSUPPORTED};
pub use native::{EngineError, Scope};
