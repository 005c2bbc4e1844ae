pub mod schema;

pub use schema::{GeneratorConfig, PathlightConfig, ResolverConfig};
