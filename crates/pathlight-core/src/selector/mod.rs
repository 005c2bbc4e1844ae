pub mod ast;
pub mod parser;
pub mod scan;

pub use ast::{Combinator, Pseudo, PseudoClause, SelectorExpr, SelectorList};
pub use parser::{parse, parse_relative, ParseError};
