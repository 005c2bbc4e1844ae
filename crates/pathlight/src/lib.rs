//! Command-line front end for the pathlight resolver.

pub mod cli;
pub mod config;
pub mod formatter;
pub mod session;

pub use config::{ConfigError, ConfigLoader};
pub use session::{Session, SessionError};
