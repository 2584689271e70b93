//! # a11yscope Config
//!
//! Configuration management for a11yscope: capture bounds, logging and
//! output settings loaded from TOML.

mod error;
mod loader;
mod schema;
mod validator;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
