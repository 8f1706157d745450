//! # datacat Config
//!
//! Configuration management for datacat: TOML schema, loading with
//! environment expansion, and validation.

mod error;
mod loader;
mod schema;
mod validator;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
pub use validator::{
    ConfigValidator, ValidationError, ValidationIssue, ValidationResult, ValidationWarning,
};
