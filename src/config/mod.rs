//! Configuration module
//!
//! Loads and validates `vitrine` configuration files: typewriter phrases
//! and timings, cursor effect tunables, scroll offsets, and contact form
//! rules.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{
    ConfigLimits, ConfigLoader, LoadResult, LoadWarning, LoaderOptions, load_or_default,
};
pub use schema::*;
pub use validation::{ValidationResult, Validator};
