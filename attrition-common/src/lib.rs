//! # Attrition Common Library
//!
//! Shared code for the attrition analytics service:
//! - Error type and result alias
//! - Bootstrap configuration loading (TOML + overrides)
//! - Fixed employee dataset schema

pub mod config;
pub mod error;
pub mod schema;

pub use error::{Error, Result};
