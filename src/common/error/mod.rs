//! Unified error types for oletext.
//!
//! This module provides a single error type shared by the compound file
//! reader and the Word text extractor.

// Submodule declarations
pub mod conversions;
pub mod types;

// Re-exports
pub use types::{Error, Result};
