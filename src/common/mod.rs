//! Common types, traits, and utilities shared by the container reader and
//! the document extractors.

// Submodule declarations
pub mod binary;
pub mod convert;
pub mod error;

// Re-exports for convenience
pub use binary::ByteOrder;
pub use convert::TextConverter;
pub use error::{Error, Result};
