//! Error conversion implementations.
//!
//! This module contains From trait implementations to convert from internal
//! error types to the unified Error type.

use super::types::Error;
use crate::common::binary::BinaryError;

// Structural reads only fail by running out of bytes.
impl From<BinaryError> for Error {
    fn from(err: BinaryError) -> Self {
        match err {
            BinaryError::InsufficientData { .. } => Error::TruncatedData(err.to_string()),
            BinaryError::UnsupportedWidth(_) => Error::InvalidFormat(err.to_string()),
        }
    }
}
