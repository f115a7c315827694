//! Unified error type for oletext.
//!
//! Container decoding failures are fatal and surface here; the Word extractor
//! reports a missing stream as "no text" instead (see `doc::Package::parse`).
use thiserror::Error;

/// Main error type for oletext operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error while reading a file from disk
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Not a compound file, or a header this reader cannot interpret
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// The directory has no entry named "Root Entry"
    #[error("Root entry not found in container directory")]
    RootEntryMissing,

    /// A named stream or a directory entry index does not exist
    #[error("Stream not found: {0}")]
    StreamNotFound(String),

    /// A structural read ran past the end of the buffer
    #[error("Truncated data: {0}")]
    TruncatedData(String),

    /// A sector chain loops back onto a sector it already visited
    #[error("Corrupt sector chain: {0}")]
    CorruptChain(String),
}

/// Result type for oletext operations.
pub type Result<T> = std::result::Result<T, Error>;
