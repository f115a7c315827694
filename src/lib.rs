//! oletext - plain text extraction from legacy binary Word documents
//!
//! Legacy Office files (.doc, .xls, .ppt) are OLE2 structured storage
//! containers, also known as Compound Binary Files. This crate decodes the
//! container and recovers the text of Word documents stored in it.
//!
//! # Features
//!
//! - **OLE2 Reader**: Decode the container and read any stream by name
//!   (always available)
//! - **DOC Text Extraction**: Recover Word text through the piece table,
//!   with field codes resolved to their results (`doc` feature, on by default)
//!
//! # Example - Extracting text from a DOC file
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! match oletext::doc2text("document.doc")? {
//!     Some(text) => println!("{}", text),
//!     None => eprintln!("not a Word document"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Low-level OLE access
//!
//! ```no_run
//! use oletext::ole::OleFile;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let ole = OleFile::open("document.doc")?;
//! for entry in ole.entries() {
//!     println!("{:>4} {:?} {} ({} bytes)", entry.sid, entry.entry_type, entry.name, entry.size);
//! }
//! # Ok(())
//! # }
//! ```

/// Common types, traits, and utilities
pub mod common;

/// OLE2 (Object Linking and Embedding) container reader
///
/// The `ole` module also contains the `doc` submodule for legacy Word
/// documents, since .doc files are OLE2-based.
pub mod ole;

// Re-export commonly used types for convenience
pub use common::{ByteOrder, Error, Result, TextConverter};
#[cfg(feature = "doc")]
pub use ole::doc;
pub use ole::{OleFile, is_ole_file};

/// Extract the text of a .doc file.
///
/// Returns `Ok(None)` when the file is a valid container without Word text.
#[cfg(feature = "doc")]
pub fn doc2text<P: AsRef<std::path::Path>>(path: P) -> Result<Option<String>> {
    doc::Package::open(path)?.parse()
}

/// Extract the text of a .doc file held in memory.
#[cfg(feature = "doc")]
pub fn doc2text_from_bytes(data: impl Into<Vec<u8>>) -> Result<Option<String>> {
    doc::Package::from_bytes(data)?.parse()
}
