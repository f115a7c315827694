//! OLE2 / Compound Binary File container reader.
//!
//! A compound file is a small FAT file system packed into one file: fixed-size
//! sectors, a FAT chaining them into streams, a MiniFAT for small streams
//! stored inside the root entry, and a directory naming every stream.
//! [`OleFile`] decodes all of it eagerly and hands out stream contents by
//! name or directory index.
//!
//! # Example
//!
//! ```no_run
//! use oletext::ole::OleFile;
//!
//! # fn main() -> oletext::Result<()> {
//! let ole = OleFile::open("document.doc")?;
//! for name in ole.stream_names() {
//!     println!("{}", name);
//! }
//! let word = ole.open_stream("WordDocument")?;
//! println!("WordDocument is {} bytes", word.len());
//! # Ok(())
//! # }
//! ```

/// Constants for OLE file format
pub mod consts;

mod difat;
mod directory;
mod fat;
mod file;
mod header;

#[cfg(test)]
pub(crate) mod fixture;

/// Legacy Word document (.doc) text extraction
#[cfg(feature = "doc")]
pub mod doc;

// Re-export public types for convenient access
pub use directory::{DirectoryEntry, EntryType, NodeColor};
pub use fat::{AllocationTable, ChainWalker};
pub use file::{OleFile, is_ole_file};
pub use header::Header;
