//! The text conversion contract shared by document extractors.

use super::error::Result;

/// A document that can be flattened to plain text.
///
/// Implemented by the Word extractor; any other extractor built on
/// [`OleFile`](crate::ole::OleFile) (for example a PowerPoint one) provides the
/// same entry point.
pub trait TextConverter {
    /// Extract the document text.
    ///
    /// Returns `Ok(None)` when the container decodes fine but does not hold
    /// the streams this converter needs.
    fn parse(&self) -> Result<Option<String>>;
}
