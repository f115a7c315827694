/// Package implementation for legacy Word documents (.doc).
use super::parts::fib::Fib;
use super::parts::fields::{resolve_fields, strip_markers};
use super::parts::piece_table::PieceTable;
use super::parts::text::extract_text;
use crate::common::convert::TextConverter;
use crate::common::error::Result;
use crate::ole::OleFile;
use std::path::Path;

/// Name of the main document stream
const WORD_DOCUMENT_STREAM: &str = "WordDocument";

/// Options controlling text extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Replace fields by their results and drop picture/control fields.
    /// When disabled, only the field markers are removed and the field code
    /// text stays in the output.
    pub resolve_fields: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            resolve_fields: true,
        }
    }
}

impl ExtractOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resolve_fields(mut self, resolve_fields: bool) -> Self {
        self.resolve_fields = resolve_fields;
        self
    }
}

/// A Word (.doc) package.
///
/// This is the main entry point for working with legacy Word documents.
/// It wraps an [`OleFile`] and extracts the document text through
/// [`TextConverter::parse`].
///
/// A container without a `WordDocument` or table stream is not an error:
/// `parse` returns `Ok(None)` for it.
///
/// # Examples
///
/// ```rust,no_run
/// use oletext::TextConverter;
/// use oletext::doc::{ExtractOptions, Package};
///
/// let pkg = Package::open("document.doc")?
///     .with_options(ExtractOptions::new().with_resolve_fields(false));
/// if let Some(text) = pkg.parse()? {
///     println!("{}", text);
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct Package {
    /// The underlying OLE file
    ole: OleFile,
    options: ExtractOptions,
}

impl Package {
    /// Open a .doc package from a file path.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the .doc file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::from_ole_file(OleFile::open(path)?))
    }

    /// Decode a .doc package held in memory.
    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Result<Self> {
        Ok(Self::from_ole_file(OleFile::from_bytes(data)?))
    }

    /// Create a Package from an already-parsed OLE file.
    pub fn from_ole_file(ole: OleFile) -> Self {
        Self {
            ole,
            options: ExtractOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ExtractOptions) -> Self {
        self.options = options;
        self
    }

    #[inline]
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Get the underlying OLE file.
    #[inline]
    pub fn ole_file(&self) -> &OleFile {
        &self.ole
    }

    /// Read a stream by name, or `None` when the directory has no such entry.
    fn stream(&self, name: &str) -> Result<Option<Vec<u8>>> {
        match self.ole.find_stream(name) {
            Some(id) => Ok(Some(self.ole.read_stream(id, false)?)),
            None => {
                log::debug!("No {} stream in container", name);
                Ok(None)
            },
        }
    }
}

impl TextConverter for Package {
    fn parse(&self) -> Result<Option<String>> {
        let Some(word_document) = self.stream(WORD_DOCUMENT_STREAM)? else {
            return Ok(None);
        };

        let order = self.ole.byte_order();
        let fib = Fib::new(&word_document, order);
        if !fib.has_known_magic() {
            log::warn!("Unexpected FIB magic 0x{:04X}", fib.magic());
        }
        if fib.is_encrypted() {
            log::warn!("Document is encrypted; extracted text will be garbage");
        }

        let Some(table_stream) = self.stream(fib.table_stream_name())? else {
            return Ok(None);
        };

        let Some(pieces) = PieceTable::parse(fib.clx(&table_stream), fib.last_cp(), order) else {
            return Ok(None);
        };

        let text = extract_text(&word_document, &pieces, order);
        let text = if self.options.resolve_fields {
            resolve_fields(&text)
        } else {
            strip_markers(&text)
        };

        Ok(Some(text))
    }
}
