/// Word (.doc) text extraction.
///
/// This module recovers the plain text of Microsoft Word documents in the
/// legacy binary format (.doc files), which uses OLE2 structured storage.
///
/// # DOC File Structure
///
/// A .doc file is an OLE2 structured storage containing several streams:
/// - **WordDocument**: Main document stream containing the FIB and the text
/// - **1Table** or **0Table**: Contains the CLX with the piece table
/// - **Data**: Contains embedded objects and images (unused here)
///
/// # Example
///
/// ```rust,no_run
/// use oletext::TextConverter;
/// use oletext::doc::Package;
///
/// let package = Package::open("document.doc")?;
/// match package.parse()? {
///     Some(text) => println!("{}", text),
///     None => eprintln!("no Word text in this container"),
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub mod package;
pub mod parts;

pub use package::{ExtractOptions, Package};
