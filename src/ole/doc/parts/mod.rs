/// Internal parts for parsing DOC file structures.
///
/// This module contains parsers for the binary structures used to recover
/// the text of a legacy Word document:
/// - FIB (File Information Block) fields
/// - Piece table location and decoding
/// - Text piece decoding
/// - Field code resolution
pub mod fib;
pub mod fields;
pub mod piece_table;
pub mod text;
