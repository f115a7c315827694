/// File Information Block (FIB) fields needed for text extraction.
///
/// The FIB sits at offset 0 of the WordDocument stream. Only a handful of
/// fixed-offset fields matter here:
/// - `0x0000` wIdent, the magic number (0xA5EC for Word 97 and later)
/// - `0x000A` flags; bit 9 (0x0200) selects the 1Table stream, bit 8 marks
///   encryption
/// - `0x004C` ccpText, followed by the seven other sub-document counters
/// - `0x01A2` fcClx / `0x01A6` lcbClx, the CLX location in the table stream
///
/// Reads past the end of the stream produce zero, so a short stream degrades
/// to an empty piece table instead of failing.
use crate::common::binary::{ByteOrder, clamped_slice};

/// Magic number of Word 97 and later documents
pub const WORD97_MAGIC: u16 = 0xA5EC;
/// Magic number of Word 6.0 / 95 documents
pub const WORD6_MAGIC: u16 = 0xA5DC;

const OFFSET_MAGIC: usize = 0x00;
const OFFSET_FLAGS: usize = 0x0A;
const OFFSET_CCP_TEXT: usize = 0x4C;
const OFFSET_FC_CLX: usize = 0x1A2;
const OFFSET_LCB_CLX: usize = 0x1A6;

/// Character counts of every sub-document after the main text: footnotes,
/// headers, macros, annotations, endnotes, textboxes, header textboxes.
const SUBDOCUMENT_COUNTERS: [usize; 7] = [0x50, 0x54, 0x58, 0x5C, 0x60, 0x64, 0x68];

const FLAG_ENCRYPTED: u16 = 0x0100;
const FLAG_WHICH_TABLE: u16 = 0x0200;

/// Borrowed view over the FIB at the start of a WordDocument stream.
#[derive(Debug, Clone, Copy)]
pub struct Fib<'a> {
    data: &'a [u8],
    order: ByteOrder,
}

impl<'a> Fib<'a> {
    pub fn new(word_document: &'a [u8], order: ByteOrder) -> Self {
        Self {
            data: word_document,
            order,
        }
    }

    #[inline]
    fn u16_at(&self, offset: usize) -> u16 {
        self.order.read_u16(self.data, offset).unwrap_or(0)
    }

    #[inline]
    fn u32_at(&self, offset: usize) -> u32 {
        self.order.read_u32(self.data, offset).unwrap_or(0)
    }

    /// wIdent
    pub fn magic(&self) -> u16 {
        self.u16_at(OFFSET_MAGIC)
    }

    pub fn has_known_magic(&self) -> bool {
        matches!(self.magic(), WORD97_MAGIC | WORD6_MAGIC)
    }

    pub fn flags(&self) -> u16 {
        self.u16_at(OFFSET_FLAGS)
    }

    /// Whether the table stream is `1Table` (true) or `0Table` (false).
    pub fn which_table_stream(&self) -> bool {
        self.flags() & FLAG_WHICH_TABLE != 0
    }

    /// Name of the table stream holding the CLX.
    pub fn table_stream_name(&self) -> &'static str {
        if self.which_table_stream() {
            "1Table"
        } else {
            "0Table"
        }
    }

    pub fn is_encrypted(&self) -> bool {
        self.flags() & FLAG_ENCRYPTED != 0
    }

    /// (fcClx, lcbClx): offset and length of the CLX in the table stream.
    pub fn clx_location(&self) -> (u32, u32) {
        (self.u32_at(OFFSET_FC_CLX), self.u32_at(OFFSET_LCB_CLX))
    }

    /// Slice the CLX out of the table stream, clipped to what is present.
    pub fn clx<'t>(&self, table_stream: &'t [u8]) -> &'t [u8] {
        let (offset, length) = self.clx_location();
        clamped_slice(table_stream, offset as usize, length as usize)
    }

    /// Characters in the main document text.
    pub fn ccp_text(&self) -> u32 {
        self.u32_at(OFFSET_CCP_TEXT)
    }

    /// The character position that ends the piece table's CP array.
    ///
    /// When any sub-document holds text, the counts of all sub-documents are
    /// added plus one for the final paragraph mark separating them; the main
    /// text count comes on top.
    pub fn last_cp(&self) -> u64 {
        let subdocuments: u64 = SUBDOCUMENT_COUNTERS
            .iter()
            .map(|&offset| u64::from(self.u32_at(offset)))
            .sum();
        let separator = u64::from(subdocuments != 0);
        subdocuments + separator + u64::from(self.ccp_text())
    }
}
