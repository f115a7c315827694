/// Piece table parser for DOC files.
///
/// The piece table maps character positions (CP) of the document text to
/// file positions (FC) in the WordDocument stream. It lives inside the CLX
/// blob of the table stream as a `Pcdt`: a `0x02` marker, a 4-byte length,
/// then a PLC of `N + 1` CPs followed by `N` 8-byte piece descriptors.
///
/// Nothing in the FIB points at the `Pcdt` directly. The CLX may start with
/// property modifiers whose payload can contain `0x02` bytes too, so the
/// marker is found by scanning and checking that its declared length covers
/// exactly the rest of the CLX.
///
/// References:
/// - [MS-DOC] 2.9.38 Clx
/// - [MS-DOC] 2.9.178 PlcPcd
/// - [MS-DOC] 2.9.177 Pcd
use crate::common::binary::ByteOrder;
use memchr::memchr_iter;

/// Size of a piece descriptor in bytes
pub const PIECE_DESCRIPTOR_SIZE: usize = 8;

/// Marker byte starting the `Pcdt` structure
const PCDT_MARKER: u8 = 0x02;
/// Marker byte plus the 4-byte `lcb`
const PCDT_HEADER_SIZE: usize = 5;
/// Offset of the `fc` field inside a piece descriptor
const PCD_FC_OFFSET: usize = 2;

/// Set in a descriptor's `fc` when the piece is stored as 8-bit text
const FC_COMPRESSED: u32 = 0x4000_0000;
const FC_MASK: u32 = 0x3FFF_FFFF;

/// Find the piece table (PlcPcd) inside a CLX blob.
///
/// Every `0x02` byte is a candidate; the first one whose following `u32`
/// equals the number of CLX bytes after the 5-byte header wins. Returns the
/// PlcPcd bytes, or `None` when no candidate agrees.
pub fn locate(clx: &[u8], order: ByteOrder) -> Option<&[u8]> {
    for pos in memchr_iter(PCDT_MARKER, clx) {
        let Ok(declared) = order.read_u32(clx, pos + 1) else {
            break;
        };
        let remaining = clx.len() - (pos + PCDT_HEADER_SIZE);
        if declared as usize == remaining {
            return Some(&clx[pos + PCDT_HEADER_SIZE..]);
        }
        log::trace!(
            "CLX byte {} is not the piece table: declares {} bytes, {} remain",
            pos,
            declared,
            remaining
        );
    }
    None
}

/// Read the CP array at the start of a PlcPcd.
///
/// Values are collected up to and including the first one equal to
/// `last_cp`. Returns `None` when the data runs out first.
pub fn read_character_positions(plc: &[u8], last_cp: u64, order: ByteOrder) -> Option<Vec<u32>> {
    let mut cps = Vec::new();
    for chunk in plc.chunks_exact(4) {
        let cp = order.u32_from([chunk[0], chunk[1], chunk[2], chunk[3]]);
        cps.push(cp);
        if u64::from(cp) == last_cp {
            return Some(cps);
        }
    }
    None
}

/// A text piece: a run of CPs stored contiguously in the WordDocument stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextPiece {
    /// Start character position (CP)
    pub cp_start: u32,
    /// End character position (CP), exclusive
    pub cp_end: u32,
    /// Byte offset of the text in the WordDocument stream
    pub fc: u32,
    /// Whether the text is UTF-16 (true) or 8-bit (false)
    pub is_unicode: bool,
}

impl TextPiece {
    /// Build a piece from its CP range and the raw descriptor `fc`.
    ///
    /// For 8-bit pieces the raw value counts 16-bit units, so the byte
    /// offset is half of it.
    pub fn from_descriptor(cp_start: u32, cp_end: u32, fc_raw: u32) -> Self {
        let is_unicode = fc_raw & FC_COMPRESSED == 0;
        let fc = if is_unicode {
            fc_raw & FC_MASK
        } else {
            (fc_raw & FC_MASK) / 2
        };
        Self {
            cp_start,
            cp_end,
            fc,
            is_unicode,
        }
    }

    /// Length in characters; zero when the CPs run backwards.
    #[inline]
    pub fn length(&self) -> u32 {
        self.cp_end.saturating_sub(self.cp_start)
    }

    /// Length of the stored text in bytes.
    #[inline]
    pub fn byte_len(&self) -> usize {
        let chars = self.length() as usize;
        if self.is_unicode { chars * 2 } else { chars }
    }
}

/// The decoded piece table, pieces in CP order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PieceTable {
    pieces: Vec<TextPiece>,
}

impl PieceTable {
    /// Parse the piece table out of a CLX blob.
    ///
    /// # Arguments
    ///
    /// * `clx` - The CLX bytes from the table stream (at fcClx/lcbClx in the FIB)
    /// * `last_cp` - The CP closing the CP array, see [`Fib::last_cp`](super::fib::Fib::last_cp)
    /// * `order` - Byte order of the container
    ///
    /// # Returns
    ///
    /// The piece table, or `None` if no piece table is found or its CP array
    /// never reaches `last_cp`.
    pub fn parse(clx: &[u8], last_cp: u64, order: ByteOrder) -> Option<Self> {
        let Some(plc) = locate(clx, order) else {
            log::warn!("No piece table found in {} bytes of CLX", clx.len());
            return None;
        };
        Self::from_plc(plc, last_cp, order)
    }

    /// Decode a PlcPcd: the CP array, then one descriptor per piece.
    pub fn from_plc(plc: &[u8], last_cp: u64, order: ByteOrder) -> Option<Self> {
        let Some(cps) = read_character_positions(plc, last_cp, order) else {
            log::warn!("Piece table CPs never reach the last CP {}", last_cp);
            return None;
        };

        let descriptors = plc
            .get(cps.len() * 4..)
            .unwrap_or_default()
            .chunks_exact(PIECE_DESCRIPTOR_SIZE);
        if descriptors.len() + 1 < cps.len() {
            log::warn!(
                "Piece table has {} CPs but only {} descriptors",
                cps.len(),
                descriptors.len()
            );
        }

        let pieces: Vec<TextPiece> = cps
            .windows(2)
            .zip(descriptors)
            .map(|(range, pcd)| {
                let fc_raw = order.u32_from([
                    pcd[PCD_FC_OFFSET],
                    pcd[PCD_FC_OFFSET + 1],
                    pcd[PCD_FC_OFFSET + 2],
                    pcd[PCD_FC_OFFSET + 3],
                ]);
                TextPiece::from_descriptor(range[0], range[1], fc_raw)
            })
            .collect();

        log::debug!("Piece table holds {} pieces", pieces.len());
        Some(Self { pieces })
    }

    #[inline]
    pub fn pieces(&self) -> &[TextPiece] {
        &self.pieces
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TextPiece> {
        self.pieces.iter()
    }
}
