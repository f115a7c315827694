/// Text extraction from DOC files.
///
/// Text in a DOC file is stored piece by piece in the WordDocument stream:
/// - 8-bit pieces hold Windows-1252 bytes and are decoded as they are
/// - 16-bit pieces hold UTF-16LE code units; control characters in them are
///   mapped to newlines or field markers, or dropped
///
/// Pieces that point past the end of the stream contribute whatever bytes
/// are present.
use super::fields::{FIELD_BEGIN, FIELD_END, FIELD_SEPARATOR};
use super::piece_table::{PieceTable, TextPiece};
use crate::common::binary::{ByteOrder, clamped_slice};
use encoding_rs::WINDOWS_1252;

/// Map a control code (below 0x20) found in 16-bit text.
///
/// Paragraph marks (0x0D) and cell marks (0x07) become newlines and the
/// three field delimiters are kept as markers; every other control code has
/// no textual form.
pub fn control_substitution(code: u32) -> Option<char> {
    match code {
        0x0D | 0x07 => Some('\n'),
        0x13 => Some(FIELD_BEGIN),
        0x14 => Some(FIELD_SEPARATOR),
        0x15 => Some(FIELD_END),
        _ => None,
    }
}

/// Concatenate the text of every piece, in piece table order.
pub fn extract_text(word_document: &[u8], pieces: &PieceTable, order: ByteOrder) -> String {
    let mut text = String::new();
    for piece in pieces.iter() {
        append_piece(&mut text, word_document, piece, order);
    }
    text
}

fn append_piece(text: &mut String, word_document: &[u8], piece: &TextPiece, order: ByteOrder) {
    let bytes = clamped_slice(word_document, piece.fc as usize, piece.byte_len());
    if bytes.len() < piece.byte_len() {
        log::warn!(
            "Piece at CP {} wants {} bytes at 0x{:X}, only {} present",
            piece.cp_start,
            piece.byte_len(),
            piece.fc,
            bytes.len()
        );
    }

    if piece.is_unicode {
        decode_utf16(text, bytes, order);
    } else {
        let (decoded, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
        text.push_str(&decoded);
    }
}

fn decode_utf16(text: &mut String, bytes: &[u8], order: ByteOrder) {
    let units = bytes
        .chunks_exact(2)
        .map(|pair| order.u16_from([pair[0], pair[1]]));

    for decoded in char::decode_utf16(units) {
        match decoded {
            Ok(c) if (c as u32) < 0x20 => {
                if let Some(substitute) = control_substitution(c as u32) {
                    text.push(substitute);
                }
            },
            Ok(c) => text.push(c),
            Err(_) => text.push(char::REPLACEMENT_CHARACTER),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LE: ByteOrder = ByteOrder::LittleEndian;

    fn utf16(s: &str) -> Vec<u8> {
        s.encode_utf16().flat_map(|u| u.to_le_bytes()).collect()
    }

    fn table(pieces: &[(u32, u32)]) -> PieceTable {
        let mut plc = Vec::new();
        let mut cp = 0u32;
        plc.extend_from_slice(&cp.to_le_bytes());
        for &(len, _) in pieces {
            cp += len;
            plc.extend_from_slice(&cp.to_le_bytes());
        }
        for &(_, fc_raw) in pieces {
            plc.extend_from_slice(&[0, 0]);
            plc.extend_from_slice(&fc_raw.to_le_bytes());
            plc.extend_from_slice(&[0, 0]);
        }
        PieceTable::from_plc(&plc, u64::from(cp), LE).unwrap()
    }

    #[test]
    fn test_control_substitution() {
        assert_eq!(control_substitution(0x0D), Some('\n'));
        assert_eq!(control_substitution(0x07), Some('\n'));
        assert_eq!(control_substitution(0x13), Some(FIELD_BEGIN));
        assert_eq!(control_substitution(0x14), Some(FIELD_SEPARATOR));
        assert_eq!(control_substitution(0x15), Some(FIELD_END));
        assert_eq!(control_substitution(0x01), None);
        assert_eq!(control_substitution(0x0C), None);
    }

    #[test]
    fn test_mixed_pieces() {
        let mut stream = b"Hello".to_vec();
        stream.extend(utf16(" w\u{00F6}rld\r"));
        let pieces = table(&[(5, 0x4000_0000), (7, 5)]);
        assert_eq!(extract_text(&stream, &pieces, LE), "Hello w\u{00F6}rld\n");
    }

    #[test]
    fn test_ansi_is_windows_1252() {
        // 0x80 is the euro sign in Windows-1252
        let stream = [0x80, b'5', 0x0D];
        let pieces = table(&[(3, 0x4000_0000)]);
        assert_eq!(extract_text(&stream, &pieces, LE), "\u{20AC}5\r");
    }

    #[test]
    fn test_unicode_controls_and_surrogates() {
        let mut stream = utf16("a\u{1}b\u{7}\u{13}c\u{14}d\u{15}");
        stream.extend(utf16("\u{1F600}"));
        stream.extend_from_slice(&0xD800u16.to_le_bytes());
        let pieces = table(&[(13, 0)]);
        assert_eq!(
            extract_text(&stream, &pieces, LE),
            "ab\n\u{13}c\u{14}d\u{15}\u{1F600}\u{FFFD}"
        );
    }

    #[test]
    fn test_piece_past_end_is_clipped() {
        let stream = b"abc";
        let pieces = table(&[(10, 0x4000_0002)]);
        assert_eq!(extract_text(stream, &pieces, LE), "bc");
        let beyond = table(&[(2, 0x4000_1000)]);
        assert_eq!(extract_text(stream, &beyond, LE), "");
    }
}
