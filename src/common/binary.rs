//! Binary data parsing utilities shared across the container reader and the
//! Word extractor.
//!
//! Every multi-byte integer in a compound file (header fields, DIFAT, FAT,
//! directory entries, FIB counters, piece descriptors) goes through
//! [`ByteOrder`], which honours the byte-order mark found in the container
//! header. Reads are unsigned; nothing here applies sign extension.

use zerocopy::{BE, FromBytes, LE, U16, U32, U64};

/// Binary parsing error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BinaryError {
    /// Not enough data to read the requested type
    InsufficientData {
        offset: usize,
        expected: usize,
        available: usize,
    },
    /// Integer width outside 1..=8 bytes
    UnsupportedWidth(usize),
}

impl std::fmt::Display for BinaryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BinaryError::InsufficientData {
                offset,
                expected,
                available,
            } => {
                write!(
                    f,
                    "Insufficient data at offset {}: expected {} bytes, {} available",
                    offset, expected, available
                )
            },
            BinaryError::UnsupportedWidth(width) => {
                write!(f, "Unsupported integer width: {} bytes", width)
            },
        }
    }
}

impl std::error::Error for BinaryError {}

/// Result type for binary operations
pub type BinaryResult<T> = Result<T, BinaryError>;

/// Byte order of multi-byte integers in a container.
///
/// The compound file header stores a byte-order mark at offset `0x1C`.
/// The bytes `FE FF` mean the integers are stored least significant byte
/// first, which is what every Office writer produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrder {
    #[default]
    LittleEndian,
    BigEndian,
}

impl ByteOrder {
    /// Decode the two raw bytes of the header byte-order mark.
    ///
    /// # Examples
    ///
    /// ```
    /// use oletext::common::binary::ByteOrder;
    /// assert_eq!(ByteOrder::from_mark([0xFE, 0xFF]), Some(ByteOrder::LittleEndian));
    /// assert_eq!(ByteOrder::from_mark([0xFF, 0xFE]), Some(ByteOrder::BigEndian));
    /// assert_eq!(ByteOrder::from_mark([0x00, 0x00]), None);
    /// ```
    pub fn from_mark(mark: [u8; 2]) -> Option<Self> {
        match mark {
            [0xFE, 0xFF] => Some(ByteOrder::LittleEndian),
            [0xFF, 0xFE] => Some(ByteOrder::BigEndian),
            _ => None,
        }
    }

    /// Read an unsigned integer of `width` bytes (1 to 8) at `offset`.
    ///
    /// # Examples
    ///
    /// ```
    /// use oletext::common::binary::ByteOrder;
    /// let data = [0x01, 0x02, 0x03];
    /// assert_eq!(ByteOrder::LittleEndian.read_uint(&data, 0, 3).unwrap(), 0x030201);
    /// assert_eq!(ByteOrder::BigEndian.read_uint(&data, 0, 3).unwrap(), 0x010203);
    /// ```
    pub fn read_uint(self, data: &[u8], offset: usize, width: usize) -> BinaryResult<u64> {
        if width == 0 || width > 8 {
            return Err(BinaryError::UnsupportedWidth(width));
        }
        let bytes = read_bytes(data, offset, width)?;
        let fold = |acc: u64, b: &u8| (acc << 8) | u64::from(*b);
        Ok(match self {
            ByteOrder::LittleEndian => bytes.iter().rev().fold(0, fold),
            ByteOrder::BigEndian => bytes.iter().fold(0, fold),
        })
    }

    /// Read a u16 at the given offset.
    #[inline]
    pub fn read_u16(self, data: &[u8], offset: usize) -> BinaryResult<u16> {
        let bytes = read_array::<2>(data, offset)?;
        Ok(self.u16_from(bytes))
    }

    /// Read a u32 at the given offset.
    #[inline]
    pub fn read_u32(self, data: &[u8], offset: usize) -> BinaryResult<u32> {
        let bytes = read_array::<4>(data, offset)?;
        Ok(self.u32_from(bytes))
    }

    /// Read a u64 at the given offset.
    #[inline]
    pub fn read_u64(self, data: &[u8], offset: usize) -> BinaryResult<u64> {
        let bytes = read_array::<8>(data, offset)?;
        Ok(self.u64_from(bytes))
    }

    /// Decode a u16 from raw bytes already copied out of a record.
    #[inline]
    pub fn u16_from(self, bytes: [u8; 2]) -> u16 {
        match self {
            ByteOrder::LittleEndian => U16::<LE>::from_bytes(bytes).get(),
            ByteOrder::BigEndian => U16::<BE>::from_bytes(bytes).get(),
        }
    }

    #[inline]
    pub fn u32_from(self, bytes: [u8; 4]) -> u32 {
        match self {
            ByteOrder::LittleEndian => U32::<LE>::from_bytes(bytes).get(),
            ByteOrder::BigEndian => U32::<BE>::from_bytes(bytes).get(),
        }
    }

    #[inline]
    pub fn u64_from(self, bytes: [u8; 8]) -> u64 {
        match self {
            ByteOrder::LittleEndian => U64::<LE>::from_bytes(bytes).get(),
            ByteOrder::BigEndian => U64::<BE>::from_bytes(bytes).get(),
        }
    }

    /// Decode a whole slice as consecutive u32 values.
    ///
    /// Trailing bytes that do not form a full u32 are ignored.
    pub fn u32_array(self, data: &[u8]) -> Vec<u32> {
        data.chunks_exact(4)
            .filter_map(|chunk| <[u8; 4]>::read_from_bytes(chunk).ok())
            .map(|bytes| self.u32_from(bytes))
            .collect()
    }
}

/// Borrow exactly `len` bytes at `offset`, or fail.
#[inline]
pub fn read_bytes(data: &[u8], offset: usize, len: usize) -> BinaryResult<&[u8]> {
    offset
        .checked_add(len)
        .and_then(|end| data.get(offset..end))
        .ok_or(BinaryError::InsufficientData {
            offset,
            expected: len,
            available: data.len().saturating_sub(offset),
        })
}

#[inline]
fn read_array<const N: usize>(data: &[u8], offset: usize) -> BinaryResult<[u8; N]> {
    let bytes = read_bytes(data, offset, N)?;
    <[u8; N]>::read_from_bytes(bytes).map_err(|_| BinaryError::InsufficientData {
        offset,
        expected: N,
        available: bytes.len(),
    })
}

/// Borrow up to `len` bytes at `offset`.
///
/// Returns a short slice when the range runs past the end of `data` and an
/// empty slice when `offset` itself is out of range.
///
/// # Examples
///
/// ```
/// use oletext::common::binary::clamped_slice;
/// let data = b"abcdef";
/// assert_eq!(clamped_slice(data, 2, 3), b"cde");
/// assert_eq!(clamped_slice(data, 4, 10), b"ef");
/// assert_eq!(clamped_slice(data, 10, 1), b"");
/// ```
#[inline]
pub fn clamped_slice(data: &[u8], offset: usize, len: usize) -> &[u8] {
    let start = offset.min(data.len());
    let end = offset.saturating_add(len).min(data.len());
    &data[start..end]
}
