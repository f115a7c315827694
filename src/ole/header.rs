//! Compound file header decoding.
//!
//! The first 512 bytes of a compound file describe its geometry: sector
//! sizes, where the directory and MiniFAT chains start, and the first 109
//! DIFAT entries.

use super::consts::*;
use crate::common::binary::{ByteOrder, read_bytes};
use crate::common::error::{Error, Result};
use zerocopy::FromBytes;
use zerocopy_derive::FromBytes as DeriveFromBytes;

/// Raw header layout (512 bytes).
///
/// Integer fields are kept as byte arrays so they can be decoded with the byte
/// order announced by the header itself.
#[derive(Debug, Clone, DeriveFromBytes)]
#[repr(C)]
#[allow(dead_code)] // reserved fields only pin the layout
struct RawHeader {
    /// Magic bytes
    signature: [u8; 8],
    /// Reserved class id (must be zero)
    clsid: [u8; 16],
    minor_version: [u8; 2],
    /// 3 for 512-byte sectors, 4 for 4096-byte sectors
    major_version: [u8; 2],
    /// Byte-order mark (FE FF for little-endian)
    byte_order: [u8; 2],
    sector_shift: [u8; 2],
    mini_sector_shift: [u8; 2],
    reserved: [u8; 6],
    /// Number of directory sectors (always zero in version 3)
    num_dir_sectors: [u8; 4],
    num_fat_sectors: [u8; 4],
    first_dir_sector: [u8; 4],
    transaction_signature: [u8; 4],
    /// Streams strictly smaller than this live in the mini stream
    mini_stream_cutoff: [u8; 4],
    first_minifat_sector: [u8; 4],
    num_minifat_sectors: [u8; 4],
    first_difat_sector: [u8; 4],
    num_difat_sectors: [u8; 4],
    /// First 109 FAT sector locations
    difat: [[u8; 4]; HEADER_DIFAT_ENTRIES],
}

/// Decoded container header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Byte order of every integer in the container
    pub byte_order: ByteOrder,
    /// Format version, 3 or 4
    pub major_version: u16,
    /// log2 of the sector size
    pub sector_shift: u16,
    /// log2 of the mini sector size
    pub mini_sector_shift: u16,
    /// Streams below this size are stored in the mini stream
    pub mini_stream_cutoff: u32,
    /// Directory sector count (version 4 only, zero otherwise)
    pub num_dir_sectors: u32,
    pub first_dir_sector: u32,
    pub num_fat_sectors: u32,
    pub first_minifat_sector: u32,
    pub num_minifat_sectors: u32,
    pub first_difat_sector: u32,
    pub num_difat_sectors: u32,
    /// DIFAT entries embedded in the header, including unused markers
    pub(crate) embedded_difat: Vec<u32>,
}

impl Header {
    /// Parse the header at the start of `data`.
    ///
    /// The signature is checked before anything else, so arbitrary bytes fail
    /// with [`Error::InvalidFormat`] without further decoding.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if !has_signature(data) {
            return Err(Error::InvalidFormat(
                "Data is not a compound file (bad signature)".to_string(),
            ));
        }

        let (raw, _) = RawHeader::read_from_prefix(data).map_err(|_| {
            Error::TruncatedData(format!(
                "Header needs {} bytes, only {} available",
                HEADER_SIZE,
                data.len()
            ))
        })?;

        let byte_order = ByteOrder::from_mark(raw.byte_order).ok_or_else(|| {
            Error::InvalidFormat(format!(
                "Unrecognised byte-order mark {:02X}{:02X}",
                raw.byte_order[0], raw.byte_order[1]
            ))
        })?;
        if byte_order == ByteOrder::BigEndian {
            return Err(Error::InvalidFormat(
                "Big-endian compound files are not supported".to_string(),
            ));
        }

        let major_version = byte_order.u16_from(raw.major_version);
        let sector_shift = byte_order.u16_from(raw.sector_shift);
        let mini_sector_shift = byte_order.u16_from(raw.mini_sector_shift);

        if sector_shift != SECTOR_SHIFT_V3 && sector_shift != SECTOR_SHIFT_V4 {
            return Err(Error::InvalidFormat(format!(
                "Unsupported sector shift {}",
                sector_shift
            )));
        }
        if mini_sector_shift == 0 || mini_sector_shift > sector_shift {
            return Err(Error::InvalidFormat(format!(
                "Unsupported mini sector shift {}",
                mini_sector_shift
            )));
        }
        if major_version != 3 && major_version != 4 {
            log::warn!("Unexpected compound file version {}", major_version);
        }

        let num_dir_sectors = if major_version == 4 {
            byte_order.u32_from(raw.num_dir_sectors)
        } else {
            0
        };

        let embedded_difat = raw
            .difat
            .iter()
            .map(|&entry| byte_order.u32_from(entry))
            .collect();

        let header = Header {
            byte_order,
            major_version,
            sector_shift,
            mini_sector_shift,
            mini_stream_cutoff: byte_order.u32_from(raw.mini_stream_cutoff),
            num_dir_sectors,
            first_dir_sector: byte_order.u32_from(raw.first_dir_sector),
            num_fat_sectors: byte_order.u32_from(raw.num_fat_sectors),
            first_minifat_sector: byte_order.u32_from(raw.first_minifat_sector),
            num_minifat_sectors: byte_order.u32_from(raw.num_minifat_sectors),
            first_difat_sector: byte_order.u32_from(raw.first_difat_sector),
            num_difat_sectors: byte_order.u32_from(raw.num_difat_sectors),
            embedded_difat,
        };

        log::debug!(
            "Compound file v{}: sector {} bytes, mini sector {} bytes, cutoff {}",
            header.major_version,
            header.sector_size(),
            header.mini_sector_size(),
            header.mini_stream_cutoff
        );

        Ok(header)
    }

    /// Sector size in bytes
    #[inline]
    pub fn sector_size(&self) -> usize {
        1usize << self.sector_shift
    }

    /// Mini sector size in bytes
    #[inline]
    pub fn mini_sector_size(&self) -> usize {
        1usize << self.mini_sector_shift
    }

    /// Byte offset of a regular sector in the file.
    ///
    /// Sector 0 starts right after the header block, hence the `+ 1`.
    /// Returns `None` when the offset does not fit in memory.
    #[inline]
    pub fn sector_offset(&self, sector: u32) -> Option<usize> {
        let offset = (u64::from(sector) + 1) << self.sector_shift;
        usize::try_from(offset).ok()
    }

    /// Borrow a whole regular sector for structural decoding.
    ///
    /// Unlike stream payload reads, a sector that is not fully present in
    /// the buffer is an error here.
    pub(crate) fn read_sector<'a>(&self, data: &'a [u8], sector: u32) -> Result<&'a [u8]> {
        let offset = self.sector_offset(sector).ok_or_else(|| {
            Error::TruncatedData(format!("Sector {} lies beyond addressable memory", sector))
        })?;
        Ok(read_bytes(data, offset, self.sector_size())?)
    }
}

/// Check whether data starts with one of the two recognised signatures.
pub fn has_signature(data: &[u8]) -> bool {
    data.get(..8)
        .is_some_and(|sig| sig == MAGIC.as_slice() || sig == MAGIC_BETA.as_slice())
}
