//! Directory entry decoding.
//!
//! The directory is a regular FAT chain of 128-byte entries. Entries form a
//! red-black tree per storage, but lookups here are linear scans by name, so
//! the tree links are kept only as decoded fields.

use super::consts::*;
use super::fat::AllocationTable;
use super::header::Header;
use crate::common::error::{Error, Result};
use zerocopy::FromBytes;
use zerocopy_derive::FromBytes as DeriveFromBytes;

/// Raw directory entry layout (128 bytes)
#[derive(Debug, Clone, DeriveFromBytes)]
#[repr(C)]
#[allow(dead_code)] // clsid, state bits and timestamps only pin the layout
struct RawDirectoryEntry {
    /// Entry name in UTF-16 (64 bytes, null-padded)
    name: [u8; 64],
    /// Length of name in bytes (including null terminator)
    name_len: [u8; 2],
    entry_type: u8,
    /// Node color (0 = red, 1 = black)
    node_color: u8,
    sid_left: [u8; 4],
    sid_right: [u8; 4],
    sid_child: [u8; 4],
    clsid: [u8; 16],
    state_bits: [u8; 4],
    creation_time: [u8; 8],
    modified_time: [u8; 8],
    start_sector: [u8; 4],
    stream_size: [u8; 8],
}

/// Kind of object a directory entry describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryType {
    /// Unused slot
    Empty,
    Storage,
    Stream,
    LockBytes,
    Property,
    /// The root storage; its stream is the mini stream
    Root,
    Unknown(u8),
}

impl From<u8> for EntryType {
    fn from(value: u8) -> Self {
        match value {
            STGTY_EMPTY => EntryType::Empty,
            STGTY_STORAGE => EntryType::Storage,
            STGTY_STREAM => EntryType::Stream,
            STGTY_LOCKBYTES => EntryType::LockBytes,
            STGTY_PROPERTY => EntryType::Property,
            STGTY_ROOT => EntryType::Root,
            other => EntryType::Unknown(other),
        }
    }
}

/// Red-black tree node color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeColor {
    Red,
    Black,
}

/// A decoded directory entry (stream, storage or root).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Index of this entry in the directory
    pub sid: u32,
    /// Entry name, trimmed of padding
    pub name: String,
    pub entry_type: EntryType,
    pub color: NodeColor,
    /// Left sibling in the red-black tree
    pub sid_left: u32,
    /// Right sibling in the red-black tree
    pub sid_right: u32,
    /// First child (storages only)
    pub sid_child: u32,
    /// First sector of the content, in the FAT or MiniFAT
    pub start_sector: u32,
    /// Content size in bytes
    pub size: u64,
}

impl DirectoryEntry {
    /// Decode one 128-byte directory slot.
    pub(crate) fn parse(slot: &[u8], sid: u32, header: &Header) -> Result<Self> {
        let raw = RawDirectoryEntry::read_from_bytes(slot).map_err(|_| {
            Error::TruncatedData(format!("Directory entry {} is not {} bytes", sid, DIRENTRY_SIZE))
        })?;
        let order = header.byte_order;

        let name_len = usize::from(order.u16_from(raw.name_len)).min(raw.name.len());
        let units: Vec<u16> = raw.name[..name_len]
            .chunks_exact(2)
            .map(|pair| order.u16_from([pair[0], pair[1]]))
            .collect();
        let name = String::from_utf16_lossy(&units)
            .trim_matches(|c: char| c == '\0' || c.is_whitespace())
            .to_string();

        // Version 3 files leave the high dword of the size undefined
        let mut size = order.u64_from(raw.stream_size);
        if header.major_version == 3 {
            size &= 0xFFFF_FFFF;
        }

        Ok(Self {
            sid,
            name,
            entry_type: EntryType::from(raw.entry_type),
            color: if raw.node_color == 0 {
                NodeColor::Red
            } else {
                NodeColor::Black
            },
            sid_left: order.u32_from(raw.sid_left),
            sid_right: order.u32_from(raw.sid_right),
            sid_child: order.u32_from(raw.sid_child),
            start_sector: order.u32_from(raw.start_sector),
            size,
        })
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.entry_type == EntryType::Root
    }

    #[inline]
    pub fn is_stream(&self) -> bool {
        self.entry_type == EntryType::Stream
    }

    #[inline]
    pub fn is_storage(&self) -> bool {
        self.entry_type == EntryType::Storage
    }
}

/// Read every directory entry by walking the FAT from the first directory
/// sector.
///
/// Trailing empty slots (padding of the last sector) are dropped; empty
/// slots between live entries keep their position so indices stay equal to
/// the on-disk SIDs.
pub(crate) fn read_directory(
    data: &[u8],
    header: &Header,
    fat: &AllocationTable,
) -> Result<Vec<DirectoryEntry>> {
    let mut entries = Vec::new();

    for sector in fat.chain(header.first_dir_sector) {
        let bytes = header.read_sector(data, sector?)?;
        for slot in bytes.chunks_exact(DIRENTRY_SIZE) {
            let sid = entries.len() as u32;
            entries.push(DirectoryEntry::parse(slot, sid, header)?);
        }
    }

    while entries
        .last()
        .is_some_and(|entry: &DirectoryEntry| entry.entry_type == EntryType::Empty)
    {
        entries.pop();
    }

    log::debug!("Directory holds {} entries", entries.len());
    Ok(entries)
}
