use super::consts::*;
use super::difat;
use super::directory::{self, DirectoryEntry};
use super::fat::AllocationTable;
use super::header::{Header, has_signature};
use crate::common::binary::ByteOrder;
use crate::common::error::{Error, Result};
use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// A decoded compound file.
///
/// All structures (header, FAT, MiniFAT, directory and the mini stream) are
/// decoded eagerly by the constructors and never change afterwards, so an
/// `OleFile` can be shared freely between readers of its streams.
#[derive(Debug, Clone)]
pub struct OleFile {
    /// Entire file contents
    data: Vec<u8>,
    header: Header,
    /// File Allocation Table - maps sector to next sector in chain
    fat: AllocationTable,
    /// Mini FAT - for streams smaller than the cutoff size
    minifat: AllocationTable,
    /// Directory entries in on-disk order
    entries: Vec<DirectoryEntry>,
    /// Content of the root entry; backing store for mini streams
    mini_stream: Vec<u8>,
}

impl OleFile {
    /// Read and decode a compound file from disk.
    ///
    /// # Arguments
    /// * `path` - Path to a regular, readable file
    ///
    /// # Returns
    /// * `Result<OleFile>` - The decoded container, or `Error::Io` when the
    ///   path cannot be read
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let metadata = fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Unable to read '{}': not a regular file", path.display()),
            )));
        }

        log::debug!("Reading compound file {}", path.display());
        Self::from_bytes(fs::read(path)?)
    }

    /// Read a reader to its end and decode the bytes.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// Decode a compound file held in memory.
    ///
    /// Runs the whole pipeline: header, DIFAT, FAT, MiniFAT, directory, and
    /// finally the mini stream taken from the entry named `"Root Entry"`.
    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Result<Self> {
        let data = data.into();

        let header = Header::parse(&data)?;
        let difat = difat::assemble(&data, &header)?;
        let fat = AllocationTable::fat(&data, &header, &difat)?;
        let minifat = AllocationTable::minifat(&data, &header, &fat)?;
        let entries = directory::read_directory(&data, &header, &fat)?;

        let mut ole = OleFile {
            data,
            header,
            fat,
            minifat,
            entries,
            mini_stream: Vec::new(),
        };

        let root_id = ole
            .find_stream(ROOT_ENTRY_NAME)
            .ok_or(Error::RootEntryMissing)?;
        ole.mini_stream = ole.read_stream(root_id, true)?;

        Ok(ole)
    }

    /// The decoded header
    #[inline]
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Byte order announced by the header
    #[inline]
    pub fn byte_order(&self) -> ByteOrder {
        self.header.byte_order
    }

    /// Raw file contents
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn fat(&self) -> &AllocationTable {
        &self.fat
    }

    #[inline]
    pub fn minifat(&self) -> &AllocationTable {
        &self.minifat
    }

    /// Content of the root entry, which holds every mini stream
    #[inline]
    pub fn mini_stream(&self) -> &[u8] {
        &self.mini_stream
    }

    /// All directory entries in on-disk order
    #[inline]
    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    /// Directory entry by index
    #[inline]
    pub fn entry(&self, id: usize) -> Option<&DirectoryEntry> {
        self.entries.get(id)
    }

    /// Names of all stream entries, in directory order
    pub fn stream_names(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|entry| entry.is_stream())
            .map(|entry| entry.name.as_str())
    }

    /// Index of the first entry named exactly `name` (case-sensitive).
    pub fn find_stream(&self, name: &str) -> Option<usize> {
        self.find_stream_from(name, 0)
    }

    /// Index of the first entry named exactly `name`, at or after `from`.
    pub fn find_stream_from(&self, name: &str, from: usize) -> Option<usize> {
        self.entries
            .iter()
            .enumerate()
            .skip(from)
            .find(|(_, entry)| entry.name == name)
            .map(|(id, _)| id)
    }

    /// Reassemble the content of the entry at `id`.
    ///
    /// Entries smaller than the mini stream cutoff are read through the
    /// MiniFAT from the mini stream, unless `is_root` is set: the root
    /// entry's content always lives in regular sectors. The result is
    /// truncated to the declared size and may be shorter when the chain runs
    /// past the end of the data.
    pub fn read_stream(&self, id: usize, is_root: bool) -> Result<Vec<u8>> {
        let entry = self
            .entry(id)
            .ok_or_else(|| Error::StreamNotFound(format!("directory entry #{}", id)))?;

        let mut data = if entry.size < u64::from(self.header.mini_stream_cutoff) && !is_root {
            self.minifat.read_chain(
                &self.mini_stream,
                entry.start_sector,
                self.header.mini_sector_shift,
                false,
            )?
        } else {
            self.fat.read_chain(
                &self.data,
                entry.start_sector,
                self.header.sector_shift,
                true,
            )?
        };

        data.truncate(usize::try_from(entry.size).unwrap_or(usize::MAX));
        Ok(data)
    }

    /// Find a stream by name and read it.
    pub fn open_stream(&self, name: &str) -> Result<Vec<u8>> {
        let id = self
            .find_stream(name)
            .ok_or_else(|| Error::StreamNotFound(name.to_string()))?;
        self.read_stream(id, false)
    }

    /// Check if an entry with this name exists
    pub fn exists(&self, name: &str) -> bool {
        self.find_stream(name).is_some()
    }
}

/// Check if data looks like a compound file: a full header block starting
/// with one of the two recognised signatures.
pub fn is_ole_file(data: &[u8]) -> bool {
    data.len() >= HEADER_SIZE && has_signature(data)
}
