//! FAT and MiniFAT tables and sector chain walking.
//!
//! Both tables map a sector index to the next sector of the same stream.
//! The FAT addresses sectors of the file itself; the MiniFAT addresses
//! 64-byte sectors inside the mini stream.

use super::consts::*;
use super::header::Header;
use crate::common::binary::clamped_slice;
use crate::common::error::{Error, Result};
use fixedbitset::FixedBitSet;

/// A sector allocation table (FAT or MiniFAT).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllocationTable {
    entries: Vec<u32>,
}

impl AllocationTable {
    /// Build the FAT by concatenating, in DIFAT order, every FAT sector.
    ///
    /// A DIFAT slot holding a sentinel instead of a sector contributes a
    /// sector's worth of `FREESECT` entries, so the entries of later FAT
    /// sectors keep their index.
    pub(crate) fn fat(data: &[u8], header: &Header, difat: &[u32]) -> Result<Self> {
        let entries_per_sector = header.sector_size() / 4;
        let mut entries = Vec::with_capacity(difat.len() * entries_per_sector);

        for &sector in difat {
            if is_sentinel(sector) {
                log::warn!("Unused DIFAT slot 0x{:08X} before the last FAT sector", sector);
                entries.resize(entries.len() + entries_per_sector, FREESECT);
                continue;
            }
            let bytes = header.read_sector(data, sector)?;
            entries.extend(header.byte_order.u32_array(bytes));
        }

        log::debug!("FAT holds {} entries", entries.len());
        Ok(Self { entries })
    }

    /// Build the MiniFAT by following the FAT from the first MiniFAT sector.
    pub(crate) fn minifat(data: &[u8], header: &Header, fat: &AllocationTable) -> Result<Self> {
        let mut entries = Vec::new();

        for sector in fat.chain(header.first_minifat_sector) {
            let bytes = header.read_sector(data, sector?)?;
            entries.extend(header.byte_order.u32_array(bytes));
        }

        log::debug!("MiniFAT holds {} entries", entries.len());
        Ok(Self { entries })
    }

    /// Create a table from raw entries.
    pub fn from_entries(entries: Vec<u32>) -> Self {
        Self { entries }
    }

    /// The raw table entries, indexed by sector.
    #[inline]
    pub fn entries(&self) -> &[u32] {
        &self.entries
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Next sector after `sector`, or `None` when the table has no entry for it.
    #[inline]
    pub fn next(&self, sector: u32) -> Option<u32> {
        self.entries.get(sector as usize).copied()
    }

    /// Iterate over the sectors of the chain starting at `start`.
    pub fn chain(&self, start: u32) -> ChainWalker<'_> {
        ChainWalker {
            table: self,
            next: Some(start),
            visited: FixedBitSet::with_capacity(self.entries.len()),
        }
    }

    /// Concatenate the payload of every sector in a chain.
    ///
    /// `skip_header` selects the regular-sector addressing, where sector 0
    /// starts one sector into `source` (after the header block); the mini
    /// stream has no header. Sectors that run past the end of `source` are
    /// clipped rather than rejected.
    pub(crate) fn read_chain(
        &self,
        source: &[u8],
        start: u32,
        shift: u16,
        skip_header: bool,
    ) -> Result<Vec<u8>> {
        let sector_size = 1usize << shift;
        let mut out = Vec::new();

        for sector in self.chain(start) {
            let index = u64::from(sector?) + u64::from(skip_header);
            match usize::try_from(index << shift) {
                Ok(offset) => out.extend_from_slice(clamped_slice(source, offset, sector_size)),
                Err(_) => break,
            }
        }

        Ok(out)
    }
}

/// Iterator over a sector chain.
///
/// Stops at `ENDOFCHAIN` (or any other reserved value) and after a sector
/// the table has no entry for. A sector seen twice yields
/// [`Error::CorruptChain`] and ends the walk.
#[derive(Debug)]
pub struct ChainWalker<'a> {
    table: &'a AllocationTable,
    next: Option<u32>,
    visited: FixedBitSet,
}

impl Iterator for ChainWalker<'_> {
    type Item = Result<u32>;

    fn next(&mut self) -> Option<Self::Item> {
        let sector = self.next.take()?;
        if is_sentinel(sector) {
            return None;
        }

        let index = sector as usize;
        if index < self.visited.len() {
            if self.visited.put(index) {
                return Some(Err(Error::CorruptChain(format!(
                    "sector {} appears twice in one chain",
                    sector
                ))));
            }
            self.next = self.table.next(sector);
        }

        Some(Ok(sector))
    }
}
