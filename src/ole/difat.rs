//! DIFAT assembly.
//!
//! The DIFAT lists every sector that holds a slice of the FAT. The header
//! carries the first 109 entries; larger files continue in a chain of DIFAT
//! sectors whose last slot points at the next DIFAT sector.

use super::consts::*;
use super::header::Header;
use crate::common::error::Result;

/// Build the DIFAT from the header entries and the overflow chain.
///
/// The overflow walk visits at most `num_difat_sectors` sectors, so a chain
/// that loops back on itself still terminates. Trailing `FREESECT` markers
/// are dropped from the result.
pub(crate) fn assemble(data: &[u8], header: &Header) -> Result<Vec<u32>> {
    let mut difat = header.embedded_difat.clone();

    // Every overflow sector ends with the pointer to the next one
    let entries_per_sector = header.sector_size() / 4 - 1;
    let mut sector = header.first_difat_sector;
    let mut walked = 0u32;

    while walked < header.num_difat_sectors && !is_sentinel(sector) {
        let values = header
            .byte_order
            .u32_array(header.read_sector(data, sector)?);
        difat.extend_from_slice(&values[..entries_per_sector]);
        sector = values[entries_per_sector];
        walked += 1;
    }

    if walked < header.num_difat_sectors {
        log::warn!(
            "DIFAT chain ended after {} of {} declared sectors",
            walked,
            header.num_difat_sectors
        );
    }

    while difat.last() == Some(&FREESECT) {
        difat.pop();
    }

    log::debug!("DIFAT lists {} FAT sectors", difat.len());
    Ok(difat)
}
