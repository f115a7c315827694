/// Magic bytes at the beginning of every compound file
pub const MAGIC: &[u8; 8] = b"\xD0\xCF\x11\xE0\xA1\xB1\x1A\xE1";

/// Magic bytes written by pre-release (beta) OLE2 implementations
pub const MAGIC_BETA: &[u8; 8] = b"\x0E\x11\xFC\x0D\xD0\xCF\x11\xE0";

/// Size of the header block in bytes
pub const HEADER_SIZE: usize = 512;

/// Number of DIFAT entries embedded in the header
pub const HEADER_DIFAT_ENTRIES: usize = 109;

/// Size of a directory entry in bytes
pub const DIRENTRY_SIZE: usize = 128;

/// Sector shift for version 3 files (512-byte sectors)
pub const SECTOR_SHIFT_V3: u16 = 9;

/// Sector shift for version 4 files (4096-byte sectors)
pub const SECTOR_SHIFT_V4: u16 = 12;

/// Name of the root storage entry, whose stream is the mini stream
pub const ROOT_ENTRY_NAME: &str = "Root Entry";

// Sector IDs (from AAF specifications)
/// Maximum regular sector ID
pub const MAXREGSECT: u32 = 0xFFFFFFFA; // -6
/// Denotes a DIFAT sector in a FAT
pub const DIFSECT: u32 = 0xFFFFFFFC; // -4
/// Denotes a FAT sector in a FAT
pub const FATSECT: u32 = 0xFFFFFFFD; // -3
/// End of a virtual stream chain
pub const ENDOFCHAIN: u32 = 0xFFFFFFFE; // -2
/// Unallocated sector
pub const FREESECT: u32 = 0xFFFFFFFF; // -1

/// Unallocated directory entry
pub const NOSTREAM: u32 = 0xFFFFFFFF; // -1

// Object types in storage (from AAF specifications)
/// Empty directory entry
pub const STGTY_EMPTY: u8 = 0;
/// Element is a storage object
pub const STGTY_STORAGE: u8 = 1;
/// Element is a stream object
pub const STGTY_STREAM: u8 = 2;
/// Element is an ILockBytes object
pub const STGTY_LOCKBYTES: u8 = 3;
/// Element is an IPropertyStorage object
pub const STGTY_PROPERTY: u8 = 4;
/// Element is a root storage
pub const STGTY_ROOT: u8 = 5;

/// Whether a chain value is one of the reserved sentinels rather than a sector.
#[inline]
pub const fn is_sentinel(sector: u32) -> bool {
    sector > MAXREGSECT
}
