//! Synthetic compound files for tests.
//!
//! `CfbBuilder` lays out a version 3 file (512-byte sectors) or, with
//! `version(4)`, a version 4 file (4096-byte sectors), both with 64-byte mini
//! sectors, in this order: regular stream sectors, mini stream sectors,
//! MiniFAT sectors, directory sectors, FAT sectors. Streams below 4096 bytes
//! go to the mini stream, like a real writer would place them.

#![cfg_attr(not(feature = "doc"), allow(dead_code))]

use super::consts::*;

const MINI_SECTOR: usize = 64;
const CUTOFF: usize = 4096;

/// Where the builder put things, for tests that patch the bytes.
pub(crate) struct Layout {
    pub bytes: Vec<u8>,
    /// FAT sector indices, in DIFAT order
    pub fat_sectors: Vec<u32>,
    pub dir_start: u32,
    /// Start sector of each stream (FAT or MiniFAT index), in insertion order
    pub stream_starts: Vec<u32>,
}

pub(crate) struct CfbBuilder {
    root_name: String,
    streams: Vec<(String, Vec<u8>)>,
    version: u16,
}

impl CfbBuilder {
    pub fn new() -> Self {
        Self {
            root_name: ROOT_ENTRY_NAME.to_string(),
            streams: Vec::new(),
            version: 3,
        }
    }

    pub fn root_name(mut self, name: &str) -> Self {
        self.root_name = name.to_string();
        self
    }

    pub fn stream(mut self, name: &str, data: &[u8]) -> Self {
        self.streams.push((name.to_string(), data.to_vec()));
        self
    }

    /// Format version: 3 (512-byte sectors) or 4 (4096-byte sectors).
    pub fn version(mut self, version: u16) -> Self {
        assert!(version == 3 || version == 4, "unsupported fixture version");
        self.version = version;
        self
    }

    fn sector_shift(&self) -> u16 {
        if self.version == 4 {
            SECTOR_SHIFT_V4
        } else {
            SECTOR_SHIFT_V3
        }
    }

    fn sector_size(&self) -> usize {
        1 << self.sector_shift()
    }

    pub fn build(&self) -> Vec<u8> {
        self.layout().bytes
    }

    pub fn layout(&self) -> Layout {
        let sector_size = self.sector_size();
        let mut sectors: Vec<Vec<u8>> = Vec::new();
        let mut fat: Vec<u32> = Vec::new();
        let mut mini_data: Vec<u8> = Vec::new();
        let mut minifat: Vec<u32> = Vec::new();
        let mut stream_starts = Vec::new();

        for (_, data) in &self.streams {
            let start = if data.len() >= CUTOFF {
                alloc_chain(&mut sectors, &mut fat, data, sector_size, 0x00)
            } else {
                alloc_mini_chain(&mut mini_data, &mut minifat, data)
            };
            stream_starts.push(start);
        }

        let root_start = alloc_chain(&mut sectors, &mut fat, &mini_data, sector_size, 0x00);

        let minifat_bytes: Vec<u8> = minifat.iter().flat_map(|v| v.to_le_bytes()).collect();
        let minifat_start = alloc_chain(&mut sectors, &mut fat, &minifat_bytes, sector_size, 0xFF);
        let minifat_count = minifat_bytes.len().div_ceil(sector_size) as u32;

        // root first, then streams as a right-leaning sibling list
        let count = self.streams.len() as u32;
        let mut dir = encode_dir_entry(
            &self.root_name,
            STGTY_ROOT,
            NOSTREAM,
            NOSTREAM,
            if count > 0 { 1 } else { NOSTREAM },
            root_start,
            mini_data.len() as u64,
        );
        for (i, (name, data)) in self.streams.iter().enumerate() {
            let sid = i as u32 + 1;
            let right = if sid < count { sid + 1 } else { NOSTREAM };
            dir.extend(encode_dir_entry(
                name,
                STGTY_STREAM,
                NOSTREAM,
                right,
                NOSTREAM,
                stream_starts[i],
                data.len() as u64,
            ));
        }
        while dir.len() % sector_size != 0 {
            dir.extend(encode_dir_entry("", STGTY_EMPTY, NOSTREAM, NOSTREAM, NOSTREAM, 0, 0));
        }
        let dir_count = (dir.len() / sector_size) as u32;
        let dir_start = alloc_chain(&mut sectors, &mut fat, &dir, sector_size, 0x00);

        // FAT sectors also describe themselves
        let data_sectors = sectors.len();
        let per_fat = sector_size / 4;
        let mut fat_count = 1;
        while data_sectors + fat_count > per_fat * fat_count {
            fat_count += 1;
        }
        assert!(fat_count <= HEADER_DIFAT_ENTRIES, "fixture too large for header DIFAT");

        let fat_sectors: Vec<u32> = (0..fat_count).map(|i| (data_sectors + i) as u32).collect();
        fat.extend(std::iter::repeat_n(FATSECT, fat_count));
        fat.resize(per_fat * fat_count, FREESECT);
        for chunk in fat.chunks(per_fat) {
            sectors.push(chunk.iter().flat_map(|v| v.to_le_bytes()).collect());
        }

        let mut bytes = self.header(&fat_sectors, dir_start, dir_count, minifat_start, minifat_count);
        for sector in &sectors {
            bytes.extend_from_slice(sector);
        }

        Layout {
            bytes,
            fat_sectors,
            dir_start,
            stream_starts,
        }
    }

    /// The header block; version 4 pads it to a full 4096-byte sector.
    fn header(
        &self,
        fat_sectors: &[u32],
        dir_start: u32,
        dir_count: u32,
        minifat_start: u32,
        minifat_count: u32,
    ) -> Vec<u8> {
        let mut h = vec![0u8; self.sector_size()];
        h[..8].copy_from_slice(MAGIC);
        h[0x18..0x1A].copy_from_slice(&0x003Eu16.to_le_bytes());
        h[0x1A..0x1C].copy_from_slice(&self.version.to_le_bytes());
        h[0x1C..0x1E].copy_from_slice(&[0xFE, 0xFF]);
        h[0x1E..0x20].copy_from_slice(&self.sector_shift().to_le_bytes());
        h[0x20..0x22].copy_from_slice(&6u16.to_le_bytes());
        if self.version == 4 {
            h[0x28..0x2C].copy_from_slice(&dir_count.to_le_bytes());
        }
        h[0x2C..0x30].copy_from_slice(&(fat_sectors.len() as u32).to_le_bytes());
        h[0x30..0x34].copy_from_slice(&dir_start.to_le_bytes());
        h[0x38..0x3C].copy_from_slice(&(CUTOFF as u32).to_le_bytes());
        h[0x3C..0x40].copy_from_slice(&minifat_start.to_le_bytes());
        h[0x40..0x44].copy_from_slice(&minifat_count.to_le_bytes());
        h[0x44..0x48].copy_from_slice(&ENDOFCHAIN.to_le_bytes());
        h[0x48..0x4C].copy_from_slice(&0u32.to_le_bytes());
        for i in 0..HEADER_DIFAT_ENTRIES {
            let value = fat_sectors.get(i).copied().unwrap_or(FREESECT);
            let offset = 0x4C + i * 4;
            h[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
        }
        h
    }
}

/// Append `data` as a chain of regular sectors; returns the start sector.
fn alloc_chain(
    sectors: &mut Vec<Vec<u8>>,
    fat: &mut Vec<u32>,
    data: &[u8],
    sector_size: usize,
    pad: u8,
) -> u32 {
    if data.is_empty() {
        return ENDOFCHAIN;
    }
    let start = sectors.len() as u32;
    let count = data.len().div_ceil(sector_size);
    for (i, chunk) in data.chunks(sector_size).enumerate() {
        let mut sector = chunk.to_vec();
        sector.resize(sector_size, pad);
        sectors.push(sector);
        fat.push(if i + 1 < count {
            start + i as u32 + 1
        } else {
            ENDOFCHAIN
        });
    }
    start
}

fn alloc_mini_chain(mini_data: &mut Vec<u8>, minifat: &mut Vec<u32>, data: &[u8]) -> u32 {
    if data.is_empty() {
        return ENDOFCHAIN;
    }
    let start = minifat.len() as u32;
    let count = data.len().div_ceil(MINI_SECTOR);
    for (i, chunk) in data.chunks(MINI_SECTOR).enumerate() {
        mini_data.extend_from_slice(chunk);
        mini_data.resize(mini_data.len() + MINI_SECTOR - chunk.len(), 0);
        minifat.push(if i + 1 < count {
            start + i as u32 + 1
        } else {
            ENDOFCHAIN
        });
    }
    start
}

/// Encode one 128-byte little-endian directory entry.
pub(crate) fn encode_dir_entry(
    name: &str,
    entry_type: u8,
    left: u32,
    right: u32,
    child: u32,
    start: u32,
    size: u64,
) -> Vec<u8> {
    let mut e = vec![0u8; DIRENTRY_SIZE];
    let units: Vec<u16> = name.encode_utf16().take(31).collect();
    for (i, unit) in units.iter().enumerate() {
        e[i * 2..i * 2 + 2].copy_from_slice(&unit.to_le_bytes());
    }
    let name_len = if units.is_empty() {
        0
    } else {
        (units.len() as u16 + 1) * 2
    };
    e[0x40..0x42].copy_from_slice(&name_len.to_le_bytes());
    e[0x42] = entry_type;
    e[0x43] = 1;
    e[0x44..0x48].copy_from_slice(&left.to_le_bytes());
    e[0x48..0x4C].copy_from_slice(&right.to_le_bytes());
    e[0x4C..0x50].copy_from_slice(&child.to_le_bytes());
    e[0x74..0x78].copy_from_slice(&start.to_le_bytes());
    e[0x78..0x80].copy_from_slice(&size.to_le_bytes());
    e
}

/// One run of document text and how it is stored.
#[derive(Debug, Clone)]
pub(crate) enum Fragment {
    /// 8-bit text; only Latin-1 characters survive the byte conversion
    Ansi(String),
    /// UTF-16LE text
    Unicode(String),
}

/// Builds the `WordDocument` and table streams of a minimal Word file.
///
/// Text starts at offset 0x800 of `WordDocument`. The table stream holds 16
/// junk bytes and then the CLX: an optional prefix, the `0x02` marker, the
/// PlcPcd length and the PlcPcd itself.
#[derive(Debug, Clone, Default)]
pub(crate) struct WordFixture {
    fragments: Vec<Fragment>,
    one_table: bool,
    clx_prefix: Vec<u8>,
    subdocument_chars: u32,
    padding: usize,
    flags: u16,
    version: Option<u16>,
}

pub(crate) const WORD_TEXT_START: usize = 0x800;

impl WordFixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ansi(mut self, text: &str) -> Self {
        self.fragments.push(Fragment::Ansi(text.to_string()));
        self
    }

    pub fn unicode(mut self, text: &str) -> Self {
        self.fragments.push(Fragment::Unicode(text.to_string()));
        self
    }

    /// Store the table as `1Table` and set the FIB selector bit.
    pub fn one_table(mut self) -> Self {
        self.one_table = true;
        self
    }

    /// Extra FIB flag bits.
    pub fn flags(mut self, flags: u16) -> Self {
        self.flags |= flags;
        self
    }

    /// Bytes placed in the CLX before the piece table marker.
    pub fn clx_prefix(mut self, prefix: &[u8]) -> Self {
        self.clx_prefix = prefix.to_vec();
        self
    }

    /// Count the last `chars` characters of the text as a footnote
    /// sub-document instead of main text.
    pub fn subdocument_chars(mut self, chars: u32) -> Self {
        self.subdocument_chars = chars;
        self
    }

    /// Zero bytes appended after the text, to push the stream over the
    /// mini stream cutoff.
    pub fn padding(mut self, len: usize) -> Self {
        self.padding = len;
        self
    }

    /// Container format version, 3 unless set.
    pub fn version(mut self, version: u16) -> Self {
        self.version = Some(version);
        self
    }

    pub fn table_name(&self) -> &'static str {
        if self.one_table { "1Table" } else { "0Table" }
    }

    /// Returns (WordDocument, table stream).
    pub fn streams(&self) -> (Vec<u8>, Vec<u8>) {
        let mut word = vec![0u8; WORD_TEXT_START];
        word[0..2].copy_from_slice(&0xA5ECu16.to_le_bytes());
        word[2..4].copy_from_slice(&0x00C1u16.to_le_bytes());

        let mut cps = vec![0u32];
        let mut fcs = Vec::new();
        for fragment in &self.fragments {
            let offset = word.len() as u32;
            let chars = match fragment {
                Fragment::Ansi(text) => {
                    word.extend(text.chars().map(|c| c as u8));
                    fcs.push((offset * 2) | 0x4000_0000);
                    text.chars().count() as u32
                },
                Fragment::Unicode(text) => {
                    word.extend(text.encode_utf16().flat_map(|u| u.to_le_bytes()));
                    fcs.push(offset);
                    text.encode_utf16().count() as u32
                },
            };
            cps.push(cps[cps.len() - 1] + chars);
        }
        word.resize(word.len() + self.padding, 0);

        let total = cps[cps.len() - 1];
        let mut flags = self.flags;
        if self.one_table {
            flags |= 0x0200;
        }
        word[0x0A..0x0C].copy_from_slice(&flags.to_le_bytes());
        let ccp_text = if self.subdocument_chars > 0 {
            word[0x50..0x54].copy_from_slice(&self.subdocument_chars.to_le_bytes());
            total - self.subdocument_chars - 1
        } else {
            total
        };
        word[0x4C..0x50].copy_from_slice(&ccp_text.to_le_bytes());

        let mut plc: Vec<u8> = cps.iter().flat_map(|cp| cp.to_le_bytes()).collect();
        for fc in &fcs {
            plc.extend_from_slice(&[0x00, 0x00]);
            plc.extend_from_slice(&fc.to_le_bytes());
            plc.extend_from_slice(&[0x00, 0x00]);
        }
        let mut clx = self.clx_prefix.clone();
        clx.push(0x02);
        clx.extend_from_slice(&(plc.len() as u32).to_le_bytes());
        clx.extend_from_slice(&plc);

        let mut table = vec![0xCCu8; 16];
        table.extend_from_slice(&clx);
        word[0x1A2..0x1A6].copy_from_slice(&16u32.to_le_bytes());
        word[0x1A6..0x1AA].copy_from_slice(&(clx.len() as u32).to_le_bytes());

        (word, table)
    }

    /// A complete compound file holding both streams.
    pub fn build(&self) -> Vec<u8> {
        let (word, table) = self.streams();
        CfbBuilder::new()
            .version(self.version.unwrap_or(3))
            .stream("WordDocument", &word)
            .stream(self.table_name(), &table)
            .build()
    }
}
