use cinebmp_core::codecs::*;
use std::ops::{Index, IndexMut};

/// Number of entries in a codebook.
pub const CODEBOOK_SIZE: usize = 256;

/// Single codebook entry describing a 2x2 block.
#[derive(Clone,Copy,Debug,Default,PartialEq)]
pub struct CodebookEntry {
    /// Luma samples in top-left, top-right, bottom-left, bottom-right order.
    pub y:  [u8; 4],
    /// Blue chroma difference with the bias already applied.
    pub u:  u8,
    /// Red chroma difference with the bias already applied.
    pub v:  u8,
}

/// Codebook table addressed by 8-bit index.
#[derive(Clone,Copy,Debug,PartialEq)]
pub struct Codebook {
    entries:    [CodebookEntry; CODEBOOK_SIZE],
}

impl Codebook {
    /// Constructs a new codebook with all entries set to zero.
    pub fn new() -> Self {
        Self { entries: [CodebookEntry::default(); CODEBOOK_SIZE] }
    }
    /// Provides an iterator over codebook entries.
    pub fn iter(&self) -> std::slice::Iter<'_, CodebookEntry> {
        self.entries.iter()
    }
}

impl Default for Codebook {
    fn default() -> Self { Self::new() }
}

impl Index<u8> for Codebook {
    type Output = CodebookEntry;
    fn index(&self, idx: u8) -> &CodebookEntry { &self.entries[usize::from(idx)] }
}

impl IndexMut<u8> for Codebook {
    fn index_mut(&mut self, idx: u8) -> &mut CodebookEntry { &mut self.entries[usize::from(idx)] }
}

/// Reads codebook update from the chunk payload.
///
/// Chunk ID bit 0 signals that only entries flagged in the preceding 32-bit masks are transmitted,
/// bit 2 signals luma-only entries.
/// Running out of data before all 256 entries are processed results in `ShortData` error
/// with all entries read so far kept in the codebook.
pub fn load_codebook(br: &mut ByteReader, cb: &mut Codebook, chunk_id: u8) -> DecoderResult<()> {
    let is_cond = (chunk_id & 1) != 0;
    let is_gray = (chunk_id & 4) != 0;
    let elem_size = if is_gray { 4 } else { 6 };

    let mut flags = 0u32;
    let mut buf = [0u8; 6];
    for i in 0..CODEBOOK_SIZE {
        if is_cond {
            if (i & 31) == 0 {
                flags                   = br.read_u32be()?;
            }
            let upd = ((flags >> (31 - (i & 31))) & 1) != 0;
            if !upd {
                continue;
            }
        }
                                          br.read_buf(&mut buf[..elem_size])?;
        let entry = &mut cb.entries[i];
        entry.y.copy_from_slice(&buf[..4]);
        if is_gray {
            entry.u = 0x80;
            entry.v = 0x80;
        } else {
            entry.u = buf[4].wrapping_add(0x80);
            entry.v = buf[5].wrapping_add(0x80);
        }
    }
    Ok(())
}
