use cinebmp_core::codecs::*;
use super::Strip;
use super::codebook::CodebookEntry;

fn clip8(val: i32) -> u8 {
    val.max(0).min(255) as u8
}

/// Converts YUV triplet into R, G, B values.
///
/// Chroma values are expected to have the 128 bias applied.
pub fn yuv2rgb(y: u8, u: u8, v: u8) -> (u8, u8, u8) {
    let y = i32::from(y);
    let u = i32::from(u) - 128;
    let v = i32::from(v) - 128;
    let r = clip8(y + v * 2);
    let g = clip8(y - u / 2 - v);
    let b = clip8(y + u * 2);
    (r, g, b)
}

/// Source of per-block decision bits stored in 32-bit big-endian words, most significant bit first.
///
/// A disabled reader never consumes input and always reports a clear bit.
pub struct FlagReader {
    flags:      u32,
    mask:       u32,
    enabled:    bool,
}

impl FlagReader {
    /// Constructs a new flag reader.
    pub fn new(enabled: bool) -> Self {
        Self { flags: 0, mask: 0, enabled }
    }
    /// Returns the next flag, refilling the flag word from the stream when needed.
    pub fn read_flag(&mut self, br: &mut ByteReader) -> DecoderResult<bool> {
        if !self.enabled {
            return Ok(false);
        }
        if self.mask == 0 {
            self.flags                  = br.read_u32be()?;
            self.mask = 1 << 31;
        }
        let flag = (self.flags & self.mask) != 0;
        self.mask >>= 1;
        Ok(flag)
    }
}

fn put_pixel(ras: &mut NARaster, x: usize, y: usize, entry: &CodebookEntry, luma: u8) {
    let (w, h) = ras.get_dimensions();
    if x >= w || y >= h {
        return;
    }
    let stride = ras.get_stride();
    let (r, g, b) = yuv2rgb(luma, entry.u, entry.v);
    let dst = &mut ras.get_data_mut()[x * 3 + y * stride..][..3];
    dst[0] = b;
    dst[1] = g;
    dst[2] = r;
}

fn put_block_v1(ras: &mut NARaster, x: usize, y: usize, entry: &CodebookEntry) {
    for (quad, &luma) in entry.y.iter().enumerate() {
        let qx = x + (quad & 1) * 2;
        let qy = y + (quad >> 1) * 2;
        for i in 0..2 {
            for j in 0..2 {
                put_pixel(ras, qx + j, qy + i, entry, luma);
            }
        }
    }
}

fn put_block_v4(ras: &mut NARaster, x: usize, y: usize, entries: [&CodebookEntry; 4]) {
    for (quad, entry) in entries.iter().enumerate() {
        let qx = x + (quad & 1) * 2;
        let qy = y + (quad >> 1) * 2;
        for i in 0..2 {
            for j in 0..2 {
                put_pixel(ras, qx + j, qy + i, entry, entry.y[i * 2 + j]);
            }
        }
    }
}

/// Reconstructs 4x4 blocks of the strip from the vector chunk payload.
///
/// Chunk ID bit 0 signals that each block is preceded by a skip flag and
/// bit 1 signals that all coded blocks use V1 codebook so no V1/V4 selection flags are present.
/// Running out of data stops decoding with `ShortData` error, the block being decoded is not written then.
pub fn decode_vectors(br: &mut ByteReader, strip: &Strip, chunk_id: u8, ras: &mut NARaster) -> DecoderResult<()> {
    let mut skip_flags = FlagReader::new((chunk_id & 1) != 0);
    let v1_only = (chunk_id & 2) != 0;
    let mut sel_flags = FlagReader::new(!v1_only);

    for y in (strip.top..strip.bottom).step_by(4) {
        for x in (strip.left..strip.right).step_by(4) {
            if skip_flags.read_flag(br)? {
                continue;
            }
            let is_v4 = sel_flags.read_flag(br)?;
            if !is_v4 {
                let idx                 = br.read_byte()?;
                put_block_v1(ras, x, y, &strip.v1[idx]);
            } else {
                let mut idx = [0u8; 4];
                                          br.read_buf(&mut idx)?;
                let cb = &strip.v4;
                put_block_v4(ras, x, y, [&cb[idx[0]], &cb[idx[1]], &cb[idx[2]], &cb[idx[3]]]);
            }
        }
    }
    Ok(())
}
