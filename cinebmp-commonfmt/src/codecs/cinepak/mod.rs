//! Cinepak video decoder.
//!
//! The frame is split into horizontal strips, each strip carries its own V1 and V4 codebooks
//! (or inherits them from the previous strip) and a vector stream selecting codebook entries for every 4x4 block.
use cinebmp_core::codecs::*;

pub mod codebook;
pub mod vectors;

use self::codebook::{Codebook, load_codebook};
use self::vectors::decode_vectors;

const STRIP_HEADER_SIZE: usize = 12;
const CHUNK_HEADER_SIZE: usize = 4;

/// Strip parameters and codebooks.
#[derive(Clone,Copy,Debug,Default,PartialEq)]
pub struct Strip {
    /// Strip ID as stored in the stream.
    pub id:     u16,
    /// Strip payload size.
    pub length: usize,
    /// First picture row covered by the strip.
    pub top:    usize,
    /// First picture column covered by the strip.
    pub left:   usize,
    /// Picture row right after the strip.
    pub bottom: usize,
    /// Picture column right after the strip.
    pub right:  usize,
    /// Codebook for blocks coded with a single entry.
    pub v1:     Codebook,
    /// Codebook for blocks coded with an entry per 2x2 quadrant.
    pub v4:     Codebook,
}

/// Cinepak frame decoder producing BGR24 pictures.
pub struct CinepakDecoder {
    flags:      u8,
    length:     u32,
    width:      usize,
    height:     usize,
    nstrips:    usize,
    strips:     Vec<Strip>,
    ras:        Option<NARaster>,
    truncated:  usize,
}

impl CinepakDecoder {
    /// Constructs a new decoder instance.
    pub fn new() -> Self {
        CinepakDecoder {
            flags:      0,
            length:     0,
            width:      0,
            height:     0,
            nstrips:    0,
            strips:     Vec::with_capacity(1),
            ras:        None,
            truncated:  0,
        }
    }
    fn decode_strip(&mut self, src: &[u8], sno: usize) -> DecoderResult<()> {
        let mut mr = MemoryReader::new_read(src);
        let mut br = ByteReader::new(&mut mr);
        while br.left() >= (CHUNK_HEADER_SIZE as i64) {
            let id                      = br.read_byte()?;
            let size                    = (br.read_u24be()? as usize).saturating_sub(CHUNK_HEADER_SIZE);
            let size = size.min(br.left() as usize);
            let start = br.tell() as usize;

            let mut cmr = MemoryReader::new_read(&src[start..][..size]);
            let mut cbr = ByteReader::new(&mut cmr);
            let ret = match id {
                0x20 | 0x21 | 0x24 | 0x25 => load_codebook(&mut cbr, &mut self.strips[sno].v4, id),
                0x22 | 0x23 | 0x26 | 0x27 => load_codebook(&mut cbr, &mut self.strips[sno].v1, id),
                0x30 | 0x31 | 0x32 => {
                    if let Some(ref mut ras) = self.ras {
                        decode_vectors(&mut cbr, &self.strips[sno], id, ras)
                    } else {
                        Err(DecoderError::Bug)
                    }
                },
                _ => {
                    #[cfg(debug_assertions)]
                    println!("unknown chunk type {:02X} in strip {}", id, sno);
                    return Err(DecoderError::InvalidData);
                },
            };
            match ret {
                Ok(()) => {},
                Err(DecoderError::ShortData) => self.truncated += 1,
                Err(err) => return Err(err),
            };
                                          br.read_skip(size)?;
        }
        Ok(())
    }
    /// Decodes a frame from the provided stream.
    ///
    /// The picture is owned by the decoder and is reused for the next frames of the same size,
    /// after a failed decode the partially reconstructed picture is still available via `get_raster()`.
    pub fn decode_image(&mut self, br: &mut ByteReader) -> DecoderResult<&NARaster> {
        self.truncated = 0;

        let flags                       = br.read_byte()?;
        let length                      = br.read_u24be()?;
        let width                       = br.read_u16be()? as usize;
        let height                      = br.read_u16be()? as usize;
        let nstrips                     = br.read_u16be()? as usize;
        validate!(width > 0 && height > 0);

        self.flags   = flags;
        self.length  = length;
        self.width   = width;
        self.height  = height;
        self.nstrips = nstrips;

        let realloc = match self.ras {
                Some(ref ras) => ras.get_dimensions() != (width, height),
                None => true,
            };
        if realloc {
            self.ras = Some(NARaster::new(width, height));
        }

        let mut last_y = 0;
        let mut strip_data = Vec::new();
        for i in 0..nstrips {
            // strip states are kept between frames, new ones are added only once their header is reached
            if self.strips.len() <= i {
                self.strips.push(Strip::default());
            }
            if i > 0 && (flags & 1) == 0 {
                self.strips[i].v1 = self.strips[i - 1].v1;
                self.strips[i].v4 = self.strips[i - 1].v4;
            }
            let id                      = br.read_u16be()?;
            let size                    = (br.read_u16be()? as usize).saturating_sub(STRIP_HEADER_SIZE);
            let _top                    = br.read_u16be()?;
            let _left                   = br.read_u16be()?;
            let strip_h                 = br.read_u16be()? as usize;
            let _right                  = br.read_u16be()?;

            let strip = &mut self.strips[i];
            strip.id     = id;
            strip.length = size;
            strip.top    = last_y;
            strip.left   = 0;
            strip.bottom = last_y + strip_h;
            strip.right  = width;
            last_y = strip.bottom;

            strip_data.resize(size, 0);
            let read_size = if size > 0 {
                    match br.read_buf_some(&mut strip_data) {
                        Ok(len) => len,
                        Err(ByteIOError::EOF) => 0,
                        Err(err) => return Err(err.into()),
                    }
                } else { 0 };
            self.decode_strip(&strip_data[..read_size], i)?;
        }

        self.ras.as_ref().ok_or(DecoderError::Bug)
    }
    /// Returns the current picture if any frame has been decoded.
    pub fn get_raster(&self) -> Option<&NARaster> { self.ras.as_ref() }
    /// Returns the width of the last decoded frame.
    pub fn get_width(&self) -> usize { self.width }
    /// Returns the height of the last decoded frame.
    pub fn get_height(&self) -> usize { self.height }
    /// Returns frame flags of the last decoded frame.
    pub fn get_flags(&self) -> u8 { self.flags }
    /// Returns frame length declared in the last decoded frame header.
    pub fn get_length(&self) -> u32 { self.length }
    /// Returns the number of strips in the last decoded frame.
    pub fn get_num_strips(&self) -> usize { self.nstrips }
    /// Returns the requested strip state.
    pub fn get_strip(&self, idx: usize) -> Option<&Strip> {
        if idx < self.nstrips {
            self.strips.get(idx)
        } else {
            None
        }
    }
    /// Reports how many chunks in the last frame turned out to be truncated.
    pub fn get_truncated_chunks(&self) -> usize { self.truncated }
}

impl Default for CinepakDecoder {
    fn default() -> Self { Self::new() }
}

impl NADecoder for CinepakDecoder {
    fn decode(&mut self, br: &mut ByteReader) -> DecoderResult<&NARaster> {
        self.decode_image(br)
    }
    fn get_raster(&self) -> Option<&NARaster> { self.ras.as_ref() }
    fn get_truncated_chunks(&self) -> usize { self.truncated }
    fn flush(&mut self) {
        self.strips.clear();
        self.nstrips = 0;
        self.ras = None;
    }
}

impl NAOptionHandler for CinepakDecoder {
    fn get_supported_options(&self) -> &[NAOptionDefinition] { &[] }
    fn set_options(&mut self, _options: &[NAOption]) { }
    fn query_option_value(&self, _name: &str) -> Option<NAValue> { None }
}

/// Creates a new Cinepak decoder instance.
pub fn get_decoder() -> Box<dyn NADecoder + Send> {
    Box::new(CinepakDecoder::new())
}
