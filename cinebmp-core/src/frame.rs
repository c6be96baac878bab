//! Decoded picture definitions.
use std::fmt;

/// Number of bytes per pixel in a packed BGR24 raster.
pub const BGR24_BPP: usize = 3;

/// Video stream information.
#[derive(Clone,Copy,Debug,PartialEq)]
pub struct NAVideoInfo {
    /// Picture width.
    pub width:      usize,
    /// Picture height.
    pub height:     usize,
    /// Picture is stored downside up.
    pub flipped:    bool,
    /// Declared bits per pixel.
    pub bits:       u8,
}

impl NAVideoInfo {
    /// Constructs a new `NAVideoInfo` instance.
    pub fn new(w: usize, h: usize, flip: bool, bits: u8) -> Self {
        NAVideoInfo { width: w, height: h, flipped: flip, bits }
    }
    /// Returns picture width.
    pub fn get_width(&self)  -> usize { self.width }
    /// Returns picture height.
    pub fn get_height(&self) -> usize { self.height }
    /// Returns picture orientation.
    pub fn is_flipped(&self) -> bool { self.flipped }
}

impl fmt::Display for NAVideoInfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Packed BGR24 picture.
///
/// Pixels are stored row by row starting from the top one, each pixel takes three bytes in B, G, R order and rows have no padding.
#[derive(Clone,Debug)]
pub struct NARaster {
    info:   NAVideoInfo,
    stride: usize,
    data:   Vec<u8>,
}

impl NARaster {
    /// Allocates a new black raster for the provided picture parameters.
    pub fn new(width: usize, height: usize) -> Self {
        let stride = width * BGR24_BPP;
        NARaster {
            info:   NAVideoInfo::new(width, height, false, 24),
            stride,
            data:   vec![0; stride * height],
        }
    }
    /// Returns picture information.
    pub fn get_info(&self) -> NAVideoInfo { self.info }
    /// Returns picture width and height.
    pub fn get_dimensions(&self) -> (usize, usize) { (self.info.width, self.info.height) }
    /// Returns the distance between the starts of two consecutive rows in bytes.
    pub fn get_stride(&self) -> usize { self.stride }
    /// Returns a reference to the pixel data.
    pub fn get_data(&self) -> &[u8] { &self.data }
    /// Returns a mutable reference to the pixel data.
    pub fn get_data_mut(&mut self) -> &mut [u8] { &mut self.data }
    /// Returns B, G, R triplet at the provided position.
    pub fn get_pixel(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if x >= self.info.width || y >= self.info.height {
            return None;
        }
        let off = x * BGR24_BPP + y * self.stride;
        Some([self.data[off], self.data[off + 1], self.data[off + 2]])
    }
    /// Fills the whole picture with the provided byte value.
    pub fn fill(&mut self, val: u8) {
        for el in self.data.iter_mut() {
            *el = val;
        }
    }
}
