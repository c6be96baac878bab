//! Uncompressed 24-bit Windows bitmap output.
use cinebmp_core::muxers::*;

const FILE_HEADER_SIZE: u32 = 14;
const INFO_HEADER_SIZE: u32 = 40;
const HEADERS_SIZE: u32 = FILE_HEADER_SIZE + INFO_HEADER_SIZE;
const BMP_DPI: u32 = 72;

/// Bitmap writer.
pub struct BMPWriter<'a, 'b> {
    io:         &'a mut ByteWriter<'b>,
    width:      usize,
    height:     usize,
    created:    bool,
    image_size: u32,
}

fn row_padding(width: usize) -> usize {
    let pitch = width * BGR24_BPP;
    (4 - (pitch & 3)) & 3
}

impl<'a, 'b> BMPWriter<'a, 'b> {
    /// Constructs a new `BMPWriter` instance.
    pub fn new(io: &'a mut ByteWriter<'b>) -> Self {
        BMPWriter { io, width: 0, height: 0, created: false, image_size: 0 }
    }
}

impl<'a, 'b> ImageMuxCore for BMPWriter<'a, 'b> {
    /// Writes file and info headers.
    ///
    /// Size fields are left empty and filled in by `finish()`.
    fn write_header(&mut self, width: usize, height: usize) -> MuxerResult<()> {
        if width > (i32::MAX as usize) || height > (i32::MAX as usize) {
            return Err(MuxerError::InvalidArgument);
        }
        self.io.write_buf(b"BM")?;
        self.io.write_u32le(0)?;
        self.io.write_u16le(0)?;
        self.io.write_u16le(0)?;
        self.io.write_u32le(0)?;

        self.io.write_u32le(INFO_HEADER_SIZE)?;
        self.io.write_u32le(width as u32)?;
        self.io.write_u32le(height as u32)?;
        self.io.write_u16le(1)?;
        self.io.write_u16le(24)?;
        self.io.write_u32le(0)?; // BI_RGB
        self.io.write_u32le(0)?;
        self.io.write_u32le(BMP_DPI)?;
        self.io.write_u32le(BMP_DPI)?;
        self.io.write_u32le(0)?;
        self.io.write_u32le(0)?;

        self.width   = width;
        self.height  = height;
        self.created = true;
        Ok(())
    }
    /// Writes picture rows starting from the bottom one, each row is padded to four bytes.
    fn write_image(&mut self, ras: &NARaster) -> MuxerResult<()> {
        if !self.created {
            return Err(MuxerError::NotCreated);
        }
        if ras.get_dimensions() != (self.width, self.height) {
            return Err(MuxerError::InvalidArgument);
        }
        let padding = [0u8; 3];
        let pad_len = row_padding(self.width);
        let row_len = self.width * BGR24_BPP;
        let stride = ras.get_stride();
        for row in ras.get_data().chunks(stride.max(1)).take(self.height).rev() {
            self.io.write_buf(&row[..row_len])?;
            self.io.write_buf(&padding[..pad_len])?;
        }
        self.image_size = ((row_len + pad_len) * self.height) as u32;
        Ok(())
    }
    /// Updates file size, data offset and image size fields in the headers.
    fn finish(&mut self) -> MuxerResult<()> {
        if !self.created {
            return Err(MuxerError::NotCreated);
        }
        let file_size = self.io.tell();
        self.io.seek(SeekFrom::Start(2))?;
        self.io.write_u32le(file_size as u32)?;
        self.io.seek(SeekFrom::Start(10))?;
        self.io.write_u32le(HEADERS_SIZE)?;
        self.io.seek(SeekFrom::Start(34))?;
        self.io.write_u32le(self.image_size)?;
        self.io.seek(SeekFrom::Start(file_size))?;
        self.io.flush()?;
        Ok(())
    }
}

/// Writes the picture as a complete bitmap file.
pub fn write_bmp(bw: &mut ByteWriter, ras: &NARaster) -> MuxerResult<()> {
    let (width, height) = ras.get_dimensions();
    let mut wr = BMPWriter::new(bw);
    wr.write_header(width, height)?;
    wr.write_image(ras)?;
    wr.finish()
}

#[cfg(test)]
mod test {
    use super::*;

    fn read_u32le(src: &[u8], off: usize) -> u32 {
        u32::from_le_bytes([src[off], src[off + 1], src[off + 2], src[off + 3]])
    }

    #[test]
    fn test_bmp_output() {
        let mut ras = NARaster::new(5, 2);
        for (i, el) in ras.get_data_mut().iter_mut().enumerate() {
            *el = if i < 15 { 0x11 } else { 0x22 };
        }
        let mut dst = Vec::new();
        {
            let mut gw = GrowableMemoryWriter::new_write(&mut dst);
            let mut bw = ByteWriter::new(&mut gw);
            write_bmp(&mut bw, &ras).unwrap();
        }
        assert_eq!(dst.len(), 54 + 16 * 2);
        assert_eq!(&dst[..2], b"BM");
        assert_eq!(read_u32le(&dst, 2), 86);
        assert_eq!(read_u32le(&dst, 10), 54);
        assert_eq!(read_u32le(&dst, 14), 40);
        assert_eq!(read_u32le(&dst, 18), 5);
        assert_eq!(read_u32le(&dst, 22), 2);
        assert_eq!(&dst[26..30], &[1, 0, 24, 0]);
        assert_eq!(read_u32le(&dst, 30), 0);
        assert_eq!(read_u32le(&dst, 34), 32);
        assert_eq!(read_u32le(&dst, 38), 72);
        assert_eq!(read_u32le(&dst, 42), 72);
        // bottom row goes first
        assert!(dst[54..][..15].iter().all(|&b| b == 0x22));
        assert_eq!(dst[54 + 15], 0);
        assert!(dst[70..][..15].iter().all(|&b| b == 0x11));
        assert_eq!(dst[70 + 15], 0);
    }

    #[test]
    fn test_bmp_no_padding() {
        let ras = NARaster::new(4, 3);
        let mut dst = Vec::new();
        {
            let mut gw = GrowableMemoryWriter::new_write(&mut dst);
            let mut bw = ByteWriter::new(&mut gw);
            write_bmp(&mut bw, &ras).unwrap();
        }
        assert_eq!(dst.len(), 54 + 12 * 3);
        assert_eq!(read_u32le(&dst, 34), 36);
    }

    #[test]
    fn test_bmp_errors() {
        let ras = NARaster::new(4, 4);
        let mut dst = Vec::new();
        let mut gw = GrowableMemoryWriter::new_write(&mut dst);
        let mut bw = ByteWriter::new(&mut gw);
        let mut wr = BMPWriter::new(&mut bw);
        assert_eq!(wr.write_image(&ras), Err(MuxerError::NotCreated));
        assert_eq!(wr.finish(), Err(MuxerError::NotCreated));
        wr.write_header(8, 4).unwrap();
        assert_eq!(wr.write_image(&ras), Err(MuxerError::InvalidArgument));

        let mut small = [0u8; 60];
        let mut mw = MemoryWriter::new_write(&mut small);
        let mut bw = ByteWriter::new(&mut mw);
        assert_eq!(write_bmp(&mut bw, &ras), Err(MuxerError::IOError));
    }
}
