//! Bytestream reading/writing functionality.
pub use std::io::SeekFrom;
use std::io::prelude::*;

/// A list specifying general bytestream reading and writing errors.
#[derive(Debug,Clone,Copy,PartialEq)]
pub enum ByteIOError {
    /// End of stream.
    EOF,
    /// Wrong seek position was provided.
    WrongRange,
    /// Tried to call read() on bytestream writer or write() on bytestream reader.
    WrongIOMode,
    /// Functionality is not implemented.
    NotImplemented,
    /// Read error.
    ReadError,
    /// Write error.
    WriteError,
    /// Seeking failed.
    SeekError,
}

/// A specialised `Result` type for bytestream operations.
pub type ByteIOResult<T> = Result<T, ByteIOError>;

/// Common trait for bytestream operations.
pub trait ByteIO {
    /// Reads data into provided buffer. Fails if it cannot fill whole buffer.
    fn read_buf(&mut self, buf: &mut [u8]) -> ByteIOResult<usize>;
    /// Reads data into provided buffer. Partial read is treated as success.
    fn read_buf_some(&mut self, buf: &mut [u8]) -> ByteIOResult<usize>;
    /// Reads single byte from the stream.
    fn read_byte(&mut self) -> ByteIOResult<u8>;
    /// Writes buffer to the stream.
    fn write_buf(&mut self, buf: &[u8]) -> ByteIOResult<()>;
    /// Returns current read or write position.
    fn tell(&mut self) -> u64;
    /// Seeks to the provided position.
    fn seek(&mut self, pos: SeekFrom) -> ByteIOResult<u64>;
    /// Tells whether this is end of stream.
    fn is_eof(&self) -> bool;
    /// Reports whether stream is seekable or not.
    fn is_seekable(&mut self) -> bool;
    /// Returns stream size or -1 if it is not known.
    fn size(&mut self) -> i64;
    /// Flushes output if possible.
    fn flush(&mut self) -> ByteIOResult<()>;
}

/// High-level bytestream reader.
///
/// User is supposed to create some reader implementing [`ByteIO`] trait e.g. [`MemoryReader`] and use it to create `ByteReader` which can be used for reading e.g. various integer types.
///
/// # Examples
///
/// ````
/// use cinebmp_core::io::byteio::{MemoryReader,ByteReader};
/// # use cinebmp_core::io::byteio::ByteIOResult;
///
/// # fn foo() -> ByteIOResult<()> {
/// let memory: [u8; 4] = [ 0, 42, 42, 0 ];
/// let mut mr = MemoryReader::new_read(&memory);
/// let mut br = ByteReader::new(&mut mr);
/// let val = br.read_u16be()?; // read 16-bit big-endian integer, should be 42
/// let val = br.read_u16le()?; // read 16-bit little-endian integer, should be 42 as well
/// # Ok(())
/// # }
/// ````
///
/// [`ByteIO`]: ./trait.ByteIO.html
/// [`MemoryReader`]: ./struct.MemoryReader.html
pub struct ByteReader<'a> {
    io: &'a mut dyn ByteIO,
}

/// Bytestream reader from memory.
pub struct MemoryReader<'a> {
    buf:      &'a [u8],
    pos:      usize,
}

/// Bytestream reader from anything implementing `std::io::Read` and `std::io::Seek`.
pub struct FileReader<T: Read+Seek> {
    file:     Box<T>,
    eof:      bool,
}

macro_rules! read_int {
    ($s: ident, $inttype: ty, $size: expr, $which: ident) => ({
        let mut buf = [0u8; $size];
        $s.io.read_buf(&mut buf)?;
        Ok(<$inttype>::$which(buf))
    })
}

impl<'a> ByteReader<'a> {
    /// Constructs a new instance of bytestream reader.
    pub fn new(io: &'a mut dyn ByteIO) -> Self { ByteReader { io } }

    /// Reads data into provided buffer. Fails if the buffer cannot be filled completely.
    pub fn read_buf(&mut self, buf: &mut [u8])  -> ByteIOResult<usize> {
        self.io.read_buf(buf)
    }

    /// Reads data into provided buffer. Partial read is treated as success.
    pub fn read_buf_some(&mut self, buf: &mut [u8])  -> ByteIOResult<usize> {
        self.io.read_buf_some(buf)
    }

    /// Reads single byte from the stream.
    pub fn read_byte(&mut self) -> ByteIOResult<u8> {
        self.io.read_byte()
    }

    /// Reads four-byte array from the stream.
    pub fn read_tag(&mut self)  -> ByteIOResult<[u8; 4]> {
        let mut buf = [0u8; 4];
        self.io.read_buf(&mut buf)?;
        Ok(buf)
    }

    /// Reads 16-bit big-endian integer from the stream.
    pub fn read_u16be(&mut self) -> ByteIOResult<u16> {
        read_int!(self, u16, 2, from_be_bytes)
    }

    /// Reads 24-bit big-endian integer from the stream.
    pub fn read_u24be(&mut self) -> ByteIOResult<u32> {
        let p8 = self.read_byte()?;
        let p16 = self.read_u16be()?;
        Ok((u32::from(p8) << 16) | u32::from(p16))
    }

    /// Reads 32-bit big-endian integer from the stream.
    pub fn read_u32be(&mut self) -> ByteIOResult<u32> {
        read_int!(self, u32, 4, from_be_bytes)
    }

    /// Reads 16-bit little-endian integer from the stream.
    pub fn read_u16le(&mut self) -> ByteIOResult<u16> {
        read_int!(self, u16, 2, from_le_bytes)
    }

    /// Reads 32-bit little-endian integer from the stream.
    pub fn read_u32le(&mut self) -> ByteIOResult<u32> {
        read_int!(self, u32, 4, from_le_bytes)
    }

    /// Skips requested number of bytes.
    pub fn read_skip(&mut self, len: usize) -> ByteIOResult<()> {
        if self.io.is_seekable() {
            self.io.seek(SeekFrom::Current(len as i64))?;
        } else {
            let mut ssize = len;
            let mut buf : [u8; 16] = [0; 16];
            while ssize > buf.len() {
                self.io.read_buf(&mut buf)?;
                ssize -= buf.len();
            }
            while ssize > 0 {
                self.io.read_byte()?;
                ssize -= 1;
            }
        }
        Ok(())
    }

    /// Returns current read position.
    pub fn tell(&mut self) -> u64 {
        self.io.tell()
    }

    /// Seeks to the provided position.
    pub fn seek(&mut self, pos: SeekFrom) -> ByteIOResult<u64> {
        self.io.seek(pos)
    }

    /// Tells whether this is end of stream.
    pub fn is_eof(&self) -> bool {
        self.io.is_eof()
    }

    /// Reports number of bytes left in the stream (or -1 if the stream size is unknown).
    pub fn left(&mut self) -> i64 {
        let size = self.io.size();
        if size == -1 { return -1; }
        size - (self.io.tell() as i64)
    }
}

impl<'a> MemoryReader<'a> {
    /// Constructs a new instance of `MemoryReader`.
    pub fn new_read(buf: &'a [u8]) -> Self {
        MemoryReader { buf, pos: 0 }
    }

    fn peek_buf(&self, buf: &mut [u8]) -> ByteIOResult<usize> {
        let copy_size = (self.buf.len() - self.pos).min(buf.len());
        if copy_size == 0 && !buf.is_empty() { return Err(ByteIOError::EOF); }
        buf[..copy_size].copy_from_slice(&self.buf[self.pos..][..copy_size]);
        Ok(copy_size)
    }

    fn real_seek(&mut self, pos: i64) -> ByteIOResult<u64> {
        if pos < 0 || (pos as usize) > self.buf.len() {
            return Err(ByteIOError::WrongRange);
        }
        self.pos = pos as usize;
        Ok(pos as u64)
    }
}

impl<'a> ByteIO for MemoryReader<'a> {
    fn read_byte(&mut self) -> ByteIOResult<u8> {
        if self.is_eof() { return Err(ByteIOError::EOF); }
        let res = self.buf[self.pos];
        self.pos += 1;
        Ok(res)
    }

    fn read_buf(&mut self, buf: &mut [u8]) -> ByteIOResult<usize> {
        let read_size = self.peek_buf(buf)?;
        if read_size < buf.len() { return Err(ByteIOError::EOF); }
        self.pos += read_size;
        Ok(read_size)
    }

    fn read_buf_some(&mut self, buf: &mut [u8]) -> ByteIOResult<usize> {
        let read_size = self.peek_buf(buf)?;
        self.pos += read_size;
        Ok(read_size)
    }

    fn write_buf(&mut self, _buf: &[u8]) -> ByteIOResult<()> {
        Err(ByteIOError::WrongIOMode)
    }

    fn tell(&mut self) -> u64 {
        self.pos as u64
    }

    fn seek(&mut self, pos: SeekFrom) -> ByteIOResult<u64> {
        let cur_pos  = self.pos       as i64;
        let cur_size = self.buf.len() as i64;
        match pos {
            SeekFrom::Start(x)   => self.real_seek(x as i64),
            SeekFrom::Current(x) => self.real_seek(cur_pos + x),
            SeekFrom::End(x)     => self.real_seek(cur_size + x),
        }
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.buf.len()
    }

    fn is_seekable(&mut self) -> bool {
        true
    }

    fn size(&mut self) -> i64 {
        self.buf.len() as i64
    }

    fn flush(&mut self) -> ByteIOResult<()> { Ok(()) }
}

impl<T: Read+Seek> FileReader<T> {
    /// Constructs a new instance of `FileReader`.
    pub fn new_read(file: T) -> Self {
        FileReader { file: Box::new(file), eof : false }
    }
    /// Destroys the reader and releases the reader resource for a further use.
    pub fn finish(self) -> Box<T> { self.file }
}

impl<T: Read+Seek> ByteIO for FileReader<T> {
    fn read_byte(&mut self) -> ByteIOResult<u8> {
        let mut byte : [u8; 1] = [0];
        match self.file.read(&mut byte) {
            Ok(0) => {
                self.eof = true;
                Err(ByteIOError::EOF)
            },
            Ok(_) => Ok(byte[0]),
            Err(_) => Err(ByteIOError::ReadError),
        }
    }

    fn read_buf(&mut self, buf: &mut [u8]) -> ByteIOResult<usize> {
        match self.file.read_exact(buf) {
            Ok(())  => Ok(buf.len()),
            Err(err) => {
                if err.kind() == std::io::ErrorKind::UnexpectedEof {
                    self.eof = true;
                    Err(ByteIOError::EOF)
                } else {
                    Err(ByteIOError::ReadError)
                }
            },
        }
    }

    fn read_buf_some(&mut self, buf: &mut [u8]) -> ByteIOResult<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.file.read(&mut buf[filled..]) {
                Ok(0) => {
                    self.eof = true;
                    break;
                },
                Ok(sz) => filled += sz,
                Err(ref err) if err.kind() == std::io::ErrorKind::Interrupted => {},
                Err(_) => return Err(ByteIOError::ReadError),
            }
        }
        if filled == 0 && !buf.is_empty() {
            return Err(ByteIOError::EOF);
        }
        Ok(filled)
    }

    fn write_buf(&mut self, _buf: &[u8]) -> ByteIOResult<()> {
        Err(ByteIOError::WrongIOMode)
    }

    fn tell(&mut self) -> u64 {
        self.file.stream_position().unwrap_or(0)
    }

    fn seek(&mut self, pos: SeekFrom) -> ByteIOResult<u64> {
        match self.file.seek(pos) {
            Ok(r) => {
                self.eof = false;
                Ok(r)
            },
            Err(_) => Err(ByteIOError::SeekError),
        }
    }

    fn is_eof(&self) -> bool {
        self.eof
    }

    fn is_seekable(&mut self) -> bool {
        true
    }

    fn size(&mut self) -> i64 {
        -1
    }

    fn flush(&mut self) -> ByteIOResult<()> { Ok(()) }
}

/// High-level bytestream writer.
///
/// User is supposed to create some writer implementing [`ByteIO`] trait e.g. [`MemoryWriter`] and use it to create `ByteWriter` which can be used for writing e.g. various integer types.
///
/// # Examples
///
/// ````
/// use cinebmp_core::io::byteio::{MemoryWriter,ByteWriter};
/// # use cinebmp_core::io::byteio::ByteIOResult;
///
/// # fn foo() -> ByteIOResult<()> {
/// let mut memory = [0u8; 4];
/// let mut mw = MemoryWriter::new_write(&mut memory);
/// let mut bw = ByteWriter::new(&mut mw);
/// let val = bw.write_u16be(42)?; // memory should be [ 0, 42, 0, 0 ]
/// let val = bw.write_u16le(42)?; // memory should be [ 0, 42, 42, 0 ]
/// # Ok(())
/// # }
/// ````
///
/// [`ByteIO`]: ./trait.ByteIO.html
/// [`MemoryWriter`]: ./struct.MemoryWriter.html
pub struct ByteWriter<'a> {
    io: &'a mut dyn ByteIO,
}

/// Bytestream writer to memory.
pub struct MemoryWriter<'a> {
    buf:      &'a mut [u8],
    pos:      usize,
}

/// Bytestream writer to anything implementing `std::io::Write` and `std::io::Seek`.
pub struct FileWriter<T: Write+Seek> {
    file:     Box<T>,
}

/// Bytestream writer to memory.
///
/// Unlike [`MemoryWriter`] which writes to an array of fixed size, `GrowableMemoryWriter` grows output size when output size exceeds capacity.
///
/// [`MemoryWriter`]: ./struct.MemoryWriter.html
pub struct GrowableMemoryWriter<'a> {
    buf:    &'a mut Vec<u8>,
    pos:    usize,
}

impl<'a> ByteWriter<'a> {
    /// Constructs a new instance of `ByteWriter`.
    pub fn new(io: &'a mut dyn ByteIO) -> Self { ByteWriter { io } }

    /// Writes byte array to the output.
    pub fn write_buf(&mut self, buf: &[u8])  -> ByteIOResult<()> {
        self.io.write_buf(buf)
    }

    /// Writes single byte to the output.
    pub fn write_byte(&mut self, val: u8) -> ByteIOResult<()> {
        self.io.write_buf(&[val])
    }

    /// Writes 16-bit big-endian integer to the output.
    pub fn write_u16be(&mut self, val: u16) -> ByteIOResult<()> {
        self.io.write_buf(&val.to_be_bytes())
    }

    /// Writes 16-bit little-endian integer to the output.
    pub fn write_u16le(&mut self, val: u16) -> ByteIOResult<()> {
        self.io.write_buf(&val.to_le_bytes())
    }

    /// Writes 24-bit big-endian integer to the output.
    pub fn write_u24be(&mut self, val: u32) -> ByteIOResult<()> {
        self.io.write_buf(&val.to_be_bytes()[1..])
    }

    /// Writes 32-bit big-endian integer to the output.
    pub fn write_u32be(&mut self, val: u32) -> ByteIOResult<()> {
        self.io.write_buf(&val.to_be_bytes())
    }

    /// Writes 32-bit little-endian integer to the output.
    pub fn write_u32le(&mut self, val: u32) -> ByteIOResult<()> {
        self.io.write_buf(&val.to_le_bytes())
    }

    /// Reports the current write position.
    pub fn tell(&mut self) -> u64 {
        self.io.tell()
    }

    /// Seeks to the requested position.
    pub fn seek(&mut self, pos: SeekFrom) -> ByteIOResult<u64> {
        self.io.seek(pos)
    }

    /// Flushes output stream if possible.
    pub fn flush(&mut self) -> ByteIOResult<()> {
        self.io.flush()
    }
}

fn seek_in_buffer(pos: SeekFrom, cur_pos: usize, len: usize) -> ByteIOResult<usize> {
    let newpos = match pos {
            SeekFrom::Start(x)   => x as i64,
            SeekFrom::Current(x) => cur_pos as i64 + x,
            SeekFrom::End(x)     => len as i64 + x,
        };
    if newpos < 0 || (newpos as usize) > len {
        return Err(ByteIOError::WrongRange);
    }
    Ok(newpos as usize)
}

impl<'a> MemoryWriter<'a> {
    /// Constructs a new instance of `MemoryWriter`.
    pub fn new_write(buf: &'a mut [u8]) -> Self {
        MemoryWriter { buf, pos: 0 }
    }
}

impl<'a> ByteIO for MemoryWriter<'a> {
    fn read_byte(&mut self) -> ByteIOResult<u8> {
        Err(ByteIOError::WrongIOMode)
    }

    fn read_buf(&mut self, _buf: &mut [u8]) -> ByteIOResult<usize> {
        Err(ByteIOError::WrongIOMode)
    }

    fn read_buf_some(&mut self, _buf: &mut [u8]) -> ByteIOResult<usize> {
        Err(ByteIOError::WrongIOMode)
    }

    fn write_buf(&mut self, buf: &[u8]) -> ByteIOResult<()> {
        if self.pos + buf.len() > self.buf.len() { return Err(ByteIOError::WriteError); }
        self.buf[self.pos..][..buf.len()].copy_from_slice(buf);
        self.pos += buf.len();
        Ok(())
    }

    fn tell(&mut self) -> u64 {
        self.pos as u64
    }

    fn seek(&mut self, pos: SeekFrom) -> ByteIOResult<u64> {
        self.pos = seek_in_buffer(pos, self.pos, self.buf.len())?;
        Ok(self.pos as u64)
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.buf.len()
    }

    fn is_seekable(&mut self) -> bool {
        true
    }

    fn size(&mut self) -> i64 {
        self.buf.len() as i64
    }

    fn flush(&mut self) -> ByteIOResult<()> { Ok(()) }
}

impl<'a> GrowableMemoryWriter<'a> {
    /// Constructs a new instance of `GrowableMemoryWriter`.
    pub fn new_write(buf: &'a mut Vec<u8>) -> Self {
        GrowableMemoryWriter { buf, pos: 0 }
    }
}

impl<'a> ByteIO for GrowableMemoryWriter<'a> {
    fn read_byte(&mut self) -> ByteIOResult<u8> {
        Err(ByteIOError::WrongIOMode)
    }

    fn read_buf(&mut self, _buf: &mut [u8]) -> ByteIOResult<usize> {
        Err(ByteIOError::WrongIOMode)
    }

    fn read_buf_some(&mut self, _buf: &mut [u8]) -> ByteIOResult<usize> {
        Err(ByteIOError::WrongIOMode)
    }

    fn write_buf(&mut self, buf: &[u8]) -> ByteIOResult<()> {
        if self.pos + buf.len() > self.buf.len() {
            self.buf.resize(self.pos + buf.len(), 0);
        }
        self.buf[self.pos..][..buf.len()].copy_from_slice(buf);
        self.pos += buf.len();
        Ok(())
    }

    fn tell(&mut self) -> u64 {
        self.pos as u64
    }

    fn seek(&mut self, pos: SeekFrom) -> ByteIOResult<u64> {
        self.pos = seek_in_buffer(pos, self.pos, self.buf.len())?;
        Ok(self.pos as u64)
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.buf.len()
    }

    fn is_seekable(&mut self) -> bool {
        true
    }

    fn size(&mut self) -> i64 {
        self.buf.len() as i64
    }

    fn flush(&mut self) -> ByteIOResult<()> { Ok(()) }
}

impl<T: Write+Seek> FileWriter<T> {
    /// Constructs a new instance of `FileWriter`.
    pub fn new_write(file: T) -> Self {
        FileWriter { file: Box::new(file) }
    }
    /// Destroys the writer and releases the output resource for a further use.
    pub fn finish(self) -> Box<T> { self.file }
}

impl<T: Write+Seek> ByteIO for FileWriter<T> {
    fn read_byte(&mut self) -> ByteIOResult<u8> {
        Err(ByteIOError::WrongIOMode)
    }

    fn read_buf(&mut self, _buf: &mut [u8]) -> ByteIOResult<usize> {
        Err(ByteIOError::WrongIOMode)
    }

    fn read_buf_some(&mut self, _buf: &mut [u8]) -> ByteIOResult<usize> {
        Err(ByteIOError::WrongIOMode)
    }

    fn write_buf(&mut self, buf: &[u8]) -> ByteIOResult<()> {
        match self.file.write_all(buf) {
            Ok(()) => Ok(()),
            Err(_) => Err(ByteIOError::WriteError),
        }
    }

    fn tell(&mut self) -> u64 {
        self.file.stream_position().unwrap_or(0)
    }

    fn seek(&mut self, pos: SeekFrom) -> ByteIOResult<u64> {
        match self.file.seek(pos) {
            Ok(r) => Ok(r),
            Err(_) => Err(ByteIOError::SeekError),
        }
    }

    fn is_eof(&self) -> bool {
        false
    }

    fn is_seekable(&mut self) -> bool {
        true
    }

    fn size(&mut self) -> i64 {
        -1
    }

    fn flush(&mut self) -> ByteIOResult<()> {
        match self.file.flush() {
            Ok(()) => Ok(()),
            Err(_) => Err(ByteIOError::WriteError),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read() {
        let buf: [u8; 16] = [1; 16];
        let mut mr = MemoryReader::new_read(&buf);
        let mut reader = ByteReader::new(&mut mr);
        assert_eq!(reader.read_byte().unwrap(),  0x01u8);
        assert_eq!(reader.read_u16le().unwrap(), 0x0101u16);
        assert_eq!(reader.read_u24be().unwrap(), 0x010101u32);
        assert_eq!(reader.read_u32le().unwrap(), 0x01010101u32);
        assert_eq!(reader.left(), 6);
        reader.read_skip(4).unwrap();
        assert_eq!(reader.read_u16be().unwrap(), 0x0101u16);
        assert!(reader.is_eof());
        assert_eq!(reader.read_byte(), Err(ByteIOError::EOF));

        let data = [0x30u8, 0x26, 0xB2, 0x75, 0x11, 0xA6, 0xD9, 0x00, 0x42];
        let mut fr = FileReader::new_read(Cursor::new(&data[..]));
        let mut br2 = ByteReader::new(&mut fr);
        assert_eq!(br2.read_byte().unwrap(), 0x30);
        assert_eq!(br2.read_u24be().unwrap(), 0x26B275);
        assert_eq!(br2.read_u32be().unwrap(), 0x11A6D900);
        assert_eq!(br2.tell(), 8);
        let mut tail = [0u8; 4];
        assert_eq!(br2.read_buf_some(&mut tail).unwrap(), 1);
        assert_eq!(tail[0], 0x42);
        assert!(br2.is_eof());
    }
    #[test]
    fn test_short_read() {
        let buf = [0xAAu8, 0xBB, 0xCC];
        let mut mr = MemoryReader::new_read(&buf);
        let mut br = ByteReader::new(&mut mr);
        assert_eq!(br.read_u32be(), Err(ByteIOError::EOF));
        // failed reads must not advance the position
        assert_eq!(br.tell(), 0);
        let mut dst = [0u8; 8];
        assert_eq!(br.read_buf_some(&mut dst).unwrap(), 3);
        assert_eq!(&dst[..3], &buf);
        assert_eq!(br.seek(SeekFrom::Start(4)), Err(ByteIOError::WrongRange));
    }
    #[test]
    fn test_write() {
        let mut buf: [u8; 16] = [0; 16];
        {
            let mut mw = MemoryWriter::new_write(&mut buf);
            let mut bw = ByteWriter::new(&mut mw);
            bw.write_byte(0x00).unwrap();
            bw.write_u16be(0x0102).unwrap();
            bw.write_u24be(0x030405).unwrap();
            bw.write_u32be(0x06070809).unwrap();
            bw.write_u16le(0x0B0A).unwrap();
            bw.write_u32le(0x0F0E0D0C).unwrap();
            assert_eq!(bw.write_byte(0x10), Err(ByteIOError::WriteError));
        }
        for i in 0..16 {
            assert_eq!(buf[i], i as u8);
        }
    }
    #[test]
    fn test_growable_write() {
        let mut out = Vec::new();
        {
            let mut gw = GrowableMemoryWriter::new_write(&mut out);
            let mut bw = ByteWriter::new(&mut gw);
            bw.write_buf(b"BM").unwrap();
            bw.write_u32le(0).unwrap();
            bw.seek(SeekFrom::Start(2)).unwrap();
            bw.write_u32le(0x12345678).unwrap();
            assert_eq!(bw.tell(), 6);
        }
        assert_eq!(out, vec![b'B', b'M', 0x78, 0x56, 0x34, 0x12]);
    }
}
