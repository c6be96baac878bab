//! Muxer definitions.
pub use crate::frame::*;
pub use crate::io::byteio::*;
pub use crate::options::*;

/// A list specifying general muxing errors.
#[derive(Debug,Clone,Copy,PartialEq)]
#[allow(dead_code)]
pub enum MuxerError {
    /// An invalid argument was provided to the muxer.
    InvalidArgument,
    /// Trying to mux data without header being written.
    NotCreated,
    /// Data writing error.
    IOError,
}

/// A specialised `Result` type for muxing operations.
pub type MuxerResult<T> = Result<T, MuxerError>;

impl From<ByteIOError> for MuxerError {
    fn from(_: ByteIOError) -> Self { MuxerError::IOError }
}

/// A trait for containers storing a single uncompressed picture.
pub trait ImageMuxCore {
    /// Writes container headers for a picture of the provided size.
    fn write_header(&mut self, width: usize, height: usize) -> MuxerResult<()>;
    /// Writes picture data.
    fn write_image(&mut self, ras: &NARaster) -> MuxerResult<()>;
    /// Finalises the output (e.g. by updating the size fields in the headers).
    fn finish(&mut self) -> MuxerResult<()>;
}
