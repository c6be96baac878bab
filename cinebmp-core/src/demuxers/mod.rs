//! Demuxer definitions.
pub use crate::frame::*;
pub use crate::io::byteio::*;
pub use crate::options::*;

/// A list specifying general demuxing errors.
#[derive(Debug,Clone,Copy,PartialEq)]
#[allow(dead_code)]
pub enum DemuxerError {
    /// Reader got to end of stream.
    EOF,
    /// Demuxer encountered invalid input data.
    InvalidData,
    /// Data reading error.
    IOError,
    /// Feature is not implemented.
    NotImplemented,
    /// Demuxer was queried before the headers were parsed.
    NotReady,
}

/// A specialised `Result` type for demuxing operations.
pub type DemuxerResult<T> = Result<T, DemuxerError>;

impl From<ByteIOError> for DemuxerError {
    fn from(err: ByteIOError) -> Self {
        match err {
            ByteIOError::EOF => DemuxerError::EOF,
            _ => DemuxerError::IOError,
        }
    }
}

/// Information about the single coded picture stored in an image container.
#[derive(Clone,Copy,Debug,PartialEq)]
pub struct NAImageInfo {
    /// Short name of the codec the picture is coded with (`"unknown"` if not recognised).
    pub codec_name:     &'static str,
    /// Picture parameters as declared by the container.
    pub vinfo:          NAVideoInfo,
    /// Compression fourcc as stored in the container.
    pub fourcc:         [u8; 4],
    /// Absolute position of the coded data.
    pub data_offset:    u64,
}

/// A trait for containers holding a single coded picture.
pub trait ImageDemuxCore {
    /// Reads container headers and positions the input at the start of the coded data.
    fn open(&mut self) -> DemuxerResult<()>;
    /// Returns the parsed picture information.
    fn get_image_info(&self) -> DemuxerResult<NAImageInfo>;
}
