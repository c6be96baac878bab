//! Windows bitmap image reader.
//!
//! Only the parts needed to locate the coded picture are parsed, the picture itself is left to a decoder.
use cinebmp_core::demuxers::*;

const FILE_HEADER_SIZE: u64 = 14;
const INFO_HEADER_SIZE: u32 = 40;

static BMP_VIDEO_CODEC_REGISTER: &[(&[u8; 4], &str)] = &[
    (b"cvid", "cinepak"),
    (b"CVID", "cinepak"),
];

/// Returns known codec name for the provided bitmap compression fourcc.
pub fn find_codec_from_bmp_fourcc(fcc: &[u8; 4]) -> Option<&'static str> {
    BMP_VIDEO_CODEC_REGISTER.iter().find(|(fourcc, _)| *fourcc == fcc).map(|(_, name)| *name)
}

/// Bitmap image reader.
pub struct BMPDemuxer<'a, 'b> {
    src:        &'a mut ByteReader<'b>,
    info:       Option<NAImageInfo>,
}

impl<'a, 'b> BMPDemuxer<'a, 'b> {
    /// Constructs a new bitmap reader working on the provided stream.
    pub fn new(io: &'a mut ByteReader<'b>) -> Self {
        BMPDemuxer {
            src:    io,
            info:   None,
        }
    }
}

impl<'a, 'b> ImageDemuxCore for BMPDemuxer<'a, 'b> {
    fn open(&mut self) -> DemuxerResult<()> {
        let src = &mut self.src;

        let mut magic = [0u8; 2];
                                          src.read_buf(&mut magic)?;
        validate!(&magic == b"BM");
        let _file_size                  = src.read_u32le()?;
        let _reserved1                  = src.read_u16le()?;
        let _reserved2                  = src.read_u16le()?;
        let data_offset                 = src.read_u32le()?;

        let bi_size                     = src.read_u32le()?;
        if bi_size != INFO_HEADER_SIZE {
            return Err(DemuxerError::NotImplemented);
        }
        let width                       = src.read_u32le()? as i32;
        let height                      = src.read_u32le()? as i32;
        let planes                      = src.read_u16le()?;
        let bitcount                    = src.read_u16le()?;
        let compression                 = src.read_tag()?;
        validate!(width >= 0);

        let flip = height > 0;
        let mut vinfo = NAVideoInfo::new(width as usize, height.unsigned_abs() as usize, flip, 0);
        vinfo.bits = (planes as u8).wrapping_mul(bitcount as u8);
        let codec_name = find_codec_from_bmp_fourcc(&compression).unwrap_or("unknown");

        validate!(u64::from(data_offset) >= FILE_HEADER_SIZE + u64::from(INFO_HEADER_SIZE));
                                          src.seek(SeekFrom::Start(u64::from(data_offset)))?;

        self.info = Some(NAImageInfo {
                codec_name,
                vinfo,
                fourcc: compression,
                data_offset: u64::from(data_offset),
            });
        Ok(())
    }
    fn get_image_info(&self) -> DemuxerResult<NAImageInfo> {
        self.info.ok_or(DemuxerError::NotReady)
    }
}

impl<'a, 'b> NAOptionHandler for BMPDemuxer<'a, 'b> {
    fn get_supported_options(&self) -> &[NAOptionDefinition] { &[] }
    fn set_options(&mut self, _options: &[NAOption]) { }
    fn query_option_value(&self, _name: &str) -> Option<NAValue> { None }
}
