//! Decoder interface definitions.
pub use crate::frame::*;
pub use crate::io::byteio::*;
pub use crate::options::*;

/// A list specifying general decoding errors.
#[derive(Debug,Clone,Copy,PartialEq)]
#[allow(dead_code)]
pub enum DecoderError {
    /// Invalid input data was provided.
    InvalidData,
    /// Provided input turned out to be incomplete.
    ShortData,
    /// Feature is not implemented.
    NotImplemented,
    /// Some bug in decoder. It should not happen yet it might.
    Bug,
}

/// A specialised `Result` type for decoding operations.
pub type DecoderResult<T> = Result<T, DecoderError>;

impl From<ByteIOError> for DecoderError {
    fn from(_: ByteIOError) -> Self { DecoderError::ShortData }
}

/// Decoder trait.
pub trait NADecoder: NAOptionHandler {
    /// Decodes a single frame from the provided stream and returns the reconstructed picture.
    ///
    /// The picture stays owned by the decoder and is reused for the following frames.
    fn decode(&mut self, br: &mut ByteReader) -> DecoderResult<&NARaster>;
    /// Returns the current picture (if any), including a partially reconstructed one after a failed decode.
    fn get_raster(&self) -> Option<&NARaster>;
    /// Reports how many damaged chunks were skipped over while decoding the last frame.
    fn get_truncated_chunks(&self) -> usize;
    /// Tells decoder to clear internal state (e.g. after error or seeking).
    fn flush(&mut self);
}

/// Decoder information used during creating a decoder for requested codec.
#[derive(Clone,Copy)]
pub struct DecoderInfo {
    /// Short decoder name.
    pub name: &'static str,
    /// The function that creates a decoder instance.
    pub get_decoder: fn () -> Box<dyn NADecoder + Send>,
}

/// Structure for registering known decoders.
///
/// It is supposed to be filled using `generic_register_all_decoders()` from some decoders crate and then it can be used to create decoders for the requested codecs.
#[derive(Default)]
pub struct RegisteredDecoders {
    decs:   Vec<DecoderInfo>,
}

impl RegisteredDecoders {
    /// Constructs a new instance of `RegisteredDecoders`.
    pub fn new() -> Self {
        Self { decs: Vec::new() }
    }
    /// Adds another decoder to the registry.
    pub fn add_decoder(&mut self, dec: DecoderInfo) {
        self.decs.push(dec);
    }
    /// Searches for the decoder for the provided name and returns a function for creating it on success.
    pub fn find_decoder(&self, name: &str) -> Option<fn () -> Box<dyn NADecoder + Send>> {
        self.decs.iter().find(|dec| dec.name == name).map(|dec| dec.get_decoder)
    }
    /// Provides an iterator over currently registered decoders.
    pub fn iter(&self) -> std::slice::Iter<'_, DecoderInfo> {
        self.decs.iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    struct DummyDecoder {
        ras:    Option<NARaster>,
    }

    impl NAOptionHandler for DummyDecoder {
        fn get_supported_options(&self) -> &[NAOptionDefinition] { &[] }
        fn set_options(&mut self, _options: &[NAOption]) { }
        fn query_option_value(&self, _name: &str) -> Option<NAValue> { None }
    }

    impl NADecoder for DummyDecoder {
        fn decode(&mut self, br: &mut ByteReader) -> DecoderResult<&NARaster> {
            let w = br.read_byte()? as usize;
            let h = br.read_byte()? as usize;
            let ras: &NARaster = self.ras.get_or_insert_with(|| NARaster::new(w, h));
            Ok(ras)
        }
        fn get_raster(&self) -> Option<&NARaster> { self.ras.as_ref() }
        fn get_truncated_chunks(&self) -> usize { 0 }
        fn flush(&mut self) { self.ras = None; }
    }

    fn get_dummy() -> Box<dyn NADecoder + Send> {
        Box::new(DummyDecoder { ras: None })
    }

    #[test]
    fn test_registry() {
        let mut reg = RegisteredDecoders::new();
        reg.add_decoder(DecoderInfo { name: "dummy", get_decoder: get_dummy });
        assert!(reg.find_decoder("other").is_none());
        assert_eq!(reg.iter().count(), 1);
        let mut dec = (reg.find_decoder("dummy").unwrap())();

        let src = [4, 2];
        let mut mr = MemoryReader::new_read(&src);
        let mut br = ByteReader::new(&mut mr);
        assert_eq!(dec.decode(&mut br).unwrap().get_dimensions(), (4, 2));
        assert_eq!(dec.decode(&mut br).err(), Some(DecoderError::ShortData));
        assert!(dec.get_raster().is_some());
        dec.flush();
        assert!(dec.get_raster().is_none());
    }
}
