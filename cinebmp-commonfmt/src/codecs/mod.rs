use cinebmp_core::codecs::*;

#[allow(unused_macros)]
#[cfg(debug_assertions)]
macro_rules! validate {
    ($a:expr) => { if !$a { println!("check failed at {}:{}", file!(), line!()); return Err(DecoderError::InvalidData); } };
}
#[allow(unused_macros)]
#[cfg(not(debug_assertions))]
macro_rules! validate {
    ($a:expr) => { if !$a { return Err(DecoderError::InvalidData); } };
}

#[cfg(feature="decoder_cinepak")]
pub mod cinepak;

const DECODERS: &[DecoderInfo] = &[
#[cfg(feature="decoder_cinepak")]
    DecoderInfo { name: "cinepak", get_decoder: cinepak::get_decoder },
];

/// Registers all available codecs provided by this crate.
pub fn generic_register_all_decoders(rd: &mut RegisteredDecoders) {
    for decoder in DECODERS.iter() {
        rd.add_decoder(*decoder);
    }
}
