//! Crate for providing support for Cinepak video and BMP images.
extern crate cinebmp_core;

#[cfg(feature="decoders")]
#[allow(clippy::needless_range_loop)]
#[allow(clippy::upper_case_acronyms)]
pub mod codecs;

#[cfg(feature="decoders")]
pub use crate::codecs::generic_register_all_decoders;

#[cfg(feature="demuxers")]
#[allow(clippy::upper_case_acronyms)]
pub mod demuxers;

#[cfg(feature="muxers")]
#[allow(clippy::upper_case_acronyms)]
pub mod muxers;
