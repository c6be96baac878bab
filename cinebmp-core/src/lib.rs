//! Core functionality of cinebmp intended to be used by both crates implementing format support and users.
#[cfg(feature="decoders")]
#[allow(clippy::upper_case_acronyms)]
pub mod codecs;

#[cfg(feature="muxers")]
#[allow(clippy::upper_case_acronyms)]
pub mod muxers;

#[cfg(feature="demuxers")]
#[allow(clippy::upper_case_acronyms)]
pub mod demuxers;

pub mod frame;
pub mod io;
pub mod options;
