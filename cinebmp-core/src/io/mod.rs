//! Bytestream input/output.
pub mod byteio;
