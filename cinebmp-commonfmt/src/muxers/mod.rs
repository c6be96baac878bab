#[cfg(feature="muxer_bmp")]
pub mod bmp;
