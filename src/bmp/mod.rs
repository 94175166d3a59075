//! Windows bitmap container: BITMAPFILEHEADER + BITMAPINFOHEADER, optional
//! palette, uncompressed top-down rows padded to 4 bytes.

mod header;

pub use header::{BmpFileHeader, BmpHeader, BmpInfoHeader, BmpPalette};

/// Size of BITMAPFILEHEADER.
pub const FILE_HEADER_LEN: usize = 14;
/// Size of BITMAPINFOHEADER.
pub const INFO_HEADER_LEN: usize = 40;
