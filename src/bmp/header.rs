use alloc::vec::Vec;

use super::{FILE_HEADER_LEN, INFO_HEADER_LEN};
use crate::error::CaptureError;
use crate::format::{PixelEncoding, TargetFormat};

/// BITMAPFILEHEADER. Reserved fields are always zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BmpFileHeader {
    /// Whole file size in bytes.
    pub file_size: u32,
    /// Offset of the first pixel row.
    pub data_offset: u32,
}

impl BmpFileHeader {
    fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(b"BM");
        out.extend_from_slice(&self.file_size.to_le_bytes());
        out.extend_from_slice(&[0u8; 4]); // reserved
        out.extend_from_slice(&self.data_offset.to_le_bytes());
    }
}

/// BITMAPINFOHEADER for an uncompressed top-down image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BmpInfoHeader {
    pub width: i32,
    /// Negative: rows are stored top to bottom.
    pub height: i32,
    pub bit_count: u16,
    /// Padded pixel data size.
    pub image_size: u32,
    /// Palette entries in use; also written as the important-color count.
    pub colors_used: u32,
}

impl BmpInfoHeader {
    fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&(INFO_HEADER_LEN as u32).to_le_bytes());
        out.extend_from_slice(&self.width.to_le_bytes());
        out.extend_from_slice(&self.height.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes()); // planes
        out.extend_from_slice(&self.bit_count.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes()); // BI_RGB
        out.extend_from_slice(&self.image_size.to_le_bytes());
        out.extend_from_slice(&0i32.to_le_bytes()); // h resolution
        out.extend_from_slice(&0i32.to_le_bytes()); // v resolution
        out.extend_from_slice(&self.colors_used.to_le_bytes());
        out.extend_from_slice(&self.colors_used.to_le_bytes()); // important colors
    }
}

/// Color table following the info header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BmpPalette {
    /// 24-bit images carry none.
    None,
    /// Index 0 white, index 1 black, the same polarity as PBM.
    Bilevel,
    /// 256 entries, index `i` is `(i, i, i)`.
    Grayscale,
}

impl BmpPalette {
    pub fn entries(self) -> usize {
        match self {
            Self::None => 0,
            Self::Bilevel => 2,
            Self::Grayscale => 256,
        }
    }

    /// Serialized size, 4 bytes (B, G, R, 0) per entry.
    pub fn len(self) -> usize {
        self.entries() * 4
    }

    pub fn is_empty(self) -> bool {
        self.entries() == 0
    }

    fn write(self, out: &mut Vec<u8>) {
        match self {
            Self::None => {}
            Self::Bilevel => {
                out.extend_from_slice(&[0xFF, 0xFF, 0xFF, 0]);
                out.extend_from_slice(&[0, 0, 0, 0]);
            }
            Self::Grayscale => {
                for i in 0..=255u8 {
                    out.extend_from_slice(&[i, i, i, 0]);
                }
            }
        }
    }
}

/// Complete bitmap prefix for one image, built fresh per encode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BmpHeader {
    pub file: BmpFileHeader,
    pub info: BmpInfoHeader,
    pub palette: BmpPalette,
}

impl BmpHeader {
    /// Header for a `format` image whose padded pixel data is `image_size` bytes.
    pub fn new(
        format: TargetFormat,
        width: u32,
        height: u32,
        image_size: usize,
    ) -> Result<Self, CaptureError> {
        let too_large = || CaptureError::DimensionsTooLarge { width, height };
        let palette = match format.encoding() {
            PixelEncoding::Bilevel => BmpPalette::Bilevel,
            PixelEncoding::Grayscale => BmpPalette::Grayscale,
            PixelEncoding::TrueColor => BmpPalette::None,
        };
        let data_offset = FILE_HEADER_LEN + INFO_HEADER_LEN + palette.len();
        let file_size = image_size.checked_add(data_offset).ok_or_else(too_large)?;

        let signed_width = i32::try_from(width).map_err(|_| too_large())?;
        let signed_height = i32::try_from(height).map_err(|_| too_large())?;
        Ok(Self {
            file: BmpFileHeader {
                file_size: u32::try_from(file_size).map_err(|_| too_large())?,
                data_offset: data_offset as u32,
            },
            info: BmpInfoHeader {
                width: signed_width,
                height: -signed_height,
                bit_count: format.bit_depth(),
                image_size: u32::try_from(image_size).map_err(|_| too_large())?,
                colors_used: palette.entries() as u32,
            },
            palette,
        })
    }

    /// Bytes from the start of the file to the first pixel row.
    pub fn prefix_len(&self) -> usize {
        self.file.data_offset as usize
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.prefix_len());
        self.write(&mut out);
        out
    }

    pub(crate) fn write(&self, out: &mut Vec<u8>) {
        self.file.write(out);
        self.info.write(out);
        self.palette.write(out);
    }
}
