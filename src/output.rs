use alloc::vec::Vec;

#[cfg(feature = "imgref")]
use rgb::AsPixels as _;

use crate::bmp::BmpHeader;
use crate::format::TargetFormat;
use crate::pnm::PnmHeader;

/// Header record of an encoded image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContainerHeader {
    Netpbm(PnmHeader),
    Bitmap(BmpHeader),
}

/// Fully encoded image: header bytes followed by the padded payload.
///
/// Only ever returned complete; an encode that fails yields no output.
#[derive(Clone, Debug)]
pub struct OutputImage {
    header: ContainerHeader,
    format: TargetFormat,
    width: u32,
    height: u32,
    row_stride: usize,
    header_len: usize,
    bytes: Vec<u8>,
}

impl OutputImage {
    pub(crate) fn new(
        header: ContainerHeader,
        format: TargetFormat,
        width: u32,
        height: u32,
        row_stride: usize,
        header_len: usize,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            header,
            format,
            width,
            height,
            row_stride,
            header_len,
            bytes,
        }
    }

    pub fn header(&self) -> &ContainerHeader {
        &self.header
    }

    pub fn format(&self) -> TargetFormat {
        self.format
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per encoded row, padding included.
    pub fn row_stride(&self) -> usize {
        self.row_stride
    }

    /// The whole file: header then payload.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn header_bytes(&self) -> &[u8] {
        &self.bytes[..self.header_len]
    }

    /// Pixel rows only, `row_stride * height` bytes.
    pub fn payload(&self) -> &[u8] {
        &self.bytes[self.header_len..]
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.bytes
    }

    /// Write header and payload to `w`.
    #[cfg(feature = "std")]
    pub fn write_to<W: std::io::Write>(&self, mut w: W) -> Result<(), crate::CaptureError> {
        w.write_all(&self.bytes)
            .and_then(|()| w.flush())
            .map_err(|e| crate::CaptureError::WriteFailure(alloc::format!("{e}")))
    }

    /// Borrow a grayscale payload as an [`imgref::ImgRef`], honoring the row stride.
    ///
    /// Returns [`crate::CaptureError::FormatMismatch`] unless the format is
    /// [`TargetFormat::Pgm`] or [`TargetFormat::BmpGray`].
    #[cfg(feature = "imgref")]
    pub fn gray_imgref(&self) -> Result<imgref::ImgRef<'_, u8>, crate::CaptureError> {
        if !matches!(self.format, TargetFormat::Pgm | TargetFormat::BmpGray) {
            return Err(crate::CaptureError::FormatMismatch {
                expected: TargetFormat::Pgm,
                actual: self.format,
            });
        }
        Ok(imgref::ImgRef::new_stride(
            self.payload(),
            self.width as usize,
            self.height as usize,
            self.row_stride,
        ))
    }

    /// Borrow a PPM payload as typed RGB pixels.
    ///
    /// Returns [`crate::CaptureError::FormatMismatch`] for every other format.
    #[cfg(feature = "imgref")]
    pub fn rgb_imgref(&self) -> Result<imgref::ImgRef<'_, rgb::RGB8>, crate::CaptureError> {
        if self.format != TargetFormat::Ppm {
            return Err(crate::CaptureError::FormatMismatch {
                expected: TargetFormat::Ppm,
                actual: self.format,
            });
        }
        let pixels: &[rgb::RGB8] = self.payload().as_pixels();
        Ok(imgref::ImgRef::new(
            pixels,
            self.width as usize,
            self.height as usize,
        ))
    }
}
