//! Per-row pixel encoders, one per payload encoding.
//!
//! Each encoder is a pure function of one source row, the layout and the
//! color table, so rows can be encoded in any order on any thread.

use crate::color::{ColorModel, ColorTable};
use crate::error::CaptureError;
use crate::extract::PixelReader;
use crate::format::{ChannelOrder, PixelEncoding, TargetFormat};
use crate::pixel::PixelLayout;

/// Encode one row of source pixels into output bytes.
pub trait RowEncoder: Sync {
    /// `src` starts at the first visible pixel of the row and covers the
    /// visible width; `out` is exactly the unpadded encoded row length.
    fn encode_row(&self, src: &[u8], out: &mut [u8]);
}

/// 1 bpp rows: mirror each byte's bit order, optionally complement.
///
/// Framebuffer mono memory puts the leftmost pixel in the least
/// significant bit; PBM and BMP put it in the most significant bit.
#[derive(Clone, Copy, Debug)]
pub struct Bilevel {
    pub black_is_zero: bool,
}

impl RowEncoder for Bilevel {
    fn encode_row(&self, src: &[u8], out: &mut [u8]) {
        let invert = if self.black_is_zero { 0xFF } else { 0x00 };
        for (dst, &byte) in out.iter_mut().zip(src) {
            *dst = byte.reverse_bits() ^ invert;
        }
    }
}

/// One luma byte per pixel.
#[derive(Clone, Copy, Debug)]
pub struct Grayscale<'a> {
    pub layout: &'a PixelLayout,
    pub table: &'a ColorTable,
}

impl RowEncoder for Grayscale<'_> {
    fn encode_row(&self, src: &[u8], out: &mut [u8]) {
        let pixels = PixelReader::new(src, self.layout.bytes_per_pixel());
        for (dst, pixel) in out.iter_mut().zip(pixels) {
            *dst = self.table.luma(pixel, self.layout);
        }
    }
}

/// Three samples per pixel in the container's channel order.
#[derive(Clone, Copy, Debug)]
pub struct TrueColor<'a> {
    pub layout: &'a PixelLayout,
    pub table: &'a ColorTable,
    pub order: ChannelOrder,
}

impl RowEncoder for TrueColor<'_> {
    fn encode_row(&self, src: &[u8], out: &mut [u8]) {
        let pixels = PixelReader::new(src, self.layout.bytes_per_pixel());
        for (dst, pixel) in out.chunks_exact_mut(3).zip(pixels) {
            let [r, g, b] = self.table.resolve(pixel, self.layout);
            let samples = match self.order {
                ChannelOrder::Rgb => [r, g, b],
                ChannelOrder::Bgr => [b, g, r],
            };
            dst.copy_from_slice(&samples);
        }
    }
}

/// Row encoder chosen once per encode request.
#[derive(Clone, Copy, Debug)]
pub enum FormatEncoder<'a> {
    Bilevel(Bilevel),
    Grayscale(Grayscale<'a>),
    TrueColor(TrueColor<'a>),
}

impl<'a> FormatEncoder<'a> {
    /// Select the encoder for `format`, rejecting color models it cannot consume.
    pub fn for_format(
        format: TargetFormat,
        layout: &'a PixelLayout,
        model: &'a ColorModel,
    ) -> Result<Self, CaptureError> {
        match (format.encoding(), model) {
            (PixelEncoding::Bilevel, ColorModel::Mono { black_is_zero }) => {
                Ok(Self::Bilevel(Bilevel {
                    black_is_zero: *black_is_zero,
                }))
            }
            (PixelEncoding::Grayscale, ColorModel::Table(table)) => {
                Ok(Self::Grayscale(Grayscale { layout, table }))
            }
            (PixelEncoding::TrueColor, ColorModel::Table(table)) => Ok(Self::TrueColor(TrueColor {
                layout,
                table,
                order: format.channel_order(),
            })),
            (PixelEncoding::Bilevel, ColorModel::Table(_)) => {
                Err(CaptureError::UnsupportedPixelFormat(alloc::format!(
                    "{format:?} needs a 1 bpp monochrome source"
                )))
            }
            (_, ColorModel::Mono { .. }) => Err(CaptureError::UnsupportedPixelFormat(
                alloc::format!("monochrome source cannot be encoded as {format:?}"),
            )),
        }
    }
}

impl RowEncoder for FormatEncoder<'_> {
    #[inline]
    fn encode_row(&self, src: &[u8], out: &mut [u8]) {
        match self {
            Self::Bilevel(e) => e.encode_row(src, out),
            Self::Grayscale(e) => e.encode_row(src, out),
            Self::TrueColor(e) => e.encode_row(src, out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bilevel_mirrors_bits() {
        let mut out = [0u8; 3];
        Bilevel {
            black_is_zero: false,
        }
        .encode_row(&[0b1100_0000, 0xAA, 0x01], &mut out);
        assert_eq!(out, [0b0000_0011, 0x55, 0x80]);
    }

    #[test]
    fn bilevel_black_is_zero_complements() {
        let mut out = [0u8; 1];
        Bilevel {
            black_is_zero: true,
        }
        .encode_row(&[0b1100_0000], &mut out);
        assert_eq!(out, [0b1111_1100]);
    }

    #[test]
    fn bilevel_is_an_involution() {
        let encoder = Bilevel {
            black_is_zero: false,
        };
        let src: [u8; 256] = core::array::from_fn(|i| i as u8);
        let mut once = [0u8; 256];
        let mut twice = [0u8; 256];
        encoder.encode_row(&src, &mut once);
        encoder.encode_row(&once, &mut twice);
        assert_eq!(src, twice);
    }

    #[test]
    fn truecolor_orders_samples() {
        let layout = PixelLayout::xrgb8888(1, 1);
        let table = ColorTable::ramp(&layout);
        let src = 0x00FF_8040u32.to_le_bytes();
        let mut out = [0u8; 3];
        TrueColor {
            layout: &layout,
            table: &table,
            order: ChannelOrder::Rgb,
        }
        .encode_row(&src, &mut out);
        assert_eq!(out, [0xFF, 0x80, 0x40]);
        TrueColor {
            layout: &layout,
            table: &table,
            order: ChannelOrder::Bgr,
        }
        .encode_row(&src, &mut out);
        assert_eq!(out, [0x40, 0x80, 0xFF]);
    }

    #[test]
    fn mono_source_rejects_gray() {
        let layout = PixelLayout::mono(8, 1);
        let model = ColorModel::Mono {
            black_is_zero: false,
        };
        assert!(matches!(
            FormatEncoder::for_format(TargetFormat::Pgm, &layout, &model),
            Err(CaptureError::UnsupportedPixelFormat(_))
        ));
    }
}
