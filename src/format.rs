use crate::color::ColorModel;

/// Output container family.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Container {
    /// PBM/PGM/PPM: one-line text header, unpadded binary rows.
    #[default]
    Netpbm,
    /// Windows BMP: 14 + 40 byte binary headers, rows padded to 4 bytes.
    Bitmap,
}

/// Requested rendition of a color source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ColorMode {
    Gray,
    #[default]
    Color,
}

/// Per-pixel encoding applied by the row encoder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelEncoding {
    /// 1 bit per pixel, 8 pixels per byte, most significant bit first.
    Bilevel,
    /// 1 byte of luma per pixel.
    Grayscale,
    /// 3 bytes per pixel.
    TrueColor,
}

/// Byte order of the three truecolor samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChannelOrder {
    Rgb,
    Bgr,
}

/// Encoded output format.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TargetFormat {
    /// P4: packed bitmap.
    Pbm,
    /// P5: 8-bit grayscale.
    Pgm,
    /// P6: 24-bit RGB.
    Ppm,
    /// 1-bit BMP with a black/white palette.
    BmpBilevel,
    /// 8-bit BMP with a 256-entry gray palette.
    BmpGray,
    /// 24-bit BGR BMP.
    BmpTrueColor,
}

impl TargetFormat {
    /// Pick the format for a container and color mode.
    ///
    /// Monochrome sources always get the bilevel variant of the container.
    pub fn select(container: Container, mode: ColorMode, model: &ColorModel) -> Self {
        match (container, model.is_mono(), mode) {
            (Container::Netpbm, true, _) => Self::Pbm,
            (Container::Netpbm, false, ColorMode::Gray) => Self::Pgm,
            (Container::Netpbm, false, ColorMode::Color) => Self::Ppm,
            (Container::Bitmap, true, _) => Self::BmpBilevel,
            (Container::Bitmap, false, ColorMode::Gray) => Self::BmpGray,
            (Container::Bitmap, false, ColorMode::Color) => Self::BmpTrueColor,
        }
    }

    pub fn container(self) -> Container {
        match self {
            Self::Pbm | Self::Pgm | Self::Ppm => Container::Netpbm,
            Self::BmpBilevel | Self::BmpGray | Self::BmpTrueColor => Container::Bitmap,
        }
    }

    pub fn encoding(self) -> PixelEncoding {
        match self {
            Self::Pbm | Self::BmpBilevel => PixelEncoding::Bilevel,
            Self::Pgm | Self::BmpGray => PixelEncoding::Grayscale,
            Self::Ppm | Self::BmpTrueColor => PixelEncoding::TrueColor,
        }
    }

    /// Truecolor sample order native to the container.
    pub fn channel_order(self) -> ChannelOrder {
        match self.container() {
            Container::Netpbm => ChannelOrder::Rgb,
            Container::Bitmap => ChannelOrder::Bgr,
        }
    }

    /// Bits per pixel in the encoded payload.
    pub fn bit_depth(self) -> u16 {
        match self.encoding() {
            PixelEncoding::Bilevel => 1,
            PixelEncoding::Grayscale => 8,
            PixelEncoding::TrueColor => 24,
        }
    }

    /// Bytes of pixel data in one encoded row, before padding.
    pub fn row_bytes(self, width: u32) -> Option<usize> {
        let width = width as usize;
        match self.encoding() {
            PixelEncoding::Bilevel => Some(width.div_ceil(8)),
            PixelEncoding::Grayscale => Some(width),
            PixelEncoding::TrueColor => width.checked_mul(3),
        }
    }

    /// Bytes occupied by one encoded row, including container padding.
    pub fn row_stride(self, width: u32) -> Option<usize> {
        let row = self.row_bytes(width)?;
        match self.container() {
            Container::Netpbm => Some(row),
            Container::Bitmap => row.checked_add(3).map(|r| r & !3),
        }
    }

    /// Conventional file extension.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Pbm => "pbm",
            Self::Pgm => "pgm",
            Self::Ppm => "ppm",
            Self::BmpBilevel | Self::BmpGray | Self::BmpTrueColor => "bmp",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitmap_rows_pad_to_four() {
        assert_eq!(TargetFormat::BmpTrueColor.row_stride(5), Some(16));
        assert_eq!(TargetFormat::Ppm.row_stride(5), Some(15));
        assert_eq!(TargetFormat::BmpGray.row_stride(5), Some(8));
        assert_eq!(TargetFormat::Pgm.row_stride(5), Some(5));
        assert_eq!(TargetFormat::BmpBilevel.row_stride(33), Some(8));
        assert_eq!(TargetFormat::Pbm.row_stride(33), Some(5));
    }

    #[test]
    fn mono_selects_bilevel() {
        let mono = ColorModel::Mono {
            black_is_zero: false,
        };
        assert_eq!(
            TargetFormat::select(Container::Bitmap, ColorMode::Color, &mono),
            TargetFormat::BmpBilevel
        );
        assert_eq!(
            TargetFormat::select(Container::Netpbm, ColorMode::Gray, &mono),
            TargetFormat::Pbm
        );
    }
}
