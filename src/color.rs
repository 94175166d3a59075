//! Color tables and the display color models that produce them.

use alloc::vec;
use alloc::vec::Vec;

use crate::error::CaptureError;
use crate::pixel::{Channel, PixelLayout};

/// Color addressing scheme reported by the display hardware.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Visual {
    /// Monochrome, a set bit is black.
    Mono01,
    /// Monochrome, a set bit is white.
    Mono10,
    /// Channels map linearly to intensity.
    TrueColor,
    /// Pixel values index a programmable palette.
    PseudoColor,
    /// Each channel indexes its own programmable ramp.
    DirectColor,
    /// Pixel values index a fixed palette.
    StaticPseudoColor,
}

impl Visual {
    /// Map a Linux framebuffer `FB_VISUAL_*` code.
    pub fn from_raw(code: u32) -> Result<Self, CaptureError> {
        Ok(match code {
            0 => Self::Mono01,
            1 => Self::Mono10,
            2 => Self::TrueColor,
            3 => Self::PseudoColor,
            4 => Self::DirectColor,
            5 => Self::StaticPseudoColor,
            other => {
                return Err(CaptureError::UnsupportedVisual(alloc::format!(
                    "visual code {other}"
                )));
            }
        })
    }

    pub fn is_mono(self) -> bool {
        matches!(self, Self::Mono01 | Self::Mono10)
    }
}

/// Per-channel lookup from raw channel index to 16-bit intensity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorTable {
    red: Vec<u16>,
    green: Vec<u16>,
    blue: Vec<u16>,
    transp: Vec<u16>,
}

impl ColorTable {
    /// Linear ramp for true-color surfaces.
    ///
    /// Every channel gets `2^max_channel_length` entries; entry `i` of a
    /// channel `L` bits wide is `round(i * 65535 / (2^L - 1))`, entries past
    /// `2^L` stay zero.
    pub fn ramp(layout: &PixelLayout) -> Self {
        let size = 1usize << layout.max_channel_length().min(8);
        let build = |channel: Channel| {
            let mut entries = vec![0u16; size];
            let length = layout.bitfield(channel).length.min(8);
            let max = (1u32 << length) - 1;
            if max > 0 {
                for (i, entry) in entries.iter_mut().take(max as usize + 1).enumerate() {
                    *entry = ((i as u32 * 0xFFFF + max / 2) / max) as u16;
                }
            }
            entries
        };
        Self {
            red: build(Channel::Red),
            green: build(Channel::Green),
            blue: build(Channel::Blue),
            transp: build(Channel::Transp),
        }
    }

    /// Palette read back from the display hardware, copied verbatim.
    pub fn from_hardware(red: &[u16], green: &[u16], blue: &[u16], transp: &[u16]) -> Self {
        Self {
            red: red.to_vec(),
            green: green.to_vec(),
            blue: blue.to_vec(),
            transp: transp.to_vec(),
        }
    }

    pub fn entries(&self, channel: Channel) -> &[u16] {
        match channel {
            Channel::Red => &self.red,
            Channel::Green => &self.green,
            Channel::Blue => &self.blue,
            Channel::Transp => &self.transp,
        }
    }

    /// 8-bit output sample for a raw channel index (high byte of the entry).
    #[inline]
    pub fn intensity8(&self, channel: Channel, index: usize) -> u8 {
        (self.entries(channel)[index] >> 8) as u8
    }

    /// Red, green and blue samples of one raw pixel.
    #[inline]
    pub fn resolve(&self, pixel: u32, layout: &PixelLayout) -> [u8; 3] {
        [
            self.intensity8(Channel::Red, layout.red.extract(pixel)),
            self.intensity8(Channel::Green, layout.green.extract(pixel)),
            self.intensity8(Channel::Blue, layout.blue.extract(pixel)),
        ]
    }

    /// NTSC luma of one raw pixel, `(30 R + 59 G + 11 B) / 100` truncated.
    #[inline]
    pub fn luma(&self, pixel: u32, layout: &PixelLayout) -> u8 {
        let [r, g, b] = self.resolve(pixel, layout);
        luma(r, g, b)
    }

    /// Typed variant of [`resolve`](Self::resolve).
    #[cfg(feature = "rgb")]
    pub fn resolve_rgb(&self, pixel: u32, layout: &PixelLayout) -> rgb::RGB8 {
        let [r, g, b] = self.resolve(pixel, layout);
        rgb::RGB8::new(r, g, b)
    }

    /// Every index a visible channel can produce must land inside the table.
    pub(crate) fn check_covers(&self, layout: &PixelLayout) -> Result<(), CaptureError> {
        for channel in [Channel::Red, Channel::Green, Channel::Blue] {
            let needed = 1usize << layout.bitfield(channel).length.min(8);
            let actual = self.entries(channel).len();
            if actual < needed {
                return Err(CaptureError::UnsupportedPixelFormat(alloc::format!(
                    "{channel:?} color table has {actual} entries, channel needs {needed}"
                )));
            }
        }
        Ok(())
    }
}

/// Truncating integer NTSC luma. Exact for gray inputs: `luma(v, v, v) == v`.
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((30 * u32::from(r) + 59 * u32::from(g) + 11 * u32::from(b)) / 100) as u8
}

/// How raw pixel values turn into intensities.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ColorModel {
    /// Color or grayscale surface resolved through a table.
    Table(ColorTable),
    /// 1 bpp surface without a table.
    Mono {
        /// A cleared bit is black; output bytes are complemented.
        black_is_zero: bool,
    },
}

impl ColorModel {
    /// Build the color model for a visual class.
    ///
    /// `hardware` is the palette read back from the device; it is required
    /// for the indexed and direct-color visuals and ignored otherwise.
    pub fn for_visual(
        visual: Visual,
        layout: &PixelLayout,
        hardware: Option<ColorTable>,
    ) -> Result<Self, CaptureError> {
        for channel in [Channel::Red, Channel::Green, Channel::Blue] {
            let length = layout.bitfield(channel).length;
            if length > 8 {
                return Err(CaptureError::UnsupportedPixelFormat(alloc::format!(
                    "color depth of {length} bits per component"
                )));
            }
        }
        match visual {
            Visual::TrueColor => Ok(Self::Table(ColorTable::ramp(layout))),
            Visual::PseudoColor | Visual::DirectColor | Visual::StaticPseudoColor => hardware
                .map(Self::Table)
                .ok_or_else(|| {
                    CaptureError::UnsupportedVisual(alloc::format!(
                        "{visual:?} needs the hardware palette"
                    ))
                }),
            Visual::Mono01 => Ok(Self::Mono {
                black_is_zero: false,
            }),
            Visual::Mono10 => Ok(Self::Mono {
                black_is_zero: true,
            }),
        }
    }

    pub fn table(&self) -> Option<&ColorTable> {
        match self {
            Self::Table(table) => Some(table),
            Self::Mono { .. } => None,
        }
    }

    pub fn is_mono(&self) -> bool {
        matches!(self, Self::Mono { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::Bitfield;

    #[test]
    fn ramp_endpoints() {
        let table = ColorTable::ramp(&PixelLayout::rgb565(1, 1));
        assert_eq!(table.entries(Channel::Red).len(), 64);
        assert_eq!(table.entries(Channel::Red)[0], 0);
        assert_eq!(table.entries(Channel::Red)[31], 0xFFFF);
        assert_eq!(table.entries(Channel::Red)[32], 0);
        assert_eq!(table.entries(Channel::Green)[63], 0xFFFF);
        // 16 * 65535 / 31 = 33824.5..., rounds up
        assert_eq!(table.entries(Channel::Blue)[16], 33825);
    }

    #[test]
    fn ramp_8bit_is_exact() {
        let table = ColorTable::ramp(&PixelLayout::xrgb8888(1, 1));
        for i in 0..256 {
            assert_eq!(table.entries(Channel::Green)[i], i as u16 * 257);
            assert_eq!(table.intensity8(Channel::Green, i), i as u8);
        }
    }

    #[test]
    fn luma_extremes() {
        assert_eq!(luma(255, 255, 255), 255);
        assert_eq!(luma(0, 0, 0), 0);
        assert_eq!(luma(255, 0, 0), 76);
        assert_eq!(luma(0, 255, 0), 150);
        assert_eq!(luma(0, 0, 255), 28);
    }

    #[test]
    fn mono_visuals_set_polarity() {
        let layout = PixelLayout::mono(8, 1);
        assert_eq!(
            ColorModel::for_visual(Visual::Mono10, &layout, None).unwrap(),
            ColorModel::Mono {
                black_is_zero: true
            }
        );
        assert_eq!(
            ColorModel::for_visual(Visual::Mono01, &layout, None).unwrap(),
            ColorModel::Mono {
                black_is_zero: false
            }
        );
    }

    #[test]
    fn pseudocolor_without_palette_is_rejected() {
        let layout = PixelLayout::new(1, 1, 8, 1).with_channels(
            Bitfield::new(0, 8),
            Bitfield::new(0, 8),
            Bitfield::new(0, 8),
        );
        assert!(matches!(
            ColorModel::for_visual(Visual::PseudoColor, &layout, None),
            Err(CaptureError::UnsupportedVisual(_))
        ));
    }

    #[test]
    fn unknown_visual_code() {
        assert!(matches!(
            Visual::from_raw(6),
            Err(CaptureError::UnsupportedVisual(_))
        ));
        assert_eq!(Visual::from_raw(2).unwrap(), Visual::TrueColor);
    }
}
