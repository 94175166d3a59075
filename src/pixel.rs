use crate::error::CaptureError;

/// Color component of a packed pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    Red,
    Green,
    Blue,
    /// Transparency. Carried through the layout and color table but never
    /// written to any output format.
    Transp,
}

impl Channel {
    pub(crate) const ALL: [Channel; 4] = [Self::Red, Self::Green, Self::Blue, Self::Transp];
}

/// Position of one color component inside a packed pixel value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Bitfield {
    /// Bit offset of the least significant bit of the component.
    pub offset: u8,
    /// Number of bits. At most 8 for any layout the encoder accepts.
    pub length: u8,
}

impl Bitfield {
    pub const fn new(offset: u8, length: u8) -> Self {
        Self { offset, length }
    }

    /// Raw channel index of this component: `(pixel >> offset) & ((1 << length) - 1)`.
    #[inline]
    pub fn extract(self, pixel: u32) -> usize {
        let mask = if self.length == 0 {
            0
        } else {
            u32::MAX >> (32 - u32::from(self.length.min(32)))
        };
        (pixel.checked_shr(u32::from(self.offset)).unwrap_or(0) & mask) as usize
    }
}

/// Geometry and bit layout of a raw framebuffer surface.
///
/// Built once from whatever the display driver reports and read-only for
/// the whole encode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelLayout {
    /// Visible width in pixels.
    pub width: u32,
    /// Visible height in pixels.
    pub height: u32,
    pub bits_per_pixel: u32,
    /// Bytes between the starts of consecutive source rows.
    pub stride_bytes: u32,
    /// Horizontal origin of the visible area inside the virtual surface, in pixels.
    pub x_offset: u32,
    /// Vertical origin of the visible area inside the virtual surface, in rows.
    pub y_offset: u32,
    pub red: Bitfield,
    pub green: Bitfield,
    pub blue: Bitfield,
    pub transp: Bitfield,
}

impl PixelLayout {
    /// Layout with no offsets and all channel bitfields zeroed.
    pub const fn new(width: u32, height: u32, bits_per_pixel: u32, stride_bytes: u32) -> Self {
        Self {
            width,
            height,
            bits_per_pixel,
            stride_bytes,
            x_offset: 0,
            y_offset: 0,
            red: Bitfield::new(0, 0),
            green: Bitfield::new(0, 0),
            blue: Bitfield::new(0, 0),
            transp: Bitfield::new(0, 0),
        }
    }

    /// 32-bit `0xXXRRGGBB` little-endian pixels, tightly packed.
    pub const fn xrgb8888(width: u32, height: u32) -> Self {
        Self::new(width, height, 32, width.saturating_mul(4)).with_channels(
            Bitfield::new(16, 8),
            Bitfield::new(8, 8),
            Bitfield::new(0, 8),
        )
    }

    /// 16-bit RGB565 little-endian pixels, tightly packed.
    pub const fn rgb565(width: u32, height: u32) -> Self {
        Self::new(width, height, 16, width.saturating_mul(2)).with_channels(
            Bitfield::new(11, 5),
            Bitfield::new(5, 6),
            Bitfield::new(0, 5),
        )
    }

    /// 1 bpp monochrome, rows padded to whole bytes.
    pub const fn mono(width: u32, height: u32) -> Self {
        Self::new(width, height, 1, width.div_ceil(8))
    }

    pub const fn with_channels(mut self, red: Bitfield, green: Bitfield, blue: Bitfield) -> Self {
        self.red = red;
        self.green = green;
        self.blue = blue;
        self
    }

    pub const fn with_transp(mut self, transp: Bitfield) -> Self {
        self.transp = transp;
        self
    }

    pub const fn with_offsets(mut self, x_offset: u32, y_offset: u32) -> Self {
        self.x_offset = x_offset;
        self.y_offset = y_offset;
        self
    }

    /// `ceil(bits_per_pixel / 8)`.
    pub fn bytes_per_pixel(&self) -> usize {
        self.bits_per_pixel.div_ceil(8) as usize
    }

    pub fn bitfield(&self, channel: Channel) -> Bitfield {
        match channel {
            Channel::Red => self.red,
            Channel::Green => self.green,
            Channel::Blue => self.blue,
            Channel::Transp => self.transp,
        }
    }

    /// Longest channel bitfield, which sizes the color table.
    pub fn max_channel_length(&self) -> u8 {
        Channel::ALL
            .iter()
            .map(|&c| self.bitfield(c).length)
            .max()
            .unwrap_or(0)
    }

    /// Whether this is a 1 bpp monochrome surface.
    pub fn is_bilevel(&self) -> bool {
        self.bits_per_pixel == 1
    }

    /// Check the layout for a source that is (`mono`) or is not monochrome.
    pub(crate) fn validate(&self, mono: bool) -> Result<(), CaptureError> {
        if self.width == 0 || self.height == 0 {
            return Err(CaptureError::InvalidLayout(alloc::format!(
                "zero dimension {}x{}",
                self.width,
                self.height
            )));
        }
        if self.bits_per_pixel == 0 || self.bits_per_pixel > 32 {
            return Err(CaptureError::UnsupportedPixelFormat(alloc::format!(
                "{} bits per pixel",
                self.bits_per_pixel
            )));
        }
        for channel in Channel::ALL {
            let field = self.bitfield(channel);
            if field.length > 8 {
                return Err(CaptureError::UnsupportedPixelFormat(alloc::format!(
                    "{channel:?} channel is {} bits, at most 8 supported",
                    field.length
                )));
            }
            if u32::from(field.offset) + u32::from(field.length) > 32 {
                return Err(CaptureError::UnsupportedPixelFormat(alloc::format!(
                    "{channel:?} channel bits {}..{} outside a 32-bit pixel",
                    field.offset,
                    u32::from(field.offset) + u32::from(field.length)
                )));
            }
        }
        if mono {
            if self.bits_per_pixel != 1 {
                return Err(CaptureError::UnsupportedPixelFormat(alloc::format!(
                    "monochrome surface is {} bpp, expected 1",
                    self.bits_per_pixel
                )));
            }
            if self.x_offset % 8 != 0 {
                return Err(CaptureError::MisalignedOffset {
                    x_offset: self.x_offset,
                });
            }
        } else if self.bits_per_pixel < 8 {
            return Err(CaptureError::UnsupportedPixelFormat(alloc::format!(
                "{} bpp color surface, at least 8 required",
                self.bits_per_pixel
            )));
        }

        let row_end = self
            .row_lead()
            .checked_add(self.row_span()?)
            .ok_or_else(|| self.too_large())?;
        if row_end > self.stride_bytes as usize {
            return Err(CaptureError::InvalidLayout(alloc::format!(
                "row reads {row_end} bytes but stride is {}",
                self.stride_bytes
            )));
        }
        Ok(())
    }

    /// Bytes skipped at the start of each source row to reach `x_offset`.
    fn row_lead(&self) -> usize {
        if self.is_bilevel() {
            self.x_offset as usize / 8
        } else {
            (self.x_offset as usize).saturating_mul(self.bytes_per_pixel())
        }
    }

    /// Source bytes consumed by one visible row.
    pub(crate) fn row_span(&self) -> Result<usize, CaptureError> {
        if self.is_bilevel() {
            Ok(self.width.div_ceil(8) as usize)
        } else {
            (self.width as usize)
                .checked_mul(self.bytes_per_pixel())
                .ok_or_else(|| self.too_large())
        }
    }

    /// Offset of the first visible byte of image row `y` (0-based, before `y_offset`).
    pub(crate) fn row_origin(&self, y: u32) -> usize {
        (y as usize + self.y_offset as usize) * self.stride_bytes as usize + self.row_lead()
    }

    /// Smallest source buffer that covers every byte the encoder reads.
    ///
    /// Only meaningful after [`validate`](Self::validate) succeeded.
    pub(crate) fn required_source_len(&self) -> Result<usize, CaptureError> {
        let last_row = (self.y_offset as usize)
            .checked_add(self.height as usize - 1)
            .and_then(|rows| rows.checked_mul(self.stride_bytes as usize))
            .ok_or_else(|| self.too_large())?;
        last_row
            .checked_add(self.row_lead())
            .and_then(|n| n.checked_add(self.row_span().ok()?))
            .ok_or_else(|| self.too_large())
    }

    fn too_large(&self) -> CaptureError {
        CaptureError::DimensionsTooLarge {
            width: self.width,
            height: self.height,
        }
    }
}
