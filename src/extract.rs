//! Raw pixel reads from a little-endian framebuffer row.

/// Assemble one pixel value from the first `bytes_per_pixel` bytes of `src`.
///
/// Framebuffer memory is little-endian on every host, so 2- and 4-byte
/// pixels are read as little-endian words and 1- and 3-byte pixels are
/// assembled least significant byte first.
#[inline]
pub fn read_pixel(src: &[u8], bytes_per_pixel: usize) -> u32 {
    match bytes_per_pixel {
        4 => u32::from_le_bytes([src[0], src[1], src[2], src[3]]),
        2 => u32::from(u16::from_le_bytes([src[0], src[1]])),
        n => src[..n]
            .iter()
            .enumerate()
            .fold(0u32, |pixel, (i, &b)| pixel | u32::from(b) << (i * 8)),
    }
}

/// Iterator over the raw pixel values of one source row.
pub struct PixelReader<'a> {
    chunks: core::slice::ChunksExact<'a, u8>,
    bytes_per_pixel: usize,
}

impl<'a> PixelReader<'a> {
    /// `row` must start at the first visible pixel; reading stops after
    /// `row.len() / bytes_per_pixel` pixels. A width of 0 reads bytes.
    pub fn new(row: &'a [u8], bytes_per_pixel: usize) -> Self {
        let bytes_per_pixel = bytes_per_pixel.max(1);
        Self {
            chunks: row.chunks_exact(bytes_per_pixel),
            bytes_per_pixel,
        }
    }
}

impl Iterator for PixelReader<'_> {
    type Item = u32;

    #[inline]
    fn next(&mut self) -> Option<u32> {
        self.chunks
            .next()
            .map(|px| read_pixel(px, self.bytes_per_pixel))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }
}

impl ExactSizeIterator for PixelReader<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn reads_are_little_endian() {
        let bytes = [0x40, 0x80, 0xFF, 0x00];
        assert_eq!(read_pixel(&bytes, 4), 0x00FF_8040);
        assert_eq!(read_pixel(&bytes, 3), 0xFF_8040);
        assert_eq!(read_pixel(&bytes, 2), 0x8040);
        assert_eq!(read_pixel(&bytes, 1), 0x40);
    }

    #[test]
    fn reader_advances_by_pixel_width() {
        let row = [1, 0, 0, 2, 0, 0, 3, 0, 0];
        let pixels: Vec<u32> = PixelReader::new(&row, 3).collect();
        assert_eq!(pixels, [1, 2, 3]);
    }

    #[test]
    fn zero_width_reads_single_bytes() {
        let pixels: Vec<u32> = PixelReader::new(&[7, 8], 0).collect();
        assert_eq!(pixels, [7, 8]);
    }
}
