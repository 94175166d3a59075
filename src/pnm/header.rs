use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write as _;

use super::PnmFormat;
use crate::error::CaptureError;

/// Header of one netpbm image: `"<Pn> <width> <height>[ <maxval>]\n"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PnmHeader {
    pub format: PnmFormat,
    pub width: u32,
    pub height: u32,
}

impl PnmHeader {
    pub fn new(format: PnmFormat, width: u32, height: u32) -> Self {
        Self {
            format,
            width,
            height,
        }
    }

    /// Serialized header bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CaptureError> {
        let mut line = String::with_capacity(32);
        let written = match self.format.maxval() {
            Some(maxval) => writeln!(
                line,
                "{} {} {} {maxval}",
                self.format.magic(),
                self.width,
                self.height
            ),
            None => writeln!(line, "{} {} {}", self.format.magic(), self.width, self.height),
        };
        written.map_err(|_| CaptureError::WriteFailure("formatting netpbm header".into()))?;
        Ok(line.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lines() {
        let pbm = PnmHeader::new(PnmFormat::Pbm, 640, 480).to_bytes().unwrap();
        assert_eq!(pbm, b"P4 640 480\n");
        let pgm = PnmHeader::new(PnmFormat::Pgm, 3, 2).to_bytes().unwrap();
        assert_eq!(pgm, b"P5 3 2 255\n");
        let ppm = PnmHeader::new(PnmFormat::Ppm, 1, 1).to_bytes().unwrap();
        assert_eq!(ppm, b"P6 1 1 255\n");
    }
}
