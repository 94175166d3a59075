//! Netpbm family: P4 (PBM), P5 (PGM), P6 (PPM).
//!
//! Binary payload with a single-line ASCII header and no row padding.

mod header;

pub use header::PnmHeader;

use crate::format::TargetFormat;

/// Which netpbm sub-format to write.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PnmFormat {
    /// P4: packed bitmap.
    Pbm,
    /// P5: binary grayscale.
    Pgm,
    /// P6: binary RGB.
    Ppm,
}

impl PnmFormat {
    pub fn magic(self) -> &'static str {
        match self {
            PnmFormat::Pbm => "P4",
            PnmFormat::Pgm => "P5",
            PnmFormat::Ppm => "P6",
        }
    }

    /// Largest sample value, absent for the bitmap sub-format.
    pub fn maxval(self) -> Option<u16> {
        match self {
            PnmFormat::Pbm => None,
            PnmFormat::Pgm | PnmFormat::Ppm => Some(255),
        }
    }

    pub(crate) fn from_target(format: TargetFormat) -> Option<Self> {
        match format {
            TargetFormat::Pbm => Some(PnmFormat::Pbm),
            TargetFormat::Pgm => Some(PnmFormat::Pgm),
            TargetFormat::Ppm => Some(PnmFormat::Ppm),
            _ => None,
        }
    }
}
