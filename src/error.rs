use alloc::string::String;
use enough::StopReason;

use crate::format::TargetFormat;

/// Errors from framebuffer pixel decoding and image encoding.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CaptureError {
    #[error("could not allocate {bytes} byte output buffer")]
    AllocationFailure { bytes: usize },

    #[error("unsupported pixel format: {0}")]
    UnsupportedPixelFormat(String),

    #[error("unsupported visual: {0}")]
    UnsupportedVisual(String),

    #[error("x offset {x_offset} not divisible by 8 in 1 bpp mode")]
    MisalignedOffset { x_offset: u32 },

    #[error("write failed: {0}")]
    WriteFailure(String),

    #[error("invalid layout: {0}")]
    InvalidLayout(String),

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("buffer too small: need {needed} bytes, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    #[error("target format mismatch: expected {expected:?}, got {actual:?}")]
    FormatMismatch {
        expected: TargetFormat,
        actual: TargetFormat,
    },

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

impl From<StopReason> for CaptureError {
    fn from(r: StopReason) -> Self {
        CaptureError::Cancelled(r)
    }
}
