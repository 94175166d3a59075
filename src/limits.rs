use crate::error::CaptureError;
use crate::pixel::PixelLayout;
use crate::schedule::RowScheduler;

/// Caps on what one capture may read, produce, and spawn.
///
/// All fields default to `None` (no limit). Checked before the output
/// buffer is allocated or any worker is started.
#[derive(Clone, Debug, Default)]
pub struct Limits {
    /// Maximum visible surface size, in pixels (width * height).
    pub max_pixels: Option<u64>,
    /// Maximum bytes of framebuffer memory one encode reads, counted from
    /// the start of the buffer to the last byte of the last visible row.
    pub max_source_bytes: Option<u64>,
    /// Maximum size of the encoded file, header included.
    pub max_output_bytes: Option<u64>,
    /// Upper bound on row-band workers, whatever parallelism is requested.
    pub max_threads: Option<usize>,
}

impl Limits {
    /// Check the visible area and the source span of `layout`.
    ///
    /// `layout` must already be validated.
    pub(crate) fn check_layout(&self, layout: &PixelLayout) -> Result<(), CaptureError> {
        let pixels = u64::from(layout.width) * u64::from(layout.height);
        exceeds("visible pixel count", pixels, self.max_pixels)?;
        let source = layout.required_source_len()? as u64;
        exceeds("source span", source, self.max_source_bytes)
    }

    pub(crate) fn check_output(&self, bytes: usize) -> Result<(), CaptureError> {
        exceeds("output size", bytes as u64, self.max_output_bytes)
    }

    /// Lower `scheduler`'s worker count to `max_threads`.
    pub(crate) fn cap(&self, scheduler: RowScheduler) -> RowScheduler {
        match self.max_threads {
            Some(max) if scheduler.parallelism() > max => RowScheduler::new(max),
            _ => scheduler,
        }
    }
}

fn exceeds(what: &str, value: u64, limit: Option<u64>) -> Result<(), CaptureError> {
    match limit {
        Some(max) if value > max => Err(CaptureError::LimitExceeded(alloc::format!(
            "{what} {value} exceeds limit {max}"
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_span_counts_offsets_and_stride() {
        // 2 rows down, 1 pixel in, 4 bytes per pixel, 40-byte stride
        let layout = PixelLayout::new(4, 3, 32, 40).with_offsets(1, 2);
        let needed = 4 * 40 + 4 + 16;
        let exact = Limits {
            max_source_bytes: Some(needed),
            ..Default::default()
        };
        assert!(exact.check_layout(&layout).is_ok());
        let short = Limits {
            max_source_bytes: Some(needed - 1),
            ..Default::default()
        };
        assert!(matches!(
            short.check_layout(&layout),
            Err(CaptureError::LimitExceeded(_))
        ));
    }

    #[test]
    fn thread_cap_only_lowers() {
        let limits = Limits {
            max_threads: Some(4),
            ..Default::default()
        };
        assert_eq!(limits.cap(RowScheduler::new(64)).parallelism(), 4);
        assert_eq!(limits.cap(RowScheduler::new(2)).parallelism(), 2);
        assert_eq!(Limits::default().cap(RowScheduler::new(9)).parallelism(), 9);
    }
}
