use alloc::vec::Vec;

use enough::Stop;
use log::debug;

use crate::bmp::BmpHeader;
use crate::color::ColorModel;
use crate::error::CaptureError;
use crate::format::{ColorMode, Container, TargetFormat};
use crate::limits::Limits;
use crate::output::{ContainerHeader, OutputImage};
use crate::pixel::PixelLayout;
use crate::pnm::{PnmFormat, PnmHeader};
use crate::row::FormatEncoder;
use crate::schedule::{RowGeometry, RowScheduler};

/// Builder for one framebuffer transcode.
///
/// ```no_run
/// use zenfbdump::{ColorModel, EncodeRequest, PixelLayout, TargetFormat, Unstoppable, Visual};
///
/// let layout = PixelLayout::xrgb8888(640, 480);
/// let model = ColorModel::for_visual(Visual::TrueColor, &layout, None)?;
/// let framebuffer = vec![0u8; 640 * 480 * 4];
/// let image = EncodeRequest::new(layout, &model, &framebuffer)
///     .format(TargetFormat::BmpTrueColor)
///     .available_parallelism()
///     .encode(Unstoppable)?;
/// std::fs::write("screen.bmp", image.as_bytes()).unwrap();
/// # Ok::<(), zenfbdump::CaptureError>(())
/// ```
#[derive(Clone, Debug)]
pub struct EncodeRequest<'a> {
    layout: PixelLayout,
    model: &'a ColorModel,
    source: &'a [u8],
    format: TargetFormat,
    scheduler: RowScheduler,
    limits: Option<&'a Limits>,
}

impl<'a> EncodeRequest<'a> {
    /// Encode `source` to color netpbm (or PBM for monochrome models), serially.
    pub fn new(layout: PixelLayout, model: &'a ColorModel, source: &'a [u8]) -> Self {
        Self {
            layout,
            model,
            source,
            format: TargetFormat::select(Container::Netpbm, ColorMode::Color, model),
            scheduler: RowScheduler::serial(),
            limits: None,
        }
    }

    pub fn format(mut self, format: TargetFormat) -> Self {
        self.format = format;
        self
    }

    /// Pick the format from a container and color mode, see [`TargetFormat::select`].
    pub fn container(mut self, container: Container, mode: ColorMode) -> Self {
        self.format = TargetFormat::select(container, mode, self.model);
        self
    }

    /// Number of row bands to encode in parallel, clamped to at least one.
    pub fn parallelism(mut self, workers: usize) -> Self {
        self.scheduler = RowScheduler::new(workers);
        self
    }

    /// One row band per unit of host hardware parallelism.
    #[cfg(feature = "std")]
    pub fn available_parallelism(mut self) -> Self {
        self.scheduler = RowScheduler::available();
        self
    }

    /// Apply `limits`; `max_threads` also caps the requested parallelism.
    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Run the transcode. Either the whole image is produced or an error is
    /// returned; no partial output escapes.
    pub fn encode<S: Stop + Sync>(self, stop: S) -> Result<OutputImage, CaptureError> {
        let layout = &self.layout;
        let (width, height) = (layout.width, layout.height);
        let format = self.format;

        layout.validate(self.model.is_mono())?;
        if let Some(table) = self.model.table() {
            table.check_covers(layout)?;
        }
        let encoder = FormatEncoder::for_format(format, layout, self.model)?;
        let mut scheduler = self.scheduler;
        if let Some(limits) = self.limits {
            limits.check_layout(layout)?;
            scheduler = limits.cap(scheduler);
        }

        let too_large = || CaptureError::DimensionsTooLarge { width, height };
        let row_bytes = format.row_bytes(width).ok_or_else(too_large)?;
        let row_stride = format.row_stride(width).ok_or_else(too_large)?;
        let payload_len = row_stride
            .checked_mul(height as usize)
            .ok_or_else(too_large)?;

        let (header, header_bytes) = match PnmFormat::from_target(format) {
            Some(pnm) => {
                let header = PnmHeader::new(pnm, width, height);
                (ContainerHeader::Netpbm(header), header.to_bytes()?)
            }
            None => {
                let header = BmpHeader::new(format, width, height, payload_len)?;
                (ContainerHeader::Bitmap(header), header.to_bytes())
            }
        };

        let needed = layout.required_source_len()?;
        if self.source.len() < needed {
            return Err(CaptureError::BufferTooSmall {
                needed,
                actual: self.source.len(),
            });
        }

        let header_len = header_bytes.len();
        let total = header_len.checked_add(payload_len).ok_or_else(too_large)?;
        if let Some(limits) = self.limits {
            limits.check_output(total)?;
        }

        let mut bytes = Vec::new();
        bytes
            .try_reserve_exact(total)
            .map_err(|_| CaptureError::AllocationFailure { bytes: total })?;
        bytes.extend_from_slice(&header_bytes);
        bytes.resize(total, 0);

        debug!(
            "Encoding {width}x{height} {} bpp surface as {format:?}, row stride {row_stride}, {} workers",
            layout.bits_per_pixel,
            scheduler.parallelism()
        );
        stop.check()?;
        scheduler.run(
            &encoder,
            layout,
            self.source,
            &mut bytes[header_len..],
            RowGeometry {
                stride: row_stride,
                bytes: row_bytes,
            },
            &stop,
        )?;

        Ok(OutputImage::new(
            header, format, width, height, row_stride, header_len, bytes,
        ))
    }
}

/// Encode `source` to `format` on a single thread.
pub fn encode(
    layout: PixelLayout,
    model: &ColorModel,
    source: &[u8],
    format: TargetFormat,
    stop: impl Stop + Sync,
) -> Result<OutputImage, CaptureError> {
    EncodeRequest::new(layout, model, source)
        .format(format)
        .encode(stop)
}
