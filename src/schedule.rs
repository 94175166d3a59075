//! Row band partitioning and dispatch.
//!
//! Bands are contiguous and disjoint, and each one owns the matching slice
//! of the pre-sized output buffer, so the result does not depend on how
//! the bands are interleaved.

use alloc::vec::Vec;

use enough::Stop;
use log::trace;

use crate::error::CaptureError;
use crate::pixel::PixelLayout;
use crate::row::RowEncoder;

/// Byte geometry of one encoded row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct RowGeometry {
    /// Encoded row length, padding included.
    pub stride: usize,
    /// Bytes the row encoder writes; the rest of the stride stays zero.
    pub bytes: usize,
}

/// Contiguous run of image rows handled by one worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Band {
    pub start: u32,
    pub rows: u32,
}

/// Splits an image into row bands and encodes them, serially or on scoped
/// worker threads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowScheduler {
    parallelism: usize,
}

impl Default for RowScheduler {
    fn default() -> Self {
        Self::serial()
    }
}

impl RowScheduler {
    /// Scheduler with `parallelism` workers, clamped to at least one.
    pub fn new(parallelism: usize) -> Self {
        Self {
            parallelism: parallelism.max(1),
        }
    }

    pub fn serial() -> Self {
        Self::new(1)
    }

    /// One worker per unit of host hardware parallelism.
    #[cfg(feature = "std")]
    pub fn available() -> Self {
        Self::new(
            std::thread::available_parallelism()
                .map(core::num::NonZeroUsize::get)
                .unwrap_or(1),
        )
    }

    pub fn parallelism(&self) -> usize {
        self.parallelism
    }

    /// `parallelism` bands of `height / parallelism` rows; the last band
    /// also takes the `height % parallelism` remainder rows.
    ///
    /// Only non-empty bands are returned: with more workers than rows every
    /// band but the last is empty, so the whole image is one band.
    pub fn bands(&self, height: u32) -> Vec<Band> {
        let workers = u32::try_from(self.parallelism).unwrap_or(u32::MAX);
        let per_worker = height / workers;
        if per_worker == 0 {
            return alloc::vec![Band {
                start: 0,
                rows: height,
            }];
        }
        let remainder = height % workers;
        (0..workers)
            .map(|i| Band {
                start: i * per_worker,
                rows: if i == workers - 1 {
                    per_worker + remainder
                } else {
                    per_worker
                },
            })
            .collect()
    }

    /// Encode every row of `layout` from `source` into `out`.
    ///
    /// `out` holds exactly `height * rows.stride` bytes and is zeroed, so
    /// padding past `rows.bytes` in each row stays zero.
    pub(crate) fn run<E, S>(
        &self,
        encoder: &E,
        layout: &PixelLayout,
        source: &[u8],
        out: &mut [u8],
        rows: RowGeometry,
        stop: &S,
    ) -> Result<(), CaptureError>
    where
        E: RowEncoder,
        S: Stop + Sync + ?Sized,
    {
        let span = layout.row_span()?;
        let bands = self.bands(layout.height);
        let job = BandJob {
            encoder,
            layout,
            source,
            rows,
            span,
            stop,
        };

        #[cfg(feature = "threads")]
        if bands.len() > 1 {
            trace!("Encoding {} rows on {} workers", layout.height, bands.len());
            return std::thread::scope(|s| {
                let mut rest = out;
                let mut handles = Vec::with_capacity(bands.len());
                for band in bands.iter().copied().filter(|b| b.rows > 0) {
                    let (chunk, tail) =
                        core::mem::take(&mut rest).split_at_mut(band.rows as usize * rows.stride);
                    rest = tail;
                    let job = &job;
                    handles.push(s.spawn(move || job.encode(band, chunk)));
                }
                handles
                    .into_iter()
                    .map(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
                    .collect::<Result<(), CaptureError>>()
            });
        }

        trace!("Encoding {} rows serially", layout.height);
        let mut rest = out;
        for band in bands.into_iter().filter(|b| b.rows > 0) {
            let (chunk, tail) =
                core::mem::take(&mut rest).split_at_mut(band.rows as usize * rows.stride);
            rest = tail;
            job.encode(band, chunk)?;
        }
        Ok(())
    }
}

/// Read-only state shared by every band of one encode.
struct BandJob<'a, E: ?Sized, S: ?Sized> {
    encoder: &'a E,
    layout: &'a PixelLayout,
    source: &'a [u8],
    rows: RowGeometry,
    span: usize,
    stop: &'a S,
}

impl<E, S> BandJob<'_, E, S>
where
    E: RowEncoder,
    S: Stop + ?Sized,
{
    fn encode(&self, band: Band, out: &mut [u8]) -> Result<(), CaptureError> {
        trace!("Band rows {}..{}", band.start, band.start + band.rows);
        for (i, dst) in out.chunks_exact_mut(self.rows.stride).enumerate() {
            if i % 16 == 0 {
                self.stop.check()?;
            }
            let origin = self.layout.row_origin(band.start + i as u32);
            self.encoder.encode_row(
                &self.source[origin..origin + self.span],
                &mut dst[..self.rows.bytes],
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_cover_all_rows_once() {
        for (height, workers) in [(10, 3), (7, 8), (16, 4), (1, 1), (5, 2)] {
            let bands = RowScheduler::new(workers).bands(height);
            let expected = if workers > height as usize { 1 } else { workers };
            assert_eq!(bands.len(), expected);
            let mut next = 0;
            for band in &bands {
                assert!(band.rows > 0);
                assert_eq!(band.start, next);
                next += band.rows;
            }
            assert_eq!(next, height);
        }
    }

    #[test]
    fn last_band_takes_remainder() {
        let bands = RowScheduler::new(3).bands(10);
        assert_eq!(
            bands,
            [
                Band { start: 0, rows: 3 },
                Band { start: 3, rows: 3 },
                Band { start: 6, rows: 4 },
            ]
        );
    }

    #[test]
    fn more_workers_than_rows_is_one_band() {
        let whole = [Band { start: 0, rows: 3 }];
        assert_eq!(RowScheduler::new(8).bands(3), whole);
        assert_eq!(RowScheduler::new(usize::MAX).bands(3), whole);
    }

    #[test]
    fn zero_parallelism_clamps_to_one() {
        assert_eq!(RowScheduler::new(0).parallelism(), 1);
    }
}
