//! # zenfbdump
//!
//! Framebuffer pixel decoder and PBM/PGM/PPM/BMP encoder.
//!
//! Takes the raw contents of a display surface (a memory-mapped or read-in
//! framebuffer), decodes its bit-packed pixels through a color table, and
//! writes a complete image file into memory. Opening the device and writing
//! the file are left to the caller.
//!
//! ## Supported Formats
//!
//! ### Netpbm family
//! - **P4** (PBM): 1 bpp monochrome sources
//! - **P5** (PGM): 8-bit luma
//! - **P6** (PPM): 24-bit RGB
//!
//! ### BMP
//! - 1-bit with a black/white palette, 8-bit with a gray palette, 24-bit BGR.
//!   Rows are stored top-down (negative height) and padded to 4 bytes.
//!
//! ## Source pixels
//!
//! Any packed layout of 8 to 32 bits per pixel with red, green and blue
//! bitfields of at most 8 bits each, plus 1 bpp monochrome. Pixels are read
//! little-endian regardless of host byte order.
//!
//! ## Non-Goals
//!
//! - Compression of any kind
//! - Components deeper than 8 bits
//! - Color management beyond the fixed RGB/luma model
//!
//! ## Usage
//!
//! ```no_run
//! use zenfbdump::{ColorModel, EncodeRequest, PixelLayout, TargetFormat, Unstoppable, Visual};
//!
//! let layout = PixelLayout::rgb565(320, 240);
//! let model = ColorModel::for_visual(Visual::TrueColor, &layout, None)?;
//! let framebuffer: &[u8] = &[]; // mapped device memory
//!
//! let image = EncodeRequest::new(layout, &model, framebuffer)
//!     .format(TargetFormat::Pgm)
//!     .parallelism(4)
//!     .encode(Unstoppable)?;
//! let file: &[u8] = image.as_bytes();
//! # let _ = file;
//! # Ok::<(), zenfbdump::CaptureError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

mod color;
mod encode;
mod error;
mod extract;
mod format;
mod limits;
mod output;
mod pixel;
mod row;
mod schedule;

pub mod bmp;
pub mod pnm;

// Re-exports
pub use color::{ColorModel, ColorTable, Visual, luma};
pub use encode::{EncodeRequest, encode};
pub use enough::{Stop, Unstoppable};
pub use error::CaptureError;
pub use extract::{PixelReader, read_pixel};
pub use format::{ChannelOrder, ColorMode, Container, PixelEncoding, TargetFormat};
pub use limits::Limits;
pub use output::{ContainerHeader, OutputImage};
pub use pixel::{Bitfield, Channel, PixelLayout};
pub use row::{Bilevel, FormatEncoder, Grayscale, RowEncoder, TrueColor};
pub use schedule::{Band, RowScheduler};
