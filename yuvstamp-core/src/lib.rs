//! Yuvstamp stamps a still image onto every frame of a raw YUV 4:2:0 video stream.
//!
//! The pipeline has three stages, each owned by one module:
//!
//! 1. **Decode**: a 24-bit uncompressed BMP file becomes an [`Image`] holding
//!    interleaved BGR pixels with row 0 at the visual top.
//! 2. **Convert**: [`bgr_to_yuv420`] rewrites the image in place to planar
//!    YUV 4:2:0 using the BT.601 fixed-point kernel, fanning the work out over
//!    row bands on a rayon pool.
//! 3. **Overlay**: [`FrameSequence::overlay`] copies the converted planes into
//!    every frame of a headerless YUV 4:2:0 stream at an even pixel offset.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Fail fast, no partial output**: every malformed input is rejected with a
//!   typed [`YuvstampError`] before any buffer or file is touched; nothing is
//!   ever half-written.
//! - **Deterministic-by-default**: conversion output is byte-identical for any
//!   band partitioning.
//! - **Whole files in memory**: there is no streaming decode; inputs and
//!   outputs are materialized as single contiguous buffers.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod bitmap;
mod convert;
mod foundation;
mod video;

pub use bitmap::image::{ColorModel, Image};
pub use convert::bgr_to_yuv::{ConvertThreading, bgr_to_yuv420, bgr_to_yuv420_with};
pub use foundation::error::{YuvstampError, YuvstampResult};
pub use foundation::plane::Yuv420Layout;
pub use video::sequence::FrameSequence;
