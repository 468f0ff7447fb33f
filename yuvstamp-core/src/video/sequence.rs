use std::path::Path;

use crate::foundation::error::{YuvstampError, YuvstampResult};
use crate::foundation::plane::Yuv420Layout;

/// A fixed-count sequence of same-sized planar YUV 4:2:0 frame buffers.
///
/// Backed by a headerless raw file: `frame_count` consecutive records of
/// `width * height * 3 / 2` bytes each, with no metadata and no separators.
/// Fully populated at construction; the overlay operation mutates frame
/// contents in place but never their count or sizes.
#[derive(Clone, Debug)]
pub struct FrameSequence {
    width: u32,
    height: u32,
    frames: Vec<Vec<u8>>,
}

impl FrameSequence {
    /// Load `frame_count` frames of `width` x `height` from a raw YUV file.
    ///
    /// The file must hold at least `frame_count` full frames; trailing bytes
    /// beyond that are ignored, so a prefix of a longer stream can be loaded.
    pub fn load(
        path: impl AsRef<Path>,
        width: u32,
        height: u32,
        frame_count: u32,
    ) -> YuvstampResult<Self> {
        if width == 0 || height == 0 || !width.is_multiple_of(2) || !height.is_multiple_of(2) {
            return Err(YuvstampError::argument(format!(
                "frame dimensions {width}x{height} must be non-zero and even"
            )));
        }
        if frame_count == 0 {
            return Err(YuvstampError::argument("frame count must be >= 1"));
        }

        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| YuvstampError::io(format!("read video '{}': {e}", path.display())))?;

        let frame_len = Yuv420Layout::new(width, height).frame_len();
        let needed = frame_len as u64 * u64::from(frame_count);
        if (bytes.len() as u64) < needed {
            return Err(YuvstampError::format(format!(
                "video file '{}' too short: {frame_count} frames of {width}x{height} need \
                 {needed} bytes, file has {}",
                path.display(),
                bytes.len()
            )));
        }

        let frames: Vec<Vec<u8>> = bytes
            .chunks_exact(frame_len)
            .take(frame_count as usize)
            .map(<[u8]>::to_vec)
            .collect();

        tracing::debug!(width, height, frame_count, path = %path.display(), "loaded video");
        Ok(Self {
            width,
            height,
            frames,
        })
    }

    /// Write every frame buffer sequentially with no separators, restoring a
    /// valid raw multi-frame YUV 4:2:0 stream.
    pub fn save(&self, path: impl AsRef<Path>) -> YuvstampResult<()> {
        let path = path.as_ref();
        let mut out = Vec::with_capacity(self.frames.len() * self.layout().frame_len());
        for frame in &self.frames {
            out.extend_from_slice(frame);
        }
        std::fs::write(path, out)
            .map_err(|e| YuvstampError::io(format!("write video '{}': {e}", path.display())))
    }

    /// Frame width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Frame height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of frames.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// The buffer of frame `index`; panics if out of range.
    pub fn frame(&self, index: usize) -> &[u8] {
        &self.frames[index]
    }

    /// Plane layout shared by every frame buffer.
    pub fn layout(&self) -> Yuv420Layout {
        Yuv420Layout::new(self.width, self.height)
    }

    pub(crate) fn frames_mut(&mut self) -> &mut [Vec<u8>] {
        &mut self.frames
    }
}

#[cfg(test)]
#[path = "../../tests/unit/video/sequence.rs"]
mod tests;
