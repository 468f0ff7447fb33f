use std::ops::Range;
use std::path::Path;

use crate::bitmap::header::{BMP_SIGNATURE, BmpFileHeader, BmpInfoHeader, SUPPORTED_BIT_DEPTH};
use crate::foundation::error::{YuvstampError, YuvstampResult};
use crate::foundation::plane::Yuv420Layout;

const HEADER_BYTES: usize = BmpFileHeader::SIZE + BmpInfoHeader::SIZE;

/// Color model currently held by an [`Image`] buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorModel {
    /// Interleaved 8-bit blue/green/red triples, row-major, top row first.
    Bgr,
    /// Planar YUV 4:2:0: full-resolution Y plane, then quarter-size U and V
    /// planes, laid out per [`Yuv420Layout`].
    Yuv420,
}

/// A decoded bitmap and, after conversion, its planar YUV 4:2:0 form.
///
/// Created by [`Image::decode`]; mutated in place by
/// [`bgr_to_yuv420`](crate::bgr_to_yuv420), which replaces the buffer and
/// flips the model tag; read-only afterwards as an overlay source.
#[derive(Clone, Debug)]
pub struct Image {
    width: u32,
    height: u32,
    bytes_per_pixel: u32,
    model: ColorModel,
    data: Vec<u8>,
    file_header: BmpFileHeader,
    info_header: BmpInfoHeader,
}

impl Image {
    /// Decode a 24-bit uncompressed bottom-up BMP file.
    ///
    /// The whole file is materialized in memory. Validation is fail-fast and
    /// field-level: signature, bit depth, and the info header's self-reported
    /// size are checked before geometry is trusted, and the file length must
    /// match the header geometry exactly before any pixel data is copied.
    pub fn decode(path: impl AsRef<Path>) -> YuvstampResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| YuvstampError::io(format!("read bmp '{}': {e}", path.display())))?;

        if bytes.len() < HEADER_BYTES {
            return Err(YuvstampError::format(format!(
                "bmp shorter than its {HEADER_BYTES}-byte header pair: {} bytes",
                bytes.len()
            )));
        }

        let file_header = BmpFileHeader::parse(&bytes[..BmpFileHeader::SIZE]);
        let info_header = BmpInfoHeader::parse(&bytes[BmpFileHeader::SIZE..HEADER_BYTES]);

        if file_header.signature != BMP_SIGNATURE {
            return Err(YuvstampError::format(format!(
                "bad bmp signature 0x{:04X}, expected 0x{BMP_SIGNATURE:04X} (\"BM\")",
                file_header.signature
            )));
        }
        if info_header.bit_depth != SUPPORTED_BIT_DEPTH {
            return Err(YuvstampError::format(format!(
                "unsupported bit depth {}, expected {SUPPORTED_BIT_DEPTH}",
                info_header.bit_depth
            )));
        }
        if info_header.size != BmpInfoHeader::SIZE as u32 {
            return Err(YuvstampError::format(format!(
                "info header reports {} bytes, expected {}",
                info_header.size,
                BmpInfoHeader::SIZE
            )));
        }
        if info_header.width == 0 || info_header.height == 0 {
            return Err(YuvstampError::format(format!(
                "zero-sized bitmap {}x{}",
                info_header.width, info_header.height
            )));
        }

        let width = info_header.width;
        let height = info_header.height;
        let bytes_per_pixel = u32::from(info_header.bit_depth) / 8;
        let padding = row_padding(width);

        // The size equation runs before the pixel buffer is allocated, so a
        // lying header can never force a huge allocation.
        let expected =
            HEADER_BYTES as u64 + u64::from(height) * (3 * u64::from(width) + u64::from(padding));
        if bytes.len() as u64 != expected {
            return Err(YuvstampError::format(format!(
                "bmp size mismatch: {width}x{height} with {padding} padding bytes per row \
                 implies {expected} bytes, file has {}",
                bytes.len()
            )));
        }

        let mut image = Self {
            width,
            height,
            bytes_per_pixel,
            model: ColorModel::Bgr,
            data: vec![0u8; height as usize * width as usize * bytes_per_pixel as usize],
            file_header,
            info_header,
        };

        // Rows are stored bottom-up: physical row i is logical row height-1-i.
        let src_stride = width as usize * bytes_per_pixel as usize + padding as usize;
        for i in 0..height {
            let src_start = HEADER_BYTES + i as usize * src_stride;
            let dst = image.bgr_row_range(height - 1 - i);
            let row_len = dst.len();
            image.data[dst].copy_from_slice(&bytes[src_start..src_start + row_len]);
        }

        tracing::debug!(width, height, path = %path.display(), "decoded bmp");
        Ok(image)
    }

    /// Save the image, selecting the output form by the current color model.
    ///
    /// A BGR image re-emits the stored header pair verbatim followed by
    /// bottom-up zero-padded rows, reproducing the decoded file byte for
    /// byte. A converted image is written as a headerless raw planar
    /// YUV 4:2:0 dump. The two forms are not cross-compatible.
    pub fn save(&self, path: impl AsRef<Path>) -> YuvstampResult<()> {
        let path = path.as_ref();
        match self.model {
            ColorModel::Bgr => std::fs::write(path, self.encode_bmp()),
            ColorModel::Yuv420 => std::fs::write(path, &self.data),
        }
        .map_err(|e| YuvstampError::io(format!("write '{}': {e}", path.display())))
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per pixel of the decoded BGR form (3 for the supported depth).
    pub fn bytes_per_pixel(&self) -> u32 {
        self.bytes_per_pixel
    }

    /// Number of pixels (`width * height`).
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// The current color model of the pixel buffer.
    pub fn color_model(&self) -> ColorModel {
        self.model
    }

    /// The pixel buffer in the layout implied by [`Self::color_model`].
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Plane layout of the converted buffer; meaningful only once the model
    /// is [`ColorModel::Yuv420`].
    pub fn yuv_layout(&self) -> Yuv420Layout {
        Yuv420Layout::new(self.width, self.height)
    }

    /// Replace the buffer with its converted planar form and flip the tag.
    pub(crate) fn install_yuv420(&mut self, data: Vec<u8>) {
        self.data = data;
        self.model = ColorModel::Yuv420;
    }

    /// Byte range of logical BGR row `row` (row 0 is the visual top).
    fn bgr_row_range(&self, row: u32) -> Range<usize> {
        let stride = self.width as usize * self.bytes_per_pixel as usize;
        let start = row as usize * stride;
        start..start + stride
    }

    fn encode_bmp(&self) -> Vec<u8> {
        let padding = row_padding(self.width) as usize;
        let stride = self.width as usize * self.bytes_per_pixel as usize;
        let mut out = Vec::with_capacity(HEADER_BYTES + self.height as usize * (stride + padding));
        self.file_header.write_into(&mut out);
        self.info_header.write_into(&mut out);
        for i in 0..self.height {
            out.extend_from_slice(&self.data[self.bgr_row_range(self.height - 1 - i)]);
            out.extend(std::iter::repeat_n(0u8, padding));
        }
        out
    }
}

/// Zero bytes appended to each row so its length is a multiple of 4.
fn row_padding(width: u32) -> u32 {
    ((4 - (3 * u64::from(width)) % 4) % 4) as u32
}

#[cfg(test)]
#[path = "../../tests/unit/bitmap/image.rs"]
mod tests;
