use crate::bitmap::image::{ColorModel, Image};
use crate::foundation::error::{YuvstampError, YuvstampResult};

/// Band partitioning configuration for [`bgr_to_yuv420_with`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConvertThreading {
    /// Number of row bands to convert concurrently. `None` uses the rayon
    /// pool's current thread count. Output is byte-identical for any value.
    pub bands: Option<usize>,
}

/// Convert a BGR image to planar YUV 4:2:0 in place, using one band per
/// worker thread.
pub fn bgr_to_yuv420(image: &mut Image) -> YuvstampResult<()> {
    bgr_to_yuv420_with(image, &ConvertThreading::default())
}

/// Convert a BGR image to planar YUV 4:2:0 in place.
///
/// Uses the BT.601 fixed-point kernel with integer arithmetic and arithmetic
/// shifts:
///
/// ```text
/// Y = ((66*R + 129*G + 25*B) >> 8) + 16        every pixel
/// U = ((-38*R - 74*G + 112*B) >> 8) + 128      even rows, even columns
/// V = ((112*R - 94*G - 18*B) >> 8) + 128       even rows, odd columns
/// ```
///
/// giving one U and one V sample per 2x2 luma block. No clamping is applied;
/// out-of-gamut synthetic input wraps, which is accepted behavior for the
/// nominal 8-bit range.
///
/// Rows are split into contiguous bands, each rounded down to an even row
/// count so no chroma block straddles a band; the remainder goes to the last
/// band. Bands write disjoint, statically split regions of the destination
/// planes, so the pixel math runs lock-free; the call joins all bands before
/// the buffer is replaced and the color-model tag flips to
/// [`ColorModel::Yuv420`].
pub fn bgr_to_yuv420_with(image: &mut Image, threading: &ConvertThreading) -> YuvstampResult<()> {
    if image.color_model() != ColorModel::Bgr {
        return Err(YuvstampError::argument(format!(
            "conversion requires a {:?} image, got {:?}",
            ColorModel::Bgr,
            image.color_model()
        )));
    }
    let width = image.width();
    let height = image.height();
    if !width.is_multiple_of(2) || !height.is_multiple_of(2) {
        return Err(YuvstampError::argument(format!(
            "image dimensions {width}x{height} must be even for 4:2:0 chroma subsampling"
        )));
    }
    let requested = match threading.bands {
        Some(0) => {
            return Err(YuvstampError::argument(
                "convert threading 'bands' must be >= 1 when set",
            ));
        }
        Some(n) => n,
        None => rayon::current_num_threads(),
    };

    let layout = image.yuv_layout();
    let bands = partition_even_rows(height, requested);
    let mut data = vec![0u8; layout.frame_len()];

    {
        let src = image.data();
        let (y_plane, chroma) = data.split_at_mut(layout.y_len());
        let (u_plane, v_plane) = chroma.split_at_mut(layout.chroma_len());

        let mut jobs = Vec::with_capacity(bands.len());
        let (mut y_rest, mut u_rest, mut v_rest) = (y_plane, u_plane, v_plane);
        for band in bands {
            let y_bytes = band.rows as usize * width as usize;
            let c_bytes = (band.rows as usize / 2) * (width as usize / 2);
            let (y_band, rest) = y_rest.split_at_mut(y_bytes);
            y_rest = rest;
            let (u_band, rest) = u_rest.split_at_mut(c_bytes);
            u_rest = rest;
            let (v_band, rest) = v_rest.split_at_mut(c_bytes);
            v_rest = rest;
            jobs.push((band, y_band, u_band, v_band));
        }

        rayon::scope(|s| {
            for (band, y_band, u_band, v_band) in jobs {
                s.spawn(move |_| {
                    convert_band(src, width, band, y_band, u_band, v_band);
                    tracing::debug!(start_row = band.start, rows = band.rows, "converted band");
                });
            }
        });
    }

    image.install_yuv420(data);
    Ok(())
}

/// A contiguous run of image rows handled by one worker. `start` and `rows`
/// are always even except that the last band absorbs the (even) remainder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct RowBand {
    start: u32,
    rows: u32,
}

/// Split `height` rows (even, >= 2) into at most `requested` even-sized bands.
fn partition_even_rows(height: u32, requested: usize) -> Vec<RowBand> {
    let max_bands = (height / 2) as usize;
    let count = requested.clamp(1, max_bands) as u32;
    let per = (height / count) & !1;
    let mut bands = Vec::with_capacity(count as usize);
    for i in 0..count {
        let start = i * per;
        let rows = if i == count - 1 { height - start } else { per };
        bands.push(RowBand { start, rows });
    }
    bands
}

fn convert_band(
    src: &[u8],
    width: u32,
    band: RowBand,
    y_out: &mut [u8],
    u_out: &mut [u8],
    v_out: &mut [u8],
) {
    let width = width as usize;
    let chroma_width = width / 2;
    for local in 0..band.rows as usize {
        let row_base = (band.start as usize + local) * width * 3;

        let y_row = &mut y_out[local * width..(local + 1) * width];
        for (x, y_px) in y_row.iter_mut().enumerate() {
            let px = row_base + x * 3;
            let b = i32::from(src[px]);
            let g = i32::from(src[px + 1]);
            let r = i32::from(src[px + 2]);
            *y_px = (((66 * r + 129 * g + 25 * b) >> 8) + 16) as u8;
        }

        // band.start is even, so the global row is even iff `local` is.
        if local.is_multiple_of(2) {
            let chroma_base = (local / 2) * chroma_width;
            for x in 0..width {
                let px = row_base + x * 3;
                let b = i32::from(src[px]);
                let g = i32::from(src[px + 1]);
                let r = i32::from(src[px + 2]);
                if x.is_multiple_of(2) {
                    u_out[chroma_base + x / 2] = (((-38 * r - 74 * g + 112 * b) >> 8) + 128) as u8;
                } else {
                    v_out[chroma_base + x / 2] = (((112 * r - 94 * g - 18 * b) >> 8) + 128) as u8;
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/convert/bgr_to_yuv.rs"]
mod tests;
