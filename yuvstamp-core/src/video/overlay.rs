use crate::bitmap::image::{ColorModel, Image};
use crate::foundation::error::{YuvstampError, YuvstampResult};
use crate::video::sequence::FrameSequence;

impl FrameSequence {
    /// Copy a converted image's Y/U/V planes into every frame at the given
    /// top-left offset.
    ///
    /// The copy is a hard overwrite of destination pixels (no blending), a
    /// plain byte-range transfer applied independently and identically to
    /// each frame. The image must already be [`ColorModel::Yuv420`], it must
    /// fit inside the frame bounds (no clamping or cropping), and both
    /// offsets must be even so the 2x2 chroma grid of the image lands on the
    /// frame's chroma grid. All checks run before the first frame is
    /// touched; a failed call mutates nothing.
    #[tracing::instrument(level = "debug", skip(self, image))]
    pub fn overlay(&mut self, image: &Image, offset_x: u32, offset_y: u32) -> YuvstampResult<()> {
        if image.color_model() != ColorModel::Yuv420 {
            return Err(YuvstampError::argument(format!(
                "overlay source must be {:?}, got {:?}",
                ColorModel::Yuv420,
                image.color_model()
            )));
        }
        if u64::from(image.width()) + u64::from(offset_x) > u64::from(self.width())
            || u64::from(image.height()) + u64::from(offset_y) > u64::from(self.height())
        {
            return Err(YuvstampError::argument(format!(
                "overlay of {}x{} at offset ({offset_x}, {offset_y}) exceeds the {}x{} frame",
                image.width(),
                image.height(),
                self.width(),
                self.height()
            )));
        }
        if !offset_x.is_multiple_of(2) || !offset_y.is_multiple_of(2) {
            return Err(YuvstampError::argument(format!(
                "overlay offset ({offset_x}, {offset_y}) must be even to stay on the 4:2:0 \
                 chroma grid"
            )));
        }

        let src = image.data();
        let src_layout = image.yuv_layout();
        let dst_layout = self.layout();
        let chroma_offset = (offset_x / 2) as usize;

        for frame in self.frames_mut() {
            for line in 0..image.height() {
                let src_row = &src[src_layout.y_row(line)];
                let dst_start = dst_layout.y_row(offset_y + line).start + offset_x as usize;
                frame[dst_start..dst_start + src_row.len()].copy_from_slice(src_row);

                if line.is_multiple_of(2) {
                    let dst_chroma_row = (offset_y + line) / 2;

                    let src_u = &src[src_layout.u_row(line / 2)];
                    let at = dst_layout.u_row(dst_chroma_row).start + chroma_offset;
                    frame[at..at + src_u.len()].copy_from_slice(src_u);

                    let src_v = &src[src_layout.v_row(line / 2)];
                    let at = dst_layout.v_row(dst_chroma_row).start + chroma_offset;
                    frame[at..at + src_v.len()].copy_from_slice(src_v);
                }
            }
        }

        tracing::debug!(frames = self.frame_count(), "overlay applied");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/video/overlay.rs"]
mod tests;
