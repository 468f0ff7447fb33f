use super::*;
use crate::{Yuv420Layout, bgr_to_yuv420};

/// Serialize a minimal solid-color 24-bit BMP.
fn solid_bmp_bytes(width: u32, height: u32, bgr: [u8; 3]) -> Vec<u8> {
    let padding = (4 - (3 * width) % 4) % 4;
    let stride = 3 * width + padding;
    let mut out = Vec::new();
    out.extend_from_slice(&0x4D42u16.to_le_bytes());
    out.extend_from_slice(&(54 + height * stride).to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&54u32.to_le_bytes());
    out.extend_from_slice(&40u32.to_le_bytes());
    out.extend_from_slice(&width.to_le_bytes());
    out.extend_from_slice(&height.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&24u16.to_le_bytes());
    out.extend_from_slice(&[0u8; 24]);
    for _ in 0..height {
        for _ in 0..width {
            out.extend_from_slice(&bgr);
        }
        out.extend(std::iter::repeat_n(0u8, padding as usize));
    }
    out
}

/// Decode and convert a solid-color image, ready to stamp.
fn converted_image(dir: &tempfile::TempDir, width: u32, height: u32, bgr: [u8; 3]) -> Image {
    let path = dir.path().join("stamp.bmp");
    std::fs::write(&path, solid_bmp_bytes(width, height, bgr)).unwrap();
    let mut image = Image::decode(&path).unwrap();
    bgr_to_yuv420(&mut image).unwrap();
    image
}

fn white_video(dir: &tempfile::TempDir, width: u32, height: u32, frames: u32) -> FrameSequence {
    let frame_len = Yuv420Layout::new(width, height).frame_len();
    let path = dir.path().join("video.yuv");
    std::fs::write(&path, vec![255u8; frame_len * frames as usize]).unwrap();
    FrameSequence::load(&path, width, height, frames).unwrap()
}

#[test]
fn black_stamp_touches_exactly_one_chroma_block() {
    let dir = tempfile::tempdir().unwrap();
    let image = converted_image(&dir, 2, 2, [0, 0, 0]);
    let mut video = white_video(&dir, 6, 4, 1);

    video.overlay(&image, 0, 0).unwrap();

    let layout = video.layout();
    let mut expected = vec![255u8; layout.frame_len()];
    // 2x2 luma block at the top-left
    expected[0] = 16;
    expected[1] = 16;
    expected[6] = 16;
    expected[7] = 16;
    // one U and one V sample for that block
    expected[layout.u_offset()] = 128;
    expected[layout.v_offset()] = 128;

    assert_eq!(video.frame(0), expected);
}

#[test]
fn even_offset_lands_on_the_chroma_grid() {
    let dir = tempfile::tempdir().unwrap();
    let image = converted_image(&dir, 2, 2, [0, 0, 0]);
    let mut video = white_video(&dir, 6, 4, 1);

    video.overlay(&image, 2, 2).unwrap();

    let layout = video.layout();
    let mut expected = vec![255u8; layout.frame_len()];
    // luma rows 2..4, columns 2..4
    expected[layout.y_row(2).start + 2] = 16;
    expected[layout.y_row(2).start + 3] = 16;
    expected[layout.y_row(3).start + 2] = 16;
    expected[layout.y_row(3).start + 3] = 16;
    // chroma row 1, chroma column 1
    expected[layout.u_row(1).start + 1] = 128;
    expected[layout.v_row(1).start + 1] = 128;

    assert_eq!(video.frame(0), expected);
}

#[test]
fn delta_is_identical_in_every_frame() {
    let dir = tempfile::tempdir().unwrap();
    let image = converted_image(&dir, 2, 2, [0, 0, 0]);
    let mut video = white_video(&dir, 6, 4, 3);

    video.overlay(&image, 2, 0).unwrap();

    assert_eq!(video.frame_count(), 3);
    assert_eq!(video.frame(0), video.frame(1));
    assert_eq!(video.frame(1), video.frame(2));
}

#[test]
fn out_of_bounds_overlay_mutates_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let image = converted_image(&dir, 2, 2, [0, 0, 0]);
    let mut video = white_video(&dir, 6, 4, 2);
    let frame_len = video.layout().frame_len();

    let err = video.overlay(&image, 6, 0).unwrap_err();
    assert!(matches!(err, YuvstampError::Argument(_)), "{err}");
    assert!(err.to_string().contains("exceeds"), "{err}");

    let err = video.overlay(&image, 0, 4).unwrap_err();
    assert!(matches!(err, YuvstampError::Argument(_)), "{err}");

    for i in 0..video.frame_count() {
        assert_eq!(video.frame(i), vec![255u8; frame_len], "frame {i} changed");
    }
}

#[test]
fn odd_offset_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let image = converted_image(&dir, 2, 2, [0, 0, 0]);
    let mut video = white_video(&dir, 6, 4, 1);

    let err = video.overlay(&image, 1, 0).unwrap_err();
    assert!(err.to_string().contains("even"), "{err}");
    let err = video.overlay(&image, 0, 1).unwrap_err();
    assert!(err.to_string().contains("even"), "{err}");
}

#[test]
fn unconverted_source_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stamp.bmp");
    std::fs::write(&path, solid_bmp_bytes(2, 2, [0, 0, 0])).unwrap();
    let image = Image::decode(&path).unwrap();
    let mut video = white_video(&dir, 6, 4, 1);

    let err = video.overlay(&image, 0, 0).unwrap_err();
    assert!(matches!(err, YuvstampError::Argument(_)), "{err}");
    assert!(err.to_string().contains("Yuv420"), "{err}");
}
