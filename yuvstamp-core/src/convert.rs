pub mod bgr_to_yuv;
