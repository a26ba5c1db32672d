//! Tests for the captioning engine's font-independent parts.
//!
//! Full render tests need a real font file and are exercised through the
//! CLI; everything below runs without one.

use super::{
    bottom_block_start, encode_jpeg_data_url, premultiply_rgba8_in_place, rgba_premul_to_image,
    CaptionRenderer, PADDING,
};
use crate::error::MemeError;

#[test]
fn renderer_rejects_bytes_with_no_font() {
    let result = CaptionRenderer::new(vec![0x00, 0x01, 0x02, 0x03]);
    match result {
        Err(MemeError::ImageLoad(_)) => {}
        other => panic!("Expected MemeError::ImageLoad, got: {:?}", other.map(|_| ())),
    }
}

#[test]
fn bottom_block_last_line_ends_at_height_minus_padding() {
    let line_height = 24.0;
    for line_count in 0..4 {
        let start = bottom_block_start(480.0, line_count, line_height);
        let end = start + line_count as f32 * line_height;
        assert!((end - (480.0 - PADDING)).abs() < f32::EPSILON);
    }
}

#[test]
fn empty_bottom_block_starts_flush_to_bottom_padding() {
    assert_eq!(bottom_block_start(100.0, 0, 12.0), 90.0);
}

#[test]
fn premultiply_zero_alpha_clears_color() {
    let mut px = [200, 100, 50, 0];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(px, [0, 0, 0, 0]);
}

#[test]
fn premultiply_full_alpha_is_identity() {
    let mut px = [200, 100, 50, 255];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(px, [200, 100, 50, 255]);
}

#[test]
fn premul_image_rejects_byte_len_mismatch() {
    let result = rgba_premul_to_image(&[0u8; 8], 3, 3);
    match result {
        Err(MemeError::ImageLoad(_)) => {}
        Err(other) => panic!("Expected MemeError::ImageLoad, got: {other:?}"),
        Ok(_) => panic!("Expected error for mismatched byte length"),
    }
}

#[test]
fn premul_image_accepts_exact_buffer() {
    let bytes = vec![255u8; 2 * 2 * 4];
    assert!(rgba_premul_to_image(&bytes, 2, 2).is_ok());
}

#[test]
fn data_url_has_jpeg_prefix_and_decodes() {
    use base64::Engine as _;

    // 2x2 opaque gray surface, premultiplied == straight at full alpha.
    let premul = vec![
        128, 128, 128, 255, 128, 128, 128, 255, //
        128, 128, 128, 255, 128, 128, 128, 255,
    ];
    let url = encode_jpeg_data_url(&premul, 2, 2).unwrap();
    assert!(url.starts_with("data:image/jpeg;base64,"));

    let payload = url.strip_prefix("data:image/jpeg;base64,").unwrap();
    let jpeg = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .unwrap();
    let decoded = image::load_from_memory(&jpeg).unwrap();
    assert_eq!(decoded.width(), 2);
    assert_eq!(decoded.height(), 2);
}
