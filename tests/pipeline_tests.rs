//! End-to-end tests: rendered RGBA frames through the full pipeline

mod common;

use common::{HELLO_WORLD_TEXT, hello_world_grid, invert_frame, render_frame};
use pixelqr::{DecodeOptions, ECLevel, InversionAttempts, decode, decode_in_place};

const SCALE: usize = 8;
const MARGIN: usize = 16;

#[test]
fn decodes_rendered_symbol() {
    let (pixels, width, height) = render_frame(&hello_world_grid(), SCALE, MARGIN);
    let symbol = decode(&pixels, width, height, &DecodeOptions::default()).unwrap();
    assert_eq!(symbol.text, HELLO_WORLD_TEXT);
    assert_eq!(symbol.version, 1);
    assert_eq!(symbol.ec_level, ECLevel::M);
    assert_eq!(symbol.data_mask, 0);
    assert!(!symbol.mirrored);
}

#[test]
fn location_lands_on_rendered_corners() {
    let (pixels, width, height) = render_frame(&hello_world_grid(), SCALE, MARGIN);
    let symbol = decode(&pixels, width, height, &DecodeOptions::default()).unwrap();

    // The symbol occupies a 21-module square starting at the margin.
    let left = MARGIN as f32;
    let right = (MARGIN + 21 * SCALE) as f32;
    let l = &symbol.location;
    let tolerance = SCALE as f32;
    assert!((l.top_left_corner.x - left).abs() < tolerance, "{l:?}");
    assert!((l.top_left_corner.y - left).abs() < tolerance, "{l:?}");
    assert!((l.bottom_right_corner.x - right).abs() < tolerance, "{l:?}");
    assert!((l.bottom_right_corner.y - right).abs() < tolerance, "{l:?}");

    // Finder centers sit 3.5 modules in from their corners.
    let finder = (MARGIN as f32) + 3.5 * SCALE as f32;
    assert!((l.top_left_finder.x - finder).abs() < tolerance, "{l:?}");
    assert!((l.top_left_finder.y - finder).abs() < tolerance, "{l:?}");
}

#[test]
fn decodes_inverted_symbol_by_default() {
    let (mut pixels, width, height) = render_frame(&hello_world_grid(), SCALE, MARGIN);
    invert_frame(&mut pixels);
    let symbol = decode(&pixels, width, height, &DecodeOptions::default()).unwrap();
    assert_eq!(symbol.text, HELLO_WORLD_TEXT);
}

#[test]
fn dont_invert_rejects_inverted_symbol() {
    let (mut pixels, width, height) = render_frame(&hello_world_grid(), SCALE, MARGIN);
    invert_frame(&mut pixels);
    let options = DecodeOptions {
        inversion_attempts: InversionAttempts::DontInvert,
        ..DecodeOptions::default()
    };
    assert!(decode(&pixels, width, height, &options).is_none());
}

#[test]
fn only_invert_rejects_normal_symbol() {
    let (pixels, width, height) = render_frame(&hello_world_grid(), SCALE, MARGIN);
    let options = DecodeOptions {
        inversion_attempts: InversionAttempts::OnlyInvert,
        ..DecodeOptions::default()
    };
    assert!(decode(&pixels, width, height, &options).is_none());
}

#[test]
fn invert_first_still_finds_normal_symbol() {
    let (pixels, width, height) = render_frame(&hello_world_grid(), SCALE, MARGIN);
    let options = DecodeOptions {
        inversion_attempts: InversionAttempts::InvertFirst,
        ..DecodeOptions::default()
    };
    let symbol = decode(&pixels, width, height, &options).unwrap();
    assert_eq!(symbol.text, HELLO_WORLD_TEXT);
}

#[test]
fn in_place_decode_matches_borrowing_decode() {
    let (pixels, width, height) = render_frame(&hello_world_grid(), SCALE, MARGIN);
    let borrowed = decode(&pixels, width, height, &DecodeOptions::default()).unwrap();

    let mut scratch = pixels.clone();
    let in_place =
        decode_in_place(&mut scratch, width, height, &DecodeOptions::default()).unwrap();
    assert_eq!(in_place, borrowed);
}

#[test]
fn integer_greyscale_weights_still_decode() {
    let (pixels, width, height) = render_frame(&hello_world_grid(), SCALE, MARGIN);
    let options = DecodeOptions {
        greyscale_weights: pixelqr::GreyscaleWeights::integer_approximation(),
        ..DecodeOptions::default()
    };
    let symbol = decode(&pixels, width, height, &options).unwrap();
    assert_eq!(symbol.text, HELLO_WORLD_TEXT);
}

#[test]
fn mirrored_frame_decodes_with_flag() {
    let mut grid = hello_world_grid();
    grid.mirror();
    let (pixels, width, height) = render_frame(&grid, SCALE, MARGIN);
    let symbol = decode(&pixels, width, height, &DecodeOptions::default()).unwrap();
    assert_eq!(symbol.text, HELLO_WORLD_TEXT);
    assert!(symbol.mirrored);
}

#[test]
fn small_scale_render_still_decodes() {
    let (pixels, width, height) = render_frame(&hello_world_grid(), 3, 12);
    let symbol = decode(&pixels, width, height, &DecodeOptions::default()).unwrap();
    assert_eq!(symbol.text, HELLO_WORLD_TEXT);
}

#[test]
fn blank_frame_yields_nothing() {
    let pixels = vec![255u8; 200 * 200 * 4];
    assert!(decode(&pixels, 200, 200, &DecodeOptions::default()).is_none());
}
