//! Symbol rendering fixtures shared by the integration tests and benches.
//!
//! Everything here is written against the public API only, independently of
//! the library's internal write-back code, so a bug in the decoder cannot be
//! masked by rendering with the same routines under test.

// Each test and bench binary compiles its own copy and uses a subset.
#![allow(dead_code)]

use pixelqr::BitMatrix;
use pixelqr::decode::format::{DATA_MASKS, format_bits};
use pixelqr::decode::reed_solomon::Gf256;
use pixelqr::decode::version::Version;
use pixelqr::models::ECLevel;

/// "HELLO WORLD" in alphanumeric mode, padded to the 16 data codewords of a
/// version 1 EC-M symbol
pub const HELLO_WORLD_DATA: [u8; 16] = [
    0x20, 0x5B, 0x0B, 0x78, 0xD1, 0x72, 0xDC, 0x4D, 0x43, 0x40, 0xEC, 0x11, 0xEC, 0x11, 0xEC, 0x11,
];

/// The decoded text of [`HELLO_WORLD_DATA`]
pub const HELLO_WORLD_TEXT: &str = "HELLO WORLD";

/// A version 1 EC-M mask 0 module grid spelling [`HELLO_WORLD_TEXT`]
pub fn hello_world_grid() -> BitMatrix {
    render_grid(1, ECLevel::M, 0, &HELLO_WORLD_DATA)
}

/// Append `num_ec` Reed-Solomon codewords to `data` (generator roots at
/// alpha^0 and up).
pub fn rs_encode(data: &[u8], num_ec: usize) -> Vec<u8> {
    // Generator polynomial, highest degree first, leading coefficient 1.
    let mut generator = vec![1u8];
    for i in 0..num_ec {
        let mut next = vec![0u8; generator.len() + 1];
        for (j, &c) in generator.iter().enumerate() {
            next[j] ^= c;
            next[j + 1] ^= Gf256::mul(c, Gf256::exp(i));
        }
        generator = next;
    }

    let mut remainder = data.to_vec();
    remainder.resize(data.len() + num_ec, 0);
    for i in 0..data.len() {
        let factor = remainder[i];
        if factor != 0 {
            for (j, &g) in generator.iter().enumerate().skip(1) {
                remainder[i + j] ^= Gf256::mul(g, factor);
            }
        }
    }

    let mut codeword = data.to_vec();
    codeword.extend_from_slice(&remainder[data.len()..]);
    codeword
}

/// Render a complete module grid for a single-block symbol.
///
/// Only versions whose chosen error correction level uses exactly one block
/// are supported; that keeps the fixture free of interleaving logic.
pub fn render_grid(
    version_number: usize,
    ec_level: ECLevel,
    data_mask: u8,
    data_codewords: &[u8],
) -> BitMatrix {
    let version = Version::for_number(version_number).expect("fixture version");
    let spec = &version.error_correction[ec_level.code() as usize];
    assert_eq!(
        spec.block_groups.iter().map(|g| g.num_blocks).sum::<usize>(),
        1,
        "fixture renderer only handles single-block symbols",
    );
    assert_eq!(
        data_codewords.len(),
        spec.block_groups[0].data_codewords_per_block,
        "fixture data codeword count",
    );
    let codewords = rs_encode(data_codewords, spec.ec_codewords_per_block);

    let dimension = 17 + 4 * version_number;
    let mut grid = BitMatrix::new(dimension, dimension);
    draw_function_patterns(&mut grid, version);
    write_format_bits(
        &mut grid,
        format_bits(ec_level, data_mask).expect("format table entry"),
    );
    if let Some(bits) = version.info_bits {
        write_version_bits(&mut grid, bits);
    }
    write_data_modules(&mut grid, version, data_mask, &codewords);
    grid
}

/// Paint a module grid into an RGBA frame, black on white, `scale` pixels per
/// module with a quiet border of `margin` pixels on every side. Returns the
/// pixel buffer and the frame dimensions.
pub fn render_frame(grid: &BitMatrix, scale: usize, margin: usize) -> (Vec<u8>, usize, usize) {
    let width = grid.width() * scale + 2 * margin;
    let height = grid.height() * scale + 2 * margin;
    let mut pixels = vec![255u8; width * height * 4];
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            if !grid.get(x, y) {
                continue;
            }
            for py in 0..scale {
                for px in 0..scale {
                    let index = ((margin + y * scale + py) * width + margin + x * scale + px) * 4;
                    pixels[index] = 0;
                    pixels[index + 1] = 0;
                    pixels[index + 2] = 0;
                }
            }
        }
    }
    (pixels, width, height)
}

/// Invert every color channel of an RGBA frame, leaving alpha alone.
pub fn invert_frame(pixels: &mut [u8]) {
    for chunk in pixels.chunks_exact_mut(4) {
        chunk[0] = 255 - chunk[0];
        chunk[1] = 255 - chunk[1];
        chunk[2] = 255 - chunk[2];
    }
}

fn function_mask(version: &Version, dimension: usize) -> BitMatrix {
    let mut mask = BitMatrix::new(dimension, dimension);
    mask.set_region(0, 0, 9, 9, true);
    mask.set_region(dimension - 8, 0, 8, 9, true);
    mask.set_region(0, dimension - 8, 9, 8, true);
    for &x in version.alignment_pattern_centers {
        for &y in version.alignment_pattern_centers {
            if (x == 6 && y == 6)
                || (x == 6 && y == dimension - 7)
                || (x == dimension - 7 && y == 6)
            {
                continue;
            }
            mask.set_region(x - 2, y - 2, 5, 5, true);
        }
    }
    if version.info_bits.is_some() {
        mask.set_region(dimension - 11, 0, 3, 6, true);
        mask.set_region(0, dimension - 11, 6, 3, true);
    }
    mask.set_region(6, 9, 1, dimension - 17, true);
    mask.set_region(9, 6, dimension - 17, 1, true);
    mask
}

fn draw_function_patterns(grid: &mut BitMatrix, version: &Version) {
    let dimension = grid.height();
    for (left, top) in [(0, 0), (dimension - 7, 0), (0, dimension - 7)] {
        for dy in 0..7 {
            for dx in 0..7 {
                let ring = dx == 0 || dx == 6 || dy == 0 || dy == 6;
                let center = (2..=4).contains(&dx) && (2..=4).contains(&dy);
                grid.set(left + dx, top + dy, ring || center);
            }
        }
    }
    for i in 8..dimension - 8 {
        grid.set(i, 6, i % 2 == 0);
        grid.set(6, i, i % 2 == 0);
    }
    for &cx in version.alignment_pattern_centers {
        for &cy in version.alignment_pattern_centers {
            if (cx == 6 && cy == 6)
                || (cx == 6 && cy == dimension - 7)
                || (cx == dimension - 7 && cy == 6)
            {
                continue;
            }
            for dy in -2i32..=2 {
                for dx in -2i32..=2 {
                    let black = dx.abs().max(dy.abs()) != 1;
                    grid.set((cx as i32 + dx) as usize, (cy as i32 + dy) as usize, black);
                }
            }
        }
    }
    grid.set(8, dimension - 8, true);
}

fn write_format_bits(grid: &mut BitMatrix, bits: u16) {
    let mut bit_index = 14i32;
    for x in 0..=8 {
        if x != 6 {
            grid.set(x, 8, bits >> bit_index & 1 == 1);
            bit_index -= 1;
        }
    }
    for y in (0..=7).rev() {
        if y != 6 {
            grid.set(8, y, bits >> bit_index & 1 == 1);
            bit_index -= 1;
        }
    }

    let dimension = grid.height();
    let mut bit_index = 14i32;
    for y in ((dimension - 7)..dimension).rev() {
        grid.set(8, y, bits >> bit_index & 1 == 1);
        bit_index -= 1;
    }
    for x in (dimension - 8)..dimension {
        grid.set(x, 8, bits >> bit_index & 1 == 1);
        bit_index -= 1;
    }
}

fn write_version_bits(grid: &mut BitMatrix, bits: u32) {
    let dimension = grid.height();
    let mut bit_index = 17i32;
    for y in (0..=5).rev() {
        for x in ((dimension - 11)..=(dimension - 9)).rev() {
            grid.set(x, y, bits >> bit_index & 1 == 1);
            bit_index -= 1;
        }
    }
    let mut bit_index = 17i32;
    for x in (0..=5).rev() {
        for y in ((dimension - 11)..=(dimension - 9)).rev() {
            grid.set(x, y, bits >> bit_index & 1 == 1);
            bit_index -= 1;
        }
    }
}

fn write_data_modules(grid: &mut BitMatrix, version: &Version, data_mask: u8, codewords: &[u8]) {
    let dimension = grid.height();
    let function = function_mask(version, dimension);
    let mask = DATA_MASKS[data_mask as usize];

    let mut bit_index = 0usize;
    let total_bits = codewords.len() * 8;
    let mut reading_up = true;
    let mut column = dimension as i32 - 1;
    while column > 0 {
        if column == 6 {
            column -= 1;
        }
        for i in 0..dimension {
            let y = if reading_up { dimension - 1 - i } else { i };
            for offset in 0..2 {
                let x = column as usize - offset;
                if function.get(x, y) {
                    continue;
                }
                let bit = if bit_index < total_bits {
                    codewords[bit_index / 8] >> (7 - bit_index % 8) & 1 == 1
                } else {
                    false
                };
                bit_index += 1;
                grid.set(x, y, bit ^ mask(y, x));
            }
        }
        reading_up = !reading_up;
        column -= 2;
    }
}
