//! Symbol decoding over a sampled module grid
//!
//! Recovers version and format metadata, pulls the raw codewords off the grid,
//! splits them into error correction blocks, corrects each block and parses
//! the corrected byte stream into segments. A grid that decodes is rewritten
//! in canonical bit-exact form; a grid that fails is mirrored and retried.

pub mod bitstream;
pub mod format;
pub mod reed_solomon;
pub mod segments;
pub mod version;

use log::debug;

use crate::models::{BitMatrix, DecodedData};
use format::{DATA_MASKS, FormatInformation, format_bits, read_format};
use reed_solomon::{EuclideanRs, RsBackend};
use segments::decode_segments;
use version::{ErrorCorrectionSpec, Version, read_version};

/// One error correction block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataBlock {
    /// Leading codewords that carry data; the rest are error correction
    pub num_data_codewords: usize,
    /// Codewords as pulled off the grid, data first
    pub codewords: Vec<u8>,
    /// The corrected block, same length as `codewords`
    pub codewords_corrected: Vec<u8>,
}

/// Decode a module grid in place.
///
/// On success the grid is left in canonical form: function patterns, both
/// format copies, both version copies (for versions 7 and up) and the
/// corrected codewords are all rewritten bit-exact, so the caller can
/// re-render or diff the cleaned symbol. If the first pass fails the grid is
/// mirrored across its main diagonal and decoded once more; a grid that fails
/// both ways is left mirrored.
pub fn decode_matrix(matrix: &mut BitMatrix) -> Option<DecodedData> {
    if let Some(data) = decode_grid(matrix, false) {
        return Some(data);
    }
    matrix.mirror();
    decode_grid(matrix, true)
}

fn decode_grid(matrix: &mut BitMatrix, mirrored: bool) -> Option<DecodedData> {
    let version = read_version(matrix)?;
    let format = read_format(matrix)?;
    let spec = &version.error_correction[format.ec_level.code() as usize];
    debug!(
        "decode: version {}, ec {}, mask {}, {} block(s)",
        version.number,
        format.ec_level,
        format.data_mask,
        spec.block_groups
            .iter()
            .map(|g| g.num_blocks)
            .sum::<usize>(),
    );

    let codewords = read_codewords(matrix, version, format.data_mask);
    let mut blocks = assemble_blocks(codewords, spec)?;
    for block in &mut blocks {
        block.codewords_corrected = EuclideanRs
            .rs_decode(&block.codewords, spec.ec_codewords_per_block)
            .ok()?;
    }

    let mut data = Vec::new();
    for block in &blocks {
        data.extend_from_slice(&block.codewords_corrected[..block.num_data_codewords]);
    }
    let stream = decode_segments(&data, version.number, None)?;

    // A structurally valid parse of noise occasionally slips through with
    // nothing in it; an empty symbol is not a symbol.
    if stream.text.is_empty() {
        return None;
    }

    write_canonical(matrix, version, &format, &blocks, spec.ec_codewords_per_block);
    Some(DecodedData {
        text: stream.text,
        bytes: stream.bytes,
        chunks: stream.chunks,
        version: version.number,
        ec_level: format.ec_level,
        data_mask: format.data_mask,
        mirrored,
    })
}

/// Mark every function pattern module for a version: finder areas with their
/// separators and format cells, timing lines, alignment patterns and the
/// version info blocks.
fn build_function_mask(version: &Version) -> BitMatrix {
    let dimension = 17 + 4 * version.number as usize;
    let mut mask = BitMatrix::new(dimension, dimension);

    mask.set_region(0, 0, 9, 9, true);
    mask.set_region(dimension - 8, 0, 8, 9, true);
    mask.set_region(0, dimension - 8, 9, 8, true);

    for &x in version.alignment_pattern_centers {
        for &y in version.alignment_pattern_centers {
            // The three finder corners carry no alignment pattern.
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

/// Pull codewords off the grid in the standard zig-zag: column pairs right to
/// left, alternating scan direction, skipping the vertical timing column and
/// every function module. Each data bit is unmasked on the way out and packed
/// most-significant-bit first.
fn read_codewords(matrix: &BitMatrix, version: &Version, data_mask: u8) -> Vec<u8> {
    let dimension = matrix.height();
    let function_mask = build_function_mask(version);
    let mask = DATA_MASKS[data_mask as usize];

    let mut codewords = Vec::new();
    let mut byte = 0u8;
    let mut bits_read = 0u8;
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
                if function_mask.get(x, y) {
                    continue;
                }
                bits_read += 1;
                let bit = matrix.get(x, y) ^ mask(y, x);
                byte = (byte << 1) | bit as u8;
                if bits_read == 8 {
                    codewords.push(byte);
                    byte = 0;
                    bits_read = 0;
                }
            }
        }
        reading_up = !reading_up;
        column -= 2;
    }
    codewords
}

/// Distribute extracted codewords across blocks: every block gets the
/// shortest block's data count round-robin, the larger blocks take their
/// extra data codewords, then the error correction codewords round-robin.
fn assemble_blocks(mut codewords: Vec<u8>, spec: &ErrorCorrectionSpec) -> Option<Vec<DataBlock>> {
    let total = spec.total_codewords();
    if codewords.len() < total {
        return None;
    }
    codewords.truncate(total);

    let mut blocks: Vec<DataBlock> = Vec::new();
    for group in spec.block_groups {
        for _ in 0..group.num_blocks {
            blocks.push(DataBlock {
                num_data_codewords: group.data_codewords_per_block,
                codewords: Vec::with_capacity(
                    group.data_codewords_per_block + spec.ec_codewords_per_block,
                ),
                codewords_corrected: Vec::new(),
            });
        }
    }

    let shortest = blocks.iter().map(|b| b.num_data_codewords).min()?;
    let longest = blocks.iter().map(|b| b.num_data_codewords).max()?;
    let mut source = codewords.into_iter();
    for _ in 0..shortest {
        for block in &mut blocks {
            block.codewords.push(source.next()?);
        }
    }
    for i in shortest..longest {
        for block in &mut blocks {
            if i < block.num_data_codewords {
                block.codewords.push(source.next()?);
            }
        }
    }
    for _ in 0..spec.ec_codewords_per_block {
        for block in &mut blocks {
            block.codewords.push(source.next()?);
        }
    }
    Some(blocks)
}

/// Inverse of [`assemble_blocks`] over the corrected codewords
fn interleave_blocks(blocks: &[DataBlock], ec_codewords_per_block: usize) -> Vec<u8> {
    let shortest = blocks
        .iter()
        .map(|b| b.num_data_codewords)
        .min()
        .unwrap_or(0);
    let longest = blocks
        .iter()
        .map(|b| b.num_data_codewords)
        .max()
        .unwrap_or(0);

    let mut out = Vec::new();
    for i in 0..shortest {
        for block in blocks {
            out.push(block.codewords_corrected[i]);
        }
    }
    for i in shortest..longest {
        for block in blocks {
            if i < block.num_data_codewords {
                out.push(block.codewords_corrected[i]);
            }
        }
    }
    for i in 0..ec_codewords_per_block {
        for block in blocks {
            out.push(block.codewords_corrected[block.num_data_codewords + i]);
        }
    }
    out
}

/// Rewrite a successfully decoded grid in canonical form.
fn write_canonical(
    matrix: &mut BitMatrix,
    version: &'static Version,
    format: &FormatInformation,
    blocks: &[DataBlock],
    ec_codewords_per_block: usize,
) {
    draw_function_patterns(matrix, version);
    if let Some(bits) = format_bits(format.ec_level, format.data_mask) {
        write_format_bits(matrix, bits);
    }
    if let Some(bits) = version.info_bits {
        write_version_bits(matrix, bits);
    }
    let interleaved = interleave_blocks(blocks, ec_codewords_per_block);
    write_data_modules(matrix, version, format.data_mask, &interleaved);
}

fn draw_function_patterns(matrix: &mut BitMatrix, version: &Version) {
    let dimension = matrix.height();

    // Finder corners, separators included.
    matrix.set_region(0, 0, 9, 9, false);
    matrix.set_region(dimension - 8, 0, 8, 9, false);
    matrix.set_region(0, dimension - 8, 9, 8, false);
    for (left, top) in [(0, 0), (dimension - 7, 0), (0, dimension - 7)] {
        for dy in 0..7 {
            for dx in 0..7 {
                let ring = dx == 0 || dx == 6 || dy == 0 || dy == 6;
                let center = (2..=4).contains(&dx) && (2..=4).contains(&dy);
                matrix.set(left + dx, top + dy, ring || center);
            }
        }
    }

    for i in 8..dimension - 8 {
        matrix.set(i, 6, i % 2 == 0);
        matrix.set(6, i, i % 2 == 0);
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
                    matrix.set(
                        (cx as i32 + dx) as usize,
                        (cy as i32 + dy) as usize,
                        black,
                    );
                }
            }
        }
    }

    // Dark module.
    matrix.set(8, dimension - 8, true);
}

/// Write both storage copies of the 15-bit format codeword, in the same cell
/// order [`read_format`](format::read_format) consumes them.
fn write_format_bits(matrix: &mut BitMatrix, bits: u16) {
    let mut bit_index = 14i32;
    for x in 0..=8 {
        if x != 6 {
            matrix.set(x, 8, bits >> bit_index & 1 == 1);
            bit_index -= 1;
        }
    }
    for y in (0..=7).rev() {
        if y != 6 {
            matrix.set(8, y, bits >> bit_index & 1 == 1);
            bit_index -= 1;
        }
    }

    let dimension = matrix.height();
    let mut bit_index = 14i32;
    for y in ((dimension - 7)..dimension).rev() {
        matrix.set(8, y, bits >> bit_index & 1 == 1);
        bit_index -= 1;
    }
    for x in (dimension - 8)..dimension {
        matrix.set(x, 8, bits >> bit_index & 1 == 1);
        bit_index -= 1;
    }
}

/// Write both copies of the 18-bit version codeword, in the same cell order
/// [`read_version`](version::read_version) consumes them.
fn write_version_bits(matrix: &mut BitMatrix, bits: u32) {
    let dimension = matrix.height();
    let mut bit_index = 17i32;
    for y in (0..=5).rev() {
        for x in ((dimension - 11)..=(dimension - 9)).rev() {
            matrix.set(x, y, bits >> bit_index & 1 == 1);
            bit_index -= 1;
        }
    }
    let mut bit_index = 17i32;
    for x in (0..=5).rev() {
        for y in ((dimension - 11)..=(dimension - 9)).rev() {
            matrix.set(x, y, bits >> bit_index & 1 == 1);
            bit_index -= 1;
        }
    }
}

/// Write an interleaved codeword sequence along the zig-zag walk, re-masked.
/// Modules past the final codeword (the remainder bits) are written as zero
/// bits under the mask.
fn write_data_modules(
    matrix: &mut BitMatrix,
    version: &Version,
    data_mask: u8,
    codewords: &[u8],
) {
    let dimension = matrix.height();
    let function_mask = build_function_mask(version);
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
                if function_mask.get(x, y) {
                    continue;
                }
                let bit = if bit_index < total_bits {
                    codewords[bit_index / 8] >> (7 - bit_index % 8) & 1 == 1
                } else {
                    false
                };
                bit_index += 1;
                matrix.set(x, y, bit ^ mask(y, x));
            }
        }
        reading_up = !reading_up;
        column -= 2;
    }
}
