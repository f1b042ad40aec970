//! Format-info recovery and the data mask functions

use crate::models::{BitMatrix, ECLevel};

/// Error correction level and data mask recovered from the format info
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatInformation {
    /// Recovered error correction level
    pub ec_level: ECLevel,
    /// Data mask index, 0-7
    pub data_mask: u8,
}

struct FormatEntry {
    bits: u16,
    info: FormatInformation,
}

macro_rules! fmt {
    ($bits:expr, $level:ident, $mask:expr) => {
        FormatEntry {
            bits: $bits,
            info: FormatInformation {
                ec_level: ECLevel::$level,
                data_mask: $mask,
            },
        }
    };
}

/// The 32 masked 15-bit format codewords, keyed by EC level and data mask
const FORMAT_TABLE: [FormatEntry; 32] = [
    fmt!(0x5412, M, 0),
    fmt!(0x5125, M, 1),
    fmt!(0x5E7C, M, 2),
    fmt!(0x5B4B, M, 3),
    fmt!(0x45F9, M, 4),
    fmt!(0x40CE, M, 5),
    fmt!(0x4F97, M, 6),
    fmt!(0x4AA0, M, 7),
    fmt!(0x77C4, L, 0),
    fmt!(0x72F3, L, 1),
    fmt!(0x7DAA, L, 2),
    fmt!(0x789D, L, 3),
    fmt!(0x662F, L, 4),
    fmt!(0x6318, L, 5),
    fmt!(0x6C41, L, 6),
    fmt!(0x6976, L, 7),
    fmt!(0x1689, H, 0),
    fmt!(0x13BE, H, 1),
    fmt!(0x1CE7, H, 2),
    fmt!(0x19D0, H, 3),
    fmt!(0x0762, H, 4),
    fmt!(0x0255, H, 5),
    fmt!(0x0D0C, H, 6),
    fmt!(0x083B, H, 7),
    fmt!(0x355F, Q, 0),
    fmt!(0x3068, Q, 1),
    fmt!(0x3F31, Q, 2),
    fmt!(0x3A06, Q, 3),
    fmt!(0x24B4, Q, 4),
    fmt!(0x2183, Q, 5),
    fmt!(0x2EB2, Q, 6),
    fmt!(0x2B95, Q, 7),
];

/// Look up the masked format codeword for an EC level and mask index.
/// Used when rewriting a decoded grid into canonical form.
pub fn format_bits(ec_level: ECLevel, data_mask: u8) -> Option<u16> {
    FORMAT_TABLE
        .iter()
        .find(|e| e.info.ec_level == ec_level && e.info.data_mask == data_mask)
        .map(|e| e.bits)
}

/// The eight data mask predicates, indexed by mask number; true means the
/// module at row `y`, column `x` is inverted.
pub static DATA_MASKS: [fn(y: usize, x: usize) -> bool; 8] = [
    |y, x| (y + x) % 2 == 0,
    |y, _| y % 2 == 0,
    |_, x| x % 3 == 0,
    |y, x| (y + x) % 3 == 0,
    |y, x| (y / 2 + x / 3) % 2 == 0,
    |y, x| (x * y) % 2 + (x * y) % 3 == 0,
    |y, x| ((x * y) % 2 + (x * y) % 3) % 2 == 0,
    |y, x| ((y + x) % 2 + (x * y) % 3) % 2 == 0,
];

/// Recover the format info from its two storage copies.
///
/// One copy wraps around the top-left finder, skipping the timing bit; the
/// other is split between the bottom-left column and the top-right row. An
/// exact match against the table wins outright, otherwise the closest entry
/// within Hamming distance 3 is accepted (the masked code's minimum
/// inter-codeword distance is 7).
pub fn read_format(matrix: &BitMatrix) -> Option<FormatInformation> {
    let mut top_left_bits = 0u32;
    for x in 0..=8 {
        if x != 6 {
            top_left_bits = (top_left_bits << 1) | matrix.get(x, 8) as u32;
        }
    }
    for y in (0..=7).rev() {
        if y != 6 {
            top_left_bits = (top_left_bits << 1) | matrix.get(8, y) as u32;
        }
    }

    let dimension = matrix.height();
    let mut split_bits = 0u32;
    for y in ((dimension - 7)..dimension).rev() {
        split_bits = (split_bits << 1) | matrix.get(8, y) as u32;
    }
    for x in (dimension - 8)..dimension {
        split_bits = (split_bits << 1) | matrix.get(x, 8) as u32;
    }

    let mut best_difference = u32::MAX;
    let mut best: Option<FormatInformation> = None;
    for entry in &FORMAT_TABLE {
        let bits = entry.bits as u32;
        if bits == top_left_bits || bits == split_bits {
            return Some(entry.info);
        }
        let mut difference = (top_left_bits ^ bits).count_ones();
        if difference < best_difference {
            best = Some(entry.info);
            best_difference = difference;
        }
        if top_left_bits != split_bits {
            difference = (split_bits ^ bits).count_ones();
            if difference < best_difference {
                best = Some(entry.info);
                best_difference = difference;
            }
        }
    }
    if best_difference <= 3 { best } else { None }
}
