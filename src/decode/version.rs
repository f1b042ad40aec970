//! Static version table and version-info recovery

use crate::models::BitMatrix;

/// One group of equally sized data blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockGroup {
    /// Number of blocks in this group
    pub num_blocks: usize,
    /// Data codewords carried by each block
    pub data_codewords_per_block: usize,
}

/// Block structure for one version at one error correction level
#[derive(Debug, Clone, Copy)]
pub struct ErrorCorrectionSpec {
    /// Error correction codewords appended to every block
    pub ec_codewords_per_block: usize,
    /// One or two groups of data blocks
    pub block_groups: &'static [BlockGroup],
}

impl ErrorCorrectionSpec {
    /// Total codewords (data plus error correction) across all blocks
    pub fn total_codewords(&self) -> usize {
        self.block_groups
            .iter()
            .map(|g| g.num_blocks * (g.data_codewords_per_block + self.ec_codewords_per_block))
            .sum()
    }
}

/// Immutable description of one QR version
#[derive(Debug)]
pub struct Version {
    /// Version number, 1-40
    pub number: u8,
    /// Module coordinates of alignment pattern rows/columns
    pub alignment_pattern_centers: &'static [usize],
    /// 18-bit version info codeword; only stored for versions 7 and up
    pub info_bits: Option<u32>,
    /// Block tables indexed by the format-info error correction code.
    /// The indicator order is M, L, H, Q, not alphabetical.
    pub error_correction: [ErrorCorrectionSpec; 4],
}

impl Version {
    /// Look up a version record by its 1-based number
    pub fn for_number(number: usize) -> Option<&'static Version> {
        VERSIONS.get(number.checked_sub(1)?)
    }
}

/// Recover the symbol version from a module grid.
///
/// Grids up to version 6 encode the version in their dimension alone. Larger
/// grids carry two 18-bit copies of the version info; an exact match against
/// the table wins outright, otherwise the closest entry within Hamming
/// distance 3 is accepted (the code's minimum inter-codeword distance is 8).
pub fn read_version(matrix: &BitMatrix) -> Option<&'static Version> {
    let dimension = matrix.width();
    let provisional = dimension.saturating_sub(17) / 4;
    if provisional == 0 {
        return None;
    }
    if provisional <= 6 {
        return Version::for_number(provisional);
    }

    let mut top_right_bits = 0u32;
    for y in (0..=5).rev() {
        for x in ((dimension - 11)..=(dimension - 9)).rev() {
            top_right_bits = (top_right_bits << 1) | matrix.get(x, y) as u32;
        }
    }
    let mut bottom_left_bits = 0u32;
    for x in (0..=5).rev() {
        for y in ((dimension - 11)..=(dimension - 9)).rev() {
            bottom_left_bits = (bottom_left_bits << 1) | matrix.get(x, y) as u32;
        }
    }

    let mut best_difference = u32::MAX;
    let mut best: Option<&'static Version> = None;
    for version in &VERSIONS {
        let Some(info_bits) = version.info_bits else {
            continue;
        };
        if info_bits == top_right_bits || info_bits == bottom_left_bits {
            return Some(version);
        }
        let mut difference = (top_right_bits ^ info_bits).count_ones();
        if difference < best_difference {
            best = Some(version);
            best_difference = difference;
        }
        difference = (bottom_left_bits ^ info_bits).count_ones();
        if difference < best_difference {
            best = Some(version);
            best_difference = difference;
        }
    }
    if best_difference <= 3 { best } else { None }
}

macro_rules! ec {
    ($ecw:expr, [$(($n:expr, $d:expr)),+]) => {
        ErrorCorrectionSpec {
            ec_codewords_per_block: $ecw,
            block_groups: &[$(BlockGroup { num_blocks: $n, data_codewords_per_block: $d }),+],
        }
    };
}

/// All 40 version records, in version order. Error correction specs are in
/// format-indicator order M, L, H, Q.
pub static VERSIONS: [Version; 40] = [
    Version {
        number: 1,
        alignment_pattern_centers: &[],
        info_bits: None,
        error_correction: [
            ec!(10, [(1, 16)]),
            ec!(7, [(1, 19)]),
            ec!(17, [(1, 9)]),
            ec!(13, [(1, 13)]),
        ],
    },
    Version {
        number: 2,
        alignment_pattern_centers: &[6, 18],
        info_bits: None,
        error_correction: [
            ec!(16, [(1, 28)]),
            ec!(10, [(1, 34)]),
            ec!(28, [(1, 16)]),
            ec!(22, [(1, 22)]),
        ],
    },
    Version {
        number: 3,
        alignment_pattern_centers: &[6, 22],
        info_bits: None,
        error_correction: [
            ec!(26, [(1, 44)]),
            ec!(15, [(1, 55)]),
            ec!(22, [(2, 13)]),
            ec!(18, [(2, 17)]),
        ],
    },
    Version {
        number: 4,
        alignment_pattern_centers: &[6, 26],
        info_bits: None,
        error_correction: [
            ec!(18, [(2, 32)]),
            ec!(20, [(1, 80)]),
            ec!(16, [(4, 9)]),
            ec!(26, [(2, 24)]),
        ],
    },
    Version {
        number: 5,
        alignment_pattern_centers: &[6, 30],
        info_bits: None,
        error_correction: [
            ec!(24, [(2, 43)]),
            ec!(26, [(1, 108)]),
            ec!(22, [(2, 11), (2, 12)]),
            ec!(18, [(2, 15), (2, 16)]),
        ],
    },
    Version {
        number: 6,
        alignment_pattern_centers: &[6, 34],
        info_bits: None,
        error_correction: [
            ec!(16, [(4, 27)]),
            ec!(18, [(2, 68)]),
            ec!(28, [(4, 15)]),
            ec!(24, [(4, 19)]),
        ],
    },
    Version {
        number: 7,
        alignment_pattern_centers: &[6, 22, 38],
        info_bits: Some(0x07C94),
        error_correction: [
            ec!(18, [(4, 31)]),
            ec!(20, [(2, 78)]),
            ec!(26, [(4, 13), (1, 14)]),
            ec!(18, [(2, 14), (4, 15)]),
        ],
    },
    Version {
        number: 8,
        alignment_pattern_centers: &[6, 24, 42],
        info_bits: Some(0x085BC),
        error_correction: [
            ec!(22, [(2, 38), (2, 39)]),
            ec!(24, [(2, 97)]),
            ec!(26, [(4, 14), (2, 15)]),
            ec!(22, [(4, 18), (2, 19)]),
        ],
    },
    Version {
        number: 9,
        alignment_pattern_centers: &[6, 26, 46],
        info_bits: Some(0x09A99),
        error_correction: [
            ec!(22, [(3, 36), (2, 37)]),
            ec!(30, [(2, 116)]),
            ec!(24, [(4, 12), (4, 13)]),
            ec!(20, [(4, 16), (4, 17)]),
        ],
    },
    Version {
        number: 10,
        alignment_pattern_centers: &[6, 28, 50],
        info_bits: Some(0x0A4D3),
        error_correction: [
            ec!(26, [(4, 43), (1, 44)]),
            ec!(18, [(2, 68), (2, 69)]),
            ec!(28, [(6, 15), (2, 16)]),
            ec!(24, [(6, 19), (2, 20)]),
        ],
    },
    Version {
        number: 11,
        alignment_pattern_centers: &[6, 30, 54],
        info_bits: Some(0x0BBF6),
        error_correction: [
            ec!(30, [(1, 50), (4, 51)]),
            ec!(20, [(4, 81)]),
            ec!(24, [(3, 12), (8, 13)]),
            ec!(28, [(4, 22), (4, 23)]),
        ],
    },
    Version {
        number: 12,
        alignment_pattern_centers: &[6, 32, 58],
        info_bits: Some(0x0C762),
        error_correction: [
            ec!(22, [(6, 36), (2, 37)]),
            ec!(24, [(2, 92), (2, 93)]),
            ec!(28, [(7, 14), (4, 15)]),
            ec!(26, [(4, 20), (6, 21)]),
        ],
    },
    Version {
        number: 13,
        alignment_pattern_centers: &[6, 34, 62],
        info_bits: Some(0x0D847),
        error_correction: [
            ec!(22, [(8, 37), (1, 38)]),
            ec!(26, [(4, 107)]),
            ec!(22, [(12, 11), (4, 12)]),
            ec!(24, [(8, 20), (4, 21)]),
        ],
    },
    Version {
        number: 14,
        alignment_pattern_centers: &[6, 26, 46, 66],
        info_bits: Some(0x0E60D),
        error_correction: [
            ec!(24, [(4, 40), (5, 41)]),
            ec!(30, [(3, 115), (1, 116)]),
            ec!(24, [(11, 12), (5, 13)]),
            ec!(20, [(11, 16), (5, 17)]),
        ],
    },
    Version {
        number: 15,
        alignment_pattern_centers: &[6, 26, 48, 70],
        info_bits: Some(0x0F928),
        error_correction: [
            ec!(24, [(5, 41), (5, 42)]),
            ec!(22, [(5, 87), (1, 88)]),
            ec!(24, [(11, 12), (7, 13)]),
            ec!(30, [(5, 24), (7, 25)]),
        ],
    },
    Version {
        number: 16,
        alignment_pattern_centers: &[6, 26, 50, 74],
        info_bits: Some(0x10B78),
        error_correction: [
            ec!(28, [(7, 45), (3, 46)]),
            ec!(24, [(5, 98), (1, 99)]),
            ec!(30, [(3, 15), (13, 16)]),
            ec!(24, [(15, 19), (2, 20)]),
        ],
    },
    Version {
        number: 17,
        alignment_pattern_centers: &[6, 30, 54, 78],
        info_bits: Some(0x1145D),
        error_correction: [
            ec!(28, [(10, 46), (1, 47)]),
            ec!(28, [(1, 107), (5, 108)]),
            ec!(28, [(2, 14), (17, 15)]),
            ec!(28, [(1, 22), (15, 23)]),
        ],
    },
    Version {
        number: 18,
        alignment_pattern_centers: &[6, 30, 56, 82],
        info_bits: Some(0x12A17),
        error_correction: [
            ec!(26, [(9, 43), (4, 44)]),
            ec!(30, [(5, 120), (1, 121)]),
            ec!(28, [(2, 14), (19, 15)]),
            ec!(28, [(17, 22), (1, 23)]),
        ],
    },
    Version {
        number: 19,
        alignment_pattern_centers: &[6, 30, 58, 86],
        info_bits: Some(0x13532),
        error_correction: [
            ec!(26, [(3, 44), (11, 45)]),
            ec!(28, [(3, 113), (4, 114)]),
            ec!(26, [(9, 13), (16, 14)]),
            ec!(26, [(17, 21), (4, 22)]),
        ],
    },
    Version {
        number: 20,
        alignment_pattern_centers: &[6, 34, 62, 90],
        info_bits: Some(0x149A6),
        error_correction: [
            ec!(26, [(3, 41), (13, 42)]),
            ec!(28, [(3, 107), (5, 108)]),
            ec!(28, [(15, 15), (10, 16)]),
            ec!(30, [(15, 24), (5, 25)]),
        ],
    },
    Version {
        number: 21,
        alignment_pattern_centers: &[6, 28, 50, 72, 94],
        info_bits: Some(0x15683),
        error_correction: [
            ec!(26, [(17, 42)]),
            ec!(28, [(4, 116), (4, 117)]),
            ec!(30, [(19, 16), (6, 17)]),
            ec!(28, [(17, 22), (6, 23)]),
        ],
    },
    Version {
        number: 22,
        alignment_pattern_centers: &[6, 26, 50, 74, 98],
        info_bits: Some(0x168C9),
        error_correction: [
            ec!(28, [(17, 46)]),
            ec!(28, [(2, 111), (7, 112)]),
            ec!(24, [(34, 13)]),
            ec!(30, [(7, 24), (16, 25)]),
        ],
    },
    Version {
        number: 23,
        alignment_pattern_centers: &[6, 30, 54, 78, 102],
        info_bits: Some(0x177EC),
        error_correction: [
            ec!(28, [(4, 47), (14, 48)]),
            ec!(30, [(4, 121), (5, 122)]),
            ec!(30, [(16, 15), (14, 16)]),
            ec!(30, [(11, 24), (14, 25)]),
        ],
    },
    Version {
        number: 24,
        alignment_pattern_centers: &[6, 28, 54, 80, 106],
        info_bits: Some(0x18EC4),
        error_correction: [
            ec!(28, [(6, 45), (14, 46)]),
            ec!(30, [(6, 117), (4, 118)]),
            ec!(30, [(30, 16), (2, 17)]),
            ec!(30, [(11, 24), (16, 25)]),
        ],
    },
    Version {
        number: 25,
        alignment_pattern_centers: &[6, 32, 58, 84, 110],
        info_bits: Some(0x191E1),
        error_correction: [
            ec!(28, [(8, 47), (13, 48)]),
            ec!(26, [(8, 106), (4, 107)]),
            ec!(30, [(22, 15), (13, 16)]),
            ec!(30, [(7, 24), (22, 25)]),
        ],
    },
    Version {
        number: 26,
        alignment_pattern_centers: &[6, 30, 58, 86, 114],
        info_bits: Some(0x1AFAB),
        error_correction: [
            ec!(28, [(19, 46), (4, 47)]),
            ec!(28, [(10, 114), (2, 115)]),
            ec!(30, [(33, 16), (4, 17)]),
            ec!(28, [(28, 22), (6, 23)]),
        ],
    },
    Version {
        number: 27,
        alignment_pattern_centers: &[6, 34, 62, 90, 118],
        info_bits: Some(0x1B08E),
        error_correction: [
            ec!(28, [(22, 45), (3, 46)]),
            ec!(30, [(8, 122), (4, 123)]),
            ec!(30, [(12, 15), (28, 16)]),
            ec!(30, [(8, 23), (26, 24)]),
        ],
    },
    Version {
        number: 28,
        alignment_pattern_centers: &[6, 26, 50, 74, 98, 122],
        info_bits: Some(0x1CC1A),
        error_correction: [
            ec!(28, [(3, 45), (23, 46)]),
            ec!(30, [(3, 117), (10, 118)]),
            ec!(30, [(11, 15), (31, 16)]),
            ec!(30, [(4, 24), (31, 25)]),
        ],
    },
    Version {
        number: 29,
        alignment_pattern_centers: &[6, 30, 54, 78, 102, 126],
        info_bits: Some(0x1D33F),
        error_correction: [
            ec!(28, [(21, 45), (7, 46)]),
            ec!(30, [(7, 116), (7, 117)]),
            ec!(30, [(19, 15), (26, 16)]),
            ec!(30, [(1, 23), (37, 24)]),
        ],
    },
    Version {
        number: 30,
        alignment_pattern_centers: &[6, 26, 52, 78, 104, 130],
        info_bits: Some(0x1ED75),
        error_correction: [
            ec!(28, [(19, 47), (10, 48)]),
            ec!(30, [(5, 115), (10, 116)]),
            ec!(30, [(23, 15), (25, 16)]),
            ec!(30, [(15, 24), (25, 25)]),
        ],
    },
    Version {
        number: 31,
        alignment_pattern_centers: &[6, 30, 56, 82, 108, 134],
        info_bits: Some(0x1F250),
        error_correction: [
            ec!(28, [(2, 46), (29, 47)]),
            ec!(30, [(13, 115), (3, 116)]),
            ec!(30, [(23, 15), (28, 16)]),
            ec!(30, [(42, 24), (1, 25)]),
        ],
    },
    Version {
        number: 32,
        alignment_pattern_centers: &[6, 34, 60, 86, 112, 138],
        info_bits: Some(0x209D5),
        error_correction: [
            ec!(28, [(10, 46), (23, 47)]),
            ec!(30, [(17, 115)]),
            ec!(30, [(19, 15), (35, 16)]),
            ec!(30, [(10, 24), (35, 25)]),
        ],
    },
    Version {
        number: 33,
        alignment_pattern_centers: &[6, 30, 58, 86, 114, 142],
        info_bits: Some(0x216F0),
        error_correction: [
            ec!(28, [(14, 46), (21, 47)]),
            ec!(30, [(17, 115), (1, 116)]),
            ec!(30, [(11, 15), (46, 16)]),
            ec!(30, [(29, 24), (19, 25)]),
        ],
    },
    Version {
        number: 34,
        alignment_pattern_centers: &[6, 34, 62, 90, 118, 146],
        info_bits: Some(0x228BA),
        error_correction: [
            ec!(28, [(14, 46), (23, 47)]),
            ec!(30, [(13, 115), (6, 116)]),
            ec!(30, [(59, 16), (1, 17)]),
            ec!(30, [(44, 24), (7, 25)]),
        ],
    },
    Version {
        number: 35,
        alignment_pattern_centers: &[6, 30, 54, 78, 102, 126, 150],
        info_bits: Some(0x2379F),
        error_correction: [
            ec!(28, [(12, 47), (26, 48)]),
            ec!(30, [(12, 121), (7, 122)]),
            ec!(30, [(22, 15), (41, 16)]),
            ec!(30, [(39, 24), (14, 25)]),
        ],
    },
    Version {
        number: 36,
        alignment_pattern_centers: &[6, 24, 50, 76, 102, 128, 154],
        info_bits: Some(0x24B0B),
        error_correction: [
            ec!(28, [(6, 47), (34, 48)]),
            ec!(30, [(6, 121), (14, 122)]),
            ec!(30, [(2, 15), (64, 16)]),
            ec!(30, [(46, 24), (10, 25)]),
        ],
    },
    Version {
        number: 37,
        alignment_pattern_centers: &[6, 28, 54, 80, 106, 132, 158],
        info_bits: Some(0x2542E),
        error_correction: [
            ec!(28, [(29, 46), (14, 47)]),
            ec!(30, [(17, 122), (4, 123)]),
            ec!(30, [(24, 15), (46, 16)]),
            ec!(30, [(49, 24), (10, 25)]),
        ],
    },
    Version {
        number: 38,
        alignment_pattern_centers: &[6, 32, 58, 84, 110, 136, 162],
        info_bits: Some(0x26A64),
        error_correction: [
            ec!(28, [(13, 46), (32, 47)]),
            ec!(30, [(4, 122), (18, 123)]),
            ec!(30, [(42, 15), (32, 16)]),
            ec!(30, [(48, 24), (14, 25)]),
        ],
    },
    Version {
        number: 39,
        alignment_pattern_centers: &[6, 26, 54, 82, 110, 138, 166],
        info_bits: Some(0x27541),
        error_correction: [
            ec!(28, [(40, 47), (7, 48)]),
            ec!(30, [(20, 117), (4, 118)]),
            ec!(30, [(10, 15), (67, 16)]),
            ec!(30, [(43, 24), (22, 25)]),
        ],
    },
    Version {
        number: 40,
        alignment_pattern_centers: &[6, 30, 58, 86, 114, 142, 170],
        info_bits: Some(0x28C69),
        error_correction: [
            ec!(28, [(18, 47), (31, 48)]),
            ec!(30, [(19, 118), (6, 119)]),
            ec!(30, [(20, 15), (61, 16)]),
            ec!(30, [(34, 24), (34, 25)]),
        ],
    },
];
