use super::point::Point;

/// Error correction level of a decoded symbol
///
/// Discriminants follow the two-bit indicator stored in the format
/// information field, which doubles as the index into the per-version
/// block tables. This is not the alphabetical L/M/Q/H order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ECLevel {
    /// Medium (~15% recovery), format indicator 0b00
    M = 0,
    /// Low (~7% recovery), format indicator 0b01
    L = 1,
    /// High (~30% recovery), format indicator 0b10
    H = 2,
    /// Quartile (~25% recovery), format indicator 0b11
    Q = 3,
}

impl ECLevel {
    /// Build from the two-bit format-info indicator
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(ECLevel::M),
            1 => Some(ECLevel::L),
            2 => Some(ECLevel::H),
            3 => Some(ECLevel::Q),
            _ => None,
        }
    }

    /// The two-bit format-info indicator (also the block-table index)
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl std::fmt::Display for ECLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let letter = match self {
            ECLevel::M => 'M',
            ECLevel::L => 'L',
            ECLevel::H => 'H',
            ECLevel::Q => 'Q',
        };
        write!(f, "{letter}")
    }
}

/// One mode-tagged segment of the decoded data stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Chunk {
    /// Digits 0-9 packed three to ten bits
    Numeric {
        /// Decoded digit string
        text: String,
    },
    /// The 45-symbol alphanumeric subset
    Alphanumeric {
        /// Decoded text
        text: String,
    },
    /// Raw 8-bit bytes
    Byte {
        /// Bytes exactly as stored in the symbol
        bytes: Vec<u8>,
        /// Best-effort UTF-8 rendering of `bytes`
        text: String,
    },
    /// 13-bit kanji codes remapped to Shift-JIS pairs
    Kanji {
        /// Shift-JIS byte pairs
        bytes: Vec<u8>,
        /// Shift-JIS decoded text
        text: String,
    },
    /// Extended Channel Interpretation designator
    Eci {
        /// ECI assignment number, or -1 when the header was corrupted
        assignment_number: i32,
    },
    /// Structured Append header; reassembly is left to the caller
    StructuredAppend {
        /// Zero-based index of this symbol in the sequence
        current_sequence: u8,
        /// Sequence length minus one
        total_sequence: u8,
        /// Parity byte shared by all symbols of the message
        parity: u8,
    },
}

/// Result of decoding a module grid, before image-space positions are known
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedData {
    /// Concatenated text of all segments
    pub text: String,
    /// Concatenated payload bytes of all segments
    pub bytes: Vec<u8>,
    /// Ordered mode-tagged segments
    pub chunks: Vec<Chunk>,
    /// Symbol version, 1-40
    pub version: u8,
    /// Recovered error correction level
    pub ec_level: ECLevel,
    /// Recovered data mask index, 0-7
    pub data_mask: u8,
    /// True when the grid only decoded after mirroring across its diagonal
    pub mirrored: bool,
}

/// Image-space geometry of a decoded symbol
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SymbolLocation {
    /// Top-left symbol corner
    pub top_left_corner: Point,
    /// Top-right symbol corner
    pub top_right_corner: Point,
    /// Bottom-right symbol corner
    pub bottom_right_corner: Point,
    /// Bottom-left symbol corner
    pub bottom_left_corner: Point,
    /// Center of the top-left finder pattern
    pub top_left_finder: Point,
    /// Center of the top-right finder pattern
    pub top_right_finder: Point,
    /// Center of the bottom-left finder pattern
    pub bottom_left_finder: Point,
    /// Center of the bottom-right alignment pattern (extrapolated for version 1)
    pub bottom_right_alignment: Point,
}

/// A fully decoded QR symbol
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedSymbol {
    /// Concatenated text of all segments
    pub text: String,
    /// Concatenated payload bytes of all segments
    pub bytes: Vec<u8>,
    /// Ordered mode-tagged segments
    pub chunks: Vec<Chunk>,
    /// Symbol version, 1-40
    pub version: u8,
    /// Recovered error correction level
    pub ec_level: ECLevel,
    /// Recovered data mask index, 0-7
    pub data_mask: u8,
    /// True when the grid only decoded after mirroring across its diagonal
    pub mirrored: bool,
    /// Corner and pattern coordinates in source-image space
    pub location: SymbolLocation,
}

impl DecodedSymbol {
    /// Combine grid-level decode output with image-space geometry
    pub fn from_parts(data: DecodedData, location: SymbolLocation) -> Self {
        Self {
            text: data.text,
            bytes: data.bytes,
            chunks: data.chunks,
            version: data.version,
            ec_level: data.ec_level,
            data_mask: data.data_mask,
            mirrored: data.mirrored,
            location,
        }
    }
}
