//! Mode-tagged segment decoding of the corrected data stream

use encoding_rs::SHIFT_JIS;
use log::trace;

use super::bitstream::BitStream;
use crate::models::Chunk;

/// 4-bit mode indicators
mod mode {
    pub const TERMINATOR: u32 = 0b0000;
    pub const NUMERIC: u32 = 0b0001;
    pub const ALPHANUMERIC: u32 = 0b0010;
    pub const STRUCTURED_APPEND: u32 = 0b0011;
    pub const BYTE: u32 = 0b0100;
    pub const ECI: u32 = 0b0111;
    pub const KANJI: u32 = 0b1000;
}

/// The 45-symbol alphanumeric alphabet, indexed by code value
const ALPHANUMERIC_CHARS: [char; 45] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I',
    'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', ' ', '$',
    '%', '*', '+', '-', '.', '/', ':',
];

/// Decoded contents of one data stream
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StreamData {
    /// Concatenated text of all segments
    pub text: String,
    /// Concatenated payload bytes of all segments
    pub bytes: Vec<u8>,
    /// Ordered mode-tagged segments
    pub chunks: Vec<Chunk>,
}

/// One record of the optional bit-level provenance log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentTrace {
    /// Bit offset of the segment's mode indicator
    pub bit_offset: usize,
    /// The 4-bit mode indicator
    pub mode_bits: u8,
    /// Character count field value (zero for ECI and Structured Append)
    pub char_count: usize,
    /// Total bits consumed by the segment, mode indicator included
    pub bits_used: usize,
}

/// Parse the corrected data codewords into segments.
///
/// The stream ends at an explicit terminator, or implicitly once fewer than
/// four bits remain. Out-of-range numeric or alphanumeric code values and
/// unrecognized mode indicators are corrupted-stream conditions and fail the
/// whole parse. When `traces` is given, one record per segment is appended.
pub fn decode_segments(
    data: &[u8],
    version: u8,
    mut traces: Option<&mut Vec<SegmentTrace>>,
) -> Option<StreamData> {
    let mut stream = BitStream::new(data);
    let mut result = StreamData::default();

    while stream.available() >= 4 {
        let segment_start = stream.bit_offset();
        let mode_bits = stream.read_bits(4)?;
        if mode_bits == mode::TERMINATOR {
            break;
        }

        let mut char_count = 0usize;
        match mode_bits {
            mode::NUMERIC => {
                char_count = stream.read_bits(count_bits(mode_bits, version))? as usize;
                let text = decode_numeric(&mut stream, char_count)?;
                result.bytes.extend_from_slice(text.as_bytes());
                result.text.push_str(&text);
                result.chunks.push(Chunk::Numeric { text });
            }
            mode::ALPHANUMERIC => {
                char_count = stream.read_bits(count_bits(mode_bits, version))? as usize;
                let text = decode_alphanumeric(&mut stream, char_count)?;
                result.bytes.extend_from_slice(text.as_bytes());
                result.text.push_str(&text);
                result.chunks.push(Chunk::Alphanumeric { text });
            }
            mode::BYTE => {
                char_count = stream.read_bits(count_bits(mode_bits, version))? as usize;
                let mut bytes = Vec::with_capacity(char_count);
                for _ in 0..char_count {
                    bytes.push(stream.read_bits(8)? as u8);
                }
                let text = String::from_utf8_lossy(&bytes).into_owned();
                result.bytes.extend_from_slice(&bytes);
                result.text.push_str(&text);
                result.chunks.push(Chunk::Byte { bytes, text });
            }
            mode::KANJI => {
                char_count = stream.read_bits(count_bits(mode_bits, version))? as usize;
                let bytes = decode_kanji(&mut stream, char_count)?;
                let (text, _, _) = SHIFT_JIS.decode(&bytes);
                let text = text.into_owned();
                result.bytes.extend_from_slice(&bytes);
                result.text.push_str(&text);
                result.chunks.push(Chunk::Kanji { bytes, text });
            }
            mode::ECI => {
                let assignment_number = decode_eci(&mut stream)?;
                result.chunks.push(Chunk::Eci { assignment_number });
            }
            mode::STRUCTURED_APPEND => {
                result.chunks.push(Chunk::StructuredAppend {
                    current_sequence: stream.read_bits(4)? as u8,
                    total_sequence: stream.read_bits(4)? as u8,
                    parity: stream.read_bits(8)? as u8,
                });
            }
            // Reserved and FNC1 indicators are not modeled; in a noisy grid
            // they mean the stream is garbage.
            _ => return None,
        }

        let bits_used = stream.bit_offset() - segment_start;
        trace!(
            "segment: mode {mode_bits:04b}, {char_count} chars, {bits_used} bits at {segment_start}"
        );
        if let Some(traces) = traces.as_deref_mut() {
            traces.push(SegmentTrace {
                bit_offset: segment_start,
                mode_bits: mode_bits as u8,
                char_count,
                bits_used,
            });
        }
    }

    Some(result)
}

/// Character count field width for a mode, by version size class
fn count_bits(mode_bits: u32, version: u8) -> usize {
    let class = match version {
        1..=9 => 0,
        10..=26 => 1,
        _ => 2,
    };
    match mode_bits {
        mode::NUMERIC => [10, 12, 14][class],
        mode::ALPHANUMERIC => [9, 11, 13][class],
        mode::BYTE => [8, 16, 16][class],
        mode::KANJI => [8, 10, 12][class],
        _ => 0,
    }
}

/// Digits in groups of three (10 bits), with 7- and 4-bit tail groups
fn decode_numeric(stream: &mut BitStream<'_>, char_count: usize) -> Option<String> {
    let mut text = String::with_capacity(char_count);
    let mut remaining = char_count;
    while remaining >= 3 {
        let value = stream.read_bits(10)?;
        if value >= 1000 {
            return None;
        }
        text.push(digit(value / 100));
        text.push(digit(value / 10 % 10));
        text.push(digit(value % 10));
        remaining -= 3;
    }
    if remaining == 2 {
        let value = stream.read_bits(7)?;
        if value >= 100 {
            return None;
        }
        text.push(digit(value / 10));
        text.push(digit(value % 10));
    } else if remaining == 1 {
        let value = stream.read_bits(4)?;
        if value >= 10 {
            return None;
        }
        text.push(digit(value));
    }
    Some(text)
}

fn digit(value: u32) -> char {
    (b'0' + value as u8) as char
}

/// Character pairs in 11 bits, with a 6-bit tail character
fn decode_alphanumeric(stream: &mut BitStream<'_>, char_count: usize) -> Option<String> {
    let mut text = String::with_capacity(char_count);
    let mut remaining = char_count;
    while remaining >= 2 {
        let value = stream.read_bits(11)? as usize;
        if value >= 45 * 45 {
            return None;
        }
        text.push(ALPHANUMERIC_CHARS[value / 45]);
        text.push(ALPHANUMERIC_CHARS[value % 45]);
        remaining -= 2;
    }
    if remaining == 1 {
        let value = stream.read_bits(6)? as usize;
        if value >= 45 {
            return None;
        }
        text.push(ALPHANUMERIC_CHARS[value]);
    }
    Some(text)
}

/// 13-bit codes remapped to Shift-JIS byte pairs
fn decode_kanji(stream: &mut BitStream<'_>, char_count: usize) -> Option<Vec<u8>> {
    let mut bytes = Vec::with_capacity(char_count * 2);
    for _ in 0..char_count {
        let value = stream.read_bits(13)?;
        let mut pair = ((value / 0xC0) << 8) | (value % 0xC0);
        pair += if pair < 0x1F00 { 0x8140 } else { 0xC140 };
        bytes.push((pair >> 8) as u8);
        bytes.push((pair & 0xFF) as u8);
    }
    Some(bytes)
}

/// Variable-width ECI header: a run of set bits selects a 7, 14 or 21 bit
/// assignment number; all three set means the header itself is corrupted.
fn decode_eci(stream: &mut BitStream<'_>) -> Option<i32> {
    if stream.read_bits(1)? == 0 {
        return Some(stream.read_bits(7)? as i32);
    }
    if stream.read_bits(1)? == 0 {
        return Some(stream.read_bits(14)? as i32);
    }
    if stream.read_bits(1)? == 0 {
        return Some(stream.read_bits(21)? as i32);
    }
    Some(-1)
}
