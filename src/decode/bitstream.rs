//! MSB-first bit reader over the corrected codeword stream

/// Reads bit fields most-significant-bit first from a byte slice
pub struct BitStream<'a> {
    bytes: &'a [u8],
    bit_offset: usize,
}

impl<'a> BitStream<'a> {
    /// Wrap a byte slice; reading starts at the high bit of the first byte
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            bit_offset: 0,
        }
    }

    /// Bits left to read
    pub fn available(&self) -> usize {
        self.bytes.len() * 8 - self.bit_offset
    }

    /// Bits consumed so far
    pub fn bit_offset(&self) -> usize {
        self.bit_offset
    }

    /// Read `count` bits (at most 32) as an unsigned value, or None when the
    /// stream has fewer bits left
    pub fn read_bits(&mut self, count: usize) -> Option<u32> {
        debug_assert!(count <= 32);
        if count > self.available() {
            return None;
        }
        let mut value = 0u32;
        for _ in 0..count {
            let byte = self.bytes[self.bit_offset / 8];
            let bit = (byte >> (7 - self.bit_offset % 8)) & 1;
            value = (value << 1) | bit as u32;
            self.bit_offset += 1;
        }
        Some(value)
    }
}
