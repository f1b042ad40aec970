/// Compact bit matrix for storing binary module data
///
/// Packing is row-major, one bit per cell: bit index `y * width + x`,
/// stored LSB-first within each byte. Tests that serialize grids rely on
/// this exact layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitMatrix {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl BitMatrix {
    /// Create a new all-white (false) matrix with given dimensions
    pub fn new(width: usize, height: usize) -> Self {
        let bytes_needed = (width * height + 7) / 8;
        Self {
            width,
            height,
            data: vec![0; bytes_needed],
        }
    }

    /// Get matrix width
    pub fn width(&self) -> usize {
        self.width
    }

    /// Get matrix height
    pub fn height(&self) -> usize {
        self.height
    }

    /// Get bit at (x, y); out-of-range coordinates read as false
    pub fn get(&self, x: usize, y: usize) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let index = y * self.width + x;
        (self.data[index / 8] >> (index % 8)) & 1 == 1
    }

    /// Signed-coordinate accessor for scan loops that walk off the grid
    pub fn get_signed(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 {
            return false;
        }
        self.get(x as usize, y as usize)
    }

    /// Set bit at (x, y); out-of-range coordinates are ignored
    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let index = y * self.width + x;
        let byte_index = index / 8;
        let bit_index = index % 8;
        if value {
            self.data[byte_index] |= 1 << bit_index;
        } else {
            self.data[byte_index] &= !(1 << bit_index);
        }
    }

    /// Set every in-range bit of the `width x height` rectangle at (left, top)
    pub fn set_region(&mut self, left: usize, top: usize, width: usize, height: usize, value: bool) {
        for y in top..top + height {
            for x in left..left + width {
                self.set(x, y, value);
            }
        }
    }

    /// Transpose in place about the main diagonal, swapping (x, y) and (y, x)
    pub fn mirror(&mut self) {
        for x in 0..self.width {
            for y in (x + 1)..self.height {
                if self.get(x, y) != self.get(y, x) {
                    let a = self.get(x, y);
                    self.set(x, y, self.get(y, x));
                    self.set(y, x, a);
                }
            }
        }
    }

    /// Clear all bits to 0
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Raw packed bytes (row-major, LSB-first)
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

impl Default for BitMatrix {
    fn default() -> Self {
        Self::new(0, 0)
    }
}
