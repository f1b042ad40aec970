//! Adaptive thresholding of raw RGBA frames into module grids

use log::debug;
use rayon::prelude::*;

use crate::models::BitMatrix;

/// Block edge length in pixels for local black-point estimation
const REGION_SIZE: usize = 8;
/// Minimum luminance spread for a block to estimate its own black point
const MIN_DYNAMIC_RANGE: u8 = 24;
/// Scale applied to well-contrasted black points; favors classifying pixels
/// as black so the light holes inside finder patterns stay connected
const BLACK_POINT_BIAS: f32 = 1.11;
/// Frames at or above this pixel count convert luminance on rayon workers
const PARALLEL_MIN_PIXELS: usize = 1 << 20;

/// Luminance weighting for the RGBA to greyscale conversion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GreyscaleWeights {
    /// Red weight
    pub red: f32,
    /// Green weight
    pub green: f32,
    /// Blue weight
    pub blue: f32,
    /// Treat the weights as 8-bit fixed point (pre-scaled by 256)
    pub use_integer_approximation: bool,
}

impl Default for GreyscaleWeights {
    /// ITU-R BT.709 weights, float math
    fn default() -> Self {
        Self {
            red: 0.2126,
            green: 0.7152,
            blue: 0.0722,
            use_integer_approximation: false,
        }
    }
}

impl GreyscaleWeights {
    /// Stock fixed-point approximation of the BT.709 weights (54/183/19, sums to 256)
    pub fn integer_approximation() -> Self {
        Self {
            red: 54.0,
            green: 183.0,
            blue: 19.0,
            use_integer_approximation: true,
        }
    }
}

/// Output of the binarizer: the thresholded grid and, on request, its complement
#[derive(Debug, Clone)]
pub struct BinarizedImage {
    /// Pixels at or below the local threshold
    pub matrix: BitMatrix,
    /// Complement grid, for white-on-black symbols
    pub inverted: Option<BitMatrix>,
}

/// Binarize an RGBA frame with locally adaptive thresholds
///
/// Panics if `pixels.len() != width * height * 4`; a mismatched buffer is
/// caller misuse, not image noise.
pub fn binarize(
    pixels: &[u8],
    width: usize,
    height: usize,
    return_inverted: bool,
    weights: &GreyscaleWeights,
) -> BinarizedImage {
    assert_eq!(
        pixels.len(),
        width * height * 4,
        "pixel buffer length does not match dimensions"
    );
    let pixel_count = width * height;
    if pixel_count == 0 {
        return BinarizedImage {
            matrix: BitMatrix::new(width, height),
            inverted: return_inverted.then(|| BitMatrix::new(width, height)),
        };
    }

    // Luminance plane and black-point plane share one scratch allocation.
    let regions = region_count(width) * region_count(height);
    let mut scratch = vec![0u8; pixel_count + regions];
    let (grey, black_points) = scratch.split_at_mut(pixel_count);
    convert_luminance(pixels, width, height, weights, grey);
    threshold(grey, width, height, return_inverted, black_points)
}

/// Binarize an RGBA frame, reusing the caller's buffer for the luminance plane
///
/// The RGBA contents are overwritten; the first `width * height` bytes end up
/// holding greyscale values. Output is identical to [`binarize`].
pub fn binarize_in_place(
    pixels: &mut [u8],
    width: usize,
    height: usize,
    return_inverted: bool,
    weights: &GreyscaleWeights,
) -> BinarizedImage {
    assert_eq!(
        pixels.len(),
        width * height * 4,
        "pixel buffer length does not match dimensions"
    );
    let pixel_count = width * height;
    if pixel_count == 0 {
        return BinarizedImage {
            matrix: BitMatrix::new(width, height),
            inverted: return_inverted.then(|| BitMatrix::new(width, height)),
        };
    }

    // Forward compaction: the write index never passes the read index.
    for i in 0..pixel_count {
        let idx = i * 4;
        pixels[i] = pixel_luminance(pixels[idx], pixels[idx + 1], pixels[idx + 2], weights);
    }

    let regions = region_count(width) * region_count(height);
    let mut black_points = vec![0u8; regions];
    threshold(&pixels[..pixel_count], width, height, return_inverted, &mut black_points)
}

fn region_count(pixels: usize) -> usize {
    (pixels + REGION_SIZE - 1) / REGION_SIZE
}

#[inline]
fn pixel_luminance(r: u8, g: u8, b: u8, weights: &GreyscaleWeights) -> u8 {
    if weights.use_integer_approximation {
        let lum = (weights.red as i32 * r as i32
            + weights.green as i32 * g as i32
            + weights.blue as i32 * b as i32
            + 128)
            >> 8;
        lum.clamp(0, 255) as u8
    } else {
        let lum = weights.red * r as f32 + weights.green * g as f32 + weights.blue * b as f32;
        lum.round().min(255.0) as u8
    }
}

fn convert_luminance(
    pixels: &[u8],
    width: usize,
    height: usize,
    weights: &GreyscaleWeights,
    out: &mut [u8],
) {
    let row = |y: usize, out_row: &mut [u8]| {
        let row_start = y * width * 4;
        for (x, cell) in out_row.iter_mut().enumerate() {
            let idx = row_start + x * 4;
            *cell = pixel_luminance(pixels[idx], pixels[idx + 1], pixels[idx + 2], weights);
        }
    };

    if width * height >= PARALLEL_MIN_PIXELS {
        out.par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, out_row)| row(y, out_row));
    } else {
        for (y, out_row) in out.chunks_mut(width).enumerate() {
            row(y, out_row);
        }
    }
}

fn threshold(
    grey: &[u8],
    width: usize,
    height: usize,
    return_inverted: bool,
    black_points: &mut [u8],
) -> BinarizedImage {
    let h_regions = region_count(width);
    let v_regions = region_count(height);

    // Pass 1: one black point per 8x8 block.
    for vr in 0..v_regions {
        for hr in 0..h_regions {
            let mut min = 255u8;
            let mut max = 0u8;
            for dy in 0..REGION_SIZE {
                let y = (vr * REGION_SIZE + dy).min(height - 1);
                for dx in 0..REGION_SIZE {
                    let x = (hr * REGION_SIZE + dx).min(width - 1);
                    let lum = grey[y * width + x];
                    min = min.min(lum);
                    max = max.max(lum);
                }
            }

            let black_point = if max - min > MIN_DYNAMIC_RANGE {
                (((min as f32 + max as f32) / 2.0) * BLACK_POINT_BIAS).min(255.0) as u8
            } else {
                // Washed-out block. Assume background, unless an already
                // estimated neighbor says the region is darker than its
                // threshold, in which case inherit that estimate.
                let mut black_point = min / 2;
                if vr > 0 && hr > 0 {
                    let neighbor_average = (black_points[(vr - 1) * h_regions + hr] as u32
                        + 2 * black_points[vr * h_regions + hr - 1] as u32
                        + black_points[(vr - 1) * h_regions + hr - 1] as u32)
                        / 4;
                    if (min as u32) < neighbor_average {
                        black_point = neighbor_average as u8;
                    }
                }
                black_point
            };
            black_points[vr * h_regions + hr] = black_point;
        }
    }

    // Pass 2: threshold each block against the average black point of its
    // 5x5 block neighborhood, re-centered at the grid edges.
    let mut matrix = BitMatrix::new(width, height);
    let mut inverted = return_inverted.then(|| BitMatrix::new(width, height));
    for vr in 0..v_regions {
        let top = (vr as i32).clamp(2, (v_regions as i32 - 3).max(2));
        for hr in 0..h_regions {
            let left = (hr as i32).clamp(2, (h_regions as i32 - 3).max(2));
            let mut sum = 0u32;
            for dy in -2..=2i32 {
                let ry = (top + dy).clamp(0, v_regions as i32 - 1) as usize;
                for dx in -2..=2i32 {
                    let rx = (left + dx).clamp(0, h_regions as i32 - 1) as usize;
                    sum += black_points[ry * h_regions + rx] as u32;
                }
            }
            let threshold = sum / 25;

            for dy in 0..REGION_SIZE {
                let y = vr * REGION_SIZE + dy;
                if y >= height {
                    break;
                }
                for dx in 0..REGION_SIZE {
                    let x = hr * REGION_SIZE + dx;
                    if x >= width {
                        break;
                    }
                    let black = grey[y * width + x] as u32 <= threshold;
                    matrix.set(x, y, black);
                    if let Some(inv) = inverted.as_mut() {
                        inv.set(x, y, !black);
                    }
                }
            }
        }
    }

    debug!(
        "binarize: {}x{} px, {}x{} regions",
        width, height, h_regions, v_regions
    );
    BinarizedImage { matrix, inverted }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Flat RGBA frame of one grey level, with an optional darker square.
    fn grey_frame(width: usize, height: usize, level: u8) -> Vec<u8> {
        let mut pixels = Vec::with_capacity(width * height * 4);
        for _ in 0..width * height {
            pixels.extend_from_slice(&[level, level, level, 255]);
        }
        pixels
    }

    fn paint_square(pixels: &mut [u8], width: usize, x0: usize, y0: usize, size: usize, level: u8) {
        for y in y0..y0 + size {
            for x in x0..x0 + size {
                let idx = (y * width + x) * 4;
                pixels[idx] = level;
                pixels[idx + 1] = level;
                pixels[idx + 2] = level;
            }
        }
    }

    #[test]
    fn test_default_weights_are_bt709() {
        let w = GreyscaleWeights::default();
        assert!(!w.use_integer_approximation);
        assert!((w.red + w.green + w.blue - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_integer_approximation_tracks_float() {
        let float = GreyscaleWeights::default();
        let fixed = GreyscaleWeights::integer_approximation();
        for (r, g, b) in [(255, 255, 255), (0, 0, 0), (200, 30, 90), (12, 200, 255)] {
            let a = pixel_luminance(r, g, b, &float) as i32;
            let b = pixel_luminance(r, g, b, &fixed) as i32;
            assert!((a - b).abs() <= 2, "float {a} vs fixed {b}");
        }
    }

    #[test]
    fn test_dark_square_on_white() {
        let (width, height) = (64, 64);
        let mut pixels = grey_frame(width, height, 200);
        paint_square(&mut pixels, width, 24, 24, 16, 10);

        let out = binarize(&pixels, width, height, false, &GreyscaleWeights::default());
        assert!(out.inverted.is_none());
        // Square interior is black, background is white.
        assert!(out.matrix.get(31, 31));
        assert!(out.matrix.get(24, 24));
        assert!(!out.matrix.get(0, 0));
        assert!(!out.matrix.get(63, 63));
    }

    #[test]
    fn test_inverted_is_complement() {
        let (width, height) = (40, 40);
        let mut pixels = grey_frame(width, height, 220);
        paint_square(&mut pixels, width, 8, 8, 12, 20);

        let out = binarize(&pixels, width, height, true, &GreyscaleWeights::default());
        let inverted = out.inverted.as_ref().unwrap();
        for y in 0..height {
            for x in 0..width {
                assert_eq!(out.matrix.get(x, y), !inverted.get(x, y));
            }
        }
    }

    #[test]
    fn test_washed_out_region_inherits_neighbor_threshold() {
        // Top half alternates dark/light per pixel; bottom half is uniformly
        // dark. The bottom blocks have no contrast of their own and must
        // inherit the top's black point to classify as black.
        let (width, height) = (64, 64);
        let mut pixels = grey_frame(width, height, 10);
        for y in 0..32 {
            for x in 0..width {
                if (x + y) % 2 == 0 {
                    let idx = (y * width + x) * 4;
                    pixels[idx] = 200;
                    pixels[idx + 1] = 200;
                    pixels[idx + 2] = 200;
                }
            }
        }

        let out = binarize(&pixels, width, height, false, &GreyscaleWeights::default());
        assert!(out.matrix.get(40, 48), "uniform dark region should stay black");
    }

    #[test]
    fn test_in_place_matches_allocating() {
        let (width, height) = (48, 40);
        let mut pixels = grey_frame(width, height, 230);
        paint_square(&mut pixels, width, 10, 12, 14, 15);

        let baseline = binarize(&pixels, width, height, true, &GreyscaleWeights::default());
        let mut scratch = pixels.clone();
        let reused = binarize_in_place(&mut scratch, width, height, true, &GreyscaleWeights::default());

        assert_eq!(baseline.matrix.as_bytes(), reused.matrix.as_bytes());
        assert_eq!(
            baseline.inverted.as_ref().unwrap().as_bytes(),
            reused.inverted.as_ref().unwrap().as_bytes()
        );
    }

    #[test]
    #[should_panic(expected = "pixel buffer length")]
    fn test_mismatched_buffer_panics() {
        let pixels = vec![0u8; 10];
        binarize(&pixels, 4, 4, false, &GreyscaleWeights::default());
    }
}
