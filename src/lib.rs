//! pixelqr - QR symbol decoding straight from raw RGBA pixels
//!
//! A pure Rust port of the classic binarize / locate / extract / decode
//! pipeline. Feed it an RGBA frame and get back the decoded payload along
//! with the symbol's position in the source image.
//!
//! ```
//! use pixelqr::{decode, DecodeOptions};
//!
//! let (width, height) = (64, 64);
//! let pixels = vec![255u8; width * height * 4];
//! let result = decode(&pixels, width, height, &DecodeOptions::default());
//! assert!(result.is_none()); // a blank frame carries no symbol
//! ```

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Adaptive thresholding of RGBA frames into binary module grids
pub mod binarize;
/// Symbol decoding: version/format recovery, error correction, segments
pub mod decode;
/// Projective resampling of located symbols into module grids
pub mod extract;
/// Perspective transform math shared by locator and extractor
pub mod geometry;
/// Finder pattern search and symbol location
pub mod locate;
/// Core data structures (BitMatrix, Point, decoded symbol records)
pub mod models;

pub use binarize::GreyscaleWeights;
pub use decode::decode_matrix;
pub use models::{
    BitMatrix, Chunk, DecodedData, DecodedSymbol, ECLevel, Point, SymbolLocation,
};

use binarize::BinarizedImage;
use extract::extract;
use geometry::PerspectiveTransform;
use locate::locate;

/// Which binarized grids to try, and in what order
///
/// A standard symbol is dark-on-light; a symbol printed in reverse video
/// only shows up in the complement grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InversionAttempts {
    /// Only the normal grid
    DontInvert,
    /// Only the complement grid
    OnlyInvert,
    /// Normal grid first, then the complement
    #[default]
    AttemptBoth,
    /// Complement grid first, then the normal one
    InvertFirst,
}

/// Options for [`decode`] and [`decode_in_place`]
#[derive(Debug, Clone)]
pub struct DecodeOptions {
    /// Inversion policy, [`InversionAttempts::AttemptBoth`] by default
    pub inversion_attempts: InversionAttempts,
    /// Luminance weighting, BT.709 float math by default
    pub greyscale_weights: GreyscaleWeights,
    /// Allow [`decode_in_place`] to reuse the input buffer for scratch
    /// space, on by default
    pub can_overwrite_image: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            inversion_attempts: InversionAttempts::default(),
            greyscale_weights: GreyscaleWeights::default(),
            can_overwrite_image: true,
        }
    }
}

/// Decode the first QR symbol found in an RGBA frame.
///
/// `pixels` must hold `width * height * 4` bytes, row-major, top to bottom;
/// a mismatched length panics. Returns `None` when no symbol could be
/// located and decoded under the given options. The input is never mutated.
pub fn decode(
    pixels: &[u8],
    width: usize,
    height: usize,
    options: &DecodeOptions,
) -> Option<DecodedSymbol> {
    let return_inverted = options.inversion_attempts != InversionAttempts::DontInvert;
    let binarized = binarize::binarize(
        pixels,
        width,
        height,
        return_inverted,
        &options.greyscale_weights,
    );
    decode_binarized(binarized, options.inversion_attempts)
}

/// Like [`decode`], but may reuse the caller's pixel buffer as scratch space
/// when `can_overwrite_image` is set. The buffer contents are unspecified
/// afterwards. With `can_overwrite_image` unset this is exactly [`decode`].
pub fn decode_in_place(
    pixels: &mut [u8],
    width: usize,
    height: usize,
    options: &DecodeOptions,
) -> Option<DecodedSymbol> {
    if !options.can_overwrite_image {
        return decode(pixels, width, height, options);
    }
    let return_inverted = options.inversion_attempts != InversionAttempts::DontInvert;
    let binarized = binarize::binarize_in_place(
        pixels,
        width,
        height,
        return_inverted,
        &options.greyscale_weights,
    );
    decode_binarized(binarized, options.inversion_attempts)
}

fn decode_binarized(
    binarized: BinarizedImage,
    inversion: InversionAttempts,
) -> Option<DecodedSymbol> {
    let BinarizedImage { matrix, inverted } = binarized;
    let grids: Vec<BitMatrix> = match inversion {
        InversionAttempts::DontInvert => vec![matrix],
        InversionAttempts::OnlyInvert => vec![inverted?],
        InversionAttempts::AttemptBoth => vec![matrix, inverted?],
        InversionAttempts::InvertFirst => vec![inverted?, matrix],
    };

    for grid in &grids {
        for location in locate(grid) {
            let extracted = extract(grid, &location);
            let mut module_grid = extracted.matrix;
            if let Some(data) = decode_matrix(&mut module_grid) {
                let location = symbol_location(&extracted.mapping, location.dimension);
                return Some(DecodedSymbol::from_parts(data, location));
            }
        }
    }
    None
}

/// Map the canonical module-space landmarks back into source-image pixels.
fn symbol_location(mapping: &PerspectiveTransform, dimension: usize) -> SymbolLocation {
    let dim = dimension as f32;
    SymbolLocation {
        top_left_corner: mapping.transform(&Point::new(0.0, 0.0)),
        top_right_corner: mapping.transform(&Point::new(dim, 0.0)),
        bottom_right_corner: mapping.transform(&Point::new(dim, dim)),
        bottom_left_corner: mapping.transform(&Point::new(0.0, dim)),
        top_left_finder: mapping.transform(&Point::new(3.5, 3.5)),
        top_right_finder: mapping.transform(&Point::new(dim - 3.5, 3.5)),
        bottom_left_finder: mapping.transform(&Point::new(3.5, dim - 3.5)),
        bottom_right_alignment: mapping.transform(&Point::new(dim - 6.5, dim - 6.5)),
    }
}
