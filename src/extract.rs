//! Projective resampling of a located symbol into a module grid

use crate::geometry::PerspectiveTransform;
use crate::locate::QrLocation;
use crate::models::{BitMatrix, Point};

/// A module grid sampled from the source image, along with the transform
/// that maps module coordinates back to source pixels.
#[derive(Debug, Clone)]
pub struct ExtractedQr {
    /// One cell per module
    pub matrix: BitMatrix,
    /// Module coordinate to source-image coordinate
    pub mapping: PerspectiveTransform,
}

/// Resample a located symbol into a `dimension x dimension` grid.
///
/// Each module is a single point sample at its mapped center; no
/// interpolation is performed.
pub fn extract(image: &BitMatrix, location: &QrLocation) -> ExtractedQr {
    let dimension = location.dimension;
    let dim = dimension as f32;

    // The finder centers sit 3.5 modules in from their corners; the
    // alignment pattern sits 6.5 in from the fourth corner.
    let q_to_s = PerspectiveTransform::quadrilateral_to_square(
        Point::new(3.5, 3.5),
        Point::new(dim - 3.5, 3.5),
        Point::new(dim - 6.5, dim - 6.5),
        Point::new(3.5, dim - 3.5),
    );
    let s_to_q = PerspectiveTransform::square_to_quadrilateral(
        location.top_left,
        location.top_right,
        location.alignment_pattern,
        location.bottom_left,
    );
    let mapping = s_to_q.times(&q_to_s);

    let mut matrix = BitMatrix::new(dimension, dimension);
    for y in 0..dimension {
        for x in 0..dimension {
            let source = mapping.transform(&Point::new(x as f32 + 0.5, y as f32 + 0.5));
            matrix.set(
                x,
                y,
                image.get_signed(source.x.floor() as i32, source.y.floor() as i32),
            );
        }
    }
    ExtractedQr { matrix, mapping }
}
