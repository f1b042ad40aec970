//! Projective transforms between the module grid and image space

use crate::models::Point;

/// Perspective transformation matrix (3x3, row-major, column-vector convention)
#[derive(Debug, Clone, Copy)]
pub struct PerspectiveTransform {
    a11: f32,
    a12: f32,
    a13: f32,
    a21: f32,
    a22: f32,
    a23: f32,
    a31: f32,
    a32: f32,
    a33: f32,
}

impl PerspectiveTransform {
    /// Map the unit square (0,0),(1,0),(1,1),(0,1) onto the quadrilateral
    /// `p1..p4` (in that corner order)
    pub fn square_to_quadrilateral(p1: Point, p2: Point, p3: Point, p4: Point) -> Self {
        let dx3 = p1.x - p2.x + p3.x - p4.x;
        let dy3 = p1.y - p2.y + p3.y - p4.y;
        if dx3 == 0.0 && dy3 == 0.0 {
            // Affine case
            return Self {
                a11: p2.x - p1.x,
                a12: p3.x - p2.x,
                a13: p1.x,
                a21: p2.y - p1.y,
                a22: p3.y - p2.y,
                a23: p1.y,
                a31: 0.0,
                a32: 0.0,
                a33: 1.0,
            };
        }
        let dx1 = p2.x - p3.x;
        let dx2 = p4.x - p3.x;
        let dy1 = p2.y - p3.y;
        let dy2 = p4.y - p3.y;
        let denominator = dx1 * dy2 - dx2 * dy1;
        let a31 = (dx3 * dy2 - dx2 * dy3) / denominator;
        let a32 = (dx1 * dy3 - dx3 * dy1) / denominator;
        Self {
            a11: p2.x - p1.x + a31 * p2.x,
            a12: p4.x - p1.x + a32 * p4.x,
            a13: p1.x,
            a21: p2.y - p1.y + a31 * p2.y,
            a22: p4.y - p1.y + a32 * p4.y,
            a23: p1.y,
            a31,
            a32,
            a33: 1.0,
        }
    }

    /// Map the quadrilateral `p1..p4` onto the unit square
    pub fn quadrilateral_to_square(p1: Point, p2: Point, p3: Point, p4: Point) -> Self {
        // The adjugate serves as the inverse up to scale, which homogeneous
        // coordinates absorb.
        Self::square_to_quadrilateral(p1, p2, p3, p4).adjugate()
    }

    fn adjugate(&self) -> Self {
        Self {
            a11: self.a22 * self.a33 - self.a23 * self.a32,
            a12: self.a13 * self.a32 - self.a12 * self.a33,
            a13: self.a12 * self.a23 - self.a13 * self.a22,
            a21: self.a23 * self.a31 - self.a21 * self.a33,
            a22: self.a11 * self.a33 - self.a13 * self.a31,
            a23: self.a13 * self.a21 - self.a11 * self.a23,
            a31: self.a21 * self.a32 - self.a22 * self.a31,
            a32: self.a12 * self.a31 - self.a11 * self.a32,
            a33: self.a11 * self.a22 - self.a12 * self.a21,
        }
    }

    /// Compose with another transform, applying `other` first
    pub fn times(&self, other: &Self) -> Self {
        Self {
            a11: self.a11 * other.a11 + self.a12 * other.a21 + self.a13 * other.a31,
            a12: self.a11 * other.a12 + self.a12 * other.a22 + self.a13 * other.a32,
            a13: self.a11 * other.a13 + self.a12 * other.a23 + self.a13 * other.a33,
            a21: self.a21 * other.a11 + self.a22 * other.a21 + self.a23 * other.a31,
            a22: self.a21 * other.a12 + self.a22 * other.a22 + self.a23 * other.a32,
            a23: self.a21 * other.a13 + self.a22 * other.a23 + self.a23 * other.a33,
            a31: self.a31 * other.a11 + self.a32 * other.a21 + self.a33 * other.a31,
            a32: self.a31 * other.a12 + self.a32 * other.a22 + self.a33 * other.a32,
            a33: self.a31 * other.a13 + self.a32 * other.a23 + self.a33 * other.a33,
        }
    }

    /// Transform a point using this perspective matrix
    pub fn transform(&self, p: &Point) -> Point {
        let denominator = self.a31 * p.x + self.a32 * p.y + self.a33;
        if denominator.abs() < 1e-10 {
            return Point::new(0.0, 0.0);
        }
        Point::new(
            (self.a11 * p.x + self.a12 * p.y + self.a13) / denominator,
            (self.a21 * p.x + self.a22 * p.y + self.a23) / denominator,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(p: Point, x: f32, y: f32) {
        assert!(
            (p.x - x).abs() < 1e-3 && (p.y - y).abs() < 1e-3,
            "expected ({x}, {y}), got ({}, {})",
            p.x,
            p.y
        );
    }

    #[test]
    fn test_square_to_quadrilateral_affine() {
        // Pure scale and translate keeps a31/a32 at zero.
        let t = PerspectiveTransform::square_to_quadrilateral(
            Point::new(10.0, 20.0),
            Point::new(30.0, 20.0),
            Point::new(30.0, 40.0),
            Point::new(10.0, 40.0),
        );
        assert_close(t.transform(&Point::new(0.0, 0.0)), 10.0, 20.0);
        assert_close(t.transform(&Point::new(1.0, 0.0)), 30.0, 20.0);
        assert_close(t.transform(&Point::new(1.0, 1.0)), 30.0, 40.0);
        assert_close(t.transform(&Point::new(0.0, 1.0)), 10.0, 40.0);
        assert_close(t.transform(&Point::new(0.5, 0.5)), 20.0, 30.0);
    }

    #[test]
    fn test_square_to_quadrilateral_projective() {
        let corners = [
            Point::new(0.0, 0.0),
            Point::new(100.0, 10.0),
            Point::new(90.0, 120.0),
            Point::new(-5.0, 100.0),
        ];
        let t = PerspectiveTransform::square_to_quadrilateral(
            corners[0], corners[1], corners[2], corners[3],
        );
        assert_close(t.transform(&Point::new(0.0, 0.0)), 0.0, 0.0);
        assert_close(t.transform(&Point::new(1.0, 0.0)), 100.0, 10.0);
        assert_close(t.transform(&Point::new(1.0, 1.0)), 90.0, 120.0);
        assert_close(t.transform(&Point::new(0.0, 1.0)), -5.0, 100.0);
    }

    #[test]
    fn test_quadrilateral_to_square_inverts() {
        let corners = [
            Point::new(3.0, 7.0),
            Point::new(110.0, 2.0),
            Point::new(104.0, 98.0),
            Point::new(-2.0, 94.0),
        ];
        let t = PerspectiveTransform::quadrilateral_to_square(
            corners[0], corners[1], corners[2], corners[3],
        );
        assert_close(t.transform(&corners[0]), 0.0, 0.0);
        assert_close(t.transform(&corners[1]), 1.0, 0.0);
        assert_close(t.transform(&corners[2]), 1.0, 1.0);
        assert_close(t.transform(&corners[3]), 0.0, 1.0);
    }

    #[test]
    fn test_composition_applies_other_first() {
        let quad = [
            Point::new(5.0, 5.0),
            Point::new(55.0, 8.0),
            Point::new(52.0, 61.0),
            Point::new(2.0, 57.0),
        ];
        let to_square =
            PerspectiveTransform::quadrilateral_to_square(quad[0], quad[1], quad[2], quad[3]);
        let back =
            PerspectiveTransform::square_to_quadrilateral(quad[0], quad[1], quad[2], quad[3]);
        let round_trip = back.times(&to_square);
        for corner in quad {
            assert_close(round_trip.transform(&corner), corner.x, corner.y);
        }
    }
}
