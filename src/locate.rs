//! Finder and alignment pattern search on a binarized grid

use log::debug;

use crate::models::{BitMatrix, Point};

/// How many of the best-scoring finder candidates to try as group anchors
const MAX_FINDER_PATTERNS_TO_SEARCH: usize = 5;
/// Bounds on the size ratio between nested scan spans of one quad
const MIN_QUAD_RATIO: f32 = 0.5;
const MAX_QUAD_RATIO: f32 = 1.5;

/// Cross-section of a finder pattern through its center
const FINDER_PATTERN_RATIOS: [f32; 5] = [1.0, 1.0, 3.0, 1.0, 1.0];
/// Cross-section of an alignment pattern through its center
const ALIGNMENT_PATTERN_RATIOS: [f32; 3] = [1.0, 1.0, 1.0];

/// A located symbol: three finder centers, the alignment anchor and the
/// estimated module count per side, all in source-image coordinates.
#[derive(Debug, Clone, Copy)]
pub struct QrLocation {
    /// Center of the top-left finder pattern
    pub top_left: Point,
    /// Center of the top-right finder pattern
    pub top_right: Point,
    /// Center of the bottom-left finder pattern
    pub bottom_left: Point,
    /// Alignment pattern center, or the extrapolated fourth anchor for
    /// symbols too small to carry one
    pub alignment_pattern: Point,
    /// Modules per side
    pub dimension: usize,
}

/// Horizontal extent of one pattern's center square on one row
#[derive(Debug, Clone, Copy)]
struct ScanSpan {
    start_x: f32,
    end_x: f32,
    y: usize,
}

/// Vertically contiguous stack of scan spans
#[derive(Debug, Clone, Copy)]
struct PatternQuad {
    top: ScanSpan,
    bottom: ScanSpan,
}

impl PatternQuad {
    fn height(&self) -> usize {
        self.bottom.y - self.top.y
    }
}

#[derive(Debug, Clone, Copy)]
struct FinderCandidate {
    position: Point,
    size: f32,
    score: f32,
}

/// Search a binarized grid for QR symbols.
///
/// Returns up to two location estimates for the best finder-pattern group:
/// one from the raw quad centers, which tolerates perspective skew, and one
/// with each center re-centered inside its black region, which tolerates
/// compression artifacts. Callers should attempt extraction with both.
pub fn locate(matrix: &BitMatrix) -> Vec<QrLocation> {
    let mut finder_quads: Vec<PatternQuad> = Vec::new();
    let mut active_finder: Vec<PatternQuad> = Vec::new();
    let mut alignment_quads: Vec<PatternQuad> = Vec::new();
    let mut active_alignment: Vec<PatternQuad> = Vec::new();

    for y in 0..matrix.height() {
        let mut scans = [0usize; 5];
        let mut current_run = 0usize;
        let mut last_bit = false;

        // One virtual white pixel past the right edge flushes the final run.
        for x in 0..=matrix.width() {
            let v = x < matrix.width() && matrix.get(x, y);
            if v == last_bit {
                current_run += 1;
                continue;
            }
            scans = [scans[1], scans[2], scans[3], scans[4], current_run];
            current_run = 1;
            last_bit = v;

            // 1:1:3:1:1 cross-section followed by a white pixel
            let finder_average = scans.iter().sum::<usize>() as f32 / 7.0;
            let valid_finder = !v
                && (scans[0] as f32 - finder_average).abs() < finder_average
                && (scans[1] as f32 - finder_average).abs() < finder_average
                && (scans[2] as f32 - 3.0 * finder_average).abs() < 3.0 * finder_average
                && (scans[3] as f32 - finder_average).abs() < finder_average
                && (scans[4] as f32 - finder_average).abs() < finder_average;

            // 1:1:1 cross-section followed by a black pixel
            let alignment_average = scans[2..].iter().sum::<usize>() as f32 / 3.0;
            let valid_alignment = v
                && (scans[2] as f32 - alignment_average).abs() < alignment_average
                && (scans[3] as f32 - alignment_average).abs() < alignment_average
                && (scans[4] as f32 - alignment_average).abs() < alignment_average;

            if valid_finder {
                // Span of the large center square
                let end_x = (x - scans[3] - scans[4]) as f32;
                let span = ScanSpan {
                    start_x: end_x - scans[2] as f32,
                    end_x,
                    y,
                };
                extend_or_start_quad(&mut active_finder, span, scans[2] as f32);
            }
            if valid_alignment {
                // Span of the small center square
                let end_x = (x - scans[4]) as f32;
                let span = ScanSpan {
                    start_x: end_x - scans[3] as f32,
                    end_x,
                    y,
                };
                extend_or_start_quad(&mut active_alignment, span, scans[3] as f32);
            }
        }

        // Quads no span continued on this row are done.
        finder_quads.extend(
            active_finder
                .iter()
                .filter(|q| q.bottom.y != y && q.height() >= 2)
                .copied(),
        );
        active_finder.retain(|q| q.bottom.y == y);
        alignment_quads.extend(active_alignment.iter().filter(|q| q.bottom.y != y).copied());
        active_alignment.retain(|q| q.bottom.y == y);
    }
    finder_quads.extend(active_finder.drain(..).filter(|q| q.height() >= 2));
    alignment_quads.append(&mut active_alignment);

    // Score each finder quad by its cross-section ratios, ignoring position.
    let mut candidates: Vec<FinderCandidate> = finder_quads
        .iter()
        .filter_map(|q| {
            let x = (q.top.start_x + q.top.end_x + q.bottom.start_x + q.bottom.end_x) / 4.0;
            let y = (q.top.y as f32 + q.bottom.y as f32 + 1.0) / 2.0;
            if !matrix.get_signed(x.round() as i32, y.round() as i32) {
                return None;
            }
            let size = ((q.top.end_x - q.top.start_x)
                + (q.bottom.end_x - q.bottom.start_x)
                + (q.height() as f32 + 1.0))
                / 3.0;
            let score = score_pattern(
                matrix,
                Point::new(x.round(), y.round()),
                &FINDER_PATTERN_RATIOS,
            );
            Some(FinderCandidate {
                position: Point::new(x, y),
                size,
                score,
            })
        })
        .collect();
    candidates.sort_by(|a, b| a.score.total_cmp(&b.score));

    // For each of the best candidates, pick the two size-compatible partners
    // with the lowest adjusted score, and keep the cheapest such triple.
    let mut best_group: Option<([FinderCandidate; 3], f32)> = None;
    for (i, point) in candidates
        .iter()
        .enumerate()
        .take(MAX_FINDER_PATTERNS_TO_SEARCH)
    {
        let mut others: Vec<(FinderCandidate, f32)> = candidates
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(_, p)| {
                let size_delta = p.size - point.size;
                (*p, p.score + size_delta * size_delta / point.size)
            })
            .collect();
        others.sort_by(|a, b| a.1.total_cmp(&b.1));
        if others.len() < 2 {
            continue;
        }
        let score = point.score + others[0].1 + others[1].1;
        if best_group.is_none_or(|(_, s)| score < s) {
            best_group = Some(([*point, others[0].0, others[1].0], score));
        }
    }
    let Some((group, _)) = best_group else {
        return Vec::new();
    };

    let (top_left, top_right, bottom_left) =
        reorder_finder_patterns(group[0].position, group[1].position, group[2].position);

    let mut result = Vec::new();
    if let Some((alignment_pattern, dimension)) =
        find_alignment(matrix, &alignment_quads, &top_left, &top_right, &bottom_left)
    {
        result.push(QrLocation {
            top_left,
            top_right,
            bottom_left,
            alignment_pattern,
            dimension,
        });
    }

    // A slight skew in the quad centers can come from compression artifacts
    // rather than real perspective. A second estimate recentered inside each
    // black region decodes some symbols the first one misses.
    let mid_top_right = recenter_location(matrix, &top_right);
    let mid_top_left = recenter_location(matrix, &top_left);
    let mid_bottom_left = recenter_location(matrix, &bottom_left);
    if let Some((alignment_pattern, dimension)) = find_alignment(
        matrix,
        &alignment_quads,
        &mid_top_left,
        &mid_top_right,
        &mid_bottom_left,
    ) {
        result.push(QrLocation {
            top_left: mid_top_left,
            top_right: mid_top_right,
            bottom_left: mid_bottom_left,
            alignment_pattern,
            dimension,
        });
    }

    debug!(
        "locate: {} finder candidate(s), {} location estimate(s)",
        candidates.len(),
        result.len()
    );
    result
}

/// Attach a span to the first active quad whose bottom span overlaps it, or
/// start a new quad. Nesting spans must also pass a size-ratio check.
fn extend_or_start_quad(active: &mut Vec<PatternQuad>, span: ScanSpan, center_run: f32) {
    let matched = active.iter_mut().find(|q| {
        (q.bottom.start_x <= span.start_x && q.bottom.end_x >= span.start_x)
            || (q.bottom.start_x <= span.end_x && q.bottom.end_x >= span.end_x)
            || (span.start_x <= q.bottom.start_x && span.end_x >= q.bottom.end_x && {
                let ratio = center_run / (q.bottom.end_x - q.bottom.start_x);
                ratio > MIN_QUAD_RATIO && ratio < MAX_QUAD_RATIO
            })
    });
    match matched {
        Some(quad) => quad.bottom = span,
        None => active.push(PatternQuad { top: span, bottom: span }),
    }
}

/// Assign three pattern centers to corners. The two farthest apart sit on
/// the diagonal; a cross-product sign distinguishes left from right.
fn reorder_finder_patterns(p1: Point, p2: Point, p3: Point) -> (Point, Point, Point) {
    let d12 = p1.distance(&p2);
    let d23 = p2.distance(&p3);
    let d13 = p1.distance(&p3);

    let (mut bottom_left, top_left, mut top_right) = if d23 >= d12 && d23 >= d13 {
        (p2, p1, p3)
    } else if d13 >= d23 && d13 >= d12 {
        (p1, p2, p3)
    } else {
        (p1, p3, p2)
    };

    if (top_right.x - top_left.x) * (bottom_left.y - top_left.y)
        - (top_right.y - top_left.y) * (bottom_left.x - top_left.x)
        < 0.0
    {
        std::mem::swap(&mut bottom_left, &mut top_right);
    }
    (top_left, top_right, bottom_left)
}

/// Resolve the alignment anchor and dimension for one corner triple.
fn find_alignment(
    matrix: &BitMatrix,
    alignment_quads: &[PatternQuad],
    top_left: &Point,
    top_right: &Point,
    bottom_left: &Point,
) -> Option<(Point, usize)> {
    let (dimension, module_size) = compute_dimension(matrix, top_left, top_right, bottom_left)?;

    // Extrapolate the fourth corner, then pull it 3 modules towards the
    // top-left since the alignment pattern sits inset from the corner.
    let bottom_right = Point::new(
        top_right.x - top_left.x + bottom_left.x,
        top_right.y - top_left.y + bottom_left.y,
    );
    let modules_between =
        (top_left.distance(bottom_left) + top_left.distance(top_right)) / 2.0 / module_size;
    let correction = 1.0 - 3.0 / modules_between;
    let expected = Point::new(
        top_left.x + correction * (bottom_right.x - top_left.x),
        top_left.y + correction * (bottom_right.y - top_left.y),
    );

    let mut scored: Vec<(Point, f32)> = alignment_quads
        .iter()
        .filter_map(|q| {
            let x = (q.top.start_x + q.top.end_x + q.bottom.start_x + q.bottom.end_x) / 4.0;
            let y = (q.top.y as f32 + q.bottom.y as f32 + 1.0) / 2.0;
            if !matrix.get_signed(x.floor() as i32, y.floor() as i32) {
                return None;
            }
            let position = Point::new(x, y);
            let score = score_pattern(
                matrix,
                Point::new(x.floor(), y.floor()),
                &ALIGNMENT_PATTERN_RATIOS,
            ) + position.distance(&expected);
            Some((position, score))
        })
        .collect();
    scored.sort_by(|a, b| a.1.total_cmp(&b.1));

    // Below 15 modules between finder patterns this is a version 1 symbol,
    // which has no alignment pattern; the extrapolation is all we have.
    let alignment = if modules_between >= 15.0 && !scored.is_empty() {
        scored[0].0
    } else {
        expected
    };
    Some((alignment, dimension))
}

/// Estimate the module size from four center cross-sections and derive the
/// module count per side, snapped to the nearest valid 4k+17 dimension.
fn compute_dimension(
    matrix: &BitMatrix,
    top_left: &Point,
    top_right: &Point,
    bottom_left: &Point,
) -> Option<(usize, f32)> {
    let module_size = (run_average(matrix, top_left, bottom_left)?
        + run_average(matrix, top_left, top_right)?
        + run_average(matrix, bottom_left, top_left)?
        + run_average(matrix, top_right, top_left)?)
        / 4.0;
    if module_size < 1.0 {
        return None;
    }
    let top_dimension = (top_left.distance(top_right) / module_size).round() as i32;
    let side_dimension = (top_left.distance(bottom_left) / module_size).round() as i32;
    let mut dimension = (top_dimension + side_dimension) / 2 + 7;
    match dimension % 4 {
        0 => dimension += 1,
        2 => dimension -= 1,
        3 => dimension -= 2,
        _ => {}
    }
    Some((dimension as usize, module_size))
}

fn run_average(matrix: &BitMatrix, from: &Point, to: &Point) -> Option<f32> {
    // The measured cross-section is 1:1:3:1:1, hence 7 modules per span.
    let runs = count_black_white_run(matrix, from, to, 5)?;
    Some(runs.iter().sum::<f32>() / 7.0)
}

/// Score how well the black/white runs around a point match the expected
/// ratios, measured horizontally, vertically and along both diagonals.
/// Lower is better; a point whose runs leave the image scores infinity.
fn score_pattern(matrix: &BitMatrix, point: Point, ratios: &[f32]) -> f32 {
    pattern_score_inner(matrix, point, ratios).unwrap_or(f32::INFINITY)
}

fn pattern_score_inner(matrix: &BitMatrix, point: Point, ratios: &[f32]) -> Option<f32> {
    let length = ratios.len();
    let horizontal = count_black_white_run(matrix, &point, &Point::new(-1.0, point.y), length)?;
    let vertical = count_black_white_run(matrix, &point, &Point::new(point.x, -1.0), length)?;

    let top_left_target = Point::new(
        (point.x - point.y).max(0.0) - 1.0,
        (point.y - point.x).max(0.0) - 1.0,
    );
    let diagonal_down = count_black_white_run(matrix, &point, &top_left_target, length)?;

    let width = matrix.width() as f32;
    let top_right_target = Point::new(
        (point.x + point.y).min(width) + 1.0,
        (point.y - (width - point.x)).max(0.0) - 1.0,
    );
    let diagonal_up = count_black_white_run(matrix, &point, &top_right_target, length)?;

    let horz = score_run(&horizontal, ratios);
    let vert = score_run(&vertical, ratios);
    let down = score_run(&diagonal_down, ratios);
    let up = score_run(&diagonal_up, ratios);

    let ratio_error =
        (horz.1 * horz.1 + vert.1 * vert.1 + down.1 * down.1 + up.1 * up.1).sqrt();
    let average_size = (horz.0 + vert.0 + down.0 + up.0) / 4.0;
    let size_error = ((horz.0 - average_size).powi(2)
        + (vert.0 - average_size).powi(2)
        + (down.0 - average_size).powi(2)
        + (up.0 - average_size).powi(2))
        / average_size;
    Some(ratio_error + size_error)
}

/// Squared deviation of a run sequence from scaled ratios, plus the implied
/// average module size.
fn score_run(sequence: &[f32], ratios: &[f32]) -> (f32, f32) {
    let average_size = sequence.iter().sum::<f32>() / ratios.iter().sum::<f32>();
    let mut error = 0.0;
    for (s, ratio) in sequence.iter().zip(ratios) {
        let deviation = s - ratio * average_size;
        error += deviation * deviation;
    }
    (average_size, error)
}

/// Measure `length` alternating run lengths centered on `origin` along the
/// line towards `end`, extending symmetrically in the opposite direction.
/// None when the runs leave the image before enough transitions are seen.
fn count_black_white_run(
    matrix: &BitMatrix,
    origin: &Point,
    end: &Point,
    length: usize,
) -> Option<Vec<f32>> {
    let rise = end.y - origin.y;
    let run = end.x - origin.x;
    let half = length / 2 + 1;

    let towards = count_run_towards(matrix, origin, end, half)?;
    let away_end = Point::new(origin.x - run, origin.y - rise);
    let away = count_run_towards(matrix, origin, &away_end, half)?;

    // The origin pixel sits inside both center measurements; merge them and
    // drop the double count.
    let middle = towards[0] + away[0] - 1.0;
    let mut runs = Vec::with_capacity(2 * half - 1);
    runs.extend(away[1..].iter().copied());
    runs.push(middle);
    runs.extend(towards[1..].iter().copied());
    Some(runs)
}

/// Bresenham walk from `origin` towards `end`, recording the distance
/// between successive color transitions. The walk starts counting black.
fn count_run_towards(
    matrix: &BitMatrix,
    origin: &Point,
    end: &Point,
    length: usize,
) -> Option<Vec<f32>> {
    let mut switch_points: Vec<(i32, i32)> =
        vec![(origin.x.floor() as i32, origin.y.floor() as i32)];
    let steep = (end.y - origin.y).abs() > (end.x - origin.x).abs();

    let (from_x, from_y, to_x, to_y) = if steep {
        (
            origin.y.floor() as i32,
            origin.x.floor() as i32,
            end.y.floor() as i32,
            end.x.floor() as i32,
        )
    } else {
        (
            origin.x.floor() as i32,
            origin.y.floor() as i32,
            end.x.floor() as i32,
            end.y.floor() as i32,
        )
    };

    let dx = (to_x - from_x).abs();
    let dy = (to_y - from_y).abs();
    let mut error = (-dx).div_euclid(2);
    let x_step: i32 = if from_x < to_x { 1 } else { -1 };
    let y_step: i32 = if from_y < to_y { 1 } else { -1 };

    let mut current_pixel = true;
    let mut x = from_x;
    let mut y = from_y;
    while x != to_x + x_step {
        let (real_x, real_y) = if steep { (y, x) } else { (x, y) };
        if matrix.get_signed(real_x, real_y) != current_pixel {
            current_pixel = !current_pixel;
            switch_points.push((real_x, real_y));
            if switch_points.len() == length + 1 {
                break;
            }
        }
        error += dy;
        if error > 0 {
            if y == to_y {
                break;
            }
            y += y_step;
            error -= dx;
        }
        x += x_step;
    }

    if switch_points.len() != length + 1 {
        return None;
    }
    let mut distances = Vec::with_capacity(length);
    for pair in switch_points.windows(2) {
        let dx = (pair[1].0 - pair[0].0) as f32;
        let dy = (pair[1].1 - pair[0].1) as f32;
        distances.push((dx * dx + dy * dy).sqrt());
    }
    Some(distances)
}

/// Walk out of the black region along each axis and take the midpoints.
fn recenter_location(matrix: &BitMatrix, point: &Point) -> Point {
    let row = point.y.round() as i32;
    let mut left_x = point.x.round() as i32;
    while matrix.get_signed(left_x, row) {
        left_x -= 1;
    }
    let mut right_x = point.x.round() as i32;
    while matrix.get_signed(right_x, row) {
        right_x += 1;
    }
    let x = (left_x + right_x) as f32 / 2.0;

    let column = x.round() as i32;
    let mut top_y = point.y.round() as i32;
    while matrix.get_signed(column, top_y) {
        top_y -= 1;
    }
    let mut bottom_y = point.y.round() as i32;
    while matrix.get_signed(column, bottom_y) {
        bottom_y += 1;
    }
    Point::new(x, (top_y + bottom_y) as f32 / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCALE: usize = 4;
    const MARGIN: usize = 8;

    fn fill_modules(matrix: &mut BitMatrix, left: usize, top: usize, width: usize, height: usize) {
        for y in top * SCALE..(top + height) * SCALE {
            for x in left * SCALE..(left + width) * SCALE {
                matrix.set(MARGIN + x, MARGIN + y, true);
            }
        }
    }

    fn draw_finder(matrix: &mut BitMatrix, left: usize, top: usize) {
        fill_modules(matrix, left, top, 7, 1);
        fill_modules(matrix, left, top + 6, 7, 1);
        fill_modules(matrix, left, top + 1, 1, 5);
        fill_modules(matrix, left + 6, top + 1, 1, 5);
        fill_modules(matrix, left + 2, top + 2, 3, 3);
    }

    fn draw_alignment(matrix: &mut BitMatrix, left: usize, top: usize) {
        fill_modules(matrix, left, top, 5, 1);
        fill_modules(matrix, left, top + 4, 5, 1);
        fill_modules(matrix, left, top + 1, 1, 3);
        fill_modules(matrix, left + 4, top + 1, 1, 3);
        fill_modules(matrix, left + 2, top + 2, 1, 1);
    }

    /// Pixel coordinate of the center of module (mx + 0.5, my + 0.5)
    fn module_center(m: f32) -> f32 {
        MARGIN as f32 + m * SCALE as f32
    }

    fn synthetic_symbol(modules: usize) -> BitMatrix {
        let side = modules * SCALE + 2 * MARGIN;
        let mut matrix = BitMatrix::new(side, side);
        draw_finder(&mut matrix, 0, 0);
        draw_finder(&mut matrix, modules - 7, 0);
        draw_finder(&mut matrix, 0, modules - 7);
        matrix
    }

    #[test]
    fn test_locates_version1_synthetic() {
        let matrix = synthetic_symbol(21);
        let locations = locate(&matrix);
        assert_eq!(locations.len(), 2, "expected quad-center and recentered estimates");

        let first = &locations[0];
        assert_eq!(first.dimension, 21);
        assert!((first.top_left.x - module_center(3.5)).abs() < 0.5);
        assert!((first.top_left.y - module_center(3.5)).abs() < 0.5);
        assert!((first.top_right.x - module_center(17.5)).abs() < 0.5);
        assert!((first.top_right.y - module_center(3.5)).abs() < 0.5);
        assert!((first.bottom_left.x - module_center(3.5)).abs() < 0.5);
        assert!((first.bottom_left.y - module_center(17.5)).abs() < 0.5);
        // No real alignment pattern at this size; the anchor is extrapolated
        // 3 modules in from the virtual fourth corner.
        assert!((first.alignment_pattern.x - module_center(14.5)).abs() < 1.0);
        assert!((first.alignment_pattern.y - module_center(14.5)).abs() < 1.0);

        assert_eq!(locations[1].dimension, 21);
    }

    #[test]
    fn test_finds_drawn_alignment_pattern() {
        let mut matrix = synthetic_symbol(25);
        draw_alignment(&mut matrix, 16, 16);

        let locations = locate(&matrix);
        assert!(!locations.is_empty());
        let first = &locations[0];
        assert_eq!(first.dimension, 25);
        assert!((first.alignment_pattern.x - module_center(18.5)).abs() < 0.5);
        assert!((first.alignment_pattern.y - module_center(18.5)).abs() < 0.5);
    }

    #[test]
    fn test_blank_image_yields_nothing() {
        let matrix = BitMatrix::new(64, 64);
        assert!(locate(&matrix).is_empty());
    }

    #[test]
    fn test_two_finder_patterns_are_not_enough() {
        let side = 21 * SCALE + 2 * MARGIN;
        let mut matrix = BitMatrix::new(side, side);
        draw_finder(&mut matrix, 0, 0);
        draw_finder(&mut matrix, 14, 0);
        assert!(locate(&matrix).is_empty());
    }

    #[test]
    fn test_reorder_is_permutation_invariant() {
        let tl = Point::new(10.0, 10.0);
        let tr = Point::new(50.0, 10.0);
        let bl = Point::new(10.0, 50.0);

        for (a, b, c) in [
            (tl, tr, bl),
            (tl, bl, tr),
            (tr, tl, bl),
            (tr, bl, tl),
            (bl, tl, tr),
            (bl, tr, tl),
        ] {
            let (got_tl, got_tr, got_bl) = reorder_finder_patterns(a, b, c);
            assert_eq!((got_tl.x, got_tl.y), (tl.x, tl.y));
            assert_eq!((got_tr.x, got_tr.y), (tr.x, tr.y));
            assert_eq!((got_bl.x, got_bl.y), (bl.x, bl.y));
        }
    }

    #[test]
    fn test_count_run_requires_enough_transitions() {
        // Solid black square with no transitions along the scan line.
        let mut matrix = BitMatrix::new(32, 32);
        for y in 0..32 {
            for x in 0..32 {
                matrix.set(x, y, true);
            }
        }
        let runs = count_black_white_run(
            &matrix,
            &Point::new(16.0, 16.0),
            &Point::new(-1.0, 16.0),
            5,
        );
        assert!(runs.is_none());
    }
}
