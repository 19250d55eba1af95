//! Pure geometry helpers shared by selection, transform and rendering code.

pub mod hit_testing;

use egui::{Pos2, Rect};

use crate::stroke::Point;

pub use hit_testing::{point_in_polygon, strokes_in_lasso};

/// Returns a new point list moved by `(dx, dy)`; the input is left untouched
pub fn translate_points(points: &[Point], dx: f32, dy: f32) -> Vec<Point> {
    points.iter().map(|p| p.translated(dx, dy)).collect()
}

/// Scales every coordinate by `factor`, as used for thumbnails
pub fn scale_points(points: &[Point], factor: f32) -> Vec<Pos2> {
    points
        .iter()
        .map(|p| Pos2::new(p.x * factor, p.y * factor))
        .collect()
}

/// Calculate the bounding box for a set of points
pub fn calculate_bounds(points: &[Point], padding: f32) -> Rect {
    if points.is_empty() {
        return Rect::NOTHING;
    }

    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;

    for point in points {
        min_x = min_x.min(point.x);
        min_y = min_y.min(point.y);
        max_x = max_x.max(point.x);
        max_y = max_y.max(point.y);
    }

    Rect::from_min_max(
        Pos2::new(min_x - padding, min_y - padding),
        Pos2::new(max_x + padding, max_y + padding),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translate_is_non_mutating() {
        let points = vec![Point::sample(1.0, 2.0), Point::new(3.0, 4.0, 0.5)];
        let moved = translate_points(&points, 10.0, -1.0);
        assert_eq!(moved[1], Point::new(13.0, 3.0, 0.5));
        assert_eq!(points[0], Point::sample(1.0, 2.0));
    }

    #[test]
    fn bounds_include_padding() {
        let points = vec![Point::sample(0.0, 5.0), Point::sample(10.0, -5.0)];
        let rect = calculate_bounds(&points, 1.0);
        assert_eq!(rect.min, Pos2::new(-1.0, -6.0));
        assert_eq!(rect.max, Pos2::new(11.0, 6.0));
        assert_eq!(calculate_bounds(&[], 1.0), Rect::NOTHING);
    }
}
