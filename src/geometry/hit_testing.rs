use std::collections::BTreeSet;

use crate::id_generator::StrokeId;
use crate::stroke::{Point, StrokeRef};

/// Ray-casting parity test.
///
/// Edges are taken in the given order, closing from the last point back to the
/// first. Self-intersecting polygons follow the even-odd rule. Polygons with
/// fewer than three points contain nothing.
pub fn point_in_polygon(point: &Point, polygon: &[Point]) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (xi, yi) = (polygon[i].x, polygon[i].y);
        let (xj, yj) = (polygon[j].x, polygon[j].y);

        // (yi > y) != (yj > y) rules out horizontal edges, so the division is safe
        let crosses = (yi > point.y) != (yj > point.y)
            && point.x < (xj - xi) * (point.y - yi) / (yj - yi) + xi;
        if crosses {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Ids of every stroke with at least one point inside `boundary`
pub fn strokes_in_lasso<'a>(
    strokes: impl IntoIterator<Item = &'a StrokeRef>,
    boundary: &[Point],
) -> BTreeSet<StrokeId> {
    strokes
        .into_iter()
        .filter(|stroke| stroke.points.iter().any(|p| point_in_polygon(p, boundary)))
        .map(|stroke| stroke.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stroke::Stroke;
    use crate::tool::{StrokeColor, ToolKind};

    fn square() -> Vec<Point> {
        vec![
            Point::sample(0.0, 0.0),
            Point::sample(100.0, 0.0),
            Point::sample(100.0, 100.0),
            Point::sample(0.0, 100.0),
        ]
    }

    #[test]
    fn inside_and_outside_square() {
        assert!(point_in_polygon(&Point::sample(50.0, 50.0), &square()));
        assert!(!point_in_polygon(&Point::sample(200.0, 200.0), &square()));
        assert!(!point_in_polygon(&Point::sample(-1.0, 50.0), &square()));
    }

    #[test]
    fn degenerate_polygon_contains_nothing() {
        let two = vec![Point::sample(0.0, 0.0), Point::sample(10.0, 10.0)];
        assert!(!point_in_polygon(&Point::sample(5.0, 5.0), &two));
        assert!(!point_in_polygon(&Point::sample(5.0, 5.0), &[]));
    }

    #[test]
    fn self_intersecting_uses_even_odd() {
        // A pentagram: the centre is wound twice, so even-odd treats it as outside.
        let star = vec![
            Point::sample(50.0, 0.0),
            Point::sample(79.0, 90.0),
            Point::sample(2.0, 35.0),
            Point::sample(98.0, 35.0),
            Point::sample(21.0, 90.0),
        ];
        assert!(!point_in_polygon(&Point::sample(50.0, 50.0), &star));
        // A tip of the star is covered once.
        assert!(point_in_polygon(&Point::sample(50.0, 15.0), &star));
    }

    #[test]
    fn lasso_selects_strokes_with_any_point_inside() {
        let inside = Stroke::new(
            vec![Point::sample(50.0, 50.0), Point::sample(300.0, 300.0)],
            StrokeColor::Transparent,
            1.0,
            1.0,
            ToolKind::Brush,
        )
        .into_ref();
        let outside = Stroke::new(
            vec![Point::sample(200.0, 200.0), Point::sample(210.0, 200.0)],
            StrokeColor::Transparent,
            1.0,
            1.0,
            ToolKind::Brush,
        )
        .into_ref();

        let ids = strokes_in_lasso([&inside, &outside], &square());
        assert!(ids.contains(&inside.id));
        assert!(!ids.contains(&outside.id));
    }
}
