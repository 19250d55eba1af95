use egui::{Color32, Pos2};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::geometry;
use crate::id_generator::StrokeId;
use crate::tool::{StrokeColor, ToolKind};

/// A sampled input point in canvas space. Immutable once recorded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
    pub pressure: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32, pressure: f32) -> Self {
        Self { x, y, pressure }
    }

    /// A sample with full pressure, as produced by pointer input without pressure data
    pub const fn sample(x: f32, y: f32) -> Self {
        Self::new(x, y, 1.0)
    }

    pub fn to_pos2(&self) -> Pos2 {
        Pos2::new(self.x, self.y)
    }

    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            pressure: self.pressure,
        }
    }
}

impl From<Pos2> for Point {
    fn from(pos: Pos2) -> Self {
        Self::sample(pos.x, pos.y)
    }
}

// Immutable stroke, shared between frames of a hold run and history snapshots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub id: StrokeId,
    pub points: Vec<Point>,
    pub color: StrokeColor,
    pub width: f32,
    pub opacity: f32,
    /// Fixed at creation; decides stroke vs. filled-region rendering
    pub tool: ToolKind,
}

// Define a reference-counted type alias for Stroke
pub type StrokeRef = Arc<Stroke>;

impl Stroke {
    pub fn new(points: Vec<Point>, color: StrokeColor, width: f32, opacity: f32, tool: ToolKind) -> Self {
        Self {
            id: StrokeId::new(),
            points,
            color,
            width: width.max(0.0),
            opacity: opacity.clamp(0.0, 1.0),
            tool,
        }
    }

    /// Closed rectangle covering `(0, 0)..(width, height)`, tagged as a bucket fill
    pub fn canvas_fill(width: f32, height: f32, color: Color32) -> Self {
        let points = vec![
            Point::sample(0.0, 0.0),
            Point::sample(width, 0.0),
            Point::sample(width, height),
            Point::sample(0.0, height),
            Point::sample(0.0, 0.0),
        ];
        Self::new(points, StrokeColor::Solid(color), 0.0, 1.0, ToolKind::Bucket)
    }

    // Create a new reference-counted Stroke
    pub fn into_ref(self) -> StrokeRef {
        Arc::new(self)
    }

    /// Strokes with fewer than two points stay drafts and are never committed
    pub fn is_committable(&self) -> bool {
        self.points.len() >= 2
    }

    pub fn is_fill(&self) -> bool {
        self.tool.is_fill()
    }

    pub fn is_eraser(&self) -> bool {
        self.tool == ToolKind::Eraser
    }

    /// Same stroke moved by `(dx, dy)`, keeping its id
    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self {
            points: geometry::translate_points(&self.points, dx, dy),
            ..self.clone()
        }
    }

    /// Copy with a fresh id, moved by `(dx, dy)`
    pub fn duplicated(&self, dx: f32, dy: f32) -> Self {
        Self {
            id: StrokeId::new(),
            ..self.translated(dx, dy)
        }
    }

    pub fn positions(&self) -> impl Iterator<Item = Pos2> + '_ {
        self.points.iter().map(Point::to_pos2)
    }
}

// Mutable stroke for the in-progress draft of a gesture
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MutableStroke {
    points: Vec<Point>,
}

impl MutableStroke {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_point(&mut self, point: Point) {
        self.points.push(point);
    }

    // Get a reference to the points for preview
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Converts to a committed stroke, or `None` if there are fewer than two points
    pub fn finish(self, color: StrokeColor, width: f32, opacity: f32, tool: ToolKind) -> Option<Stroke> {
        if self.points.len() < 2 {
            return None;
        }
        Some(Stroke::new(self.points, color, width, opacity, tool))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line() -> Stroke {
        Stroke::new(
            vec![Point::sample(0.0, 0.0), Point::sample(10.0, 5.0)],
            StrokeColor::Solid(Color32::RED),
            3.0,
            1.0,
            ToolKind::Brush,
        )
    }

    #[test]
    fn translated_keeps_id_and_pressure() {
        let stroke = line();
        let moved = stroke.translated(2.0, -1.0);
        assert_eq!(moved.id, stroke.id);
        assert_eq!(moved.points[1], Point::new(12.0, 4.0, 1.0));
        // original untouched
        assert_eq!(stroke.points[1], Point::new(10.0, 5.0, 1.0));
    }

    #[test]
    fn duplicated_gets_new_id() {
        let stroke = line();
        let copy = stroke.duplicated(20.0, 20.0);
        assert_ne!(copy.id, stroke.id);
        assert_eq!(copy.points[0], Point::sample(20.0, 20.0));
        assert_eq!(copy.color, stroke.color);
    }

    #[test]
    fn single_point_draft_is_dropped() {
        let mut draft = MutableStroke::new();
        draft.add_point(Point::sample(1.0, 1.0));
        assert!(draft.finish(StrokeColor::Transparent, 2.0, 1.0, ToolKind::Eraser).is_none());
    }

    #[test]
    fn canvas_fill_is_closed_rectangle() {
        let fill = Stroke::canvas_fill(100.0, 50.0, Color32::BLUE);
        assert!(fill.is_fill());
        assert_eq!(fill.points.len(), 5);
        assert_eq!(fill.points.first(), fill.points.last());
        assert_eq!(fill.points[2], Point::sample(100.0, 50.0));
        assert_eq!(fill.width, 0.0);
    }
}
