use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::geometry::strokes_in_lasso;
use crate::id_generator::StrokeId;
use crate::layer::Layer;
use crate::stroke::Point;

/// Lasso selection over the strokes of the current layer in the current frame.
///
/// The ids are only meaningful for that frame/layer pair, so the editor clears
/// the selection whenever either changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    lasso: Option<Vec<Point>>,
    stroke_ids: BTreeSet<StrokeId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// The persistent lasso boundary, if one was committed
    pub fn lasso(&self) -> Option<&[Point]> {
        self.lasso.as_deref()
    }

    pub fn stroke_ids(&self) -> &BTreeSet<StrokeId> {
        &self.stroke_ids
    }

    pub fn contains(&self, id: StrokeId) -> bool {
        self.stroke_ids.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.stroke_ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stroke_ids.len()
    }

    pub fn set_lasso(&mut self, points: Option<Vec<Point>>) {
        self.lasso = points;
    }

    pub fn set_stroke_ids(&mut self, ids: impl IntoIterator<Item = StrokeId>) {
        self.stroke_ids = ids.into_iter().collect();
    }

    pub fn clear(&mut self) {
        self.lasso = None;
        self.stroke_ids.clear();
    }

    /// Commits `boundary` as the lasso and selects every stroke of `layer`
    /// with at least one point inside it. Boundaries of three points or fewer
    /// are ignored. Returns the number of selected strokes.
    pub fn apply_lasso(&mut self, boundary: Vec<Point>, layer: &Layer) -> usize {
        if boundary.len() <= 2 {
            return 0;
        }
        self.stroke_ids = strokes_in_lasso(&layer.strokes, &boundary);
        self.lasso = Some(boundary);
        self.stroke_ids.len()
    }

    /// Drops ids that no longer exist in `layer`; the lasso goes with the last id
    pub fn retain_existing(&mut self, layer: &Layer) {
        self.stroke_ids.retain(|id| layer.contains_stroke(*id));
        if self.stroke_ids.is_empty() {
            self.lasso = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stroke::Stroke;
    use crate::tool::{StrokeColor, ToolKind};

    fn stroke_at(x: f32, y: f32) -> Stroke {
        Stroke::new(
            vec![Point::sample(x, y), Point::sample(x + 1.0, y)],
            StrokeColor::Transparent,
            1.0,
            1.0,
            ToolKind::Brush,
        )
    }

    fn boundary() -> Vec<Point> {
        vec![
            Point::sample(0.0, 0.0),
            Point::sample(100.0, 0.0),
            Point::sample(100.0, 100.0),
            Point::sample(0.0, 100.0),
        ]
    }

    #[test]
    fn apply_lasso_selects_contained() {
        let mut layer = Layer::new("Layer 1");
        let inside = stroke_at(50.0, 50.0);
        let outside = stroke_at(200.0, 200.0);
        let inside_id = inside.id;
        layer.add_stroke(inside.into_ref());
        layer.add_stroke(outside.into_ref());

        let mut selection = Selection::new();
        assert_eq!(selection.apply_lasso(boundary(), &layer), 1);
        assert!(selection.contains(inside_id));
        assert_eq!(selection.lasso().map(<[Point]>::len), Some(4));
    }

    #[test]
    fn short_boundary_is_ignored() {
        let mut selection = Selection::new();
        let layer = Layer::new("Layer 1");
        assert_eq!(selection.apply_lasso(boundary()[..2].to_vec(), &layer), 0);
        assert!(selection.lasso().is_none());
    }

    #[test]
    fn retain_existing_drops_missing_ids() {
        let mut layer = Layer::new("Layer 1");
        let kept = stroke_at(10.0, 10.0);
        let kept_id = kept.id;
        layer.add_stroke(kept.into_ref());

        let mut selection = Selection::new();
        selection.set_lasso(Some(boundary()));
        selection.set_stroke_ids([kept_id, StrokeId::new()]);
        selection.retain_existing(&layer);
        assert_eq!(selection.len(), 1);
        assert!(selection.lasso().is_some());

        selection.retain_existing(&Layer::new("Other"));
        assert!(selection.is_empty());
        assert!(selection.lasso().is_none());
    }
}
