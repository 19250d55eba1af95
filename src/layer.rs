use serde::{Deserialize, Serialize};

use crate::id_generator::{LayerId, StrokeId};
use crate::stroke::StrokeRef;

/// Represents a single layer of one frame.
///
/// Strokes are kept in append order, which is also z-order (later = on top).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Layer {
    /// Unique identifier for the layer, shared by the same layer in every frame
    pub id: LayerId,
    /// Display name of the layer
    pub name: String,
    /// Whether the layer is currently visible
    pub visible: bool,
    /// Locked layers reject draw, move and lasso gestures
    pub locked: bool,
    pub opacity: f32,
    pub strokes: Vec<StrokeRef>,
}

impl Layer {
    pub fn new(name: &str) -> Self {
        Self::with_id(LayerId::new(), name)
    }

    pub fn with_id(id: LayerId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            visible: true,
            locked: false,
            opacity: 1.0,
            strokes: Vec::new(),
        }
    }

    /// Same id, name, visibility, lock and opacity, but no strokes
    pub fn empty_copy(&self) -> Self {
        Self {
            strokes: Vec::new(),
            ..self.clone()
        }
    }

    /// Full copy under a new id and a "Copy" name; strokes receive fresh ids
    pub fn duplicate(&self) -> Self {
        Self {
            id: LayerId::new(),
            name: format!("{} Copy", self.name),
            strokes: self
                .strokes
                .iter()
                .map(|stroke| stroke.duplicated(0.0, 0.0).into_ref())
                .collect(),
            ..self.clone()
        }
    }

    /// Adds a stroke to the top of the layer
    pub fn add_stroke(&mut self, stroke: StrokeRef) {
        self.strokes.push(stroke);
    }

    pub fn stroke(&self, id: StrokeId) -> Option<&StrokeRef> {
        self.strokes.iter().find(|stroke| stroke.id == id)
    }

    pub fn contains_stroke(&self, id: StrokeId) -> bool {
        self.stroke(id).is_some()
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stroke::{Point, Stroke};
    use crate::tool::{StrokeColor, ToolKind};

    fn layer_with_stroke() -> Layer {
        let mut layer = Layer::new("Layer 1");
        layer.add_stroke(
            Stroke::new(
                vec![Point::sample(0.0, 0.0), Point::sample(1.0, 1.0)],
                StrokeColor::Transparent,
                2.0,
                1.0,
                ToolKind::Eraser,
            )
            .into_ref(),
        );
        layer
    }

    #[test]
    fn empty_copy_keeps_structure() {
        let mut layer = layer_with_stroke();
        layer.locked = true;
        let copy = layer.empty_copy();
        assert_eq!(copy.id, layer.id);
        assert!(copy.locked);
        assert!(copy.strokes.is_empty());
    }

    #[test]
    fn duplicate_has_new_ids() {
        let layer = layer_with_stroke();
        let copy = layer.duplicate();
        assert_ne!(copy.id, layer.id);
        assert_eq!(copy.name, "Layer 1 Copy");
        assert_eq!(copy.strokes.len(), 1);
        assert_ne!(copy.strokes[0].id, layer.strokes[0].id);
        assert_eq!(copy.strokes[0].points, layer.strokes[0].points);
    }
}
