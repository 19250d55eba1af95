use serde::{Deserialize, Serialize};

use crate::id_generator::{FrameId, LayerId};
use crate::layer::Layer;

/// One timeline slot.
///
/// Keyframes are authored directly. Hold frames (`is_keyframe == false`) mirror the
/// closest keyframe before them; see [`Document::hold_run`](crate::Document::hold_run).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Frame {
    pub id: FrameId,
    pub layers: Vec<Layer>,
    pub is_keyframe: bool,
}

impl Frame {
    pub fn new(layers: Vec<Layer>) -> Self {
        Self {
            id: FrameId::new(),
            layers,
            is_keyframe: true,
        }
    }

    /// New keyframe with the same layer structure and empty stroke lists
    pub fn empty_like(&self) -> Self {
        Self::new(self.layers.iter().map(Layer::empty_copy).collect())
    }

    /// Deep copy under a new id, forced to be a keyframe
    pub fn duplicate(&self) -> Self {
        Self {
            id: FrameId::new(),
            layers: self.layers.clone(),
            is_keyframe: true,
        }
    }

    /// Deep copy under a new id, marked as a hold frame
    pub fn hold_copy(&self) -> Self {
        Self {
            id: FrameId::new(),
            layers: self.layers.clone(),
            is_keyframe: false,
        }
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.id == id)
    }

    pub fn layer_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|layer| layer.id == id)
    }

    pub fn layer_index(&self, id: LayerId) -> Option<usize> {
        self.layers.iter().position(|layer| layer.id == id)
    }

    pub fn has_layer(&self, id: LayerId) -> bool {
        self.layer(id).is_some()
    }

    pub fn layer_ids(&self) -> Vec<LayerId> {
        self.layers.iter().map(|layer| layer.id).collect()
    }

    /// Layers that should be drawn, bottom to top
    pub fn visible_layers(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter().filter(|layer| layer.visible)
    }

    pub fn stroke_count(&self) -> usize {
        self.layers.iter().map(|layer| layer.strokes.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copies_get_fresh_ids_and_flags() {
        let mut frame = Frame::new(vec![Layer::new("Layer 1")]);
        frame.is_keyframe = false;

        let hold = frame.hold_copy();
        assert_ne!(hold.id, frame.id);
        assert!(!hold.is_keyframe);
        assert_eq!(hold.layer_ids(), frame.layer_ids());

        let dup = frame.duplicate();
        assert!(dup.is_keyframe);
        assert_ne!(dup.id, frame.id);

        let empty = frame.empty_like();
        assert!(empty.is_keyframe);
        assert_eq!(empty.layer_ids(), frame.layer_ids());
    }
}
