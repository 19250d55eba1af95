use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use crate::frame::Frame;
use crate::id_generator::LayerId;
use crate::layer::Layer;

/// The project: every frame plus the current frame and layer.
///
/// This is also exactly what a history entry captures. Cloning is cheap for
/// stroke geometry because strokes are shared through `Arc`; anything that is
/// changed afterwards is replaced, never mutated in place, so clones stay
/// isolated from each other.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub(crate) frames: Vec<Frame>,
    pub(crate) current_frame_index: usize,
    pub(crate) current_layer_id: LayerId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// One keyframe holding one empty layer
    pub fn new() -> Self {
        let layer = Layer::new("Layer 1");
        let current_layer_id = layer.id;
        Self {
            frames: vec![Frame::new(vec![layer])],
            current_frame_index: 0,
            current_layer_id,
        }
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn current_frame_index(&self) -> usize {
        self.current_frame_index
    }

    pub fn current_layer_id(&self) -> LayerId {
        self.current_layer_id
    }

    pub fn current_frame(&self) -> &Frame {
        &self.frames[self.current_frame_index]
    }

    pub(crate) fn current_frame_mut(&mut self) -> &mut Frame {
        &mut self.frames[self.current_frame_index]
    }

    /// The current layer in the current frame
    pub fn current_layer(&self) -> Option<&Layer> {
        self.current_frame().layer(self.current_layer_id)
    }

    pub(crate) fn current_layer_mut(&mut self) -> Option<&mut Layer> {
        let id = self.current_layer_id;
        self.current_frame_mut().layer_mut(id)
    }

    /// Index range of the hold run containing `index`.
    ///
    /// Scans back to the run's keyframe (frame 0 always starts a run), then
    /// forward over the hold frames that follow it. Out-of-range indices are
    /// clamped to the last frame.
    pub fn hold_run(&self, index: usize) -> RangeInclusive<usize> {
        let last = self.frames.len().saturating_sub(1);
        let mut start = index.min(last);
        while start > 0 && !self.frames[start].is_keyframe {
            start -= 1;
        }

        let mut end = start;
        while end < last && !self.frames[end + 1].is_keyframe {
            end += 1;
        }
        start..=end
    }

    pub fn current_hold_run(&self) -> RangeInclusive<usize> {
        self.hold_run(self.current_frame_index)
    }

    /// Display number for each frame: keyframes count up from 1, hold frames get `None`
    pub fn keyframe_numbers(&self) -> Vec<Option<usize>> {
        let mut count = 0;
        self.frames
            .iter()
            .map(|frame| {
                if frame.is_keyframe {
                    count += 1;
                    Some(count)
                } else {
                    None
                }
            })
            .collect()
    }

    /// True if any frame contains a layer with `id`
    pub fn has_layer(&self, id: LayerId) -> bool {
        self.frames.iter().any(|frame| frame.has_layer(id))
    }

    /// True when every frame lists the same layer ids in the same order
    pub fn layer_stacks_parallel(&self) -> bool {
        let Some(first) = self.frames.first() else {
            return false;
        };
        let expected = first.layer_ids();
        self.frames.iter().all(|frame| frame.layer_ids() == expected)
    }

    /// First "Layer N" name not used in the current frame, starting at `N = count + 1`
    pub fn next_layer_name(&self) -> String {
        let frame = self.current_frame();
        let mut n = frame.layers.len() + 1;
        loop {
            let name = format!("Layer {}", n);
            if frame.layers.iter().all(|layer| layer.name != name) {
                return name;
            }
            n += 1;
        }
    }

    /// Points `current_layer_id` at the first layer of the current frame if it
    /// went missing. Returns true if a repair happened.
    pub(crate) fn resolve_current_layer(&mut self) -> bool {
        if self.current_frame().has_layer(self.current_layer_id) {
            return false;
        }
        match self.current_frame().layers.first() {
            Some(layer) => {
                log::warn!(
                    "Layer {} missing from frame {}, selecting {}",
                    self.current_layer_id,
                    self.current_frame_index,
                    layer.id
                );
                self.current_layer_id = layer.id;
                true
            }
            None => false,
        }
    }

    /// Checks the structural invariants that every reachable state satisfies
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.frames.is_empty() {
            return Err("project has no frames".to_string());
        }
        if self.current_frame_index >= self.frames.len() {
            return Err(format!(
                "current frame index {} out of range for {} frames",
                self.current_frame_index,
                self.frames.len()
            ));
        }
        if let Some(index) = self.frames.iter().position(|frame| frame.layers.is_empty()) {
            return Err(format!("frame {} has no layers", index));
        }
        if !self.current_frame().has_layer(self.current_layer_id) {
            return Err(format!(
                "current layer {} missing from current frame",
                self.current_layer_id
            ));
        }
        Ok(())
    }
}
