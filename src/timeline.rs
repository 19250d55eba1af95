//! Timeline strip helpers: scrubbing, frame labels and hold-run dragging.

use crate::document::Document;
use crate::id_generator::FrameId;

/// Frame index under `x` for cells of `cell_width`, clamped to the timeline
pub fn scrub_index(x: f32, cell_width: f32, frame_count: usize) -> usize {
    if frame_count == 0 || cell_width <= 0.0 || !x.is_finite() || x <= 0.0 {
        return 0;
    }
    let index = (x / cell_width).floor() as usize;
    index.min(frame_count - 1)
}

/// What the timeline shows for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineCell {
    pub index: usize,
    pub frame_id: FrameId,
    /// Keyframes are numbered from 1; hold frames show no number
    pub keyframe_number: Option<usize>,
    pub is_current: bool,
    /// Part of the hold run that contains the current frame
    pub in_current_run: bool,
}

pub fn timeline_cells(document: &Document) -> Vec<TimelineCell> {
    let run = document.current_hold_run();
    document
        .frames()
        .iter()
        .zip(document.keyframe_numbers())
        .enumerate()
        .map(|(index, (frame, keyframe_number))| TimelineCell {
            index,
            frame_id: frame.id,
            keyframe_number,
            is_current: index == document.current_frame_index(),
            in_current_run: run.contains(&index),
        })
        .collect()
}

/// Tracks a drag on a hold-run handle.
///
/// The drag's horizontal translation maps to a target count of extra frames
/// (`floor(tx / cell_width)`); each update yields only the difference to what
/// has been applied so far.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoldDrag {
    index: usize,
    applied: isize,
}

impl HoldDrag {
    pub fn new(index: usize) -> Self {
        Self { index, applied: 0 }
    }

    /// Frame whose run is being stretched
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn applied(&self) -> isize {
        self.applied
    }

    /// Count still to apply for a drag of `translation_x`, or `None` if nothing changes
    pub fn pending(&self, translation_x: f32, cell_width: f32) -> Option<isize> {
        if cell_width <= 0.0 || !translation_x.is_finite() {
            return None;
        }
        let target = (translation_x / cell_width).floor() as isize;
        let diff = target - self.applied;
        (diff != 0).then_some(diff)
    }

    /// Records how many frames were actually inserted (positive) or removed (negative)
    pub fn record(&mut self, delta: isize) {
        self.applied += delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrub_clamps_to_range() {
        assert_eq!(scrub_index(-5.0, 40.0, 4), 0);
        assert_eq!(scrub_index(39.9, 40.0, 4), 0);
        assert_eq!(scrub_index(40.0, 40.0, 4), 1);
        assert_eq!(scrub_index(10_000.0, 40.0, 4), 3);
    }

    #[test]
    fn hold_drag_reports_differences() {
        let mut drag = HoldDrag::new(2);
        assert_eq!(drag.pending(10.0, 40.0), None);
        assert_eq!(drag.pending(85.0, 40.0), Some(2));
        drag.record(2);
        assert_eq!(drag.pending(90.0, 40.0), None);
        assert_eq!(drag.pending(-1.0, 40.0), Some(-3));
    }

    #[test]
    fn cells_mark_current_run() {
        let mut doc = Document::new();
        doc.frames.push(doc.frames[0].hold_copy());
        doc.frames.push(doc.frames[0].duplicate());
        doc.current_frame_index = 1;

        let cells = timeline_cells(&doc);
        assert_eq!(cells.len(), 3);
        assert_eq!(cells[0].keyframe_number, Some(1));
        assert_eq!(cells[1].keyframe_number, None);
        assert_eq!(cells[2].keyframe_number, Some(2));
        assert!(cells[1].is_current);
        assert!(cells[0].in_current_run && cells[1].in_current_run);
        assert!(!cells[2].in_current_run);
    }
}
