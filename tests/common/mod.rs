#![allow(dead_code)]

use eframe_flipbook::{EditorContext, Point, Stroke, StrokeColor, StrokeRef, ToolKind};
use egui::Color32;

/// A committed brush stroke through the given points
pub fn stroke_through(points: &[(f32, f32)]) -> StrokeRef {
    Stroke::new(
        points.iter().map(|&(x, y)| Point::sample(x, y)).collect(),
        StrokeColor::Solid(Color32::BLACK),
        3.0,
        1.0,
        ToolKind::Brush,
    )
    .into_ref()
}

/// Editor with `count` keyframes, the last one current
pub fn editor_with_frames(count: usize) -> EditorContext {
    let mut editor = EditorContext::default();
    for _ in 1..count {
        assert!(editor.add_frame());
    }
    editor
}

pub fn frame_ids(editor: &EditorContext) -> Vec<eframe_flipbook::FrameId> {
    editor.document().frames().iter().map(|frame| frame.id).collect()
}
