use egui::Color32;
use std::sync::Arc;

use super::{CommandContext, CommandError, CommandResult};
use crate::document::Document;
use crate::id_generator::LayerId;
use crate::layer::Layer;
use crate::stroke::{Stroke, StrokeRef};

/// Every document edit the editor can perform.
///
/// Scope differs per command and is part of its contract:
/// - stroke additions (`AddStroke`, `FillCanvas`) reach every frame of the
///   current hold run;
/// - `AddLayer`/`DeleteLayer` reach every frame;
/// - everything else touches the current frame only.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Append a committed stroke to the current layer
    AddStroke(StrokeRef),
    /// Append a canvas-sized bucket fill to the current layer
    FillCanvas { color: Color32 },
    /// Insert an empty keyframe after the current frame and make it current
    AddFrame,
    DeleteFrame { index: usize },
    /// Insert a keyframe copy of `index` after it and make it current
    DuplicateFrame { index: usize },
    /// Insert (`count > 0`) or remove (`count < 0`) hold frames after `index`
    ExtendFrame { index: usize, count: isize },
    AddLayer,
    DeleteLayer { layer_id: LayerId },
    /// Frame-local: the copy only exists in the current frame
    DuplicateLayer { layer_id: LayerId },
    ToggleLayerVisibility { layer_id: LayerId },
    ToggleLayerLock { layer_id: LayerId },
    /// Empty the current layer of the current frame
    ClearCanvas,
    DeleteSelection,
    DuplicateSelection,
    /// Continuous: applied once per drag sample, never recorded in history
    MoveSelection { dx: f32, dy: f32 },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Self::AddStroke(_) => "AddStroke",
            Self::FillCanvas { .. } => "FillCanvas",
            Self::AddFrame => "AddFrame",
            Self::DeleteFrame { .. } => "DeleteFrame",
            Self::DuplicateFrame { .. } => "DuplicateFrame",
            Self::ExtendFrame { .. } => "ExtendFrame",
            Self::AddLayer => "AddLayer",
            Self::DeleteLayer { .. } => "DeleteLayer",
            Self::DuplicateLayer { .. } => "DuplicateLayer",
            Self::ToggleLayerVisibility { .. } => "ToggleLayerVisibility",
            Self::ToggleLayerLock { .. } => "ToggleLayerLock",
            Self::ClearCanvas => "ClearCanvas",
            Self::DeleteSelection => "DeleteSelection",
            Self::DuplicateSelection => "DuplicateSelection",
            Self::MoveSelection { .. } => "MoveSelection",
        }
    }

    /// Continuous commands rely on the caller's gesture-start checkpoint
    pub fn is_continuous(&self) -> bool {
        matches!(self, Self::MoveSelection { .. })
    }

    pub fn execute(&self, ctx: &mut CommandContext<'_>) -> CommandResult {
        match self {
            Self::AddStroke(stroke) => add_to_hold_run(ctx.document, stroke.clone()),
            Self::FillCanvas { color } => {
                let fill = Stroke::canvas_fill(ctx.config.canvas_width, ctx.config.canvas_height, *color);
                add_to_hold_run(ctx.document, fill.into_ref())
            }
            Self::AddFrame => {
                add_frame(ctx.document);
                Ok(())
            }
            Self::DeleteFrame { index } => delete_frame(ctx.document, *index),
            Self::DuplicateFrame { index } => duplicate_frame(ctx.document, *index),
            Self::ExtendFrame { index, count } => extend_frame(ctx.document, *index, *count),
            Self::AddLayer => {
                add_layer(ctx.document);
                Ok(())
            }
            Self::DeleteLayer { layer_id } => delete_layer(ctx.document, *layer_id),
            Self::DuplicateLayer { layer_id } => duplicate_layer(ctx.document, *layer_id),
            Self::ToggleLayerVisibility { layer_id } => {
                let layer = current_frame_layer(ctx.document, *layer_id)?;
                layer.visible = !layer.visible;
                Ok(())
            }
            Self::ToggleLayerLock { layer_id } => {
                let layer = current_frame_layer(ctx.document, *layer_id)?;
                layer.locked = !layer.locked;
                Ok(())
            }
            Self::ClearCanvas => {
                let id = ctx.document.current_layer_id();
                let layer = ctx
                    .document
                    .current_layer_mut()
                    .ok_or(CommandError::UnknownLayer(id))?;
                layer.strokes.clear();
                Ok(())
            }
            Self::DeleteSelection => delete_selection(ctx),
            Self::DuplicateSelection => duplicate_selection(ctx),
            Self::MoveSelection { dx, dy } => move_selection(ctx, *dx, *dy),
        }
    }
}

fn check_frame_index(document: &Document, index: usize) -> CommandResult {
    let len = document.frame_count();
    if index >= len {
        return Err(CommandError::FrameOutOfRange { index, len });
    }
    Ok(())
}

fn current_frame_layer(document: &mut Document, layer_id: LayerId) -> Result<&mut Layer, CommandError> {
    document
        .current_frame_mut()
        .layer_mut(layer_id)
        .ok_or(CommandError::UnknownLayer(layer_id))
}

/// Appends `stroke` to the current layer of every frame in the current hold run
fn add_to_hold_run(document: &mut Document, stroke: StrokeRef) -> CommandResult {
    if !stroke.is_committable() {
        return Err(CommandError::DegenerateStroke(stroke.points.len()));
    }
    let layer_id = document.current_layer_id();
    if !document.current_frame().has_layer(layer_id) {
        return Err(CommandError::UnknownLayer(layer_id));
    }

    let run = document.current_hold_run();
    for frame in &mut document.frames[run] {
        if let Some(layer) = frame.layer_mut(layer_id) {
            layer.add_stroke(Arc::clone(&stroke));
        }
    }
    Ok(())
}

/// Makes the frame at `index` a keyframe if it is a hold, so it stops
/// following a run it no longer belongs to
fn promote_hold_at(document: &mut Document, index: usize) {
    if let Some(frame) = document.frames.get_mut(index) {
        if !frame.is_keyframe {
            log::debug!("Promoting hold frame {} to keyframe", index);
            frame.is_keyframe = true;
        }
    }
}

fn add_frame(document: &mut Document) {
    let frame = document.current_frame().empty_like();
    let index = document.current_frame_index + 1;
    document.frames.insert(index, frame);
    // The rest of a split hold run keeps its old content
    promote_hold_at(document, index + 1);
    document.current_frame_index = index;
}

fn delete_frame(document: &mut Document, index: usize) -> CommandResult {
    if document.frame_count() <= 1 {
        return Err(CommandError::LastFrame);
    }
    check_frame_index(document, index)?;

    let removed = document.frames.remove(index);
    // Holds that followed a deleted keyframe become their own run
    if removed.is_keyframe {
        promote_hold_at(document, index);
    }

    if index <= document.current_frame_index {
        document.current_frame_index = document.current_frame_index.saturating_sub(1);
    }
    document.resolve_current_layer();
    Ok(())
}

fn duplicate_frame(document: &mut Document, index: usize) -> CommandResult {
    check_frame_index(document, index)?;
    let copy = document.frames[index].duplicate();
    document.frames.insert(index + 1, copy);
    document.current_frame_index = index + 1;
    document.resolve_current_layer();
    Ok(())
}

fn extend_frame(document: &mut Document, index: usize, count: isize) -> CommandResult {
    check_frame_index(document, index)?;
    if count == 0 {
        return Err(CommandError::InvalidParameters("extend count must be non-zero".to_string()));
    }

    let current = document.current_frame_index;
    if count > 0 {
        let added = count.unsigned_abs();
        let source = &document.frames[index];
        let holds: Vec<_> = (0..added).map(|_| source.hold_copy()).collect();
        document.frames.splice(index + 1..index + 1, holds);
        if current > index {
            document.current_frame_index = current + added;
        }
    } else {
        let wanted = count.unsigned_abs();
        let mut removed = 0;
        // Never cross into the next keyframe's run
        while removed < wanted
            && document
                .frames
                .get(index + 1)
                .is_some_and(|frame| !frame.is_keyframe)
        {
            document.frames.remove(index + 1);
            removed += 1;
        }
        if removed == 0 {
            return Err(CommandError::InvalidParameters(format!(
                "frame {} is not followed by a hold frame",
                index
            )));
        }
        if current > index {
            document.current_frame_index = if current <= index + removed {
                index
            } else {
                current - removed
            };
        }
    }
    Ok(())
}

fn add_layer(document: &mut Document) {
    let layer = Layer::new(&document.next_layer_name());
    for frame in &mut document.frames {
        frame.layers.push(layer.clone());
    }
}

fn delete_layer(document: &mut Document, layer_id: LayerId) -> CommandResult {
    if !document.has_layer(layer_id) {
        return Err(CommandError::UnknownLayer(layer_id));
    }

    // One replacement shared by every frame keeps the layer stacks parallel
    let replacement = Layer::new("Layer 1");
    for frame in &mut document.frames {
        frame.layers.retain(|layer| layer.id != layer_id);
        if frame.layers.is_empty() {
            frame.layers.push(replacement.clone());
        }
    }

    if document.current_layer_id == layer_id {
        if let Some(first) = document.current_frame().layers.first() {
            document.current_layer_id = first.id;
        }
    }
    document.resolve_current_layer();
    Ok(())
}

fn duplicate_layer(document: &mut Document, layer_id: LayerId) -> CommandResult {
    let frame = document.current_frame_mut();
    let index = frame
        .layer_index(layer_id)
        .ok_or(CommandError::UnknownLayer(layer_id))?;
    let copy = frame.layers[index].duplicate();
    frame.layers.insert(index + 1, copy);
    Ok(())
}

fn delete_selection(ctx: &mut CommandContext<'_>) -> CommandResult {
    if ctx.selection.is_empty() {
        return Err(CommandError::EmptySelection);
    }
    let layer_id = ctx.document.current_layer_id();
    let layer = current_frame_layer(ctx.document, layer_id)?;
    let selection = &*ctx.selection;
    layer.strokes.retain(|stroke| !selection.contains(stroke.id));
    ctx.selection.clear();
    Ok(())
}

fn duplicate_selection(ctx: &mut CommandContext<'_>) -> CommandResult {
    if ctx.selection.is_empty() {
        return Err(CommandError::EmptySelection);
    }
    let [dx, dy] = ctx.config.duplicate_offset;
    let layer_id = ctx.document.current_layer_id();
    let layer = current_frame_layer(ctx.document, layer_id)?;

    let copies: Vec<StrokeRef> = layer
        .strokes
        .iter()
        .filter(|stroke| ctx.selection.contains(stroke.id))
        .map(|stroke| stroke.duplicated(dx, dy).into_ref())
        .collect();
    let new_ids: Vec<_> = copies.iter().map(|stroke| stroke.id).collect();
    layer.strokes.extend(copies);
    ctx.selection.set_stroke_ids(new_ids);
    Ok(())
}

/// Translates the selected strokes of the current layer in the current frame only
fn move_selection(ctx: &mut CommandContext<'_>, dx: f32, dy: f32) -> CommandResult {
    if ctx.selection.is_empty() {
        return Err(CommandError::EmptySelection);
    }
    let layer_id = ctx.document.current_layer_id();
    let layer = current_frame_layer(ctx.document, layer_id)?;
    for stroke in &mut layer.strokes {
        if ctx.selection.contains(stroke.id) {
            // Replace rather than mutate: the old Arc may live in history or a hold frame
            *stroke = stroke.translated(dx, dy).into_ref();
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;
    use crate::selection::Selection;
    use crate::stroke::Point;
    use crate::tool::{StrokeColor, ToolKind};

    fn stroke() -> StrokeRef {
        Stroke::new(
            vec![Point::sample(1.0, 1.0), Point::sample(5.0, 5.0)],
            StrokeColor::Solid(Color32::BLACK),
            2.0,
            1.0,
            ToolKind::Brush,
        )
        .into_ref()
    }

    fn exec(doc: &mut Document, selection: &mut Selection, command: Command) -> CommandResult {
        let config = EditorConfig::default();
        let mut ctx = CommandContext::new(doc, selection, &config);
        command.execute(&mut ctx)
    }

    #[test]
    fn degenerate_stroke_is_refused() {
        let mut doc = Document::new();
        let mut selection = Selection::new();
        let dot = Stroke::new(
            vec![Point::sample(0.0, 0.0)],
            StrokeColor::Transparent,
            1.0,
            1.0,
            ToolKind::Eraser,
        )
        .into_ref();
        assert_eq!(
            exec(&mut doc, &mut selection, Command::AddStroke(dot)),
            Err(CommandError::DegenerateStroke(1))
        );
        assert_eq!(doc.current_frame().stroke_count(), 0);
    }

    #[test]
    fn add_frame_inserts_after_current() {
        let mut doc = Document::new();
        let mut selection = Selection::new();
        exec(&mut doc, &mut selection, Command::AddStroke(stroke())).unwrap();
        exec(&mut doc, &mut selection, Command::AddFrame).unwrap();
        exec(&mut doc, &mut selection, Command::AddFrame).unwrap();
        doc.current_frame_index = 0;
        exec(&mut doc, &mut selection, Command::AddFrame).unwrap();

        assert_eq!(doc.frame_count(), 4);
        assert_eq!(doc.current_frame_index(), 1);
        let inserted = &doc.frames()[1];
        assert!(inserted.is_keyframe);
        assert_eq!(inserted.stroke_count(), 0);
        assert_eq!(inserted.layer_ids(), doc.frames()[0].layer_ids());
    }

    #[test]
    fn delete_keyframe_promotes_following_hold() {
        let mut doc = Document::new();
        let mut selection = Selection::new();
        exec(&mut doc, &mut selection, Command::AddFrame).unwrap();
        exec(&mut doc, &mut selection, Command::ExtendFrame { index: 1, count: 2 }).unwrap();
        assert!(!doc.frames()[2].is_keyframe);

        exec(&mut doc, &mut selection, Command::DeleteFrame { index: 1 }).unwrap();
        assert!(doc.frames()[1].is_keyframe);
        assert!(!doc.frames()[2].is_keyframe);
    }

    #[test]
    fn shrink_stops_at_keyframe() {
        let mut doc = Document::new();
        let mut selection = Selection::new();
        exec(&mut doc, &mut selection, Command::ExtendFrame { index: 0, count: 1 }).unwrap();
        doc.current_frame_index = 1;
        exec(&mut doc, &mut selection, Command::AddFrame).unwrap();
        // key, hold, key
        assert_eq!(doc.frame_count(), 3);
        assert!(doc.frames()[2].is_keyframe);

        exec(&mut doc, &mut selection, Command::ExtendFrame { index: 0, count: -5 }).unwrap();
        assert_eq!(doc.frame_count(), 2);
        assert!(doc.frames().iter().all(|frame| frame.is_keyframe));

        let before = doc.clone();
        assert!(matches!(
            exec(&mut doc, &mut selection, Command::ExtendFrame { index: 0, count: -1 }),
            Err(CommandError::InvalidParameters(_))
        ));
        assert_eq!(doc, before);
    }

    #[test]
    fn add_frame_inside_hold_run_splits_it() {
        let mut doc = Document::new();
        let mut selection = Selection::new();
        exec(&mut doc, &mut selection, Command::ExtendFrame { index: 0, count: 2 }).unwrap();
        doc.current_frame_index = 0;

        exec(&mut doc, &mut selection, Command::AddFrame).unwrap();
        let keyframes: Vec<bool> = doc.frames().iter().map(|frame| frame.is_keyframe).collect();
        // key, new key, promoted key, hold
        assert_eq!(keyframes, vec![true, true, true, false]);
        assert_eq!(doc.current_hold_run(), 1..=1);
        assert_eq!(doc.hold_run(3), 2..=3);
    }

    #[test]
    fn extend_keeps_current_frame_identity() {
        let mut doc = Document::new();
        let mut selection = Selection::new();
        exec(&mut doc, &mut selection, Command::AddFrame).unwrap();
        let current_id = doc.current_frame().id;

        exec(&mut doc, &mut selection, Command::ExtendFrame { index: 0, count: 3 }).unwrap();
        assert_eq!(doc.current_frame().id, current_id);
        assert_eq!(doc.current_frame_index(), 4);

        exec(&mut doc, &mut selection, Command::ExtendFrame { index: 0, count: -3 }).unwrap();
        assert_eq!(doc.current_frame().id, current_id);
        assert_eq!(doc.current_frame_index(), 1);
    }

    #[test]
    fn zero_extend_is_invalid() {
        let mut doc = Document::new();
        let mut selection = Selection::new();
        assert!(matches!(
            exec(&mut doc, &mut selection, Command::ExtendFrame { index: 0, count: 0 }),
            Err(CommandError::InvalidParameters(_))
        ));
    }

    #[test]
    fn delete_last_layer_substitutes_fresh_layer() {
        let mut doc = Document::new();
        let mut selection = Selection::new();
        exec(&mut doc, &mut selection, Command::ExtendFrame { index: 0, count: 2 }).unwrap();
        let only = doc.current_layer_id();

        exec(&mut doc, &mut selection, Command::DeleteLayer { layer_id: only }).unwrap();
        assert_ne!(doc.current_layer_id(), only);
        assert!(doc.layer_stacks_parallel());
        assert!(doc.check_invariants().is_ok());
        assert!(doc.frames().iter().all(|frame| frame.layers.len() == 1));
    }

    #[test]
    fn duplicate_layer_is_frame_local() {
        let mut doc = Document::new();
        let mut selection = Selection::new();
        exec(&mut doc, &mut selection, Command::AddLayer).unwrap();
        exec(&mut doc, &mut selection, Command::DuplicateFrame { index: 0 }).unwrap();
        let first = doc.current_frame().layers[0].id;

        exec(&mut doc, &mut selection, Command::DuplicateLayer { layer_id: first }).unwrap();
        let layers = &doc.current_frame().layers;
        assert_eq!(layers.len(), 3);
        assert_eq!(layers[1].name, "Layer 1 Copy");
        assert_eq!(doc.frames()[0].layers.len(), 2);
        assert!(!doc.layer_stacks_parallel());
    }

    #[test]
    fn toggles_touch_current_frame_only() {
        let mut doc = Document::new();
        let mut selection = Selection::new();
        exec(&mut doc, &mut selection, Command::DuplicateFrame { index: 0 }).unwrap();
        let id = doc.current_layer_id();

        exec(&mut doc, &mut selection, Command::ToggleLayerLock { layer_id: id }).unwrap();
        exec(&mut doc, &mut selection, Command::ToggleLayerVisibility { layer_id: id }).unwrap();
        assert!(doc.current_layer().is_some_and(|layer| layer.locked && !layer.visible));
        let other = doc.frames()[0].layer(id).unwrap();
        assert!(!other.locked && other.visible);

        let missing = LayerId::new();
        assert_eq!(
            exec(&mut doc, &mut selection, Command::ToggleLayerLock { layer_id: missing }),
            Err(CommandError::UnknownLayer(missing))
        );
    }

    #[test]
    fn move_replaces_shared_strokes() {
        let mut doc = Document::new();
        let mut selection = Selection::new();
        let original = stroke();
        exec(&mut doc, &mut selection, Command::AddStroke(original.clone())).unwrap();
        selection.set_stroke_ids([original.id]);

        exec(&mut doc, &mut selection, Command::MoveSelection { dx: 3.0, dy: 4.0 }).unwrap();
        let moved = &doc.current_layer().unwrap().strokes[0];
        assert_eq!(moved.points[0], Point::sample(4.0, 5.0));
        assert_eq!(original.points[0], Point::sample(1.0, 1.0));
    }
}
