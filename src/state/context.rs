//! The editor engine: one owned object holding the project, its history and
//! every piece of transient editor state.
//!
//! All mutation goes through [`EditorContext`]. Commands are validated first,
//! so a refused command leaves the document, the selection and the history
//! untouched; the refusal is only logged. Gesture begins that are refused
//! (locked layer, gesture already running) return a [`TransitionError`] so the
//! UI can tell the user.
//!
//! # Continuous edits
//!
//! Dragging selected strokes and dragging a hold-run handle record exactly one
//! history entry per gesture: the begin handler calls
//! [`EditorContext::push_checkpoint`], every update applies its delta without
//! history.

use egui::{Color32, Pos2, Vec2};
use std::time::Duration;

use super::EditorState;
use crate::command::{Command, CommandContext, CommandHistory};
use crate::config::EditorConfig;
use crate::document::Document;
use crate::error::TransitionError;
use crate::event::{EditorEvent, EventBus};
use crate::id_generator::{FrameId, LayerId, StrokeId};
use crate::input::{Gesture, GestureConfig, GestureRecognizer, InputEvent, PointerPhase};
use crate::playback::{self, Playback};
use crate::renderer::Scene;
use crate::selection::Selection;
use crate::stroke::{MutableStroke, Point, StrokeRef};
use crate::timeline::{self, HoldDrag};
use crate::tool::{BrushSettings, StrokeColor, ToolKind};
use crate::viewport::{PanDrag, PinchZoom, Viewport};

/// The main context for the editor.
#[derive(Debug)]
pub struct EditorContext {
    document: Document,
    history: CommandHistory,
    selection: Selection,
    viewport: Viewport,
    tool: ToolKind,
    brush: BrushSettings,
    config: EditorConfig,
    /// The current canvas gesture
    state: EditorState,
    playback: Playback,
    gestures: GestureRecognizer,
    pinch: Option<PinchZoom>,
    pan: Option<PanDrag>,
    hold_drag: Option<HoldDrag>,
    /// The event bus for broadcasting editor events
    pub event_bus: EventBus,
}

impl Default for EditorContext {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EditorContext {
    /// Creates a context around a fresh one-frame, one-layer project
    pub fn new(config: EditorConfig) -> Self {
        Self::with_document(Document::new(), config)
    }

    pub fn with_document(mut document: Document, config: EditorConfig) -> Self {
        document.resolve_current_layer();
        Self {
            document,
            history: CommandHistory::with_limit(config.history_limit),
            selection: Selection::new(),
            viewport: Viewport::with_scale_range(config.min_scale, config.max_scale),
            tool: ToolKind::default(),
            brush: BrushSettings::default(),
            playback: Playback::new(config.playback_interval()),
            gestures: GestureRecognizer::new(GestureConfig::from(&config)),
            config,
            state: EditorState::Idle,
            pinch: None,
            pan: None,
            hold_drag: None,
            event_bus: EventBus::new(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn brush(&self) -> &BrushSettings {
        &self.brush
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Gets a reference to the current gesture state.
    pub fn current_state(&self) -> &EditorState {
        &self.state
    }

    pub fn is_playing(&self) -> bool {
        self.playback.is_playing()
    }

    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    /// Replaces the whole project, dropping history, selection and any gesture
    pub fn load_document(&mut self, mut document: Document) {
        document.resolve_current_layer();
        self.document = document;
        self.history.clear();
        self.selection.clear();
        self.state = EditorState::Idle;
        self.hold_drag = None;
        log::info!("Loaded project with {} frames", self.document.frame_count());
        self.event_bus.emit(EditorEvent::FrameChanged {
            index: self.document.current_frame_index(),
        });
    }

    /// Render list for the current state
    pub fn scene(&self) -> Scene {
        Scene::build(
            &self.document,
            &self.selection,
            &self.state,
            self.brush.color,
            self.brush.size,
            &self.config,
        )
    }

    // ---- Commands ----

    /// Runs a command through history. Returns false if it was refused.
    pub fn execute(&mut self, command: Command) -> bool {
        let before = self.focus();
        let result = {
            let mut ctx = CommandContext::new(&mut self.document, &mut self.selection, &self.config);
            self.history.execute(&command, &mut ctx)
        };
        self.finish_command(&command, result, before)
    }

    /// Runs a command without recording history, for continuous gestures
    fn apply(&mut self, command: Command) -> bool {
        let before = self.focus();
        let result = {
            let mut ctx = CommandContext::new(&mut self.document, &mut self.selection, &self.config);
            self.history.apply(&command, &mut ctx)
        };
        self.finish_command(&command, result, before)
    }

    fn finish_command(
        &mut self,
        command: &Command,
        result: crate::command::CommandResult,
        before: (FrameId, LayerId, usize),
    ) -> bool {
        match result {
            Ok(()) => {
                self.sync_selection(before);
                self.event_bus.emit(EditorEvent::DocumentChanged {
                    command: command.name(),
                });
                true
            }
            Err(err) => {
                log::debug!("{} refused: {}", command.name(), err);
                false
            }
        }
    }

    /// Explicit undo checkpoint for continuous gestures. Clears redo.
    pub fn push_checkpoint(&mut self) {
        self.history.checkpoint(&self.document);
        log::debug!("Checkpoint, {} undo entries", self.history.undo_len());
    }

    pub fn undo(&mut self) -> bool {
        self.cancel_gesture();
        self.end_hold_drag();
        let before = self.focus();
        if !self.history.undo(&mut self.document) {
            return false;
        }
        self.sync_selection(before);
        log::info!("Undo, {} entries left", self.history.undo_len());
        self.event_bus.emit(EditorEvent::UndoApplied);
        true
    }

    pub fn redo(&mut self) -> bool {
        self.cancel_gesture();
        self.end_hold_drag();
        let before = self.focus();
        if !self.history.redo(&mut self.document) {
            return false;
        }
        self.sync_selection(before);
        log::info!("Redo, {} entries left", self.history.redo_len());
        self.event_bus.emit(EditorEvent::RedoApplied);
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn add_stroke(&mut self, stroke: StrokeRef) -> bool {
        self.execute(Command::AddStroke(stroke))
    }

    pub fn add_frame(&mut self) -> bool {
        self.execute(Command::AddFrame)
    }

    pub fn delete_frame(&mut self, index: usize) -> bool {
        self.execute(Command::DeleteFrame { index })
    }

    pub fn duplicate_frame(&mut self, index: usize) -> bool {
        self.execute(Command::DuplicateFrame { index })
    }

    /// Inserts (`count > 0`) or removes (`count < 0`) hold frames after `index`.
    /// With `suppress_history` the change is applied without a history entry.
    pub fn extend_frame(&mut self, index: usize, count: isize, suppress_history: bool) -> bool {
        let command = Command::ExtendFrame { index, count };
        if suppress_history {
            self.apply(command)
        } else {
            self.execute(command)
        }
    }

    pub fn add_layer(&mut self) -> bool {
        self.execute(Command::AddLayer)
    }

    pub fn delete_layer(&mut self, layer_id: LayerId) -> bool {
        self.execute(Command::DeleteLayer { layer_id })
    }

    pub fn duplicate_layer(&mut self, layer_id: LayerId) -> bool {
        self.execute(Command::DuplicateLayer { layer_id })
    }

    pub fn toggle_layer_visibility(&mut self, layer_id: LayerId) -> bool {
        self.execute(Command::ToggleLayerVisibility { layer_id })
    }

    pub fn toggle_layer_lock(&mut self, layer_id: LayerId) -> bool {
        self.execute(Command::ToggleLayerLock { layer_id })
    }

    pub fn clear_canvas(&mut self) -> bool {
        self.execute(Command::ClearCanvas)
    }

    /// Canvas-sized fill in the current brush colour
    pub fn fill_canvas(&mut self) -> bool {
        self.execute(Command::FillCanvas {
            color: self.brush.color,
        })
    }

    pub fn delete_selected_strokes(&mut self) -> bool {
        self.execute(Command::DeleteSelection)
    }

    pub fn duplicate_selected_strokes(&mut self) -> bool {
        self.execute(Command::DuplicateSelection)
    }

    /// Continuous: translates the selection without touching history
    pub fn move_selected_strokes(&mut self, dx: f32, dy: f32) -> bool {
        self.apply(Command::MoveSelection { dx, dy })
    }

    // ---- Cosmetic state (no history) ----

    /// Makes `layer_id` current. Refused if the current frame has no such layer.
    pub fn select_layer(&mut self, layer_id: LayerId) -> bool {
        if !self.document.current_frame().has_layer(layer_id) {
            log::debug!("select_layer: {} not in current frame", layer_id);
            return false;
        }
        if self.document.current_layer_id != layer_id {
            self.document.current_layer_id = layer_id;
            self.clear_selection();
            self.event_bus.emit(EditorEvent::LayerSelected { layer_id });
        }
        true
    }

    /// Makes `index` the current frame. Out-of-range indices are ignored.
    pub fn set_current_frame(&mut self, index: usize) -> bool {
        if index >= self.document.frame_count() {
            log::debug!("set_current_frame: {} out of range", index);
            return false;
        }
        if index != self.document.current_frame_index {
            self.cancel_gesture();
            self.end_hold_drag();
            self.document.current_frame_index = index;
            self.document.resolve_current_layer();
            self.clear_selection();
            self.event_bus.emit(EditorEvent::FrameChanged { index });
        }
        true
    }

    pub fn set_selection_points(&mut self, points: Option<Vec<Point>>) {
        self.selection.set_lasso(points);
    }

    pub fn set_selected_stroke_ids(&mut self, ids: impl IntoIterator<Item = StrokeId>) {
        self.selection.set_stroke_ids(ids);
        self.event_bus.emit(EditorEvent::SelectionChanged {
            count: self.selection.len(),
        });
    }

    pub fn clear_selection(&mut self) {
        if self.selection.is_empty() && self.selection.lasso().is_none() {
            return;
        }
        self.selection.clear();
        self.event_bus.emit(EditorEvent::SelectionChanged { count: 0 });
    }

    /// Switches tool, discarding any gesture in progress
    pub fn set_tool(&mut self, tool: ToolKind) {
        if tool == self.tool {
            return;
        }
        self.cancel_gesture();
        let old = std::mem::replace(&mut self.tool, tool);
        self.event_bus.emit(EditorEvent::ToolChanged { old, new: tool });
    }

    pub fn set_brush_color(&mut self, color: Color32) {
        self.brush.color = color;
    }

    pub fn set_brush_size(&mut self, size: f32) {
        self.brush.set_size(size);
    }

    pub fn set_brush_opacity(&mut self, opacity: f32) {
        self.brush.set_opacity(opacity);
    }

    pub fn add_recent_color(&mut self, color: Color32) {
        self.brush.add_recent_color(color, self.config.recent_colors_capacity);
    }

    /// Merges whichever of scale/offset is given; scale is clamped
    pub fn set_canvas_transform(&mut self, scale: Option<f32>, offset: Option<Vec2>) {
        self.viewport.set_transform(scale, offset);
        self.emit_view_changed();
    }

    pub fn reset_view(&mut self) {
        self.viewport.reset();
        self.emit_view_changed();
    }

    // ---- Canvas gestures ----

    /// Routes a raw pointer event: multi-finger taps become undo/redo, single
    /// pointer events drive the current tool.
    pub fn handle_input(&mut self, event: InputEvent) -> Result<(), TransitionError> {
        if let Some(gesture) = self.gestures.process(&event) {
            self.handle_gesture(gesture);
            return Ok(());
        }
        if event.is_multi_touch() {
            // A second finger turns a stroke into a view gesture
            self.cancel_gesture();
            return Ok(());
        }
        match event.phase {
            PointerPhase::Begin => self.pointer_begin(event.pos),
            PointerPhase::Update => {
                self.pointer_update(event.pos);
                Ok(())
            }
            PointerPhase::End => {
                self.pointer_end();
                Ok(())
            }
        }
    }

    pub fn handle_gesture(&mut self, gesture: Gesture) {
        match gesture {
            Gesture::Tap { pointers: 2 } => {
                self.undo();
            }
            Gesture::Tap { pointers: 3 } => {
                self.redo();
            }
            Gesture::Tap { pointers } => log::debug!("Ignoring {}-finger tap", pointers),
            Gesture::Pinch { phase, focal, scale } => match phase {
                PointerPhase::Begin => self.begin_pinch(focal),
                PointerPhase::Update => self.update_pinch(focal, scale),
                PointerPhase::End => self.end_pinch(),
            },
            Gesture::Pan { phase, translation } => match phase {
                PointerPhase::Begin => self.begin_pan(),
                PointerPhase::Update => self.update_pan(translation),
                PointerPhase::End => self.end_pan(),
            },
        }
    }

    /// Starts a gesture for the current tool at `screen` position.
    ///
    /// Refused without any change if a gesture is already running or the
    /// current layer is locked.
    pub fn pointer_begin(&mut self, screen: Pos2) -> Result<(), TransitionError> {
        let canvas = self.viewport.screen_to_canvas(screen);
        let next = match self.tool {
            ToolKind::Brush | ToolKind::Eraser => {
                let mut draft = MutableStroke::new();
                draft.add_point(Point::from(canvas));
                EditorState::Drawing {
                    tool: self.tool,
                    draft,
                }
            }
            ToolKind::Lasso => EditorState::Lassoing {
                points: vec![Point::from(canvas)],
            },
            ToolKind::Move => EditorState::Moving { anchor: canvas },
            ToolKind::Bucket => EditorState::Idle,
        };

        if !self.state.is_idle() {
            return Err(self.reject(TransitionError::InvalidStateTransition {
                from: self.state.name(),
                to: next.name(),
            }));
        }
        self.check_current_layer_editable()?;

        match self.tool {
            ToolKind::Bucket => {
                self.fill_canvas();
            }
            ToolKind::Lasso => self.clear_selection(),
            ToolKind::Move => {
                if !self.selection.is_empty() {
                    self.push_checkpoint();
                }
            }
            ToolKind::Brush | ToolKind::Eraser => {}
        }
        log::debug!("{} -> {}", self.state.name(), next.name());
        self.state = next;
        Ok(())
    }

    pub fn pointer_update(&mut self, screen: Pos2) {
        let canvas = self.viewport.screen_to_canvas(screen);
        let delta = match &mut self.state {
            EditorState::Idle => None,
            EditorState::Drawing { draft, .. } => {
                draft.add_point(Point::from(canvas));
                None
            }
            EditorState::Lassoing { points } => {
                points.push(Point::from(canvas));
                None
            }
            EditorState::Moving { anchor } => {
                let delta = canvas - *anchor;
                *anchor = canvas;
                Some(delta)
            }
        };

        if let Some(delta) = delta {
            if !self.selection.is_empty() && delta != Vec2::ZERO {
                self.move_selected_strokes(delta.x, delta.y);
            }
        }
    }

    /// Finishes the current gesture: commits the draft or the lasso
    pub fn pointer_end(&mut self) {
        match std::mem::take(&mut self.state) {
            EditorState::Idle | EditorState::Moving { .. } => {}
            EditorState::Drawing { tool, draft } => {
                let color = if tool == ToolKind::Eraser {
                    StrokeColor::Transparent
                } else {
                    StrokeColor::Solid(self.brush.color)
                };
                match draft.finish(color, self.brush.size, self.brush.opacity, tool) {
                    Some(stroke) => {
                        self.add_stroke(stroke.into_ref());
                    }
                    None => log::debug!("Dropped draft with fewer than two points"),
                }
            }
            EditorState::Lassoing { points } => {
                let id = self.document.current_layer_id();
                if let Some(layer) = self.document.current_frame().layer(id) {
                    let count = self.selection.apply_lasso(points, layer);
                    self.event_bus.emit(EditorEvent::SelectionChanged { count });
                }
            }
        }
    }

    /// Drops the gesture in progress without committing anything
    pub fn cancel_gesture(&mut self) {
        if !self.state.is_idle() {
            log::debug!("Cancelled {} gesture", self.state.name());
            self.state = EditorState::Idle;
        }
    }

    pub fn begin_pinch(&mut self, focal: Pos2) {
        self.cancel_gesture();
        self.pinch = Some(PinchZoom::begin(&self.viewport, focal));
    }

    /// `scale` is the cumulative factor since the pinch began
    pub fn update_pinch(&mut self, focal: Pos2, scale: f32) {
        if let Some(pinch) = self.pinch {
            pinch.update(&mut self.viewport, focal, scale);
            self.emit_view_changed();
        }
    }

    pub fn end_pinch(&mut self) {
        self.pinch = None;
    }

    pub fn begin_pan(&mut self) {
        self.cancel_gesture();
        self.pan = Some(PanDrag::begin(&self.viewport));
    }

    /// `translation` is cumulative since the pan began
    pub fn update_pan(&mut self, translation: Vec2) {
        if let Some(pan) = self.pan {
            pan.update(&mut self.viewport, translation);
            self.emit_view_changed();
        }
    }

    pub fn end_pan(&mut self) {
        self.pan = None;
    }

    // ---- Timeline ----

    /// Jumps to the frame under `x` on the timeline strip
    pub fn scrub_timeline(&mut self, x: f32) -> bool {
        let index = timeline::scrub_index(x, self.config.timeline_cell_width, self.document.frame_count());
        self.set_current_frame(index)
    }

    /// Starts dragging the hold-run handle of frame `index`; records one checkpoint
    pub fn begin_hold_drag(&mut self, index: usize) -> bool {
        if index >= self.document.frame_count() {
            return false;
        }
        self.push_checkpoint();
        self.hold_drag = Some(HoldDrag::new(index));
        true
    }

    /// Applies the hold-run drag for a cumulative horizontal `translation_x`
    pub fn update_hold_drag(&mut self, translation_x: f32) {
        let Some(mut drag) = self.hold_drag else {
            return;
        };
        let Some(diff) = drag.pending(translation_x, self.config.timeline_cell_width) else {
            return;
        };

        let before = self.document.frame_count();
        self.extend_frame(drag.index(), diff, true);
        let changed = self.document.frame_count() as isize - before as isize;
        drag.record(changed);
        self.hold_drag = Some(drag);
    }

    /// Ends the hold-run drag. Undo, redo and frame switches also end it.
    pub fn end_hold_drag(&mut self) {
        if let Some(drag) = self.hold_drag.take() {
            log::debug!("Hold drag on frame {} applied {}", drag.index(), drag.applied());
        }
    }

    // ---- Playback ----

    pub fn toggle_playback(&mut self) -> bool {
        let playing = self.playback.toggle();
        if playing {
            self.cancel_gesture();
        }
        self.event_bus.emit(EditorEvent::PlaybackToggled { playing });
        playing
    }

    /// Stops playback; emits the toggle event only if playback was running
    pub fn stop_playback(&mut self) {
        if self.playback.stop() {
            self.event_bus.emit(EditorEvent::PlaybackToggled { playing: false });
        }
    }

    /// Advances playback by the host's elapsed time
    pub fn advance_playback(&mut self, elapsed: Duration) {
        let ticks = self.playback.advance(elapsed);
        if ticks == 0 {
            return;
        }
        let next = playback::next_frame_index(
            self.document.current_frame_index(),
            ticks,
            self.document.frame_count(),
        );
        self.set_current_frame(next);
    }

    pub fn skip_to_start(&mut self) -> bool {
        self.set_current_frame(0)
    }

    /// Next frame, wrapping to the first after the last
    pub fn step_forward(&mut self) -> bool {
        let next = playback::next_frame_index(
            self.document.current_frame_index(),
            1,
            self.document.frame_count(),
        );
        self.set_current_frame(next)
    }

    // ---- Helpers ----

    fn focus(&self) -> (FrameId, LayerId, usize) {
        (
            self.document.current_frame().id,
            self.document.current_layer_id(),
            self.selection.len(),
        )
    }

    /// Selection ids only mean something for one frame/layer pair
    fn sync_selection(&mut self, (frame_id, layer_id, count): (FrameId, LayerId, usize)) {
        let frame = self.document.current_frame();
        if frame.id != frame_id || self.document.current_layer_id() != layer_id {
            if frame.id != frame_id {
                self.event_bus.emit(EditorEvent::FrameChanged {
                    index: self.document.current_frame_index(),
                });
            }
            self.clear_selection();
            return;
        }
        if let Some(layer) = frame.layer(layer_id) {
            self.selection.retain_existing(layer);
        }
        if self.selection.len() != count {
            self.event_bus.emit(EditorEvent::SelectionChanged {
                count: self.selection.len(),
            });
        }
    }

    fn check_current_layer_editable(&self) -> Result<(), TransitionError> {
        let id = self.document.current_layer_id();
        match self.document.current_layer() {
            None => Err(self.reject(TransitionError::MissingLayer(id))),
            Some(layer) if layer.locked => Err(self.reject(TransitionError::LayerLocked(id))),
            Some(_) => Ok(()),
        }
    }

    fn reject(&self, err: TransitionError) -> TransitionError {
        log::debug!("Gesture rejected: {}", err);
        self.event_bus.emit(EditorEvent::GestureRejected {
            reason: err.to_string(),
        });
        err
    }

    fn emit_view_changed(&self) {
        self.event_bus.emit(EditorEvent::ViewChanged {
            scale: self.viewport.scale(),
            offset: self.viewport.offset(),
        });
    }
}
