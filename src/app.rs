use egui::{Color32, Pos2, Sense, Vec2};
use std::time::Duration;

use crate::config::EditorConfig;
use crate::document::Document;
use crate::event::LoggingEventHandler;
use crate::input::{Gesture, InputEvent, PointerPhase};
use crate::renderer::Renderer;
use crate::state::EditorContext;
use crate::tool::{BrushSettings, ToolKind};
use crate::util::time;

/// What is kept between runs through eframe's storage.
#[derive(serde::Deserialize, serde::Serialize, Debug, Default)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
struct SavedState {
    document: Document,
    config: EditorConfig,
    brush: BrushSettings,
}

#[derive(Debug)]
pub struct FlipbookApp {
    editor: EditorContext,
    renderer: Renderer,
    /// Cumulative pinch scale and whether a touch gesture is running
    pinch_scale: Option<f32>,
    /// Cumulative horizontal drag on a hold-run handle
    hold_drag_dx: f32,
    /// Cumulative middle-button pan
    pan_translation: Vec2,
    canvas_pointer_down: bool,
}

impl Default for FlipbookApp {
    fn default() -> Self {
        Self::from_saved(SavedState::default())
    }
}

impl FlipbookApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let saved = cc
            .storage
            .and_then(|storage| eframe::get_value::<SavedState>(storage, eframe::APP_KEY))
            .unwrap_or_default();
        Self::from_saved(saved)
    }

    fn from_saved(saved: SavedState) -> Self {
        let config = match saved.config.validate() {
            Ok(()) => saved.config,
            Err(err) => {
                log::warn!("Ignoring stored config: {}", err);
                EditorConfig::default()
            }
        };
        let document = match saved.document.check_invariants() {
            Ok(()) => saved.document,
            Err(err) => {
                log::warn!("Ignoring stored project: {}", err);
                Document::new()
            }
        };

        let mut editor = EditorContext::with_document(document, config);
        editor.set_brush_color(saved.brush.color);
        editor.set_brush_size(saved.brush.size);
        editor.set_brush_opacity(saved.brush.opacity);
        for color in saved.brush.recent_colors.iter().rev() {
            editor.add_recent_color(*color);
        }
        editor.event_bus.subscribe(Box::new(LoggingEventHandler));

        Self {
            editor,
            renderer: Renderer::default(),
            pinch_scale: None,
            hold_drag_dx: 0.0,
            pan_translation: Vec2::ZERO,
            canvas_pointer_down: false,
        }
    }

    pub fn editor(&self) -> &EditorContext {
        &self.editor
    }

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal_wrapped(|ui| {
            for tool in ToolKind::ALL {
                if ui.selectable_label(self.editor.tool() == tool, tool.name()).clicked() {
                    self.editor.set_tool(tool);
                }
            }
            ui.separator();

            let mut color = self.editor.brush().color;
            if egui::color_picker::color_edit_button_srgba(ui, &mut color, egui::color_picker::Alpha::Opaque)
                .changed()
            {
                self.editor.set_brush_color(color);
                self.editor.add_recent_color(color);
            }
            let recent = self.editor.brush().recent_colors.clone();
            for color in recent {
                let (rect, response) = ui.allocate_exact_size(Vec2::splat(16.0), Sense::click());
                ui.painter().rect_filled(rect, 2.0, color);
                if response.clicked() {
                    self.editor.set_brush_color(color);
                }
            }

            let mut size = self.editor.brush().size;
            if ui.add(egui::Slider::new(&mut size, 1.0..=50.0).text("Size")).changed() {
                self.editor.set_brush_size(size);
            }
            let mut opacity = self.editor.brush().opacity;
            if ui.add(egui::Slider::new(&mut opacity, 0.0..=1.0).text("Opacity")).changed() {
                self.editor.set_brush_opacity(opacity);
            }
            ui.separator();

            if ui.add_enabled(self.editor.can_undo(), egui::Button::new("Undo")).clicked() {
                self.editor.undo();
            }
            if ui.add_enabled(self.editor.can_redo(), egui::Button::new("Redo")).clicked() {
                self.editor.redo();
            }
            if ui.button("Clear").clicked() {
                self.editor.clear_canvas();
            }
            let has_selection = !self.editor.selection().is_empty();
            if ui.add_enabled(has_selection, egui::Button::new("Duplicate")).clicked() {
                self.editor.duplicate_selected_strokes();
            }
            if ui.add_enabled(has_selection, egui::Button::new("Delete")).clicked() {
                self.editor.delete_selected_strokes();
            }
            if ui.button("Reset view").clicked() {
                self.editor.reset_view();
            }
        });
    }

    fn layers_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Layers");
        if ui.button("Add layer").clicked() {
            self.editor.add_layer();
        }
        ui.separator();

        let current = self.editor.document().current_layer_id();
        let layers: Vec<_> = self
            .editor
            .document()
            .current_frame()
            .layers
            .iter()
            .rev()
            .map(|layer| (layer.id, layer.name.clone(), layer.visible, layer.locked))
            .collect();

        for (id, name, visible, locked) in layers {
            ui.horizontal(|ui| {
                if ui.selectable_label(id == current, name).clicked() {
                    self.editor.select_layer(id);
                }
                if ui.small_button(if visible { "Hide" } else { "Show" }).clicked() {
                    self.editor.toggle_layer_visibility(id);
                }
                if ui.small_button(if locked { "Unlock" } else { "Lock" }).clicked() {
                    self.editor.toggle_layer_lock(id);
                }
                if ui.small_button("Copy").clicked() {
                    self.editor.duplicate_layer(id);
                }
                if ui.small_button("Delete").clicked() {
                    self.editor.delete_layer(id);
                }
            });
        }
    }

    fn timeline(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("|<").clicked() {
                self.editor.skip_to_start();
            }
            let label = if self.editor.is_playing() { "Pause" } else { "Play" };
            if ui.button(label).clicked() {
                self.editor.toggle_playback();
            }
            if ui.button(">|").clicked() {
                self.editor.step_forward();
            }
            ui.separator();

            let current = self.editor.document().current_frame_index();
            if ui.button("Add frame").clicked() {
                self.editor.add_frame();
            }
            if ui.button("Duplicate frame").clicked() {
                self.editor.duplicate_frame(current);
            }
            if ui.button("Delete frame").clicked() {
                self.editor.delete_frame(current);
            }
            if ui.button("+ hold").clicked() {
                self.editor.extend_frame(current, 1, false);
            }
            if ui.button("- hold").clicked() {
                self.editor.extend_frame(current, -1, false);
            }
        });

        let cell_width = self.editor.config().timeline_cell_width;
        let cells = crate::timeline::timeline_cells(self.editor.document());
        egui::ScrollArea::horizontal().show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.spacing_mut().item_spacing.x = 0.0;
                for cell in cells {
                    let (rect, response) =
                        ui.allocate_exact_size(Vec2::new(cell_width, 32.0), Sense::click_and_drag());
                    let fill = if cell.is_current {
                        Color32::from_rgb(90, 140, 220)
                    } else if cell.in_current_run {
                        Color32::from_rgb(180, 200, 235)
                    } else {
                        Color32::from_gray(220)
                    };
                    ui.painter().rect_filled(rect.shrink(1.0), 2.0, fill);
                    if let Some(number) = cell.keyframe_number {
                        ui.painter().text(
                            rect.center(),
                            egui::Align2::CENTER_CENTER,
                            number.to_string(),
                            egui::FontId::proportional(12.0),
                            Color32::BLACK,
                        );
                    }

                    if response.clicked() {
                        self.editor.set_current_frame(cell.index);
                    }
                    if response.drag_started() {
                        self.hold_drag_dx = 0.0;
                        self.editor.begin_hold_drag(cell.index);
                    }
                    if response.dragged() {
                        self.hold_drag_dx += response.drag_delta().x;
                        self.editor.update_hold_drag(self.hold_drag_dx);
                    }
                    if response.drag_stopped() {
                        self.editor.end_hold_drag();
                    }
                }
            });
        });
    }

    fn canvas(&mut self, ui: &mut egui::Ui) {
        let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
        let origin = response.rect.min;
        let to_local = |pos: Pos2| (pos - origin).to_pos2();

        let (multi_touch, zoom_delta, hover, now) = ui.input(|i| {
            (i.multi_touch(), i.zoom_delta(), i.pointer.hover_pos(), time::timestamp_ms())
        });

        match multi_touch {
            Some(touch) => {
                let focal = to_local(touch.center_pos);
                let scale = match self.pinch_scale {
                    Some(scale) => scale * touch.zoom_delta,
                    None => {
                        self.editor.handle_gesture(Gesture::Pinch {
                            phase: PointerPhase::Begin,
                            focal,
                            scale: 1.0,
                        });
                        touch.zoom_delta
                    }
                };
                self.pinch_scale = Some(scale);
                self.editor.handle_gesture(Gesture::Pinch {
                    phase: PointerPhase::Update,
                    focal,
                    scale,
                });
            }
            None => {
                if self.pinch_scale.take().is_some() {
                    self.editor.end_pinch();
                }
                // Ctrl + scroll / trackpad pinch
                if zoom_delta != 1.0 && response.hovered() {
                    if let Some(pos) = hover {
                        let focal = to_local(pos);
                        self.editor.begin_pinch(focal);
                        self.editor.update_pinch(focal, zoom_delta);
                        self.editor.end_pinch();
                    }
                }
            }
        }

        let pointers = multi_touch.map_or(1, |touch| touch.num_touches.max(1));
        if response.drag_started_by(egui::PointerButton::Middle) {
            self.pan_translation = Vec2::ZERO;
            self.editor.begin_pan();
        }
        if response.dragged_by(egui::PointerButton::Middle) {
            self.pan_translation += response.drag_delta();
            self.editor.update_pan(self.pan_translation);
        }

        if let Some(pos) = response.interact_pointer_pos() {
            let local = to_local(pos);
            if response.is_pointer_button_down_on() && !response.dragged_by(egui::PointerButton::Middle) {
                let phase = if self.canvas_pointer_down {
                    PointerPhase::Update
                } else {
                    self.canvas_pointer_down = true;
                    PointerPhase::Begin
                };
                let event = InputEvent::new(phase, local, pointers, now);
                if let Err(err) = self.editor.handle_input(event) {
                    log::debug!("{}", err);
                }
            } else if self.canvas_pointer_down {
                self.canvas_pointer_down = false;
                let event = InputEvent::new(PointerPhase::End, local, 1, now);
                if let Err(err) = self.editor.handle_input(event) {
                    log::debug!("{}", err);
                }
            }
        } else if self.canvas_pointer_down {
            self.canvas_pointer_down = false;
            self.editor.pointer_end();
        }
        if response.drag_stopped_by(egui::PointerButton::Middle) {
            self.editor.end_pan();
        }

        self.renderer
            .paint(&painter, &self.editor.scene(), self.editor.viewport(), origin);
    }

    fn shortcuts(&mut self, ctx: &egui::Context) {
        let (undo, redo, delete) = ctx.input(|i| {
            let command = i.modifiers.command;
            (
                command && !i.modifiers.shift && i.key_pressed(egui::Key::Z),
                command && (i.key_pressed(egui::Key::Y) || (i.modifiers.shift && i.key_pressed(egui::Key::Z))),
                i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace),
            )
        });
        if undo {
            self.editor.undo();
        }
        if redo {
            self.editor.redo();
        }
        if delete && !ctx.wants_keyboard_input() {
            self.editor.delete_selected_strokes();
        }
    }
}

impl eframe::App for FlipbookApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let saved = SavedState {
            document: self.editor.document().clone(),
            config: self.editor.config().clone(),
            brush: self.editor.brush().clone(),
        };
        eframe::set_value(storage, eframe::APP_KEY, &saved);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let dt = ctx.input(|i| i.stable_dt);
        self.editor.advance_playback(Duration::from_secs_f32(dt.max(0.0)));
        if let Some(next) = self.editor.playback().time_to_next_tick() {
            ctx.request_repaint_after(next);
        }

        self.shortcuts(ctx);

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| self.toolbar(ui));
        egui::TopBottomPanel::bottom("timeline").show(ctx, |ui| self.timeline(ui));
        egui::SidePanel::right("layers").show(ctx, |ui| self.layers_panel(ui));
        egui::CentralPanel::default().show(ctx, |ui| self.canvas(ui));
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.editor.stop_playback();
    }
}
