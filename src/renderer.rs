//! Render list and painter.
//!
//! [`Scene`] is the read-only view the renderer consumes: resolved styles for
//! every visible layer of the current frame plus the overlays. It is rebuilt
//! from the editor after every change and never cached across a mutation.

use egui::{Color32, Pos2, Rect, Shape, Vec2};

use crate::config::EditorConfig;
use crate::document::Document;
use crate::frame::Frame;
use crate::geometry;
use crate::id_generator::{LayerId, StrokeId};
use crate::selection::Selection;
use crate::state::EditorState;
use crate::stroke::{Point, Stroke};
use crate::tool::{StrokeColor, ToolKind};
use crate::viewport::Viewport;

/// How a stroke is composited onto what is below it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    Normal,
    /// Clears what lies below (eraser strokes)
    Erase,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StrokeStyle {
    /// Open polyline of the given width
    Line { width: f32 },
    /// Closed filled region
    Fill,
}

/// One stroke with its style fully resolved, in canvas coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct RenderStroke {
    pub id: StrokeId,
    pub points: Vec<Pos2>,
    pub style: StrokeStyle,
    pub color: Color32,
    /// Stroke opacity multiplied by layer opacity
    pub opacity: f32,
    pub blend: BlendMode,
    pub selected: bool,
    /// Bounds including half the line width
    pub bounds: Rect,
}

impl RenderStroke {
    fn resolve(stroke: &Stroke, layer_opacity: f32, selected: bool) -> Self {
        Self {
            id: stroke.id,
            points: stroke.positions().collect(),
            style: style_for(stroke.tool, stroke.width),
            color: stroke.color.to_color32(),
            opacity: stroke.opacity * layer_opacity,
            blend: if stroke.is_eraser() {
                BlendMode::Erase
            } else {
                BlendMode::Normal
            },
            selected,
            bounds: geometry::calculate_bounds(&stroke.points, stroke.width * 0.5),
        }
    }
}

fn style_for(tool: ToolKind, width: f32) -> StrokeStyle {
    if tool.is_fill() {
        StrokeStyle::Fill
    } else {
        StrokeStyle::Line { width }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderLayer {
    pub id: LayerId,
    pub strokes: Vec<RenderStroke>,
}

/// The uncommitted stroke of a draw gesture
#[derive(Debug, Clone, PartialEq)]
pub struct DraftOverlay {
    pub points: Vec<Pos2>,
    pub style: StrokeStyle,
    pub color: Color32,
    pub blend: BlendMode,
}

/// Everything to draw for one editor frame, bottom to top
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scene {
    pub canvas_size: Vec2,
    /// Previous frame's strokes at reduced opacity, drawn under the layers
    pub onion_skin: Vec<RenderStroke>,
    /// Visible layers of the current frame in z-order
    pub layers: Vec<RenderLayer>,
    pub draft: Option<DraftOverlay>,
    /// Lasso boundary, either in progress or committed
    pub lasso: Option<Vec<Pos2>>,
}

impl Scene {
    pub fn build(
        document: &Document,
        selection: &Selection,
        state: &EditorState,
        brush_color: Color32,
        brush_size: f32,
        config: &EditorConfig,
    ) -> Self {
        let current_layer = document.current_layer_id();
        let layers = document
            .current_frame()
            .visible_layers()
            .map(|layer| RenderLayer {
                id: layer.id,
                strokes: layer
                    .strokes
                    .iter()
                    .map(|stroke| {
                        let selected = layer.id == current_layer && selection.contains(stroke.id);
                        RenderStroke::resolve(stroke, layer.opacity, selected)
                    })
                    .collect(),
            })
            .collect();

        let onion_skin = document
            .current_frame_index()
            .checked_sub(1)
            .and_then(|index| document.frame(index))
            .map(|previous| onion_skin(previous, config.onion_skin_opacity))
            .unwrap_or_default();

        let draft = state.draft().map(|(tool, points)| DraftOverlay {
            points: points.iter().map(Point::to_pos2).collect(),
            style: style_for(tool, brush_size),
            color: if tool == ToolKind::Eraser {
                StrokeColor::Transparent.to_color32()
            } else {
                brush_color
            },
            blend: if tool == ToolKind::Eraser {
                BlendMode::Erase
            } else {
                BlendMode::Normal
            },
        });

        let lasso = state
            .lasso_in_progress()
            .or_else(|| selection.lasso())
            .map(|points| points.iter().map(Point::to_pos2).collect());

        Self {
            canvas_size: Vec2::new(config.canvas_width, config.canvas_height),
            onion_skin,
            layers,
            draft,
            lasso,
        }
    }

    pub fn stroke_count(&self) -> usize {
        self.layers.iter().map(|layer| layer.strokes.len()).sum()
    }
}

/// Visible strokes of `frame` at `opacity`; eraser strokes are left out
fn onion_skin(frame: &Frame, opacity: f32) -> Vec<RenderStroke> {
    frame
        .visible_layers()
        .flat_map(|layer| layer.strokes.iter())
        .filter(|stroke| !stroke.is_eraser())
        .map(|stroke| {
            let mut resolved = RenderStroke::resolve(stroke, 1.0, false);
            resolved.opacity = opacity;
            resolved
        })
        .collect()
}

/// Render list of `frame` scaled from `canvas_size` to fit `target_size`.
///
/// Each thumbnail scales its own copy of the points; the frame is untouched.
pub fn thumbnail(frame: &Frame, canvas_size: Vec2, target_size: Vec2) -> Vec<RenderLayer> {
    let factor = if canvas_size.x > 0.0 && canvas_size.y > 0.0 {
        (target_size.x / canvas_size.x).min(target_size.y / canvas_size.y)
    } else {
        0.0
    };

    frame
        .visible_layers()
        .map(|layer| RenderLayer {
            id: layer.id,
            strokes: layer
                .strokes
                .iter()
                .map(|stroke| {
                    let mut resolved = RenderStroke::resolve(stroke, layer.opacity, false);
                    resolved.points = geometry::scale_points(&stroke.points, factor);
                    let mut half_width = 0.0;
                    if let StrokeStyle::Line { width } = resolved.style {
                        resolved.style = StrokeStyle::Line { width: width * factor };
                        half_width = width * factor * 0.5;
                    }
                    resolved.bounds = Rect::from_points(&resolved.points).expand(half_width);
                    resolved
                })
                .collect(),
        })
        .collect()
}

/// Paints a [`Scene`] with an egui painter.
///
/// egui has no clearing blend, so erase strokes are painted with the paper
/// colour.
#[derive(Debug, Clone)]
pub struct Renderer {
    paper: Color32,
    selection_color: Color32,
    lasso_color: Color32,
}

impl Default for Renderer {
    fn default() -> Self {
        Self {
            paper: Color32::WHITE,
            selection_color: Color32::from_rgb(0, 122, 255),
            lasso_color: Color32::from_rgb(0, 122, 255),
        }
    }
}

impl Renderer {
    pub fn new(paper: Color32) -> Self {
        Self {
            paper,
            ..Self::default()
        }
    }

    pub fn paper(&self) -> Color32 {
        self.paper
    }

    /// Paints the scene; `origin` is the screen position of the viewport's (0, 0)
    pub fn paint(&self, painter: &egui::Painter, scene: &Scene, viewport: &Viewport, origin: Pos2) {
        let to_screen = |p: Pos2| viewport.canvas_to_screen(p) + origin.to_vec2();
        let scale = viewport.scale();

        let paper = Rect::from_two_pos(to_screen(Pos2::ZERO), to_screen(scene.canvas_size.to_pos2()));
        painter.rect_filled(paper, 0.0, self.paper);

        for stroke in &scene.onion_skin {
            painter.add(self.stroke_shape(stroke, &to_screen, scale));
        }
        for layer in &scene.layers {
            for stroke in &layer.strokes {
                painter.add(self.stroke_shape(stroke, &to_screen, scale));
                if stroke.selected && stroke.bounds.is_finite() {
                    let rect = Rect::from_two_pos(to_screen(stroke.bounds.min), to_screen(stroke.bounds.max));
                    painter.add(Shape::dashed_line(
                        &[rect.left_top(), rect.right_top(), rect.right_bottom(), rect.left_bottom(), rect.left_top()],
                        egui::Stroke::new(1.0, self.selection_color),
                        4.0,
                        4.0,
                    ));
                }
            }
        }

        if let Some(draft) = &scene.draft {
            let color = self.resolve_color(draft.color, 1.0, draft.blend);
            let points: Vec<Pos2> = draft.points.iter().map(|p| to_screen(*p)).collect();
            if let StrokeStyle::Line { width } = draft.style {
                painter.add(Shape::line(points, egui::Stroke::new(width * scale, color)));
            }
        }

        if let Some(lasso) = &scene.lasso {
            let mut points: Vec<Pos2> = lasso.iter().map(|p| to_screen(*p)).collect();
            if let Some(first) = points.first().copied() {
                points.push(first);
            }
            painter.add(Shape::dashed_line(
                &points,
                egui::Stroke::new(1.5, self.lasso_color),
                6.0,
                4.0,
            ));
        }
    }

    fn resolve_color(&self, color: Color32, opacity: f32, blend: BlendMode) -> Color32 {
        match blend {
            BlendMode::Normal => color.gamma_multiply(opacity),
            BlendMode::Erase => self.paper,
        }
    }

    fn stroke_shape(&self, stroke: &RenderStroke, to_screen: &impl Fn(Pos2) -> Pos2, scale: f32) -> Shape {
        let color = self.resolve_color(stroke.color, stroke.opacity, stroke.blend);
        let points: Vec<Pos2> = stroke.points.iter().map(|p| to_screen(*p)).collect();
        match stroke.style {
            StrokeStyle::Line { width } => Shape::line(points, egui::Stroke::new(width * scale, color)),
            StrokeStyle::Fill => Shape::convex_polygon(points, color, egui::Stroke::NONE),
        }
    }
}
