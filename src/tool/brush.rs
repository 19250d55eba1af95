use egui::Color32;
use serde::{Deserialize, Serialize};

/// Stroke colour as recorded on a committed stroke.
///
/// Eraser strokes carry `Transparent`; the renderer composites them with a
/// clearing blend instead of painting a colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeColor {
    Solid(Color32),
    Transparent,
}

impl StrokeColor {
    pub fn is_transparent(&self) -> bool {
        matches!(self, Self::Transparent)
    }

    /// Colour to paint with; transparent strokes resolve to `Color32::TRANSPARENT`
    pub fn to_color32(&self) -> Color32 {
        match self {
            Self::Solid(color) => *color,
            Self::Transparent => Color32::TRANSPARENT,
        }
    }
}

impl From<Color32> for StrokeColor {
    fn from(color: Color32) -> Self {
        Self::Solid(color)
    }
}

/// Brush settings shared by the brush, eraser and bucket tools
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushSettings {
    /// Current brush color
    pub color: Color32,
    /// Stroke width in canvas units
    pub size: f32,
    /// Opacity applied to newly committed strokes
    pub opacity: f32,
    /// Most recently used colors, newest first
    pub recent_colors: Vec<Color32>,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            color: Color32::BLACK,
            size: 5.0,
            opacity: 1.0,
            recent_colors: vec![
                Color32::BLACK,
                Color32::WHITE,
                Color32::from_rgb(255, 0, 0),
                Color32::from_rgb(0, 255, 0),
                Color32::from_rgb(0, 0, 255),
            ],
        }
    }
}

impl BrushSettings {
    pub fn set_size(&mut self, size: f32) {
        self.size = size.max(0.0);
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }

    /// Prepends `color` unless it is already listed, keeping at most `capacity` entries
    pub fn add_recent_color(&mut self, color: Color32, capacity: usize) {
        if self.recent_colors.contains(&color) {
            return;
        }
        self.recent_colors.insert(0, color);
        self.recent_colors.truncate(capacity);
    }
}
