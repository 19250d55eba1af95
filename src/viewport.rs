//! Screen/canvas mapping: `screen = canvas * scale + offset`.
//!
//! The viewport is cosmetic state. It is never recorded in history.

use egui::{Pos2, Vec2};

pub const MIN_SCALE: f32 = 0.1;
pub const MAX_SCALE: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    scale: f32,
    offset: Vec2,
    scale_range: (f32, f32),
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: Vec2::ZERO,
            scale_range: (MIN_SCALE, MAX_SCALE),
        }
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Viewport clamping zoom to `min..=max` instead of the default range
    pub fn with_scale_range(min: f32, max: f32) -> Self {
        Self {
            scale_range: (min.min(max), max.max(min)),
            ..Self::default()
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Merges whichever of scale/offset is provided; scale is clamped
    pub fn set_transform(&mut self, scale: Option<f32>, offset: Option<Vec2>) {
        if let Some(scale) = scale {
            self.scale = self.clamp_scale(scale);
        }
        if let Some(offset) = offset {
            self.offset = offset;
        }
    }

    pub fn clamp_scale(&self, scale: f32) -> f32 {
        let (min, max) = self.scale_range;
        scale.clamp(min, max)
    }

    pub fn screen_to_canvas(&self, screen: Pos2) -> Pos2 {
        ((screen.to_vec2() - self.offset) / self.scale).to_pos2()
    }

    pub fn canvas_to_screen(&self, canvas: Pos2) -> Pos2 {
        (canvas.to_vec2() * self.scale + self.offset).to_pos2()
    }

    pub fn reset(&mut self) {
        self.scale = 1.0;
        self.offset = Vec2::ZERO;
    }
}

/// Focal-point-preserving pinch zoom.
///
/// The canvas point under the fingers at gesture start stays under the
/// (possibly moving) focal point for the rest of the gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchZoom {
    base_scale: f32,
    focal_canvas: Pos2,
}

impl PinchZoom {
    pub fn begin(viewport: &Viewport, focal_screen: Pos2) -> Self {
        Self {
            base_scale: viewport.scale(),
            focal_canvas: viewport.screen_to_canvas(focal_screen),
        }
    }

    /// `factor` is cumulative since gesture start
    pub fn update(&self, viewport: &mut Viewport, focal_screen: Pos2, factor: f32) {
        let scale = viewport.clamp_scale(self.base_scale * factor);
        let offset = focal_screen.to_vec2() - self.focal_canvas.to_vec2() * scale;
        viewport.set_transform(Some(scale), Some(offset));
    }
}

/// Two-finger pan: offset follows the cumulative translation from gesture start
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanDrag {
    base_offset: Vec2,
}

impl PanDrag {
    pub fn begin(viewport: &Viewport) -> Self {
        Self {
            base_offset: viewport.offset(),
        }
    }

    pub fn update(&self, viewport: &mut Viewport, translation: Vec2) {
        viewport.set_transform(None, Some(self.base_offset + translation));
    }
}
