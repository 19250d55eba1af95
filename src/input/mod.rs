use egui::{Pos2, Vec2};

mod gestures;

pub use gestures::{GestureConfig, GestureRecognizer};

/// Phase of a pointer event within one gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Begin,
    Update,
    End,
}

/// A raw pointer sample in screen coordinates, as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputEvent {
    pub phase: PointerPhase,
    /// Position in screen coordinates
    pub pos: Pos2,
    /// Number of pointers (fingers) down during this event
    pub pointer_count: usize,
    /// Host clock in milliseconds; only differences are used
    pub timestamp_ms: u64,
}

impl InputEvent {
    pub fn new(phase: PointerPhase, pos: Pos2, pointer_count: usize, timestamp_ms: u64) -> Self {
        Self {
            phase,
            pos,
            pointer_count,
            timestamp_ms,
        }
    }

    pub fn begin(pos: Pos2, timestamp_ms: u64) -> Self {
        Self::new(PointerPhase::Begin, pos, 1, timestamp_ms)
    }

    pub fn update(pos: Pos2, timestamp_ms: u64) -> Self {
        Self::new(PointerPhase::Update, pos, 1, timestamp_ms)
    }

    pub fn end(pos: Pos2, timestamp_ms: u64) -> Self {
        Self::new(PointerPhase::End, pos, 1, timestamp_ms)
    }

    /// Same event reported with `count` pointers down
    pub fn with_pointers(self, count: usize) -> Self {
        Self {
            pointer_count: count,
            ..self
        }
    }

    pub fn is_multi_touch(&self) -> bool {
        self.pointer_count >= 2
    }
}

/// Recognized multi-pointer gestures
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    /// Short, still tap with several fingers: 2 = undo, 3 = redo
    Tap { pointers: usize },
    /// Pinch zoom; `scale` is cumulative since the gesture began
    Pinch {
        phase: PointerPhase,
        focal: Pos2,
        scale: f32,
    },
    /// Two-finger pan; `translation` is cumulative since the gesture began
    Pan {
        phase: PointerPhase,
        translation: Vec2,
    },
}
