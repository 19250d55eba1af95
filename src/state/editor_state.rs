//! The gesture state machine of the canvas.
//!
//! Every pointer gesture runs from `Idle` into exactly one active state and
//! back:
//!
//! ```text
//!            ┌──────────┐
//!      ┌─────►  Drawing ├─────┐
//!      │     └──────────┘     │
//! ┌────┴─┐   ┌──────────┐   ┌─▼────┐
//! │ Idle ├───► Lassoing ├───► Idle │
//! └────┬─┘   └──────────┘   └─▲────┘
//!      │     ┌──────────┐     │
//!      └─────►  Moving  ├─────┘
//!            └──────────┘
//! ```
//!
//! The bucket tool acts on begin and never leaves `Idle`.

use egui::Pos2;

use crate::stroke::{MutableStroke, Point};
use crate::tool::ToolKind;

/// The possible states of the editor's canvas gesture.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum EditorState {
    /// No active gesture
    #[default]
    Idle,
    /// Brush or eraser stroke being sampled
    Drawing { tool: ToolKind, draft: MutableStroke },
    /// Lasso boundary being traced, in canvas space
    Lassoing { points: Vec<Point> },
    /// Selected strokes following the pointer; `anchor` is the last canvas position applied
    Moving { anchor: Pos2 },
}

impl EditorState {
    /// Validates whether a transition to the new state is allowed
    pub fn can_transition_to(&self, new_state: &EditorState) -> bool {
        match (self, new_state) {
            // Any gesture may start from Idle
            (EditorState::Idle, _) => true,
            // Every gesture finishes or is cancelled back to Idle
            (_, EditorState::Idle) => true,
            _ => false,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EditorState::Idle => "Idle",
            EditorState::Drawing { .. } => "Drawing",
            EditorState::Lassoing { .. } => "Lassoing",
            EditorState::Moving { .. } => "Moving",
        }
    }

    /// Returns true if the editor is currently in an idle state
    pub fn is_idle(&self) -> bool {
        matches!(self, EditorState::Idle)
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self, EditorState::Drawing { .. })
    }

    pub fn is_lassoing(&self) -> bool {
        matches!(self, EditorState::Lassoing { .. })
    }

    pub fn is_moving(&self) -> bool {
        matches!(self, EditorState::Moving { .. })
    }

    /// The uncommitted stroke, for the draft overlay
    pub fn draft(&self) -> Option<(ToolKind, &[Point])> {
        match self {
            EditorState::Drawing { tool, draft } => Some((*tool, draft.points())),
            _ => None,
        }
    }

    /// The lasso boundary while it is being traced
    pub fn lasso_in_progress(&self) -> Option<&[Point]> {
        match self {
            EditorState::Lassoing { points } => Some(points),
            _ => None,
        }
    }
}
