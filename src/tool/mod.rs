mod brush;

pub use brush::{BrushSettings, StrokeColor};

use serde::{Deserialize, Serialize};

/// The closed set of canvas tools.
///
/// Each variant has exactly one gesture handler in
/// [`EditorContext`](crate::state::EditorContext); there is no plugin mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Brush,
    Eraser,
    Lasso,
    Move,
    Bucket,
}

impl ToolKind {
    pub const ALL: [ToolKind; 5] = [
        ToolKind::Brush,
        ToolKind::Eraser,
        ToolKind::Lasso,
        ToolKind::Move,
        ToolKind::Bucket,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Brush => "Brush",
            Self::Eraser => "Eraser",
            Self::Lasso => "Lasso",
            Self::Move => "Move",
            Self::Bucket => "Bucket",
        }
    }

    /// Strokes made with this tool render as closed filled regions
    pub fn is_fill(&self) -> bool {
        matches!(self, Self::Bucket)
    }
}
