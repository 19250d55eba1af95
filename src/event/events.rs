use egui::Vec2;

use crate::id_generator::LayerId;
use crate::tool::ToolKind;

#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    /// A command changed the document
    DocumentChanged {
        command: &'static str,
    },
    UndoApplied,
    RedoApplied,
    FrameChanged {
        index: usize,
    },
    LayerSelected {
        layer_id: LayerId,
    },
    SelectionChanged {
        count: usize,
    },
    ToolChanged {
        old: ToolKind,
        new: ToolKind,
    },
    PlaybackToggled {
        playing: bool,
    },
    /// A gesture begin was refused, e.g. on a locked layer
    GestureRejected {
        reason: String,
    },
    ViewChanged {
        scale: f32,
        offset: Vec2,
    },
}
