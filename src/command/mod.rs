mod commands;
mod context;
mod history;

use thiserror::Error;

use crate::id_generator::LayerId;

pub use commands::Command;
pub use context::CommandContext;
pub use history::CommandHistory;

/// Result type for command operations
pub type CommandResult = Result<(), CommandError>;

/// Reasons a command was refused.
///
/// Commands validate before they touch anything, so an error always means the
/// document, the selection and the history are exactly as they were.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error("layer {0} does not exist")]
    UnknownLayer(LayerId),

    #[error("frame index {index} is out of range for {len} frames")]
    FrameOutOfRange { index: usize, len: usize },

    #[error("the last remaining frame cannot be deleted")]
    LastFrame,

    #[error("no strokes are selected")]
    EmptySelection,

    #[error("a stroke needs at least two points, got {0}")]
    DegenerateStroke(usize),

    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}
