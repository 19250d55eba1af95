use std::fmt;

use crate::id_generator::LayerId;

/// Errors that can occur when a gesture tries to move the editor out of `Idle`.
///
/// A rejected transition never changes the document or the history; it exists
/// so the UI layer can tell the user why nothing happened.
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionError {
    /// Attempted to transition between incompatible states
    InvalidStateTransition {
        from: &'static str,
        to: &'static str,
    },
    /// The current layer is locked against edits
    LayerLocked(LayerId),
    /// The current layer does not exist in the current frame
    MissingLayer(LayerId),
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidStateTransition { from, to } =>
                write!(f, "Cannot transition from {} to {}", from, to),
            Self::LayerLocked(id) =>
                write!(f, "Layer {} is locked", id),
            Self::MissingLayer(id) =>
                write!(f, "Layer {} is not part of the current frame", id),
        }
    }
}

impl std::error::Error for TransitionError {}
