mod editor_state;
pub mod context;
mod persistence;

pub use context::EditorContext;
pub use editor_state::EditorState;
pub use persistence::{PersistenceError, PersistenceResult, ProjectFile};
