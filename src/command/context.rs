use crate::config::EditorConfig;
use crate::document::Document;
use crate::selection::Selection;

/// Context for command execution: the state a command may read and change.
#[derive(Debug)]
pub struct CommandContext<'a> {
    /// The document being edited
    pub document: &'a mut Document,
    /// Selection of the current frame/layer
    pub selection: &'a mut Selection,
    /// Canvas size, duplicate offset and friends
    pub config: &'a EditorConfig,
}

impl<'a> CommandContext<'a> {
    /// Create a new command context
    pub fn new(
        document: &'a mut Document,
        selection: &'a mut Selection,
        config: &'a EditorConfig,
    ) -> Self {
        Self {
            document,
            selection,
            config,
        }
    }
}
