use super::{Command, CommandContext, CommandResult};
use crate::document::Document;

/// Linear snapshot history.
///
/// Every entry is a full logical copy of the [`Document`]. Stroke geometry is
/// shared between entries through `Arc`, so an entry only costs the frame and
/// layer vectors it holds.
#[derive(Debug, Clone, Default)]
pub struct CommandHistory {
    /// Snapshots that can be restored by undo, newest last
    undo_stack: Vec<Document>,
    /// Snapshots that can be restored by redo, next one last
    redo_stack: Vec<Document>,
    /// Oldest undo entries are dropped beyond this many
    limit: Option<usize>,
}

impl CommandHistory {
    /// Creates a new empty command history
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// Records `document` as an undo point and clears the redo stack.
    ///
    /// This is the explicit checkpoint for continuous gestures: call it once at
    /// gesture start, then apply deltas with [`CommandHistory::apply`].
    pub fn checkpoint(&mut self, document: &Document) {
        self.push_undo(document.clone());
        self.redo_stack.clear();
    }

    /// Execute a command, recording the pre-command state if it succeeds.
    ///
    /// Continuous commands never record anything here.
    pub fn execute(&mut self, command: &Command, ctx: &mut CommandContext<'_>) -> CommandResult {
        if command.is_continuous() {
            return command.execute(ctx);
        }

        let before = ctx.document.clone();
        command.execute(ctx)?;

        self.push_undo(before);
        self.redo_stack.clear();
        log::debug!("{} recorded, {} undo entries", command.name(), self.undo_stack.len());
        Ok(())
    }

    /// Apply a command without touching history
    pub fn apply(&self, command: &Command, ctx: &mut CommandContext<'_>) -> CommandResult {
        command.execute(ctx)
    }

    /// Restore the last undo snapshot. Returns false on an empty stack.
    pub fn undo(&mut self, document: &mut Document) -> bool {
        let Some(previous) = self.undo_stack.pop() else {
            return false;
        };
        let current = std::mem::replace(document, previous);
        self.redo_stack.push(current);
        true
    }

    /// Restore the next redo snapshot. Returns false on an empty stack.
    pub fn redo(&mut self, document: &mut Document) -> bool {
        let Some(next) = self.redo_stack.pop() else {
            return false;
        };
        let current = std::mem::replace(document, next);
        self.push_undo(current);
        true
    }

    fn push_undo(&mut self, snapshot: Document) {
        self.undo_stack.push(snapshot);
        if let Some(limit) = self.limit {
            if self.undo_stack.len() > limit {
                let excess = self.undo_stack.len() - limit;
                self.undo_stack.drain(..excess);
            }
        }
    }

    /// Returns true if there are commands that can be undone
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Returns true if there are commands that can be redone
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Clear the command history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
