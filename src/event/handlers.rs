use parking_lot::Mutex;
use std::sync::Arc;

use crate::event::{EditorEvent, EventHandler};

/// Forwards every event to the `log` facade
#[derive(Debug, Default)]
pub struct LoggingEventHandler;

impl EventHandler for LoggingEventHandler {
    fn handle_event(&mut self, event: &EditorEvent) {
        match event {
            EditorEvent::GestureRejected { reason } => log::info!("Gesture rejected: {}", reason),
            EditorEvent::ViewChanged { .. } => log::trace!("{:?}", event),
            _ => log::debug!("{:?}", event),
        }
    }
}

/// Collects events into a shared list; handy for hosts that poll events once per frame
#[derive(Debug, Clone, Default)]
pub struct RecordingEventHandler {
    events: Arc<Mutex<Vec<EditorEvent>>>,
}

impl RecordingEventHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns everything recorded so far
    pub fn drain(&self) -> Vec<EditorEvent> {
        std::mem::take(&mut *self.events.lock())
    }
}

impl EventHandler for RecordingEventHandler {
    fn handle_event(&mut self, event: &EditorEvent) {
        self.events.lock().push(event.clone());
    }
}
