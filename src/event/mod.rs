mod bus;
mod events;
mod handlers;

pub use bus::{EventBus, SubscriptionId};
pub use events::EditorEvent;
pub use handlers::{LoggingEventHandler, RecordingEventHandler};

/// Observer of editor events. Handlers must re-read the editor after an event;
/// events never carry borrowed state.
pub trait EventHandler: Send {
    fn handle_event(&mut self, event: &EditorEvent);
}
