use std::cell::{Cell, RefCell};

use crate::event::{EditorEvent, EventHandler};

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Synchronous fan-out of [`EditorEvent`]s.
///
/// Handlers run in subscription order, on the caller's thread, before `emit`
/// returns. The editor is single-threaded, so interior mutability lets the
/// engine emit through `&self` while holding other borrows of itself.
pub struct EventBus {
    handlers: RefCell<Vec<(SubscriptionId, Box<dyn EventHandler>)>>,
    next_id: Cell<u64>,
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        // Handlers are not clonable; a cloned bus starts without subscribers
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &self.handler_count())
            .finish()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            handlers: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    pub fn subscribe(&self, handler: Box<dyn EventHandler>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.handlers.borrow_mut().push((id, handler));
        id
    }

    /// Removes a handler. Returns false if `id` was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        let before = handlers.len();
        handlers.retain(|(handler_id, _)| *handler_id != id);
        handlers.len() != before
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.borrow().len()
    }

    pub fn emit(&self, event: EditorEvent) {
        log::trace!("emit {:?}", event);
        for (_, handler) in self.handlers.borrow_mut().iter_mut() {
            handler.handle_event(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::RecordingEventHandler;

    #[test]
    fn unsubscribed_handler_stops_receiving() {
        let bus = EventBus::new();
        let recorder = RecordingEventHandler::new();
        let id = bus.subscribe(Box::new(recorder.clone()));

        bus.emit(EditorEvent::UndoApplied);
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.emit(EditorEvent::RedoApplied);

        assert_eq!(recorder.drain(), vec![EditorEvent::UndoApplied]);
        assert_eq!(bus.handler_count(), 0);
    }

    #[test]
    fn clone_starts_empty() {
        let bus = EventBus::new();
        bus.subscribe(Box::new(RecordingEventHandler::new()));
        assert_eq!(bus.clone().handler_count(), 0);
    }
}
