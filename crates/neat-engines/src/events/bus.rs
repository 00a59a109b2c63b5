use std::sync::{Arc, Mutex};

use super::events::GenerationEvent;
use super::handlers::EventHandler;

type Subscriber = Arc<Mutex<dyn EventHandler>>;

/// Synchronous fan-out of [GenerationEvent]s to every subscribed handler.
/// The core is single-threaded (see [crate::GenerationDriver::step]), so
/// publishing simply calls each handler in subscription order - no queue,
/// no executor.
#[derive(Clone, Default)]
pub struct EventBus {
    handlers: Vec<Subscriber>,
}

impl EventBus {
    pub fn new() -> Self {
        EventBus { handlers: Vec::new() }
    }

    pub fn subscribe(&mut self, handler: impl EventHandler + 'static) {
        self.handlers.push(Arc::new(Mutex::new(handler)));
    }

    pub fn publish(&self, event: GenerationEvent) {
        for handler in &self.handlers {
            handler.lock().unwrap().handle(&event);
        }
    }
}
