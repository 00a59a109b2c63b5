mod bus;
mod events;
mod handlers;

pub use bus::EventBus;
pub use events::GenerationEvent;
pub use handlers::EventHandler;
