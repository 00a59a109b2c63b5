//! The generation-driving loop that turns [neat_core::Population] and
//! [neat_core::genome::InnovationRegistry] into a running evolutionary
//! process against a [neat_core::simulation::Simulation].

pub mod events;
mod generation;
mod snapshot;

pub use events::{EventBus, EventHandler, GenerationEvent};
pub use generation::GenerationDriver;
pub use snapshot::Generation;

pub use neat_core::prelude::*;

/// Installs a global `tracing` subscriber, once per process. Safe to call
/// from multiple driver instances or tests; later calls are no-ops.
pub fn init_logging() {
    use std::sync::Once;
    static INIT_LOGGING: Once = Once::new();

    INIT_LOGGING.call_once(|| {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .compact(),
            )
            .init();
    });
}
