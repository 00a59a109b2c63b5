//! A NEAT (NeuroEvolution of Augmenting Topologies) engine: evolves
//! variable-topology feed-forward neural networks against a user-supplied
//! evaluation environment.
//!
//! This crate is a thin facade over [neat_core] (genome, speciation,
//! evaluation) and [neat_engines] (the generation-driving loop); most users
//! only need `use neat::prelude::*`.

pub use neat_core::*;
pub use neat_engines::{EventBus, EventHandler, Generation, GenerationDriver, GenerationEvent, init_logging};
pub use neat_error::{NeatError, Result, ensure, neat_err};

pub mod prelude {
    pub use neat_core::prelude::*;
    pub use neat_engines::{EventBus, EventHandler, Generation, GenerationDriver, GenerationEvent};
    pub use neat_error::{NeatError, Result};
}
