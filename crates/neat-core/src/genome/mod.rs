mod cohort;
mod gene;
mod genome;
mod network;
mod node;
mod population;
mod registry;
mod species;
mod structure_key;

pub use cohort::Cohort;
pub use gene::Gene;
pub use genome::Genome;
pub use network::{DenseMatmulEvaluator, NetworkEvaluator, Phenotype, evaluate, sigmoid_neat};
pub use node::NodeId;
pub use population::Population;
pub use registry::InnovationRegistry;
pub use species::{Species, SpeciesId};
pub use structure_key::StructureKey;
