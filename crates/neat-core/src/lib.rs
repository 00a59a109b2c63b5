//! Data model and genetic operators for the NEAT evolutionary engine:
//! genomes, the innovation registry, speciation, and the population
//! container that drives them generation to generation.

pub mod config;
pub mod domain;
pub mod genome;
pub mod metrics;
pub mod simulation;
pub mod valid;

pub use config::{Config, ConfigBuilder};
pub use valid::Valid;

pub mod prelude {
    pub use crate::config::{Config, ConfigBuilder};
    pub use crate::domain::{Tracker, random_provider};
    pub use crate::genome::{
        Cohort, DenseMatmulEvaluator, Gene, Genome, InnovationRegistry, NetworkEvaluator, NodeId,
        Phenotype, Population, Species, SpeciesId, StructureKey,
    };
    pub use crate::metrics::{Metric, MetricSet, Statistic, TimeStatistic, metric_names};
    pub use crate::simulation::{AgentState, Simulation};
    pub use crate::valid::Valid;
}
