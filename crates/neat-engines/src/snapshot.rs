use neat_core::prelude::{Genome, MetricSet};

/// An immutable snapshot of one completed generation: the best genome
/// observed so far, the metrics recorded while producing it, and how many
/// species existed going into reproduction. Returned by
/// [crate::GenerationDriver::step] so a caller can inspect a generation's
/// outcome without polling the driver's mutable state.
#[derive(Debug, Clone)]
pub struct Generation {
    index: usize,
    best: Option<Genome>,
    species_count: usize,
    metrics: MetricSet,
}

impl Generation {
    pub(crate) fn new(index: usize, best: Option<Genome>, species_count: usize, metrics: MetricSet) -> Self {
        Generation {
            index,
            best,
            species_count,
            metrics,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn best(&self) -> Option<&Genome> {
        self.best.as_ref()
    }

    pub fn species_count(&self) -> usize {
        self.species_count
    }

    pub fn metrics(&self) -> &MetricSet {
        &self.metrics
    }
}
