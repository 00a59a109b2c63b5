use neat_core::genome::Genome;
use neat_core::metrics::MetricSet;

/// Generation-progress notifications published by [crate::GenerationDriver].
///
/// `Improvement` fires in addition to, not instead of, `EpochComplete` - a
/// handler that only cares about new bests can subscribe narrowly without
/// re-deriving "did the population improve" from the epoch event itself.
#[derive(Debug, Clone)]
pub enum GenerationEvent {
    Start,
    EpochStart { generation: usize },
    EpochComplete { generation: usize, best_fitness: Option<f32>, metrics: MetricSet },
    Improvement { generation: usize, best: Genome },
    Stop { generation: usize, best: Option<Genome>, metrics: MetricSet },
}
