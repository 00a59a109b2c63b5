use std::time::Instant;

use tracing::{debug, info};

use neat_core::domain::saturation;
use neat_core::prelude::*;

use crate::events::{EventBus, GenerationEvent};
use crate::snapshot::Generation;

/// Drives a [Population] through repeated generations against a
/// [Simulation], owning the single [InnovationRegistry] shared by every
/// mutation performed in a generation.
///
/// Construct with [GenerationDriver::initialize]; advance one generation at
/// a time with [GenerationDriver::step], or run several with
/// [GenerationDriver::run]. Progress is published on an internal
/// [EventBus] that callers subscribe to via [GenerationDriver::subscribe].
pub struct GenerationDriver {
    config: Config,
    registry: InnovationRegistry,
    population: Population,
    evaluator: Box<dyn NetworkEvaluator>,
    batch_size: Option<usize>,
    bus: EventBus,
    generation: usize,
    best: Option<Genome>,
}

impl GenerationDriver {
    /// Builds the starting population: a fully-connected input-to-output
    /// template genome, repeated `config.population_size` times with each
    /// copy's weights independently re-randomized, then assigned to
    /// species. Uses a dense matmul network evaluator and unbatched
    /// evaluation; see [GenerationDriver::initialize_with] to override
    /// either.
    pub fn initialize(config: Config, simulation: &mut dyn Simulation) -> Self {
        Self::initialize_with(config, simulation, Box::new(DenseMatmulEvaluator), None)
    }

    pub fn initialize_with(
        config: Config,
        simulation: &mut dyn Simulation,
        evaluator: Box<dyn NetworkEvaluator>,
        batch_size: Option<usize>,
    ) -> Self {
        let input_size = simulation.data_size();
        let output_size = simulation.controls_size();

        let mut registry = InnovationRegistry::new(input_size);
        for i in 0..input_size {
            registry.register_depth(NodeId::input(i), config.app_start_node_depth);
        }
        for o in 0..output_size {
            registry.register_depth(NodeId::output(o), config.app_end_node_depth);
        }

        let template: Vec<Gene> = (0..input_size)
            .flat_map(|i| (0..output_size).map(move |o| (i, o)))
            .map(|(i, o)| {
                let in_node = NodeId::input(i);
                let out_node = NodeId::output(o);
                let innovation = registry.innovation_for(StructureKey::new(in_node, out_node));
                Gene::new(in_node, out_node, 0.0, innovation)
            })
            .collect();

        let mut population = Population::new();
        for _ in 0..config.population_size {
            let genes: Vec<Gene> = template
                .iter()
                .map(|gene| {
                    gene.with_weight(random_provider::range(
                        config.gene_min_weight..config.gene_max_weight,
                    ))
                })
                .collect();
            let genome = Genome::new(genes, input_size, output_size, &registry)
                .expect("a fully-connected input-to-output template is never empty");
            population.assign(genome, &config);
        }
        population.clear_empty_species();
        registry.advance();

        debug!(
            species = population.species().len(),
            population = population.size(),
            "initialized population"
        );

        GenerationDriver {
            config,
            registry,
            population,
            evaluator,
            batch_size,
            bus: EventBus::new(),
            generation: 0,
            best: None,
        }
    }

    pub fn subscribe(&mut self, handler: impl crate::events::EventHandler + 'static) {
        self.bus.subscribe(handler);
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn best(&self) -> Option<&Genome> {
        self.best.as_ref()
    }

    /// Runs one full generation: evaluate the current population, record any
    /// new best genome, reproduce into the next population, and clear the
    /// registry's within-generation cache. Returns a [Generation] snapshot
    /// of what happened, including per-step timing and counter metrics.
    pub fn step(&mut self, simulation: &mut dyn Simulation) -> Generation {
        if self.generation == 0 {
            self.bus.publish(GenerationEvent::Start);
        }
        self.bus.publish(GenerationEvent::EpochStart {
            generation: self.generation,
        });

        let mut metrics = MetricSet::new();
        saturation::take();

        let evaluation_start = Instant::now();
        match self.batch_size {
            Some(size) => {
                self.population
                    .evaluate_batched(simulation, self.evaluator.as_ref(), size, &self.config)
            }
            None => self
                .population
                .evaluate_unbatched(simulation, self.evaluator.as_ref(), &self.config),
        }
        metrics.record_time(metric_names::EVALUATION_TIME, evaluation_start.elapsed());
        metrics.record(metric_names::SPECIES_COUNT, self.population.species().len() as f32);

        let improved = self.record_best();
        if improved {
            self.bus.publish(GenerationEvent::Improvement {
                generation: self.generation,
                best: self.best.clone().expect("just recorded"),
            });
        }

        let reproduction_start = Instant::now();
        self.population.next_generation(&mut self.registry, &self.config);
        self.registry.advance();
        metrics.record_time(metric_names::REPRODUCTION_TIME, reproduction_start.elapsed());
        metrics.record(metric_names::SATURATED_TOPOLOGY, saturation::take() as f32);

        debug!(
            generation = self.generation,
            species = metrics.get(metric_names::SPECIES_COUNT).map(Metric::last_value).unwrap_or(0.0),
            saturated_topology = metrics
                .get(metric_names::SATURATED_TOPOLOGY)
                .map(Metric::last_value)
                .unwrap_or(0.0),
            "generation complete"
        );

        self.bus.publish(GenerationEvent::EpochComplete {
            generation: self.generation,
            best_fitness: self.best.as_ref().and_then(Genome::raw_fitness),
            metrics: metrics.clone(),
        });

        let snapshot = Generation::new(
            self.generation,
            self.best.clone(),
            self.population.species().len(),
            metrics,
        );
        self.generation += 1;
        snapshot
    }

    /// Runs `n` generations in sequence, returning the best genome observed
    /// across all of them.
    pub fn run(&mut self, simulation: &mut dyn Simulation, n: usize) -> Option<Genome> {
        let mut last_metrics = MetricSet::new();
        for _ in 0..n {
            last_metrics = self.step(simulation).metrics().clone();
        }

        self.bus.publish(GenerationEvent::Stop {
            generation: self.generation,
            best: self.best.clone(),
            metrics: last_metrics,
        });

        info!(generation = self.generation, "run complete");
        self.best.clone()
    }

    /// Scans the current population for a genome whose fitness strictly
    /// improves on the best seen so far. Returns whether it found one.
    fn record_best(&mut self) -> bool {
        let candidate = self
            .population
            .all_genomes()
            .into_iter()
            .max_by(|a, b| {
                a.raw_fitness()
                    .unwrap_or(f32::MIN)
                    .total_cmp(&b.raw_fitness().unwrap_or(f32::MIN))
            });

        match (candidate, &self.best) {
            (Some(candidate), Some(current))
                if candidate.raw_fitness().unwrap_or(f32::MIN)
                    > current.raw_fitness().unwrap_or(f32::MIN) =>
            {
                self.best = Some(candidate);
                true
            }
            (Some(candidate), None) => {
                self.best = Some(candidate);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ConstantSimulation {
        inputs: usize,
        outputs: usize,
        done: bool,
        score: f32,
    }

    impl ConstantSimulation {
        fn new(inputs: usize, outputs: usize) -> Self {
            ConstantSimulation {
                inputs,
                outputs,
                done: false,
                score: 1.0,
            }
        }
    }

    impl Simulation for ConstantSimulation {
        fn data_size(&self) -> usize {
            self.inputs
        }

        fn controls_size(&self) -> usize {
            self.outputs
        }

        fn restart(&mut self) {
            self.done = false;
        }

        fn get_state(&self, _agent_id: usize) -> AgentState {
            if self.done {
                AgentState::Finished
            } else {
                AgentState::Running
            }
        }

        fn get_data(&self, _agent_id: usize) -> Vec<f32> {
            vec![0.5; self.inputs]
        }

        fn apply_controls(&mut self, _agent_id: usize, _controls: &[f32]) {
            self.done = true;
        }

        fn get_score(&self, _agent_id: usize) -> f32 {
            self.score
        }
    }

    fn small_config() -> Config {
        Config::builder().population_size(8).build().unwrap()
    }

    #[test]
    fn initialize_builds_full_population() {
        let mut simulation = ConstantSimulation::new(2, 1);
        let driver = GenerationDriver::initialize(small_config(), &mut simulation);

        assert_eq!(driver.population().size(), 8);
        assert_eq!(driver.generation(), 0);
        assert!(driver.best().is_none());
    }

    #[test]
    fn step_preserves_population_size_and_records_a_best() {
        let mut simulation = ConstantSimulation::new(2, 1);
        let mut driver = GenerationDriver::initialize(small_config(), &mut simulation);

        driver.step(&mut simulation);

        assert_eq!(driver.population().size(), 8);
        assert_eq!(driver.generation(), 1);
        assert!(driver.best().is_some());
    }

    #[test]
    fn run_advances_the_requested_number_of_generations() {
        let mut simulation = ConstantSimulation::new(2, 1);
        let mut driver = GenerationDriver::initialize(small_config(), &mut simulation);

        let best = driver.run(&mut simulation, 3);

        assert_eq!(driver.generation(), 3);
        assert!(best.is_some());
        assert_eq!(best.unwrap().raw_fitness(), Some(1.0));
    }
}
