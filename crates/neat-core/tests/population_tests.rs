use neat_core::genome::{DenseMatmulEvaluator, Gene, Genome, InnovationRegistry, NodeId, Population, StructureKey};
use neat_core::simulation::{AgentState, Simulation};
use neat_core::Config;

/// A trivial environment: one step, score fixed per-agent by the test.
struct FixedScoreSimulation {
    scores: Vec<f32>,
    started: Vec<bool>,
}

impl FixedScoreSimulation {
    fn new(scores: Vec<f32>) -> Self {
        let started = vec![false; scores.len()];
        FixedScoreSimulation { scores, started }
    }
}

impl Simulation for FixedScoreSimulation {
    fn data_size(&self) -> usize {
        1
    }

    fn controls_size(&self) -> usize {
        1
    }

    fn restart(&mut self) {
        self.started.iter_mut().for_each(|s| *s = false);
    }

    fn get_state(&self, agent_id: usize) -> AgentState {
        if self.started[agent_id] {
            AgentState::Finished
        } else {
            AgentState::Running
        }
    }

    fn get_data(&self, _agent_id: usize) -> Vec<f32> {
        vec![1.0]
    }

    fn apply_controls(&mut self, agent_id: usize, _controls: &[f32]) {
        self.started[agent_id] = true;
    }

    fn get_score(&self, agent_id: usize) -> f32 {
        self.scores[agent_id]
    }
}

fn seed_population(registry: &mut InnovationRegistry, config: &Config, size: usize) -> Population {
    registry.register_depth(NodeId::input(0), 0);
    registry.register_depth(NodeId::output(0), 1_000_000);

    let key = StructureKey::new(NodeId::input(0), NodeId::output(0));
    let innovation = registry.innovation_for(key);

    let mut population = Population::new();
    for _ in 0..size {
        let weight = neat_core::domain::random_provider::range(
            config.gene_min_weight..config.gene_max_weight,
        );
        let gene = Gene::new(NodeId::input(0), NodeId::output(0), weight, innovation);
        let genome = Genome::new(vec![gene], 1, 1, registry).unwrap();
        population.assign(genome, config);
    }
    registry.advance();
    population
}

#[test]
fn next_generation_preserves_population_size() {
    let config = Config::builder().population_size(40).build().unwrap();
    let mut registry = InnovationRegistry::new(1);
    let mut population = seed_population(&mut registry, &config, config.population_size);

    let mut simulation = FixedScoreSimulation::new(vec![1.0; config.population_size]);
    let evaluator = DenseMatmulEvaluator;

    for _ in 0..3 {
        population.evaluate_unbatched(&mut simulation, &evaluator, &config);
        population.next_generation(&mut registry, &config);
        registry.advance();
    }

    assert_eq!(population.size(), config.population_size);
}

#[test]
fn stagnant_population_recovers_to_exact_size() {
    let config = Config::builder()
        .population_size(30)
        .population_age_limit(1)
        .species_age_fertility_limit(0)
        .build()
        .unwrap();
    let mut registry = InnovationRegistry::new(1);
    let mut population = seed_population(&mut registry, &config, config.population_size);

    let mut simulation = FixedScoreSimulation::new(vec![1.0; config.population_size]);
    let evaluator = DenseMatmulEvaluator;

    population.evaluate_unbatched(&mut simulation, &evaluator, &config);
    population.next_generation(&mut registry, &config);

    assert_eq!(population.size(), config.population_size);
}

#[test]
fn species_threshold_of_infinity_forces_one_species() {
    let config = Config::builder().species_threshold(f32::INFINITY).build().unwrap();
    let mut registry = InnovationRegistry::new(1);
    let population = seed_population(&mut registry, &config, 20);

    assert_eq!(population.species().len(), 1);
}

#[test]
fn species_threshold_of_zero_forces_distinct_species() {
    let config = Config::builder().species_threshold(0.0).build().unwrap();
    let mut registry = InnovationRegistry::new(1);

    registry.register_depth(NodeId::input(0), 0);
    registry.register_depth(NodeId::output(0), 1_000_000);
    let key = StructureKey::new(NodeId::input(0), NodeId::output(0));
    let base_innovation = registry.innovation_for(key);

    let mut population = Population::new();
    for i in 0..5 {
        let gene = Gene::new(NodeId::input(0), NodeId::output(0), i as f32, base_innovation);
        let genome = Genome::new(vec![gene], 1, 1, &registry).unwrap();
        population.assign(genome, &config);
    }

    assert_eq!(population.species().len(), 5);
}

#[test]
fn innovation_registry_shares_innovation_within_a_generation_and_diverges_after_advance() {
    let mut registry = InnovationRegistry::new(1);
    registry.register_depth(NodeId::input(0), 0);
    registry.register_depth(NodeId::output(0), 1_000_000);

    let key = StructureKey::new(NodeId::input(0), NodeId::output(0));
    let first_genome_innovation = registry.innovation_for(key);
    let second_genome_innovation = registry.innovation_for(key);
    assert_eq!(first_genome_innovation, second_genome_innovation);

    registry.advance();

    let third_genome_innovation = registry.innovation_for(key);
    assert_ne!(first_genome_innovation, third_genome_innovation);
}
