use std::sync::atomic::{AtomicU64, Ordering};

use crate::config::Config;
use crate::domain::random_provider;

use super::cohort::Cohort;
use super::genome::Genome;
use super::registry::InnovationRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct SpeciesId(pub u64);

impl SpeciesId {
    pub fn new() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        SpeciesId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for SpeciesId {
    fn default() -> Self {
        SpeciesId::new()
    }
}

/// A compatibility cluster of genomes, with a representative used for future
/// compatibility checks, age and best-ever-fitness tracking for stagnation,
/// and fitness-sharing bookkeeping.
#[derive(Debug, Clone)]
pub struct Species {
    id: SpeciesId,
    representative: Genome,
    members: Cohort<Genome>,
    age: usize,
    best_fitness_ever: Option<f32>,
    shared_fitness: f32,
}

impl Species {
    pub fn new(founder: Genome) -> Self {
        Species {
            id: SpeciesId::new(),
            representative: founder.clone(),
            members: Cohort::new(vec![founder]),
            age: 0,
            best_fitness_ever: None,
            shared_fitness: 0.0,
        }
    }

    pub fn id(&self) -> SpeciesId {
        self.id
    }

    pub fn members(&self) -> &[Genome] {
        &self.members
    }

    pub fn members_mut(&mut self) -> &mut [Genome] {
        &mut self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn age(&self) -> usize {
        self.age
    }

    pub fn shared_fitness(&self) -> f32 {
        self.shared_fitness
    }

    pub fn best_fitness_ever(&self) -> Option<f32> {
        self.best_fitness_ever
    }

    pub fn compatible(&self, genome: &Genome, config: &Config) -> bool {
        genome.compare(&self.representative, config) < config.species_threshold
    }

    /// Appends `genome` if it is compatible with this species' representative.
    pub fn add(&mut self, genome: Genome, config: &Config) -> bool {
        if self.compatible(&genome, config) {
            self.members.push(genome);
            true
        } else {
            false
        }
    }

    /// End-of-generation reseed: snapshots a uniformly random member as the
    /// new representative, drops the member list, and ages the species by
    /// one generation. `best_fitness_ever` carries forward untouched.
    pub fn advance(&mut self) {
        if !self.members.is_empty() {
            let index = random_provider::range(0..self.members.len());
            self.representative = self.members[index].clone();
        }
        self.members = Cohort::empty();
        self.age += 1;
    }

    /// Recomputes shared fitness from current members and resets `age` to
    /// zero if the species' best-ever fitness strictly improved.
    pub fn update_fitness(&mut self, config: &Config) {
        let fitnesses: Vec<f32> = self
            .members
            .iter()
            .filter_map(Genome::raw_fitness)
            .collect();

        let best = fitnesses.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let sum: f32 = fitnesses.iter().sum();

        self.shared_fitness = if self.members.len() > config.species_niche_divide_min {
            sum / (self.members.len().max(1) as f32)
        } else {
            sum
        };

        if self.best_fitness_ever.is_none_or(|prev| best > prev) {
            self.best_fitness_ever = Some(best);
            self.age = 0;
        }
    }

    pub fn fertile(&self, config: &Config) -> bool {
        self.age < config.species_age_fertility_limit
    }

    /// Produces exactly `quota` children: champions carried over unmutated,
    /// the rest by asexual reproduction, interspecies crossover, or
    /// in-species crossover according to the configured probabilities.
    pub fn reproduce(
        &mut self,
        quota: usize,
        all_fertile_genomes: &[Genome],
        registry: &mut InnovationRegistry,
        config: &Config,
    ) -> Vec<Genome> {
        if quota == 0 {
            return Vec::new();
        }

        if self.members.len() > quota {
            self.members
                .sort_by(|a, b| {
                    b.raw_fitness()
                        .unwrap_or(f32::NEG_INFINITY)
                        .total_cmp(&a.raw_fitness().unwrap_or(f32::NEG_INFINITY))
                });
            self.members = Cohort::new(self.members.iter().take(quota).cloned().collect());
        }

        let keep_champion = config.species_keep_champion && config.species_champion_limit < self.members.len();
        let breed_count = if keep_champion { quota - 1 } else { quota };

        let n = self.members.len();
        let mut children = Vec::with_capacity(quota);

        for i in 0..breed_count {
            let mother = &self.members[i % n.max(1)];

            let child = if random_provider::range(0.0..1.0) < config.species_asexual_probability {
                mother.breed(mother, registry, config)
            } else if random_provider::range(0.0..1.0) < config.species_interspecies_reproduction_probability
                && !all_fertile_genomes.is_empty()
            {
                let father = random_provider::choose(all_fertile_genomes);
                mother.breed(father, registry, config)
            } else {
                let father = random_provider::choose(&self.members);
                mother.breed(father, registry, config)
            };

            children.push(child);
        }

        if keep_champion {
            let champion = self
                .members
                .iter()
                .max_by(|a, b| {
                    a.raw_fitness()
                        .unwrap_or(f32::NEG_INFINITY)
                        .total_cmp(&b.raw_fitness().unwrap_or(f32::NEG_INFINITY))
                })
                .expect("keep_champion requires at least one member");
            children.push(champion.copy(registry));
        }

        children
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::gene::Gene;
    use crate::genome::node::NodeId;
    use crate::genome::structure_key::StructureKey;

    fn genome(registry: &mut InnovationRegistry, fitness: f32) -> Genome {
        registry.register_depth(NodeId::input(0), 0);
        registry.register_depth(NodeId::output(0), 1_000_000);
        let key = StructureKey::new(NodeId::input(0), NodeId::output(0));
        let innovation = registry.innovation_for(key);
        let gene = Gene::new(NodeId::input(0), NodeId::output(0), 1.0, innovation);
        let mut g = Genome::new(vec![gene], 1, 1, registry).unwrap();
        g.set_raw_fitness(fitness);
        g
    }

    fn config() -> Config {
        Config::builder().build().unwrap()
    }

    #[test]
    fn add_rejects_incompatible_genome() {
        let mut registry = InnovationRegistry::new(1);
        let founder = genome(&mut registry, 1.0);
        let mut species = Species::new(founder);

        let config = Config::builder().species_threshold(0.0).build().unwrap();
        let other = genome(&mut registry, 1.0);
        assert!(!species.add(other, &config));
    }

    #[test]
    fn update_fitness_resets_age_on_improvement() {
        let mut registry = InnovationRegistry::new(1);
        let founder = genome(&mut registry, 1.0);
        let mut species = Species::new(founder);
        let config = config();

        species.advance();
        species.advance();
        assert_eq!(species.age(), 2);

        let improved = genome(&mut registry, 5.0);
        species.add(improved, &config);
        species.update_fitness(&config);

        assert_eq!(species.age(), 0);
        assert_eq!(species.best_fitness_ever(), Some(5.0));
    }

    #[test]
    fn reproduce_yields_exact_quota() {
        let mut registry = InnovationRegistry::new(1);
        let founder = genome(&mut registry, 1.0);
        let mut species = Species::new(founder.clone());
        let config = config();

        let children = species.reproduce(10, &[founder], &mut registry, &config);
        assert_eq!(children.len(), 10);
    }
}
