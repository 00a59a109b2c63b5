use tracing::debug;

use crate::config::Config;
use crate::domain::random_provider;
use crate::simulation::{AgentState, Simulation};

use super::genome::Genome;
use super::network::NetworkEvaluator;
use super::registry::InnovationRegistry;
use super::species::Species;

/// Top-level container: the set of species, plus population-wide age and
/// best-ever-fitness tracking used to decide when the whole population is
/// stagnant rather than just one species.
#[derive(Debug, Clone, Default)]
pub struct Population {
    species: Vec<Species>,
    age: usize,
    best_fitness_ever: Option<f32>,
}

impl Population {
    pub fn new() -> Self {
        Population {
            species: Vec::new(),
            age: 0,
            best_fitness_ever: None,
        }
    }

    pub fn species(&self) -> &[Species] {
        &self.species
    }

    pub fn age(&self) -> usize {
        self.age
    }

    pub fn best_fitness_ever(&self) -> Option<f32> {
        self.best_fitness_ever
    }

    pub fn size(&self) -> usize {
        self.species.iter().map(Species::len).sum()
    }

    /// Scans species in order, adding `genome` to the first one it is
    /// compatible with; if none match, founds a new species.
    pub fn assign(&mut self, genome: Genome, config: &Config) {
        for species in &mut self.species {
            if species.add(genome.clone(), config) {
                return;
            }
        }
        self.species.push(Species::new(genome));
    }

    /// Drops species that received no members this generation.
    pub fn clear_empty_species(&mut self) {
        self.species.retain(|s| !s.is_empty());
    }

    /// Every genome currently held by any species, flattened in species
    /// order. Used for interspecies reproduction candidates and for
    /// locating the population's current best genome.
    pub fn all_genomes(&self) -> Vec<Genome> {
        self.species.iter().flat_map(Species::members).cloned().collect()
    }

    /// Runs each genome against `simulation` one at a time, then updates
    /// each species' shared fitness and the population's best-ever tracker.
    pub fn evaluate_unbatched(
        &mut self,
        simulation: &mut dyn Simulation,
        evaluator: &dyn NetworkEvaluator,
        config: &Config,
    ) {
        for species in &mut self.species {
            for (offset, genome) in species.members_mut().iter_mut().enumerate() {
                simulation.restart();
                genome.run(simulation, offset, evaluator);
            }
            species.update_fitness(config);
        }
        self.update_best();
    }

    /// Runs every genome through `simulation` in windows of at most
    /// `batch_size`, padding shorter windows with zero-valued controls so
    /// every agent in a window takes the same number of steps.
    pub fn evaluate_batched(
        &mut self,
        simulation: &mut dyn Simulation,
        evaluator: &dyn NetworkEvaluator,
        batch_size: usize,
        config: &Config,
    ) {
        let species_sizes: Vec<usize> = self.species.iter().map(Species::len).collect();
        let total: usize = species_sizes.iter().sum();
        let controls_size = simulation.controls_size();

        let mut scores = vec![0.0_f32; total];
        let mut window_start = 0;
        while window_start < total {
            let window_end = (window_start + batch_size).min(total);
            let agent_ids: Vec<usize> = (window_start..window_end).collect();

            simulation.restart();
            loop {
                let states = simulation.get_state_batch(&agent_ids);
                if states.iter().all(|s| *s == AgentState::Finished) {
                    break;
                }

                let phenotypes: Vec<_> = agent_ids
                    .iter()
                    .map(|&id| self.phenotype_for_agent(&species_sizes, id))
                    .collect();
                let data = simulation.get_data_batch(&agent_ids);

                let controls: Vec<Vec<f32>> = states
                    .iter()
                    .zip(&phenotypes)
                    .zip(&data)
                    .map(|((state, phenotype), inputs)| {
                        if *state == AgentState::Finished {
                            vec![0.0; controls_size]
                        } else {
                            evaluator.evaluate(phenotype, inputs, controls_size)
                        }
                    })
                    .collect();

                simulation.apply_controls_batch(&agent_ids, &controls);
            }

            let window_scores = simulation.get_score_batch(&agent_ids);
            for (id, score) in agent_ids.iter().zip(window_scores) {
                scores[*id] = score;
            }

            window_start = window_end;
        }

        let mut cursor = 0;
        for species in &mut self.species {
            for genome in species.members_mut() {
                genome.set_raw_fitness(scores[cursor]);
                cursor += 1;
            }
            species.update_fitness(config);
        }
        self.update_best();
    }

    fn phenotype_for_agent<'a>(&'a self, species_sizes: &[usize], agent_id: usize) -> &'a super::network::Phenotype {
        let mut offset = agent_id;
        for (species, &size) in self.species.iter().zip(species_sizes) {
            if offset < size {
                return species.members()[offset].phenotype();
            }
            offset -= size;
        }
        panic!("agent_id {agent_id} out of range for current population");
    }

    fn update_best(&mut self) {
        let best = self
            .species
            .iter()
            .filter_map(Species::best_fitness_ever)
            .fold(f32::NEG_INFINITY, f32::max);

        if best.is_finite() && self.best_fitness_ever.is_none_or(|prev| best > prev) {
            self.best_fitness_ever = Some(best);
            self.age = 0;
        } else {
            self.age += 1;
        }
    }

    /// Advances to the next generation: allocates reproductive budget
    /// proportional to each fertile species' shared fitness, reproduces, and
    /// reassigns every child into the (now cleared, reseeded) species list.
    /// Falls back to [Population::stagnant_recovery] once the population's
    /// own age exceeds `population_age_limit`.
    pub fn next_generation(&mut self, registry: &mut InnovationRegistry, config: &Config) {
        if self.age > config.population_age_limit {
            self.stagnant_recovery(registry, config);
            return;
        }

        let fertile_indices: Vec<usize> = self
            .species
            .iter()
            .enumerate()
            .filter(|(_, s)| s.fertile(config))
            .map(|(i, _)| i)
            .collect();

        if fertile_indices.is_empty() {
            debug!("no fertile species remain; falling back to stagnant recovery");
            self.stagnant_recovery(registry, config);
            return;
        }

        let all_fertile_genomes: Vec<Genome> = fertile_indices
            .iter()
            .flat_map(|&i| self.species[i].members())
            .cloned()
            .collect();

        let shared: Vec<f32> = fertile_indices
            .iter()
            .map(|&i| self.species[i].shared_fitness())
            .collect();
        let total: f32 = shared.iter().sum();

        let quotas = if total > 0.0 {
            let mut raw: Vec<f32> = shared
                .iter()
                .map(|f| f * config.population_size as f32 / total)
                .collect();
            divide_whole(config.population_size, &mut raw)
        } else {
            let share = config.population_size / fertile_indices.len();
            let mut quotas = vec![share; fertile_indices.len()];
            let remainder = config.population_size - share * fertile_indices.len();
            for quota in quotas.iter_mut().take(remainder) {
                *quota += 1;
            }
            quotas
        };

        let mut children: Vec<Genome> = Vec::with_capacity(config.population_size);
        for (&species_index, &quota) in fertile_indices.iter().zip(&quotas) {
            let produced =
                self.species[species_index].reproduce(quota, &all_fertile_genomes, registry, config);
            children.extend(produced);
        }

        // Infertile species are culled by stagnation here; only species that
        // earned a reproductive budget this generation carry forward.
        let mut next_species: Vec<Species> = fertile_indices
            .into_iter()
            .map(|i| self.species[i].clone())
            .collect();
        for species in &mut next_species {
            species.advance();
        }
        self.species = next_species;

        for child in children {
            self.assign(child, config);
        }
        self.clear_empty_species();
    }

    /// Combines the two least-fit fertile species' members into one pool,
    /// sorted by raw fitness, and breeds a fresh population_size of
    /// children from it - the documented recovery path when the whole
    /// population has gone stagnant.
    pub fn stagnant_recovery(&mut self, registry: &mut InnovationRegistry, config: &Config) {
        self.species.sort_by(|a, b| a.shared_fitness().total_cmp(&b.shared_fitness()));

        let mut combined: Vec<Genome> = self
            .species
            .iter()
            .take(2)
            .flat_map(Species::members)
            .cloned()
            .collect();
        combined.sort_by(|a, b| {
            a.raw_fitness()
                .unwrap_or(f32::NEG_INFINITY)
                .total_cmp(&b.raw_fitness().unwrap_or(f32::NEG_INFINITY))
        });

        if combined.is_empty() {
            return;
        }

        let mut children = Vec::with_capacity(config.population_size);
        let n = combined.len();
        for i in 0..config.population_size {
            let father = &combined[i % n];
            let mother = random_provider::choose(&combined);
            children.push(father.breed(mother, registry, config));
        }

        // The whole population is rebuilt from the combined pool; every
        // prior species, not just the stagnant ones, is discarded.
        self.species.clear();

        for child in children {
            self.assign(child, config);
        }
        self.clear_empty_species();
    }
}

/// Recursive apportionment: repeatedly peels off the integer (or, below
/// 1.0, unit) part of the largest remaining fraction until `whole` is fully
/// distributed. Unlike a largest-remainder pass, this can hand a single
/// fraction more than one whole unit per step, which is what lets a
/// dominant species claim most of the population in one shot.
fn divide_whole(whole: usize, fractions: &mut Vec<f32>) -> Vec<usize> {
    if fractions.is_empty() {
        return Vec::new();
    }

    let (index, &top) = fractions
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .expect("fractions is non-empty");

    let chunk = if top >= 1.0 {
        let chunk = top as usize;
        fractions[index] -= chunk as f32;
        chunk
    } else {
        fractions[index] = 0.0;
        1
    };

    let remaining = whole.saturating_sub(chunk);
    let mut result = if remaining > 0 {
        divide_whole(remaining, fractions)
    } else {
        vec![0; fractions.len()]
    };
    result[index] += chunk;
    result
}
