use neat_error::{NeatError, Result, neat_err};

use crate::config::Config;
use crate::domain::{random_provider, saturation};
use crate::simulation::{AgentState, Simulation};
use crate::valid::Valid;

use super::gene::Gene;
use super::network::{NetworkEvaluator, Phenotype};
use super::node::NodeId;
use super::registry::InnovationRegistry;
use super::structure_key::StructureKey;

/// An ordered gene list plus its derived phenotype and the fitness it earned
/// in the current generation.
///
/// Every operator here returns a freshly constructed [Genome]; none mutate
/// `self`. The one exception is [Genome::run], which records the evaluated
/// fitness in place - evaluation is the only point at which a genome's state
/// legitimately changes after construction.
#[derive(Debug, Clone)]
pub struct Genome {
    genes: Vec<Gene>,
    input_size: usize,
    output_size: usize,
    raw_fitness: Option<f32>,
    phenotype: Phenotype,
}

impl Genome {
    /// Builds a genome from an already innovation-sorted, non-empty gene
    /// list. A genome with zero genes is forbidden as a post-initialization
    /// invariant; this returns `NeatError::InvalidParameter` rather than
    /// constructing one.
    pub fn new(
        genes: Vec<Gene>,
        input_size: usize,
        output_size: usize,
        registry: &InnovationRegistry,
    ) -> Result<Self> {
        if genes.is_empty() {
            return Err(neat_err!(InvalidParameter: "a genome must have at least one gene"));
        }
        let phenotype = Phenotype::build(&genes, input_size, output_size, registry);
        Ok(Genome {
            genes,
            input_size,
            output_size,
            raw_fitness: None,
            phenotype,
        })
    }

    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }

    pub fn output_size(&self) -> usize {
        self.output_size
    }

    pub fn phenotype(&self) -> &Phenotype {
        &self.phenotype
    }

    /// Valid only after evaluation in the current generation.
    pub fn raw_fitness(&self) -> Option<f32> {
        self.raw_fitness
    }

    fn rebuild(genes: Vec<Gene>, input_size: usize, output_size: usize, registry: &InnovationRegistry) -> Self {
        let phenotype = Phenotype::build(&genes, input_size, output_size, registry);
        Genome {
            genes,
            input_size,
            output_size,
            raw_fitness: None,
            phenotype,
        }
    }

    /// Deep copy with all fields preserved and the phenotype rebuilt.
    pub fn copy(&self, registry: &InnovationRegistry) -> Self {
        let mut copy = Self::rebuild(self.genes.clone(), self.input_size, self.output_size, registry);
        copy.raw_fitness = self.raw_fitness;
        copy
    }

    /// Splits a uniformly-chosen existing gene into two, routed through a
    /// new hidden node, preserving the original gene's input-to-output
    /// behavior near the unity mapping at creation time.
    pub fn add_node(&self, registry: &mut InnovationRegistry) -> Self {
        let index = random_provider::range(0..self.genes.len());
        let target = self.genes[index];
        let new_id = registry.hidden_node_for(&target);

        let in_innovation = registry.innovation_for(StructureKey::new(target.in_node, new_id));
        let in_gene = Gene::new(target.in_node, new_id, 1.0, in_innovation);

        let out_innovation = registry.innovation_for(StructureKey::new(new_id, target.out_node));
        let out_gene = Gene::new(new_id, target.out_node, target.weight, out_innovation);

        let mut genes: Vec<Gene> = self
            .genes
            .iter()
            .enumerate()
            .map(|(i, gene)| if i == index { gene.with_enabled(false) } else { *gene })
            .collect();
        genes.push(in_gene);
        genes.push(out_gene);
        genes.sort();

        Self::rebuild(genes, self.input_size, self.output_size, registry)
    }

    /// Adds a new edge between an existing input-or-hidden node and a
    /// deeper hidden-or-output node not already connected. Returns a copy of
    /// `self` unchanged if the topology is saturated - an explicit, silent
    /// "no legal edge left" fallback rather than a propagated error.
    pub fn add_connection(&self, registry: &mut InnovationRegistry, config: &Config) -> Self {
        let hidden_ids = &self.phenotype.hidden_ids;

        let mut candidate_starts: Vec<NodeId> = (0..self.input_size).map(NodeId::input).collect();
        candidate_starts.extend(hidden_ids.iter().copied());

        let connected: std::collections::HashSet<StructureKey> =
            self.genes.iter().map(Gene::key).collect();

        for start_index in random_provider::shuffled_indices(candidate_starts.len()) {
            let start = candidate_starts[start_index];
            let start_depth = registry.depth_of(start);

            let mut ends: Vec<NodeId> = hidden_ids.iter().copied().collect();
            ends.extend((0..self.output_size).map(NodeId::output));
            ends.retain(|&end| {
                end != start
                    && registry.depth_of(end) > start_depth
                    && !connected.contains(&StructureKey::new(start, end))
            });

            if ends.is_empty() {
                continue;
            }

            let end = *random_provider::choose(&ends);
            let weight = random_provider::range(config.gene_min_weight..config.gene_max_weight);
            let innovation = registry.innovation_for(StructureKey::new(start, end));

            let mut genes = self.genes.clone();
            genes.push(Gene::new(start, end, weight, innovation));
            genes.sort();

            return Self::rebuild(genes, self.input_size, self.output_size, registry);
        }

        saturation::record();
        self.copy(registry)
    }

    /// Genetic distance to `other`: the documented contract sums
    /// `|self.innovation - other.innovation|` for matching genes (always
    /// zero, by construction, since a match means equal innovation numbers)
    /// plus disjoint/excess terms, normalized once the longer parent's gene
    /// count reaches `genome_min_divide`.
    pub fn compare(&self, other: &Genome, config: &Config) -> f32 {
        let mut weight_term = 0.0_f32;
        let mut disjoint = 0u32;
        let mut excess = 0u32;

        let (mut i, mut j) = (0, 0);
        while i < self.genes.len() && j < other.genes.len() {
            let a = self.genes[i];
            let b = other.genes[j];
            match a.innovation.cmp(&b.innovation) {
                std::cmp::Ordering::Equal => {
                    weight_term += (a.innovation as i64 - b.innovation as i64).unsigned_abs() as f32
                        * config.genome_weight_coefficient;
                    i += 1;
                    j += 1;
                }
                std::cmp::Ordering::Less => {
                    disjoint += 1;
                    i += 1;
                }
                std::cmp::Ordering::Greater => {
                    disjoint += 1;
                    j += 1;
                }
            }
        }
        excess += (self.genes.len() - i) as u32;
        excess += (other.genes.len() - j) as u32;

        let longer = self.genes.len().max(other.genes.len());
        let divisor = if longer >= config.genome_min_divide {
            longer.max(1) as f32
        } else {
            1.0
        };

        weight_term
            + config.genome_disjoint_coefficient * disjoint as f32 / divisor
            + config.genome_excess_coefficient * excess as f32 / divisor
    }

    /// Produces a child by aligning both parents' gene lists on innovation
    /// number, then applying mutation and, probabilistically, one
    /// structural mutation.
    pub fn breed(&self, other: &Genome, registry: &mut InnovationRegistry, config: &Config) -> Self {
        let mut child_genes: Vec<Gene> = Vec::new();

        let self_fitness = self.raw_fitness.unwrap_or(f32::NEG_INFINITY);
        let other_fitness = other.raw_fitness.unwrap_or(f32::NEG_INFINITY);

        let (mut i, mut j) = (0, 0);
        while i < self.genes.len() && j < other.genes.len() {
            let a = self.genes[i];
            let b = other.genes[j];
            match a.innovation.cmp(&b.innovation) {
                std::cmp::Ordering::Equal => {
                    let weight = if random_provider::bool(0.5) { a.weight } else { b.weight };
                    let reroll = random_provider::range(0.0..1.0) >= config.genome_disable_probability;
                    let enabled = a.enabled || b.enabled || reroll;
                    child_genes.push(Gene {
                        weight,
                        enabled,
                        ..a
                    });
                    i += 1;
                    j += 1;
                }
                std::cmp::Ordering::Less => {
                    if self_fitness >= other_fitness {
                        let reroll = random_provider::range(0.0..1.0) >= config.genome_disable_probability;
                        child_genes.push(a.with_enabled(a.enabled || reroll));
                    }
                    i += 1;
                }
                std::cmp::Ordering::Greater => {
                    if other_fitness >= self_fitness {
                        let reroll = random_provider::range(0.0..1.0) >= config.genome_disable_probability;
                        child_genes.push(b.with_enabled(b.enabled || reroll));
                    }
                    j += 1;
                }
            }
        }

        if self_fitness >= other_fitness {
            for gene in &self.genes[i..] {
                let reroll = random_provider::range(0.0..1.0) >= config.genome_disable_probability;
                child_genes.push(gene.with_enabled(gene.enabled || reroll));
            }
        }
        if other_fitness >= self_fitness {
            for gene in &other.genes[j..] {
                let reroll = random_provider::range(0.0..1.0) >= config.genome_disable_probability;
                child_genes.push(gene.with_enabled(gene.enabled || reroll));
            }
        }

        child_genes.sort();
        child_genes = child_genes.iter().map(|gene| gene.mutate(config)).collect();

        let mut child = Self::rebuild(child_genes, self.input_size, self.output_size, registry);

        if random_provider::bool(config.genome_connection_probability) {
            child = child.add_connection(registry, config);
        }
        if random_provider::bool(config.genome_node_probability) {
            child = child.add_node(registry);
        }

        child
    }

    /// Drives `simulation` for `agent_id` until it reports
    /// [AgentState::Finished], feeding its own network output back in each
    /// step, then stores the returned scalar as this genome's fitness.
    pub fn run(&mut self, simulation: &mut dyn Simulation, agent_id: usize, evaluator: &dyn NetworkEvaluator) {
        while simulation.get_state(agent_id) != AgentState::Finished {
            let inputs = simulation.get_data(agent_id);
            let outputs = evaluator.evaluate(&self.phenotype, &inputs, self.output_size);
            simulation.apply_controls(agent_id, &outputs);
        }
        self.raw_fitness = Some(simulation.get_score(agent_id));
    }

    /// Records a fitness value directly - used by the batched evaluation
    /// path in [crate::genome::Population::evaluate], which drives the
    /// simulation across a whole window of agents at once rather than one
    /// genome at a time.
    pub fn set_raw_fitness(&mut self, fitness: f32) {
        self.raw_fitness = Some(fitness);
    }
}

impl Valid for Genome {
    fn is_valid(&self) -> bool {
        !self.genes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::registry::InnovationRegistry;

    fn config() -> Config {
        Config::builder().build().unwrap()
    }

    fn starter(registry: &mut InnovationRegistry, input_size: usize, output_size: usize) -> Genome {
        for i in 0..input_size {
            registry.register_depth(NodeId::input(i), 0);
        }
        for i in 0..output_size {
            registry.register_depth(NodeId::output(i), 1_000_000);
        }

        let mut genes = Vec::new();
        for i in 0..input_size {
            for o in 0..output_size {
                let key = StructureKey::new(NodeId::input(i), NodeId::output(o));
                let innovation = registry.innovation_for(key);
                genes.push(Gene::new(NodeId::input(i), NodeId::output(o), 1.0, innovation));
            }
        }
        genes.sort();
        Genome::new(genes, input_size, output_size, registry).unwrap()
    }

    #[test]
    fn add_node_disables_parent_and_preserves_innovation_order() {
        let mut registry = InnovationRegistry::new(2);
        let genome = starter(&mut registry, 2, 1);

        let mutated = genome.add_node(&mut registry);

        assert_eq!(mutated.genes().len(), genome.genes().len() + 2);
        let innovations: Vec<u64> = mutated.genes().iter().map(|g| g.innovation).collect();
        let mut sorted = innovations.clone();
        sorted.sort();
        assert_eq!(innovations, sorted);

        let disabled_count = mutated.genes().iter().filter(|g| !g.enabled).count();
        assert_eq!(disabled_count, 1);
    }

    #[test]
    fn add_connection_on_saturated_topology_returns_unchanged() {
        let mut registry = InnovationRegistry::new(1);
        let genome = starter(&mut registry, 1, 1);
        let config = config();

        let result = genome.add_connection(&mut registry, &config);
        assert_eq!(result.genes().len(), genome.genes().len());
    }

    #[test]
    fn compare_with_self_is_zero_distance() {
        let mut registry = InnovationRegistry::new(2);
        let genome = starter(&mut registry, 2, 1);
        let config = config();

        assert_eq!(genome.compare(&genome, &config), 0.0);
    }

    #[test]
    fn breed_produces_genes_in_innovation_order() {
        let mut registry = InnovationRegistry::new(2);
        let mut mother = starter(&mut registry, 2, 1);
        let mut father = starter(&mut registry, 2, 1);
        mother.set_raw_fitness(1.0);
        father.set_raw_fitness(1.0);

        let config = config();
        let child = mother.breed(&father, &mut registry, &config);

        let innovations: Vec<u64> = child.genes().iter().map(|g| g.innovation).collect();
        let mut sorted = innovations.clone();
        sorted.sort();
        assert_eq!(innovations, sorted);
        let _ = &mut father;
    }

    #[test]
    fn new_genome_rejects_empty_gene_list() {
        let registry = InnovationRegistry::new(1);
        let result = Genome::new(Vec::new(), 1, 1, &registry);
        assert!(result.is_err());
    }
}
