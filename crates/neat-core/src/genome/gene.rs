#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::domain::random_provider;

use super::node::NodeId;
use super::structure_key::StructureKey;

/// A single connection between two nodes. `innovation` is the historical
/// marker: it is stable across every descendant derived from this gene by
/// mutation, copy, or crossover, and is never reassigned once created.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Gene {
    pub weight: f32,
    pub in_node: NodeId,
    pub out_node: NodeId,
    pub innovation: u64,
    pub enabled: bool,
}

impl Gene {
    pub fn new(in_node: NodeId, out_node: NodeId, weight: f32, innovation: u64) -> Self {
        Gene {
            weight,
            in_node,
            out_node,
            innovation,
            enabled: true,
        }
    }

    pub fn key(&self) -> StructureKey {
        StructureKey::new(self.in_node, self.out_node)
    }

    /// Returns a copy with `enabled` forced to the given value; structure and
    /// innovation are untouched.
    pub fn with_enabled(&self, enabled: bool) -> Self {
        Gene { enabled, ..*self }
    }

    /// Returns a copy with the weight clamped to `config`'s bounds; structure
    /// and innovation are untouched.
    pub fn with_weight(&self, weight: f32) -> Self {
        Gene { weight, ..*self }
    }

    /// Perturbs or re-rolls the weight with probability
    /// `gene_weight_probability`; structure, innovation, and enabled state
    /// never change here.
    pub fn mutate(&self, config: &Config) -> Self {
        if !random_provider::bool(config.gene_weight_probability) {
            return *self;
        }

        let weight = if random_provider::bool(config.gene_random_probability) {
            random_provider::range(config.gene_min_weight..config.gene_max_weight)
        } else {
            let shift = random_provider::range(-config.gene_weight_shift..config.gene_weight_shift);
            self.weight + shift
        };

        self.with_weight(weight.clamp(config.gene_min_weight, config.gene_max_weight))
    }
}

impl PartialEq for Gene {
    fn eq(&self, other: &Self) -> bool {
        self.innovation == other.innovation
    }
}

impl PartialOrd for Gene {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Eq for Gene {}

impl Ord for Gene {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.innovation.cmp(&other.innovation)
    }
}
