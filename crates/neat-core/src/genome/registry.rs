use std::collections::HashMap;

use super::gene::Gene;
use super::node::NodeId;
use super::structure_key::StructureKey;

/// Assigns every structural event - a new connection, a node introduced by
/// splitting a connection - a globally comparable identifier so that distant
/// descendants can recognize homologous genes under crossover.
///
/// `conn_innov` and `node_innov` cache within a single generation: two
/// independent mutations that add the same structure in the same generation
/// are given the same innovation. [InnovationRegistry::advance] clears that
/// cache at the generation boundary while `next_innovation`,
/// `next_hidden_node_id`, and `depth` carry forward forever.
#[derive(Debug, Clone, Default)]
pub struct InnovationRegistry {
    next_innovation: u64,
    next_hidden_node_id: i64,
    conn_innov: HashMap<StructureKey, u64>,
    node_innov: HashMap<u64, NodeId>,
    depth: HashMap<NodeId, i64>,
}

impl InnovationRegistry {
    pub fn new(input_size: usize) -> Self {
        InnovationRegistry {
            next_innovation: 0,
            next_hidden_node_id: input_size as i64 + 1,
            conn_innov: HashMap::new(),
            node_innov: HashMap::new(),
            depth: HashMap::new(),
        }
    }

    /// Registers a node's depth. Used during initialization to seed input
    /// and output depths; hidden-node depths are registered automatically by
    /// [InnovationRegistry::hidden_node_for].
    pub fn register_depth(&mut self, node: NodeId, depth: i64) {
        self.depth.entry(node).or_insert(depth);
    }

    /// Returns the innovation for `key`, assigning a fresh one if this is
    /// the first time this structural event has been seen this generation.
    pub fn innovation_for(&mut self, key: StructureKey) -> u64 {
        if let Some(&innovation) = self.conn_innov.get(&key) {
            return innovation;
        }
        let innovation = self.next_innovation;
        self.conn_innov.insert(key, innovation);
        self.next_innovation += 1;
        innovation
    }

    /// Returns the hidden node id created by splitting `parent_gene`,
    /// assigning a fresh one (and its depth, the floor-average of its
    /// parents' depths) if this split has not already occurred this
    /// generation.
    pub fn hidden_node_for(&mut self, parent_gene: &Gene) -> NodeId {
        if let Some(&node) = self.node_innov.get(&parent_gene.innovation) {
            return node;
        }

        let node = NodeId(self.next_hidden_node_id);
        self.next_hidden_node_id += 1;
        self.node_innov.insert(parent_gene.innovation, node);

        let in_depth = self.depth_of(parent_gene.in_node);
        let out_depth = self.depth_of(parent_gene.out_node);
        self.depth.insert(node, (in_depth + out_depth).div_euclid(2));

        node
    }

    /// Total function over every node referenced in a well-formed genome.
    ///
    /// Panics if `node` was never registered. This indicates a bug in
    /// phenotype construction, never user input.
    pub fn depth_of(&self, node: NodeId) -> i64 {
        *self
            .depth
            .get(&node)
            .unwrap_or_else(|| panic!("node {node} has no registered depth"))
    }

    /// Clears the within-generation caches while preserving the monotonic
    /// counters and the accumulated depth map.
    pub fn advance(&mut self) {
        self.conn_innov.clear();
        self.node_innov.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_key_within_generation_shares_innovation() {
        let mut registry = InnovationRegistry::new(2);
        let key = StructureKey::new(NodeId(1), NodeId(2));

        let first = registry.innovation_for(key);
        let second = registry.innovation_for(key);
        assert_eq!(first, second);
    }

    #[test]
    fn advance_forgets_cache_but_keeps_counters() {
        let mut registry = InnovationRegistry::new(2);
        let key = StructureKey::new(NodeId(1), NodeId(2));

        let first = registry.innovation_for(key);
        registry.advance();
        let second = registry.innovation_for(key);

        assert_ne!(first, second);
    }

    #[test]
    fn hidden_node_depth_is_floor_average_of_parents() {
        let mut registry = InnovationRegistry::new(2);
        registry.register_depth(NodeId(1), 0);
        registry.register_depth(NodeId(0), 10);

        let gene = Gene::new(NodeId(1), NodeId(0), 1.0, 0);
        let hidden = registry.hidden_node_for(&gene);

        assert_eq!(registry.depth_of(hidden), 5);
    }

    #[test]
    #[should_panic]
    fn depth_of_unregistered_node_panics() {
        let registry = InnovationRegistry::new(2);
        registry.depth_of(NodeId(99));
    }
}
