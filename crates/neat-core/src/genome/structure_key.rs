#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::node::NodeId;

/// Canonicalizes "this edge between these two nodes, whenever first
/// discovered" so that [crate::genome::InnovationRegistry::innovation_for]
/// can recognize the same structural event across independently-mutated
/// genomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StructureKey {
    pub in_node: NodeId,
    pub out_node: NodeId,
}

impl StructureKey {
    pub fn new(in_node: NodeId, out_node: NodeId) -> Self {
        StructureKey { in_node, out_node }
    }
}
