#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifies a node in a genome's implicit graph.
///
/// By convention: `1..=input_size` are inputs, `0` and negative integers down
/// to `-(output_size - 1)` are outputs, and positive integers greater than
/// `input_size` are hidden nodes assigned monotonically by
/// [crate::genome::InnovationRegistry].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(transparent)]
pub struct NodeId(pub i64);

impl NodeId {
    pub fn input(index: usize) -> Self {
        NodeId(index as i64 + 1)
    }

    pub fn output(index: usize) -> Self {
        NodeId(-(index as i64))
    }

    pub fn is_input(&self, input_size: usize) -> bool {
        self.0 >= 1 && (self.0 as usize) <= input_size
    }

    pub fn is_output(&self) -> bool {
        self.0 <= 0
    }

    pub fn is_hidden(&self, input_size: usize) -> bool {
        !self.is_input(input_size) && !self.is_output()
    }
}

impl From<i64> for NodeId {
    fn from(value: i64) -> Self {
        NodeId(value)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
