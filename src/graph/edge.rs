//! Directed, labelled edge in the property graph.

use serde::{Deserialize, Serialize};

use super::NodeId;

/// One reference from `source` to `target`, labelled with the attribute
/// name that held it. Parallel edges and self-loops are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: NodeId,
    pub target: NodeId,
    pub label: String,
}

impl GraphEdge {
    pub fn new(source: NodeId, target: NodeId, label: impl Into<String>) -> Self {
        Self {
            source,
            target,
            label: label.into(),
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}
