//! In-memory property graph produced by a conversion run.
//!
//! Nodes and edges are append-only: nothing is mutated or removed once added.
//! Node order is insertion order, which is what exporters write out.
//!
//! ## Invariants
//!
//! - Node identities are unique (`add_node` rejects duplicates).
//! - Both endpoints of every edge exist (`add_edge` rejects dangling ends).

use std::collections::BTreeSet;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use super::{GraphEdge, GraphNode, NodeId};
use crate::{Error, Result};

// ============================================================================
// PropertyGraph
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct PropertyGraph {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    /// node_id → position in `nodes`
    index: HashMap<NodeId, usize>,
    /// node_id → positions in `edges` of its outgoing edges
    adjacency: HashMap<NodeId, Vec<usize>>,
}

impl PropertyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    pub fn add_node(&mut self, node: GraphNode) -> Result<NodeId> {
        let id = node.id;
        if self.index.contains_key(&id) {
            return Err(Error::DuplicateNode(id));
        }
        self.index.insert(id, self.nodes.len());
        self.nodes.push(node);
        Ok(id)
    }

    pub fn add_edge(&mut self, edge: GraphEdge) -> Result<()> {
        for end in [edge.source, edge.target] {
            if !self.index.contains_key(&end) {
                return Err(Error::DanglingEdge {
                    start: edge.source,
                    end: edge.target,
                    label: edge.label,
                });
            }
        }
        self.adjacency
            .entry(edge.source)
            .or_default()
            .push(self.edges.len());
        self.edges.push(edge);
        Ok(())
    }

    // ========================================================================
    // Reads
    // ========================================================================

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn node(&self, id: NodeId) -> Option<&GraphNode> {
        self.index.get(&id).map(|&i| &self.nodes[i])
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Outgoing edges of a node, in emission order.
    pub fn outgoing(&self, id: NodeId) -> impl Iterator<Item = &GraphEdge> + '_ {
        self.adjacency
            .get(&id)
            .into_iter()
            .flatten()
            .map(move |&i| &self.edges[i])
    }

    /// Labels, relationship types and property keys present in the graph.
    pub fn schema(&self) -> GraphSchema {
        let labels: BTreeSet<&str> = self.nodes.iter().map(|n| n.label.as_str()).collect();
        let relationship_types: BTreeSet<&str> =
            self.edges.iter().map(|e| e.label.as_str()).collect();
        let property_keys: BTreeSet<&str> = self
            .nodes
            .iter()
            .flat_map(|n| n.attributes.keys().map(String::as_str))
            .collect();

        GraphSchema {
            labels: labels.into_iter().map(str::to_owned).collect(),
            relationship_types: relationship_types.into_iter().map(str::to_owned).collect(),
            property_keys: property_keys.into_iter().map(str::to_owned).collect(),
        }
    }
}

// ============================================================================
// Schema summary
// ============================================================================

/// Sorted, de-duplicated schema of a graph: what a query translator needs
/// to know to phrase queries against it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSchema {
    pub labels: Vec<String>,
    pub relationship_types: Vec<String>,
    pub property_keys: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_nodes() -> PropertyGraph {
        let mut g = PropertyGraph::new();
        g.add_node(GraphNode::new(NodeId(1), "IfcWall").with_attribute("Name", "W1")).unwrap();
        g.add_node(GraphNode::new(NodeId(2), "IfcMaterial").with_attribute("Name", "Brick")).unwrap();
        g
    }

    #[test]
    fn test_duplicate_node_rejected() {
        let mut g = two_nodes();
        let err = g.add_node(GraphNode::new(NodeId(1), "IfcSlab")).unwrap_err();
        assert!(matches!(err, Error::DuplicateNode(NodeId(1))));
        assert_eq!(g.node_count(), 2);
    }

    #[test]
    fn test_dangling_edge_rejected() {
        let mut g = two_nodes();
        let err = g.add_edge(GraphEdge::new(NodeId(1), NodeId(99), "Material")).unwrap_err();
        assert!(matches!(err, Error::DanglingEdge { .. }));
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn test_parallel_edges_and_self_loops() {
        let mut g = two_nodes();
        g.add_edge(GraphEdge::new(NodeId(1), NodeId(2), "Material")).unwrap();
        g.add_edge(GraphEdge::new(NodeId(1), NodeId(2), "Finish")).unwrap();
        g.add_edge(GraphEdge::new(NodeId(1), NodeId(1), "Parent")).unwrap();

        let out: Vec<&str> = g.outgoing(NodeId(1)).map(|e| e.label.as_str()).collect();
        assert_eq!(out, vec!["Material", "Finish", "Parent"]);
        assert_eq!(g.outgoing(NodeId(2)).count(), 0);
        assert!(g.edges()[2].is_self_loop());
    }

    #[test]
    fn test_schema_sorted_and_deduplicated() {
        let mut g = two_nodes();
        g.add_edge(GraphEdge::new(NodeId(1), NodeId(2), "Material")).unwrap();
        g.add_edge(GraphEdge::new(NodeId(2), NodeId(1), "Material")).unwrap();

        let schema = g.schema();
        assert_eq!(schema.labels, vec!["IfcMaterial", "IfcWall"]);
        assert_eq!(schema.relationship_types, vec!["Material"]);
        assert_eq!(schema.property_keys, vec!["Name"]);
    }
}
