//! # Property Graph
//!
//! Output side of a conversion: nodes keyed by entity identity, directed
//! edges labelled with the attribute that produced them.
//!
//! [`builder::build`] produces a [`PropertyGraph`] from an
//! [`IfcModel`](crate::model::IfcModel); exporters consume it.

pub mod node;
pub mod edge;
pub mod store;
pub mod builder;

pub use node::{GraphNode, NodeId, AttributeMap, HEADER_NODE_ID, HEADER_LABEL};
pub use edge::GraphEdge;
pub use store::{PropertyGraph, GraphSchema};
pub use builder::{build, classify, reference_targets, AttributeRole};
