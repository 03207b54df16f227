//! Node in the property graph.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::EntityId;

/// Node identifier. Mirrors the entity identity; the header node uses
/// [`HEADER_NODE_ID`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub i64);

/// Reserved identity of the synthetic header node. Entity identities are
/// always positive, so this never collides.
pub const HEADER_NODE_ID: NodeId = NodeId(0);

/// Label of the synthetic header node.
pub const HEADER_LABEL: &str = "Header";

/// Exact for every identity an [`IfcModel`](crate::IfcModel) accepts (`<= EntityId::MAX`).
impl From<EntityId> for NodeId {
    fn from(id: EntityId) -> Self {
        NodeId(id.0 as i64)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Attribute name → serialized scalar.
pub type AttributeMap = BTreeMap<String, String>;

/// A node in the property graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: NodeId,
    pub label: String,
    pub attributes: AttributeMap,
}

impl GraphNode {
    pub fn new(id: NodeId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            attributes: AttributeMap::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}
