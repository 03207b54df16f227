//! Model → property graph projection.
//!
//! One node per entity plus the header node; one edge per entity reference,
//! including references held inside collections. Pure function of the model:
//! no I/O, no shared state.
//!
//! ## Attribute policy
//!
//! | Value | Node attribute | Edges |
//! |-------|----------------|-------|
//! | null | dropped | none |
//! | valid reference | dropped | one |
//! | collection of only valid references | dropped | one per element |
//! | collection with any other element | kept as literal | one per valid reference element |
//! | anything else | kept as literal | none |
//!
//! Mixed collections are kept whole, references included, so the literal
//! reflects the source value exactly.

use tracing::{debug, info, warn};

use super::{AttributeMap, GraphEdge, GraphNode, NodeId, PropertyGraph, HEADER_LABEL, HEADER_NODE_ID};
use crate::header;
use crate::model::{Entity, EntityId, EntityRef, IfcModel, Value};
use crate::Result;

/// Attribute names that collide with a node's own identity and label columns.
pub const RESERVED_KEYS: [&str; 2] = ["id", "type"];

/// How an attribute value is projected onto the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeRole {
    /// Not represented on the node.
    Drop,
    /// Serialized into the node's attributes.
    Literal,
    /// Represented only by edges. Empty collections land here too and
    /// produce no edges.
    Reference,
}

pub fn classify(value: &Value) -> AttributeRole {
    match value {
        Value::Null => AttributeRole::Drop,
        Value::Reference(r) if r.is_valid() => AttributeRole::Reference,
        Value::List(items) if items.iter().all(|v| v.valid_reference().is_some()) => {
            AttributeRole::Reference
        }
        _ => AttributeRole::Literal,
    }
}

/// Valid references held directly by the value or by its top-level elements.
pub fn reference_targets(value: &Value) -> Vec<EntityRef> {
    match value {
        Value::Reference(r) if r.is_valid() => vec![*r],
        Value::List(items) => items.iter().filter_map(Value::valid_reference).collect(),
        _ => Vec::new(),
    }
}

/// Node attributes for an entity: every literal-role attribute, stringified.
pub fn node_attributes(entity: &Entity) -> AttributeMap {
    entity
        .attributes
        .iter()
        .filter(|(name, _)| !RESERVED_KEYS.contains(&name.as_str()))
        .filter(|(_, value)| classify(value) == AttributeRole::Literal)
        .map(|(name, value)| (name.clone(), value.to_literal()))
        .collect()
}

/// Build the graph for a loaded model.
///
/// The header node is inserted first, then entities in ascending identity
/// order, each followed by its outgoing edges in attribute order. References
/// to identities absent from the model are skipped.
pub fn build(model: &IfcModel) -> Result<PropertyGraph> {
    let mut graph = PropertyGraph::new();

    let header_fields = header::normalize(model.header());
    graph.add_node(GraphNode {
        id: HEADER_NODE_ID,
        label: HEADER_LABEL.to_owned(),
        attributes: header_fields.into_attributes(),
    })?;

    let ids = model.sorted_ids();
    for &id in &ids {
        let Some(entity) = model.get(id) else { continue };
        graph.add_node(GraphNode {
            id: id.into(),
            label: entity.type_tag.clone(),
            attributes: node_attributes(entity),
        })?;
    }

    // Edges after all nodes so forward references resolve; per-entity order
    // still follows ascending identity then attribute order.
    let mut skipped = 0usize;
    for &id in &ids {
        let Some(entity) = model.get(id) else { continue };
        for (name, value) in &entity.attributes {
            for target in reference_targets(value) {
                let target_id = EntityId(target.0 as u64);
                if !model.contains(target_id) {
                    warn!(source = %id, target = %target, attribute = %name, "reference to missing entity skipped");
                    skipped += 1;
                    continue;
                }
                graph.add_edge(GraphEdge::new(id.into(), NodeId::from(target_id), name.clone()))?;
            }
        }
    }

    if skipped > 0 {
        debug!(skipped, "dangling references");
    }
    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "graph built"
    );
    Ok(graph)
}
