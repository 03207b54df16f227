//! Graph export: node/edge CSV tables and a Cypher script.
//!
//! ```text
//! PropertyGraph → write_node_csv() → id,label,attributes
//!               → write_edge_csv() → start_id,end_id,type
//!               → export_cypher_dump() → CREATE / MATCH..CREATE statements
//! ```
//!
//! The `attributes` column holds the whole attribute map as one JSON object;
//! splitting it into properties is the loader's job.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::graph::{AttributeMap, PropertyGraph};
use crate::{Error, Result};

pub const NODE_COLUMNS: [&str; 3] = ["id", "label", "attributes"];
pub const EDGE_COLUMNS: [&str; 3] = ["start_id", "end_id", "type"];

// ============================================================================
// CSV
// ============================================================================

/// Write the node table, header node first, then entities in build order.
pub fn write_node_csv(graph: &PropertyGraph, writer: &mut dyn Write) -> Result<()> {
    write_row(writer, &NODE_COLUMNS)?;
    for node in graph.nodes() {
        let id = node.id.to_string();
        let attributes = attributes_json(&node.attributes)?;
        write_row(writer, &[id.as_str(), node.label.as_str(), attributes.as_str()])?;
    }
    Ok(())
}

/// Write the edge table in emission order.
pub fn write_edge_csv(graph: &PropertyGraph, writer: &mut dyn Write) -> Result<()> {
    write_row(writer, &EDGE_COLUMNS)?;
    for edge in graph.edges() {
        let start = edge.source.to_string();
        let end = edge.target.to_string();
        write_row(writer, &[start.as_str(), end.as_str(), edge.label.as_str()])?;
    }
    Ok(())
}

/// Write both tables to files, replacing any existing content.
pub fn export_csv(graph: &PropertyGraph, nodes_path: &Path, edges_path: &Path) -> Result<()> {
    let mut nodes = BufWriter::new(File::create(nodes_path)?);
    write_node_csv(graph, &mut nodes)?;
    nodes.flush()?;

    let mut edges = BufWriter::new(File::create(edges_path)?);
    write_edge_csv(graph, &mut edges)?;
    edges.flush()?;

    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        nodes_path = %nodes_path.display(),
        edges_path = %edges_path.display(),
        "CSV export written"
    );
    Ok(())
}

pub fn attributes_json(attributes: &AttributeMap) -> Result<String> {
    serde_json::to_string(attributes).map_err(Error::from)
}

fn write_row(writer: &mut dyn Write, fields: &[&str]) -> Result<()> {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            writer.write_all(b",")?;
        }
        writer.write_all(csv_field(field).as_bytes())?;
    }
    writer.write_all(b"\r\n")?;
    Ok(())
}

/// RFC 4180 quoting.
fn csv_field(field: &str) -> std::borrow::Cow<'_, str> {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\"")).into()
    } else {
        field.into()
    }
}

// ============================================================================
// Cypher dump
// ============================================================================

/// Export the graph as a Cypher script.
///
/// Nodes carry their identity as `_id` so relationship statements can match
/// them; the header node keeps identity 0.
pub fn export_cypher_dump(graph: &PropertyGraph, writer: &mut dyn Write) -> Result<()> {
    writeln!(writer, "// ifc-graph Cypher DUMP")?;
    writeln!(writer, "// Nodes: {}", graph.node_count())?;
    writeln!(writer, "// Relationships: {}", graph.edge_count())?;
    writeln!(writer)?;

    for node in graph.nodes() {
        let props = format_properties(&node.attributes);
        writeln!(
            writer,
            "CREATE (n:{} {{_id: {}{}}});",
            quote_identifier(&node.label),
            node.id,
            if props.is_empty() { String::new() } else { format!(", {props}") }
        )?;
    }

    writeln!(writer)?;
    writeln!(writer, "// Relationships")?;

    for edge in graph.edges() {
        writeln!(
            writer,
            "MATCH (a {{_id: {}}}), (b {{_id: {}}}) CREATE (a)-[:{}]->(b);",
            edge.source,
            edge.target,
            quote_identifier(&edge.label),
        )?;
    }
    Ok(())
}

fn format_properties(props: &AttributeMap) -> String {
    props
        .iter()
        .map(|(k, v)| format!("{}: {}", quote_identifier(k), format_string(v)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_string(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// Backtick identifiers that are not plain `[A-Za-z_][A-Za-z0-9_]*`.
fn quote_identifier(name: &str) -> String {
    let plain = name.chars().next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if plain {
        name.to_string()
    } else {
        format!("`{}`", name.replace('`', "``"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphEdge, GraphNode, NodeId};

    fn small_graph() -> PropertyGraph {
        let mut g = PropertyGraph::new();
        g.add_node(GraphNode::new(NodeId(0), "Header").with_attribute("FileName", "a.ifc")).unwrap();
        g.add_node(GraphNode::new(NodeId(7), "IfcWall").with_attribute("Name", "W1, \"north\"")).unwrap();
        g.add_node(GraphNode::new(NodeId(9), "IfcMaterial")).unwrap();
        g.add_edge(GraphEdge::new(NodeId(7), NodeId(9), "Material")).unwrap();
        g
    }

    #[test]
    fn test_csv_field_quoting() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_node_csv() {
        let mut buf = Vec::new();
        write_node_csv(&small_graph(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "id,label,attributes");
        assert_eq!(lines[1], r#"0,Header,"{""FileName"":""a.ifc""}""#);
        assert!(lines[2].starts_with("7,IfcWall,"));
        assert_eq!(lines[3], "9,IfcMaterial,{}");
    }

    #[test]
    fn test_edge_csv() {
        let mut buf = Vec::new();
        write_edge_csv(&small_graph(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "start_id,end_id,type\r\n7,9,Material\r\n");
    }

    #[test]
    fn test_cypher_dump() {
        let mut buf = Vec::new();
        export_cypher_dump(&small_graph(), &mut buf).unwrap();
        let dump = String::from_utf8(buf).unwrap();
        assert_eq!(dump.lines().filter(|l| l.starts_with("CREATE")).count(), 3);
        assert!(dump.contains("CREATE (n:Header {_id: 0, FileName: 'a.ifc'});"));
        assert!(dump.contains("MATCH (a {_id: 7}), (b {_id: 9}) CREATE (a)-[:Material]->(b);"));
    }

    #[test]
    fn test_quote_identifier() {
        assert_eq!(quote_identifier("IfcWall"), "IfcWall");
        assert_eq!(quote_identifier("Attribute 1"), "`Attribute 1`");
        assert_eq!(quote_identifier("1st"), "`1st`");
    }
}
