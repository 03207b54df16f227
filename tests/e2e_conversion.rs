//! End-to-end tests: IFC text → model → graph → exported tables.
//!
//! Uses `tests/fixtures/house.ifc`, a small single-storey project with walls,
//! a door, a material list, quantities and a property set.

use std::collections::HashSet;

use pretty_assertions::assert_eq;

use ifc_graph::export::{write_edge_csv, write_node_csv};
use ifc_graph::graph::{self, HEADER_LABEL};
use ifc_graph::{step, ConvertConfig, Converter, ExportFormat, Error, NodeId, HEADER_NODE_ID};

const HOUSE: &str = include_str!("fixtures/house.ifc");
const ENTITY_COUNT: usize = 29;

fn house_graph() -> ifc_graph::PropertyGraph {
    let model = step::parse_model(HOUSE).unwrap();
    graph::build(&model).unwrap()
}

fn edges_from(graph: &ifc_graph::PropertyGraph, id: i64) -> Vec<(i64, String)> {
    graph
        .outgoing(NodeId(id))
        .map(|e| (e.target.0, e.label.clone()))
        .collect()
}

// ============================================================================
// 1. Node count and header node
// ============================================================================

#[test]
fn test_node_count_is_entities_plus_header() {
    let model = step::parse_model(HOUSE).unwrap();
    assert_eq!(model.len(), ENTITY_COUNT);

    let graph = graph::build(&model).unwrap();
    assert_eq!(graph.node_count(), ENTITY_COUNT + 1);
    assert_eq!(graph.edge_count(), 47);
}

#[test]
fn test_header_node_first_and_complete() {
    let graph = house_graph();
    let header = &graph.nodes()[0];
    assert_eq!(header.id, HEADER_NODE_ID);
    assert_eq!(header.label, HEADER_LABEL);
    assert_eq!(header.get("FileName"), Some("house.ifc"));
    assert_eq!(header.get("Author"), Some("Ana Lima, Bo Berg"));
    assert_eq!(header.get("Organization"), Some("Studio Nord"));
    assert_eq!(header.get("OriginatingSystem"), Some("Revit 2023"));
    assert_eq!(header.get("Authorization"), Some(""));
    assert_eq!(header.get("Thema"), Some("Unknown"));
    assert_eq!(header.get("Schema"), Some("IFC4"));
    assert_eq!(header.attributes.len(), 10);
}

#[test]
fn test_nodes_in_ascending_identity_order() {
    let graph = house_graph();
    let ids: Vec<i64> = graph.nodes().iter().skip(1).map(|n| n.id.0).collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    assert_eq!(ids, sorted);
}

// ============================================================================
// 2. Attribute projection
// ============================================================================

#[test]
fn test_space_attributes() {
    let graph = house_graph();
    let space = graph.node(NodeId(14)).unwrap();
    assert_eq!(space.label, "IfcSpace");
    assert_eq!(space.get("Name"), Some("1"));
    assert_eq!(space.get("LongName"), Some("Living Room"));
    assert_eq!(space.get("PredefinedType"), Some("INTERNAL"));
    assert_eq!(space.get("OwnerHistory"), None);
    assert_eq!(space.get("ObjectPlacement"), None);
}

#[test]
fn test_typed_and_real_values_serialized() {
    let graph = house_graph();
    assert_eq!(
        graph.node(NodeId(54)).unwrap().get("NominalValue"),
        Some("IfcBoolean(True)")
    );
    assert_eq!(graph.node(NodeId(51)).unwrap().get("AreaValue"), Some("27.0"));
    assert_eq!(graph.node(NodeId(32)).unwrap().get("OverallHeight"), Some("2.1"));
    assert_eq!(graph.node(NodeId(5)).unwrap().get("CreationDate"), Some("1709287200"));
}

// ============================================================================
// 3. Edges
// ============================================================================

#[test]
fn test_containment_edges() {
    let graph = house_graph();
    assert_eq!(
        edges_from(&graph, 33),
        vec![
            (5, "OwnerHistory".to_string()),
            (30, "RelatedElements".to_string()),
            (31, "RelatedElements".to_string()),
            (32, "RelatedElements".to_string()),
            (13, "RelatingStructure".to_string()),
        ]
    );
    let rel = graph.node(NodeId(33)).unwrap();
    assert_eq!(rel.get("RelatedElements"), None);
}

#[test]
fn test_material_path() {
    let graph = house_graph();
    assert_eq!(
        edges_from(&graph, 42),
        vec![(40, "Materials".to_string()), (41, "Materials".to_string())]
    );
    let targets: HashSet<i64> = edges_from(&graph, 43).into_iter().map(|(t, _)| t).collect();
    assert_eq!(targets, HashSet::from([5, 30, 31, 42]));
}

#[test]
fn test_edge_endpoints_exist() {
    let graph = house_graph();
    for edge in graph.edges() {
        assert!(graph.contains_node(edge.source), "{edge:?}");
        assert!(graph.contains_node(edge.target), "{edge:?}");
    }
}

#[test]
fn test_schema_summary() {
    let schema = house_graph().schema();
    assert!(schema.labels.contains(&"IfcWall".to_string()));
    assert!(schema.labels.contains(&"Header".to_string()));
    assert!(schema.relationship_types.contains(&"RelatingMaterial".to_string()));
    assert!(!schema.property_keys.contains(&"RelatedObjects".to_string()));
    assert!(schema.property_keys.contains(&"AreaValue".to_string()));
}

// ============================================================================
// 4. Export
// ============================================================================

#[test]
fn test_csv_tables() {
    let graph = house_graph();

    let mut nodes = Vec::new();
    write_node_csv(&graph, &mut nodes).unwrap();
    let nodes = String::from_utf8(nodes).unwrap();
    assert_eq!(nodes.lines().count(), ENTITY_COUNT + 2);
    assert!(nodes.lines().nth(1).unwrap().starts_with("0,Header,"));

    let mut edges = Vec::new();
    write_edge_csv(&graph, &mut edges).unwrap();
    let edges = String::from_utf8(edges).unwrap();
    assert_eq!(edges.lines().next(), Some("start_id,end_id,type"));
    assert_eq!(edges.lines().count(), 47 + 1);
    assert!(edges.lines().any(|l| l == "43,42,RelatingMaterial"));
}

#[test]
fn test_converter_writes_csv_files() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("house.ifc");
    std::fs::write(&input, HOUSE).unwrap();

    let out = dir.path().join("out");
    let mut converter = Converter::new(ConvertConfig::new(&input).with_output_dir(&out));
    let written = converter.run().unwrap();
    assert_eq!(written, vec![out.join("nodes.csv"), out.join("edges.csv")]);

    let nodes = std::fs::read_to_string(out.join("nodes.csv")).unwrap();
    assert_eq!(nodes.lines().next(), Some("id,label,attributes"));
    let edges = std::fs::read_to_string(out.join("edges.csv")).unwrap();
    assert_eq!(edges.lines().count(), 48);
}

#[test]
fn test_converter_writes_cypher() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("house.ifc");
    std::fs::write(&input, HOUSE).unwrap();

    let config = ConvertConfig::new(&input)
        .with_output_dir(dir.path())
        .with_format(ExportFormat::Cypher);
    let mut converter = Converter::new(config);
    let written = converter.run().unwrap();
    let dump = std::fs::read_to_string(&written[0]).unwrap();
    assert_eq!(dump.lines().filter(|l| l.starts_with("CREATE")).count(), ENTITY_COUNT + 1);
    assert_eq!(dump.lines().filter(|l| l.starts_with("MATCH")).count(), 47);
}

// ============================================================================
// 5. Failure classes
// ============================================================================

#[test]
fn test_corrupt_file_is_load_failure() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("broken.ifc");
    std::fs::write(&input, "ISO-10303-21;\nHEADER;\nENDSEC;\nDATA;\n#1=IFCWALL(\n").unwrap();

    let mut converter = Converter::new(ConvertConfig::new(&input));
    let err = converter.load().unwrap_err();
    assert!(err.is_load_failure(), "{err}");
    assert!(matches!(converter.build_graph(), Err(Error::ModelNotLoaded)));
}

#[test]
fn test_malformed_header_degrades_but_builds() {
    let text = HOUSE.replace("('Ana Lima','Bo Berg')", "(#1,#2)");
    let model = step::parse_model(&text).unwrap();
    let graph = graph::build(&model).unwrap();

    let header = graph.node(HEADER_NODE_ID).unwrap();
    assert_eq!(header.attributes.len(), 1);
    assert_eq!(header.get("Error"), Some("Header data could not be processed"));
    assert_eq!(graph.node_count(), ENTITY_COUNT + 1);
}
