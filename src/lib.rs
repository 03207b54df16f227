//! # ifc-graph: IFC models as property graphs
//!
//! Projects a building-information model (an IFC exchange file) onto a
//! directed property graph ready for bulk loading into a graph database.
//!
//! ## Design Principles
//!
//! 1. **Arena, not pointers**: entities live in an identity-indexed
//!    [`IfcModel`]; references are plain identities, so cycles are free
//! 2. **Pure projection**: [`graph::build`] is a function from model to graph,
//!    no global state
//! 3. **Best-effort header**: a malformed file header degrades to a fallback
//!    attribute map instead of aborting the run
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ifc_graph::{ConvertConfig, Converter};
//!
//! # fn example() -> ifc_graph::Result<()> {
//! let mut converter = Converter::new(ConvertConfig::new("house.ifc"));
//! converter.load()?;
//! let graph = converter.build_graph()?;
//! converter.export(&graph)?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod step;
pub mod header;
pub mod graph;
pub mod export;
pub mod config;

use std::path::PathBuf;

use tracing::{info, info_span};

// ============================================================================
// Re-exports
// ============================================================================

pub use model::{Entity, EntityId, EntityRef, Header, IfcModel, Value};
pub use graph::{GraphEdge, GraphNode, GraphSchema, NodeId, PropertyGraph, HEADER_NODE_ID};
pub use header::HeaderFields;
pub use config::{ConvertConfig, ExportFormat};

// ============================================================================
// Converter session
// ============================================================================

/// One conversion run: load a file, build its graph, export it.
///
/// Building before a successful [`load`](Converter::load) is a usage error
/// ([`Error::ModelNotLoaded`]).
pub struct Converter {
    config: ConvertConfig,
    model: Option<IfcModel>,
}

impl Converter {
    pub fn new(config: ConvertConfig) -> Self {
        Self { config, model: None }
    }

    /// Wrap an already-parsed model.
    pub fn with_model(config: ConvertConfig, model: IfcModel) -> Self {
        Self { config, model: Some(model) }
    }

    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    /// Read the configured input. On failure the model stays unset.
    pub fn load(&mut self) -> Result<&IfcModel> {
        self.model = None;
        let model = step::read_model(&self.config.input)?;
        Ok(&*self.model.insert(model))
    }

    pub fn is_loaded(&self) -> bool {
        self.model.is_some()
    }

    pub fn model(&self) -> Result<&IfcModel> {
        self.model.as_ref().ok_or(Error::ModelNotLoaded)
    }

    pub fn header_fields(&self) -> Result<HeaderFields> {
        Ok(header::normalize(self.model()?.header()))
    }

    pub fn build_graph(&self) -> Result<PropertyGraph> {
        let model = self.model()?;
        let _span = info_span!("build_graph", entities = model.len()).entered();
        graph::build(model)
    }

    /// Write the graph in the configured format. Returns the files written.
    pub fn export(&self, graph: &PropertyGraph) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(&self.config.output_dir)?;
        match self.config.format {
            ExportFormat::Csv => {
                let (nodes, edges) = (self.config.nodes_path(), self.config.edges_path());
                export::export_csv(graph, &nodes, &edges)?;
                Ok(vec![nodes, edges])
            }
            ExportFormat::Cypher => {
                let path = self.config.cypher_path();
                let mut out = std::io::BufWriter::new(std::fs::File::create(&path)?);
                export::export_cypher_dump(graph, &mut out)?;
                std::io::Write::flush(&mut out)?;
                info!(path = %path.display(), "Cypher dump written");
                Ok(vec![path])
            }
        }
    }

    /// Load, build and export in one go.
    pub fn run(&mut self) -> Result<Vec<PathBuf>> {
        self.load()?;
        let graph = self.build_graph()?;
        self.export(&graph)
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to load {path}: {reason}")]
    Load { path: PathBuf, reason: String },

    #[error("STEP syntax error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Invalid model: {0}")]
    InvalidModel(String),

    #[error("IFC model not loaded; call load() first")]
    ModelNotLoaded,

    #[error("Duplicate node {0}")]
    DuplicateNode(NodeId),

    #[error("Edge {label} from {start} to {end} references a missing node")]
    DanglingEdge { start: NodeId, end: NodeId, label: String },

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Load failures: the input could not be turned into a model.
    pub fn is_load_failure(&self) -> bool {
        matches!(self, Error::Load { .. } | Error::Parse { .. } | Error::InvalidModel(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_before_load_is_usage_error() {
        let converter = Converter::new(ConvertConfig::new("nothing.ifc"));
        assert!(!converter.is_loaded());
        assert!(matches!(converter.build_graph(), Err(Error::ModelNotLoaded)));
        assert!(matches!(converter.header_fields(), Err(Error::ModelNotLoaded)));
    }

    #[test]
    fn test_failed_load_leaves_model_unset() {
        let mut converter = Converter::with_model(
            ConvertConfig::new("/no/such/file.ifc"),
            IfcModel::default(),
        );
        let err = converter.load().unwrap_err();
        assert!(err.is_load_failure());
        assert!(!converter.is_loaded());
        assert!(matches!(converter.build_graph(), Err(Error::ModelNotLoaded)));
    }
}
