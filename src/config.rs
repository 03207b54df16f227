//! Conversion settings.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Output encoding for the finished graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// `nodes.csv` + `edges.csv`
    #[default]
    Csv,
    /// A single Cypher script.
    Cypher,
}

/// Where to read the model from and where to write the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub nodes_file: String,
    pub edges_file: String,
    pub cypher_file: String,
    pub format: ExportFormat,
}

impl ConvertConfig {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output_dir: PathBuf::from("."),
            nodes_file: "nodes.csv".into(),
            edges_file: "edges.csv".into(),
            cypher_file: "graph.cypher".into(),
            format: ExportFormat::Csv,
        }
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }

    pub fn nodes_path(&self) -> PathBuf {
        self.output_dir.join(&self.nodes_file)
    }

    pub fn edges_path(&self) -> PathBuf {
        self.output_dir.join(&self.edges_file)
    }

    pub fn cypher_path(&self) -> PathBuf {
        self.output_dir.join(&self.cypher_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        let cfg = ConvertConfig::new("model.ifc").with_output_dir("/tmp/out");
        assert_eq!(cfg.nodes_path(), PathBuf::from("/tmp/out/nodes.csv"));
        assert_eq!(cfg.edges_path(), PathBuf::from("/tmp/out/edges.csv"));
        assert_eq!(cfg.format, ExportFormat::Csv);
    }

    #[test]
    fn test_format_serde_names() {
        assert_eq!(serde_json::to_string(&ExportFormat::Cypher).unwrap(), "\"cypher\"");
    }
}
