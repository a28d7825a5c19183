//! Error types for graph traversal and workspace discovery.

use std::path::PathBuf;
use thiserror::Error;

/// Structural graph errors. Both variants are fatal: no valid order
/// exists to continue with.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("unknown package: {name} was never registered in the graph")]
    UnknownNode { name: String },

    #[error("circular dependency: {}", format_cycle(.path))]
    Cycle { path: Vec<String> },
}

impl GraphError {
    /// Stable machine-readable code for JSON output.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownNode { .. } => "GRAPH_UNKNOWN_NODE",
            Self::Cycle { .. } => "GRAPH_CYCLE",
        }
    }
}

fn format_cycle(path: &[String]) -> String {
    if path.is_empty() {
        return String::from("(empty)");
    }
    let mut s = path.join(" -> ");
    s.push_str(" -> ");
    s.push_str(&path[0]);
    s
}

/// Errors from workspace discovery and linking.
#[derive(Error, Debug)]
pub enum WorkspaceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to read manifest at {path}: {source}")]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse manifest at {path}: {source}")]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to link {name}: {message}")]
    LinkFailed { name: String, message: String },
}
