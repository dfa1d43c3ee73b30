//! Error types for the codemap engine.

use std::path::PathBuf;
use thiserror::Error;

/// All errors the codemap library can produce.
#[derive(Debug, Error)]
pub enum CodemapError {
    /// A query was issued before `analyze()` built a graph.
    #[error("no project has been analyzed yet; call analyze() first")]
    NotAnalyzed,

    /// A source file could not be parsed into a syntax tree.
    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CodemapError>;
