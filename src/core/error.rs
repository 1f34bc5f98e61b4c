//! Error types for the editor

use thiserror::Error;

/// Main error type for the editor
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Scene error: {0}")]
    Scene(String),

    #[error("Brush error: {0}")]
    Brush(String),

    #[error("Placement error: {0}")]
    Placement(String),

    #[error("Library error: {0}")]
    Library(String),
}
