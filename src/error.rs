use std::path::PathBuf;
use thiserror::Error;

/// dbt-lineage error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config validation error: {0}")]
    ConfigValidation(String),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed manifest record {id}: {reason}")]
    MalformedRecord { id: String, reason: String },

    #[error("Rendering engine error: {0}")]
    Engine(String),

    #[error("Viewer error: {0}")]
    Viewer(String),

    #[error("Failed to keep temporary file: {0}")]
    Persist(#[from] tempfile::PathPersistError),

    #[error("Unknown output format: {0}")]
    UnknownFormat(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for dbt-lineage operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a config validation error
    pub fn config_validation(msg: impl Into<String>) -> Self {
        Error::ConfigValidation(msg.into())
    }

    /// Create a malformed record error
    pub fn malformed(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::MalformedRecord {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Create a rendering engine error
    pub fn engine(msg: impl Into<String>) -> Self {
        Error::Engine(msg.into())
    }

    /// Create a viewer error
    pub fn viewer(msg: impl Into<String>) -> Self {
        Error::Viewer(msg.into())
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }
}
