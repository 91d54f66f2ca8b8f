use std::path::PathBuf;

use thiserror::Error;

/// Result type used across the crate.
pub type YmlResult<T> = Result<T, YmlError>;

#[derive(Error, Debug)]
/// YML generation error
pub enum YmlError {
    #[error("Configuration from: {0}")]
    Configuration(String),

    #[error("Provider from: {0}")]
    Provider(String),

    #[error("XmlWriter from: {0}")]
    XmlWriter(String),

    #[error("Io from: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to replace {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
