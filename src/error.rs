//! Error types for the gridq crate

use thiserror::Error;

use crate::grid_world::Position;

/// Main error type for the gridq crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid action '{action}' (expected one of: up, down, left, right)")]
    InvalidAction { action: String },

    #[error("no action is allowed from terminal position {position}; reset the episode first")]
    IllegalState { position: Position },

    #[error("precondition violated: {message}")]
    Precondition { message: String },

    #[error("invalid grid layout: {message}")]
    InvalidLayout { message: String },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("unrecognised input '{input}' (expected up, down, left, right or abort)")]
    ParseManualInput { input: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
