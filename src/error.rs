//! Error types for dictpress-migrate.

use thiserror::Error;

/// Result type alias for migration operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during a migration run.
///
/// Each variant carries a descriptive message suitable for the operator;
/// the binary prints it and exits non-zero. There is no recovery path that
/// continues a migration after an error.
#[derive(Error, Debug)]
pub enum Error {
    /// A precondition check failed before any mutating action.
    #[error("{0}")]
    Preflight(String),

    /// Configuration file could not be parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// PostgreSQL source connection failed.
    #[error("Source connection error: {0}")]
    SourceConnection(String),

    /// Extracting or decoding a page of source rows failed.
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// The destination rejected a schema statement.
    #[error("Schema error: {0}")]
    Schema(String),

    /// Loading a batch into the destination failed.
    #[error("Loading error: {0}")]
    Loading(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
