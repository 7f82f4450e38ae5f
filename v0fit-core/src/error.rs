//! Error types for v0fit-core.

use thiserror::Error;

/// Result type alias for v0fit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for v0fit operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// The primary vertex was selected as reference but none was supplied.
    #[error("primary vertex requested as reference but the vertex collection is empty")]
    MissingPrimaryVertex,
}
