//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A variable name is empty.
    #[error("variable name must not be empty (value: {value:?})")]
    EmptyVariableName {
        /// The value that was about to be stored.
        value: String,
    },

    /// The configuration document uses a schema this build does not understand.
    #[error("unsupported configuration schema version: {0}")]
    UnsupportedSchemaVersion(u32),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
