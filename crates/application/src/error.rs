//! Application error types

use globenv_domain::DomainError;
use thiserror::Error;

use crate::ports::{EnvironmentError, StoreError};

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// The global store could not be persisted.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The execution environment could not be collected.
    #[error("environment error: {0}")]
    Environment(#[from] EnvironmentError),
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
