//! Environment provider port
//!
//! Supplies the already-resolved variables of the current execution context.

use globenv_domain::VariableMap;

/// Errors that can occur while collecting the execution environment.
#[derive(Debug, thiserror::Error)]
pub enum EnvironmentError {
    /// The environment could not be read.
    #[error("Environment unavailable: {0}")]
    Unavailable(String),
}

/// Source of the execution context's variables.
pub trait EnvironmentProvider {
    /// Returns a read-only snapshot of the current environment.
    ///
    /// # Errors
    /// Returns an error if the environment cannot be collected.
    fn environment(&self) -> Result<VariableMap, EnvironmentError>;
}
