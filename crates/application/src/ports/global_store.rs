//! Global store port
//!
//! Defines the interface for reaching and persisting the host-wide
//! variable store.

use globenv_domain::{DomainError, GlobalStore};

/// Errors that can occur while persisting the global store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The stored document is not valid.
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] DomainError),
}

/// Access to the host's global variable store.
///
/// The store is shared host-wide. Implementations are not required to
/// serialize concurrent read-modify-persist sequences; the last persist wins.
pub trait GlobalStoreAccessor {
    /// Returns the store, attaching an empty one to the host configuration
    /// first if none exists yet.
    ///
    /// An existing store is returned as is, never replaced.
    fn get_or_create(&mut self) -> &mut GlobalStore;

    /// Durably saves the host configuration, including the store.
    ///
    /// # Errors
    /// Returns an error if the configuration cannot be written.
    fn persist(&mut self) -> Result<(), StoreError>;
}
