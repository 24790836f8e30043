//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the publishing core and the host.
//! Each port is a trait that can be implemented by adapters in the
//! infrastructure layer.

mod build_log;
mod environment_provider;
mod global_store;

pub use build_log::BuildLog;
pub use environment_provider::{EnvironmentError, EnvironmentProvider};
pub use global_store::{GlobalStoreAccessor, StoreError};
