//! Global configuration persistence adapters.

mod file_store;
mod memory_store;

pub use file_store::FileGlobalConfiguration;
pub use memory_store::InMemoryGlobalConfiguration;
