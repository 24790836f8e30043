//! Variable and global store domain types

mod configuration;
mod store;

pub use configuration::{CURRENT_SCHEMA_VERSION, GlobalConfiguration};
pub use store::GlobalStore;

use std::collections::BTreeMap;

/// Mapping from variable name to string value.
///
/// Ordered so that iteration, log output and persisted documents are
/// deterministic.
pub type VariableMap = BTreeMap<String, String>;
