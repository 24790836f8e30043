//! Globenv Application - Publishing core
//!
//! This crate turns a block of user-supplied `key=value` text into resolved
//! variables and merges them into the host's global store:
//!
//! 1. [`properties`] parses the text.
//! 2. [`variable_resolver`] substitutes `$name` / `${name}` references, first
//!    among the parsed variables, then against the execution environment.
//! 3. [`use_cases`] merges the result into the store reached through
//!    [`ports::GlobalStoreAccessor`] and persists it.

pub mod error;
pub mod ports;
pub mod properties;
pub mod use_cases;
pub mod variable_resolver;

pub use error::{ApplicationError, ApplicationResult};
pub use use_cases::{
    GlobalVariablesPublisher, LOG_PREFIX, merge_variables, resolve_and_merge, resolve_variables,
};
