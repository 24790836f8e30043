//! Globenv Domain - Core business types
//!
//! This crate defines the domain model for publishing resolved variables
//! into a host-wide global store. All types here are pure Rust with no I/O
//! dependencies.

pub mod environment;
pub mod error;

pub use environment::{
    CURRENT_SCHEMA_VERSION, GlobalConfiguration, GlobalStore, VariableMap,
};
pub use error::{DomainError, DomainResult};
