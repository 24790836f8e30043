//! Variable resolution module
//!
//! Provides parsing and resolution of `$name` / `${name}` references in
//! variable values.
//!
//! # Usage
//!
//! ```
//! use globenv_application::variable_resolver::VariableResolver;
//! use globenv_domain::VariableMap;
//!
//! let mut variables = VariableMap::new();
//! variables.insert("host".to_string(), "localhost".to_string());
//! variables.insert("url".to_string(), "http://$host/$path".to_string());
//!
//! let mut environment = VariableMap::new();
//! environment.insert("path".to_string(), "api".to_string());
//!
//! VariableResolver::default().resolve(&mut variables, &environment);
//! assert_eq!(variables["url"], "http://localhost/api");
//! ```

pub mod engine;
pub mod parser;

pub use engine::{
    MAX_RESOLUTION_PASSES, SubstitutionResult, VariableResolver, VariableSource,
    resolve_external, resolve_self, substitute,
};
pub use parser::{VariableReference, parse_variables};
