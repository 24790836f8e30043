//! Variable resolution engine
//!
//! Substitutes `$name` / `${name}` references, first among the local
//! variables themselves for a fixed number of passes, then once against an
//! external environment.

use std::collections::BTreeSet;

use globenv_domain::{GlobalStore, VariableMap};
use tracing::{debug, trace};

use super::parser::parse_variables;

/// Number of self-resolution passes run by the publishing pipeline.
///
/// Reference chains deeper than this stay partially substituted.
pub const MAX_RESOLUTION_PASSES: usize = 5;

/// A source of variable values that references can be looked up in.
pub trait VariableSource {
    /// Returns the value of `name`, if defined.
    fn lookup(&self, name: &str) -> Option<&str>;
}

impl VariableSource for VariableMap {
    fn lookup(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl VariableSource for GlobalStore {
    fn lookup(&self, name: &str) -> Option<&str> {
        self.get(name)
    }
}

/// Result of substituting references in one string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstitutionResult {
    /// The string with every resolvable reference replaced.
    pub resolved: String,

    /// Names left as literal text, in order of appearance.
    pub unresolved: Vec<String>,
}

impl SubstitutionResult {
    /// Creates a result for input with no references.
    #[must_use]
    pub fn no_variables(input: &str) -> Self {
        Self {
            resolved: input.to_string(),
            unresolved: Vec::new(),
        }
    }
}

/// Replaces each reference in `input` whose name is defined in `source`.
///
/// The input is scanned once; substituted text is not scanned again.
/// References to undefined names are kept exactly as written.
#[must_use]
pub fn substitute<S: VariableSource + ?Sized>(input: &str, source: &S) -> SubstitutionResult {
    let references = parse_variables(input);

    if references.is_empty() {
        return SubstitutionResult::no_variables(input);
    }

    let mut unresolved = Vec::new();
    let mut result = String::with_capacity(input.len());
    let mut last_end = 0;

    for var_ref in references {
        result.push_str(&input[last_end..var_ref.span.start]);

        if let Some(value) = source.lookup(&var_ref.name) {
            result.push_str(value);
        } else {
            result.push_str(&input[var_ref.span.clone()]);
            unresolved.push(var_ref.name);
        }

        last_end = var_ref.span.end;
    }

    result.push_str(&input[last_end..]);

    SubstitutionResult {
        resolved: result,
        unresolved,
    }
}

/// Resolves the variables against each other for exactly `max_passes` passes.
///
/// Every pass reads the values as they stood at the start of that pass, so a
/// chain `a -> b -> c` needs one pass per link. No fixed-point detection is
/// done: all passes run even when nothing changes, which also bounds the
/// work spent on circular references.
pub fn resolve_self(variables: &mut VariableMap, max_passes: usize) {
    for pass in 1..=max_passes {
        let snapshot = variables.clone();
        let mut changed = 0_usize;

        for value in variables.values_mut() {
            let result = substitute(value.as_str(), &snapshot);
            if result.resolved != *value {
                *value = result.resolved;
                changed += 1;
            }
        }

        trace!(pass, changed, "self-resolution pass");
    }
}

/// Substitutes every value once against the external environment.
///
/// Returns the reference names that are still unresolved afterwards.
pub fn resolve_external<S: VariableSource + ?Sized>(
    variables: &mut VariableMap,
    environment: &S,
) -> BTreeSet<String> {
    let mut unresolved = BTreeSet::new();

    for value in variables.values_mut() {
        let result = substitute(value.as_str(), environment);
        unresolved.extend(result.unresolved);
        *value = result.resolved;
    }

    unresolved
}

/// Runs self-resolution followed by external resolution.
pub struct VariableResolver {
    max_passes: usize,
}

impl VariableResolver {
    /// Creates a resolver running `max_passes` self-resolution passes.
    #[must_use]
    pub const fn new(max_passes: usize) -> Self {
        Self { max_passes }
    }

    /// Returns the number of self-resolution passes.
    #[must_use]
    pub const fn max_passes(&self) -> usize {
        self.max_passes
    }

    /// Resolves `variables` in place against themselves, then against
    /// `environment`.
    ///
    /// Returns the reference names left unresolved.
    pub fn resolve<S: VariableSource + ?Sized>(
        &self,
        variables: &mut VariableMap,
        environment: &S,
    ) -> BTreeSet<String> {
        resolve_self(variables, self.max_passes);
        let unresolved = resolve_external(variables, environment);

        if !unresolved.is_empty() {
            debug!(?unresolved, "references left unresolved");
        }

        unresolved
    }
}

impl Default for VariableResolver {
    fn default() -> Self {
        Self::new(MAX_RESOLUTION_PASSES)
    }
}
