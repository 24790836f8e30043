//! Property text parsing
//!
//! Turns a block of `key=value` lines into a [`VariableMap`], following the
//! usual `.properties` conventions: `#`/`!` comments, backslash line
//! continuation, `=`/`:`/whitespace separators and `\`-escapes.

mod lines;
mod reader;

pub use reader::{PropertiesError, PropertiesReader};

use globenv_domain::VariableMap;

/// Best-effort result of parsing property text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOutcome {
    /// Entries with a non-empty key and value, read up to any failure.
    pub variables: VariableMap,

    /// The failure that stopped reading, if any.
    pub error: Option<PropertiesError>,
}

impl ParseOutcome {
    /// Whether the whole text was read.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

/// Parses property text without ever failing.
///
/// Malformed input stops reading at the offending entry; everything read
/// before it is returned alongside the error.
///
/// ```
/// use globenv_application::properties::parse_properties;
///
/// let outcome = parse_properties("# build settings\nname=app\nempty=\n");
/// assert!(outcome.is_complete());
/// assert_eq!(outcome.variables.len(), 1);
/// assert_eq!(outcome.variables["name"], "app");
/// ```
#[must_use]
pub fn parse_properties(text: &str) -> ParseOutcome {
    let mut reader = PropertiesReader::new();
    let error = reader.load(text).err();

    ParseOutcome {
        variables: reader.into_variables(),
        error,
    }
}
