//! Build log port

/// Operator-facing, line-oriented log of one invocation.
pub trait BuildLog: Send + Sync {
    /// Writes one line.
    fn println(&self, line: &str);
}
