//! Build log adapters

use std::io::Write;
use std::sync::{Mutex, PoisonError};

use globenv_application::ports::BuildLog;

/// Writes build log lines to a writer, typically stdout.
///
/// Write failures are ignored; the build log is informational.
#[derive(Debug)]
pub struct ConsoleBuildLog<W> {
    writer: Mutex<W>,
}

impl<W: Write + Send> ConsoleBuildLog<W> {
    /// Creates a build log writing to `writer`.
    pub const fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send> BuildLog for ConsoleBuildLog<W> {
    fn println(&self, line: &str) {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = writeln!(writer, "{line}");
    }
}

/// Keeps build log lines in memory.
#[derive(Debug, Default)]
pub struct MemoryBuildLog {
    lines: Mutex<Vec<String>>,
}

impl MemoryBuildLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the lines written so far.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl BuildLog for MemoryBuildLog {
    fn println(&self, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.to_string());
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_console_log_writes_lines() {
        let log = ConsoleBuildLog::new(Vec::new());
        log.println("first");
        log.println("second");

        let output = String::from_utf8(log.into_inner()).unwrap();
        assert_eq!(output, "first\nsecond\n");
    }

    #[test]
    fn test_memory_log_keeps_lines_in_order() {
        let log = MemoryBuildLog::new();
        log.println("a");
        log.println("b");
        assert_eq!(log.lines(), vec!["a", "b"]);
    }
}
