//! Adapters for the environment and build log ports.

mod build_log;
mod environment;

pub use build_log::{ConsoleBuildLog, MemoryBuildLog};
pub use environment::{ProcessEnvironment, StaticEnvironment};
