//! Support library for the concord CLI binary.
//!
//! Exposes the command pipeline, the result emitter and logging set-up so
//! doctests and integration tests can exercise them without forking a
//! subprocess.

pub mod cli;
pub mod logging;
pub mod output;
