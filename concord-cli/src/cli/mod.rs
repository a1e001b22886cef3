//! Command-line interface orchestration for concord.
//!
//! The `run` command reads a delimited edge file, maintains the connected
//! components incrementally while streaming it, and writes the vertex to
//! component mapping to a delimited results file.

mod commands;

pub use commands::{
    Cli, CliError, CliErrorCode, Command, ExecutionSummary, PhaseTimings, RunCommand,
    render_summary, run_cli,
};

#[cfg(test)]
mod test_helpers;
#[cfg(test)]
mod tests;
