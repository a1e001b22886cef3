//! CLI entry point for the concord connected-component calculator.
//!
//! Parses command-line arguments with clap, computes the components of the
//! input edge file, writes the vertex to component mapping, renders a summary
//! to stdout and maps errors to a failing exit code. Logging is initialised
//! first so every later step can emit structured diagnostics.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use concord_cli::{
    cli::{Cli, CliError, render_summary, run_cli},
    logging::{self, LoggingError},
};
use tracing::{error, field};

/// Parse CLI arguments, execute the command, render the summary, and flush the
/// output stream.
fn try_main() -> Result<()> {
    let cli = Cli::parse();
    let summary = run_cli(cli).context("failed to execute command")?;
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    render_summary(&summary, &mut writer).context("failed to render summary")?;
    writer.flush().context("failed to flush output")?;
    Ok(())
}

fn main() -> ExitCode {
    if let Err(err) = logging::init_logging() {
        report_logging_init_error(&err);
        return ExitCode::FAILURE;
    }

    if let Err(err) = try_main() {
        let cli_error = err.downcast_ref::<CliError>();
        let (core_code, edge_source_code) = match cli_error {
            Some(CliError::Core(core)) => (Some(core.code()), core.edge_source_code()),
            _ => (None, None),
        };

        let message = format!("{err:#}");
        let code_field = cli_error.map(|cli_error| field::display(cli_error.code().as_str()));
        let core_code_field = core_code.map(|code| field::display(code.as_str()));
        let edge_source_code_field = edge_source_code.map(|code| field::display(code.as_str()));

        error!(
            error = %message,
            code = code_field,
            core_code = core_code_field,
            edge_source_code = edge_source_code_field,
            "command execution failed"
        );
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

#[expect(
    clippy::print_stderr,
    reason = "Emit one-off diagnostic before tracing is initialized"
)]
fn report_logging_init_error(err: &LoggingError) {
    eprintln!("failed to initialize logging: {err}");
}
