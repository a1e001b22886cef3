//! Command implementations and argument parsing for the concord CLI.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::{Args, Parser, Subcommand};
use concord_core::{ComponentId, ComponentRegistry, ConcordError, EdgeSource, IngestReport};
use concord_providers_csv::{CsvEdgeSource, CsvEdgeSourceError, CsvOptions};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

use crate::output::{Delimiter, OutputError, write_assignments_to_path};

const DEFAULT_INPUT: &str = "unipartite.csv";
const DEFAULT_OUTPUT: &str = "results.csv";
const FALLBACK_SOURCE_NAME: &str = "edges";

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "concord",
    about = "Compute the connected components of an undirected edge list."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Read an edge file and write each entity's component identifier.
    Run(RunCommand),
}

/// Options accepted by the `run` command.
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Delimited file with one pair of entity identifiers per record.
    #[arg(long, default_value = DEFAULT_INPUT)]
    pub input: PathBuf,

    /// File receiving the entity to component mapping; truncated if present.
    #[arg(long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Separator written between the entity and component columns.
    #[arg(long, default_value = ",")]
    pub delimiter: Delimiter,

    /// Single-byte separator between the two entities of an input record.
    #[arg(
        long = "input-delimiter",
        default_value = ",",
        value_parser = parse_input_delimiter,
    )]
    pub input_delimiter: u8,

    /// Skip the first record of the input file.
    #[arg(long = "has-headers")]
    pub has_headers: bool,

    /// Override name for the data source (defaults to the file name).
    #[arg(long)]
    pub name: Option<String>,
}

impl RunCommand {
    fn csv_options(&self) -> CsvOptions {
        CsvOptions::default()
            .with_delimiter(self.input_delimiter)
            .with_headers(self.has_headers)
    }
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// The edge file could not be opened.
    #[error(transparent)]
    Source(#[from] CsvEdgeSourceError),
    /// Streaming the edges into the registry failed.
    #[error(transparent)]
    Core(#[from] ConcordError),
    /// Writing the results failed.
    #[error(transparent)]
    Output(#[from] OutputError),
}

concord_core::define_error_codes! {
    /// Stable codes describing [`CliError`] variants.
    enum CliErrorCode for CliError {
        /// The edge file could not be opened.
        SourceUnavailable => Source(..) => "CLI_SOURCE_UNAVAILABLE",
        /// Streaming the edges into the registry failed.
        IngestFailed => Core(..) => "CLI_INGEST_FAILED",
        /// Writing the results failed.
        OutputFailed => Output(..) => "CLI_OUTPUT_FAILED",
    }
}

/// Wall-clock time spent in each phase of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhaseTimings {
    /// Reading the edges and maintaining the components.
    pub compute: Duration,
    /// Writing the mapping to the output file.
    pub write: Duration,
}

impl PhaseTimings {
    /// Returns the combined duration of both phases.
    #[must_use]
    pub fn total(&self) -> Duration {
        self.compute.saturating_add(self.write)
    }
}

/// Summarises the outcome of executing a CLI command.
#[derive(Debug, Clone)]
pub struct ExecutionSummary {
    /// Name reported by the edge source.
    pub data_source: String,
    /// Edge file that was read.
    pub input: PathBuf,
    /// Results file that was written.
    pub output: PathBuf,
    /// Number of data records read from the edge file.
    pub records_read: u64,
    /// Number of distinct entities seen.
    pub vertices: usize,
    /// Number of live components.
    pub components: usize,
    /// Identifier the registry would allocate next.
    pub next_component_id: ComponentId,
    /// Transition tally reported while ingesting.
    pub report: IngestReport,
    /// Time spent per phase.
    pub timings: PhaseTimings,
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when the input cannot be read or parsed, or when the
/// output cannot be written.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use concord_cli::cli::{Cli, Command, RunCommand, run_cli};
/// # use concord_cli::output::Delimiter;
/// # use tempfile::TempDir;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let dir = TempDir::new()?;
/// let input = dir.path().join("unipartite.csv");
/// let output = dir.path().join("results.csv");
/// std::fs::write(&input, "e-1,e-2\ne-3,e-4\ne-4,e-1\n")?;
/// let cli = Cli {
///     command: Command::Run(RunCommand {
///         input,
///         output: output.clone(),
///         delimiter: Delimiter::default(),
///         input_delimiter: b',',
///         has_headers: false,
///         name: None,
///     }),
/// };
/// let summary = run_cli(cli)?;
/// assert_eq!(summary.components, 1);
/// assert_eq!(
///     std::fs::read_to_string(&output)?,
///     "Entity ID,Component ID\ne-1,0\ne-2,0\ne-3,0\ne-4,0\n"
/// );
/// # Ok(())
/// # }
/// ```
#[instrument(
    name = "cli.run",
    err,
    skip(cli),
    fields(command = field::Empty),
)]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    match cli.command {
        Command::Run(run) => {
            Span::current().record("command", field::display("run"));
            run_command(run)
        }
    }
}

#[instrument(
    name = "cli.execute",
    err,
    skip(command),
    fields(
        input = field::Empty,
        output = field::Empty,
        delimiter = field::Empty,
        override_name = field::Empty,
    ),
)]
pub(super) fn run_command(command: RunCommand) -> Result<ExecutionSummary, CliError> {
    let span = Span::current();
    span.record("input", field::display(command.input.display()));
    span.record("output", field::display(command.output.display()));
    span.record("delimiter", field::debug(command.delimiter.as_str()));
    span.record(
        "override_name",
        field::display(command.name.as_deref().unwrap_or("<derived>")),
    );

    let data_source = derive_data_source_name(&command.input, command.name.as_deref());

    let compute_started = Instant::now();
    let computed = compute_components(&command.input, data_source, command.csv_options())?;
    let compute = compute_started.elapsed();

    let write_started = Instant::now();
    write_results(&computed.registry, &command.output, &command.delimiter)?;
    let write = write_started.elapsed();

    let registry = &computed.registry;
    let summary = ExecutionSummary {
        data_source: computed.data_source,
        input: command.input,
        output: command.output,
        records_read: computed.records_read,
        vertices: registry.vertex_count(),
        components: registry.live_component_count(),
        next_component_id: registry.next_component_id(),
        report: computed.report,
        timings: PhaseTimings { compute, write },
    };

    info!(
        data_source = summary.data_source.as_str(),
        components = summary.components,
        total = ?summary.timings.total(),
        "command completed"
    );
    Ok(summary)
}

struct ComputedComponents {
    data_source: String,
    registry: ComponentRegistry,
    records_read: u64,
    report: IngestReport,
}

#[instrument(
    name = "cli.ingest",
    err,
    skip(path, data_source, options),
    fields(path = field::Empty, records = field::Empty),
)]
fn compute_components(
    path: &Path,
    data_source: String,
    options: CsvOptions,
) -> Result<ComputedComponents, CliError> {
    let span = Span::current();
    span.record("path", field::display(path.display()));

    let mut source = CsvEdgeSource::try_from_path(data_source, path, options)?;
    let mut registry = ComponentRegistry::new();
    let outcome = registry.ingest(&mut source);
    span.record("records", source.records_read());
    let report = outcome?;

    info!(
        records = source.records_read(),
        vertices = registry.vertex_count(),
        components = registry.live_component_count(),
        "connected components computed"
    );
    Ok(ComputedComponents {
        data_source: source.name().to_owned(),
        registry,
        records_read: source.records_read(),
        report,
    })
}

#[instrument(
    name = "cli.write",
    err,
    skip(registry, delimiter),
    fields(path = field::Empty, rows = field::Empty),
)]
fn write_results(
    registry: &ComponentRegistry,
    path: &Path,
    delimiter: &Delimiter,
) -> Result<(), CliError> {
    let span = Span::current();
    span.record("path", field::display(path.display()));
    let rows = write_assignments_to_path(path, registry.sorted_assignments(), delimiter)?;
    span.record("rows", rows);
    info!(rows, "vertex to component mapping written");
    Ok(())
}

pub(super) fn derive_data_source_name(path: &Path, override_name: Option<&str>) -> String {
    if let Some(name) = override_name {
        return name.to_owned();
    }

    path.file_stem()
        .and_then(|value| value.to_str())
        .map_or_else(|| FALLBACK_SOURCE_NAME.to_owned(), ToOwned::to_owned)
}

pub(super) fn parse_input_delimiter(raw: &str) -> Result<u8, String> {
    match raw.as_bytes() {
        [byte] => Ok(*byte),
        b"\\t" => Ok(b'\t'),
        [] => Err("cannot use a blank delimiter".to_owned()),
        _ => Err(format!(
            "input delimiter must be a single byte, got `{raw}`"
        )),
    }
}

/// Renders `summary` to `writer` in a human-readable text format.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use concord_cli::cli::{ExecutionSummary, PhaseTimings, render_summary};
/// # use concord_core::{ComponentId, IngestReport};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let summary = ExecutionSummary {
///     data_source: "demo".into(),
///     input: "demo.csv".into(),
///     output: "results.csv".into(),
///     records_read: 3,
///     vertices: 4,
///     components: 1,
///     next_component_id: ComponentId::new(2),
///     report: IngestReport::default(),
///     timings: PhaseTimings::default(),
/// };
/// let mut buffer = Vec::new();
/// render_summary(&summary, &mut buffer)?;
/// assert!(String::from_utf8(buffer)?.contains("components: 1"));
/// # Ok(())
/// # }
/// ```
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    writeln!(writer, "data source: {}", summary.data_source)?;
    writeln!(writer, "input: {}", summary.input.display())?;
    writeln!(writer, "records read: {}", summary.records_read)?;
    writeln!(writer, "vertices: {}", summary.vertices)?;
    writeln!(writer, "components: {}", summary.components)?;
    writeln!(writer, "merges: {}", summary.report.merges())?;
    writeln!(writer, "next component id: {}", summary.next_component_id)?;
    writeln!(writer, "output: {}", summary.output.display())?;
    writeln!(writer, "computed in: {:?}", summary.timings.compute)?;
    writeln!(writer, "written in: {:?}", summary.timings.write)?;
    writeln!(writer, "total: {:?}", summary.timings.total())?;
    Ok(())
}
