//! Unit tests for the CLI commands and argument parsing.

use super::commands::{derive_data_source_name, parse_input_delimiter, run_command};
use super::test_helpers::{
    create_text_file, read_text_file, run_args, run_cli_expecting_error,
    run_command_expecting_error, temp_dir,
};
use super::{
    Cli, CliError, CliErrorCode, Command, ExecutionSummary, PhaseTimings, render_summary, run_cli,
};

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use concord_core::{ComponentId, ConcordError, EdgeSourceError, IngestReport};
use concord_providers_csv::{CsvEdgeSource, CsvEdgeSourceError, CsvOptions};
use concord_test_support::tracing::RecordingLayer;
use rstest::rstest;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;

use crate::output::{Delimiter, OutputError};

type TestResult = Result<(), Box<dyn std::error::Error>>;

#[rstest]
#[case::override_name("/tmp/source.csv", Some("override"), "override")]
#[case::stem_with_extension("/tmp/unipartite.csv", None, "unipartite")]
#[case::stem_without_extension("/tmp/edges", None, "edges")]
#[case::missing_stem("", None, "edges")]
fn derive_data_source_name_selects_expected_name(
    #[case] raw_path: &str,
    #[case] override_name: Option<&'static str>,
    #[case] expected: &str,
) {
    let path = Path::new(raw_path);
    let name = derive_data_source_name(path, override_name);
    assert_eq!(name, expected);
}

#[rstest]
#[case::comma(",", Ok(b','))]
#[case::tab_byte("\t", Ok(b'\t'))]
#[case::tab_escape("\\t", Ok(b'\t'))]
#[case::blank("", Err(()))]
#[case::multi_byte(";;", Err(()))]
fn parse_input_delimiter_accepts_single_bytes(#[case] raw: &str, #[case] expected: Result<u8, ()>) {
    assert_eq!(parse_input_delimiter(raw).map_err(|_| ()), expected);
}

#[rstest]
#[case::bridged(
    "e-1,e-2\ne-3,e-4\ne-4,e-1\n",
    "Entity ID,Component ID\ne-1,0\ne-2,0\ne-3,0\ne-4,0\n",
    1
)]
#[case::chains(
    "e-1,e-2\ne-2,e-3\ne-10,e-11\ne-4,e-5\ne-5,e-6\n",
    "Entity ID,Component ID\ne-1,0\ne-10,1\ne-11,1\ne-2,0\ne-3,0\ne-4,2\ne-5,2\ne-6,2\n",
    3
)]
#[case::redundant(
    "e-1,e-2\ne-2,e-1\n",
    "Entity ID,Component ID\ne-1,0\ne-2,0\n",
    1
)]
#[case::empty("", "Entity ID,Component ID\n", 0)]
fn run_writes_sorted_mapping(
    #[case] edges: &str,
    #[case] expected: &str,
    #[case] components: usize,
) -> TestResult {
    let dir = temp_dir();
    let input = create_text_file(&dir, "unipartite.csv", edges)?;
    let output = dir.path().join("results.csv");
    let cli = Cli {
        command: Command::Run(run_args(input, output.clone())),
    };

    let summary = run_cli(cli)?;

    assert_eq!(read_text_file(&output)?, expected);
    assert_eq!(summary.components, components);
    assert_eq!(summary.data_source, "unipartite");
    assert_eq!(summary.records_read, edges.lines().count() as u64);
    Ok(())
}

#[rstest]
fn quoted_identifiers_round_trip_one_record_per_vertex() -> TestResult {
    let dir = temp_dir();
    let input = create_text_file(&dir, "edges.csv", "\"acme, inc\",e-2\n\"multi\nline\",e-3\n")?;
    let output = dir.path().join("results.csv");

    let summary = run_command(run_args(input, output.clone()))?;
    assert_eq!(summary.vertices, 4);

    let options = CsvOptions::default().with_headers(true);
    let mut reread = CsvEdgeSource::try_from_path("results", &output, options)?;
    let mut rows = Vec::new();
    while let Some(pair) = reread.try_next_pair()? {
        rows.push(pair.into_parts());
    }
    let expected: Vec<(String, String)> = [
        ("acme, inc", "0"),
        ("e-2", "0"),
        ("e-3", "1"),
        ("multi\nline", "1"),
    ]
    .into_iter()
    .map(|(vertex, component)| (vertex.to_owned(), component.to_owned()))
    .collect();
    assert_eq!(rows, expected);
    Ok(())
}

#[rstest]
fn run_honours_delimiters_and_headers() -> TestResult {
    let dir = temp_dir();
    let input = create_text_file(&dir, "pairs.tsv", "left\tright\nb\ta\nc\td\n")?;
    let output = dir.path().join("out.psv");
    let mut command = run_args(input, output.clone());
    command.delimiter = Delimiter::new("|")?;
    command.input_delimiter = b'\t';
    command.has_headers = true;
    command.name = Some("pairs".into());

    let summary = run_command(command)?;

    assert_eq!(
        read_text_file(&output)?,
        "Entity ID|Component ID\na|0\nb|0\nc|1\nd|1\n"
    );
    assert_eq!(summary.data_source, "pairs");
    assert_eq!(summary.records_read, 2);
    assert_eq!(summary.vertices, 4);
    assert_eq!(summary.next_component_id, ComponentId::new(2));
    Ok(())
}

#[rstest]
fn run_summarises_merges() -> TestResult {
    let dir = temp_dir();
    let input = create_text_file(&dir, "edges.csv", "a,b\nc,d\ne,f\nb,c\nd,e\n")?;
    let output = dir.path().join("results.csv");

    let summary = run_command(run_args(input, output))?;

    assert_eq!(summary.components, 1);
    assert_eq!(summary.next_component_id, ComponentId::new(3));
    assert_eq!(summary.report.merges(), 2);
    assert_eq!(summary.report.created(), 3);
    assert_eq!(summary.report.relabelled(), 4);
    Ok(())
}

#[rstest]
fn run_rejects_malformed_records_before_writing() -> TestResult {
    let dir = temp_dir();
    let input = create_text_file(&dir, "edges.csv", "e-1,e-2\ne-3\ne-4,e-5\n")?;
    let output = dir.path().join("results.csv");

    let err = run_command_expecting_error(run_args(input, output.clone()), "row 2 is malformed");

    assert!(matches!(
        err,
        CliError::Core(ConcordError::EdgeSource {
            error: EdgeSourceError::MalformedRecord { record: 2, fields: 1 },
            ..
        })
    ));
    assert_eq!(err.code(), CliErrorCode::IngestFailed);
    assert!(!output.exists());
    Ok(())
}

#[rstest]
fn run_reports_missing_input() {
    let dir = temp_dir();
    let cli = Cli {
        command: Command::Run(run_args(
            dir.path().join("missing.csv"),
            dir.path().join("results.csv"),
        )),
    };

    let err = run_cli_expecting_error(cli, "missing input must fail");
    assert!(matches!(err, CliError::Source(CsvEdgeSourceError::Io { .. })));
    assert_eq!(err.code().as_str(), "CLI_SOURCE_UNAVAILABLE");
}

#[rstest]
fn run_reports_unwritable_output() -> TestResult {
    let dir = temp_dir();
    let input = create_text_file(&dir, "edges.csv", "a,b\n")?;
    let output = dir.path().join("missing").join("results.csv");

    let err = run_command_expecting_error(run_args(input, output), "output dir is missing");
    assert!(matches!(err, CliError::Output(OutputError::Create { .. })));
    assert_eq!(err.code(), CliErrorCode::OutputFailed);
    assert_eq!(err.code().to_string(), "CLI_OUTPUT_FAILED");
    Ok(())
}

#[rstest]
fn clap_applies_defaults() -> TestResult {
    let cli = Cli::try_parse_from(["concord", "run"])?;
    let Command::Run(run) = cli.command;

    assert_eq!(run.input, PathBuf::from("unipartite.csv"));
    assert_eq!(run.output, PathBuf::from("results.csv"));
    assert_eq!(run.delimiter, Delimiter::default());
    assert_eq!(run.input_delimiter, b',');
    assert!(!run.has_headers);
    assert_eq!(run.name, None);
    Ok(())
}

#[rstest]
fn clap_parses_every_flag() -> TestResult {
    let cli = Cli::try_parse_from([
        "concord",
        "run",
        "--input",
        "in.tsv",
        "--output",
        "out.csv",
        "--delimiter",
        "::",
        "--input-delimiter",
        "\\t",
        "--has-headers",
        "--name",
        "graph",
    ])?;
    let Command::Run(run) = cli.command;

    assert_eq!(run.input, PathBuf::from("in.tsv"));
    assert_eq!(run.output, PathBuf::from("out.csv"));
    assert_eq!(run.delimiter.as_str(), "::");
    assert_eq!(run.input_delimiter, b'\t');
    assert!(run.has_headers);
    assert_eq!(run.name.as_deref(), Some("graph"));
    Ok(())
}

#[rstest]
#[case::blank_delimiter(&["concord", "run", "--delimiter", ""])]
#[case::blank_input_delimiter(&["concord", "run", "--input-delimiter", ""])]
#[case::wide_input_delimiter(&["concord", "run", "--input-delimiter", "ab"])]
#[case::unknown_flag(&["concord", "run", "--weights"])]
fn clap_rejects_invalid_arguments(#[case] args: &[&str]) {
    assert!(Cli::try_parse_from(args).is_err());
}

#[rstest]
fn render_summary_outputs_counts() -> TestResult {
    let summary = ExecutionSummary {
        data_source: "demo".into(),
        input: "demo.csv".into(),
        output: "results.csv".into(),
        records_read: 5,
        vertices: 8,
        components: 3,
        next_component_id: ComponentId::new(3),
        report: IngestReport::default(),
        timings: PhaseTimings {
            compute: Duration::from_millis(2),
            write: Duration::from_millis(1),
        },
    };
    let mut buffer = Vec::new();
    render_summary(&summary, &mut buffer)?;
    let text = String::from_utf8(buffer)?;

    assert!(text.contains("data source: demo"));
    assert!(text.contains("records read: 5"));
    assert!(text.contains("vertices: 8"));
    assert!(text.contains("components: 3"));
    assert!(text.contains("next component id: 3"));
    assert!(text.contains("output: results.csv"));
    assert!(text.contains("total: 3ms"));
    Ok(())
}

#[rstest]
fn run_command_emits_tracing_fields() -> TestResult {
    let dir = temp_dir();
    let input = create_text_file(&dir, "unipartite.csv", "e-1,e-2\ne-3,e-4\n")?;
    let output = dir.path().join("results.csv");
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());

    let command = run_args(input, output);
    let summary = tracing::subscriber::with_default(subscriber, || run_command(command))?;
    assert_eq!(summary.components, 2);

    let execute = layer.span("cli.execute").expect("cli.execute span must exist");
    assert!(execute
        .field("input")
        .is_some_and(|value| value.ends_with("unipartite.csv")));
    assert_eq!(execute.field("override_name"), Some("<derived>"));

    let ingest = layer.span("cli.ingest").expect("cli.ingest span must exist");
    assert_eq!(ingest.field("records"), Some("2"));

    let write = layer.span("cli.write").expect("cli.write span must exist");
    assert_eq!(write.field("rows"), Some("4"));

    let registry = layer
        .span("registry.ingest")
        .expect("registry.ingest span must exist");
    assert_eq!(registry.field("data_source"), Some("unipartite"));

    assert!(layer.has_event(Level::INFO, "connected components computed"));
    assert!(layer.has_event(Level::INFO, "vertex to component mapping written"));
    assert!(layer.events().iter().any(|event| {
        event.level == Level::INFO
            && event.message() == Some("command completed")
            && event.field("data_source") == Some("unipartite")
    }));
    Ok(())
}

#[rstest]
fn failed_ingest_still_records_progress() -> TestResult {
    let dir = temp_dir();
    let input = create_text_file(&dir, "edges.csv", "a,b\nc,d,e\n")?;
    let output = dir.path().join("results.csv");
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());

    let command = run_args(input, output);
    let err = tracing::subscriber::with_default(subscriber, || run_command(command))
        .expect_err("second record has three fields");
    assert!(matches!(err, CliError::Core(_)));

    let ingest = layer.span("cli.ingest").expect("cli.ingest span must exist");
    assert_eq!(ingest.field("records"), Some("2"));
    assert!(layer.span("cli.write").is_none());
    Ok(())
}
