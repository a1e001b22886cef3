//! Delimited emitter for the vertex to component mapping.
//!
//! The file starts with an `Entity ID<d>Component ID` header followed by one
//! line per vertex in the order the caller supplies, which for
//! [`ComponentRegistry::sorted_assignments`](concord_core::ComponentRegistry::sorted_assignments)
//! is ascending byte order of the vertex identifier.

use std::{
    borrow::Cow,
    fmt,
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
    str::FromStr,
};

use concord_core::ComponentId;
use thiserror::Error;

const ENTITY_COLUMN: &str = "Entity ID";
const COMPONENT_COLUMN: &str = "Component ID";

/// Errors raised while emitting results.
#[derive(Debug, Error)]
pub enum OutputError {
    /// The requested field delimiter was empty.
    #[error("cannot use a blank delimiter")]
    BlankDelimiter,
    /// The output file could not be created.
    #[error("failed to create `{path}`: {source}")]
    Create {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// Writing to the output file failed part-way.
    #[error("failed to write `{path}`: {source}")]
    Write {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
}

/// Non-empty field separator used by the emitter.
///
/// Multi-character separators are written verbatim; fields are never quoted.
///
/// # Examples
/// ```
/// use concord_cli::output::{Delimiter, OutputError};
///
/// let pipe: Delimiter = "|".parse()?;
/// assert_eq!(pipe.as_str(), "|");
/// assert!(matches!(Delimiter::new(""), Err(OutputError::BlankDelimiter)));
/// # Ok::<(), OutputError>(())
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Delimiter(String);

impl Delimiter {
    /// Validates and wraps `raw`.
    ///
    /// # Errors
    /// Returns [`OutputError::BlankDelimiter`] when `raw` is empty.
    pub fn new(raw: impl Into<String>) -> Result<Self, OutputError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(OutputError::BlankDelimiter);
        }
        Ok(Self(raw))
    }

    /// Returns the separator text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Delimiter {
    fn default() -> Self {
        Self(",".to_owned())
    }
}

impl FromStr for Delimiter {
    type Err = OutputError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::new(raw)
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns the header line, without a trailing newline.
#[must_use]
pub fn results_header(delimiter: &Delimiter) -> String {
    format!("{ENTITY_COLUMN}{delimiter}{COMPONENT_COLUMN}")
}

/// Writes the header and one record per assignment to `writer`.
///
/// Vertex identifiers containing the delimiter, a double quote, or a line
/// break are enclosed in double quotes with inner quotes doubled, so every
/// vertex occupies exactly one record. Returns the number of records written.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// use concord_cli::output::{Delimiter, render_assignments};
/// use concord_core::ComponentRegistry;
///
/// let mut registry = ComponentRegistry::new();
/// registry.add_edge("e-2", "e-1");
/// let mut buffer = Vec::new();
/// let rows = render_assignments(registry.sorted_assignments(), &Delimiter::default(), &mut buffer)?;
/// assert_eq!(rows, 2);
/// assert_eq!(buffer, b"Entity ID,Component ID\ne-1,0\ne-2,0\n");
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn render_assignments<'a, I>(
    assignments: I,
    delimiter: &Delimiter,
    mut writer: impl Write,
) -> io::Result<u64>
where
    I: IntoIterator<Item = (&'a str, ComponentId)>,
{
    writeln!(writer, "{}", results_header(delimiter))?;
    let mut rows = 0_u64;
    for (vertex, component) in assignments {
        writeln!(writer, "{}{delimiter}{component}", quote_field(vertex, delimiter))?;
        rows += 1;
    }
    Ok(rows)
}

fn quote_field<'a>(field: &'a str, delimiter: &Delimiter) -> Cow<'a, str> {
    let needs_quotes = field.contains(delimiter.as_str())
        || field.contains(['"', '\n', '\r']);
    if needs_quotes {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Creates or truncates `path` and renders the assignments into it.
///
/// # Errors
/// Returns [`OutputError::Create`] when the file cannot be created and
/// [`OutputError::Write`] when writing or flushing fails.
pub fn write_assignments_to_path<'a, I>(
    path: &Path,
    assignments: I,
    delimiter: &Delimiter,
) -> Result<u64, OutputError>
where
    I: IntoIterator<Item = (&'a str, ComponentId)>,
{
    let file = File::create(path).map_err(|source| OutputError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    let write_error = |source| OutputError::Write {
        path: path.to_path_buf(),
        source,
    };
    let rows = render_assignments(assignments, delimiter, &mut writer).map_err(write_error)?;
    writer.flush().map_err(write_error)?;
    Ok(rows)
}
