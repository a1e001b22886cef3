//! Streaming [`EdgeSource`] over delimited records.
use std::{fs::File, io, path::Path};

use concord_core::{EdgeSource, EdgeSourceError, EntityPair};
use csv::{Reader, ReaderBuilder, StringRecord};
use tracing::debug;

use crate::{errors::CsvEdgeSourceError, options::CsvOptions};

/// Edge source reading one entity pair per delimited record.
///
/// The source stops permanently after the first error.
///
/// # Examples
/// ```
/// use concord_core::{ComponentRegistry, EdgeSource};
/// use concord_providers_csv::{CsvEdgeSource, CsvOptions};
///
/// let input = "e-1,e-2\ne-3,e-4\ne-4,e-1\n";
/// let mut source = CsvEdgeSource::from_reader("edges", input.as_bytes(), CsvOptions::default());
/// let mut registry = ComponentRegistry::new();
/// registry.ingest(&mut source)?;
/// assert_eq!(source.records_read(), 3);
/// assert_eq!(registry.live_component_count(), 1);
/// # Ok::<(), concord_core::ConcordError>(())
/// ```
#[derive(Debug)]
pub struct CsvEdgeSource<R> {
    name: String,
    reader: Reader<R>,
    record: StringRecord,
    records_read: u64,
    finished: bool,
}

impl<R: io::Read> CsvEdgeSource<R> {
    /// Wraps `reader`, parsing it according to `options`.
    #[must_use]
    pub fn from_reader(name: impl Into<String>, reader: R, options: CsvOptions) -> Self {
        let reader = ReaderBuilder::new()
            .delimiter(options.delimiter())
            .has_headers(options.has_headers())
            .flexible(true)
            .from_reader(reader);
        Self {
            name: name.into(),
            reader,
            record: StringRecord::new(),
            records_read: 0,
            finished: false,
        }
    }

    /// Returns how many data records have been read so far.
    #[must_use]
    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    /// Reads the next pair, returning `Ok(None)` once the input is exhausted.
    ///
    /// # Errors
    /// Returns [`CsvEdgeSourceError::MalformedRecord`] when a record does not
    /// have exactly two fields and [`CsvEdgeSourceError::Csv`] when the reader
    /// fails.
    pub fn try_next_pair(&mut self) -> Result<Option<EntityPair>, CsvEdgeSourceError> {
        if self.finished {
            return Ok(None);
        }

        let has_record = self
            .reader
            .read_record(&mut self.record)
            .map_err(|source| {
                self.finished = true;
                CsvEdgeSourceError::Csv {
                    record: self.records_read + 1,
                    source,
                }
            })?;

        if !has_record {
            self.finished = true;
            debug!(
                data_source = self.name.as_str(),
                records = self.records_read,
                "edge file exhausted"
            );
            return Ok(None);
        }

        self.records_read += 1;
        match (self.record.get(0), self.record.get(1), self.record.get(2)) {
            (Some(left), Some(right), None) => Ok(Some(EntityPair::new(left, right))),
            _ => {
                self.finished = true;
                Err(CsvEdgeSourceError::MalformedRecord {
                    record: self.records_read,
                    fields: self.record.len(),
                })
            }
        }
    }
}

impl CsvEdgeSource<File> {
    /// Opens the delimited file at `path`.
    ///
    /// # Errors
    /// Returns [`CsvEdgeSourceError::Io`] when the file cannot be opened.
    pub fn try_from_path(
        name: impl Into<String>,
        path: impl AsRef<Path>,
        options: CsvOptions,
    ) -> Result<Self, CsvEdgeSourceError> {
        let file_path = path.as_ref();
        let file = File::open(file_path).map_err(|source| CsvEdgeSourceError::Io {
            path: file_path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_reader(name, file, options))
    }
}

impl<R: io::Read> EdgeSource for CsvEdgeSource<R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn next_edge(&mut self) -> Option<Result<EntityPair, EdgeSourceError>> {
        self.try_next_pair().map_err(EdgeSourceError::from).transpose()
    }
}
