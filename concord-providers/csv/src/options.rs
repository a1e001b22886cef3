//! Parsing options for [`crate::CsvEdgeSource`].

/// Controls how edge records are parsed.
///
/// # Examples
/// ```
/// use concord_providers_csv::CsvOptions;
///
/// let options = CsvOptions::default().with_delimiter(b'\t').with_headers(true);
/// assert_eq!(options.delimiter(), b'\t');
/// assert!(options.has_headers());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    delimiter: u8,
    has_headers: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_headers: false,
        }
    }
}

impl CsvOptions {
    /// Overrides the field delimiter.
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Treats the first record as a header row and skips it.
    #[must_use]
    pub const fn with_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }

    /// Returns the field delimiter.
    #[must_use]
    pub const fn delimiter(&self) -> u8 {
        self.delimiter
    }

    /// Returns whether the first record is a header row.
    #[must_use]
    pub const fn has_headers(&self) -> bool {
        self.has_headers
    }
}
