//! Delimited-file edge source for the Concord component registry.
//!
//! Each record of the input holds exactly two entity identifiers; records are
//! streamed one at a time so arbitrarily large edge lists never need to fit
//! in memory.

mod errors;
mod options;
mod source;

pub use errors::CsvEdgeSourceError;
pub use options::CsvOptions;
pub use source::CsvEdgeSource;
