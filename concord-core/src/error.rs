//! Error types for the Concord core library.
//!
//! The registry itself is total; these errors describe failures of the edge
//! sources that feed it and are surfaced between, never during, edge
//! applications.

use std::sync::Arc;

use thiserror::Error;

/// Generates a stable code enum for an error type.
///
/// Each entry maps a code variant to the error variant pattern it describes,
/// written either `Variant { .. }` or `Variant(..)`.
#[doc(hidden)]
#[macro_export]
macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident
                    $( { $($pattern:tt)* } )?
                    $( ( $($tuple:tt)* ) )?
                    => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl ::core::fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(
                        Self::$ErrVariant $( { $($pattern)* } )? $( ( $($tuple)* ) )?
                            => $CodeTy::$CodeVariant,
                    )+
                }
            }
        }
    };
}

/// An error produced by [`crate::EdgeSource`] implementations.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum EdgeSourceError {
    /// A record did not contain exactly two entity identifiers.
    #[error("record {record} has {fields} field(s); expected exactly 2")]
    MalformedRecord {
        /// One-based position of the offending record.
        record: u64,
        /// Number of fields the record actually contained.
        fields: usize,
    },
    /// The underlying reader failed.
    #[error("failed to read edge record: {message}")]
    Read {
        /// Description of the underlying failure.
        message: String,
    },
}

define_error_codes! {
    /// Stable codes describing [`EdgeSourceError`] variants.
    enum EdgeSourceErrorCode for EdgeSourceError {
        /// A record did not contain exactly two entity identifiers.
        MalformedRecord => MalformedRecord { .. } => "EDGE_SOURCE_MALFORMED_RECORD",
        /// The underlying reader failed.
        Read => Read { .. } => "EDGE_SOURCE_READ",
    }
}

/// Error type produced while driving a [`crate::ComponentRegistry`] from an
/// edge source.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ConcordError {
    /// An [`crate::EdgeSource`] failed while edges were being ingested.
    #[error("edge source `{data_source}` failed: {error}")]
    EdgeSource {
        /// Identifier for the edge source that produced the error.
        data_source: Arc<str>,
        /// Underlying edge source error.
        #[source]
        error: EdgeSourceError,
    },
}

define_error_codes! {
    /// Stable codes describing [`ConcordError`] variants.
    enum ConcordErrorCode for ConcordError {
        /// An [`crate::EdgeSource`] failed while edges were being ingested.
        EdgeSourceFailure => EdgeSource { .. } => "CONCORD_EDGE_SOURCE_FAILURE",
    }
}

impl ConcordError {
    /// Retrieve the inner [`EdgeSourceErrorCode`] when the error originated in
    /// an [`crate::EdgeSource`].
    #[must_use]
    pub const fn edge_source_code(&self) -> Option<EdgeSourceErrorCode> {
        match self {
            Self::EdgeSource { error, .. } => Some(error.code()),
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, ConcordError>;
