//! Concord core library.
//!
//! Maintains connected components over a stream of undirected entity pairs.
//! Feed edges to a [`ComponentRegistry`] one at a time (or drain an
//! [`EdgeSource`] with [`ComponentRegistry::ingest`]) and read back the
//! vertex to component mapping through [`ComponentRegistry::sorted_assignments`].
//!
//! # Examples
//! ```
//! use concord_core::ComponentRegistry;
//!
//! let mut registry = ComponentRegistry::new();
//! registry.add_edge("e-1", "e-2");
//! registry.add_edge("e-3", "e-4");
//! registry.add_edge("e-4", "e-1");
//!
//! let ids: Vec<u64> = registry
//!     .sorted_assignments()
//!     .into_iter()
//!     .map(|(_, id)| id.get())
//!     .collect();
//! assert_eq!(ids, [0, 0, 0, 0]);
//! assert_eq!(registry.live_component_count(), 1);
//! ```
mod error;
mod id;
mod projection;
mod registry;
mod source;

pub use crate::{
    error::{ConcordError, ConcordErrorCode, EdgeSourceError, EdgeSourceErrorCode, Result},
    id::ComponentId,
    projection::{Partition, sort_assignments},
    registry::{
        ComponentRegistry, EdgeOutcome, IngestReport, InvariantViolation, RegistryInvariant,
        RegistryInvariantChecker,
    },
    source::{EdgeSource, EntityPair, InMemoryEdgeSource},
};
