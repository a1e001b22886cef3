//! Drives a [`ComponentRegistry`] from an [`EdgeSource`].

use std::sync::Arc;

use tracing::{Span, field, info, instrument};

use super::{ComponentRegistry, EdgeOutcome};
use crate::{
    Result,
    error::ConcordError,
    source::EdgeSource,
};

/// Tally of the transitions applied while draining an edge source.
///
/// # Examples
/// ```
/// use concord_core::{ComponentRegistry, InMemoryEdgeSource};
///
/// let mut source = InMemoryEdgeSource::new(
///     "demo",
///     [("e-1", "e-2"), ("e-3", "e-4"), ("e-4", "e-1"), ("e-2", "e-1")],
/// );
/// let mut registry = ComponentRegistry::new();
/// let report = registry.ingest(&mut source)?;
/// assert_eq!(report.edges(), 4);
/// assert_eq!(report.created(), 2);
/// assert_eq!(report.merges(), 1);
/// assert_eq!(report.redundant(), 1);
/// # Ok::<(), concord_core::ConcordError>(())
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    edges: u64,
    created: u64,
    extended: u64,
    redundant: u64,
    merges: u64,
    relabelled: u64,
}

impl IngestReport {
    /// Total number of edges applied.
    #[must_use]
    pub fn edges(&self) -> u64 {
        self.edges
    }

    /// Number of edges that created a component.
    #[must_use]
    pub fn created(&self) -> u64 {
        self.created
    }

    /// Number of edges that added a vertex to an existing component.
    #[must_use]
    pub fn extended(&self) -> u64 {
        self.extended
    }

    /// Number of edges that changed nothing.
    #[must_use]
    pub fn redundant(&self) -> u64 {
        self.redundant
    }

    /// Number of edges that merged two components.
    #[must_use]
    pub fn merges(&self) -> u64 {
        self.merges
    }

    /// Total number of vertices relabelled across all merges.
    #[must_use]
    pub fn relabelled(&self) -> u64 {
        self.relabelled
    }

    fn record(&mut self, outcome: EdgeOutcome) {
        self.edges += 1;
        match outcome {
            EdgeOutcome::Created { .. } => self.created += 1,
            EdgeOutcome::Extended { .. } => self.extended += 1,
            EdgeOutcome::Redundant { .. } => self.redundant += 1,
            EdgeOutcome::Merged { moved, .. } => {
                self.merges += 1;
                self.relabelled += moved as u64;
            }
        }
    }
}

impl ComponentRegistry {
    /// Applies every edge produced by `source`, in order.
    ///
    /// Edges applied before a failure remain applied; the registry is left in
    /// a consistent state describing that prefix of the stream.
    ///
    /// # Errors
    /// Returns [`ConcordError::EdgeSource`] when the source yields an error.
    #[instrument(
        name = "registry.ingest",
        err,
        skip(self, source),
        fields(data_source = field::Empty, edges = field::Empty),
    )]
    pub fn ingest<S>(&mut self, source: &mut S) -> Result<IngestReport>
    where
        S: EdgeSource + ?Sized,
    {
        let span = Span::current();
        span.record("data_source", field::display(source.name()));

        let mut report = IngestReport::default();
        while let Some(next) = source.next_edge() {
            let pair = next.map_err(|error| {
                span.record("edges", report.edges);
                ConcordError::EdgeSource {
                    data_source: Arc::from(source.name()),
                    error,
                }
            })?;
            report.record(self.add_pair(&pair));
        }

        span.record("edges", report.edges);
        info!(
            edges = report.edges,
            vertices = self.vertex_count(),
            components = self.live_component_count(),
            merges = report.merges,
            "edge source drained"
        );
        Ok(report)
    }
}
