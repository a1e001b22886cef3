//! Edge source abstractions feeding the [`crate::ComponentRegistry`].

use std::collections::VecDeque;

use crate::error::EdgeSourceError;

/// Two entities linked by an undirected edge.
///
/// # Examples
/// ```
/// use concord_core::EntityPair;
///
/// let pair = EntityPair::new("e-1", "e-2");
/// assert_eq!(pair.left(), "e-1");
/// assert_eq!(pair.right(), "e-2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityPair {
    left: String,
    right: String,
}

impl EntityPair {
    /// Creates a pair from two entity identifiers.
    #[must_use]
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }

    /// Returns the first entity identifier.
    #[must_use]
    pub fn left(&self) -> &str {
        &self.left
    }

    /// Returns the second entity identifier.
    #[must_use]
    pub fn right(&self) -> &str {
        &self.right
    }

    /// Returns the same edge with its endpoints swapped.
    #[must_use]
    pub fn reversed(self) -> Self {
        Self {
            left: self.right,
            right: self.left,
        }
    }

    /// Consumes the pair, returning `(left, right)`.
    #[must_use]
    pub fn into_parts(self) -> (String, String) {
        (self.left, self.right)
    }
}

impl<L, R> From<(L, R)> for EntityPair
where
    L: Into<String>,
    R: Into<String>,
{
    fn from((left, right): (L, R)) -> Self {
        Self::new(left, right)
    }
}

/// Ordered, finite producer of [`EntityPair`]s.
///
/// Implementations yield `None` once exhausted. A yielded error is fatal:
/// callers stop pulling edges after the first failure.
///
/// # Examples
/// ```
/// use concord_core::{EdgeSource, EdgeSourceError, EntityPair};
///
/// struct Single(Option<EntityPair>);
///
/// impl EdgeSource for Single {
///     fn name(&self) -> &str { "single" }
///     fn next_edge(&mut self) -> Option<Result<EntityPair, EdgeSourceError>> {
///         self.0.take().map(Ok)
///     }
/// }
///
/// let mut source = Single(Some(EntityPair::new("a", "b")));
/// assert_eq!(source.name(), "single");
/// assert!(source.next_edge().is_some());
/// assert!(source.next_edge().is_none());
/// ```
pub trait EdgeSource {
    /// Returns a human-readable name.
    fn name(&self) -> &str;

    /// Pulls the next edge from the source.
    fn next_edge(&mut self) -> Option<Result<EntityPair, EdgeSourceError>>;
}

/// [`EdgeSource`] backed by an in-memory list of pairs.
///
/// # Examples
/// ```
/// use concord_core::{ComponentRegistry, InMemoryEdgeSource};
///
/// let mut source = InMemoryEdgeSource::new("demo", [("e-1", "e-2"), ("e-3", "e-4")]);
/// let mut registry = ComponentRegistry::new();
/// let report = registry.ingest(&mut source)?;
/// assert_eq!(report.edges(), 2);
/// assert_eq!(registry.live_component_count(), 2);
/// # Ok::<(), concord_core::ConcordError>(())
/// ```
#[derive(Debug, Clone)]
pub struct InMemoryEdgeSource {
    name: String,
    pending: VecDeque<EntityPair>,
}

impl InMemoryEdgeSource {
    /// Creates a source that yields `pairs` in order.
    #[must_use]
    pub fn new<P>(name: impl Into<String>, pairs: impl IntoIterator<Item = P>) -> Self
    where
        P: Into<EntityPair>,
    {
        Self {
            name: name.into(),
            pending: pairs.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns how many pairs are still pending.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl EdgeSource for InMemoryEdgeSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn next_edge(&mut self) -> Option<Result<EntityPair, EdgeSourceError>> {
        self.pending.pop_front().map(Ok)
    }
}
