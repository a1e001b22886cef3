//! Deterministic views over registry state.
//!
//! Hash map iteration order is unspecified, so anything that leaves the
//! registry (rendered output, test assertions) goes through one of these
//! projections first.

use std::collections::HashMap;
use std::hash::BuildHasher;

use crate::id::ComponentId;

/// Sorts a vertex to component mapping by vertex identifier.
///
/// Ordering is plain byte-wise lexicographic ordering of the identifiers.
///
/// # Examples
/// ```
/// use std::collections::HashMap;
/// use concord_core::{ComponentId, sort_assignments};
///
/// let mapping = HashMap::from([
///     ("e-4".to_owned(), ComponentId::new(2)),
///     ("e-1".to_owned(), ComponentId::new(0)),
///     ("e-2".to_owned(), ComponentId::new(0)),
/// ]);
/// let sorted: Vec<(&str, u64)> = sort_assignments(&mapping)
///     .into_iter()
///     .map(|(vertex, id)| (vertex, id.get()))
///     .collect();
/// assert_eq!(sorted, [("e-1", 0), ("e-2", 0), ("e-4", 2)]);
/// ```
#[must_use]
pub fn sort_assignments<S: BuildHasher>(
    mapping: &HashMap<String, ComponentId, S>,
) -> Vec<(&str, ComponentId)> {
    let mut assignments: Vec<(&str, ComponentId)> = mapping
        .iter()
        .map(|(vertex, id)| (vertex.as_str(), *id))
        .collect();
    assignments.sort_unstable_by(|(left, _), (right, _)| left.as_bytes().cmp(right.as_bytes()));
    assignments
}

/// Label-free grouping of vertices into components.
///
/// Members of each group are sorted, then the groups themselves are sorted,
/// so two partitions compare equal exactly when they group the same vertices
/// together regardless of which identifiers the groups carried.
///
/// # Examples
/// ```
/// use concord_core::Partition;
///
/// let left = Partition::from_groups([vec!["b", "a"], vec!["c"]]);
/// let right = Partition::from_groups([vec!["c"], vec!["a", "b"]]);
/// assert_eq!(left, right);
/// assert_eq!(left.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Partition {
    groups: Vec<Vec<String>>,
}

impl Partition {
    /// Builds a canonical partition from arbitrary groups.
    #[must_use]
    pub fn from_groups<G, V>(groups: impl IntoIterator<Item = G>) -> Self
    where
        G: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let mut groups: Vec<Vec<String>> = groups
            .into_iter()
            .map(|group| {
                let mut members: Vec<String> = group.into_iter().map(Into::into).collect();
                members.sort_unstable();
                members
            })
            .collect();
        groups.sort_unstable();
        Self { groups }
    }

    /// Returns the canonical groups.
    #[must_use]
    pub fn groups(&self) -> &[Vec<String>] {
        &self.groups
    }

    /// Returns the number of groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns whether the partition has no groups.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
