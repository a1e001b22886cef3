//! Structural invariant checks for [`ComponentRegistry`].
//!
//! Surfaced through [`ComponentRegistry::invariants`] so property tests can
//! assert registry health after every edge without reaching into private
//! state.

use std::collections::HashSet;

use thiserror::Error;

use super::ComponentRegistry;
use crate::id::ComponentId;

/// Enumerates the structural invariants upheld by the registry.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RegistryInvariant {
    /// The vertex and component mappings are mutual inverses.
    MutualInverse,
    /// Every live component has at least one member.
    NonEmptyComponents,
    /// The live component counter matches the number of live components.
    LiveCount,
    /// Every live identifier was allocated before the current counter.
    AllocatedIds,
}

impl RegistryInvariant {
    /// Returns all invariants in evaluation order.
    #[must_use]
    pub const fn all() -> [Self; 4] {
        [
            Self::MutualInverse,
            Self::NonEmptyComponents,
            Self::LiveCount,
            Self::AllocatedIds,
        ]
    }
}

/// Reports an invariant violation surfaced by [`RegistryInvariantChecker`].
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum InvariantViolation {
    /// A vertex maps to a component whose member list does not contain it.
    #[error("vertex `{vertex}` maps to component {component} but is not listed as a member")]
    MissingMember {
        /// Vertex with the dangling mapping.
        vertex: String,
        /// Component the vertex claims to belong to.
        component: ComponentId,
    },
    /// A component lists a vertex that maps elsewhere or nowhere.
    #[error("component {component} lists `{vertex}`, which maps to {actual:?}")]
    StrayMember {
        /// Component listing the vertex.
        component: ComponentId,
        /// Listed vertex.
        vertex: String,
        /// Component the vertex actually maps to, if any.
        actual: Option<ComponentId>,
    },
    /// A vertex appears more than once across the member lists.
    #[error("vertex `{vertex}` is listed more than once")]
    DuplicateMember {
        /// Vertex listed repeatedly.
        vertex: String,
    },
    /// A live component has no members.
    #[error("component {component} is live but has no members")]
    EmptyComponent {
        /// Offending component.
        component: ComponentId,
    },
    /// The live component counter drifted from the component map.
    #[error("live component count is {recorded} but {actual} components exist")]
    LiveCountMismatch {
        /// Value held by the counter.
        recorded: usize,
        /// Number of keys in the component map.
        actual: usize,
    },
    /// A live component carries an identifier not yet allocated.
    #[error("component {component} is live but the next identifier is {next}")]
    UnallocatedId {
        /// Offending component.
        component: ComponentId,
        /// Identifier the registry would allocate next.
        next: ComponentId,
    },
}

/// Helper returned by [`ComponentRegistry::invariants`] to run structural
/// checks.
#[derive(Debug)]
pub struct RegistryInvariantChecker<'registry> {
    registry: &'registry ComponentRegistry,
}

impl<'registry> RegistryInvariantChecker<'registry> {
    pub(super) const fn new(registry: &'registry ComponentRegistry) -> Self {
        Self { registry }
    }

    /// Runs all invariants, returning the first violation encountered.
    ///
    /// # Errors
    /// Returns the first [`InvariantViolation`] found.
    ///
    /// # Examples
    /// ```
    /// use concord_core::ComponentRegistry;
    ///
    /// let mut registry = ComponentRegistry::new();
    /// registry.add_edge("a", "b");
    /// registry.add_edge("c", "a");
    /// assert!(registry.invariants().check_all().is_ok());
    /// ```
    pub fn check_all(&self) -> Result<(), InvariantViolation> {
        RegistryInvariant::all()
            .into_iter()
            .try_for_each(|invariant| self.check(invariant))
    }

    /// Runs a single invariant.
    ///
    /// # Errors
    /// Returns the first [`InvariantViolation`] found for `invariant`.
    pub fn check(&self, invariant: RegistryInvariant) -> Result<(), InvariantViolation> {
        let mut violations = Vec::new();
        self.run(invariant, &mut violations);
        violations.into_iter().next().map_or(Ok(()), Err)
    }

    /// Executes every invariant and returns the full set of violations.
    #[must_use]
    pub fn collect_all(&self) -> Vec<InvariantViolation> {
        let mut violations = Vec::new();
        for invariant in RegistryInvariant::all() {
            self.run(invariant, &mut violations);
        }
        violations
    }

    fn run(&self, invariant: RegistryInvariant, out: &mut Vec<InvariantViolation>) {
        match invariant {
            RegistryInvariant::MutualInverse => self.mutual_inverse(out),
            RegistryInvariant::NonEmptyComponents => self.non_empty(out),
            RegistryInvariant::LiveCount => self.live_count(out),
            RegistryInvariant::AllocatedIds => self.allocated_ids(out),
        }
    }

    fn mutual_inverse(&self, out: &mut Vec<InvariantViolation>) {
        let registry = self.registry;
        let mut listed = HashSet::with_capacity(registry.vertex_to_component.len());

        for (component, members) in &registry.component_to_vertices {
            for vertex in members {
                if !listed.insert(vertex.as_str()) {
                    out.push(InvariantViolation::DuplicateMember {
                        vertex: vertex.clone(),
                    });
                }
                let actual = registry.vertex_to_component.get(vertex).copied();
                if actual != Some(*component) {
                    out.push(InvariantViolation::StrayMember {
                        component: *component,
                        vertex: vertex.clone(),
                        actual,
                    });
                }
            }
        }

        for (vertex, component) in &registry.vertex_to_component {
            if !listed.contains(vertex.as_str()) {
                out.push(InvariantViolation::MissingMember {
                    vertex: vertex.clone(),
                    component: *component,
                });
            }
        }
    }

    fn non_empty(&self, out: &mut Vec<InvariantViolation>) {
        out.extend(
            self.registry
                .component_to_vertices
                .iter()
                .filter(|(_, members)| members.is_empty())
                .map(|(component, _)| InvariantViolation::EmptyComponent {
                    component: *component,
                }),
        );
    }

    fn live_count(&self, out: &mut Vec<InvariantViolation>) {
        let recorded = self.registry.live_component_count;
        let actual = self.registry.component_to_vertices.len();
        if recorded != actual {
            out.push(InvariantViolation::LiveCountMismatch { recorded, actual });
        }
    }

    fn allocated_ids(&self, out: &mut Vec<InvariantViolation>) {
        let next = self.registry.next_component_id;
        out.extend(
            self.registry
                .component_to_vertices
                .keys()
                .filter(|component| **component >= next)
                .map(|component| InvariantViolation::UnallocatedId {
                    component: *component,
                    next,
                }),
        );
    }
}
