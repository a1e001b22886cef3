//! Incremental connected-component maintenance.
//!
//! [`ComponentRegistry`] consumes undirected edges one at a time and keeps
//! two mappings in lock-step: every seen vertex to its component, and every
//! live component to its ordered member list. Merges always fold the
//! higher-numbered component into the lower-numbered one and relabel the
//! absorbed members eagerly, so the public mapping is exact after every call.

mod ingest;
mod invariants;

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::{
    id::{ComponentId, min_max},
    projection::{Partition, sort_assignments},
    source::EntityPair,
};

pub use self::{
    ingest::IngestReport,
    invariants::{InvariantViolation, RegistryInvariant, RegistryInvariantChecker},
};

/// Describes the state transition caused by a single [`ComponentRegistry::add_edge`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeOutcome {
    /// Both endpoints were unseen; a fresh component was allocated.
    Created {
        /// Identifier of the new component.
        component: ComponentId,
    },
    /// Exactly one endpoint was unseen and joined the other's component.
    Extended {
        /// Component that gained the new vertex.
        component: ComponentId,
    },
    /// Both endpoints already shared a component; nothing changed.
    Redundant {
        /// Component shared by both endpoints.
        component: ComponentId,
    },
    /// The endpoints belonged to different components which were merged.
    Merged {
        /// Higher-numbered component that was retired.
        absorbed: ComponentId,
        /// Lower-numbered component that received the absorbed members.
        into: ComponentId,
        /// Number of vertices relabelled.
        moved: usize,
    },
}

impl EdgeOutcome {
    /// Returns the component both endpoints belong to after the call.
    ///
    /// # Examples
    /// ```
    /// use concord_core::{ComponentId, ComponentRegistry};
    ///
    /// let mut registry = ComponentRegistry::new();
    /// let outcome = registry.add_edge("a", "b");
    /// assert_eq!(outcome.component(), ComponentId::new(0));
    /// ```
    #[must_use]
    pub const fn component(self) -> ComponentId {
        match self {
            Self::Created { component }
            | Self::Extended { component }
            | Self::Redundant { component } => component,
            Self::Merged { into, .. } => into,
        }
    }

    /// Returns whether the call mutated registry state.
    #[must_use]
    pub const fn is_mutation(self) -> bool {
        !matches!(self, Self::Redundant { .. })
    }
}

/// Owns the vertex/component bookkeeping for one edge stream.
///
/// # Examples
/// ```
/// use concord_core::{ComponentId, ComponentRegistry};
///
/// let mut registry = ComponentRegistry::new();
/// registry.add_edge("e-1", "e-2");
/// registry.add_edge("e-3", "e-4");
/// assert_eq!(registry.live_component_count(), 2);
///
/// registry.add_edge("e-4", "e-1");
/// assert_eq!(registry.live_component_count(), 1);
/// assert_eq!(registry.component_of("e-3"), Some(ComponentId::new(0)));
/// assert_eq!(registry.next_component_id(), ComponentId::new(2));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ComponentRegistry {
    vertex_to_component: HashMap<String, ComponentId>,
    component_to_vertices: HashMap<ComponentId, Vec<String>>,
    next_component_id: ComponentId,
    live_component_count: usize,
}

impl ComponentRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry sized for roughly `vertices` distinct vertices.
    #[must_use]
    pub fn with_capacity(vertices: usize) -> Self {
        Self {
            vertex_to_component: HashMap::with_capacity(vertices),
            component_to_vertices: HashMap::new(),
            next_component_id: ComponentId::default(),
            live_component_count: 0,
        }
    }

    /// Applies the undirected edge `left`–`right`.
    ///
    /// Unseen vertices are created on first sight. When the endpoints sit in
    /// different components the higher-numbered component is folded into the
    /// lower-numbered one, preserving member order. A self-loop on an unseen
    /// vertex creates a single-member component. The call never fails.
    ///
    /// # Examples
    /// ```
    /// use concord_core::{ComponentId, ComponentRegistry, EdgeOutcome};
    ///
    /// let mut registry = ComponentRegistry::new();
    /// assert_eq!(
    ///     registry.add_edge("e-9", "e-9"),
    ///     EdgeOutcome::Created { component: ComponentId::new(0) }
    /// );
    /// assert_eq!(registry.members(ComponentId::new(0)), Some(&["e-9".to_owned()][..]));
    /// ```
    pub fn add_edge(&mut self, left: &str, right: &str) -> EdgeOutcome {
        let left_component = self.vertex_to_component.get(left).copied();
        let right_component = self.vertex_to_component.get(right).copied();

        match (left_component, right_component) {
            (None, None) => self.create_component(left, right),
            (Some(component), None) => self.attach(right, component),
            (None, Some(component)) => self.attach(left, component),
            (Some(lhs), Some(rhs)) if lhs == rhs => EdgeOutcome::Redundant { component: lhs },
            (Some(lhs), Some(rhs)) => self.merge(lhs, rhs),
        }
    }

    /// Applies the edge described by `pair`.
    pub fn add_pair(&mut self, pair: &EntityPair) -> EdgeOutcome {
        self.add_edge(pair.left(), pair.right())
    }

    /// Returns the component currently holding `vertex`.
    #[must_use]
    pub fn component_of(&self, vertex: &str) -> Option<ComponentId> {
        self.vertex_to_component.get(vertex).copied()
    }

    /// Returns the members of a live component in insertion order.
    #[must_use]
    pub fn members(&self, component: ComponentId) -> Option<&[String]> {
        self.component_to_vertices
            .get(&component)
            .map(Vec::as_slice)
    }

    /// Returns every live component with its members, ordered by identifier.
    #[must_use]
    pub fn components(&self) -> Vec<(ComponentId, &[String])> {
        let mut components: Vec<(ComponentId, &[String])> = self
            .component_to_vertices
            .iter()
            .map(|(id, members)| (*id, members.as_slice()))
            .collect();
        components.sort_unstable_by_key(|(id, _)| *id);
        components
    }

    /// Returns the vertex to component mapping.
    #[must_use]
    pub fn vertex_to_component(&self) -> &HashMap<String, ComponentId> {
        &self.vertex_to_component
    }

    /// Returns how many distinct vertices have been seen.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertex_to_component.len()
    }

    /// Returns how many components are currently live.
    #[must_use]
    pub fn live_component_count(&self) -> usize {
        self.live_component_count
    }

    /// Returns the identifier the next new component will receive.
    #[must_use]
    pub fn next_component_id(&self) -> ComponentId {
        self.next_component_id
    }

    /// Returns whether no vertex has been seen yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertex_to_component.is_empty()
    }

    /// Returns `(vertex, component)` pairs sorted byte-wise by vertex.
    ///
    /// # Examples
    /// ```
    /// use concord_core::ComponentRegistry;
    ///
    /// let mut registry = ComponentRegistry::new();
    /// registry.add_edge("b", "a");
    /// let sorted: Vec<(&str, u64)> = registry
    ///     .sorted_assignments()
    ///     .into_iter()
    ///     .map(|(vertex, id)| (vertex, id.get()))
    ///     .collect();
    /// assert_eq!(sorted, [("a", 0), ("b", 0)]);
    /// ```
    #[must_use]
    pub fn sorted_assignments(&self) -> Vec<(&str, ComponentId)> {
        sort_assignments(&self.vertex_to_component)
    }

    /// Returns the label-free partition of the seen vertices.
    #[must_use]
    pub fn partition(&self) -> Partition {
        Partition::from_groups(self.component_to_vertices.values().cloned())
    }

    /// Returns a checker for the registry's structural invariants.
    #[must_use]
    pub fn invariants(&self) -> RegistryInvariantChecker<'_> {
        RegistryInvariantChecker::new(self)
    }

    /// Checks every structural invariant.
    ///
    /// # Errors
    /// Returns the first [`InvariantViolation`] found.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        self.invariants().check_all()
    }

    fn create_component(&mut self, left: &str, right: &str) -> EdgeOutcome {
        let component = self.next_component_id;
        let members = if left == right {
            vec![left.to_owned()]
        } else {
            vec![left.to_owned(), right.to_owned()]
        };
        for vertex in &members {
            self.vertex_to_component.insert(vertex.clone(), component);
        }
        self.component_to_vertices.insert(component, members);
        self.next_component_id = component.successor();
        self.live_component_count += 1;
        record_created();
        trace!(component = %component, "created component");
        EdgeOutcome::Created { component }
    }

    fn attach(&mut self, vertex: &str, component: ComponentId) -> EdgeOutcome {
        self.vertex_to_component
            .insert(vertex.to_owned(), component);
        self.component_to_vertices
            .entry(component)
            .or_default()
            .push(vertex.to_owned());
        EdgeOutcome::Extended { component }
    }

    fn merge(&mut self, lhs: ComponentId, rhs: ComponentId) -> EdgeOutcome {
        let (into, absorbed) = min_max(lhs, rhs);
        let relabelled = self
            .component_to_vertices
            .remove(&absorbed)
            .unwrap_or_default();
        for vertex in &relabelled {
            if let Some(slot) = self.vertex_to_component.get_mut(vertex) {
                *slot = into;
            }
        }
        let moved = relabelled.len();
        self.component_to_vertices
            .entry(into)
            .or_default()
            .extend(relabelled);
        self.live_component_count = self.live_component_count.saturating_sub(1);
        record_merge(moved);
        debug!(absorbed = %absorbed, into = %into, moved, "merged components");
        EdgeOutcome::Merged {
            absorbed,
            into,
            moved,
        }
    }
}

#[cfg(feature = "metrics")]
fn record_created() {
    metrics::counter!("registry_components_created").increment(1);
}

#[cfg(not(feature = "metrics"))]
fn record_created() {}

#[cfg(feature = "metrics")]
fn record_merge(moved: usize) {
    metrics::counter!("registry_merges").increment(1);
    metrics::counter!("registry_vertices_relabelled").increment(moved as u64);
}

#[cfg(not(feature = "metrics"))]
fn record_merge(_moved: usize) {}
