//! Component identifiers handed out by the [`crate::ComponentRegistry`].

use std::fmt;

/// Identifier assigned to a connected component.
///
/// Identifiers are allocated monotonically from zero. A merged-away
/// identifier is retired and never handed out again.
///
/// # Examples
/// ```
/// use concord_core::ComponentId;
///
/// let id = ComponentId::new(4);
/// assert_eq!(id.get(), 4);
/// assert_eq!(id.to_string(), "4");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ComponentId(u64);

impl ComponentId {
    /// Creates a new component identifier.
    ///
    /// # Examples
    /// ```
    /// use concord_core::ComponentId;
    ///
    /// let id = ComponentId::new(2);
    /// assert_eq!(id.get(), 2);
    /// ```
    #[rustfmt::skip]
    #[must_use]
    pub const fn new(id: u64) -> Self { Self(id) }

    /// Returns the underlying numeric identifier.
    #[rustfmt::skip]
    #[must_use]
    pub const fn get(self) -> u64 { self.0 }

    /// Returns the identifier allocated after `self`.
    ///
    /// Saturates at [`u64::MAX`]; a registry would exhaust memory long before
    /// reaching it.
    #[must_use]
    pub(crate) const fn successor(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<ComponentId> for u64 {
    fn from(id: ComponentId) -> Self {
        id.0
    }
}

/// Orders two identifiers as `(lower, higher)`.
///
/// Equal identifiers are returned unchanged.
#[must_use]
pub(crate) fn min_max(left: ComponentId, right: ComponentId) -> (ComponentId, ComponentId) {
    if left <= right {
        (left, right)
    } else {
        (right, left)
    }
}
