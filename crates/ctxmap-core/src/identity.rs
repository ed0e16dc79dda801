//! Element identity for model nodes.
//!
//! Every element of a [`Model`](crate::model::Model) is wrapped in an
//! [`Identified`] value that carries a process-unique [`ElementId`].
//! Identities exist so that collaborators can address an element that was
//! handed out earlier; they never take part in equality or ordering.

use std::{
    fmt,
    ops::{Deref, DerefMut},
    sync::atomic::{AtomicU64, Ordering},
};

/// Source of fresh identities.
static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identity assigned to a model element.
///
/// # Examples
///
/// ```
/// use ctxmap_core::identity::ElementId;
///
/// let a = ElementId::fresh();
/// let b = ElementId::fresh();
/// assert_ne!(a, b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

impl ElementId {
    /// Allocates a new identity that has never been handed out before.
    pub fn fresh() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw numeric value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A model element paired with its identity.
///
/// `Identified<T>` derefs to `T`, so fields of the wrapped element are read
/// directly (`entity.name`). Equality compares only the wrapped value,
/// which keeps two models built from the same text equal even though their
/// identities differ.
#[derive(Debug, Clone)]
pub struct Identified<T> {
    id: ElementId,
    value: T,
}

impl<T> Identified<T> {
    /// Wraps `value` with a fresh identity.
    pub fn new(value: T) -> Self {
        Self {
            id: ElementId::fresh(),
            value,
        }
    }

    /// Returns the identity of this element.
    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Get a reference to the underlying value
    pub fn inner(&self) -> &T {
        &self.value
    }

    /// Consume the wrapper and return just the inner value
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T> From<T> for Identified<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T> Deref for Identified<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl<T> DerefMut for Identified<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.value
    }
}

// PartialEq compares only the inner values, ignoring identity
impl<T: PartialEq> PartialEq for Identified<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value.eq(&other.value)
    }
}

impl<T: Eq> Eq for Identified<T> {}
