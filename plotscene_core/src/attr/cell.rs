// Copyright 2026 the Plotscene Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node attribute cells.
//!
//! Each cell implements one [`AttributeKind`]. Cells only manage their own
//! storage; change notification is driven by the
//! [`Scene`](crate::scene::Scene), which owns both the cells and the registry
//! that knows who depends on whom.

use alloc::boxed::Box;
use core::any::Any;
use core::fmt;
use core::mem;

use super::spec::{AttributeKind, AttributeValue, Compute, Provider};

/// Object-safe view of a cell, used by [`AttributeBag`](super::AttributeBag)
/// to store cells of different value types side by side.
pub(crate) trait ErasedAttribute: fmt::Debug {
    fn kind(&self) -> AttributeKind;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Marks a Derived cell dirty. Returns `true` on a clean to dirty
    /// transition; always `false` for other kinds.
    fn invalidate(&mut self) -> bool {
        false
    }

    /// Clones the value of a Variable cell.
    fn value_boxed(&self) -> Option<Box<dyn Any>> {
        None
    }

    /// Applies an inherited value to a Variable cell whose value type matches.
    /// Returns the previous value when the stored value changed.
    fn inherit_boxed(&mut self, value: &dyn Any) -> Option<Box<dyn Any>> {
        _ = value;
        None
    }
}

/// A stored attribute.
///
/// Starts out holding its initial value with [`is_default`](Self::is_default)
/// set. An explicit [`set`](Self::set) clears the flag; after that, values
/// pushed down from a container via [`inherit_value`](Self::inherit_value)
/// are ignored.
#[derive(Clone, Debug)]
pub struct VariableAttribute<T> {
    value: T,
    is_default: bool,
}

impl<T: AttributeValue> VariableAttribute<T> {
    /// Creates a cell holding `initial` as its default.
    #[must_use]
    pub fn new(initial: T) -> Self {
        Self {
            value: initial,
            is_default: true,
        }
    }

    /// Returns the current value.
    #[must_use]
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Whether the value was never set explicitly.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.is_default
    }

    /// Stores `value` and clears the default flag.
    ///
    /// Writing the value that is already stored only clears the flag.
    /// Returns the previous value when it changed.
    pub fn set(&mut self, value: T) -> Option<T> {
        self.is_default = false;
        if self.value == value {
            return None;
        }
        Some(mem::replace(&mut self.value, value))
    }

    /// Stores `value` only while the cell still holds a default value.
    ///
    /// Never clears the default flag. Returns the previous value when it
    /// changed.
    pub fn inherit_value(&mut self, value: T) -> Option<T> {
        if !self.is_default || self.value == value {
            return None;
        }
        Some(mem::replace(&mut self.value, value))
    }
}

impl<T: AttributeValue> ErasedAttribute for VariableAttribute<T> {
    fn kind(&self) -> AttributeKind {
        AttributeKind::Variable
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn value_boxed(&self) -> Option<Box<dyn Any>> {
        Some(Box::new(self.value.clone()))
    }

    fn inherit_boxed(&mut self, value: &dyn Any) -> Option<Box<dyn Any>> {
        let value = value.downcast_ref::<T>()?;
        self.inherit_value(value.clone())
            .map(|old| Box::new(old) as Box<dyn Any>)
    }
}

/// A lazily computed attribute.
///
/// Starts dirty. [`invalidate`](Self::invalidate) only flips the flag; the
/// provider runs on the next read.
pub struct DerivedAttribute<T> {
    cache: Option<T>,
    dirty: bool,
    provider: Provider<T>,
}

impl<T: AttributeValue> DerivedAttribute<T> {
    /// Creates a dirty cell backed by `provider`.
    #[must_use]
    pub fn new(provider: Provider<T>) -> Self {
        Self {
            cache: None,
            dirty: true,
            provider,
        }
    }

    /// Whether the next read recomputes.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns the cached value without recomputing.
    #[must_use]
    pub fn cached(&self) -> Option<&T> {
        self.cache.as_ref()
    }

    /// Returns the fresh cached value, or `None` if a recomputation is due.
    #[must_use]
    pub fn fresh(&self) -> Option<&T> {
        if self.dirty {
            None
        } else {
            self.cache.as_ref()
        }
    }

    /// Marks the cell dirty. Returns `true` if it was clean.
    pub fn invalidate(&mut self) -> bool {
        !mem::replace(&mut self.dirty, true)
    }

    pub(crate) fn provider(&self) -> Provider<T> {
        self.provider.clone()
    }

    /// Stores a recomputed value and clears the dirty flag.
    ///
    /// Returns the previous value when it existed and differs from `value`.
    pub(crate) fn store(&mut self, value: T) -> Option<T> {
        self.dirty = false;
        match self.cache.replace(value) {
            Some(old) if self.cache.as_ref() != Some(&old) => Some(old),
            _ => None,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for DerivedAttribute<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedAttribute")
            .field("cache", &self.cache)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

impl<T: AttributeValue> ErasedAttribute for DerivedAttribute<T> {
    fn kind(&self) -> AttributeKind {
        AttributeKind::Derived
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn invalidate(&mut self) -> bool {
        Self::invalidate(self)
    }
}

/// A cascading attribute memoized by version numbers.
///
/// The cell records the parent's attribute version and the node's local
/// dependency fingerprint seen at the last computation. A mismatch with the
/// current numbers, or an empty cache, triggers a recomputation. The cell's
/// own [`version`](Self::version) only moves when the computed value changes,
/// which is what children compare against.
pub struct ResolvedAttribute<T> {
    cache: Option<T>,
    version: u64,
    last_parent_version: u64,
    last_local_version: u64,
    compute: Compute<T>,
}

impl<T: AttributeValue> ResolvedAttribute<T> {
    /// Creates an empty cell backed by `compute`.
    #[must_use]
    pub fn new(compute: Compute<T>) -> Self {
        Self {
            cache: None,
            version: 0,
            last_parent_version: 0,
            last_local_version: 0,
            compute,
        }
    }

    /// Returns the cached value without recomputing.
    #[must_use]
    pub fn current_value(&self) -> Option<&T> {
        self.cache.as_ref()
    }

    /// Number of times the computed value changed.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Whether the cache must be recomputed for the given versions.
    #[must_use]
    pub fn is_stale(&self, parent_version: u64, local_version: u64) -> bool {
        self.cache.is_none()
            || parent_version != self.last_parent_version
            || local_version != self.last_local_version
    }

    pub(crate) fn compute(&self) -> Compute<T> {
        self.compute.clone()
    }

    /// Stores a recomputed value along with the versions it was computed
    /// against. Bumps the own version and returns `true` if the value
    /// changed.
    pub(crate) fn store(&mut self, value: T, parent_version: u64, local_version: u64) -> bool {
        let changed = self.cache.as_ref() != Some(&value);
        if changed {
            self.version += 1;
            self.cache = Some(value);
        }
        self.last_parent_version = parent_version;
        self.last_local_version = local_version;
        changed
    }
}

impl<T: fmt::Debug> fmt::Debug for ResolvedAttribute<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedAttribute")
            .field("cache", &self.cache)
            .field("version", &self.version)
            .field("last_parent_version", &self.last_parent_version)
            .field("last_local_version", &self.last_local_version)
            .finish_non_exhaustive()
    }
}

impl<T: AttributeValue> ErasedAttribute for ResolvedAttribute<T> {
    fn kind(&self) -> AttributeKind {
        AttributeKind::Resolved
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;

    use super::*;
    use crate::scene::{NodeId, Scene};

    #[test]
    fn set_same_value_reports_no_change() {
        let mut cell = VariableAttribute::new(1.0_f64);
        assert_eq!(cell.set(1.0), None);
        assert!(!cell.is_default(), "an explicit write pins the value");
        assert_eq!(cell.set(2.0), Some(1.0));
        assert_eq!(cell.set(2.0), None);
    }

    #[test]
    fn explicit_initial_value_blocks_inheritance() {
        let mut cell = VariableAttribute::new(1.0_f64);
        assert_eq!(cell.set(1.0), None);
        assert_eq!(cell.inherit_value(4.0), None);
        assert_eq!(*cell.get(), 1.0);
    }

    #[test]
    fn inherit_applies_only_while_default() {
        let mut cell = VariableAttribute::new(0_u32);
        assert_eq!(cell.inherit_value(1), Some(0));
        assert_eq!(cell.inherit_value(2), Some(1));
        assert_eq!(*cell.get(), 2);
        assert!(cell.is_default(), "inheriting never clears the flag");

        let mut explicit = VariableAttribute::new(0_u32);
        explicit.set(5);
        assert_eq!(explicit.inherit_value(1), None);
        assert_eq!(explicit.inherit_value(9), None);
        assert_eq!(*explicit.get(), 5);
    }

    #[test]
    fn inherit_boxed_ignores_other_value_types() {
        let mut cell = VariableAttribute::new(0_u32);
        assert!(cell.inherit_boxed(&1.5_f64).is_none());
        let old = cell.inherit_boxed(&4_u32);
        assert_eq!(old.and_then(|o| o.downcast_ref::<u32>().copied()), Some(0));
        assert_eq!(*cell.get(), 4);
    }

    #[test]
    fn derived_invalidate_is_idempotent() {
        let mut cell = DerivedAttribute::new(Rc::new(|_: &mut Scene, _: NodeId| 3_i32));
        assert!(cell.is_dirty());
        assert!(!cell.invalidate(), "already dirty");
        assert_eq!(cell.store(3), None, "first value is not a change");
        assert_eq!(cell.fresh(), Some(&3));
        assert!(cell.invalidate());
        assert!(!cell.invalidate());
        assert_eq!(cell.cached(), Some(&3));
        assert_eq!(cell.fresh(), None);
    }

    #[test]
    fn derived_store_reports_changes_only() {
        let mut cell = DerivedAttribute::new(Rc::new(|_: &mut Scene, _: NodeId| 0_i32));
        cell.store(1);
        cell.invalidate();
        assert_eq!(cell.store(1), None);
        cell.invalidate();
        assert_eq!(cell.store(2), Some(1));
        assert!(!cell.is_dirty());
    }

    #[test]
    fn resolved_version_moves_only_on_change() {
        let mut cell = ResolvedAttribute::new(Rc::new(
            |_: &mut Scene, _: NodeId, _: Option<&i32>| 0_i32,
        ));
        assert!(cell.is_stale(0, 0), "empty cache is stale");
        assert!(cell.store(5, 0, 0));
        assert_eq!(cell.version(), 1);
        assert!(!cell.is_stale(0, 0));
        assert!(cell.is_stale(1, 0));
        assert!(cell.is_stale(0, 3));

        assert!(!cell.store(5, 1, 3));
        assert_eq!(cell.version(), 1, "same value keeps the version");
        assert!(!cell.is_stale(1, 3), "versions are recorded anyway");

        assert!(cell.store(6, 2, 3));
        assert_eq!(cell.version(), 2);
        assert_eq!(cell.current_value(), Some(&6));
    }
}
