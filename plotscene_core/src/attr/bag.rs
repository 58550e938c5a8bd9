// Copyright 2026 the Plotscene Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node attribute storage.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use core::any::type_name;

use super::cell::{DerivedAttribute, ErasedAttribute, ResolvedAttribute, VariableAttribute};
use super::spec::{AttributeKind, AttributeSpec, AttributeValue, Compute, Provider, SpecId};

/// The attribute cells of one node, plus the version counters that Resolved
/// attributes fingerprint.
///
/// A bag is exclusively owned by its node. Cells are created once, when the
/// node is created, from the templates held by the
/// [`AttributeRegistry`](super::AttributeRegistry).
///
/// Typed accessors panic when the spec was never created on this bag or when
/// the stored cell is of a different kind or value type. Both are
/// programming errors (the spec belongs to another node kind).
#[derive(Debug, Default)]
pub struct AttributeBag {
    cells: BTreeMap<SpecId, Box<dyn ErasedAttribute>>,
    versions: BTreeMap<SpecId, u64>,
}

impl AttributeBag {
    /// Creates an empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether a cell exists for `spec`.
    #[must_use]
    pub fn contains(&self, spec: impl Into<SpecId>) -> bool {
        self.cells.contains_key(&spec.into())
    }

    /// Returns the number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if the bag holds no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns the kind of the cell stored for `spec`, if any.
    #[must_use]
    pub fn kind_of(&self, spec: impl Into<SpecId>) -> Option<AttributeKind> {
        self.cells.get(&spec.into()).map(|cell| cell.kind())
    }

    // -- Creation --

    /// Creates a Variable cell holding `initial`.
    pub fn create_variable<T: AttributeValue>(&mut self, spec: AttributeSpec<T>, initial: T) {
        self.insert(spec.id(), Box::new(VariableAttribute::new(initial)));
    }

    /// Creates a dirty Derived cell backed by `provider`.
    pub fn create_derived<T: AttributeValue>(
        &mut self,
        spec: AttributeSpec<T>,
        provider: Provider<T>,
    ) {
        self.insert(spec.id(), Box::new(DerivedAttribute::new(provider)));
    }

    /// Creates an empty Resolved cell backed by `compute`.
    ///
    /// Every declared dependency gets a version counter, even if the bag
    /// never holds a cell for it, so the fingerprint is always defined.
    pub fn create_resolved<T: AttributeValue>(
        &mut self,
        spec: AttributeSpec<T>,
        dependencies: &[SpecId],
        compute: Compute<T>,
    ) {
        for &dependency in dependencies {
            self.versions.entry(dependency).or_insert(0);
        }
        self.insert(spec.id(), Box::new(ResolvedAttribute::new(compute)));
    }

    fn insert(&mut self, spec: SpecId, cell: Box<dyn ErasedAttribute>) {
        let previous = self.cells.insert(spec, cell);
        assert!(previous.is_none(), "attribute {spec:?} created twice");
    }

    // -- Typed lookup --

    /// Returns the Variable cell for `spec`.
    ///
    /// # Panics
    ///
    /// Panics if the cell is missing or is not a Variable of type `T`.
    #[must_use]
    pub fn variable<T: AttributeValue>(&self, spec: AttributeSpec<T>) -> &VariableAttribute<T> {
        self.cell(spec.id(), AttributeKind::Variable)
    }

    /// Mutable variant of [`variable`](Self::variable).
    pub fn variable_mut<T: AttributeValue>(
        &mut self,
        spec: AttributeSpec<T>,
    ) -> &mut VariableAttribute<T> {
        self.cell_mut(spec.id(), AttributeKind::Variable)
    }

    /// Returns the Derived cell for `spec`.
    ///
    /// # Panics
    ///
    /// Panics if the cell is missing or is not a Derived of type `T`.
    #[must_use]
    pub fn derived<T: AttributeValue>(&self, spec: AttributeSpec<T>) -> &DerivedAttribute<T> {
        self.cell(spec.id(), AttributeKind::Derived)
    }

    /// Mutable variant of [`derived`](Self::derived).
    pub fn derived_mut<T: AttributeValue>(
        &mut self,
        spec: AttributeSpec<T>,
    ) -> &mut DerivedAttribute<T> {
        self.cell_mut(spec.id(), AttributeKind::Derived)
    }

    /// Returns the Resolved cell for `spec`.
    ///
    /// # Panics
    ///
    /// Panics if the cell is missing or is not a Resolved of type `T`.
    #[must_use]
    pub fn resolved<T: AttributeValue>(&self, spec: AttributeSpec<T>) -> &ResolvedAttribute<T> {
        self.cell(spec.id(), AttributeKind::Resolved)
    }

    /// Mutable variant of [`resolved`](Self::resolved).
    pub fn resolved_mut<T: AttributeValue>(
        &mut self,
        spec: AttributeSpec<T>,
    ) -> &mut ResolvedAttribute<T> {
        self.cell_mut(spec.id(), AttributeKind::Resolved)
    }

    fn cell<C: 'static>(&self, spec: SpecId, kind: AttributeKind) -> &C {
        let Some(cell) = self.cells.get(&spec) else {
            panic!("attribute {spec:?} was never created on this node");
        };
        assert!(
            cell.kind() == kind,
            "attribute {spec:?} is {}, not {}",
            cell.kind().as_str(),
            kind.as_str()
        );
        match cell.as_any().downcast_ref::<C>() {
            Some(cell) => cell,
            None => panic!("attribute {spec:?} is not a {}", type_name::<C>()),
        }
    }

    fn cell_mut<C: 'static>(&mut self, spec: SpecId, kind: AttributeKind) -> &mut C {
        let Some(cell) = self.cells.get_mut(&spec) else {
            panic!("attribute {spec:?} was never created on this node");
        };
        assert!(
            cell.kind() == kind,
            "attribute {spec:?} is {}, not {}",
            cell.kind().as_str(),
            kind.as_str()
        );
        match cell.as_any_mut().downcast_mut::<C>() {
            Some(cell) => cell,
            None => panic!("attribute {spec:?} is not a {}", type_name::<C>()),
        }
    }

    pub(crate) fn erased(&self, spec: SpecId) -> Option<&dyn ErasedAttribute> {
        match self.cells.get(&spec) {
            Some(cell) => Some(&**cell),
            None => None,
        }
    }

    pub(crate) fn erased_mut(&mut self, spec: SpecId) -> Option<&mut dyn ErasedAttribute> {
        match self.cells.get_mut(&spec) {
            Some(cell) => Some(&mut **cell),
            None => None,
        }
    }

    // -- Versions and invalidation --

    /// Returns the version counter of `spec` (0 if it never changed).
    #[must_use]
    pub fn version(&self, spec: impl Into<SpecId>) -> u64 {
        self.versions.get(&spec.into()).copied().unwrap_or(0)
    }

    /// Sums the version counters of `dependencies`.
    ///
    /// Counters only grow, so the sum strictly increases whenever any
    /// dependency changed since the previous pull.
    #[must_use]
    pub fn pull_version(&self, dependencies: &[SpecId]) -> u64 {
        dependencies.iter().map(|&dep| self.version(dep)).sum()
    }

    /// Increments the version counter of `spec`.
    pub fn bump_version(&mut self, spec: impl Into<SpecId>) {
        *self.versions.entry(spec.into()).or_insert(0) += 1;
    }

    /// Marks the Derived cell for `spec` dirty.
    ///
    /// Returns `true` on a clean to dirty transition. Missing cells and other
    /// kinds are ignored.
    pub fn invalidate(&mut self, spec: impl Into<SpecId>) -> bool {
        self.cells
            .get_mut(&spec.into())
            .is_some_and(|cell| cell.invalidate())
    }

    /// Forwards to [`VariableAttribute::inherit_value`].
    pub fn inherit_value<T: AttributeValue>(
        &mut self,
        spec: AttributeSpec<T>,
        value: T,
    ) -> Option<T> {
        self.variable_mut(spec).inherit_value(value)
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;

    use super::*;
    use crate::scene::{NodeId, Scene};

    const A: AttributeSpec<f64> = AttributeSpec::from_raw(0);
    const B: AttributeSpec<f64> = AttributeSpec::from_raw(1);
    const SUM: AttributeSpec<f64> = AttributeSpec::from_raw(2);
    const CASCADE: AttributeSpec<f64> = AttributeSpec::from_raw(3);

    fn provider() -> Provider<f64> {
        Rc::new(|_: &mut Scene, _: NodeId| 0.0)
    }

    fn compute() -> Compute<f64> {
        Rc::new(|_: &mut Scene, _: NodeId, _: Option<&f64>| 0.0)
    }

    #[test]
    fn resolved_creation_allocates_version_slots() {
        let mut bag = AttributeBag::new();
        bag.create_resolved(CASCADE, &[A.id(), B.id()], compute());
        assert!(!bag.contains(A), "no cell for the dependency");
        assert_eq!(bag.version(A), 0);
        assert_eq!(bag.pull_version(&[A.id(), B.id()]), 0);
    }

    #[test]
    fn pull_version_sums_dependencies() {
        let mut bag = AttributeBag::new();
        bag.create_variable(A, 1.0);
        bag.create_variable(B, 2.0);
        bag.create_resolved(CASCADE, &[A.id(), B.id()], compute());

        bag.bump_version(A);
        bag.bump_version(A);
        bag.bump_version(B);
        assert_eq!(bag.pull_version(&[A.id(), B.id()]), 3);
        assert_eq!(bag.pull_version(&[B.id()]), 1);
        assert_eq!(bag.pull_version(&[]), 0);
    }

    #[test]
    fn invalidate_only_touches_derived() {
        let mut bag = AttributeBag::new();
        bag.create_variable(A, 1.0);
        bag.create_derived(SUM, provider());
        bag.derived_mut(SUM).store(1.0);

        assert!(!bag.invalidate(A), "variables ignore invalidation");
        assert!(bag.invalidate(SUM));
        assert!(!bag.invalidate(SUM), "idempotent");
        assert!(!bag.invalidate(B), "missing cells are ignored");
    }

    #[test]
    fn inherit_value_forwards_to_variable() {
        let mut bag = AttributeBag::new();
        bag.create_variable(A, 1.0);
        assert_eq!(bag.inherit_value(A, 4.0), Some(1.0));
        assert_eq!(*bag.variable(A).get(), 4.0);
        assert!(bag.variable(A).is_default());
    }

    #[test]
    fn kind_of_reports_cell_kind() {
        let mut bag = AttributeBag::new();
        bag.create_variable(A, 1.0);
        bag.create_derived(SUM, provider());
        assert_eq!(bag.kind_of(A), Some(AttributeKind::Variable));
        assert_eq!(bag.kind_of(SUM), Some(AttributeKind::Derived));
        assert_eq!(bag.kind_of(B), None);
        assert_eq!(bag.len(), 2);
    }

    #[test]
    #[should_panic(expected = "was never created on this node")]
    fn missing_cell_panics() {
        let bag = AttributeBag::new();
        let _ = bag.variable(A);
    }

    #[test]
    #[should_panic(expected = "is derived, not variable")]
    fn kind_mismatch_panics() {
        let mut bag = AttributeBag::new();
        bag.create_derived(SUM, provider());
        let _ = bag.variable(SUM);
    }

    #[test]
    #[should_panic(expected = "is not a")]
    fn value_type_mismatch_panics() {
        let mut bag = AttributeBag::new();
        bag.create_variable(A, 1.0);
        let wrong: AttributeSpec<u32> = AttributeSpec::from_raw(0);
        let _ = bag.variable(wrong);
    }

    #[test]
    #[should_panic(expected = "created twice")]
    fn double_creation_panics() {
        let mut bag = AttributeBag::new();
        bag.create_variable(A, 1.0);
        bag.create_variable(A, 2.0);
    }
}
