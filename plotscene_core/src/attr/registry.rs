// Copyright 2026 the Plotscene Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Append-only catalog of node kinds and attribute specs.

use alloc::boxed::Box;
use alloc::collections::{BTreeMap, BTreeSet};
use alloc::rc::Rc;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use understory_dirty::{CycleHandling, DirtyTracker, EagerPolicy};

use super::bag::AttributeBag;
use super::spec::{AttributeKind, AttributeSpec, AttributeValue, KindId, SpecFlags, SpecId};
use crate::dirty::DEPENDS_ON;
use crate::node;
use crate::scene::{NodeId, Scene};

/// A registration that the registry refused.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// A node kind with this name already exists.
    #[error("node kind `{0}` is already registered")]
    DuplicateKind(String),
    /// The kind handle does not belong to this registry.
    #[error("unknown node kind {0:?}")]
    UnknownKind(KindId),
    /// The name is already used on this kind, an ancestor, or a descendant.
    #[error("attribute `{name}` is already registered on a kind related to `{kind}`")]
    DuplicateAttribute {
        /// Kind the registration targeted.
        kind: String,
        /// Rejected attribute name.
        name: String,
    },
    /// A declared dependency is not a registered spec.
    #[error("attribute `{name}` depends on unregistered {dependency:?}")]
    UnknownDependency {
        /// Rejected attribute name.
        name: String,
        /// The unknown dependency.
        dependency: SpecId,
    },
    /// A declared dependency exists but is not visible on the owning kind.
    #[error(
        "attribute `{name}` on `{kind}` depends on `{dependency}`, which that kind does not carry"
    )]
    ForeignDependency {
        /// Kind the registration targeted.
        kind: String,
        /// Rejected attribute name.
        name: String,
        /// Name of the invisible dependency.
        dependency: String,
    },
    /// A Derived or Resolved spec declared a dependency on a Resolved spec.
    #[error("attribute `{name}` cannot depend on resolved attribute `{dependency}`")]
    ResolvedDependency {
        /// Rejected attribute name.
        name: String,
        /// Name of the Resolved dependency.
        dependency: String,
    },
    /// Adding the dependency edge would close a cycle.
    #[error("dependency of `{name}` on `{dependency}` would create a cycle")]
    Cycle {
        /// Rejected attribute name.
        name: String,
        /// Name of the dependency that closes the cycle.
        dependency: String,
    },
}

struct KindEntry {
    name: String,
    parent: Option<KindId>,
}

struct SpecEntry {
    owner: KindId,
    name: String,
    kind: AttributeKind,
    dependencies: Vec<SpecId>,
    flags: SpecFlags,
    factory: Box<dyn Fn(&mut AttributeBag)>,
}

/// Memoized per-generation lookups.
struct DependencyCache {
    /// `(kind, changed spec)` to the Derived specs visible on `kind` whose
    /// transitive dependency closure contains the changed spec.
    dependents: BTreeMap<(KindId, SpecId), Rc<[SpecId]>>,
    /// Every spec that appears in some Resolved dependency set.
    resolved_inputs: BTreeSet<SpecId>,
    empty: Rc<[SpecId]>,
}

/// Catalog of node kinds and their attribute specs.
///
/// Node kinds form a single inheritance tree rooted at [`node::NODE`]; a spec
/// registered on a kind is visible on every descendant kind. Derived
/// dependency edges live in an [`understory_dirty`] tracker with cycle
/// detection, so a registration that would close a cycle is rejected.
///
/// Lookups used during propagation ([`dependents`](Self::dependents),
/// [`participates_in_resolved`](Self::participates_in_resolved)) are served
/// from a cache built lazily once per registration generation.
pub struct AttributeRegistry {
    kinds: Vec<KindEntry>,
    specs: Vec<SpecEntry>,
    graph: DirtyTracker<u32>,
    cache: Option<DependencyCache>,
    generation: u64,
}

impl Default for AttributeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AttributeRegistry {
    /// Creates a registry holding the built-in `node` and `container` kinds
    /// and the built-in node attributes.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self {
            kinds: Vec::new(),
            specs: Vec::new(),
            graph: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            cache: None,
            generation: 0,
        };
        registry.kinds.push(KindEntry {
            name: "node".to_string(),
            parent: None,
        });
        registry.kinds.push(KindEntry {
            name: "container".to_string(),
            parent: Some(node::NODE),
        });
        node::register_builtins(&mut registry);
        registry
    }

    /// Number of registrations so far. Caches are tied to this value.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    // -- Kinds --

    /// Registers a node kind below `parent`.
    ///
    /// # Errors
    ///
    /// Fails if the name is taken or `parent` is unknown.
    pub fn register_kind(&mut self, name: &str, parent: KindId) -> Result<KindId, RegistryError> {
        self.check_kind(parent)?;
        if self.kinds.iter().any(|k| k.name == name) {
            return Err(RegistryError::DuplicateKind(name.to_string()));
        }
        let id = KindId(index_u32(self.kinds.len()));
        self.kinds.push(KindEntry {
            name: name.to_string(),
            parent: Some(parent),
        });
        self.bump_generation();
        Ok(id)
    }

    /// Returns the name of a kind.
    ///
    /// # Panics
    ///
    /// Panics if the kind is unknown.
    #[must_use]
    pub fn kind_name(&self, kind: KindId) -> &str {
        &self.kind_entry(kind).name
    }

    /// Returns the parent of a kind (`None` for [`node::NODE`]).
    #[must_use]
    pub fn kind_parent(&self, kind: KindId) -> Option<KindId> {
        self.kind_entry(kind).parent
    }

    /// Looks up a kind by name.
    #[must_use]
    pub fn find_kind(&self, name: &str) -> Option<KindId> {
        self.kinds
            .iter()
            .position(|k| k.name == name)
            .map(|idx| KindId(index_u32(idx)))
    }

    /// Whether `kind` is `ancestor` or descends from it.
    #[must_use]
    pub fn is_kind_or_descendant(&self, kind: KindId, ancestor: KindId) -> bool {
        let mut current = Some(kind);
        while let Some(k) = current {
            if k == ancestor {
                return true;
            }
            current = self.kind_entry(k).parent;
        }
        false
    }

    // -- Specs --

    /// Registers a Variable attribute on `kind` starting out as `initial`.
    ///
    /// # Errors
    ///
    /// Fails if the kind is unknown or the name is taken on a related kind.
    pub fn register_variable<T: AttributeValue>(
        &mut self,
        kind: KindId,
        name: &str,
        initial: T,
        flags: SpecFlags,
    ) -> Result<AttributeSpec<T>, RegistryError> {
        self.check_name(kind, name)?;
        let spec = AttributeSpec::from_raw(index_u32(self.specs.len()));
        self.push_spec(SpecEntry {
            owner: kind,
            name: name.to_string(),
            kind: AttributeKind::Variable,
            dependencies: Vec::new(),
            flags,
            factory: Box::new(move |bag: &mut AttributeBag| {
                bag.create_variable(spec, initial.clone());
            }),
        });
        Ok(spec)
    }

    /// Registers a Derived attribute on `kind`, recomputed by `provider`
    /// whenever one of `dependencies` (or their own dependencies) changes.
    ///
    /// # Errors
    ///
    /// Fails on a taken name, an unknown or invisible dependency, a
    /// dependency on a Resolved spec, or a dependency cycle.
    pub fn register_derived<T: AttributeValue>(
        &mut self,
        kind: KindId,
        name: &str,
        dependencies: &[SpecId],
        provider: impl Fn(&mut Scene, NodeId) -> T + 'static,
        flags: SpecFlags,
    ) -> Result<AttributeSpec<T>, RegistryError> {
        self.check_name(kind, name)?;
        self.check_dependencies(kind, name, dependencies)?;
        let spec = AttributeSpec::<T>::from_raw(index_u32(self.specs.len()));

        let key = spec.id().index();
        for &dep in dependencies {
            if self.graph.add_dependency(key, dep.index(), DEPENDS_ON).is_err() {
                return Err(RegistryError::Cycle {
                    name: name.to_string(),
                    dependency: self.specs[dep.index() as usize].name.clone(),
                });
            }
        }

        let provider: Rc<dyn Fn(&mut Scene, NodeId) -> T> = Rc::new(provider);
        self.push_spec(SpecEntry {
            owner: kind,
            name: name.to_string(),
            kind: AttributeKind::Derived,
            dependencies: dependencies.to_vec(),
            flags,
            factory: Box::new(move |bag: &mut AttributeBag| {
                bag.create_derived(spec, provider.clone());
            }),
        });
        Ok(spec)
    }

    /// Registers a Resolved attribute on `kind`.
    ///
    /// `compute` receives the parent's resolved value, if the parent carries
    /// the attribute. The value is recomputed on read whenever the parent's
    /// value or one of `dependencies` on the node changed.
    ///
    /// # Errors
    ///
    /// Fails on a taken name, an unknown or invisible dependency, or a
    /// dependency on another Resolved spec.
    pub fn register_resolved<T: AttributeValue>(
        &mut self,
        kind: KindId,
        name: &str,
        dependencies: &[SpecId],
        compute: impl Fn(&mut Scene, NodeId, Option<&T>) -> T + 'static,
        flags: SpecFlags,
    ) -> Result<AttributeSpec<T>, RegistryError> {
        self.check_name(kind, name)?;
        self.check_dependencies(kind, name, dependencies)?;
        let spec = AttributeSpec::<T>::from_raw(index_u32(self.specs.len()));
        let compute: Rc<dyn Fn(&mut Scene, NodeId, Option<&T>) -> T> = Rc::new(compute);
        let deps: Rc<[SpecId]> = dependencies.into();
        self.push_spec(SpecEntry {
            owner: kind,
            name: name.to_string(),
            kind: AttributeKind::Resolved,
            dependencies: dependencies.to_vec(),
            flags,
            factory: Box::new(move |bag: &mut AttributeBag| {
                bag.create_resolved(spec, &deps, compute.clone());
            }),
        });
        Ok(spec)
    }

    /// Name of a spec.
    ///
    /// # Panics
    ///
    /// Panics if the spec is unregistered. The same holds for the other
    /// per-spec lookups.
    #[must_use]
    pub fn spec_name(&self, spec: impl Into<SpecId>) -> &str {
        &self.spec_entry(spec.into()).name
    }

    /// Kind of a spec.
    #[must_use]
    pub fn spec_kind(&self, spec: impl Into<SpecId>) -> AttributeKind {
        self.spec_entry(spec.into()).kind
    }

    /// Node kind that registered the spec.
    #[must_use]
    pub fn spec_owner(&self, spec: impl Into<SpecId>) -> KindId {
        self.spec_entry(spec.into()).owner
    }

    /// Metadata flags of a spec.
    #[must_use]
    pub fn spec_flags(&self, spec: impl Into<SpecId>) -> SpecFlags {
        self.spec_entry(spec.into()).flags
    }

    /// Declared (direct) dependencies of a spec.
    #[must_use]
    pub fn dependencies(&self, spec: impl Into<SpecId>) -> &[SpecId] {
        &self.spec_entry(spec.into()).dependencies
    }

    /// Whether `spec` is carried by nodes of `kind`.
    #[must_use]
    pub fn is_visible(&self, kind: KindId, spec: impl Into<SpecId>) -> bool {
        self.is_kind_or_descendant(kind, self.spec_entry(spec.into()).owner)
    }

    /// All specs carried by nodes of `kind`, in registration order.
    #[must_use]
    pub fn specs_of_kind(&self, kind: KindId) -> Vec<SpecId> {
        self.specs
            .iter()
            .enumerate()
            .filter(|(_, entry)| self.is_kind_or_descendant(kind, entry.owner))
            .map(|(idx, _)| SpecId(index_u32(idx)))
            .collect()
    }

    /// Looks up a spec carried by `kind` by name.
    #[must_use]
    pub fn find_spec(&self, kind: KindId, name: &str) -> Option<SpecId> {
        self.specs
            .iter()
            .position(|entry| entry.name == name && self.is_kind_or_descendant(kind, entry.owner))
            .map(|idx| SpecId(index_u32(idx)))
    }

    // -- Propagation lookups --

    /// Derived specs carried by `kind` that must be invalidated when
    /// `changed` changes, in registration order.
    pub fn dependents(&mut self, kind: KindId, changed: impl Into<SpecId>) -> Rc<[SpecId]> {
        let cache = self.cache();
        cache
            .dependents
            .get(&(kind, changed.into()))
            .cloned()
            .unwrap_or_else(|| cache.empty.clone())
    }

    /// Whether `spec` appears in any Resolved dependency set.
    pub fn participates_in_resolved(&mut self, spec: impl Into<SpecId>) -> bool {
        self.cache().resolved_inputs.contains(&spec.into())
    }

    /// Creates one cell per spec carried by `kind` in `bag`.
    pub(crate) fn instantiate(&self, kind: KindId, bag: &mut AttributeBag) {
        for entry in &self.specs {
            if self.is_kind_or_descendant(kind, entry.owner) {
                (entry.factory)(bag);
            }
        }
    }

    // -- Internal helpers --

    fn cache(&mut self) -> &DependencyCache {
        let cache = match self.cache.take() {
            Some(cache) => cache,
            None => self.build_cache(),
        };
        self.cache.insert(cache)
    }

    fn build_cache(&mut self) -> DependencyCache {
        let mut dependents = BTreeMap::new();
        for changed in 0..self.specs.len() {
            let key = index_u32(changed);
            self.graph.mark_with(key, DEPENDS_ON, &EagerPolicy);
            let affected: Vec<u32> = self
                .graph
                .drain(DEPENDS_ON)
                .affected()
                .deterministic()
                .run()
                .filter(|&idx| idx != key)
                .collect();
            if affected.is_empty() {
                continue;
            }
            for kind in 0..self.kinds.len() {
                let kind = KindId(index_u32(kind));
                let mut visible: Vec<SpecId> = affected
                    .iter()
                    .map(|&idx| SpecId(idx))
                    .filter(|&dep| {
                        let owner = self.specs[dep.index() as usize].owner;
                        self.is_kind_or_descendant(kind, owner)
                    })
                    .collect();
                if visible.is_empty() {
                    continue;
                }
                visible.sort_unstable();
                dependents.insert((kind, SpecId(key)), Rc::from(visible));
            }
        }

        let resolved_inputs = self
            .specs
            .iter()
            .filter(|entry| entry.kind == AttributeKind::Resolved)
            .flat_map(|entry| entry.dependencies.iter().copied())
            .collect();

        DependencyCache {
            dependents,
            resolved_inputs,
            empty: Rc::from(Vec::new()),
        }
    }

    fn push_spec(&mut self, entry: SpecEntry) {
        self.specs.push(entry);
        self.bump_generation();
    }

    fn bump_generation(&mut self) {
        self.generation += 1;
        self.cache = None;
    }

    fn check_kind(&self, kind: KindId) -> Result<(), RegistryError> {
        if (kind.index() as usize) < self.kinds.len() {
            Ok(())
        } else {
            Err(RegistryError::UnknownKind(kind))
        }
    }

    fn check_name(&self, kind: KindId, name: &str) -> Result<(), RegistryError> {
        self.check_kind(kind)?;
        let taken = self.specs.iter().any(|entry| {
            entry.name == name
                && (self.is_kind_or_descendant(kind, entry.owner)
                    || self.is_kind_or_descendant(entry.owner, kind))
        });
        if taken {
            return Err(RegistryError::DuplicateAttribute {
                kind: self.kind_entry(kind).name.clone(),
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn check_dependencies(
        &self,
        kind: KindId,
        name: &str,
        dependencies: &[SpecId],
    ) -> Result<(), RegistryError> {
        for &dependency in dependencies {
            let Some(entry) = self.specs.get(dependency.index() as usize) else {
                return Err(RegistryError::UnknownDependency {
                    name: name.to_string(),
                    dependency,
                });
            };
            if !self.is_kind_or_descendant(kind, entry.owner) {
                return Err(RegistryError::ForeignDependency {
                    kind: self.kind_entry(kind).name.clone(),
                    name: name.to_string(),
                    dependency: entry.name.clone(),
                });
            }
            if entry.kind == AttributeKind::Resolved {
                return Err(RegistryError::ResolvedDependency {
                    name: name.to_string(),
                    dependency: entry.name.clone(),
                });
            }
        }
        Ok(())
    }

    fn kind_entry(&self, kind: KindId) -> &KindEntry {
        match self.kinds.get(kind.index() as usize) {
            Some(entry) => entry,
            None => panic!("unknown node kind {kind:?}"),
        }
    }

    fn spec_entry(&self, spec: SpecId) -> &SpecEntry {
        match self.specs.get(spec.index() as usize) {
            Some(entry) => entry,
            None => panic!("unregistered attribute {spec:?}"),
        }
    }
}

impl fmt::Debug for AttributeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeRegistry")
            .field("kinds", &self.kinds.len())
            .field("specs", &self.specs.len())
            .field("generation", &self.generation)
            .field("cached", &self.cache.is_some())
            .finish_non_exhaustive()
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "registries hold far fewer than u32::MAX kinds and specs"
)]
fn index_u32(idx: usize) -> u32 {
    idx as u32
}
