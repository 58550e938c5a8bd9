// Copyright 2026 the Plotscene Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Attribute reads, writes, and change propagation.
//!
//! A write follows a fixed sequence, completed before [`Scene::set`]
//! returns:
//!
//! 1. If the spec appears in any Resolved dependency set, its version
//!    counter on the node is bumped. Resolved attributes notice on their next
//!    read.
//! 2. The registry's Derived dependents of the spec (for the node's kind) are
//!    invalidated. Nothing is recomputed.
//! 3. The node-level hook runs: parent bookkeeping for [`PARENT`], geometry
//!    invalidation and dirty marking for `affects_bbox` specs, push-down of
//!    inheritable values from containers.
//! 4. The node kind's [`NodeBehavior::on_attribute_changed`] runs.
//!
//! Derived attributes run the same sequence when a recomputation produces a
//! different value.

use alloc::vec::Vec;
use core::any::Any;

use kurbo::Rect;

use super::id::NodeId;
use super::store::Scene;
use crate::attr::{AttributeKind, AttributeSpec, AttributeValue, SpecId};
use crate::node::{AttributeChange, BBOX_LOCAL, CTM, NodeBehavior, PARENT, TRANSFORM, VISIBLE};
use crate::trace::{AttributeChangedEvent, AttributeInvalidatedEvent, AttributeRecomputedEvent};
use crate::transform::union_all;

impl Scene {
    // -- Reads --

    /// Returns the current value of an attribute.
    ///
    /// Variable attributes return the stored value. Derived attributes
    /// recompute if invalidated. Resolved attributes refresh their parent
    /// chain first and recompute if the parent's value or one of their
    /// dependencies changed since the last read.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale, or the node's kind does not carry
    /// `spec`.
    pub fn get<T: AttributeValue>(&mut self, id: NodeId, spec: AttributeSpec<T>) -> T {
        self.validate(id);
        match self.bags[id.idx as usize].kind_of(spec) {
            Some(AttributeKind::Variable) => {
                self.bags[id.idx as usize].variable(spec).get().clone()
            }
            Some(AttributeKind::Derived) => self.get_derived(id, spec),
            Some(AttributeKind::Resolved) => self.get_resolved(id, spec),
            None => panic!(
                "attribute `{}` is not carried by {id:?} of kind `{}`",
                self.registry.spec_name(spec),
                self.kind_name(id)
            ),
        }
    }

    /// Whether a Variable attribute still holds its initial or inherited
    /// value.
    #[must_use]
    pub fn is_default<T: AttributeValue>(&self, id: NodeId, spec: AttributeSpec<T>) -> bool {
        self.validate(id);
        self.bags[id.idx as usize].variable(spec).is_default()
    }

    /// Returns the cached value of a Resolved attribute without refreshing
    /// it.
    #[must_use]
    pub fn current_value<T: AttributeValue>(
        &self,
        id: NodeId,
        spec: AttributeSpec<T>,
    ) -> Option<T> {
        self.validate(id);
        self.bags[id.idx as usize]
            .resolved(spec)
            .current_value()
            .cloned()
    }

    fn get_derived<T: AttributeValue>(&mut self, id: NodeId, spec: AttributeSpec<T>) -> T {
        let cell = self.bags[id.idx as usize].derived(spec);
        if let Some(value) = cell.fresh() {
            return value.clone();
        }
        let provider = cell.provider();
        let value = provider(self, id);

        let old = self.bags[id.idx as usize]
            .derived_mut(spec)
            .store(value.clone());
        if self.tracer.is_active() {
            let e = AttributeRecomputedEvent {
                node: id,
                spec: spec.id(),
                name: self.registry.spec_name(spec),
                kind: AttributeKind::Derived,
                changed: old.is_some(),
            };
            self.tracer.attribute_recomputed(&e);
        }
        if let Some(old) = old {
            self.handle_change(id, spec.id(), &old, &value);
        }
        value
    }

    fn get_resolved<T: AttributeValue>(&mut self, id: NodeId, spec: AttributeSpec<T>) -> T {
        let (parent_value, parent_version) = match self.parent(id) {
            Some(parent) if self.bags[parent.idx as usize].contains(spec) => {
                let value = self.get_resolved(parent, spec);
                let version = self.bags[parent.idx as usize].resolved(spec).version();
                (Some(value), version)
            }
            _ => (None, 0),
        };

        let bag = &self.bags[id.idx as usize];
        let local_version = bag.pull_version(self.registry.dependencies(spec));
        let cell = bag.resolved(spec);
        if !cell.is_stale(parent_version, local_version) {
            if let Some(value) = cell.current_value() {
                return value.clone();
            }
        }

        let compute = cell.compute();
        let value = compute(self, id, parent_value.as_ref());

        // Reads inside `compute` may have refreshed Derived dependencies and
        // bumped their counters; record what the computation actually saw.
        let bag = &mut self.bags[id.idx as usize];
        let local_version = bag.pull_version(self.registry.dependencies(spec));
        let changed = bag
            .resolved_mut(spec)
            .store(value.clone(), parent_version, local_version);
        if self.tracer.is_active() {
            let e = AttributeRecomputedEvent {
                node: id,
                spec: spec.id(),
                name: self.registry.spec_name(spec),
                kind: AttributeKind::Resolved,
                changed,
            };
            self.tracer.attribute_recomputed(&e);
        }
        value
    }

    // -- Writes --

    /// Writes a Variable attribute.
    ///
    /// The attribute stops being default. Writing the stored value changes
    /// nothing else; otherwise the value is stored and change propagation
    /// runs before this returns.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or `spec` is not a Variable carried by
    /// the node. Writing [`PARENT`] panics for the same topology violations
    /// as [`insert_child`](Self::insert_child).
    pub fn set<T: AttributeValue>(&mut self, id: NodeId, spec: AttributeSpec<T>, value: T) {
        self.validate(id);
        if spec.id() == PARENT.id()
            && let Some(&Some(container)) = (&value as &dyn Any).downcast_ref::<Option<NodeId>>()
        {
            self.check_attach(container, id);
        }
        let old = self.bags[id.idx as usize]
            .variable_mut(spec)
            .set(value.clone());
        if let Some(old) = old {
            self.handle_change(id, spec.id(), &old, &value);
        }
    }

    /// Writes a Variable attribute only if it still holds a default value,
    /// keeping it default.
    ///
    /// This is how containers push inheritable values to their children.
    pub fn inherit_value<T: AttributeValue>(
        &mut self,
        id: NodeId,
        spec: AttributeSpec<T>,
        value: T,
    ) {
        self.validate(id);
        let old = self.bags[id.idx as usize].inherit_value(spec, value.clone());
        if let Some(old) = old {
            self.handle_change(id, spec.id(), &old, &value);
        }
    }

    // -- Geometry --

    /// Invalidates the local bounding box of `id` and of every ancestor.
    pub fn invalidate_geometry(&mut self, id: NodeId) {
        self.validate(id);
        let mut current = Some(id);
        while let Some(node) = current {
            self.invalidate_attribute(node, BBOX_LOCAL.id());
            let kind = self.kind[node.idx as usize];
            let dependents = self.registry.dependents(kind, BBOX_LOCAL);
            for &dependent in dependents.iter() {
                self.invalidate_attribute(node, dependent);
            }
            current = self.parent(node);
        }
    }

    /// Returns the node's bounding box in scene coordinates.
    ///
    /// Not cached: the [`CTM`] applied to [`BBOX_LOCAL`].
    pub fn bbox_global(&mut self, id: NodeId) -> Rect {
        let ctm = self.get(id, CTM);
        let local = self.get(id, BBOX_LOCAL);
        ctm.transform_rect_bbox(local)
    }

    /// Union of the visible children's bounding boxes in the container's
    /// local coordinates, or [`Rect::ZERO`] if none has extent.
    ///
    /// This is the local bounding box of a plain container.
    pub fn children_bbox(&mut self, id: NodeId) -> Rect {
        let children = self.children(id).to_vec();
        let mut boxes = Vec::with_capacity(children.len());
        for child in children {
            if !self.get(child, VISIBLE) {
                continue;
            }
            let local = self.get(child, BBOX_LOCAL);
            boxes.push(self.get(child, TRANSFORM).transform_rect_bbox(local));
        }
        union_all(boxes).unwrap_or(Rect::ZERO)
    }

    // -- Propagation --

    /// Invalidates one Derived cell, bumping its version counter when a
    /// Resolved attribute depends on it.
    fn invalidate_attribute(&mut self, id: NodeId, spec: SpecId) {
        let bag = &mut self.bags[id.idx as usize];
        if !bag.contains(spec) {
            return;
        }
        let transitioned = bag.invalidate(spec);
        if self.registry.participates_in_resolved(spec) {
            self.bags[id.idx as usize].bump_version(spec);
        }
        if transitioned && self.tracer.is_active() {
            let e = AttributeInvalidatedEvent {
                node: id,
                spec,
                name: self.registry.spec_name(spec),
            };
            self.tracer.attribute_invalidated(&e);
        }
    }

    pub(crate) fn handle_change(&mut self, id: NodeId, spec: SpecId, old: &dyn Any, new: &dyn Any) {
        let idx = id.idx as usize;
        if self.tracer.is_active() {
            let e = AttributeChangedEvent {
                node: id,
                spec,
                name: self.registry.spec_name(spec),
                kind: self.registry.spec_kind(spec),
            };
            self.tracer.attribute_changed(&e);
        }

        if self.registry.participates_in_resolved(spec) {
            self.bags[idx].bump_version(spec);
        }

        let dependents = self.registry.dependents(self.kind[idx], spec);
        for &dependent in dependents.iter() {
            self.invalidate_attribute(id, dependent);
        }

        self.node_hook(id, spec, old, new);

        let behavior = self.behavior(id);
        behavior.on_attribute_changed(
            self,
            &AttributeChange {
                node: id,
                spec,
                old,
                new,
            },
        );
    }

    fn node_hook(&mut self, id: NodeId, spec: SpecId, old: &dyn Any, new: &dyn Any) {
        if spec == PARENT.id() {
            let old = old.downcast_ref::<Option<NodeId>>().copied().flatten();
            let new = new.downcast_ref::<Option<NodeId>>().copied().flatten();
            self.reparent(id, old, new);
        }

        let flags = self.registry.spec_flags(spec);
        if flags.affects_bbox {
            self.invalidate_geometry(id);
            self.mark_dirty(id);
        } else if flags.repaint {
            self.mark_dirty(id);
        }

        if flags.inheritable && self.is_container(id) {
            let children = self.children[id.idx as usize].clone();
            for child in children {
                self.inherit_erased(child, spec, new);
            }
        }
    }

    /// Parent bookkeeping after [`PARENT`] changed from `old` to `new`.
    fn reparent(&mut self, id: NodeId, old: Option<NodeId>, new: Option<NodeId>) {
        if let Some(old) = old {
            if self.is_alive(old) {
                self.unlink(old, id);
                self.invalidate_geometry(old);
                self.mark_dirty(old);
            }
        }
        if let Some(new) = new {
            let list = &mut self.children[new.idx as usize];
            if !list.contains(&id) {
                list.push(id);
            }
            self.inherit_from(new, id);
        }
    }

    /// Pushes every inheritable value of `container` to a newly added
    /// `child`.
    pub(crate) fn inherit_from(&mut self, container: NodeId, child: NodeId) {
        let kind = self.kind[container.idx as usize];
        for spec in self.registry.specs_of_kind(kind) {
            if !self.registry.spec_flags(spec).inheritable {
                continue;
            }
            let Some(value) = self.bags[container.idx as usize]
                .erased(spec)
                .and_then(|cell| cell.value_boxed())
            else {
                continue;
            };
            self.inherit_erased(child, spec, &*value);
        }
    }

    fn inherit_erased(&mut self, id: NodeId, spec: SpecId, value: &dyn Any) {
        let old = self.bags[id.idx as usize]
            .erased_mut(spec)
            .and_then(|cell| cell.inherit_boxed(value));
        if let Some(old) = old {
            self.handle_change(id, spec, &*old, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use core::cell::Cell;

    use kurbo::Affine;

    use super::*;
    use crate::attr::{AttributeRegistry, KindId, SpecFlags};
    use crate::node::{FILL, NODE, PlainNode, STROKE_WIDTH};
    use crate::paint::Color;
    use crate::shape::Group;

    /// A node kind with two numbers, their (counted) sum, and a scaled sum.
    #[derive(Debug)]
    struct Pair {
        kind: KindId,
        a: AttributeSpec<f64>,
        b: AttributeSpec<f64>,
        sum: AttributeSpec<f64>,
        scaled: AttributeSpec<f64>,
        calls: Rc<Cell<u32>>,
    }

    impl NodeBehavior for Pair {
        fn kind(&self) -> KindId {
            self.kind
        }
    }

    fn pair_scene() -> (Scene, Rc<Pair>) {
        let mut registry = AttributeRegistry::new();
        let kind = registry.register_kind("pair", NODE).unwrap();
        let a = registry
            .register_variable(kind, "a", 1.0, SpecFlags::NONE)
            .unwrap();
        let b = registry
            .register_variable(kind, "b", 2.0, SpecFlags::NONE)
            .unwrap();
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let sum = registry
            .register_derived(
                kind,
                "sum",
                &[a.id(), b.id()],
                move |s: &mut Scene, id: NodeId| {
                    counter.set(counter.get() + 1);
                    s.get(id, a) + s.get(id, b)
                },
                SpecFlags::NONE,
            )
            .unwrap();
        let scaled = registry
            .register_derived(
                kind,
                "scaled",
                &[sum.id()],
                move |s: &mut Scene, id: NodeId| 10.0 * s.get(id, sum),
                SpecFlags::NONE,
            )
            .unwrap();
        let pair = Rc::new(Pair {
            kind,
            a,
            b,
            sum,
            scaled,
            calls,
        });
        (Scene::new(registry), pair)
    }

    #[test]
    fn derived_is_memoized() {
        let (mut scene, pair) = pair_scene();
        let id = scene.create_node(pair.clone());

        assert_eq!(scene.get(id, pair.sum), 3.0);
        assert_eq!(scene.get(id, pair.sum), 3.0);
        assert_eq!(pair.calls.get(), 1);

        scene.set(id, pair.a, 5.0);
        assert_eq!(pair.calls.get(), 1, "invalidation does not recompute");
        assert_eq!(scene.get(id, pair.sum), 7.0);
        assert_eq!(pair.calls.get(), 2);
    }

    #[test]
    fn setting_same_value_does_not_invalidate() {
        let (mut scene, pair) = pair_scene();
        let id = scene.create_node(pair.clone());
        let _ = scene.get(id, pair.sum);
        scene.set(id, pair.a, 1.0);
        let _ = scene.get(id, pair.sum);
        assert_eq!(pair.calls.get(), 1);
        assert!(!scene.is_default(id, pair.a), "explicit writes pin the value");
    }

    #[test]
    fn setting_same_value_keeps_versions() {
        let mut scene = Scene::default();
        let id = scene.create_node(Rc::new(PlainNode));
        scene.set(id, TRANSFORM, Affine::translate((1.0, 0.0)));
        let _ = scene.get(id, CTM);
        let before = scene.bag(id).version(TRANSFORM);
        let ctm_version = scene.bag(id).resolved(CTM).version();
        scene.set(id, TRANSFORM, Affine::translate((1.0, 0.0)));
        assert_eq!(scene.bag(id).version(TRANSFORM), before);
        let _ = scene.get(id, CTM);
        assert_eq!(scene.bag(id).resolved(CTM).version(), ctm_version);
    }

    #[test]
    fn explicit_default_value_survives_inheritance() {
        let mut scene = Scene::default();
        let root = scene.create_node(Rc::new(Group));
        let child = scene.create_node(Rc::new(PlainNode));
        scene.set(child, STROKE_WIDTH, 1.0);
        scene.add_child(root, child);
        scene.set(root, STROKE_WIDTH, 4.0);
        assert_eq!(scene.get(child, STROKE_WIDTH), 1.0);
    }

    #[test]
    fn derived_chain_is_invalidated_transitively() {
        let (mut scene, pair) = pair_scene();
        let id = scene.create_node(pair.clone());
        assert_eq!(scene.get(id, pair.scaled), 30.0);
        scene.set(id, pair.b, 4.0);
        assert!(scene.bag(id).derived(pair.scaled).is_dirty());
        assert_eq!(scene.get(id, pair.scaled), 50.0);
    }

    #[test]
    fn ctm_composes_parent_chain() {
        let mut scene = Scene::default();
        let root = scene.create_node(Rc::new(Group));
        let mid = scene.create_node(Rc::new(Group));
        let leaf = scene.create_node(Rc::new(PlainNode));
        scene.add_child(root, mid);
        scene.add_child(mid, leaf);
        scene.set(root, TRANSFORM, Affine::scale(2.0));
        scene.set(mid, TRANSFORM, Affine::translate((10.0, 0.0)));
        scene.set(leaf, TRANSFORM, Affine::translate((0.0, 1.0)));

        let expected = Affine::scale(2.0)
            * Affine::translate((10.0, 0.0))
            * Affine::translate((0.0, 1.0));
        assert_eq!(scene.get(leaf, CTM), expected);

        // Changing an ancestor is seen by the leaf on the next read.
        scene.set(root, TRANSFORM, Affine::IDENTITY);
        let ctm = scene.get(leaf, CTM);
        assert_eq!(ctm, scene.get(mid, CTM) * scene.get(leaf, TRANSFORM));
        assert_eq!(ctm, Affine::translate((10.0, 1.0)));
    }

    #[test]
    fn resolved_version_moves_only_on_change() {
        let mut scene = Scene::default();
        let root = scene.create_node(Rc::new(Group));
        let leaf = scene.create_node(Rc::new(PlainNode));
        scene.add_child(root, leaf);

        let _ = scene.get(leaf, CTM);
        let v1 = scene.bag(leaf).resolved(CTM).version();
        let _ = scene.get(leaf, CTM);
        assert_eq!(scene.bag(leaf).resolved(CTM).version(), v1);

        // Recomputed, but to the same value.
        scene.set(root, TRANSFORM, Affine::translate((1.0, 0.0)));
        scene.set(leaf, TRANSFORM, Affine::translate((-1.0, 0.0)));
        scene.set(root, TRANSFORM, Affine::IDENTITY);
        scene.set(leaf, TRANSFORM, Affine::IDENTITY);
        let _ = scene.get(leaf, CTM);
        assert_eq!(scene.bag(leaf).resolved(CTM).version(), v1);

        scene.set(leaf, TRANSFORM, Affine::scale(3.0));
        let _ = scene.get(leaf, CTM);
        assert!(scene.bag(leaf).resolved(CTM).version() > v1);
    }

    #[test]
    fn reparenting_refreshes_ctm() {
        let mut scene = Scene::default();
        let left = scene.create_node(Rc::new(Group));
        let right = scene.create_node(Rc::new(Group));
        let leaf = scene.create_node(Rc::new(PlainNode));
        scene.set(left, TRANSFORM, Affine::translate((1.0, 0.0)));
        scene.set(right, TRANSFORM, Affine::translate((2.0, 0.0)));

        scene.add_child(left, leaf);
        assert_eq!(scene.get(leaf, CTM), Affine::translate((1.0, 0.0)));
        scene.add_child(right, leaf);
        assert_eq!(scene.get(leaf, CTM), Affine::translate((2.0, 0.0)));
        scene.remove_child(right, leaf);
        assert_eq!(scene.get(leaf, CTM), Affine::IDENTITY);
    }

    #[test]
    fn current_value_does_not_refresh() {
        let mut scene = Scene::default();
        let leaf = scene.create_node(Rc::new(PlainNode));
        assert_eq!(scene.current_value(leaf, CTM), None);
        let _ = scene.get(leaf, CTM);
        scene.set(leaf, TRANSFORM, Affine::scale(2.0));
        assert_eq!(scene.current_value(leaf, CTM), Some(Affine::IDENTITY));
    }

    #[test]
    fn inherited_values_follow_container_until_set() {
        let mut scene = Scene::default();
        let root = scene.create_node(Rc::new(Group));
        let a = scene.create_node(Rc::new(PlainNode));
        let b = scene.create_node(Rc::new(PlainNode));
        scene.set(root, FILL, Some(Color::BLACK));

        scene.add_child(root, a);
        scene.add_child(root, b);
        assert_eq!(scene.get(a, FILL), Some(Color::BLACK));
        assert!(scene.is_default(a, FILL));

        scene.set(b, FILL, Some(Color::WHITE));
        scene.set(root, FILL, Some(Color::rgb(255, 0, 0)));
        assert_eq!(scene.get(a, FILL), Some(Color::rgb(255, 0, 0)));
        assert_eq!(scene.get(b, FILL), Some(Color::WHITE));
    }

    #[test]
    fn inherited_values_cascade_through_nested_containers() {
        let mut scene = Scene::default();
        let root = scene.create_node(Rc::new(Group));
        let mid = scene.create_node(Rc::new(Group));
        let leaf = scene.create_node(Rc::new(PlainNode));
        scene.add_child(root, mid);
        scene.add_child(mid, leaf);

        scene.set(root, STROKE_WIDTH, 3.0);
        assert_eq!(scene.get(mid, STROKE_WIDTH), 3.0);
        assert_eq!(scene.get(leaf, STROKE_WIDTH), 3.0);
    }

    #[test]
    fn children_bbox_skips_hidden_and_empty() {
        let mut scene = Scene::default();
        let root = scene.create_node(Rc::new(Group));
        let empty = scene.create_node(Rc::new(PlainNode));
        scene.add_child(root, empty);
        assert_eq!(scene.get(root, BBOX_LOCAL), Rect::ZERO);
        assert_eq!(scene.children_bbox(root), Rect::ZERO);
    }

    #[test]
    #[should_panic(expected = "is not carried by")]
    fn foreign_attribute_panics() {
        let (mut scene, pair) = pair_scene();
        let plain = scene.create_node(Rc::new(PlainNode));
        let _ = scene.get(plain, pair.a);
    }

    #[test]
    #[should_panic(expected = "is derived, not variable")]
    fn writing_derived_panics() {
        let (mut scene, pair) = pair_scene();
        let id = scene.create_node(pair.clone());
        scene.set(id, pair.sum, 1.0);
    }
}
