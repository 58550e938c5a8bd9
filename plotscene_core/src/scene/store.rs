// Copyright 2026 the Plotscene Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays node storage with allocation, topology, and lifecycle
//! management.

use alloc::boxed::Box;
use alloc::collections::BTreeSet;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::mem;

use super::id::NodeId;
use crate::attr::{AttributeBag, AttributeRegistry, KindId};
use crate::config::{DirtyPropagation, SceneConfig};
use crate::node::{CONTAINER, NodeBehavior, PARENT};
use crate::render::ResourceKey;
use crate::trace::{NodeDetachedEvent, NodeDirtyEvent, ResourceReleasedEvent, TraceSink, Tracer};

/// A retained scene graph.
///
/// Nodes are addressed by [`NodeId`] handles. Internally, each node occupies
/// a slot in parallel arrays. Destroyed nodes are recycled via a free list,
/// and generation counters prevent stale handle access.
///
/// The scene owns the [`AttributeRegistry`] and every node's
/// [`AttributeBag`], so all attribute reads and writes go through it (see
/// [`get`](Self::get) and [`set`](Self::set)).
#[derive(Debug)]
pub struct Scene {
    pub(crate) registry: AttributeRegistry,
    pub(crate) config: SceneConfig,

    // -- Per-node state --
    pub(crate) kind: Vec<KindId>,
    pub(crate) behavior: Vec<Option<Rc<dyn NodeBehavior>>>,
    pub(crate) bags: Vec<AttributeBag>,
    pub(crate) children: Vec<Vec<NodeId>>,
    pub(crate) dirty: Vec<bool>,
    pub(crate) detached: Vec<bool>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Resources handed back by detached nodes --
    pub(crate) released: Vec<ResourceKey>,

    pub(crate) tracer: Tracer,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(AttributeRegistry::new())
    }
}

impl Scene {
    /// Creates an empty scene over `registry` with the default configuration.
    #[must_use]
    pub fn new(registry: AttributeRegistry) -> Self {
        Self::with_config(registry, SceneConfig::default())
    }

    /// Creates an empty scene over `registry`.
    #[must_use]
    pub fn with_config(registry: AttributeRegistry, config: SceneConfig) -> Self {
        let capacity = config.initial_capacity;
        Self {
            registry,
            config,
            kind: Vec::with_capacity(capacity),
            behavior: Vec::with_capacity(capacity),
            bags: Vec::with_capacity(capacity),
            children: Vec::with_capacity(capacity),
            dirty: Vec::with_capacity(capacity),
            detached: Vec::with_capacity(capacity),
            generation: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            len: 0,
            released: Vec::new(),
            tracer: Tracer::none(),
        }
    }

    /// Returns the attribute registry.
    #[must_use]
    pub fn registry(&self) -> &AttributeRegistry {
        &self.registry
    }

    /// Returns the attribute registry for further registrations.
    ///
    /// Nodes created before a registration do not carry attributes added to
    /// their kind afterwards.
    pub fn registry_mut(&mut self) -> &mut AttributeRegistry {
        &mut self.registry
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Installs a trace sink, replacing any previous one.
    ///
    /// Without the `trace` feature the sink is dropped.
    pub fn set_trace_sink(&mut self, sink: Box<dyn TraceSink>) {
        self.tracer = Tracer::new(sink);
    }

    /// Removes and returns the installed trace sink.
    pub fn take_trace_sink(&mut self) -> Option<Box<dyn TraceSink>> {
        self.tracer.take()
    }

    // -- Allocation API --

    /// Creates a node of `behavior.kind()` and returns its handle.
    ///
    /// The node starts dirty, without a parent, with one attribute cell per
    /// spec its kind carries.
    ///
    /// # Panics
    ///
    /// Panics if the behavior's kind is not registered.
    pub fn create_node(&mut self, behavior: Rc<dyn NodeBehavior>) -> NodeId {
        let kind = behavior.kind();
        let mut bag = AttributeBag::new();
        self.registry.instantiate(kind, &mut bag);

        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot.
            let i = idx as usize;
            self.kind[i] = kind;
            self.behavior[i] = Some(behavior);
            self.bags[i] = bag;
            self.children[i].clear();
            self.dirty[i] = true;
            self.detached[i] = false;
            idx
        } else {
            // Allocate a new slot.
            let idx = self.len;
            self.len += 1;
            self.kind.push(kind);
            self.behavior.push(Some(behavior));
            self.bags.push(bag);
            self.children.push(Vec::new());
            self.dirty.push(true);
            self.detached.push(false);
            self.generation.push(0);
            idx
        };

        NodeId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Destroys a node, freeing its slot for reuse.
    ///
    /// A node that was not detached yet is detached first, so its behavior
    /// gets a chance to release resources.
    ///
    /// # Panics
    ///
    /// Panics if the node has children (remove them first) or if the handle
    /// is stale.
    pub fn destroy_node(&mut self, id: NodeId) {
        self.validate(id);
        let i = id.idx as usize;
        assert!(
            self.children[i].is_empty(),
            "cannot destroy node with children"
        );
        if !self.detached[i] {
            self.detach(id);
        }
        if let Some(container) = self.parent(id) {
            self.unlink(container, id);
        }

        // Bump generation so old handles immediately fail validation.
        self.generation[i] += 1;
        self.behavior[i] = None;
        self.bags[i] = AttributeBag::new();
        self.dirty[i] = false;
        self.free_list.push(id.idx);
    }

    /// Returns whether the given handle refers to a live node.
    #[must_use]
    pub fn is_alive(&self, id: NodeId) -> bool {
        (id.idx < self.len)
            && self.generation[id.idx as usize] == id.generation
            && self.behavior[id.idx as usize].is_some()
    }

    /// Number of live nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.len as usize - self.free_list.len()
    }

    /// Returns the behavior of a node.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn behavior(&self, id: NodeId) -> Rc<dyn NodeBehavior> {
        self.validate(id);
        match &self.behavior[id.idx as usize] {
            Some(behavior) => behavior.clone(),
            None => panic!("stale NodeId: {id:?} (slot is free)"),
        }
    }

    /// Returns the kind of a node.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> KindId {
        self.validate(id);
        self.kind[id.idx as usize]
    }

    /// Returns the registered name of a node's kind.
    #[must_use]
    pub fn kind_name(&self, id: NodeId) -> &str {
        self.registry.kind_name(self.kind(id))
    }

    /// Whether the node is of the container kind or one of its descendants.
    #[must_use]
    pub fn is_container(&self, id: NodeId) -> bool {
        self.registry.is_kind_or_descendant(self.kind(id), CONTAINER)
    }

    /// Returns the attribute bag of a node.
    #[must_use]
    pub fn bag(&self, id: NodeId) -> &AttributeBag {
        self.validate(id);
        &self.bags[id.idx as usize]
    }

    /// Returns the live nodes without a parent, in slot order.
    #[must_use]
    pub fn roots(&self) -> Vec<NodeId> {
        let mut roots = Vec::new();
        for idx in 0..self.len {
            let id = NodeId {
                idx,
                generation: self.generation[idx as usize],
            };
            if self.is_alive(id) && self.parent(id).is_none() {
                roots.push(id);
            }
        }
        roots
    }

    // -- Topology API --

    /// Returns the container holding a node, if any.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.validate(id);
        *self.bags[id.idx as usize].variable(PARENT).get()
    }

    /// Returns the children of a node in paint order (empty for
    /// non-containers).
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.validate(id);
        &self.children[id.idx as usize]
    }

    /// Appends `child` to `container`.
    ///
    /// If `child` is held by another container it is moved; if it already is
    /// a child of `container` it is moved to the end.
    ///
    /// # Panics
    ///
    /// See [`insert_child`](Self::insert_child).
    pub fn add_child(&mut self, container: NodeId, child: NodeId) {
        let len = self.children(container).len();
        let index = if self.parent(child) == Some(container) {
            len - 1
        } else {
            len
        };
        self.insert_child(container, index, child);
    }

    /// Inserts `child` at `index` in `container`'s child list.
    ///
    /// Writes the child's [`PARENT`], which removes it from any previous
    /// container. The child then inherits the container's inheritable
    /// attribute values, and the container's geometry is invalidated.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale, `container` is not a container,
    /// either node is detached, `child` is `container` or one of its
    /// ancestors, or `index` is out of bounds.
    pub fn insert_child(&mut self, container: NodeId, index: usize, child: NodeId) {
        self.check_attach(container, child);

        let c = container.idx as usize;
        if self.parent(child) == Some(container) {
            // Reorder within the same container.
            let list = &mut self.children[c];
            assert!(
                index < list.len(),
                "child index {index} out of bounds (len {})",
                list.len()
            );
            list.retain(|&n| n != child);
            list.insert(index, child);
            self.mark_dirty(container);
            return;
        }

        let len = self.children[c].len();
        assert!(index <= len, "child index {index} out of bounds (len {len})");
        self.children[c].insert(index, child);
        self.set(child, PARENT, Some(container));
        self.invalidate_geometry(container);
        self.mark_dirty(container);
    }

    /// Removes `child` from `container` by clearing its [`PARENT`].
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale or `child` is not a child of
    /// `container`.
    pub fn remove_child(&mut self, container: NodeId, child: NodeId) {
        assert!(
            self.parent(child) == Some(container),
            "node {child:?} is not a child of {container:?}"
        );
        self.set(child, PARENT, None);
    }

    /// Replaces the child list of `container`.
    ///
    /// Current children missing from `children` are removed; the rest are
    /// added or reordered to match.
    ///
    /// # Panics
    ///
    /// Panics if `children` contains a node twice, and for the reasons listed
    /// on [`insert_child`](Self::insert_child).
    pub fn set_children(&mut self, container: NodeId, children: &[NodeId]) {
        let unique: BTreeSet<NodeId> = children.iter().copied().collect();
        assert!(
            unique.len() == children.len(),
            "child list contains duplicates"
        );
        let current = self.children(container).to_vec();
        for child in current {
            if !unique.contains(&child) {
                self.remove_child(container, child);
            }
        }
        for (index, &child) in children.iter().enumerate() {
            self.insert_child(container, index, child);
        }
    }

    /// Removes the subtree rooted at `id` from the scene graph.
    ///
    /// The node is removed from its container, then every node of the
    /// subtree (parents first) is flagged detached and its behavior's
    /// [`on_detach`](NodeBehavior::on_detach) runs. The nodes stay alive
    /// until destroyed.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the node is already detached.
    pub fn detach(&mut self, id: NodeId) {
        self.validate(id);
        assert!(
            !self.detached[id.idx as usize],
            "node {id:?} is already detached"
        );
        if let Some(container) = self.parent(id) {
            self.remove_child(container, id);
        }
        for node in self.depth_first(id) {
            self.detached[node.idx as usize] = true;
            self.tracer.node_detached(&NodeDetachedEvent { node });
            let behavior = self.behavior(node);
            behavior.on_detach(self, node);
        }
    }

    /// Whether the node was detached.
    #[must_use]
    pub fn is_detached(&self, id: NodeId) -> bool {
        self.validate(id);
        self.detached[id.idx as usize]
    }

    /// Queues a backend resource held by `id` for release.
    ///
    /// Called by node behaviors from
    /// [`on_detach`](NodeBehavior::on_detach).
    pub fn release_resource(&mut self, id: NodeId, resource: ResourceKey) {
        self.released.push(resource);
        self.tracer
            .resource_released(&ResourceReleasedEvent { node: id, resource });
    }

    /// Returns and clears the queue of released resources.
    pub fn drain_released(&mut self) -> Vec<ResourceKey> {
        mem::take(&mut self.released)
    }

    // -- Dirty flags --

    /// Whether the node needs repainting.
    #[must_use]
    pub fn is_dirty(&self, id: NodeId) -> bool {
        self.validate(id);
        self.dirty[id.idx as usize]
    }

    /// Returns the live dirty nodes, in slot order.
    #[must_use]
    pub fn dirty_nodes(&self) -> Vec<NodeId> {
        (0..self.len)
            .map(|idx| NodeId {
                idx,
                generation: self.generation[idx as usize],
            })
            .filter(|&id| self.is_alive(id) && self.dirty[id.idx as usize])
            .collect()
    }

    /// Marks a node dirty and walks up to its ancestors.
    ///
    /// With [`DirtyPropagation::StopAtDirtyAncestor`] the walk ends at the
    /// first ancestor that already was dirty.
    pub fn mark_dirty(&mut self, id: NodeId) {
        self.validate(id);
        let mut current = Some(id);
        while let Some(node) = current {
            let was_dirty = mem::replace(&mut self.dirty[node.idx as usize], true);
            if !was_dirty {
                self.tracer.node_dirty(&NodeDirtyEvent { node });
            } else if node != id
                && self.config.dirty_propagation == DirtyPropagation::StopAtDirtyAncestor
            {
                break;
            }
            current = self.parent(node);
        }
    }

    // -- Internal helpers --

    /// Panics if the handle is stale.
    pub(crate) fn validate(&self, id: NodeId) {
        assert!(
            id.idx < self.len && self.generation[id.idx as usize] == id.generation,
            "stale NodeId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }

    /// Asserts that `child` may become a child of `container`.
    pub(crate) fn check_attach(&self, container: NodeId, child: NodeId) {
        self.validate(container);
        self.validate(child);
        assert!(
            self.is_container(container),
            "node {container:?} of kind `{}` is not a container",
            self.kind_name(container)
        );
        assert!(
            !self.detached[container.idx as usize] && !self.detached[child.idx as usize],
            "cannot attach detached nodes"
        );
        let mut ancestor = Some(container);
        while let Some(a) = ancestor {
            assert!(a != child, "cannot add a node to its own subtree");
            ancestor = self.parent(a);
        }
    }

    /// Removes `child` from `container`'s list without touching attributes.
    pub(crate) fn unlink(&mut self, container: NodeId, child: NodeId) {
        self.children[container.idx as usize].retain(|&n| n != child);
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::node::{FILL, PlainNode};
    use crate::paint::Color;
    use crate::shape::Group;

    fn leaf(scene: &mut Scene) -> NodeId {
        scene.create_node(Rc::new(PlainNode))
    }

    fn group(scene: &mut Scene) -> NodeId {
        scene.create_node(Rc::new(Group))
    }

    #[test]
    fn create_and_destroy() {
        let mut scene = Scene::default();
        let id = leaf(&mut scene);
        assert!(scene.is_alive(id));
        assert_eq!(scene.node_count(), 1);
        scene.destroy_node(id);
        assert!(!scene.is_alive(id));
        assert_eq!(scene.node_count(), 0);
    }

    #[test]
    fn generation_prevents_stale_access() {
        let mut scene = Scene::default();
        let id1 = leaf(&mut scene);
        scene.destroy_node(id1);
        let id2 = leaf(&mut scene);
        // id2 reuses the same slot but has a different generation.
        assert!(!scene.is_alive(id1));
        assert!(scene.is_alive(id2));
        assert_eq!(id1.idx, id2.idx);
        assert_ne!(id1.generation, id2.generation);
    }

    #[test]
    #[should_panic(expected = "stale NodeId")]
    fn stale_handle_panics() {
        let mut scene = Scene::default();
        let id = leaf(&mut scene);
        scene.destroy_node(id);
        let _ = scene.parent(id);
    }

    #[test]
    fn add_child_and_query() {
        let mut scene = Scene::default();
        let root = group(&mut scene);
        let a = leaf(&mut scene);
        let b = leaf(&mut scene);

        scene.add_child(root, a);
        scene.add_child(root, b);

        assert_eq!(scene.parent(a), Some(root));
        assert_eq!(scene.parent(b), Some(root));
        assert_eq!(scene.children(root), &[a, b]);
        assert_eq!(scene.roots(), vec![root]);
    }

    #[test]
    fn insert_and_reorder() {
        let mut scene = Scene::default();
        let root = group(&mut scene);
        let a = leaf(&mut scene);
        let b = leaf(&mut scene);
        let c = leaf(&mut scene);

        scene.add_child(root, a);
        scene.add_child(root, c);
        scene.insert_child(root, 1, b);
        assert_eq!(scene.children(root), &[a, b, c]);

        // Re-adding moves to the end.
        scene.add_child(root, a);
        assert_eq!(scene.children(root), &[b, c, a]);

        scene.insert_child(root, 0, c);
        assert_eq!(scene.children(root), &[c, b, a]);
    }

    #[test]
    fn adding_moves_between_containers() {
        let mut scene = Scene::default();
        let first = group(&mut scene);
        let second = group(&mut scene);
        let child = leaf(&mut scene);

        scene.add_child(first, child);
        scene.add_child(second, child);

        assert!(scene.children(first).is_empty());
        assert_eq!(scene.children(second), &[child]);
        assert_eq!(scene.parent(child), Some(second));
    }

    #[test]
    fn writing_parent_directly_links_and_unlinks() {
        let mut scene = Scene::default();
        let first = group(&mut scene);
        let second = group(&mut scene);
        let child = leaf(&mut scene);

        scene.set(child, PARENT, Some(first));
        assert_eq!(scene.children(first), &[child]);
        scene.set(child, PARENT, Some(second));
        assert!(scene.children(first).is_empty());
        assert_eq!(scene.children(second), &[child]);
        scene.set(child, PARENT, None);
        assert!(scene.children(second).is_empty());
    }

    #[test]
    fn remove_and_set_children() {
        let mut scene = Scene::default();
        let root = group(&mut scene);
        let a = leaf(&mut scene);
        let b = leaf(&mut scene);
        let c = leaf(&mut scene);

        scene.set_children(root, &[a, b, c]);
        assert_eq!(scene.children(root), &[a, b, c]);

        scene.remove_child(root, b);
        assert_eq!(scene.children(root), &[a, c]);
        assert_eq!(scene.parent(b), None);

        scene.set_children(root, &[c, b]);
        assert_eq!(scene.children(root), &[c, b]);
        assert_eq!(scene.parent(a), None);
        assert_eq!(scene.parent(b), Some(root));
    }

    #[test]
    #[should_panic(expected = "child list contains duplicates")]
    fn set_children_rejects_duplicates() {
        let mut scene = Scene::default();
        let root = group(&mut scene);
        let a = leaf(&mut scene);
        scene.set_children(root, &[a, a]);
    }

    #[test]
    #[should_panic(expected = "is not a container")]
    fn leaf_cannot_hold_children() {
        let mut scene = Scene::default();
        let a = leaf(&mut scene);
        let b = leaf(&mut scene);
        scene.add_child(a, b);
    }

    #[test]
    #[should_panic(expected = "cannot add a node to its own subtree")]
    fn cycle_is_rejected() {
        let mut scene = Scene::default();
        let outer = group(&mut scene);
        let inner = group(&mut scene);
        scene.add_child(outer, inner);
        scene.add_child(inner, outer);
    }

    #[test]
    #[should_panic(expected = "cannot destroy node with children")]
    fn destroy_with_children_panics() {
        let mut scene = Scene::default();
        let root = group(&mut scene);
        let a = leaf(&mut scene);
        scene.add_child(root, a);
        scene.destroy_node(root);
    }

    #[test]
    fn detach_flags_subtree_and_unlinks() {
        let mut scene = Scene::default();
        let root = group(&mut scene);
        let mid = group(&mut scene);
        let a = leaf(&mut scene);
        scene.add_child(root, mid);
        scene.add_child(mid, a);

        scene.detach(mid);
        assert!(scene.children(root).is_empty());
        assert!(scene.is_detached(mid));
        assert!(scene.is_detached(a));
        assert!(!scene.is_detached(root));
        // The subtree stays intact.
        assert_eq!(scene.children(mid), &[a]);
    }

    #[test]
    #[should_panic(expected = "is already detached")]
    fn double_detach_panics() {
        let mut scene = Scene::default();
        let a = leaf(&mut scene);
        scene.detach(a);
        scene.detach(a);
    }

    #[test]
    #[should_panic(expected = "cannot attach detached nodes")]
    fn detached_nodes_cannot_be_attached() {
        let mut scene = Scene::default();
        let root = group(&mut scene);
        let a = leaf(&mut scene);
        scene.detach(a);
        scene.add_child(root, a);
    }

    #[test]
    #[should_panic(expected = "cannot add a node to its own subtree")]
    fn parent_write_rejects_self() {
        let mut scene = Scene::default();
        let g = group(&mut scene);
        scene.set(g, PARENT, Some(g));
    }

    #[test]
    #[should_panic(expected = "cannot add a node to its own subtree")]
    fn parent_write_rejects_loop() {
        let mut scene = Scene::default();
        let outer = group(&mut scene);
        let inner = group(&mut scene);
        scene.add_child(outer, inner);
        scene.set(outer, PARENT, Some(inner));
    }

    #[test]
    #[should_panic(expected = "cannot attach detached nodes")]
    fn parent_write_rejects_detached_container() {
        let mut scene = Scene::default();
        let root = group(&mut scene);
        let a = leaf(&mut scene);
        scene.detach(root);
        scene.set(a, PARENT, Some(root));
    }

    #[test]
    fn parent_write_inherits_container_values() {
        let mut scene = Scene::default();
        let root = group(&mut scene);
        let a = leaf(&mut scene);
        scene.set(root, FILL, Some(Color::WHITE));
        scene.set(a, PARENT, Some(root));
        assert_eq!(scene.children(root), &[a]);
        assert_eq!(scene.get(a, FILL), Some(Color::WHITE));
        assert!(scene.is_default(a, FILL));
    }

    #[test]
    fn mark_dirty_stops_at_dirty_ancestor() {
        let mut scene = Scene::default();
        let root = group(&mut scene);
        let mid = group(&mut scene);
        let a = leaf(&mut scene);
        scene.add_child(root, mid);
        scene.add_child(mid, a);
        let mut sink = crate::render::CommandList::new();
        scene.render(root, &mut sink);
        assert!(scene.dirty_nodes().is_empty());

        // Only `root` is dirty; marking `a` stops there.
        scene.dirty[root.idx as usize] = true;
        scene.dirty[mid.idx as usize] = false;
        scene.mark_dirty(a);
        assert!(scene.is_dirty(a));
        assert!(scene.is_dirty(mid));
        assert!(scene.is_dirty(root));
    }

    #[test]
    fn full_propagation_reaches_root() {
        let mut scene = Scene::with_config(AttributeRegistry::new(), SceneConfig::exhaustive());
        let root = group(&mut scene);
        let mid = group(&mut scene);
        let a = leaf(&mut scene);
        scene.add_child(root, mid);
        scene.add_child(mid, a);
        let mut sink = crate::render::CommandList::new();
        scene.render(root, &mut sink);

        // A dirty `mid` under a clean `root` only happens when flags are
        // cleared piecemeal; the full walk repairs it.
        scene.dirty[mid.idx as usize] = true;
        scene.mark_dirty(a);
        assert!(scene.is_dirty(root));
    }

    #[test]
    fn child_add_marks_container_dirty() {
        let mut scene = Scene::default();
        let root = group(&mut scene);
        let mut sink = crate::render::CommandList::new();
        scene.render(root, &mut sink);
        assert!(!scene.is_dirty(root));

        let a = leaf(&mut scene);
        scene.add_child(root, a);
        assert!(scene.is_dirty(root));
        assert_eq!(scene.dirty_nodes(), vec![root, a]);
    }

    #[test]
    fn release_queue_drains_once() {
        let mut scene = Scene::default();
        let a = leaf(&mut scene);
        scene.release_resource(a, ResourceKey(1));
        scene.release_resource(a, ResourceKey(2));
        assert_eq!(scene.drain_released(), vec![ResourceKey(1), ResourceKey(2)]);
        assert!(scene.drain_released().is_empty());
    }

    #[test]
    fn slot_reuse_resets_state() {
        let mut scene = Scene::default();
        let a = leaf(&mut scene);
        scene.set(a, FILL, Some(Color::BLACK));
        scene.destroy_node(a);
        let b = leaf(&mut scene);
        assert_eq!(a.idx, b.idx);
        assert_eq!(scene.get(b, FILL), None);
        assert!(scene.is_dirty(b));
        assert!(!scene.is_detached(b));
    }
}
