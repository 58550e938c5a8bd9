// Copyright 2026 the Plotscene Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory event recording.
//!
//! [`RecorderSink`] implements [`TraceSink`] and appends an owned
//! [`RecordedEvent`] per callback to an [`EventLog`]. The log is a shared
//! handle: keep a clone before installing the sink with
//! [`Scene::set_trace_sink`](plotscene_core::scene::Scene::set_trace_sink)
//! and read it while the scene keeps running.

use std::cell::RefCell;
use std::rc::Rc;

use plotscene_core::attr::{AttributeKind, SpecId};
use plotscene_core::render::ResourceKey;
use plotscene_core::scene::NodeId;
use plotscene_core::trace::{
    AttributeChangedEvent, AttributeInvalidatedEvent, AttributeRecomputedEvent,
    NodeDetachedEvent, NodeDirtyEvent, ResourceReleasedEvent, TraceSink,
};

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// An owned copy of a trace event.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordedEvent {
    /// An [`AttributeChangedEvent`].
    AttributeChanged {
        /// Node carrying the attribute.
        node: NodeId,
        /// Which attribute.
        spec: SpecId,
        /// Registered attribute name.
        name: String,
        /// Kind of the attribute.
        kind: AttributeKind,
    },
    /// An [`AttributeInvalidatedEvent`].
    AttributeInvalidated {
        /// Node carrying the attribute.
        node: NodeId,
        /// Which attribute.
        spec: SpecId,
        /// Registered attribute name.
        name: String,
    },
    /// An [`AttributeRecomputedEvent`].
    AttributeRecomputed {
        /// Node carrying the attribute.
        node: NodeId,
        /// Which attribute.
        spec: SpecId,
        /// Registered attribute name.
        name: String,
        /// Kind of the attribute.
        kind: AttributeKind,
        /// Whether the value changed.
        changed: bool,
    },
    /// A [`NodeDirtyEvent`].
    NodeDirty(NodeId),
    /// A [`NodeDetachedEvent`].
    NodeDetached(NodeId),
    /// A [`ResourceReleasedEvent`].
    ResourceReleased {
        /// The node that held the resource.
        node: NodeId,
        /// The released resource.
        resource: ResourceKey,
    },
}

impl RecordedEvent {
    /// The node the event is about.
    #[must_use]
    pub fn node(&self) -> NodeId {
        match self {
            Self::AttributeChanged { node, .. }
            | Self::AttributeInvalidated { node, .. }
            | Self::AttributeRecomputed { node, .. }
            | Self::ResourceReleased { node, .. }
            | Self::NodeDirty(node)
            | Self::NodeDetached(node) => *node,
        }
    }

    /// The attribute name, for attribute events.
    #[must_use]
    pub fn attribute(&self) -> Option<&str> {
        match self {
            Self::AttributeChanged { name, .. }
            | Self::AttributeInvalidated { name, .. }
            | Self::AttributeRecomputed { name, .. } => Some(name),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// EventLog
// ---------------------------------------------------------------------------

/// Shared, append-only list of recorded events.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<RecordedEvent>>>,
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    /// Whether nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Returns a copy of the recorded events.
    #[must_use]
    pub fn snapshot(&self) -> Vec<RecordedEvent> {
        self.events.borrow().clone()
    }

    /// Removes and returns the recorded events.
    pub fn take(&self) -> Vec<RecordedEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    fn push(&self, event: RecordedEvent) {
        self.events.borrow_mut().push(event);
    }
}

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that appends every event to an [`EventLog`].
#[derive(Debug, Default)]
pub struct RecorderSink {
    log: EventLog,
}

impl RecorderSink {
    /// Creates a recorder with a fresh log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a recorder appending to an existing log.
    #[must_use]
    pub fn with_log(log: EventLog) -> Self {
        Self { log }
    }

    /// Returns a handle to the log.
    #[must_use]
    pub fn log(&self) -> EventLog {
        self.log.clone()
    }
}

impl TraceSink for RecorderSink {
    fn on_attribute_changed(&mut self, e: &AttributeChangedEvent<'_>) {
        self.log.push(RecordedEvent::AttributeChanged {
            node: e.node,
            spec: e.spec,
            name: e.name.to_owned(),
            kind: e.kind,
        });
    }

    fn on_attribute_invalidated(&mut self, e: &AttributeInvalidatedEvent<'_>) {
        self.log.push(RecordedEvent::AttributeInvalidated {
            node: e.node,
            spec: e.spec,
            name: e.name.to_owned(),
        });
    }

    fn on_attribute_recomputed(&mut self, e: &AttributeRecomputedEvent<'_>) {
        self.log.push(RecordedEvent::AttributeRecomputed {
            node: e.node,
            spec: e.spec,
            name: e.name.to_owned(),
            kind: e.kind,
            changed: e.changed,
        });
    }

    fn on_node_dirty(&mut self, e: &NodeDirtyEvent) {
        self.log.push(RecordedEvent::NodeDirty(e.node));
    }

    fn on_node_detached(&mut self, e: &NodeDetachedEvent) {
        self.log.push(RecordedEvent::NodeDetached(e.node));
    }

    fn on_resource_released(&mut self, e: &ResourceReleasedEvent) {
        self.log.push(RecordedEvent::ResourceReleased {
            node: e.node,
            resource: e.resource,
        });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use kurbo::Affine;
    use plotscene_core::node::{BBOX_LOCAL, TRANSFORM};
    use plotscene_core::scene::Scene;
    use plotscene_core::shape::{Group, Rectangle};

    use super::*;

    fn recorded_scene() -> (Scene, EventLog) {
        let mut scene = Scene::default();
        let sink = RecorderSink::new();
        let log = sink.log();
        scene.set_trace_sink(Box::new(sink));
        (scene, log)
    }

    #[test]
    fn records_writes_and_recomputations() {
        let (mut scene, log) = recorded_scene();
        let rects = Rectangle::register(scene.registry_mut()).unwrap();
        let root = scene.create_node(Rc::new(Group));
        let leaf = rects.create(&mut scene, 0.0, 0.0, 5.0, 5.0);
        scene.add_child(root, leaf);
        scene.get(root, BBOX_LOCAL);
        log.take();

        scene.set(leaf, TRANSFORM, Affine::translate((1.0, 0.0)));
        let events = log.take();
        assert!(events.contains(&RecordedEvent::AttributeChanged {
            node: leaf,
            spec: TRANSFORM.id(),
            name: "transform".into(),
            kind: AttributeKind::Variable,
        }));
        assert!(
            events
                .iter()
                .any(|e| e.node() == root && e.attribute() == Some("bbox_local")),
            "container bbox is invalidated"
        );

        scene.get(root, BBOX_LOCAL);
        let recomputed: Vec<_> = log
            .take()
            .into_iter()
            .filter(|e| matches!(e, RecordedEvent::AttributeRecomputed { .. }))
            .map(|e| e.node())
            .collect();
        assert_eq!(recomputed, [leaf, root], "inner boxes finish first");
    }

    #[test]
    fn records_detach_order() {
        let (mut scene, log) = recorded_scene();
        let root = scene.create_node(Rc::new(Group));
        let child = scene.create_node(Rc::new(Group));
        scene.add_child(root, child);
        log.take();

        scene.detach(root);
        let detached: Vec<_> = log
            .take()
            .into_iter()
            .filter_map(|e| match e {
                RecordedEvent::NodeDetached(node) => Some(node),
                _ => None,
            })
            .collect();
        assert_eq!(detached, [root, child]);
    }

    #[test]
    fn log_outlives_the_sink() {
        let (mut scene, log) = recorded_scene();
        let root = scene.create_node(Rc::new(Group));
        scene.set(root, TRANSFORM, Affine::scale(2.0));
        assert!(!log.is_empty());
        drop(scene.take_trace_sink());
        let before = log.len();
        scene.set(root, TRANSFORM, Affine::IDENTITY);
        assert_eq!(log.len(), before);
        assert_eq!(log.snapshot().len(), before);
    }
}
