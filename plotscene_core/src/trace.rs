// Copyright 2026 the Plotscene Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Instrumentation for attribute propagation.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! [`Scene`](crate::scene::Scene) calls while it propagates changes. All
//! method bodies default to no-ops, so implementing only the events you care
//! about is fine.
//!
//! [`Tracer`] owns an optional boxed sink. When the `trace` feature is
//! **off**, every `Tracer` method compiles to nothing and installed sinks are
//! dropped. When **on**, each method performs a single `Option` branch before
//! dispatching.
//!
//! # Crate features
//!
//! - `trace` enables the `Tracer` method bodies (one branch per call).

use alloc::boxed::Box;

use crate::attr::{AttributeKind, SpecId};
use crate::render::ResourceKey;
use crate::scene::NodeId;

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when an attribute value changed, by a write or a recomputation.
#[derive(Clone, Copy, Debug)]
pub struct AttributeChangedEvent<'a> {
    /// Node carrying the attribute.
    pub node: NodeId,
    /// Which attribute.
    pub spec: SpecId,
    /// Registered attribute name.
    pub name: &'a str,
    /// Kind of the attribute.
    pub kind: AttributeKind,
}

/// Emitted when a Derived attribute transitions from clean to dirty.
#[derive(Clone, Copy, Debug)]
pub struct AttributeInvalidatedEvent<'a> {
    /// Node carrying the attribute.
    pub node: NodeId,
    /// Which attribute.
    pub spec: SpecId,
    /// Registered attribute name.
    pub name: &'a str,
}

/// Emitted after a Derived provider or Resolved compute function ran.
#[derive(Clone, Copy, Debug)]
pub struct AttributeRecomputedEvent<'a> {
    /// Node carrying the attribute.
    pub node: NodeId,
    /// Which attribute.
    pub spec: SpecId,
    /// Registered attribute name.
    pub name: &'a str,
    /// Kind of the attribute.
    pub kind: AttributeKind,
    /// Whether the computed value differs from the cached one.
    pub changed: bool,
}

/// Emitted when a node's dirty flag is set.
#[derive(Clone, Copy, Debug)]
pub struct NodeDirtyEvent {
    /// The node.
    pub node: NodeId,
}

/// Emitted for every node of a detached subtree, root first.
#[derive(Clone, Copy, Debug)]
pub struct NodeDetachedEvent {
    /// The node.
    pub node: NodeId,
}

/// Emitted when a node hands a backend resource back for release.
#[derive(Clone, Copy, Debug)]
pub struct ResourceReleasedEvent {
    /// The node that held the resource.
    pub node: NodeId,
    /// The released resource.
    pub resource: ResourceKey,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from attribute propagation.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when an attribute value changed.
    fn on_attribute_changed(&mut self, e: &AttributeChangedEvent<'_>) {
        _ = e;
    }

    /// Called when a Derived attribute was invalidated.
    fn on_attribute_invalidated(&mut self, e: &AttributeInvalidatedEvent<'_>) {
        _ = e;
    }

    /// Called after a Derived or Resolved attribute was recomputed.
    fn on_attribute_recomputed(&mut self, e: &AttributeRecomputedEvent<'_>) {
        _ = e;
    }

    /// Called when a node was marked dirty.
    fn on_node_dirty(&mut self, e: &NodeDirtyEvent) {
        _ = e;
    }

    /// Called for each detached node.
    fn on_node_detached(&mut self, e: &NodeDetachedEvent) {
        _ = e;
    }

    /// Called when a resource was queued for release.
    fn on_resource_released(&mut self, e: &ResourceReleasedEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin owner of an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing.
/// When **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
#[derive(Default)]
pub struct Tracer {
    #[cfg(feature = "trace")]
    sink: Option<Box<dyn TraceSink>>,
}

impl core::fmt::Debug for Tracer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer")
            .field("active", &self.is_active())
            .finish_non_exhaustive()
    }
}

impl Tracer {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: Box<dyn TraceSink>) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {}
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Whether events reach a sink. Always `false` without the `trace`
    /// feature.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        #[cfg(feature = "trace")]
        {
            self.sink.is_some()
        }
        #[cfg(not(feature = "trace"))]
        {
            false
        }
    }

    /// Removes and returns the sink.
    #[inline]
    pub fn take(&mut self) -> Option<Box<dyn TraceSink>> {
        #[cfg(feature = "trace")]
        {
            self.sink.take()
        }
        #[cfg(not(feature = "trace"))]
        {
            None
        }
    }

    /// Emits an [`AttributeChangedEvent`].
    #[inline]
    pub fn attribute_changed(&mut self, e: &AttributeChangedEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_attribute_changed(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`AttributeInvalidatedEvent`].
    #[inline]
    pub fn attribute_invalidated(&mut self, e: &AttributeInvalidatedEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_attribute_invalidated(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`AttributeRecomputedEvent`].
    #[inline]
    pub fn attribute_recomputed(&mut self, e: &AttributeRecomputedEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_attribute_recomputed(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`NodeDirtyEvent`].
    #[inline]
    pub fn node_dirty(&mut self, e: &NodeDirtyEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_node_dirty(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`NodeDetachedEvent`].
    #[inline]
    pub fn node_detached(&mut self, e: &NodeDetachedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_node_detached(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ResourceReleasedEvent`].
    #[inline]
    pub fn resource_released(&mut self, e: &ResourceReleasedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_resource_released(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_tracer_is_inactive() {
        let mut tracer = Tracer::none();
        assert!(!tracer.is_active());
        tracer.node_dirty(&NodeDirtyEvent {
            node: NodeId::from_raw(0, 0),
        });
        assert!(tracer.take().is_none());
    }

    #[cfg(feature = "trace")]
    #[test]
    fn installed_sink_receives_events() {
        use alloc::rc::Rc;
        use core::cell::Cell;

        struct Counter(Rc<Cell<u32>>);

        impl TraceSink for Counter {
            fn on_node_dirty(&mut self, _: &NodeDirtyEvent) {
                self.0.set(self.0.get() + 1);
            }
        }

        let count = Rc::new(Cell::new(0));
        let mut tracer = Tracer::new(Box::new(Counter(count.clone())));
        assert!(tracer.is_active());
        let e = NodeDirtyEvent {
            node: NodeId::from_raw(1, 0),
        };
        tracer.node_dirty(&e);
        tracer.node_dirty(&e);
        tracer.node_detached(&NodeDetachedEvent { node: e.node });
        assert_eq!(count.get(), 2);
        assert!(tracer.take().is_some());
        assert!(!tracer.is_active());
    }
}
