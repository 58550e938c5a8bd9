// Copyright 2026 the Plotscene Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use plotscene_core::trace::{
    AttributeChangedEvent, AttributeInvalidatedEvent, AttributeRecomputedEvent,
    NodeDetachedEvent, NodeDirtyEvent, ResourceReleasedEvent, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns the destination.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_attribute_changed(&mut self, e: &AttributeChangedEvent<'_>) {
        let _ = writeln!(
            self.writer,
            "[changed] node={:?} attr={} kind={}",
            e.node,
            e.name,
            e.kind.as_str(),
        );
    }

    fn on_attribute_invalidated(&mut self, e: &AttributeInvalidatedEvent<'_>) {
        let _ = writeln!(self.writer, "[invalid] node={:?} attr={}", e.node, e.name);
    }

    fn on_attribute_recomputed(&mut self, e: &AttributeRecomputedEvent<'_>) {
        let _ = writeln!(
            self.writer,
            "[recompute] node={:?} attr={} kind={}{}",
            e.node,
            e.name,
            e.kind.as_str(),
            if e.changed { "" } else { " (unchanged)" },
        );
    }

    fn on_node_dirty(&mut self, e: &NodeDirtyEvent) {
        let _ = writeln!(self.writer, "[dirty] node={:?}", e.node);
    }

    fn on_node_detached(&mut self, e: &NodeDetachedEvent) {
        let _ = writeln!(self.writer, "[detach] node={:?}", e.node);
    }

    fn on_resource_released(&mut self, e: &ResourceReleasedEvent) {
        let _ = writeln!(
            self.writer,
            "[release] node={:?} resource={}",
            e.node, e.resource.0
        );
    }
}
