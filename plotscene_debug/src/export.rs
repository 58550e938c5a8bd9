// Copyright 2026 the Plotscene Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] writes events recorded by a
//! [`RecorderSink`](super::recorder::RecorderSink) as [Chrome Trace Event
//! Format][spec] JSON to the given writer.
//!
//! Propagation carries no clock, so each event's timestamp is its position
//! in the recording. Every event is an instant event on the thread lane of
//! the node it concerns, which lines up cascades per node in the viewer.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use crate::recorder::RecordedEvent;

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
pub fn export(events: &[RecordedEvent], writer: &mut dyn Write) -> io::Result<()> {
    let mut out: Vec<Value> = Vec::with_capacity(events.len());

    for (ts, recorded) in events.iter().enumerate() {
        let (name, cat, args) = match recorded {
            RecordedEvent::AttributeChanged {
                spec, name, kind, ..
            } => (
                "AttributeChanged",
                "Attribute",
                json!({
                    "attribute": name,
                    "spec": spec.index(),
                    "kind": kind.as_str(),
                }),
            ),
            RecordedEvent::AttributeInvalidated { spec, name, .. } => (
                "AttributeInvalidated",
                "Attribute",
                json!({
                    "attribute": name,
                    "spec": spec.index(),
                }),
            ),
            RecordedEvent::AttributeRecomputed {
                spec,
                name,
                kind,
                changed,
                ..
            } => (
                "AttributeRecomputed",
                "Attribute",
                json!({
                    "attribute": name,
                    "spec": spec.index(),
                    "kind": kind.as_str(),
                    "changed": changed,
                }),
            ),
            RecordedEvent::NodeDirty(_) => ("NodeDirty", "Node", json!({})),
            RecordedEvent::NodeDetached(_) => ("NodeDetached", "Node", json!({})),
            RecordedEvent::ResourceReleased { resource, .. } => (
                "ResourceReleased",
                "Resource",
                json!({
                    "resource": resource.0,
                }),
            ),
        };
        let node = recorded.node();
        out.push(json!({
            "ph": "i",
            "name": name,
            "cat": cat,
            "ts": ts,
            "pid": 0,
            "tid": node.index(),
            "s": "t",
            "args": args,
        }));
    }

    serde_json::to_writer_pretty(writer, &out)?;
    Ok(())
}
