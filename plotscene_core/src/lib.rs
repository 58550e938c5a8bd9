// Copyright 2026 the Plotscene Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reactive attribute engine and retained scene graph for plot rendering.
//!
//! `plotscene_core` is the layer between plot layout (which decides *what* to
//! draw) and a paint backend (which draws it). Layout code builds a tree of
//! scene nodes and writes their properties; the paint layer reads bounding
//! boxes and transforms and asks each node to render itself. It is `no_std`
//! compatible (with `alloc`).
//!
//! # Architecture
//!
//! Every node property is an *attribute* described by a static
//! [`AttributeSpec`](attr::AttributeSpec):
//!
//! ```text
//!   Variable  ──set()──► AttributeBag ──► version counters ──► Resolved (pull)
//!                              │
//!                              └──► registry dependents ──► Derived (mark dirty)
//!                                                               │
//!                                              next get() ◄─────┘ recompute lazily
//! ```
//!
//! **[`attr`]**: Attribute specs, the [`AttributeRegistry`](attr::AttributeRegistry)
//! that owns the static dependency graph, the three attribute cell kinds, and
//! the per-node [`AttributeBag`](attr::AttributeBag).
//!
//! **[`scene`]**: Slot-array node storage with generational
//! [`NodeId`](scene::NodeId) handles, container topology, attribute access,
//! geometry invalidation, dirty marking, traversal, and painting.
//!
//! **[`node`]**: The built-in node attributes (`PARENT`, `TRANSFORM`,
//! `BBOX_LOCAL`, `CTM`, ...) and the [`NodeBehavior`](node::NodeBehavior)
//! trait that each node kind implements.
//!
//! **[`shape`]**: Concrete node kinds: groups, rectangles, text labels, and
//! images.
//!
//! **[`render`]**: The [`RenderContext`](render::RenderContext) trait that
//! paint backends implement, plus a recording implementation.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! propagation instrumentation, with a zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod attr;
pub mod config;
pub mod dirty;
pub mod node;
pub mod paint;
pub mod render;
pub mod scene;
pub mod shape;
pub mod trace;
pub mod transform;
