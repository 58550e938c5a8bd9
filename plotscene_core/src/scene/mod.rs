// Copyright 2026 the Plotscene Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Retained scene graph.
//!
//! A *node* is an entity in the plot's scene graph. Each node has:
//!
//! - An identity ([`NodeId`]), a generational handle that becomes stale when
//!   the node is destroyed, preventing use-after-free bugs at the API level.
//! - A kind and a [`NodeBehavior`](crate::node::NodeBehavior) that computes
//!   its local bounding box and paints it.
//! - An [`AttributeBag`](crate::attr::AttributeBag) holding every property,
//!   including the topology back-reference [`PARENT`](crate::node::PARENT).
//! - A dirty flag telling painters that the node or something below it
//!   changed since the last [`render`](Scene::render).
//!
//! Nodes of the container kind additionally own an ordered, uniquely
//! membered child list.
//!
//! # Lifecycle
//!
//! [`create_node`](Scene::create_node) → attach with
//! [`add_child`](Scene::add_child) → mutate attributes →
//! [`detach`](Scene::detach) (subtree leaves the graph; resources are queued
//! for [`drain_released`](Scene::drain_released)) →
//! [`destroy_node`](Scene::destroy_node) (slot is recycled).

mod attrs;
mod id;
mod store;
mod traverse;

pub use id::NodeId;
pub use store::Scene;
