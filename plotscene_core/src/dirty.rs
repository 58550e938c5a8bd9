// Copyright 2026 the Plotscene Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dependency-graph channel constants.
//!
//! The [`AttributeRegistry`](crate::attr::AttributeRegistry) stores the
//! static dependency edges between attribute specs in an
//! [`understory_dirty`] tracker keyed by spec index. Derived specs get an edge
//! to each declared dependency on [`DEPENDS_ON`], with cycle detection set to
//! [`CycleHandling::Error`](understory_dirty::CycleHandling::Error).
//!
//! # Propagation semantics
//!
//! Marking a spec with [`EagerPolicy`](understory_dirty::EagerPolicy) marks
//! every Derived spec whose transitive closure contains it. Draining the
//! channel therefore yields the inverted closure ("dependents") that the
//! registry memoizes per node kind.
//!
//! Edges only point from a new spec to specs registered before it, so the
//! graph is acyclic by construction and the cycle check never fires through
//! the public registration API.
//!
//! Resolved specs never get edges: they refresh against their parent chain on
//! read and detect staleness with version counters instead.

use understory_dirty::Channel;

/// Derived-spec dependency edges.
pub const DEPENDS_ON: Channel = Channel::new(0);
