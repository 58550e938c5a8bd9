// Copyright 2026 the Plotscene Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene configuration.

/// How [`Scene::mark_dirty`](crate::scene::Scene::mark_dirty) walks up the
/// parent chain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DirtyPropagation {
    /// Stop at the first ancestor that is already dirty. Its own ancestors
    /// were marked when it became dirty.
    #[default]
    StopAtDirtyAncestor,
    /// Always walk to the root, re-marking every ancestor.
    Full,
}

/// Tunables for a [`Scene`](crate::scene::Scene).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneConfig {
    /// Dirty-flag propagation policy.
    pub dirty_propagation: DirtyPropagation,
    /// Number of node slots reserved up front.
    pub initial_capacity: usize,
}

impl SceneConfig {
    /// Configuration for interactive plots: early-out dirty propagation and
    /// a small slot reservation.
    #[must_use]
    pub const fn interactive() -> Self {
        Self {
            dirty_propagation: DirtyPropagation::StopAtDirtyAncestor,
            initial_capacity: 64,
        }
    }

    /// Configuration that re-marks every ancestor on each change. Useful when
    /// consumers clear dirty flags on arbitrary subtrees.
    #[must_use]
    pub const fn exhaustive() -> Self {
        Self {
            dirty_propagation: DirtyPropagation::Full,
            initial_capacity: 64,
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self::interactive()
    }
}
