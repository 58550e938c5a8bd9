// Copyright 2026 the Plotscene Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Plain container.

use kurbo::Rect;

use crate::attr::KindId;
use crate::node::{CONTAINER, NodeBehavior};
use crate::scene::{NodeId, Scene};

/// A container that paints nothing itself.
///
/// Its local bounding box is the union of its visible children's boxes
/// ([`Scene::children_bbox`]).
#[derive(Clone, Copy, Debug, Default)]
pub struct Group;

impl NodeBehavior for Group {
    fn kind(&self) -> KindId {
        CONTAINER
    }

    fn calculate_local_bbox(&self, scene: &mut Scene, id: NodeId) -> Rect {
        scene.children_bbox(id)
    }
}
