// Copyright 2026 the Plotscene Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree traversal, hit testing, and painting.

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use kurbo::Point;

use super::id::NodeId;
use super::store::Scene;
use crate::node::{CTM, VISIBLE};
use crate::render::RenderContext;

impl Scene {
    /// Returns the subtree rooted at `root` in pre-order: each node before
    /// its children, children in paint order.
    #[must_use]
    pub fn depth_first(&self, root: NodeId) -> Vec<NodeId> {
        self.validate(root);
        let mut order = Vec::new();
        let mut stack = Vec::from([root]);
        while let Some(node) = stack.pop() {
            order.push(node);
            stack.extend(self.children[node.idx as usize].iter().rev());
        }
        order
    }

    /// Returns the subtree rooted at `root` level by level.
    #[must_use]
    pub fn breadth_first(&self, root: NodeId) -> Vec<NodeId> {
        self.validate(root);
        let mut order = Vec::new();
        let mut queue = VecDeque::from([root]);
        while let Some(node) = queue.pop_front() {
            order.push(node);
            queue.extend(self.children[node.idx as usize].iter());
        }
        order
    }

    /// [`depth_first`](Self::depth_first) back to front: children (last
    /// first) before their parent, `root` last.
    #[must_use]
    pub fn reversed_depth_first(&self, root: NodeId) -> Vec<NodeId> {
        let mut order = self.depth_first(root);
        order.reverse();
        order
    }

    /// [`breadth_first`](Self::breadth_first) back to front, `root` last.
    #[must_use]
    pub fn reversed_breadth_first(&self, root: NodeId) -> Vec<NodeId> {
        let mut order = self.breadth_first(root);
        order.reverse();
        order
    }

    /// Returns the top-most visible leaf under `root` whose global bounding
    /// box contains `point` (edges included).
    ///
    /// Hidden containers hide their whole subtree.
    pub fn hit_test(&mut self, root: NodeId, point: Point) -> Option<NodeId> {
        if !self.get(root, VISIBLE) {
            return None;
        }
        if self.is_container(root) {
            let children = self.children(root).to_vec();
            return children
                .into_iter()
                .rev()
                .find_map(|child| self.hit_test(child, point));
        }
        let bbox = self.bbox_global(root);
        let inside = point.x >= bbox.x0
            && point.x <= bbox.x1
            && point.y >= bbox.y0
            && point.y <= bbox.y1;
        inside.then_some(root)
    }

    /// Paints the subtree rooted at `root` into `ctx` and clears the dirty
    /// flags of the whole subtree.
    ///
    /// Visible nodes are painted in pre-order: each node gets
    /// `save`, `set_transform(ctm)`, its behavior's
    /// [`render`](crate::node::NodeBehavior::render), and `restore`. Hidden
    /// nodes skip their subtree.
    pub fn render(&mut self, root: NodeId, ctx: &mut dyn RenderContext) {
        self.paint(root, ctx);
        for node in self.depth_first(root) {
            self.dirty[node.idx as usize] = false;
        }
    }

    fn paint(&mut self, id: NodeId, ctx: &mut dyn RenderContext) {
        if !self.get(id, VISIBLE) {
            return;
        }
        let ctm = self.get(id, CTM);
        let behavior = self.behavior(id);
        ctx.save();
        ctx.set_transform(ctm);
        behavior.render(self, id, ctx);
        ctx.restore();
        let children = self.children(id).to_vec();
        for child in children {
            self.paint(child, ctx);
        }
    }
}
