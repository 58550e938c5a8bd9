// Copyright 2026 the Plotscene Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene subtree snapshots.
//!
//! [`dump_tree`] renders an indented, one-line-per-node outline for logs
//! and test failure messages. [`to_json`] produces the same information as
//! a nested [`serde_json::Value`].
//!
//! Both read geometry through [`Scene::get`], so stale Derived and Resolved
//! attributes are brought up to date as a side effect.

use std::fmt::Write as _;

use kurbo::Rect;
use plotscene_core::node::{CTM, FILL, STROKE, TRANSFORM, VISIBLE};
use plotscene_core::scene::{NodeId, Scene};
use plotscene_core::transform::AffineRepr;
use serde_json::{Value, json};

/// Renders the subtree rooted at `root` as indented text.
///
/// Each line shows the node's kind, handle, global bounding box, and local
/// transform, followed by `hidden`, `dirty`, or `detached` markers where
/// they apply.
#[must_use]
pub fn dump_tree(scene: &mut Scene, root: NodeId) -> String {
    let mut out = String::new();
    write_node(scene, root, 0, &mut out);
    out
}

fn write_node(scene: &mut Scene, id: NodeId, depth: usize, out: &mut String) {
    let bbox = scene.bbox_global(id);
    let transform = scene.get(id, TRANSFORM);
    let _ = write!(
        out,
        "{:indent$}{} {id:?} bbox={} transform={}",
        "",
        scene.kind_name(id),
        format_rect(bbox),
        AffineRepr(transform),
        indent = depth * 2,
    );
    if !scene.get(id, VISIBLE) {
        out.push_str(" hidden");
    }
    if scene.is_dirty(id) {
        out.push_str(" dirty");
    }
    if scene.is_detached(id) {
        out.push_str(" detached");
    }
    out.push('\n');

    let children = scene.children(id).to_vec();
    for child in children {
        write_node(scene, child, depth + 1, out);
    }
}

fn format_rect(rect: Rect) -> String {
    format!("[{}, {}, {}, {}]", rect.x0, rect.y0, rect.x1, rect.y1)
}

/// Returns the subtree rooted at `root` as nested JSON objects.
#[must_use]
pub fn to_json(scene: &mut Scene, root: NodeId) -> Value {
    let bbox = scene.bbox_global(root);
    let ctm = scene.get(root, CTM);
    let fill = scene.get(root, FILL).map(|c| c.to_string());
    let stroke = scene.get(root, STROKE).map(|c| c.to_string());
    let children: Vec<Value> = scene
        .children(root)
        .to_vec()
        .into_iter()
        .map(|child| to_json(scene, child))
        .collect();
    json!({
        "id": format!("{root:?}"),
        "kind": scene.kind_name(root),
        "visible": scene.get(root, VISIBLE),
        "dirty": scene.is_dirty(root),
        "detached": scene.is_detached(root),
        "ctm": ctm.as_coeffs(),
        "bbox": [bbox.x0, bbox.y0, bbox.x1, bbox.y1],
        "fill": fill,
        "stroke": stroke,
        "children": children,
    })
}
