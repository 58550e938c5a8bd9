// Copyright 2026 the Plotscene Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Built-in node attributes and the per-kind behavior trait.
//!
//! Every node carries the attributes below. They are registered by
//! [`AttributeRegistry::new`](crate::attr::AttributeRegistry::new) in a fixed
//! order, which is what makes them usable as constants.
//!
//! | Spec            | Kind     | Type              | Flags                    |
//! |-----------------|----------|-------------------|--------------------------|
//! | [`PARENT`]      | Variable | `Option<NodeId>`  | affects bbox             |
//! | [`TRANSFORM`]   | Variable | `Affine`          | affects bbox             |
//! | [`VISIBLE`]     | Variable | `bool`            | affects bbox             |
//! | [`FILL`]        | Variable | `Option<Color>`   | repaint, inheritable     |
//! | [`STROKE`]      | Variable | `Option<Color>`   | repaint, inheritable     |
//! | [`STROKE_WIDTH`]| Variable | `f64`             | repaint, inheritable     |
//! | [`BBOX_LOCAL`]  | Derived  | `Rect`            |                          |
//! | [`CTM`]         | Resolved | `Affine`          |                          |

use core::any::Any;
use core::fmt;

use kurbo::{Affine, Rect};

use crate::attr::{AttributeRegistry, AttributeSpec, AttributeValue, KindId, SpecFlags, SpecId};
use crate::paint::Color;
use crate::render::RenderContext;
use crate::scene::{NodeId, Scene};

/// The root node kind. Every other kind descends from it.
pub const NODE: KindId = KindId(0);

/// The built-in container kind: a node owning an ordered child list.
pub const CONTAINER: KindId = KindId(1);

/// The container holding the node, if any.
pub const PARENT: AttributeSpec<Option<NodeId>> = AttributeSpec::from_raw(0);

/// Transform from the node's local space to its parent's space.
pub const TRANSFORM: AttributeSpec<Affine> = AttributeSpec::from_raw(1);

/// Whether the node (and its subtree) is painted and counted in container
/// bounds.
pub const VISIBLE: AttributeSpec<bool> = AttributeSpec::from_raw(2);

/// Fill paint. Containers push their value to children still at default.
pub const FILL: AttributeSpec<Option<Color>> = AttributeSpec::from_raw(3);

/// Stroke paint. Containers push their value to children still at default.
pub const STROKE: AttributeSpec<Option<Color>> = AttributeSpec::from_raw(4);

/// Stroke width. Containers push their value to children still at default.
pub const STROKE_WIDTH: AttributeSpec<f64> = AttributeSpec::from_raw(5);

/// Bounding box in local coordinates, computed by the node kind's
/// [`NodeBehavior::calculate_local_bbox`].
///
/// Has no static dependencies; geometry changes invalidate it explicitly
/// through [`Scene::invalidate_geometry`].
pub const BBOX_LOCAL: AttributeSpec<Rect> = AttributeSpec::from_raw(6);

/// Current transform matrix: local space to scene space.
///
/// Resolved as `parent_ctm * transform`, with the identity for roots.
pub const CTM: AttributeSpec<Affine> = AttributeSpec::from_raw(7);

/// Registers the built-in node attributes on a fresh registry.
///
/// # Panics
///
/// Panics if the registry already holds attributes.
pub(crate) fn register_builtins(registry: &mut AttributeRegistry) {
    let registered = register_builtin_specs(registry)
        .unwrap_or_else(|err| panic!("built-in node attributes failed to register: {err}"));
    assert!(
        registered
            == [
                PARENT.id(),
                TRANSFORM.id(),
                VISIBLE.id(),
                FILL.id(),
                STROKE.id(),
                STROKE_WIDTH.id(),
                BBOX_LOCAL.id(),
                CTM.id(),
            ],
        "built-in node attributes must be registered first"
    );
}

fn register_builtin_specs(
    registry: &mut AttributeRegistry,
) -> Result<[SpecId; 8], crate::attr::RegistryError> {
    let bbox = SpecFlags::AFFECTS_BBOX;
    let paint = SpecFlags::INHERITED_PAINT;
    let parent = registry.register_variable(NODE, "parent", None::<NodeId>, bbox)?;
    let transform = registry.register_variable(NODE, "transform", Affine::IDENTITY, bbox)?;
    let visible = registry.register_variable(NODE, "visible", true, bbox)?;
    let fill = registry.register_variable(NODE, "fill", None::<Color>, paint)?;
    let stroke = registry.register_variable(NODE, "stroke", None::<Color>, paint)?;
    let stroke_width = registry.register_variable(NODE, "stroke_width", 1.0_f64, paint)?;
    let bbox_local = registry.register_derived(
        NODE,
        "bbox_local",
        &[],
        |scene: &mut Scene, id: NodeId| {
            let behavior = scene.behavior(id);
            behavior.calculate_local_bbox(scene, id)
        },
        SpecFlags::NONE,
    )?;
    let ctm = registry.register_resolved(
        NODE,
        "ctm",
        &[TRANSFORM.id(), PARENT.id()],
        |scene: &mut Scene, id: NodeId, parent: Option<&Affine>| {
            parent.copied().unwrap_or(Affine::IDENTITY) * scene.get(id, TRANSFORM)
        },
        SpecFlags::NONE,
    )?;
    Ok([
        parent.id(),
        transform.id(),
        visible.id(),
        fill.id(),
        stroke.id(),
        stroke_width.id(),
        bbox_local.id(),
        ctm.id(),
    ])
}

/// A change notification delivered to [`NodeBehavior::on_attribute_changed`].
///
/// Values are type-erased; use [`values`](Self::values) with the typed spec
/// to read them.
#[derive(Clone, Copy)]
pub struct AttributeChange<'a> {
    /// Node whose attribute changed.
    pub node: NodeId,
    /// Which attribute changed.
    pub spec: SpecId,
    pub(crate) old: &'a dyn Any,
    pub(crate) new: &'a dyn Any,
}

impl<'a> AttributeChange<'a> {
    /// Whether the change concerns `spec`.
    #[must_use]
    pub fn is<T>(&self, spec: AttributeSpec<T>) -> bool {
        self.spec == spec.id()
    }

    /// Returns `(old, new)` if the change concerns `spec`.
    #[must_use]
    pub fn values<T: AttributeValue>(&self, spec: AttributeSpec<T>) -> Option<(&'a T, &'a T)> {
        if !self.is(spec) {
            return None;
        }
        Some((self.old.downcast_ref()?, self.new.downcast_ref()?))
    }
}

impl fmt::Debug for AttributeChange<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeChange")
            .field("node", &self.node)
            .field("spec", &self.spec)
            .finish_non_exhaustive()
    }
}

/// Per-kind behavior of a scene node.
///
/// The scene stores one `Rc<dyn NodeBehavior>` per node. Implementations are
/// usually small structs holding the typed spec handles of the kind's own
/// attributes. Every method receives the scene so it can read attributes;
/// the node's own attributes are accessed through `id`.
pub trait NodeBehavior: fmt::Debug {
    /// The registered kind this behavior implements.
    fn kind(&self) -> KindId;

    /// Computes the node's bounding box in local coordinates.
    ///
    /// Called lazily when [`BBOX_LOCAL`] is read while invalidated.
    fn calculate_local_bbox(&self, scene: &mut Scene, id: NodeId) -> Rect {
        _ = (scene, id);
        Rect::ZERO
    }

    /// Issues draw calls in local coordinates. The context already holds the
    /// node's [`CTM`].
    fn render(&self, scene: &mut Scene, id: NodeId, ctx: &mut dyn RenderContext) {
        _ = (scene, id, ctx);
    }

    /// Called after the scene finished its own bookkeeping for a change.
    fn on_attribute_changed(&self, scene: &mut Scene, change: &AttributeChange<'_>) {
        _ = (scene, change);
    }

    /// Called once per node when its subtree is detached, parents first.
    /// Resources the node holds should be handed to
    /// [`Scene::release_resource`].
    fn on_detach(&self, scene: &mut Scene, id: NodeId) {
        _ = (scene, id);
    }
}

/// A childless node of the root kind with an empty bounding box.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainNode;

impl NodeBehavior for PlainNode {
    fn kind(&self) -> KindId {
        NODE
    }
}
