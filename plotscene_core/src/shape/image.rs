// Copyright 2026 the Plotscene Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raster snapshots backed by renderer resources.

use alloc::rc::Rc;

use kurbo::Rect;

use crate::attr::{AttributeRegistry, AttributeSpec, KindId, RegistryError, SpecFlags};
use crate::node::{NODE, NodeBehavior};
use crate::render::{RenderContext, ResourceKey};
use crate::scene::{NodeId, Scene};

/// The `image` node kind.
///
/// The pixels live in the renderer; the node only holds the
/// [`ResourceKey`]. When the node is detached the key is cleared and handed
/// to [`Scene::drain_released`] so the backend can free it.
#[derive(Clone, Copy, Debug)]
pub struct Image {
    /// The registered kind.
    pub kind: KindId,
    /// Left edge.
    pub x: AttributeSpec<f64>,
    /// Top edge.
    pub y: AttributeSpec<f64>,
    /// Width.
    pub width: AttributeSpec<f64>,
    /// Height.
    pub height: AttributeSpec<f64>,
    /// The backend resource, if one is attached.
    pub snapshot: AttributeSpec<Option<ResourceKey>>,
}

impl Image {
    /// Registers the kind and its attributes.
    ///
    /// # Errors
    ///
    /// Fails if the registry already holds an `image` kind.
    pub fn register(registry: &mut AttributeRegistry) -> Result<Self, RegistryError> {
        let kind = registry.register_kind("image", NODE)?;
        Ok(Self {
            kind,
            x: registry.register_variable(kind, "x", 0.0, SpecFlags::AFFECTS_BBOX)?,
            y: registry.register_variable(kind, "y", 0.0, SpecFlags::AFFECTS_BBOX)?,
            width: registry.register_variable(kind, "width", 0.0, SpecFlags::AFFECTS_BBOX)?,
            height: registry.register_variable(kind, "height", 0.0, SpecFlags::AFFECTS_BBOX)?,
            snapshot: registry.register_variable(kind, "snapshot", None, SpecFlags::REPAINT)?,
        })
    }

    /// Creates an image node covering `rect` and showing `snapshot`.
    pub fn create(&self, scene: &mut Scene, rect: Rect, snapshot: ResourceKey) -> NodeId {
        let id = scene.create_node(Rc::new(*self));
        scene.set(id, self.x, rect.x0);
        scene.set(id, self.y, rect.y0);
        scene.set(id, self.width, rect.width());
        scene.set(id, self.height, rect.height());
        scene.set(id, self.snapshot, Some(snapshot));
        id
    }

    fn rect(&self, scene: &mut Scene, id: NodeId) -> Rect {
        Rect::from_origin_size(
            (scene.get(id, self.x), scene.get(id, self.y)),
            (scene.get(id, self.width), scene.get(id, self.height)),
        )
    }
}

impl NodeBehavior for Image {
    fn kind(&self) -> KindId {
        self.kind
    }

    fn calculate_local_bbox(&self, scene: &mut Scene, id: NodeId) -> Rect {
        self.rect(scene, id)
    }

    fn render(&self, scene: &mut Scene, id: NodeId, ctx: &mut dyn RenderContext) {
        if let Some(image) = scene.get(id, self.snapshot) {
            let rect = self.rect(scene, id);
            ctx.draw_image(image, rect);
        }
    }

    fn on_detach(&self, scene: &mut Scene, id: NodeId) {
        if let Some(image) = scene.get(id, self.snapshot) {
            scene.set(id, self.snapshot, None);
            scene.release_resource(id, image);
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::render::{CommandList, DrawCommand};
    use crate::shape::Group;

    #[test]
    fn draws_its_snapshot() {
        let mut scene = Scene::default();
        let images = Image::register(scene.registry_mut()).unwrap();
        let rect = Rect::new(1.0, 1.0, 5.0, 3.0);
        let id = images.create(&mut scene, rect, ResourceKey(7));

        let mut list = CommandList::new();
        scene.render(id, &mut list);
        assert_eq!(
            list.paints().cloned().collect::<alloc::vec::Vec<_>>(),
            vec![DrawCommand::DrawImage {
                image: ResourceKey(7),
                rect
            }]
        );
    }

    #[test]
    fn detach_releases_the_snapshot_once() {
        let mut scene = Scene::default();
        let images = Image::register(scene.registry_mut()).unwrap();
        let root = scene.create_node(Rc::new(Group));
        let inner = scene.create_node(Rc::new(Group));
        let a = images.create(&mut scene, Rect::new(0.0, 0.0, 1.0, 1.0), ResourceKey(1));
        let b = images.create(&mut scene, Rect::new(0.0, 0.0, 1.0, 1.0), ResourceKey(2));
        scene.set_children(root, &[inner, b]);
        scene.add_child(inner, a);

        scene.detach(root);
        assert_eq!(scene.drain_released(), vec![ResourceKey(1), ResourceKey(2)]);
        assert_eq!(scene.get(a, images.snapshot), None);
        assert_eq!(scene.get(b, images.snapshot), None);

        scene.destroy_node(a);
        assert!(scene.drain_released().is_empty(), "already released");
    }

    #[test]
    fn missing_snapshot_paints_nothing() {
        let mut scene = Scene::default();
        let images = Image::register(scene.registry_mut()).unwrap();
        let id = images.create(&mut scene, Rect::new(0.0, 0.0, 1.0, 1.0), ResourceKey(3));
        scene.set(id, images.snapshot, None);

        let mut list = CommandList::new();
        scene.render(id, &mut list);
        assert_eq!(list.paint_count(), 0);
    }
}
