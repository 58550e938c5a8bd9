// Copyright 2026 the Plotscene Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis-aligned rectangles.

use alloc::rc::Rc;

use kurbo::Rect;

use crate::attr::{AttributeRegistry, AttributeSpec, KindId, RegistryError, SpecFlags};
use crate::node::{FILL, NODE, NodeBehavior, STROKE, STROKE_WIDTH};
use crate::render::RenderContext;
use crate::scene::{NodeId, Scene};

/// The `rectangle` node kind: bars, tiles, panel backgrounds.
///
/// Holds the handles of the kind's attributes. Create one per registry with
/// [`register`](Self::register).
#[derive(Clone, Copy, Debug)]
pub struct Rectangle {
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
    /// The rectangle assembled from the four numbers.
    pub rect: AttributeSpec<Rect>,
}

impl Rectangle {
    /// Registers the kind and its attributes.
    ///
    /// # Errors
    ///
    /// Fails if the registry already holds a `rectangle` kind.
    pub fn register(registry: &mut AttributeRegistry) -> Result<Self, RegistryError> {
        let kind = registry.register_kind("rectangle", NODE)?;
        let x = registry.register_variable(kind, "x", 0.0, SpecFlags::AFFECTS_BBOX)?;
        let y = registry.register_variable(kind, "y", 0.0, SpecFlags::AFFECTS_BBOX)?;
        let width = registry.register_variable(kind, "width", 0.0, SpecFlags::AFFECTS_BBOX)?;
        let height = registry.register_variable(kind, "height", 0.0, SpecFlags::AFFECTS_BBOX)?;
        let rect = registry.register_derived(
            kind,
            "rect",
            &[x.id(), y.id(), width.id(), height.id()],
            move |scene: &mut Scene, id: NodeId| {
                Rect::from_origin_size(
                    (scene.get(id, x), scene.get(id, y)),
                    (scene.get(id, width), scene.get(id, height)),
                )
            },
            SpecFlags::NONE,
        )?;
        Ok(Self {
            kind,
            x,
            y,
            width,
            height,
            rect,
        })
    }

    /// Creates a rectangle node with the given geometry.
    pub fn create(&self, scene: &mut Scene, x: f64, y: f64, width: f64, height: f64) -> NodeId {
        let id = scene.create_node(Rc::new(*self));
        scene.set(id, self.x, x);
        scene.set(id, self.y, y);
        scene.set(id, self.width, width);
        scene.set(id, self.height, height);
        id
    }
}

impl NodeBehavior for Rectangle {
    fn kind(&self) -> KindId {
        self.kind
    }

    fn calculate_local_bbox(&self, scene: &mut Scene, id: NodeId) -> Rect {
        scene.get(id, self.rect)
    }

    fn render(&self, scene: &mut Scene, id: NodeId, ctx: &mut dyn RenderContext) {
        let rect = scene.get(id, self.rect);
        if let Some(fill) = scene.get(id, FILL) {
            ctx.fill_rect(rect, fill);
        }
        if let Some(stroke) = scene.get(id, STROKE) {
            ctx.stroke_rect(rect, stroke, scene.get(id, STROKE_WIDTH));
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::node::BBOX_LOCAL;
    use crate::paint::Color;
    use crate::render::{CommandList, DrawCommand};

    #[test]
    fn geometry_follows_attributes() {
        let mut scene = Scene::default();
        let rects = Rectangle::register(scene.registry_mut()).unwrap();
        let id = rects.create(&mut scene, 1.0, 2.0, 3.0, 4.0);
        assert_eq!(scene.get(id, BBOX_LOCAL), Rect::new(1.0, 2.0, 4.0, 6.0));

        scene.set(id, rects.width, 10.0);
        assert!(scene.bag(id).derived(rects.rect).is_dirty());
        assert_eq!(scene.get(id, BBOX_LOCAL), Rect::new(1.0, 2.0, 11.0, 6.0));
    }

    #[test]
    fn paints_fill_then_stroke() {
        let mut scene = Scene::default();
        let rects = Rectangle::register(scene.registry_mut()).unwrap();
        let id = rects.create(&mut scene, 0.0, 0.0, 2.0, 2.0);
        scene.set(id, FILL, Some(Color::WHITE));
        scene.set(id, STROKE, Some(Color::BLACK));
        scene.set(id, STROKE_WIDTH, 0.5);

        let mut list = CommandList::new();
        scene.render(id, &mut list);
        let rect = Rect::new(0.0, 0.0, 2.0, 2.0);
        assert_eq!(
            list.paints().cloned().collect::<alloc::vec::Vec<_>>(),
            vec![
                DrawCommand::FillRect {
                    rect,
                    color: Color::WHITE
                },
                DrawCommand::StrokeRect {
                    rect,
                    color: Color::BLACK,
                    width: 0.5
                },
            ]
        );
    }

    #[test]
    fn registering_twice_fails() {
        let mut registry = AttributeRegistry::new();
        Rectangle::register(&mut registry).unwrap();
        assert!(matches!(
            Rectangle::register(&mut registry),
            Err(RegistryError::DuplicateKind(_))
        ));
    }
}
