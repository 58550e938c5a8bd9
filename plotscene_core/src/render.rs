// Copyright 2026 the Plotscene Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paint interface between the scene and a drawing backend.
//!
//! [`Scene::render`](crate::scene::Scene::render) walks visible nodes in
//! paint order and drives a [`RenderContext`]. Backends implement the trait
//! on top of a canvas, an SVG writer, or a GPU renderer. [`CommandList`]
//! records the calls instead, which is what tests and the debug tooling use.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use kurbo::{Affine, Point, Rect};

use crate::paint::Color;

/// An opaque handle to a backend-managed resource (image snapshot, texture).
///
/// Keys are assigned by the backend. The scene only hands them back through
/// [`Scene::drain_released`](crate::scene::Scene::drain_released) once the
/// node holding them is detached.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceKey(pub u64);

impl fmt::Debug for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResourceKey({})", self.0)
    }
}

/// Drawing operations a node kind may issue while rendering.
///
/// Geometry is given in the node's local coordinates; the scene installs the
/// node's current transform matrix with
/// [`set_transform`](Self::set_transform) before calling into the node.
pub trait RenderContext {
    /// Pushes the current transform.
    fn save(&mut self);

    /// Pops the transform pushed by the matching [`save`](Self::save).
    fn restore(&mut self);

    /// Replaces the current transform.
    fn set_transform(&mut self, transform: Affine);

    /// Fills a rectangle.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Strokes the outline of a rectangle.
    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f64);

    /// Draws a run of text with its baseline starting at `origin`.
    fn fill_text(&mut self, text: &str, origin: Point, font_size: f64, color: Color);

    /// Draws a backend image resource scaled into `rect`.
    fn draw_image(&mut self, image: ResourceKey, rect: Rect);
}

/// One recorded [`RenderContext`] call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// [`RenderContext::save`].
    Save,
    /// [`RenderContext::restore`].
    Restore,
    /// [`RenderContext::set_transform`].
    SetTransform(Affine),
    /// [`RenderContext::fill_rect`].
    FillRect {
        /// Local-space rectangle.
        rect: Rect,
        /// Fill color.
        color: Color,
    },
    /// [`RenderContext::stroke_rect`].
    StrokeRect {
        /// Local-space rectangle.
        rect: Rect,
        /// Stroke color.
        color: Color,
        /// Stroke width.
        width: f64,
    },
    /// [`RenderContext::fill_text`].
    FillText {
        /// The text run.
        text: String,
        /// Baseline origin.
        origin: Point,
        /// Font size in local units.
        font_size: f64,
        /// Fill color.
        color: Color,
    },
    /// [`RenderContext::draw_image`].
    DrawImage {
        /// The backend resource.
        image: ResourceKey,
        /// Destination rectangle.
        rect: Rect,
    },
}

impl DrawCommand {
    /// Whether the command puts pixels on the target (as opposed to state
    /// changes).
    #[must_use]
    pub fn is_paint(&self) -> bool {
        !matches!(self, Self::Save | Self::Restore | Self::SetTransform(_))
    }
}

/// A [`RenderContext`] that records every call in order.
#[derive(Clone, Debug, Default)]
pub struct CommandList {
    /// Recorded commands in call order.
    pub commands: Vec<DrawCommand>,
}

impl CommandList {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the list for reuse.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Number of commands that paint (excluding save/restore/transform).
    #[must_use]
    pub fn paint_count(&self) -> usize {
        self.commands.iter().filter(|c| c.is_paint()).count()
    }

    /// Iterates over the painting commands only.
    pub fn paints(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter().filter(|c| c.is_paint())
    }
}

impl RenderContext for CommandList {
    fn save(&mut self) {
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.commands.push(DrawCommand::Restore);
    }

    fn set_transform(&mut self, transform: Affine) {
        self.commands.push(DrawCommand::SetTransform(transform));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f64) {
        self.commands
            .push(DrawCommand::StrokeRect { rect, color, width });
    }

    fn fill_text(&mut self, text: &str, origin: Point, font_size: f64, color: Color) {
        self.commands.push(DrawCommand::FillText {
            text: text.to_string(),
            origin,
            font_size,
            color,
        });
    }

    fn draw_image(&mut self, image: ResourceKey, rect: Rect) {
        self.commands.push(DrawCommand::DrawImage { image, rect });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_in_call_order() {
        let mut list = CommandList::new();
        list.save();
        list.set_transform(Affine::translate((1.0, 2.0)));
        list.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::BLACK);
        list.draw_image(ResourceKey(7), Rect::new(0.0, 0.0, 2.0, 2.0));
        list.restore();

        assert_eq!(list.commands.len(), 5);
        assert_eq!(list.paint_count(), 2);
        assert_eq!(list.commands[0], DrawCommand::Save);
        assert_eq!(
            list.commands[1],
            DrawCommand::SetTransform(Affine::translate((1.0, 2.0)))
        );
        assert!(matches!(
            list.paints().last(),
            Some(DrawCommand::DrawImage {
                image: ResourceKey(7),
                ..
            })
        ));

        list.clear();
        assert!(list.commands.is_empty());
    }
}
