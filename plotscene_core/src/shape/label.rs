// Copyright 2026 the Plotscene Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-line text labels: axis ticks, titles, legend entries.
//!
//! Text is measured with a fixed advance per character rather than real
//! font metrics, which keeps layout deterministic across platforms.

use alloc::rc::Rc;
use alloc::string::String;

use kurbo::{Point, Rect};
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::attr::{AttributeRegistry, AttributeSpec, KindId, RegistryError, SpecFlags};
use crate::node::{FILL, NODE, NodeBehavior};
use crate::paint::Color;
use crate::render::RenderContext;
use crate::scene::{NodeId, Scene};

/// Font size used when none is set.
pub const DEFAULT_FONT_SIZE: f64 = 16.0;

/// Advance of one character, as a fraction of the font size.
pub const CHAR_ADVANCE: f64 = 0.6;

/// Height of the ascent above the baseline, as a fraction of the font size.
pub const ASCENT: f64 = 0.8;

/// Horizontal alignment of a label relative to its `x` position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextAnchor {
    /// Text starts at `x`.
    #[default]
    Start,
    /// Text is centered on `x`.
    Middle,
    /// Text ends at `x`.
    End,
}

impl TextAnchor {
    /// Distance from the left edge of the text to the anchor point.
    #[must_use]
    pub fn offset(self, width: f64) -> f64 {
        match self {
            Self::Start => 0.0,
            Self::Middle => width / 2.0,
            Self::End => width,
        }
    }
}

/// Estimated advance width of `text` at `font_size`, rounded to whole units.
#[must_use]
pub fn measure(text: &str, font_size: f64) -> f64 {
    let chars = text.chars().count() as f64;
    (chars * font_size * CHAR_ADVANCE).round()
}

/// The `label` node kind.
#[derive(Clone, Copy, Debug)]
pub struct Label {
    /// The registered kind.
    pub kind: KindId,
    /// Text content.
    pub text: AttributeSpec<String>,
    /// Anchor position.
    pub x: AttributeSpec<f64>,
    /// Baseline position.
    pub y: AttributeSpec<f64>,
    /// Font size, [`DEFAULT_FONT_SIZE`] until set.
    pub font_size: AttributeSpec<f64>,
    /// Horizontal alignment.
    pub anchor: AttributeSpec<TextAnchor>,
    /// Measured width of the text.
    pub text_width: AttributeSpec<f64>,
    /// Box covering the text, from the ascent line to the descent line.
    pub text_box: AttributeSpec<Rect>,
}

impl Label {
    /// Registers the kind and its attributes.
    ///
    /// # Errors
    ///
    /// Fails if the registry already holds a `label` kind.
    pub fn register(registry: &mut AttributeRegistry) -> Result<Self, RegistryError> {
        let kind = registry.register_kind("label", NODE)?;
        let text =
            registry.register_variable(kind, "text", String::new(), SpecFlags::AFFECTS_BBOX)?;
        let x = registry.register_variable(kind, "x", 0.0, SpecFlags::AFFECTS_BBOX)?;
        let y = registry.register_variable(kind, "y", 0.0, SpecFlags::AFFECTS_BBOX)?;
        let font_size = registry.register_variable(
            kind,
            "font_size",
            DEFAULT_FONT_SIZE,
            SpecFlags::AFFECTS_BBOX,
        )?;
        let anchor =
            registry.register_variable(kind, "anchor", TextAnchor::Start, SpecFlags::AFFECTS_BBOX)?;
        let text_width = registry.register_derived(
            kind,
            "text_width",
            &[text.id(), font_size.id()],
            move |scene: &mut Scene, id: NodeId| {
                let content = scene.get(id, text);
                measure(&content, scene.get(id, font_size))
            },
            SpecFlags::NONE,
        )?;
        let text_box = registry.register_derived(
            kind,
            "text_box",
            &[text_width.id(), x.id(), y.id(), font_size.id(), anchor.id()],
            move |scene: &mut Scene, id: NodeId| {
                let width = scene.get(id, text_width);
                let size = scene.get(id, font_size);
                let left = scene.get(id, x) - scene.get(id, anchor).offset(width);
                let top = scene.get(id, y) - ASCENT * size;
                Rect::new(left, top, left + width, top + size)
            },
            SpecFlags::NONE,
        )?;
        Ok(Self {
            kind,
            text,
            x,
            y,
            font_size,
            anchor,
            text_width,
            text_box,
        })
    }

    /// Creates a label node showing `text` anchored at (`x`, `y`).
    pub fn create(&self, scene: &mut Scene, text: impl Into<String>, x: f64, y: f64) -> NodeId {
        let id = scene.create_node(Rc::new(*self));
        scene.set(id, self.text, text.into());
        scene.set(id, self.x, x);
        scene.set(id, self.y, y);
        id
    }
}

impl NodeBehavior for Label {
    fn kind(&self) -> KindId {
        self.kind
    }

    fn calculate_local_bbox(&self, scene: &mut Scene, id: NodeId) -> Rect {
        scene.get(id, self.text_box)
    }

    fn render(&self, scene: &mut Scene, id: NodeId, ctx: &mut dyn RenderContext) {
        let text = scene.get(id, self.text);
        if text.is_empty() {
            return;
        }
        let text_box = scene.get(id, self.text_box);
        let origin = Point::new(text_box.x0, scene.get(id, self.y));
        let color = scene.get(id, FILL).unwrap_or(Color::BLACK);
        ctx.fill_text(&text, origin, scene.get(id, self.font_size), color);
    }
}
