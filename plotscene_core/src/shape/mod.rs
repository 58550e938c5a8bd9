// Copyright 2026 the Plotscene Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Concrete node kinds.
//!
//! [`Group`] is the plain container and needs no registration. The other
//! kinds register their own attributes:
//!
//! ```
//! use std::rc::Rc;
//!
//! use plotscene_core::node::FILL;
//! use plotscene_core::paint::Color;
//! use plotscene_core::scene::Scene;
//! use plotscene_core::shape::{Group, Rectangle};
//!
//! let mut scene = Scene::default();
//! let rects = Rectangle::register(scene.registry_mut()).unwrap();
//!
//! let root = scene.create_node(Rc::new(Group));
//! let bar = rects.create(&mut scene, 0.0, 0.0, 10.0, 40.0);
//! scene.add_child(root, bar);
//! scene.set(root, FILL, Some(Color::BLACK));
//!
//! assert_eq!(scene.get(bar, FILL), Some(Color::BLACK));
//! assert_eq!(scene.bbox_global(root).height(), 40.0);
//! ```

mod group;
mod image;
mod label;
mod rectangle;

pub use group::Group;
pub use image::Image;
pub use label::{ASCENT, CHAR_ADVANCE, DEFAULT_FONT_SIZE, Label, TextAnchor, measure};
pub use rectangle::Rectangle;
