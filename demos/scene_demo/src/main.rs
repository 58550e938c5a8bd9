// Copyright 2026 the Plotscene Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bar chart scene that exercises propagation, painting, and diagnostics.
//!
//! Builds a chart with a title, one bar and one tick label per value, and a
//! legend swatch backed by an image resource. It then:
//!
//! 1. paints the scene into a [`CommandList`] and prints a tree dump,
//! 2. edits one value with a
//!    [`PrettyPrintSink`](plotscene_debug::pretty::PrettyPrintSink) installed,
//!    showing which attributes are invalidated and recomputed,
//! 3. records the removal of the legend with a
//!    [`RecorderSink`](plotscene_debug::recorder::RecorderSink) and writes a
//!    Chrome trace JSON file.

use std::fs::File;
use std::io::BufWriter;
use std::rc::Rc;

use kurbo::{Affine, Point, Rect};
use plotscene_core::attr::AttributeRegistry;
use plotscene_core::config::SceneConfig;
use plotscene_core::node::{FILL, STROKE, TRANSFORM};
use plotscene_core::paint::Color;
use plotscene_core::render::{CommandList, ResourceKey};
use plotscene_core::scene::{NodeId, Scene};
use plotscene_core::shape::{Group, Image, Label, Rectangle, TextAnchor};
use plotscene_debug::dump::dump_tree;
use plotscene_debug::export::export;
use plotscene_debug::pretty::PrettyPrintSink;
use plotscene_debug::recorder::RecorderSink;

const VALUES: [f64; 4] = [3.0, 7.0, 5.0, 9.0];
const BAR_WIDTH: f64 = 20.0;
const BAR_GAP: f64 = 10.0;
const UNIT: f64 = 10.0;
const TRACE_PATH: &str = "scene_trace.json";

struct Chart {
    root: NodeId,
    bars: Vec<NodeId>,
    legend: NodeId,
    rects: Rectangle,
}

fn build(scene: &mut Scene) -> Chart {
    let rects = Rectangle::register(scene.registry_mut()).expect("fresh registry");
    let labels = Label::register(scene.registry_mut()).expect("fresh registry");
    let images = Image::register(scene.registry_mut()).expect("fresh registry");

    let root = scene.create_node(Rc::new(Group));
    let title = labels.create(scene, "Quarterly totals", 70.0, 20.0);
    scene.set(title, labels.anchor, TextAnchor::Middle);
    scene.set(title, labels.font_size, 18.0);
    scene.add_child(root, title);

    // Plot area: y grows upwards from the baseline at 120.
    let plot = scene.create_node(Rc::new(Group));
    scene.set(
        plot,
        TRANSFORM,
        Affine::translate((20.0, 120.0)) * Affine::scale_non_uniform(1.0, -1.0),
    );
    scene.add_child(root, plot);
    scene.set(plot, FILL, Some(Color::rgb(0x4c, 0x72, 0xb0)));
    scene.set(plot, STROKE, Some(Color::BLACK));

    let ticks = scene.create_node(Rc::new(Group));
    scene.set(ticks, TRANSFORM, Affine::translate((20.0, 136.0)));
    scene.add_child(root, ticks);

    let mut bars = Vec::with_capacity(VALUES.len());
    let mut x = 0.0;
    for (i, value) in VALUES.into_iter().enumerate() {
        let bar = rects.create(scene, x, 0.0, BAR_WIDTH, value * UNIT);
        scene.add_child(plot, bar);
        bars.push(bar);

        let tick = labels.create(scene, format!("Q{}", i + 1), x + BAR_WIDTH / 2.0, 0.0);
        scene.set(tick, labels.anchor, TextAnchor::Middle);
        scene.set(tick, labels.font_size, 10.0);
        scene.add_child(ticks, tick);

        x += BAR_WIDTH + BAR_GAP;
    }

    let legend = images.create(scene, Rect::new(150.0, 30.0, 166.0, 46.0), ResourceKey(1));
    scene.add_child(root, legend);

    Chart {
        root,
        bars,
        legend,
        rects,
    }
}

fn main() {
    let mut scene = Scene::with_config(AttributeRegistry::new(), SceneConfig::interactive());
    let chart = build(&mut scene);

    // -- first paint -------------------------------------------------------
    let mut commands = CommandList::new();
    scene.render(chart.root, &mut commands);
    println!(
        "painted {} commands ({} paint operations)",
        commands.commands.len(),
        commands.paint_count()
    );
    print!("{}", dump_tree(&mut scene, chart.root));

    // -- traced edit -------------------------------------------------------
    println!("\nraising Q2 to 12:");
    scene.set_trace_sink(Box::new(PrettyPrintSink::new(Box::new(std::io::stdout()))));
    scene.set(chart.bars[1], chart.rects.height, 12.0 * UNIT);
    let bbox = scene.bbox_global(chart.root);
    drop(scene.take_trace_sink());
    println!("chart bounds now {bbox:?}");

    let cursor = Point::new(20.0 + BAR_WIDTH + BAR_GAP + 5.0, 10.0);
    match scene.hit_test(chart.root, cursor) {
        Some(hit) => println!("hit at {cursor:?}: {hit:?}"),
        None => println!("nothing at {cursor:?}"),
    }

    // -- recorded detach ---------------------------------------------------
    let recorder = RecorderSink::new();
    let log = recorder.log();
    scene.set_trace_sink(Box::new(recorder));
    scene.detach(chart.legend);
    scene.destroy_node(chart.legend);
    drop(scene.take_trace_sink());

    println!("\nreleased resources: {:?}", scene.drain_released());
    println!("recorded {} events", log.len());
    match File::create(TRACE_PATH) {
        Ok(file) => {
            let mut writer = BufWriter::new(file);
            match export(&log.snapshot(), &mut writer) {
                Ok(()) => println!("wrote {TRACE_PATH}"),
                Err(err) => eprintln!("failed to write {TRACE_PATH}: {err}"),
            }
        }
        Err(err) => eprintln!("failed to create {TRACE_PATH}: {err}"),
    }

    commands.clear();
    scene.render(chart.root, &mut commands);
    println!("repainted {} paint operations", commands.paint_count());
}
