// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Enter/leave derived from mouse over/out, and ghost mouse events after a touch.
//!
//! The host here has no native `mouseenter`/`mouseleave`, so the engine walks ancestors on every
//! `mouseover`/`mouseout` and only notifies nodes that were actually crossed.
//!
//! Run:
//! - `RUST_LOG=trace cargo run -p understory_demos --example mouse_hover`

use core::time::Duration;

use kurbo::{Point, Rect};
use tracing_subscriber::EnvFilter;
use understory_event_tree::{LocalNode, NodeId, Tree};
use understory_pointer::adapters::event_tree::Document;
use understory_pointer::engine::{MouseInput, MouseKind, PointerEngine};
use understory_pointer::synth::SourceEvent;
use understory_pointer::touch::{TouchInput, TouchKind, TouchPoint};
use understory_pointer::types::{PointerEventName, Target};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // html ⊃ menu ⊃ {open, save}, html ⊃ canvas
    let mut tree = Tree::new();
    let html = tree.insert(None, LocalNode::with_bounds(Rect::new(0.0, 0.0, 800.0, 600.0)));
    let menu = tree.insert(Some(html), LocalNode::with_bounds(Rect::new(0.0, 0.0, 200.0, 80.0)));
    let open = tree.insert(Some(menu), LocalNode::with_bounds(Rect::new(0.0, 0.0, 200.0, 40.0)));
    let save = tree.insert(Some(menu), LocalNode::with_bounds(Rect::new(0.0, 40.0, 200.0, 80.0)));
    let canvas = tree.insert(Some(html), LocalNode::with_bounds(Rect::new(0.0, 80.0, 800.0, 600.0)));

    let mut doc = Document::new(tree);
    let mut engine = PointerEngine::new();
    for node in [menu, open, save] {
        engine.register(&mut doc, Target::Node(node), PointerEventName::Enter);
        engine.register(&mut doc, Target::Node(node), PointerEventName::Leave);
    }
    engine.register(&mut doc, Target::Window, PointerEventName::Down);

    let ms = Duration::from_millis;
    let mouse = |kind, target, related, at| {
        MouseInput::new(kind, SourceEvent::at(at).with_target(target).with_related(related))
    };

    // canvas → open → save → canvas
    let moves = [
        (canvas, open, Point::new(20.0, 20.0)),
        (open, save, Point::new(20.0, 60.0)),
        (save, canvas, Point::new(20.0, 120.0)),
    ];
    for (i, (from, to, at)) in moves.into_iter().enumerate() {
        let t = ms(10 * i as u64);
        engine.handle_mouse(&mut doc, &mouse(MouseKind::Out, from, Some(to), at), t);
        engine.handle_mouse(&mut doc, &mouse(MouseKind::Over, to, Some(from), at), t);
    }

    let name_of = |n: NodeId| match n {
        n if n == menu => "menu",
        n if n == open => "open",
        n if n == save => "save",
        _ => "other",
    };
    println!("== Hover ==");
    let hover: Vec<_> = doc
        .take_delivered()
        .into_iter()
        .map(|d| (d.name, name_of(d.target)))
        .collect();
    for (name, node) in &hover {
        println!("  {name} {node}");
    }
    assert_eq!(
        hover,
        [
            (PointerEventName::Enter, "menu"),
            (PointerEventName::Enter, "open"),
            (PointerEventName::Leave, "open"),
            (PointerEventName::Enter, "save"),
            (PointerEventName::Leave, "save"),
            (PointerEventName::Leave, "menu"),
        ]
    );

    // A touch, followed by the compatibility mousedown the platform sends 300 ms later.
    let finger = [TouchPoint::new(0, Some(canvas), Point::new(400.0, 300.0))];
    engine.handle_touch(&mut doc, &TouchInput::new(TouchKind::Start, &finger), ms(1_000));
    engine.handle_touch(&mut doc, &TouchInput::new(TouchKind::End, &finger), ms(1_080));
    let at = Point::new(400.0, 300.0);
    engine.handle_mouse(&mut doc, &mouse(MouseKind::Down, canvas, None, at), ms(1_380));
    // A real click well after the suppression window.
    engine.handle_mouse(&mut doc, &mouse(MouseKind::Down, canvas, None, at), ms(2_000));

    println!("== Down ==");
    for d in doc.delivered() {
        println!("  {} pointer={} ({})", d.name, d.pointer_id, d.pointer_type);
    }
    let ids: Vec<_> = doc.delivered().iter().map(|d| d.pointer_id).collect();
    assert_eq!(ids, [2, 1]);
}
