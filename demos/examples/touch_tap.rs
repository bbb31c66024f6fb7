// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Touch input on a scrolled list: a tap, then a drag that is not a tap.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p understory_demos --example touch_tap`

use core::time::Duration;

use kurbo::{Point, Rect, Vec2};
use tracing_subscriber::EnvFilter;
use understory_event_tree::{LocalNode, Tree};
use understory_pointer::adapters::event_tree::Document;
use understory_pointer::engine::PointerEngine;
use understory_pointer::touch::{TouchInput, TouchKind, TouchPoint};
use understory_pointer::types::{PointerEventName, Target};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut tree = Tree::new();
    let html = tree.insert(None, LocalNode::with_bounds(Rect::new(0.0, 0.0, 360.0, 2000.0)));
    let list = tree.insert(Some(html), LocalNode::with_bounds(Rect::new(0.0, 0.0, 360.0, 2000.0)));
    let rows: Vec<_> = (0_u32..20)
        .map(|i| {
            let top = f64::from(i) * 100.0;
            tree.insert(Some(list), LocalNode::with_bounds(Rect::new(0.0, top, 360.0, top + 100.0)))
        })
        .collect();
    tree.set_scroll_offset(Vec2::new(0.0, 450.0));

    let mut doc = Document::new(tree);
    let mut engine = PointerEngine::new();
    engine.register(&mut doc, Target::Node(list), PointerEventName::Tap);
    engine.register(&mut doc, Target::Node(list), PointerEventName::Down);

    let ms = Duration::from_millis;

    // Tap at client y = 80, which is page y = 530: row 5.
    let finger = [TouchPoint::new(0, Some(rows[5]), Point::new(100.0, 80.0))];
    engine.handle_touch(&mut doc, &TouchInput::new(TouchKind::Start, &finger), ms(0));
    engine.handle_touch(&mut doc, &TouchInput::new(TouchKind::End, &finger), ms(90));

    // A drag of 40 px: no tap.
    let start = [TouchPoint::new(1, Some(rows[6]), Point::new(100.0, 180.0))];
    let end = [TouchPoint::new(1, Some(rows[6]), Point::new(100.0, 140.0))];
    engine.handle_touch(&mut doc, &TouchInput::new(TouchKind::Start, &start), ms(1_000));
    engine.handle_touch(&mut doc, &TouchInput::new(TouchKind::Move, &end), ms(1_050));
    engine.handle_touch(&mut doc, &TouchInput::new(TouchKind::End, &end), ms(1_100));

    println!("== Delivered ==");
    for d in doc.delivered() {
        println!(
            "  {:<12} target={:?} pointer={} ({}) offset=({}, {})",
            d.name.as_str(), d.target, d.pointer_id, d.pointer_type, d.offset.x, d.offset.y
        );
    }

    let taps: Vec<_> = doc
        .delivered()
        .iter()
        .filter(|d| d.name == PointerEventName::Tap)
        .map(|d| d.target)
        .collect();
    assert_eq!(taps, [rows[5]]);
}
