// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host implementation for Understory Event Tree.
//!
//! ## Feature
//!
//! Enable with `event_tree_adapter`.
//!
//! ## Notes
//!
//! [`Tree`] implements [`HostTree`] directly: parent links, containment, the document element,
//! element offsets, hit testing and scroll offset all come from the tree.
//!
//! [`Document`] wraps a tree into a full [`HostEvents`] host. It keeps a reference count of
//! attached native listeners, records every dispatched event together with its propagation path,
//! and runs an optional handler so callers can cancel events the way page scripts would.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::fmt;

use kurbo::{Point, Vec2};
use understory_event_tree::{NodeId, Tree};

use crate::synth::PointerEvent;
use crate::types::{HostEvents, HostTree, ParentLookup, PointerEventName, PointerType, Target};

impl ParentLookup<NodeId> for Tree {
    fn parent_of(&self, node: &NodeId) -> Option<NodeId> {
        Self::parent_of(self, *node)
    }
}

impl HostTree<NodeId> for Tree {
    fn is_document_root(&self, node: &NodeId) -> bool {
        self.document_element() == Some(*node)
    }

    fn contains(&self, ancestor: &NodeId, node: &NodeId) -> bool {
        Self::contains(self, *ancestor, *node)
    }

    fn element_from_point(&self, client: Point) -> Option<NodeId> {
        Self::element_from_point(self, client)
    }

    fn offset_of(&self, node: &NodeId) -> Option<Vec2> {
        Self::offset_of(self, *node)
    }

    fn scroll_offset(&self) -> Vec2 {
        Self::scroll_offset(self)
    }
}

/// A dispatched event as seen by the document.
#[derive(Clone, Debug, PartialEq)]
pub struct Delivered {
    /// Event name.
    pub name: PointerEventName,
    /// Dispatch target.
    pub target: NodeId,
    /// Related target.
    pub related: Option<NodeId>,
    /// Pointer id.
    pub pointer_id: i32,
    /// Device class.
    pub pointer_type: PointerType,
    /// Viewport coordinates.
    pub client: Point,
    /// Target-relative coordinates.
    pub offset: Vec2,
    /// Nodes the event propagated through, target first. Non-bubbling events stop at the target.
    pub path: Vec<NodeId>,
}

/// Handler run for every dispatched event.
pub type Handler = Box<dyn FnMut(&mut PointerEvent<'_, NodeId>)>;

/// An event tree acting as a complete engine host.
#[derive(Default)]
pub struct Document {
    /// The element tree.
    pub tree: Tree,
    listeners: BTreeMap<(Target<NodeId>, &'static str), u32>,
    delivered: Vec<Delivered>,
    handler: Option<Handler>,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("tree", &self.tree)
            .field("listeners", &self.listeners)
            .field("delivered", &self.delivered.len())
            .finish_non_exhaustive()
    }
}

impl Document {
    /// Wrap a tree.
    pub fn new(tree: Tree) -> Self {
        Self {
            tree,
            ..Self::default()
        }
    }

    /// Run `handler` on every dispatched event, after it is recorded.
    pub fn set_handler(&mut self, handler: impl FnMut(&mut PointerEvent<'_, NodeId>) + 'static) {
        self.handler = Some(Box::new(handler));
    }

    /// Returns `true` if the engine's listener for `native` is attached on `target`.
    pub fn is_attached(&self, target: Target<NodeId>, native: &str) -> bool {
        self.listeners
            .iter()
            .any(|((t, n), count)| *t == target && *n == native && *count > 0)
    }

    /// Events dispatched so far.
    pub fn delivered(&self) -> &[Delivered] {
        &self.delivered
    }

    /// Take and clear the dispatch record.
    pub fn take_delivered(&mut self) -> Vec<Delivered> {
        core::mem::take(&mut self.delivered)
    }
}

impl ParentLookup<NodeId> for Document {
    fn parent_of(&self, node: &NodeId) -> Option<NodeId> {
        self.tree.parent_of(*node)
    }
}

impl HostTree<NodeId> for Document {
    fn is_document_root(&self, node: &NodeId) -> bool {
        HostTree::is_document_root(&self.tree, node)
    }

    fn contains(&self, ancestor: &NodeId, node: &NodeId) -> bool {
        self.tree.contains(*ancestor, *node)
    }

    fn element_from_point(&self, client: Point) -> Option<NodeId> {
        self.tree.element_from_point(client)
    }

    fn offset_of(&self, node: &NodeId) -> Option<Vec2> {
        self.tree.offset_of(*node)
    }

    fn scroll_offset(&self) -> Vec2 {
        self.tree.scroll_offset()
    }
}

impl HostEvents<NodeId> for Document {
    fn attach_native(&mut self, target: Target<NodeId>, native: &'static str) {
        *self.listeners.entry((target, native)).or_default() += 1;
    }

    fn detach_native(&mut self, target: Target<NodeId>, native: &'static str) {
        if let Some(count) = self.listeners.get_mut(&(target, native)) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.listeners.remove(&(target, native));
            }
        }
    }

    fn dispatch(&mut self, event: &mut PointerEvent<'_, NodeId>) {
        let mut path = self.tree.path_to_root(event.target);
        path.reverse();
        if !event.bubbles {
            path.truncate(1);
        }
        self.delivered.push(Delivered {
            name: event.name,
            target: event.target,
            related: event.related_target,
            pointer_id: event.pointer_id,
            pointer_type: event.pointer_type,
            client: event.client,
            offset: event.offset(),
            path,
        });
        if let Some(handler) = self.handler.as_mut() {
            handler(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use core::time::Duration;

    use kurbo::Rect;
    use understory_event_tree::LocalNode;

    use super::*;
    use crate::engine::PointerEngine;
    use crate::touch::{TouchInput, TouchKind, TouchPoint};
    use PointerEventName::*;

    struct Page {
        doc: Document,
        list: NodeId,
        a: NodeId,
        b: NodeId,
    }

    /// A page with a list holding two side-by-side items.
    fn page() -> Page {
        let mut tree = Tree::new();
        let root = tree.insert(None, LocalNode::with_bounds(Rect::new(0.0, 0.0, 400.0, 1000.0)));
        let list = tree.insert(Some(root), LocalNode::with_bounds(Rect::new(0.0, 100.0, 400.0, 200.0)));
        let a = tree.insert(Some(list), LocalNode::with_bounds(Rect::new(0.0, 100.0, 200.0, 200.0)));
        let b = tree.insert(Some(list), LocalNode::with_bounds(Rect::new(200.0, 100.0, 400.0, 200.0)));
        Page {
            doc: Document::new(tree),
            list,
            a,
            b,
        }
    }

    fn names(doc: &Document) -> Vec<(PointerEventName, NodeId)> {
        doc.delivered().iter().map(|d| (d.name, d.target)).collect()
    }

    #[test]
    fn tree_answers_host_queries() {
        let p = page();
        let tree = &p.doc.tree;
        assert!(HostTree::contains(tree, &p.list, &p.a));
        assert!(!HostTree::contains(tree, &p.a, &p.b));
        assert_eq!(HostTree::offset_of(tree, &p.b), Some(Vec2::new(200.0, 100.0)));
        assert_eq!(
            HostTree::element_from_point(tree, Point::new(250.0, 150.0)),
            Some(p.b)
        );
        assert!(!HostTree::is_document_root(tree, &p.list));
    }

    #[test]
    fn listeners_are_reference_counted() {
        let mut p = page();
        let mut engine = PointerEngine::new();
        engine.register(&mut p.doc, Target::Node(p.a), Down);
        assert!(p.doc.is_attached(Target::Node(p.a), "mousedown"));
        engine.unregister(&mut p.doc, Target::Node(p.a), Down);
        assert!(!p.doc.is_attached(Target::Node(p.a), "mousedown"));
    }

    #[test]
    fn finger_sliding_across_items() {
        let mut p = page();
        let mut engine = PointerEngine::new();
        for item in [p.a, p.b] {
            engine.register(&mut p.doc, Target::Node(item), Enter);
            engine.register(&mut p.doc, Target::Node(item), Leave);
        }
        engine.register(&mut p.doc, Target::Node(p.list), Enter);
        engine.register(&mut p.doc, Target::Window, Over);

        let start = [TouchPoint::new(0, Some(p.a), Point::new(50.0, 150.0))];
        engine.handle_touch(&mut p.doc, &TouchInput::new(TouchKind::Start, &start), Duration::ZERO);
        assert_eq!(names(&p.doc), [(Over, p.a), (Enter, p.list), (Enter, p.a)]);
        let over = &p.doc.delivered()[0];
        assert_eq!(over.offset, Vec2::new(50.0, 50.0));
        assert_eq!(over.path.len(), 3);
        assert_eq!(p.doc.delivered()[1].path, [p.list]);

        p.doc.take_delivered();
        let slide = [TouchPoint::new(0, Some(p.a), Point::new(250.0, 150.0))];
        engine.handle_touch(
            &mut p.doc,
            &TouchInput::new(TouchKind::Move, &slide),
            Duration::from_millis(16),
        );
        // The list contains both items, so it is neither left nor re-entered.
        assert_eq!(names(&p.doc), [(Leave, p.a), (Over, p.b), (Enter, p.b)]);
    }

    #[test]
    fn scrolled_tap_hits_the_right_item() {
        let mut p = page();
        let mut engine = PointerEngine::new();
        engine.register(&mut p.doc, Target::Node(p.list), Tap);
        p.doc.tree.set_scroll_offset(Vec2::new(0.0, 100.0));
        engine.handle_scroll(&p.doc, Duration::ZERO);

        // Item b now sits at client y = 0..100.
        let finger = [TouchPoint::new(7, Some(p.b), Point::new(300.0, 20.0))];
        let t0 = Duration::from_millis(500);
        engine.handle_touch(&mut p.doc, &TouchInput::new(TouchKind::Start, &finger), t0);
        engine.handle_touch(
            &mut p.doc,
            &TouchInput::new(TouchKind::End, &finger),
            t0 + Duration::from_millis(60),
        );
        let tap = &p.doc.delivered()[0];
        assert_eq!((tap.name, tap.target, tap.pointer_id), (Tap, p.b, 9));
    }

    #[test]
    fn handler_can_stop_a_tap() {
        let mut p = page();
        let mut engine = PointerEngine::new();
        engine.register(&mut p.doc, Target::Window, Tap);
        engine.register(&mut p.doc, Target::Window, Down);
        p.doc.set_handler(|ev| {
            if ev.name == PointerEventName::Down {
                ev.stop_propagation();
            }
        });
        let finger = [TouchPoint::new(0, Some(p.a), Point::new(50.0, 150.0))];
        engine.handle_touch(&mut p.doc, &TouchInput::new(TouchKind::Start, &finger), Duration::ZERO);
        engine.handle_touch(
            &mut p.doc,
            &TouchInput::new(TouchKind::End, &finger),
            Duration::from_millis(50),
        );
        assert_eq!(names(&p.doc), [(Down, p.a)]);
    }
}
