// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: structure, updates, queries.

use alloc::vec::Vec;
use kurbo::{Point, Rect, Size, Vec2};

use crate::types::{LocalNode, NodeFlags, NodeId};

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

/// Element tree with a single document element.
///
/// The first element inserted without a parent becomes the document element.
/// Further parentless elements are detached roots: they can be queried structurally but are
/// never returned by [`Tree::element_from_point`].
pub struct Tree {
    nodes: Vec<Option<Node>>, // slots
    generations: Vec<u32>,    // last generation per slot (persists across frees)
    free_list: Vec<usize>,
    document: Option<NodeId>,
    scroll: Vec2,
    viewport: Option<Size>,
}

impl core::fmt::Debug for Tree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Tree")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("document", &self.document)
            .field("scroll", &self.scroll)
            .field("viewport", &self.viewport)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    local: LocalNode,
}

impl Node {
    fn new(generation: u32, local: LocalNode) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            local,
        }
    }
}

impl Tree {
    /// Create a new empty tree.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            document: None,
            scroll: Vec2::ZERO,
            viewport: None,
        }
    }

    /// Insert a new element as the last child of `parent`.
    ///
    /// With `parent == None` the element becomes the document element if there is none yet,
    /// otherwise a detached root.
    /// A stale `parent` also yields a detached root.
    pub fn insert(&mut self, parent: Option<NodeId>, local: LocalNode) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx] + 1;
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, local));
            (idx, generation)
        } else {
            self.nodes.push(Some(Node::new(1, local)));
            self.generations.push(1);
            (self.nodes.len() - 1, 1)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "NodeId uses 32-bit indices by design."
        )]
        let id = NodeId::new(idx as u32, generation);
        match parent {
            Some(p) if self.is_alive(p) => self.link_parent(id, p),
            Some(_) => {}
            None => {
                if self.document.is_none() {
                    self.document = Some(id);
                }
            }
        }
        id
    }

    /// Remove an element (and its subtree) from the tree.
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        let children = self.node(id).children.clone();
        for child in children {
            self.remove(child);
        }
        if self.document == Some(id) {
            self.document = None;
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Move `id` under `new_parent` (or detach it with `None`).
    ///
    /// Returns `false` and leaves the tree unchanged if either id is stale or if
    /// `new_parent` lies inside the subtree of `id`.
    pub fn reparent(&mut self, id: NodeId, new_parent: Option<NodeId>) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        if let Some(p) = new_parent
            && (!self.is_alive(p) || self.contains(id, p))
        {
            return false;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        if let Some(p) = new_parent {
            self.link_parent(id, p);
        }
        true
    }

    /// Update page-space bounds.
    pub fn set_bounds(&mut self, id: NodeId, bounds: Rect) {
        if let Some(node) = self.node_opt_mut(id) {
            node.local.bounds = bounds;
        }
    }

    /// Update z index.
    pub fn set_z_index(&mut self, id: NodeId, z: i32) {
        if let Some(node) = self.node_opt_mut(id) {
            node.local.z_index = z;
        }
    }

    /// Update flags.
    pub fn set_flags(&mut self, id: NodeId, flags: NodeFlags) {
        if let Some(node) = self.node_opt_mut(id) {
            node.local.flags = flags;
        }
    }

    /// Set the document scroll offset (page coordinates of the viewport origin).
    pub fn set_scroll_offset(&mut self, offset: Vec2) {
        self.scroll = offset;
    }

    /// Current document scroll offset.
    pub fn scroll_offset(&self) -> Vec2 {
        self.scroll
    }

    /// Limit point resolution to a viewport of the given size, or lift the limit with `None`.
    pub fn set_viewport(&mut self, viewport: Option<Size>) {
        self.viewport = viewport;
    }

    /// Current viewport size, if bounded.
    pub fn viewport(&self) -> Option<Size> {
        self.viewport
    }

    /// Returns `true` if `id` refers to a live element.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .is_some_and(|n| n.generation == id.generation())
    }

    /// The document element, if one is live.
    pub fn document_element(&self) -> Option<NodeId> {
        self.document
    }

    /// Parent of `id`, or `None` for roots and stale ids.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id)?.parent
    }

    /// Children of `id` in insertion order. Empty for stale ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node_opt(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Geometry of `id`, if live.
    pub fn local(&self, id: NodeId) -> Option<&LocalNode> {
        self.node_opt(id).map(|n| &n.local)
    }

    /// Returns `true` if `node` is `ancestor` or one of its descendants.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        if !self.is_alive(ancestor) {
            return false;
        }
        let mut cur = Some(node);
        while let Some(id) = cur {
            if id == ancestor {
                return true;
            }
            cur = self.parent_of(id);
        }
        false
    }

    /// Page-space position of the element's top-left corner.
    ///
    /// This plays the role of `offsetLeft`/`offsetTop` measured against the document.
    pub fn offset_of(&self, id: NodeId) -> Option<Vec2> {
        self.node_opt(id).map(|n| n.local.bounds.origin().to_vec2())
    }

    /// Path from the outermost root down to `id` (inclusive). Empty for stale ids.
    pub fn path_to_root(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cur = self.is_alive(id).then_some(id);
        while let Some(n) = cur {
            out.push(n);
            cur = self.parent_of(n);
        }
        out.reverse();
        out
    }

    /// Resolve the topmost element under a client-space point.
    ///
    /// Returns `None` when either coordinate is negative, when the point lies outside the
    /// viewport (if one is set), or when no visible, pickable element of the document covers it.
    /// Among candidates the higher z-index wins, then the deeper element, then the later slot.
    pub fn element_from_point(&self, client: Point) -> Option<NodeId> {
        if client.x < 0.0 || client.y < 0.0 {
            return None;
        }
        if let Some(vp) = self.viewport
            && (client.x >= vp.width || client.y >= vp.height)
        {
            return None;
        }
        let document = self.document?;
        let page = client + self.scroll;
        let mut best: Option<(NodeId, i32, usize)> = None;
        for (i, slot) in self.nodes.iter().enumerate() {
            let Some(node) = slot else {
                continue;
            };
            if !node
                .local
                .flags
                .contains(NodeFlags::VISIBLE | NodeFlags::PICKABLE)
            {
                continue;
            }
            if !node.local.bounds.contains(page) {
                continue;
            }
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            let id = NodeId::new(i as u32, node.generation);
            let Some(depth) = self.depth_below(document, id) else {
                continue;
            };
            match best {
                Some((_, z, d)) if (node.local.z_index, depth) < (z, d) => {}
                _ => best = Some((id, node.local.z_index, depth)),
            }
        }
        best.map(|(id, _, _)| id)
    }

    // --- internals ---

    fn node(&self, id: NodeId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }

    fn node_opt(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.generation()).then_some(n)
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.generation() {
            return None;
        }
        Some(n)
    }

    fn link_parent(&mut self, id: NodeId, parent: NodeId) {
        self.node_mut(parent).children.push(id);
        self.node_mut(id).parent = Some(parent);
    }

    fn unlink_parent(&mut self, id: NodeId, parent: NodeId) {
        self.node_mut(parent).children.retain(|c| *c != id);
        self.node_mut(id).parent = None;
    }

    /// Number of edges from `root` down to `id`, or `None` if `id` is not under `root`.
    fn depth_below(&self, root: NodeId, id: NodeId) -> Option<usize> {
        let mut depth = 0;
        let mut cur = id;
        loop {
            if cur == root {
                return Some(depth);
            }
            cur = self.parent_of(cur)?;
            depth += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn boxed(x0: f64, y0: f64, x1: f64, y1: f64) -> LocalNode {
        LocalNode::with_bounds(Rect::new(x0, y0, x1, y1))
    }

    #[test]
    fn first_root_is_document_element() {
        let mut tree = Tree::new();
        let html = tree.insert(None, boxed(0.0, 0.0, 500.0, 500.0));
        let detached = tree.insert(None, boxed(0.0, 0.0, 10.0, 10.0));
        assert_eq!(tree.document_element(), Some(html));
        assert_ne!(tree.document_element(), Some(detached));
    }

    #[test]
    fn deepest_element_wins_at_equal_z() {
        let mut tree = Tree::new();
        let html = tree.insert(None, boxed(0.0, 0.0, 500.0, 500.0));
        let outer = tree.insert(Some(html), boxed(10.0, 10.0, 200.0, 200.0));
        let inner = tree.insert(Some(outer), boxed(20.0, 20.0, 60.0, 60.0));
        assert_eq!(tree.element_from_point(Point::new(30.0, 30.0)), Some(inner));
        assert_eq!(tree.element_from_point(Point::new(100.0, 100.0)), Some(outer));
        assert_eq!(tree.element_from_point(Point::new(300.0, 300.0)), Some(html));
    }

    #[test]
    fn higher_z_beats_depth() {
        let mut tree = Tree::new();
        let html = tree.insert(None, boxed(0.0, 0.0, 500.0, 500.0));
        let a = tree.insert(Some(html), boxed(0.0, 0.0, 100.0, 100.0));
        let _a_child = tree.insert(Some(a), boxed(0.0, 0.0, 50.0, 50.0));
        let overlay = tree.insert(
            Some(html),
            LocalNode {
                bounds: Rect::new(0.0, 0.0, 100.0, 100.0),
                z_index: 5,
                ..Default::default()
            },
        );
        assert_eq!(tree.element_from_point(Point::new(10.0, 10.0)), Some(overlay));
    }

    #[test]
    fn outside_document_resolves_to_none() {
        let mut tree = Tree::new();
        let html = tree.insert(None, boxed(0.0, 0.0, 100.0, 100.0));
        assert_eq!(tree.element_from_point(Point::new(-1.0, 5.0)), None);
        assert_eq!(tree.element_from_point(Point::new(150.0, 5.0)), None);
        tree.set_viewport(Some(Size::new(50.0, 50.0)));
        assert_eq!(tree.element_from_point(Point::new(60.0, 5.0)), None);
        assert_eq!(tree.element_from_point(Point::new(40.0, 5.0)), Some(html));
    }

    #[test]
    fn unpickable_and_detached_are_skipped() {
        let mut tree = Tree::new();
        let html = tree.insert(None, boxed(0.0, 0.0, 100.0, 100.0));
        let ghost = tree.insert(Some(html), boxed(0.0, 0.0, 50.0, 50.0));
        tree.set_flags(ghost, NodeFlags::VISIBLE);
        let _floating = tree.insert(None, boxed(0.0, 0.0, 50.0, 50.0));
        assert_eq!(tree.element_from_point(Point::new(10.0, 10.0)), Some(html));
    }

    #[test]
    fn scrolling_shifts_resolution() {
        let mut tree = Tree::new();
        let html = tree.insert(None, boxed(0.0, 0.0, 100.0, 1000.0));
        let below = tree.insert(Some(html), boxed(0.0, 500.0, 100.0, 600.0));
        assert_eq!(tree.element_from_point(Point::new(10.0, 10.0)), Some(html));
        tree.set_scroll_offset(Vec2::new(0.0, 495.0));
        assert_eq!(tree.element_from_point(Point::new(10.0, 10.0)), Some(below));
    }

    #[test]
    fn contains_is_inclusive_and_directional() {
        let mut tree = Tree::new();
        let html = tree.insert(None, boxed(0.0, 0.0, 100.0, 100.0));
        let a = tree.insert(Some(html), LocalNode::default());
        let b = tree.insert(Some(a), LocalNode::default());
        assert!(tree.contains(a, a));
        assert!(tree.contains(html, b));
        assert!(!tree.contains(b, a));
        assert_eq!(tree.path_to_root(b), vec![html, a, b]);
    }

    #[test]
    fn removed_ids_go_stale_and_slots_are_reused() {
        let mut tree = Tree::new();
        let html = tree.insert(None, boxed(0.0, 0.0, 100.0, 100.0));
        let a = tree.insert(Some(html), LocalNode::default());
        let a_child = tree.insert(Some(a), LocalNode::default());
        tree.remove(a);
        assert!(!tree.is_alive(a));
        assert!(!tree.is_alive(a_child));
        assert!(tree.children(html).is_empty());
        let b = tree.insert(Some(html), LocalNode::default());
        assert_ne!(a, b);
        assert!(!tree.contains(html, a));
        assert_eq!(tree.parent_of(a), None);
    }

    #[test]
    fn reparent_rejects_cycles() {
        let mut tree = Tree::new();
        let html = tree.insert(None, boxed(0.0, 0.0, 100.0, 100.0));
        let a = tree.insert(Some(html), LocalNode::default());
        let b = tree.insert(Some(a), LocalNode::default());
        assert!(!tree.reparent(a, Some(b)));
        assert_eq!(tree.parent_of(a), Some(html));
        assert!(tree.reparent(b, Some(html)));
        assert_eq!(tree.children(html), &[a, b]);
    }

    #[test]
    fn offset_is_page_origin() {
        let mut tree = Tree::new();
        let html = tree.insert(None, boxed(0.0, 0.0, 100.0, 100.0));
        let a = tree.insert(Some(html), boxed(30.0, 40.0, 60.0, 80.0));
        assert_eq!(tree.offset_of(a), Some(Vec2::new(30.0, 40.0)));
        tree.remove(a);
        assert_eq!(tree.offset_of(a), None);
    }
}
