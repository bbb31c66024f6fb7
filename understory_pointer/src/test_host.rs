// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory host used by the unit tests.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use kurbo::{Point, Vec2};

use crate::synth::PointerEvent;
use crate::types::{
    HostEvents, HostTree, ParentLookup, PointerEventName, PointerType, Target,
};

/// What the host saw for one dispatched event.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Dispatched {
    pub(crate) name: PointerEventName,
    pub(crate) target: u32,
    pub(crate) related: Option<u32>,
    pub(crate) pointer_id: i32,
    pub(crate) pointer_type: PointerType,
    pub(crate) client: Point,
    pub(crate) bubbles: bool,
}

#[derive(Debug, Default)]
pub(crate) struct TestHost {
    root: u32,
    parents: BTreeMap<u32, u32>,
    offsets: BTreeMap<u32, Vec2>,
    pub(crate) scroll: Vec2,
    pub(crate) pick: Option<u32>,
    pub(crate) log: Vec<Dispatched>,
    pub(crate) attached: Vec<(Target<u32>, &'static str)>,
    pub(crate) detached: Vec<(Target<u32>, &'static str)>,
    pub(crate) stop_on: Option<PointerEventName>,
    pub(crate) prevent_on: Option<PointerEventName>,
}

impl TestHost {
    /// A single line of nodes; the first is the document root.
    pub(crate) fn chain(nodes: &[u32]) -> Self {
        let mut h = Self {
            root: nodes.first().copied().unwrap_or(0),
            ..Self::default()
        };
        for pair in nodes.windows(2) {
            h.parents.insert(pair[1], pair[0]);
        }
        h
    }

    pub(crate) fn add_child(&mut self, parent: u32, node: u32) {
        self.parents.insert(node, parent);
    }

    pub(crate) fn set_offset(&mut self, node: u32, offset: Vec2) {
        self.offsets.insert(node, offset);
    }

    pub(crate) fn names(&self) -> Vec<(PointerEventName, u32)> {
        self.log.iter().map(|d| (d.name, d.target)).collect()
    }

    pub(crate) fn clear(&mut self) {
        self.log.clear();
    }
}

impl ParentLookup<u32> for TestHost {
    fn parent_of(&self, node: &u32) -> Option<u32> {
        self.parents.get(node).copied()
    }
}

impl HostTree<u32> for TestHost {
    fn is_document_root(&self, node: &u32) -> bool {
        *node == self.root
    }

    fn element_from_point(&self, _client: Point) -> Option<u32> {
        self.pick
    }

    fn offset_of(&self, node: &u32) -> Option<Vec2> {
        self.offsets.get(node).copied()
    }

    fn scroll_offset(&self) -> Vec2 {
        self.scroll
    }
}

impl HostEvents<u32> for TestHost {
    fn attach_native(&mut self, target: Target<u32>, native: &'static str) {
        self.attached.push((target, native));
    }

    fn detach_native(&mut self, target: Target<u32>, native: &'static str) {
        self.detached.push((target, native));
    }

    fn dispatch(&mut self, event: &mut PointerEvent<'_, u32>) {
        self.log.push(Dispatched {
            name: event.name,
            target: event.target,
            related: event.related_target,
            pointer_id: event.pointer_id,
            pointer_type: event.pointer_type,
            client: event.client,
            bubbles: event.bubbles,
        });
        if self.prevent_on == Some(event.name) {
            event.prevent_default();
        }
        if self.stop_on == Some(event.name) {
            event.stop_propagation();
        }
    }
}
