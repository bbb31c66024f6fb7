// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_event_tree --heading-base-level=0

//! Understory Event Tree: a Kurbo-native, DOM-like element tree for input routing.
//!
//! Understory Event Tree is the structural half of an input stack: it answers the questions an
//! event dispatcher asks of a document, and nothing else.
//!
//! - Represents a hierarchy of elements with page-space bounds, z-order, and flags.
//! - Answers containment queries (`contains`, parent links, root→element paths).
//! - Resolves a client-space point to the topmost element under it, honoring scrolling and an
//!   optional viewport.
//! - Reports each element's page offset, the counterpart of `offsetLeft`/`offsetTop`.
//!
//! ## Not a layout engine
//!
//! This crate does not perform layout or paint.
//! Upstream code computes element boxes with whatever layout system it uses and writes them here.
//!
//! ## API overview
//!
//! - [`Tree`]: container owning elements and the document scroll state.
//! - [`LocalNode`]: per-element bounds, z-index, and flags.
//! - [`NodeFlags`]: visibility and picking controls.
//! - [`NodeId`]: generational handle of an element.
//!
//! Key operations:
//! - [`Tree::insert`](Tree::insert) → [`NodeId`]; the first parentless element is the document element.
//! - [`Tree::contains`](Tree::contains) and [`Tree::parent_of`](Tree::parent_of).
//! - [`Tree::element_from_point`](Tree::element_from_point) → topmost pickable element, or `None`
//!   when the point falls outside the document.
//!
//! ### Minimal usage
//!
//! ```
//! use understory_event_tree::{LocalNode, Tree};
//! use kurbo::{Point, Rect, Vec2};
//!
//! let mut tree = Tree::new();
//! let html = tree.insert(None, LocalNode::with_bounds(Rect::new(0.0, 0.0, 800.0, 2000.0)));
//! let button = tree.insert(Some(html), LocalNode::with_bounds(Rect::new(10.0, 900.0, 110.0, 940.0)));
//!
//! assert_eq!(tree.element_from_point(Point::new(20.0, 910.0)), Some(button));
//!
//! // After scrolling the page down, the same element sits near the top of the viewport.
//! tree.set_scroll_offset(Vec2::new(0.0, 890.0));
//! assert_eq!(tree.element_from_point(Point::new(20.0, 20.0)), Some(button));
//! assert!(tree.contains(html, button));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod tree;
mod types;

pub use tree::Tree;
pub use types::{LocalNode, NodeFlags, NodeId};
