// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types for the engine: event names, device kinds, modifiers, targets, and host traits.
//!
//! ## Overview
//!
//! These types describe the contract between the engine and the host document.
//! The host implements [`HostEvents`] (and through it [`HostTree`] and [`ParentLookup`]);
//! the engine speaks in [`PointerEventName`]s and [`Target`]s.

use alloc::string::ToString;
use core::fmt;
use core::str::FromStr;

use kurbo::{Point, Vec2};

use crate::error::UnknownEventName;
use crate::synth::PointerEvent;

/// Where a registration lives.
///
/// `Window` is the root container: the upward registration lookup falls back to it after the
/// outermost ancestor, so a window-level registration sees every bubbling event.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Target<K> {
    /// The root container above the document element.
    Window,
    /// A tree node.
    Node(K),
}

impl<K: Copy> Target<K> {
    /// The node, unless this is the window.
    pub fn node(self) -> Option<K> {
        match self {
            Self::Window => None,
            Self::Node(k) => Some(k),
        }
    }
}

/// Pointer event names emitted by the engine.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum PointerEventName {
    /// `pointerdown`
    Down,
    /// `pointerup`
    Up,
    /// `pointermove`
    Move,
    /// `pointerover`
    Over,
    /// `pointerout`
    Out,
    /// `pointercancel`
    Cancel,
    /// `pointerenter` (does not bubble)
    Enter,
    /// `pointerleave` (does not bubble)
    Leave,
    /// `pointertap`, the derived single-tap gesture (bubbles)
    Tap,
}

impl PointerEventName {
    /// Every name, in declaration order.
    pub const ALL: [Self; 9] = [
        Self::Down,
        Self::Up,
        Self::Move,
        Self::Over,
        Self::Out,
        Self::Cancel,
        Self::Enter,
        Self::Leave,
        Self::Tap,
    ];

    pub(crate) const COUNT: usize = Self::ALL.len();

    pub(crate) const fn index(self) -> usize {
        self as usize
    }

    /// Wire name, e.g. `"pointerdown"`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Down => "pointerdown",
            Self::Up => "pointerup",
            Self::Move => "pointermove",
            Self::Over => "pointerover",
            Self::Out => "pointerout",
            Self::Cancel => "pointercancel",
            Self::Enter => "pointerenter",
            Self::Leave => "pointerleave",
            Self::Tap => "pointertap",
        }
    }

    /// Enter and leave are the only non-bubbling names.
    pub const fn bubbles(self) -> bool {
        !matches!(self, Self::Enter | Self::Leave)
    }

    /// Native mouse event carrying the same interaction, if any.
    ///
    /// `pointercancel` maps to `mousecancel`, which hosts never fire; registering for it
    /// still attaches (and later detaches) that listener symmetrically.
    pub const fn mouse_equivalent(self) -> Option<&'static str> {
        Some(match self {
            Self::Down => "mousedown",
            Self::Up => "mouseup",
            Self::Move => "mousemove",
            Self::Over => "mouseover",
            Self::Out => "mouseout",
            Self::Cancel => "mousecancel",
            Self::Enter => "mouseenter",
            Self::Leave => "mouseleave",
            Self::Tap => return None,
        })
    }

    /// Vendor-prefixed pointer event carrying the same interaction, if any.
    pub const fn ms_equivalent(self) -> Option<&'static str> {
        Some(match self {
            Self::Down => "MSPointerDown",
            Self::Up => "MSPointerUp",
            Self::Move => "MSPointerMove",
            Self::Over => "MSPointerOver",
            Self::Out => "MSPointerOut",
            Self::Cancel => "MSPointerCancel",
            Self::Enter => "MSPointerEnter",
            Self::Leave => "MSPointerLeave",
            Self::Tap => return None,
        })
    }
}

impl fmt::Display for PointerEventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PointerEventName {
    type Err = UnknownEventName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|n| n.as_str() == s)
            .ok_or_else(|| UnknownEventName(s.to_string()))
    }
}

/// Input device class of a pointer.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum PointerType {
    /// Mouse or other indirect pointing device.
    #[default]
    Mouse,
    /// Stylus.
    Pen,
    /// Finger on a touch surface.
    Touch,
}

impl PointerType {
    /// Wire name: `"mouse"`, `"pen"` or `"touch"`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mouse => "mouse",
            Self::Pen => "pen",
            Self::Touch => "touch",
        }
    }
}

impl fmt::Display for PointerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pointer type as reported by a native event.
///
/// Early vendor pointer events reported numeric codes instead of names.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SourcePointerType {
    /// A named device class.
    Named(PointerType),
    /// A numeric code: 2 = touch, 3 = pen, 4 = mouse.
    Legacy(u32),
}

impl SourcePointerType {
    /// Normalize to a [`PointerType`]. Unknown legacy codes resolve to mouse.
    pub const fn resolve(self) -> PointerType {
        match self {
            Self::Named(t) => t,
            Self::Legacy(2) => PointerType::Touch,
            Self::Legacy(3) => PointerType::Pen,
            Self::Legacy(_) => PointerType::Mouse,
        }
    }
}

impl From<PointerType> for SourcePointerType {
    fn from(t: PointerType) -> Self {
        Self::Named(t)
    }
}

bitflags::bitflags! {
    /// Keyboard modifiers held during an input event.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Control key.
        const CTRL  = 0b0000_0001;
        /// Alt / Option key.
        const ALT   = 0b0000_0010;
        /// Shift key.
        const SHIFT = 0b0000_0100;
        /// Meta / Command / Windows key.
        const META  = 0b0000_1000;
    }
}

/// What the host reports about pointer support once the engine is installed.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Capabilities {
    /// Pointer events are available to application code.
    pub pointer_enabled: bool,
    /// Maximum simultaneous touch points reported by the host, when known.
    pub max_touch_points: Option<u32>,
}

/// Look up the parent of a node.
///
/// The engine walks parents for the upward registration lookup, the force-prevent-default
/// lookup, and the enter/leave ancestor walk.
pub trait ParentLookup<K> {
    /// Returns the parent of `node`, or `None` if `node` is a root.
    fn parent_of(&self, node: &K) -> Option<K>;
}

/// Structural and geometric queries the engine needs from the host document.
pub trait HostTree<K: Copy + Eq>: ParentLookup<K> {
    /// Returns `true` for the document element, the node that bounds every ancestor walk.
    fn is_document_root(&self, node: &K) -> bool;

    /// Returns `true` if `node` is `ancestor` or one of its descendants.
    ///
    /// The default walks [`ParentLookup::parent_of`] from `node`.
    fn contains(&self, ancestor: &K, node: &K) -> bool {
        let mut cur = Some(*node);
        while let Some(n) = cur {
            if n == *ancestor {
                return true;
            }
            cur = self.parent_of(&n);
        }
        false
    }

    /// Topmost element under a client-space point, or `None` outside the document.
    fn element_from_point(&self, client: Point) -> Option<K>;

    /// Page offset of the node's box (`offsetLeft`/`offsetTop`), if it has geometry.
    fn offset_of(&self, _node: &K) -> Option<Vec2> {
        None
    }

    /// Current document scroll offset.
    fn scroll_offset(&self) -> Vec2 {
        Vec2::ZERO
    }
}

/// Listener plumbing and dispatch on the host document.
pub trait HostEvents<K: Copy + Eq>: HostTree<K> {
    /// Attach the engine's listener for a native event on `target`.
    fn attach_native(&mut self, target: Target<K>, native: &'static str);

    /// Detach the engine's listener for a native event from `target`.
    fn detach_native(&mut self, target: Target<K>, native: &'static str);

    /// Deliver a synthesized event to `event.target`, bubbling if `event.bubbles`.
    ///
    /// Application handlers may call [`PointerEvent::prevent_default`] and
    /// [`PointerEvent::stop_propagation`]; the engine inspects the event afterwards.
    fn dispatch(&mut self, event: &mut PointerEvent<'_, K>);
}
