// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_pointer --heading-base-level=0

//! Understory Pointer: a deterministic, `no_std` pointer-event engine.
//!
//! ## Overview
//!
//! Hosts that only emit mouse and touch events still want a single pointer model:
//! `pointerdown`/`up`/`move`/`over`/`out`/`cancel`, non-bubbling `pointerenter`/`pointerleave`,
//! and a derived `pointertap`. This crate synthesizes those events from the native stream.
//!
//! - Mouse events become pointer events with pointer id 1 and type `mouse`.
//! - Touch events become pointer events per touch point, tracking which element each finger is
//!   over and emitting over/out/enter/leave as it crosses element boundaries.
//! - Compatibility ("ghost") mouse events that follow touches are suppressed.
//! - A single tap (down and up within a small distance, without scrolling) produces `pointertap`.
//!
//! The engine does not walk or mutate the host document itself. The host implements
//! [`HostEvents`](crate::types::HostEvents) and the engine calls back into it for parent lookups,
//! hit testing, native listener plumbing and dispatch.
//!
//! ## Registration
//!
//! Application listeners are announced with [`PointerEngine::register`](crate::engine::PointerEngine::register).
//! Registrations are reference-counted per target and event name; the first one attaches the
//! native listener the event is derived from and the last one detaches it. Events are only
//! synthesized when some target on the path (or the window) is registered for them.
//!
//! ## Time
//!
//! Entry points that depend on timing take `now: Duration`, a monotonic timestamp supplied by
//! the host. The touch suppression window and the scroll idle delay are deadlines compared
//! against it, so the engine is fully deterministic under test.
//!
//! ## Minimal example
//!
//! ```
//! use core::time::Duration;
//! use kurbo::Point;
//! use understory_pointer::engine::PointerEngine;
//! use understory_pointer::synth::PointerEvent;
//! use understory_pointer::touch::{TouchInput, TouchKind, TouchPoint};
//! use understory_pointer::types::{
//!     HostEvents, HostTree, ParentLookup, PointerEventName, Target,
//! };
//!
//! // A document with a single button (2) inside the root (1).
//! #[derive(Default)]
//! struct Page {
//!     seen: Vec<(PointerEventName, u32)>,
//! }
//! impl ParentLookup<u32> for Page {
//!     fn parent_of(&self, n: &u32) -> Option<u32> {
//!         (*n == 2).then_some(1)
//!     }
//! }
//! impl HostTree<u32> for Page {
//!     fn is_document_root(&self, n: &u32) -> bool { *n == 1 }
//!     fn element_from_point(&self, _: Point) -> Option<u32> { Some(2) }
//! }
//! impl HostEvents<u32> for Page {
//!     fn attach_native(&mut self, _: Target<u32>, _: &'static str) {}
//!     fn detach_native(&mut self, _: Target<u32>, _: &'static str) {}
//!     fn dispatch(&mut self, ev: &mut PointerEvent<'_, u32>) {
//!         self.seen.push((ev.name, ev.target));
//!     }
//! }
//!
//! let mut page = Page::default();
//! let mut engine = PointerEngine::new();
//! engine.register(&mut page, Target::Node(2), PointerEventName::Down);
//! engine.register(&mut page, Target::Window, PointerEventName::Tap);
//!
//! let finger = [TouchPoint::new(0, Some(2), Point::new(10.0, 10.0))];
//! engine.handle_touch(&mut page, &TouchInput::new(TouchKind::Start, &finger), Duration::ZERO);
//! engine.handle_touch(
//!     &mut page,
//!     &TouchInput::new(TouchKind::End, &finger),
//!     Duration::from_millis(90),
//! );
//!
//! assert_eq!(
//!     page.seen,
//!     [(PointerEventName::Down, 2), (PointerEventName::Tap, 2)]
//! );
//! ```
//!
//! ## Modules
//!
//! - [`engine`]: the [`PointerEngine`](crate::engine::PointerEngine) entry point.
//! - [`registry`]: reference-counted registrations and the upward lookup.
//! - [`synth`]: normalized [`PointerEvent`](crate::synth::PointerEvent) construction.
//! - [`ancestry`]: common ancestor and enter/leave walks.
//! - [`touch`]: touch sessions and ghost-mouse suppression.
//! - [`tap`]: the tap recognizer.
//! - [`adapters`]: host implementations for other Understory crates, behind features.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod adapters;
pub mod ancestry;
pub mod config;
pub mod engine;
pub mod error;
pub mod registry;
pub mod synth;
pub mod tap;
pub mod touch;
pub mod types;

mod timer;

#[cfg(test)]
mod test_host;
