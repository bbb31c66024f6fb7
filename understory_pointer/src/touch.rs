// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Touch session tracker.
//!
//! Native touch events keep reporting the element where the touch started, so the tracker
//! remembers, per touch identifier, which element the finger is currently over. The engine
//! re-resolves that element on every move and turns changes into over/out/enter/leave.
//!
//! Sessions go `absent → active → absent`: created by `touchstart`, updated by `touchmove`,
//! deleted by `touchend` or by a non-cancelable move. A `touchcancel` marks the session but
//! leaves it in place; such sessions are reported by [`TouchSessions::stale_sessions`].
//!
//! The tracker also owns the ghost-mouse suppression window: every touch start, move and end
//! re-arms it, and while it is active mouse-origin input is ignored.

use alloc::collections::BTreeMap;
use core::time::Duration;

use kurbo::Point;

use crate::synth::{SourceControl, SourceEvent};
use crate::timer::Debounce;
use crate::types::{PointerType, SourcePointerType};

/// Native touch event type.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TouchKind {
    /// `touchstart`
    Start,
    /// `touchmove`
    Move,
    /// `touchend`
    End,
    /// `touchcancel`
    Cancel,
}

/// One changed touch point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TouchPoint<K> {
    /// Touch identifier, stable for the life of the contact.
    pub identifier: i32,
    /// Native target (the element the touch started on).
    pub target: Option<K>,
    /// Viewport coordinates.
    pub client: Point,
    /// Screen coordinates.
    pub screen: Point,
    /// Document coordinates, when reported.
    pub page: Option<Point>,
}

impl<K> TouchPoint<K> {
    /// A touch point at `client` (screen equal to client) started on `target`.
    pub fn new(identifier: i32, target: Option<K>, client: Point) -> Self {
        Self {
            identifier,
            target,
            client,
            screen: client,
            page: None,
        }
    }
}

/// A native touch event.
#[derive(Copy, Clone, Debug)]
pub struct TouchInput<'a, K> {
    /// Event type.
    pub kind: TouchKind,
    /// The touch points that changed in this event.
    pub changed: &'a [TouchPoint<K>],
    /// `false` once the host has taken over the gesture (for example to scroll).
    pub cancelable: bool,
    /// Cancellation surface of the native event.
    pub control: Option<&'a SourceControl>,
}

impl<'a, K> TouchInput<'a, K> {
    /// A cancelable event of `kind` over `changed`.
    pub fn new(kind: TouchKind, changed: &'a [TouchPoint<K>]) -> Self {
        Self {
            kind,
            changed,
            cancelable: true,
            control: None,
        }
    }

    /// Mark the event non-cancelable.
    pub fn non_cancelable(mut self) -> Self {
        self.cancelable = false;
        self
    }

    /// Attach the native cancellation surface.
    pub fn with_control(mut self, control: &'a SourceControl) -> Self {
        self.control = Some(control);
        self
    }

    /// Generator input for `point`, with touch pointer fields filled in.
    ///
    /// Only `preventDefault` is forwarded to the native event.
    pub(crate) fn source_for(&self, point: &TouchPoint<K>, id_offset: i32) -> SourceEvent<'a, K>
    where
        K: Copy,
    {
        let mut source = SourceEvent::at(point.client);
        source.target = point.target;
        source.screen = point.screen;
        source.page = point.page;
        source.pointer_id = Some(point.identifier.saturating_add(id_offset));
        source.pointer_type = Some(SourcePointerType::Named(PointerType::Touch));
        source.default_action = self.control;
        source
    }
}

/// Tracking state for one touch identifier.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct TouchSession<K> {
    /// Element currently under the touch, or `None` after it left the document.
    pub target: Option<K>,
    /// A `touchcancel` was seen for this identifier.
    pub cancelled: bool,
}

/// Active touch sessions plus the ghost-mouse suppression window.
#[derive(Clone, Debug)]
pub struct TouchSessions<K> {
    sessions: BTreeMap<i32, TouchSession<K>>,
    suppression: Debounce,
}

impl<K: Copy> TouchSessions<K> {
    pub(crate) fn new(suppression: Duration) -> Self {
        Self {
            sessions: BTreeMap::new(),
            suppression: Debounce::new(suppression),
        }
    }

    /// Session for a touch identifier.
    pub fn session(&self, identifier: i32) -> Option<&TouchSession<K>> {
        self.sessions.get(&identifier)
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Returns `true` if no touch is being tracked.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Sessions still alive after a `touchcancel`.
    pub fn stale_sessions(&self) -> usize {
        self.sessions.values().filter(|s| s.cancelled).count()
    }

    /// Returns `true` while mouse-origin input should be ignored.
    pub fn is_suppressing(&self, now: Duration) -> bool {
        self.suppression.is_active(now)
    }

    /// Start (or restart) tracking `identifier` over `target`.
    pub(crate) fn begin(&mut self, identifier: i32, target: Option<K>) {
        self.sessions.insert(
            identifier,
            TouchSession {
                target,
                cancelled: false,
            },
        );
    }

    pub(crate) fn retarget(&mut self, identifier: i32, target: Option<K>) {
        if let Some(s) = self.sessions.get_mut(&identifier) {
            s.target = target;
        }
    }

    pub(crate) fn end(&mut self, identifier: i32) -> Option<TouchSession<K>> {
        self.sessions.remove(&identifier)
    }

    /// Mark `identifier` cancelled and return its target. The session stays alive.
    pub(crate) fn cancel(&mut self, identifier: i32) -> Option<K> {
        let session = self.sessions.get_mut(&identifier)?;
        session.cancelled = true;
        let target = session.target;
        let stale = self.stale_sessions();
        tracing::warn!(identifier, stale, "touchcancel left a touch session alive");
        target
    }

    pub(crate) fn arm(&mut self, now: Duration) {
        self.suppression.arm(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn lifecycle() {
        let mut t: TouchSessions<u32> = TouchSessions::new(ms(700));
        assert!(t.is_empty());
        t.begin(0, Some(5));
        t.retarget(0, Some(6));
        assert_eq!(t.session(0).map(|s| s.target), Some(Some(6)));
        assert_eq!(
            t.end(0),
            Some(TouchSession {
                target: Some(6),
                cancelled: false
            })
        );
        assert_eq!(t.end(0), None);
        // Retargeting an unknown identifier creates nothing.
        t.retarget(3, Some(1));
        assert!(t.session(3).is_none());
    }

    #[test]
    fn cancel_keeps_session_and_counts_it() {
        let mut t: TouchSessions<u32> = TouchSessions::new(ms(700));
        t.begin(1, Some(9));
        t.begin(2, Some(9));
        assert_eq!(t.cancel(1), Some(9));
        assert_eq!(t.cancel(7), None);
        assert_eq!(t.len(), 2);
        assert_eq!(t.stale_sessions(), 1);
        // A fresh touchstart with the same identifier replaces the stale session.
        t.begin(1, Some(4));
        assert_eq!(t.stale_sessions(), 0);
    }

    #[test]
    fn suppression_window() {
        let mut t: TouchSessions<u32> = TouchSessions::new(ms(700));
        assert!(!t.is_suppressing(ms(0)));
        t.arm(ms(100));
        assert!(t.is_suppressing(ms(799)));
        assert!(!t.is_suppressing(ms(800)));
    }

    #[test]
    fn source_carries_touch_pointer_fields() {
        let control = SourceControl::new();
        let points = [TouchPoint::new(4, Some(7_u32), Point::new(3.0, 4.0))];
        let input = TouchInput::new(TouchKind::Start, &points).with_control(&control);
        let source = input.source_for(&points[0], 2);
        assert_eq!(source.pointer_id, Some(6));
        assert_eq!(
            source.pointer_type.map(SourcePointerType::resolve),
            Some(PointerType::Touch)
        );
        assert!(source.default_action.is_some());
        assert!(source.propagation.is_none());
    }
}
