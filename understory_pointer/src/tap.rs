// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-tap recognizer.
//!
//! A tap is a `pointerdown` followed by a `pointerup` of the same pointer with less than the
//! configured slop of movement on each axis. Scrolling interferes in two ways: a down while the
//! document is scrolling is not recorded, and an up after the document scrolled by the slop or
//! more since scrolling began is not a tap.
//!
//! Any `pointerleave` drops the recorded pointer.

use core::time::Duration;

use kurbo::{Point, Vec2};

use crate::synth::PointerEvent;
use crate::timer::Debounce;
use crate::types::PointerType;

/// The pointer a tap may complete for.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ActivePointer {
    /// Pointer id of the down event.
    pub id: i32,
    /// Client position of the down event.
    pub client: Point,
    /// Page position of the down event; displacement is measured here.
    pub page: Point,
    /// Device class of the down event.
    pub pointer_type: PointerType,
}

/// Scroll state: scrolling until the idle delay passes without another scroll.
#[derive(Copy, Clone, Debug)]
pub(crate) struct ScrollTracker {
    idle: Debounce,
    origin: Vec2,
}

impl ScrollTracker {
    pub(crate) fn new(idle: Duration) -> Self {
        Self {
            idle: Debounce::new(idle),
            origin: Vec2::ZERO,
        }
    }

    pub(crate) fn on_scroll(&mut self, offset: Vec2, now: Duration) {
        if !self.idle.is_active(now) {
            self.origin = offset;
        }
        self.idle.arm(now);
    }

    pub(crate) fn is_scrolling(&self, now: Duration) -> bool {
        self.idle.is_active(now)
    }

    /// Offset captured when scrolling began; zero once idle.
    pub(crate) fn origin(&self, now: Duration) -> Vec2 {
        if self.is_scrolling(now) {
            self.origin
        } else {
            Vec2::ZERO
        }
    }
}

/// Tap recognizer state.
#[derive(Clone, Debug)]
pub(crate) struct TapRecognizer {
    slop: f64,
    active: Option<ActivePointer>,
    scroll: ScrollTracker,
}

impl TapRecognizer {
    pub(crate) fn new(slop: f64, scroll_idle: Duration) -> Self {
        Self {
            slop,
            active: None,
            scroll: ScrollTracker::new(scroll_idle),
        }
    }

    pub(crate) fn active(&self) -> Option<&ActivePointer> {
        self.active.as_ref()
    }

    pub(crate) fn is_scrolling(&self, now: Duration) -> bool {
        self.scroll.is_scrolling(now)
    }

    pub(crate) fn on_scroll(&mut self, offset: Vec2, now: Duration) {
        self.scroll.on_scroll(offset, now);
    }

    pub(crate) fn pointer_down<K: Copy>(&mut self, ev: &PointerEvent<'_, K>, now: Duration) {
        if self.scroll.is_scrolling(now) {
            return;
        }
        let single = match ev.pointer_type {
            PointerType::Mouse | PointerType::Pen => true,
            PointerType::Touch => ev.is_primary,
        };
        if single {
            self.active = Some(ActivePointer {
                id: ev.pointer_id,
                client: ev.client,
                page: ev.page,
                pointer_type: ev.pointer_type,
            });
        }
    }

    pub(crate) fn pointer_leave(&mut self) {
        self.active = None;
    }

    /// Returns `true` if `ev` completes a tap. Always clears the recorded pointer.
    pub(crate) fn pointer_up<K: Copy>(
        &mut self,
        ev: &PointerEvent<'_, K>,
        now: Duration,
        scroll: Vec2,
    ) -> bool {
        let Some(down) = self.active.take() else {
            return false;
        };
        if down.id != ev.pointer_id {
            return false;
        }
        let within = |d: Vec2| d.x.abs() < self.slop && d.y.abs() < self.slop;
        if !within(ev.page - down.page) {
            return false;
        }
        if self.scroll.is_scrolling(now) && !within(scroll - self.scroll.origin(now)) {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::{SourceEvent, synthesize};
    use crate::test_host::TestHost;
    use crate::types::{PointerEventName, SourcePointerType};

    const fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn event(
        host: &TestHost,
        id: i32,
        ty: PointerType,
        at: Point,
    ) -> PointerEvent<'static, u32> {
        let mut src = SourceEvent::at(at).with_target(1);
        src.pointer_id = Some(id);
        src.pointer_type = Some(SourcePointerType::Named(ty));
        synthesize(host, &src, PointerEventName::Down, true, None, None).unwrap()
    }

    fn recognizer() -> TapRecognizer {
        TapRecognizer::new(5.0, ms(100))
    }

    #[test]
    fn small_movement_is_a_tap() {
        let h = TestHost::chain(&[1]);
        let mut t = recognizer();
        t.pointer_down(&event(&h, 1, PointerType::Mouse, Point::new(10.0, 10.0)), ms(0));
        assert!(t.pointer_up(
            &event(&h, 1, PointerType::Mouse, Point::new(14.0, 6.0)),
            ms(50),
            Vec2::ZERO
        ));
        assert!(t.active().is_none());
    }

    #[test]
    fn slop_is_exclusive() {
        let h = TestHost::chain(&[1]);
        let mut t = recognizer();
        t.pointer_down(&event(&h, 1, PointerType::Pen, Point::new(0.0, 0.0)), ms(0));
        assert!(!t.pointer_up(
            &event(&h, 1, PointerType::Pen, Point::new(5.0, 0.0)),
            ms(10),
            Vec2::ZERO
        ));
    }

    #[test]
    fn id_mismatch_clears_without_tap() {
        let h = TestHost::chain(&[1]);
        let mut t = recognizer();
        t.pointer_down(&event(&h, 2, PointerType::Touch, Point::ZERO), ms(0));
        assert!(!t.pointer_up(&event(&h, 3, PointerType::Touch, Point::ZERO), ms(1), Vec2::ZERO));
        assert!(t.active().is_none());
    }

    #[test]
    fn leave_drops_the_pointer() {
        let h = TestHost::chain(&[1]);
        let mut t = recognizer();
        t.pointer_down(&event(&h, 1, PointerType::Mouse, Point::ZERO), ms(0));
        t.pointer_leave();
        assert!(!t.pointer_up(&event(&h, 1, PointerType::Mouse, Point::ZERO), ms(1), Vec2::ZERO));
    }

    #[test]
    fn secondary_touch_is_ignored() {
        let h = TestHost::chain(&[1]);
        let mut t = recognizer();
        let mut ev = event(&h, 4, PointerType::Touch, Point::ZERO);
        ev.is_primary = false;
        t.pointer_down(&ev, ms(0));
        assert!(t.active().is_none());
    }

    #[test]
    fn no_down_recorded_while_scrolling() {
        let h = TestHost::chain(&[1]);
        let mut t = recognizer();
        t.on_scroll(Vec2::new(0.0, 40.0), ms(0));
        t.pointer_down(&event(&h, 1, PointerType::Mouse, Point::ZERO), ms(50));
        assert!(t.active().is_none());
        // Idle after the delay.
        t.pointer_down(&event(&h, 1, PointerType::Mouse, Point::ZERO), ms(100));
        assert!(t.active().is_some());
    }

    #[test]
    fn scroll_drift_during_gesture_cancels_tap() {
        let h = TestHost::chain(&[1]);
        let mut t = recognizer();
        t.pointer_down(&event(&h, 1, PointerType::Mouse, Point::ZERO), ms(0));
        t.on_scroll(Vec2::new(0.0, 100.0), ms(10));
        t.on_scroll(Vec2::new(0.0, 108.0), ms(20));
        assert!(!t.pointer_up(
            &event(&h, 1, PointerType::Mouse, Point::ZERO),
            ms(30),
            Vec2::new(0.0, 108.0)
        ));

        t.pointer_down(&event(&h, 1, PointerType::Mouse, Point::ZERO), ms(500));
        t.on_scroll(Vec2::new(0.0, 200.0), ms(510));
        t.on_scroll(Vec2::new(0.0, 202.0), ms(520));
        assert!(t.pointer_up(
            &event(&h, 1, PointerType::Mouse, Point::ZERO),
            ms(530),
            Vec2::new(0.0, 202.0)
        ));
    }

    #[test]
    fn scroll_origin_resets_when_idle() {
        let mut s = ScrollTracker::new(ms(100));
        s.on_scroll(Vec2::new(3.0, 4.0), ms(0));
        s.on_scroll(Vec2::new(9.0, 9.0), ms(50));
        assert_eq!(s.origin(ms(60)), Vec2::new(3.0, 4.0));
        assert_eq!(s.origin(ms(150)), Vec2::ZERO);
    }
}
