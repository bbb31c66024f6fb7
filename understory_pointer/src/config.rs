// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Engine configuration.
//!
//! [`PointerConfig`] collects the host profile (which native events exist) and the timing and
//! distance constants of the touch and tap logic. The defaults match what mobile browsers need:
//! ghost mouse events arrive roughly 300 ms after `touchend` and long-press `mousedown` around
//! 650 ms, so mouse input is ignored for 700 ms after the last touch.

use core::time::Duration;

use crate::error::ConfigError;
use crate::types::PointerEventName;

/// Pointer id used for every mouse-origin event.
pub const MOUSE_POINTER_ID: i32 = 1;

/// Which native events the host emits.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum InputFlavor {
    /// Mouse events plus touch events. Pointer events are synthesized from both.
    #[default]
    MouseTouch,
    /// Vendor-prefixed pointer events (`MSPointerDown`, …) that already carry pointer ids and
    /// types; the engine only normalizes them.
    MsPointer,
    /// The host already emits standard pointer events; the engine synthesizes nothing.
    Native,
}

impl InputFlavor {
    /// Native event the engine listens to on behalf of `name`, if any.
    pub const fn native_name(self, name: PointerEventName) -> Option<&'static str> {
        match self {
            Self::MouseTouch => name.mouse_equivalent(),
            Self::MsPointer => name.ms_equivalent(),
            Self::Native => None,
        }
    }
}

/// Engine settings.
///
/// Construct with [`PointerConfig::default`] and adjust with the `with_*` setters.
#[derive(Clone, Debug, PartialEq)]
pub struct PointerConfig {
    /// Native event family emitted by the host.
    pub flavor: InputFlavor,
    /// The host fires per-node `mouseenter`/`mouseleave`. When `false`, enter and leave are
    /// derived from `mouseover`/`mouseout` with an ancestor walk.
    pub native_enter_leave: bool,
    /// How long mouse-origin input stays suppressed after the last touch event.
    pub touch_suppression: Duration,
    /// Scroll idle delay after which scrolling is considered finished.
    pub scroll_idle: Duration,
    /// Maximum per-axis movement (and scroll drift) between down and up for a tap, in pixels.
    pub tap_slop: f64,
    /// Pointer id assigned to mouse-origin events.
    pub mouse_pointer_id: i32,
    /// Added to touch identifiers to form pointer ids.
    pub touch_id_offset: i32,
    /// Maximum simultaneous touch points reported by the host, when known.
    pub max_touch_points: Option<u32>,
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            flavor: InputFlavor::MouseTouch,
            native_enter_leave: false,
            touch_suppression: Duration::from_millis(700),
            scroll_idle: Duration::from_millis(100),
            tap_slop: 5.0,
            mouse_pointer_id: MOUSE_POINTER_ID,
            touch_id_offset: 2,
            max_touch_points: None,
        }
    }
}

impl PointerConfig {
    /// Set the host's native event family.
    pub fn with_flavor(mut self, flavor: InputFlavor) -> Self {
        self.flavor = flavor;
        self
    }

    /// Declare whether the host fires native `mouseenter`/`mouseleave`.
    pub fn with_native_enter_leave(mut self, native: bool) -> Self {
        self.native_enter_leave = native;
        self
    }

    /// Set the ghost-mouse suppression window.
    pub fn with_touch_suppression(mut self, window: Duration) -> Self {
        self.touch_suppression = window;
        self
    }

    /// Set the scroll idle delay.
    pub fn with_scroll_idle(mut self, idle: Duration) -> Self {
        self.scroll_idle = idle;
        self
    }

    /// Set the tap movement threshold.
    pub fn with_tap_slop(mut self, slop: f64) -> Self {
        self.tap_slop = slop;
        self
    }

    /// Report a maximum touch point count through [`Capabilities`](crate::types::Capabilities).
    pub fn with_max_touch_points(mut self, points: Option<u32>) -> Self {
        self.max_touch_points = points;
        self
    }

    /// Check the settings for values the engine cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.tap_slop.is_finite() || self.tap_slop <= 0.0 {
            return Err(ConfigError::InvalidTapSlop(self.tap_slop));
        }
        if self.touch_suppression.is_zero() {
            return Err(ConfigError::ZeroTouchSuppression);
        }
        if self.scroll_idle.is_zero() {
            return Err(ConfigError::ZeroScrollIdle);
        }
        if self.touch_id_offset <= self.mouse_pointer_id {
            return Err(ConfigError::TouchIdCollision {
                offset: self.touch_id_offset,
                mouse_id: self.mouse_pointer_id,
            });
        }
        Ok(())
    }

    /// Native event the engine listens to on behalf of `name` under this configuration.
    ///
    /// Without native enter/leave, `pointerenter` and `pointerleave` are derived from the
    /// over/out stream, so they reference the over/out listener instead.
    pub fn native_name(&self, name: PointerEventName) -> Option<&'static str> {
        let name = match name {
            PointerEventName::Enter if !self.native_enter_leave => PointerEventName::Over,
            PointerEventName::Leave if !self.native_enter_leave => PointerEventName::Out,
            other => other,
        };
        self.flavor.native_name(name)
    }
}
