// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Synthetic event generator: build normalized pointer events from native input.
//!
//! ## Field rules
//!
//! - Client, screen and page points, and modifiers, copy from the source.
//!   Page defaults to client plus the host scroll offset.
//! - `offset` is the source's own offset when present, otherwise the client point minus the
//!   dispatch target's page offset, otherwise the raw client point.
//! - `pressure` is the source's non-zero pressure, otherwise 0.5 when a button is down
//!   (`which` first, then `button`) and 0 when none is.
//! - `is_primary` is `true` unless the source says otherwise.
//! - `width`, `height`, `tilt_x`, `tilt_y`, `rotation` and `hw_timestamp` default to zero.
//! - Legacy numeric pointer types are normalized through [`SourcePointerType::resolve`].
//!
//! ## Cancellation
//!
//! A [`SourceEvent`] can reference the [`SourceControl`] of the native event it came from.
//! [`PointerEvent::prevent_default`] forwards to it so handlers can cancel the original input
//! (for example touch scrolling). [`PointerEvent::stop_propagation`] stops the native event first
//! and then the synthetic one, since both are propagating through the host at the same time.

use core::cell::Cell;

use kurbo::{Point, Vec2};

use crate::config::MOUSE_POINTER_ID;
use crate::types::{HostTree, Modifiers, PointerEventName, PointerType, SourcePointerType};

/// Cancellation surface of a native event.
///
/// Shared by reference between every pointer event synthesized from the same native event.
#[derive(Debug, Default)]
pub struct SourceControl {
    default_prevented: Cell<bool>,
    propagation_stopped: Cell<bool>,
}

impl SourceControl {
    /// Fresh control with nothing cancelled.
    pub const fn new() -> Self {
        Self {
            default_prevented: Cell::new(false),
            propagation_stopped: Cell::new(false),
        }
    }

    /// Cancel the native default action.
    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    /// Stop native propagation.
    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    /// Whether the native default action was cancelled.
    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }

    /// Whether native propagation was stopped.
    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }
}

/// Native input as seen by the generator.
///
/// Optional fields are the ones native events may lack; the generator fills them with the
/// defaults listed in the [module docs](self).
#[derive(Clone, Debug)]
pub struct SourceEvent<'a, K> {
    /// Native target.
    pub target: Option<K>,
    /// Native related target (the element being left or entered).
    pub related_target: Option<K>,
    /// Viewport coordinates.
    pub client: Point,
    /// Screen coordinates.
    pub screen: Point,
    /// Document coordinates.
    pub page: Option<Point>,
    /// Native target-relative offset.
    pub offset: Option<Vec2>,
    /// Held keyboard modifiers.
    pub modifiers: Modifiers,
    /// Changed button (`0` primary).
    pub button: Option<i16>,
    /// Legacy pressed-button code (`0` none, `1` left).
    pub which: Option<u16>,
    /// Native pressure.
    pub pressure: Option<f64>,
    /// Native primary flag.
    pub is_primary: Option<bool>,
    /// Contact width.
    pub width: Option<f64>,
    /// Contact height.
    pub height: Option<f64>,
    /// Tilt along the x axis, in degrees.
    pub tilt_x: Option<f64>,
    /// Tilt along the y axis, in degrees.
    pub tilt_y: Option<f64>,
    /// Contact rotation, in degrees.
    pub rotation: Option<f64>,
    /// Hardware timestamp.
    pub hw_timestamp: Option<u64>,
    /// Native pointer id.
    pub pointer_id: Option<i32>,
    /// Native pointer type.
    pub pointer_type: Option<SourcePointerType>,
    /// Receives `preventDefault` calls made on derived pointer events.
    pub default_action: Option<&'a SourceControl>,
    /// Receives `stopPropagation` calls made on derived pointer events.
    pub propagation: Option<&'a SourceControl>,
}

impl<'a, K> SourceEvent<'a, K> {
    /// Source at a client point (screen point equal to it), everything else absent.
    pub fn at(client: Point) -> Self {
        Self {
            target: None,
            related_target: None,
            client,
            screen: client,
            page: None,
            offset: None,
            modifiers: Modifiers::empty(),
            button: None,
            which: None,
            pressure: None,
            is_primary: None,
            width: None,
            height: None,
            tilt_x: None,
            tilt_y: None,
            rotation: None,
            hw_timestamp: None,
            pointer_id: None,
            pointer_type: None,
            default_action: None,
            propagation: None,
        }
    }

    /// Set the native target.
    pub fn with_target(mut self, target: K) -> Self {
        self.target = Some(target);
        self
    }

    /// Set the native related target.
    pub fn with_related(mut self, related: Option<K>) -> Self {
        self.related_target = related;
        self
    }

    /// Set the pressed button.
    pub fn with_button(mut self, button: i16) -> Self {
        self.button = Some(button);
        self
    }

    /// Route both `preventDefault` and `stopPropagation` to `control`.
    pub fn with_control(mut self, control: &'a SourceControl) -> Self {
        self.default_action = Some(control);
        self.propagation = Some(control);
        self
    }
}

/// A normalized pointer event.
#[derive(Clone, Debug)]
pub struct PointerEvent<'a, K> {
    /// Event name.
    pub name: PointerEventName,
    /// Whether the host should bubble the event.
    pub bubbles: bool,
    /// Dispatch target.
    pub target: K,
    /// Related target, if any.
    pub related_target: Option<K>,
    /// Pointer id; 1 for the mouse, touch identifier plus offset for touches.
    pub pointer_id: i32,
    /// Device class.
    pub pointer_type: PointerType,
    /// Viewport coordinates.
    pub client: Point,
    /// Screen coordinates.
    pub screen: Point,
    /// Document coordinates.
    pub page: Point,
    /// Held keyboard modifiers.
    pub modifiers: Modifiers,
    /// Changed button.
    pub button: i16,
    /// Normalized pressure in `[0, 1]`.
    pub pressure: f64,
    /// Whether this is the primary pointer of its type.
    pub is_primary: bool,
    /// Contact width.
    pub width: f64,
    /// Contact height.
    pub height: f64,
    /// Tilt along the x axis.
    pub tilt_x: f64,
    /// Tilt along the y axis.
    pub tilt_y: f64,
    /// Contact rotation.
    pub rotation: f64,
    /// Hardware timestamp.
    pub hw_timestamp: u64,
    native_offset: Option<Vec2>,
    target_offset: Option<Vec2>,
    default_action: Option<&'a SourceControl>,
    propagation: Option<&'a SourceControl>,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl<'a, K: Copy> PointerEvent<'a, K> {
    /// Target-relative position.
    ///
    /// Uses the native offset when the source had one; otherwise derives it from the target's
    /// page offset, falling back to the client point for targets without geometry.
    pub fn offset(&self) -> Vec2 {
        if let Some(native) = self.native_offset {
            return native;
        }
        match self.target_offset {
            Some(origin) => self.client.to_vec2() - origin,
            None => self.client.to_vec2(),
        }
    }

    /// Cancel the default action of the native source event.
    pub fn prevent_default(&mut self) {
        if let Some(control) = self.default_action {
            control.prevent_default();
        }
        self.default_prevented = true;
    }

    /// Stop propagation of the native source event, then of this event.
    pub fn stop_propagation(&mut self) {
        if let Some(control) = self.propagation {
            control.stop_propagation();
        }
        self.propagation_stopped = true;
    }

    /// Whether a handler called [`prevent_default`](Self::prevent_default).
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Whether a handler called [`stop_propagation`](Self::stop_propagation).
    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    /// View this event as the source of another synthesized event.
    ///
    /// Cancellation is not carried over.
    pub fn to_source(&self) -> SourceEvent<'a, K> {
        SourceEvent {
            target: Some(self.target),
            related_target: self.related_target,
            client: self.client,
            screen: self.screen,
            page: Some(self.page),
            offset: self.native_offset,
            modifiers: self.modifiers,
            button: Some(self.button),
            which: None,
            pressure: Some(self.pressure),
            is_primary: Some(self.is_primary),
            width: Some(self.width),
            height: Some(self.height),
            tilt_x: Some(self.tilt_x),
            tilt_y: Some(self.tilt_y),
            rotation: Some(self.rotation),
            hw_timestamp: Some(self.hw_timestamp),
            pointer_id: Some(self.pointer_id),
            pointer_type: Some(SourcePointerType::Named(self.pointer_type)),
            default_action: None,
            propagation: None,
        }
    }
}

/// Build a pointer event from `source`.
///
/// The dispatch target is `target`, or the source's own target; the related target is
/// `related`, or the source's own. Returns `None` when no target can be resolved, in which
/// case the caller skips dispatch.
pub fn synthesize<'a, K, H>(
    host: &H,
    source: &SourceEvent<'a, K>,
    name: PointerEventName,
    bubbles: bool,
    target: Option<K>,
    related: Option<K>,
) -> Option<PointerEvent<'a, K>>
where
    K: Copy + Eq,
    H: HostTree<K> + ?Sized,
{
    let target = target.or(source.target)?;
    let pressure = match source.pressure {
        Some(p) if present(p) => p,
        _ => {
            let pressed = source
                .which
                .map(i32::from)
                .or(source.button.map(i32::from))
                .unwrap_or(0);
            if pressed == 0 { 0.0 } else { 0.5 }
        }
    };
    Some(PointerEvent {
        name,
        bubbles,
        target,
        related_target: related.or(source.related_target),
        pointer_id: source.pointer_id.unwrap_or(MOUSE_POINTER_ID),
        pointer_type: source
            .pointer_type
            .map(SourcePointerType::resolve)
            .unwrap_or_default(),
        client: source.client,
        screen: source.screen,
        page: source
            .page
            .unwrap_or_else(|| source.client + host.scroll_offset()),
        modifiers: source.modifiers,
        button: source.button.unwrap_or(0),
        pressure,
        is_primary: source.is_primary.unwrap_or(true),
        width: or_zero(source.width),
        height: or_zero(source.height),
        tilt_x: or_zero(source.tilt_x),
        tilt_y: or_zero(source.tilt_y),
        rotation: or_zero(source.rotation),
        hw_timestamp: source.hw_timestamp.unwrap_or(0),
        native_offset: source.offset,
        target_offset: host.offset_of(&target),
        default_action: source.default_action,
        propagation: source.propagation,
        default_prevented: false,
        propagation_stopped: false,
    })
}

/// A reported value that is neither zero nor NaN.
fn present(v: f64) -> bool {
    v != 0.0 && !v.is_nan()
}

fn or_zero(v: Option<f64>) -> f64 {
    v.filter(|v| present(*v)).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_host::TestHost;

    fn host() -> TestHost {
        let mut h = TestHost::chain(&[1, 2]);
        h.set_offset(2, Vec2::new(40.0, 10.0));
        h
    }

    #[test]
    fn defaults_fill_missing_fields() {
        let h = host();
        let src = SourceEvent::at(Point::new(50.0, 30.0)).with_target(2);
        let ev = synthesize(&h, &src, PointerEventName::Move, true, None, None).unwrap();
        assert_eq!(ev.target, 2);
        assert_eq!(ev.pointer_id, MOUSE_POINTER_ID);
        assert_eq!(ev.pointer_type, PointerType::Mouse);
        assert_eq!(ev.pressure, 0.0);
        assert!(ev.is_primary);
        assert_eq!(
            (ev.width, ev.height, ev.tilt_x, ev.tilt_y, ev.rotation),
            (0.0, 0.0, 0.0, 0.0, 0.0)
        );
        assert_eq!(ev.hw_timestamp, 0);
        assert_eq!(ev.page, Point::new(50.0, 30.0));
    }

    #[test]
    fn pressure_follows_buttons_unless_native() {
        let h = host();
        let base = SourceEvent::at(Point::ZERO).with_target(2);

        let pressed = base.clone().with_button(1);
        let ev = synthesize(&h, &pressed, PointerEventName::Down, true, None, None).unwrap();
        assert_eq!(ev.pressure, 0.5);

        // `which` takes precedence over `button`.
        let mut released = base.clone().with_button(1);
        released.which = Some(0);
        let ev = synthesize(&h, &released, PointerEventName::Up, true, None, None).unwrap();
        assert_eq!(ev.pressure, 0.0);

        let mut native = base.clone();
        native.pressure = Some(0.8);
        let ev = synthesize(&h, &native, PointerEventName::Down, true, None, None).unwrap();
        assert_eq!(ev.pressure, 0.8);

        // A zero native pressure is treated as absent.
        let mut zero = base.with_button(2);
        zero.pressure = Some(0.0);
        let ev = synthesize(&h, &zero, PointerEventName::Down, true, None, None).unwrap();
        assert_eq!(ev.pressure, 0.5);
    }

    #[test]
    fn explicit_primary_false_is_kept() {
        let h = host();
        let mut src = SourceEvent::at(Point::ZERO).with_target(2);
        src.is_primary = Some(false);
        let ev = synthesize(&h, &src, PointerEventName::Down, true, None, None).unwrap();
        assert!(!ev.is_primary);
    }

    #[test]
    fn offset_prefers_native_then_target_geometry() {
        let h = host();
        let src = SourceEvent::at(Point::new(50.0, 30.0)).with_target(2);
        let derived = synthesize(&h, &src, PointerEventName::Move, true, None, None).unwrap();
        assert_eq!(derived.offset(), Vec2::new(10.0, 20.0));

        // Node 1 has no geometry: raw client coordinates.
        let raw = synthesize(&h, &src, PointerEventName::Move, true, Some(1), None).unwrap();
        assert_eq!(raw.offset(), Vec2::new(50.0, 30.0));

        let mut with_native = src;
        with_native.offset = Some(Vec2::new(3.0, 4.0));
        let native =
            synthesize(&h, &with_native, PointerEventName::Move, true, None, None).unwrap();
        assert_eq!(native.offset(), Vec2::new(3.0, 4.0));
    }

    #[test]
    fn derived_fields_are_idempotent() {
        let h = host();
        let mut src = SourceEvent::at(Point::new(77.0, 12.0)).with_target(2);
        src.which = Some(1);
        let a = synthesize(&h, &src, PointerEventName::Down, true, None, None).unwrap();
        let b = synthesize(&h, &src, PointerEventName::Down, true, None, None).unwrap();
        assert_eq!(a.pressure, b.pressure);
        assert_eq!(a.is_primary, b.is_primary);
        assert_eq!(a.offset(), b.offset());
    }

    #[test]
    fn legacy_type_codes_are_translated() {
        let h = host();
        let mut src = SourceEvent::at(Point::ZERO).with_target(2);
        src.pointer_type = Some(SourcePointerType::Legacy(3));
        src.pointer_id = Some(17);
        let ev = synthesize(&h, &src, PointerEventName::Down, true, None, None).unwrap();
        assert_eq!(ev.pointer_type, PointerType::Pen);
        assert_eq!(ev.pointer_id, 17);
    }

    #[test]
    fn cancellation_forwards_to_source() {
        let h = host();
        let control = SourceControl::new();
        let src = SourceEvent::at(Point::ZERO)
            .with_target(2)
            .with_control(&control);
        let mut ev = synthesize(&h, &src, PointerEventName::Down, true, None, None).unwrap();
        ev.prevent_default();
        assert!(control.default_prevented());
        assert!(!control.propagation_stopped());
        ev.stop_propagation();
        assert!(control.propagation_stopped());
        assert!(ev.is_propagation_stopped());
    }

    #[test]
    fn stop_without_source_control_still_stops_synthetic() {
        let h = host();
        let control = SourceControl::new();
        let mut src = SourceEvent::at(Point::ZERO).with_target(2);
        src.default_action = Some(&control);
        let mut ev = synthesize(&h, &src, PointerEventName::Move, true, None, None).unwrap();
        ev.stop_propagation();
        assert!(ev.is_propagation_stopped());
        assert!(!control.propagation_stopped());
    }

    #[test]
    fn unresolved_target_produces_nothing() {
        let h = host();
        let src: SourceEvent<'_, u32> = SourceEvent::at(Point::ZERO);
        assert!(synthesize(&h, &src, PointerEventName::Down, true, None, None).is_none());
    }

    #[test]
    fn explicit_related_overrides_source() {
        let h = host();
        let src = SourceEvent::at(Point::ZERO).with_target(2).with_related(Some(1));
        let kept = synthesize(&h, &src, PointerEventName::Out, true, None, None).unwrap();
        assert_eq!(kept.related_target, Some(1));
        let replaced = synthesize(&h, &src, PointerEventName::Out, true, None, Some(2)).unwrap();
        assert_eq!(replaced.related_target, Some(2));
    }
}
