// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The pointer engine: turns native mouse and touch input into pointer events.
//!
//! ## Overview
//!
//! [`PointerEngine`] owns the registration registry, the touch sessions and the tap recognizer.
//! The host calls:
//!
//! - [`PointerEngine::register`] / [`PointerEngine::unregister`] when application code adds or
//!   removes a pointer listener. The engine attaches the matching native listener on the host
//!   the first time a target needs it and detaches it after the last registration goes.
//! - [`PointerEngine::handle_mouse`] once per native mouse (or vendor pointer) event.
//! - [`PointerEngine::handle_touch`] once per native touch event.
//! - [`PointerEngine::handle_scroll`] whenever the document scrolls.
//!
//! Every entry point that depends on time takes `now`, a monotonic timestamp supplied by the
//! host. The engine never reads a clock.
//!
//! ## Delivery
//!
//! Bubbling events (`pointerdown`, `pointerup`, `pointermove`, `pointerover`, `pointerout`,
//! `pointercancel`, `pointertap`) are synthesized only if the target, an ancestor, or the window
//! is registered for them, and are dispatched on the target; the host bubbles them.
//! `pointerenter` and `pointerleave` are dispatched to each registered node of an
//! [ancestor walk](crate::ancestry) and never bubble.
//!
//! ## Touch and ghost mouse events
//!
//! Browsers follow touches with compatibility mouse events. After any touch start, move or end
//! the engine ignores mouse-origin input for [`PointerConfig::touch_suppression`].

use core::time::Duration;

use kurbo::Point;
use tracing::{debug, trace};

use crate::ancestry::{enter_path, leave_path};
use crate::config::{InputFlavor, PointerConfig};
use crate::error::{ConfigError, UnknownEventName};
use crate::registry::{Registry, Transition};
use crate::synth::{SourceEvent, synthesize};
use crate::tap::{ActivePointer, TapRecognizer};
use crate::touch::{TouchInput, TouchKind, TouchPoint, TouchSessions};
use crate::types::{
    Capabilities, HostEvents, HostTree, PointerEventName, PointerType, SourcePointerType, Target,
};

/// Native mouse event type.
///
/// Under [`InputFlavor::MsPointer`] the same kinds describe the vendor pointer events.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum MouseKind {
    /// `mousedown`
    Down,
    /// `mouseup`
    Up,
    /// `mousemove`
    Move,
    /// `mouseover`
    Over,
    /// `mouseout`
    Out,
    /// `mouseenter`, only delivered by hosts with native enter/leave.
    Enter,
    /// `mouseleave`, only delivered by hosts with native enter/leave.
    Leave,
    /// Pointer cancellation; only vendor pointer hosts fire it.
    Cancel,
}

impl MouseKind {
    /// The pointer event this native event is translated to.
    pub const fn pointer_name(self) -> PointerEventName {
        match self {
            Self::Down => PointerEventName::Down,
            Self::Up => PointerEventName::Up,
            Self::Move => PointerEventName::Move,
            Self::Over => PointerEventName::Over,
            Self::Out => PointerEventName::Out,
            Self::Enter => PointerEventName::Enter,
            Self::Leave => PointerEventName::Leave,
            Self::Cancel => PointerEventName::Cancel,
        }
    }
}

/// A native mouse (or vendor pointer) event.
#[derive(Clone, Debug)]
pub struct MouseInput<'a, K> {
    /// Event type.
    pub kind: MouseKind,
    /// Event fields.
    pub event: SourceEvent<'a, K>,
}

impl<'a, K> MouseInput<'a, K> {
    /// Pair an event type with its fields.
    pub fn new(kind: MouseKind, event: SourceEvent<'a, K>) -> Self {
        Self { kind, event }
    }
}

/// How an emitted event finds its listener.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Lookup {
    /// The target, an ancestor, or the window.
    Upward,
    /// The target only.
    Exact,
}

/// Pointer event synthesis engine.
///
/// See the [module documentation](self) for the call protocol.
#[derive(Clone, Debug)]
pub struct PointerEngine<K> {
    config: PointerConfig,
    registry: Registry<K>,
    touches: TouchSessions<K>,
    tap: TapRecognizer,
}

impl<K: Copy + Ord> Default for PointerEngine<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Ord> PointerEngine<K> {
    /// Engine with the default configuration.
    pub fn new() -> Self {
        Self::build(PointerConfig::default())
    }

    /// Engine with a custom configuration.
    pub fn with_config(config: PointerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: PointerConfig) -> Self {
        Self {
            registry: Registry::new(),
            touches: TouchSessions::new(config.touch_suppression),
            tap: TapRecognizer::new(config.tap_slop, config.scroll_idle),
            config,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &PointerConfig {
        &self.config
    }

    /// Registration counters.
    pub fn registry(&self) -> &Registry<K> {
        &self.registry
    }

    /// Live touch sessions.
    pub fn touches(&self) -> &TouchSessions<K> {
        &self.touches
    }

    /// Pointer a tap is currently pending for.
    pub fn active_pointer(&self) -> Option<&ActivePointer> {
        self.tap.active()
    }

    /// Returns `true` until the scroll idle delay has passed since the last scroll.
    pub fn is_scrolling(&self, now: Duration) -> bool {
        self.tap.is_scrolling(now)
    }

    /// What application code may assume about pointer support.
    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            pointer_enabled: true,
            max_touch_points: self.config.max_touch_points,
        }
    }

    /// Register a listener for `name` on `target`.
    pub fn register<H: HostEvents<K> + ?Sized>(
        &mut self,
        host: &mut H,
        target: Target<K>,
        name: PointerEventName,
    ) {
        let native = self.config.native_name(name);
        if self.registry.register(target, name, native.is_some()) == Transition::Attached
            && let Some(native) = native
        {
            debug!(event = %name, native, "attaching native listener");
            host.attach_native(target, native);
        }
    }

    /// Drop a listener for `name` on `target`. Extra calls are ignored.
    pub fn unregister<H: HostEvents<K> + ?Sized>(
        &mut self,
        host: &mut H,
        target: Target<K>,
        name: PointerEventName,
    ) {
        let native = self.config.native_name(name);
        if self.registry.unregister(target, name, native.is_some()) == Transition::Detached
            && let Some(native) = native
        {
            debug!(event = %name, native, "detaching native listener");
            host.detach_native(target, native);
        }
    }

    /// [`register`](Self::register) by wire name, e.g. `"pointerdown"`.
    pub fn register_named<H: HostEvents<K> + ?Sized>(
        &mut self,
        host: &mut H,
        target: Target<K>,
        name: &str,
    ) -> Result<(), UnknownEventName> {
        let name = name.parse()?;
        self.register(host, target, name);
        Ok(())
    }

    /// [`unregister`](Self::unregister) by wire name.
    pub fn unregister_named<H: HostEvents<K> + ?Sized>(
        &mut self,
        host: &mut H,
        target: Target<K>,
        name: &str,
    ) -> Result<(), UnknownEventName> {
        let name = name.parse()?;
        self.unregister(host, target, name);
        Ok(())
    }

    /// Drop all registrations of a removed node.
    pub fn forget(&mut self, node: K) {
        self.registry.forget(node);
    }

    /// Make touch moves over `target` (or its descendants) cancel the native default action.
    pub fn set_force_prevent_default(&mut self, target: Target<K>, enable: bool) {
        self.registry.set_force_prevent_default(target, enable);
    }

    /// Record a document scroll.
    pub fn handle_scroll<H: HostTree<K> + ?Sized>(&mut self, host: &H, now: Duration) {
        self.tap.on_scroll(host.scroll_offset(), now);
    }

    /// Translate a native mouse (or vendor pointer) event.
    pub fn handle_mouse<H: HostEvents<K> + ?Sized>(
        &mut self,
        host: &mut H,
        input: &MouseInput<'_, K>,
        now: Duration,
    ) {
        let mut source = input.event.clone();
        match self.config.flavor {
            InputFlavor::Native => return,
            InputFlavor::MouseTouch => {
                if self.touches.is_suppressing(now) {
                    debug!(kind = ?input.kind, "mouse input suppressed after touch");
                    return;
                }
                source.pointer_id = Some(self.config.mouse_pointer_id);
                source.pointer_type = Some(SourcePointerType::Named(PointerType::Mouse));
            }
            InputFlavor::MsPointer => {}
        }
        let Some(target) = source.target else {
            trace!(kind = ?input.kind, "mouse input without a target");
            return;
        };
        let related = source.related_target;
        let name = input.kind.pointer_name();
        match input.kind {
            MouseKind::Enter | MouseKind::Leave => {
                if self.config.native_enter_leave {
                    self.emit(host, &source, name, target, Lookup::Exact, related, now);
                }
            }
            kind => {
                self.emit(host, &source, name, target, Lookup::Upward, related, now);
                if self.config.native_enter_leave {
                    return;
                }
                match kind {
                    MouseKind::Over => {
                        self.emulate_boundary(host, &source, PointerEventName::Enter, target, now);
                    }
                    MouseKind::Out => {
                        self.emulate_boundary(host, &source, PointerEventName::Leave, target, now);
                    }
                    _ => {}
                }
            }
        }
    }

    /// Translate a native touch event.
    pub fn handle_touch<H: HostEvents<K> + ?Sized>(
        &mut self,
        host: &mut H,
        input: &TouchInput<'_, K>,
        now: Duration,
    ) {
        if self.config.flavor != InputFlavor::MouseTouch {
            return;
        }
        for point in input.changed {
            match input.kind {
                TouchKind::Start => self.touch_start(host, input, point, now),
                TouchKind::Move => self.touch_move(host, input, point, now),
                TouchKind::End => self.touch_end(host, input, point, now),
                TouchKind::Cancel => self.touch_cancel(host, input, point, now),
            }
        }
        if input.kind != TouchKind::Cancel {
            self.touches.arm(now);
        }
    }

    fn touch_start<H: HostEvents<K> + ?Sized>(
        &mut self,
        host: &mut H,
        input: &TouchInput<'_, K>,
        point: &TouchPoint<K>,
        now: Duration,
    ) {
        self.touches.begin(point.identifier, point.target);
        let Some(target) = point.target else {
            return;
        };
        let source = input.source_for(point, self.config.touch_id_offset);
        self.emit(host, &source, PointerEventName::Over, target, Lookup::Upward, None, now);
        self.walk_enter(host, &source, target, None, now);
        self.emit(host, &source, PointerEventName::Down, target, Lookup::Upward, None, now);
    }

    fn touch_move<H: HostEvents<K> + ?Sized>(
        &mut self,
        host: &mut H,
        input: &TouchInput<'_, K>,
        point: &TouchPoint<K>,
        now: Duration,
    ) {
        let Some(session) = self.touches.session(point.identifier).copied() else {
            trace!(identifier = point.identifier, "touchmove without a session");
            return;
        };
        let source = input.source_for(point, self.config.touch_id_offset);
        let old = session.target;

        if let Some(old) = old
            && self.registry.forces_prevent_default(&*host, old)
            && let Some(control) = input.control
        {
            control.prevent_default();
        }

        if !input.cancelable {
            debug!(identifier = point.identifier, "touch taken over by the host");
            self.touches.end(point.identifier);
            if let Some(old) = old {
                self.emit(host, &source, PointerEventName::Cancel, old, Lookup::Upward, None, now);
                self.emit(host, &source, PointerEventName::Out, old, Lookup::Upward, None, now);
                self.walk_leave(host, &source, old, None, now);
            }
            return;
        }

        let over = host.element_from_point(point.client);
        if let Some(old) = old {
            self.emit(host, &source, PointerEventName::Move, old, Lookup::Upward, None, now);
        }
        if over == old {
            return;
        }
        if let Some(old) = old {
            self.emit(host, &source, PointerEventName::Out, old, Lookup::Upward, over, now);
            if !over.is_some_and(|new| host.contains(&old, &new)) {
                self.walk_leave(host, &source, old, over, now);
            }
        }
        if let Some(new) = over {
            self.emit(host, &source, PointerEventName::Over, new, Lookup::Upward, old, now);
            if !old.is_some_and(|old| host.contains(&new, &old)) {
                self.walk_enter(host, &source, new, old, now);
            }
        }
        self.touches.retarget(point.identifier, over);
    }

    fn touch_end<H: HostEvents<K> + ?Sized>(
        &mut self,
        host: &mut H,
        input: &TouchInput<'_, K>,
        point: &TouchPoint<K>,
        now: Duration,
    ) {
        let Some(target) = self.touches.end(point.identifier).and_then(|s| s.target) else {
            return;
        };
        let source = input.source_for(point, self.config.touch_id_offset);
        self.emit(host, &source, PointerEventName::Up, target, Lookup::Upward, None, now);
        self.emit(host, &source, PointerEventName::Out, target, Lookup::Upward, None, now);
        self.walk_leave(host, &source, target, None, now);
    }

    fn touch_cancel<H: HostEvents<K> + ?Sized>(
        &mut self,
        host: &mut H,
        input: &TouchInput<'_, K>,
        point: &TouchPoint<K>,
        now: Duration,
    ) {
        let Some(target) = self.touches.cancel(point.identifier) else {
            return;
        };
        let source = input.source_for(point, self.config.touch_id_offset);
        self.emit(host, &source, PointerEventName::Cancel, target, Lookup::Upward, None, now);
    }

    /// Enter/leave derived from over/out: walk from the nearest registered node unless it
    /// contains the node the pointer came from (or goes to).
    fn emulate_boundary<H: HostEvents<K> + ?Sized>(
        &mut self,
        host: &mut H,
        source: &SourceEvent<'_, K>,
        name: PointerEventName,
        target: K,
        now: Duration,
    ) {
        let Some(Target::Node(found)) = self.registry.find_registered(&*host, target, name) else {
            return;
        };
        let related = source.related_target;
        if related.is_some_and(|r| host.contains(&found, &r)) {
            return;
        }
        if name == PointerEventName::Enter {
            self.walk_enter(host, source, found, related, now);
        } else {
            self.walk_leave(host, source, found, related, now);
        }
    }

    fn walk_enter<H: HostEvents<K> + ?Sized>(
        &mut self,
        host: &mut H,
        source: &SourceEvent<'_, K>,
        target: K,
        related: Option<K>,
        now: Duration,
    ) {
        for node in enter_path(&*host, &self.registry, target, related) {
            self.emit(host, source, PointerEventName::Enter, node, Lookup::Exact, related, now);
        }
    }

    fn walk_leave<H: HostEvents<K> + ?Sized>(
        &mut self,
        host: &mut H,
        source: &SourceEvent<'_, K>,
        target: K,
        related: Option<K>,
        now: Duration,
    ) {
        for node in leave_path(&*host, &self.registry, target, related) {
            self.emit(host, source, PointerEventName::Leave, node, Lookup::Exact, related, now);
        }
    }

    /// Synthesize `name` on `node`, dispatch it if anyone listens, and let the tap recognizer
    /// observe it.
    fn emit<H: HostEvents<K> + ?Sized>(
        &mut self,
        host: &mut H,
        source: &SourceEvent<'_, K>,
        name: PointerEventName,
        node: K,
        lookup: Lookup,
        related: Option<K>,
        now: Duration,
    ) {
        let delivered = match lookup {
            Lookup::Exact => self.registry.is_registered_exact(Target::Node(node), name),
            Lookup::Upward => self.registry.find_registered(&*host, node, name).is_some(),
        };
        let observed = self.registry.total_awareness(PointerEventName::Tap) > 0
            && matches!(
                name,
                PointerEventName::Down | PointerEventName::Up | PointerEventName::Leave
            );
        if !delivered && !observed {
            trace!(event = %name, "no listener");
            return;
        }
        let Some(mut event) = synthesize(&*host, source, name, name.bubbles(), Some(node), related)
        else {
            return;
        };
        if delivered {
            trace!(event = %name, pointer_id = event.pointer_id, "dispatch");
            host.dispatch(&mut event);
        }
        if !observed || event.is_propagation_stopped() {
            return;
        }
        match name {
            PointerEventName::Down => self.tap.pointer_down(&event, now),
            PointerEventName::Leave => self.tap.pointer_leave(),
            PointerEventName::Up => {
                if self.tap.pointer_up(&event, now, host.scroll_offset()) {
                    let mut tap_source = event.to_source();
                    tap_source.related_target = None;
                    self.dispatch_tap(host, &tap_source, event.client);
                }
            }
            _ => {}
        }
    }

    fn dispatch_tap<H: HostEvents<K> + ?Sized>(
        &mut self,
        host: &mut H,
        source: &SourceEvent<'_, K>,
        client: Point,
    ) {
        let Some(node) = host.element_from_point(client) else {
            debug!("tap outside the document");
            return;
        };
        if self
            .registry
            .find_registered(&*host, node, PointerEventName::Tap)
            .is_none()
        {
            return;
        }
        if let Some(mut tap) = synthesize(&*host, source, PointerEventName::Tap, true, Some(node), None)
        {
            debug!(pointer_id = tap.pointer_id, "pointertap");
            host.dispatch(&mut tap);
        }
    }
}
