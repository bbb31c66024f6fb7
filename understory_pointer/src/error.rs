// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for the few fallible entry points.
//!
//! Steady-state input handling never fails: unresolved targets, missing sessions, and extra
//! unregisters are silent skips. Errors only arise when parsing event names or validating
//! a [`PointerConfig`](crate::config::PointerConfig).

use alloc::string::String;

/// A string that is not one of the pointer event names handled by the engine.
///
/// Returned by `str::parse::<PointerEventName>()`.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("`{0}` is not a pointer event name")]
pub struct UnknownEventName(pub String);

/// Rejected [`PointerConfig`](crate::config::PointerConfig) values.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Tap slop must be finite and strictly positive.
    #[error("tap slop must be a finite positive distance, got {0}")]
    InvalidTapSlop(f64),
    /// A zero-length touch suppression window would let ghost mouse events through.
    #[error("touch suppression window must be non-zero")]
    ZeroTouchSuppression,
    /// A zero-length scroll idle delay would never report scrolling.
    #[error("scroll idle delay must be non-zero")]
    ZeroScrollIdle,
    /// Touch identifiers start at zero; the offset must lift them past the mouse id.
    #[error("touch id offset {offset} lets touch ids collide with mouse id {mouse_id}")]
    TouchIdCollision {
        /// Configured offset added to touch identifiers.
        offset: i32,
        /// Configured mouse pointer id.
        mouse_id: i32,
    },
}
