// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Resettable deadline used for the touch suppression window and the scroll idle delay.

use core::time::Duration;

/// A debounce: active from the last `arm` until `delay` has passed without another `arm`.
///
/// Time is whatever monotonic timestamp the host passes in; expiry is observed on the next query.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Debounce {
    delay: Duration,
    deadline: Option<Duration>,
}

impl Debounce {
    pub(crate) const fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Cancel any pending expiry and restart the delay at `now`.
    pub(crate) fn arm(&mut self, now: Duration) {
        self.deadline = Some(now.saturating_add(self.delay));
    }

    pub(crate) fn is_active(&self, now: Duration) -> bool {
        self.deadline.is_some_and(|deadline| now < deadline)
    }
}
