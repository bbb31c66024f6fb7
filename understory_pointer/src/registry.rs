// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Registration registry: per-target reference counts for pointer listeners.
//!
//! ## Overview
//!
//! The registry is a side-table keyed by [`Target`]; host nodes are never touched.
//! For every (target, event name) pair it keeps two independent counters:
//!
//! - `listeners`: references to the engine's native listener for that event. Only counted when
//!   the event has a native equivalent under the configured input flavor. The native listener is
//!   attached on the 0→1 transition and detached on 1→0.
//! - `aware`: every pointer-style registration, whether or not it needed a native listener.
//!   This is what lookups consult, and its registry-wide total per name tells gesture logic
//!   whether anybody listens for an event at all.
//!
//! Both counters clamp at zero, so unbalanced unregisters are no-ops.
//!
//! ## Lookups
//!
//! - [`Registry::is_registered_exact`] checks a single target; enter/leave use this.
//! - [`Registry::find_registered`] walks from a node through its ancestors and finally to the
//!   window, returning the first target with a positive awareness count.

use alloc::collections::BTreeMap;

use crate::types::{ParentLookup, PointerEventName, Target};

/// Counters for one (target, event name) pair.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Counts {
    /// Native listener references.
    pub listeners: u32,
    /// Pointer-style registrations.
    pub aware: u32,
}

/// Effect of a register/unregister call on the native listener.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Transition {
    /// The count went 0→1; attach the native listener.
    Attached,
    /// The count went 1→0; detach the native listener.
    Detached,
    /// No native listener change.
    Unchanged,
}

#[derive(Clone, Debug, Default)]
struct Entry {
    counts: [Counts; PointerEventName::COUNT],
    force_prevent_default: bool,
}

impl Entry {
    fn is_empty(&self) -> bool {
        !self.force_prevent_default && self.counts.iter().all(|c| *c == Counts::default())
    }
}

/// Reference-counted registrations per target and event name.
#[derive(Clone, Debug)]
pub struct Registry<K> {
    entries: BTreeMap<Target<K>, Entry>,
    totals: [u32; PointerEventName::COUNT],
}

impl<K: Copy + Ord> Default for Registry<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Ord> Registry<K> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            totals: [0; PointerEventName::COUNT],
        }
    }

    /// Record a registration of `name` on `target`.
    ///
    /// `native` says whether the event has a native listener to reference-count.
    pub fn register(
        &mut self,
        target: Target<K>,
        name: PointerEventName,
        native: bool,
    ) -> Transition {
        let counts = &mut self.entries.entry(target).or_default().counts[name.index()];
        counts.aware += 1;
        self.totals[name.index()] += 1;
        if !native {
            return Transition::Unchanged;
        }
        counts.listeners += 1;
        if counts.listeners == 1 {
            Transition::Attached
        } else {
            Transition::Unchanged
        }
    }

    /// Drop a registration of `name` on `target`. Extra calls are no-ops.
    pub fn unregister(
        &mut self,
        target: Target<K>,
        name: PointerEventName,
        native: bool,
    ) -> Transition {
        let Some(entry) = self.entries.get_mut(&target) else {
            return Transition::Unchanged;
        };
        let counts = &mut entry.counts[name.index()];
        if counts.aware > 0 {
            counts.aware -= 1;
            self.totals[name.index()] -= 1;
        }
        let transition = if native && counts.listeners > 0 {
            counts.listeners -= 1;
            if counts.listeners == 0 {
                Transition::Detached
            } else {
                Transition::Unchanged
            }
        } else {
            Transition::Unchanged
        };
        if entry.is_empty() {
            self.entries.remove(&target);
        }
        transition
    }

    /// Forget every registration on a destroyed node.
    ///
    /// No detach transitions are reported: the node's native listeners die with it.
    pub fn forget(&mut self, node: K) {
        if let Some(entry) = self.entries.remove(&Target::Node(node)) {
            for (total, counts) in self.totals.iter_mut().zip(entry.counts.iter()) {
                *total -= counts.aware;
            }
        }
    }

    /// Counters for `name` on `target`.
    pub fn counts(&self, target: Target<K>, name: PointerEventName) -> Counts {
        self.entries
            .get(&target)
            .map(|e| e.counts[name.index()])
            .unwrap_or_default()
    }

    /// Awareness for `name` summed over all targets.
    pub fn total_awareness(&self, name: PointerEventName) -> u32 {
        self.totals[name.index()]
    }

    /// Returns `true` if `target` itself holds a registration for `name`.
    pub fn is_registered_exact(&self, target: Target<K>, name: PointerEventName) -> bool {
        self.counts(target, name).aware > 0
    }

    /// First of `node`, its ancestors, then the window that is registered for `name`.
    pub fn find_registered<P: ParentLookup<K> + ?Sized>(
        &self,
        parents: &P,
        node: K,
        name: PointerEventName,
    ) -> Option<Target<K>> {
        let mut cur = Some(node);
        while let Some(n) = cur {
            if self.is_registered_exact(Target::Node(n), name) {
                return Some(Target::Node(n));
            }
            cur = parents.parent_of(&n);
        }
        self.is_registered_exact(Target::Window, name)
            .then_some(Target::Window)
    }

    /// Flag (or unflag) `target` so touch moves over it cancel the native default action.
    pub fn set_force_prevent_default(&mut self, target: Target<K>, enable: bool) {
        if enable {
            self.entries.entry(target).or_default().force_prevent_default = true;
        } else if let Some(entry) = self.entries.get_mut(&target) {
            entry.force_prevent_default = false;
            if entry.is_empty() {
                self.entries.remove(&target);
            }
        }
    }

    /// Returns `true` if `node`, an ancestor, or the window is flagged to force
    /// `preventDefault` on touch moves.
    pub fn forces_prevent_default<P: ParentLookup<K> + ?Sized>(&self, parents: &P, node: K) -> bool {
        let flagged = |t: Target<K>| self.entries.get(&t).is_some_and(|e| e.force_prevent_default);
        let mut cur = Some(node);
        while let Some(n) = cur {
            if flagged(Target::Node(n)) {
                return true;
            }
            cur = parents.parent_of(&n);
        }
        flagged(Target::Window)
    }
}
