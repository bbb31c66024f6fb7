// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ancestor walk for `pointerenter` / `pointerleave`.
//!
//! ## Semantics
//!
//! Enter and leave do not bubble. When the pointer crosses from `related` into `target`, every
//! node strictly between `target` (inclusive) and their common ancestor (exclusive) is entered;
//! only nodes registered for the event on themselves receive it.
//!
//! - Enter is delivered outer-most first (root→target).
//! - Leave is delivered inner-most first (target→root).
//!
//! A missing related target means the pointer came from (or went to) outside the document:
//! the common ancestor is the document element, so the whole chain below it is eligible.
//!
//! ## Example
//!
//! ```
//! use kurbo::Point;
//! use understory_pointer::ancestry::common_ancestor;
//! use understory_pointer::types::{HostTree, ParentLookup};
//!
//! // 1 ⊃ 2 ⊃ 3, and 1 ⊃ 4.
//! struct Doc;
//! impl ParentLookup<u32> for Doc {
//!     fn parent_of(&self, n: &u32) -> Option<u32> {
//!         match n { 2 | 4 => Some(1), 3 => Some(2), _ => None }
//!     }
//! }
//! impl HostTree<u32> for Doc {
//!     fn is_document_root(&self, n: &u32) -> bool { *n == 1 }
//!     fn element_from_point(&self, _: Point) -> Option<u32> { None }
//! }
//!
//! assert_eq!(common_ancestor(&Doc, 3, Some(4)), Some(1));
//! assert_eq!(common_ancestor(&Doc, 3, Some(2)), Some(2));
//! assert_eq!(common_ancestor(&Doc, 3, None), Some(1));
//! ```

use alloc::vec::Vec;

use crate::registry::Registry;
use crate::types::{HostTree, PointerEventName, Target};

/// First node at or above `a` that is the document element or contains `b`.
///
/// Returns `None` only when `a` is detached from the document and nothing on its chain
/// contains `b`.
pub fn common_ancestor<K, H>(host: &H, a: K, b: Option<K>) -> Option<K>
where
    K: Copy + Eq,
    H: HostTree<K> + ?Sized,
{
    let mut cur = Some(a);
    while let Some(n) = cur {
        if host.is_document_root(&n) || b.is_some_and(|b| host.contains(&n, &b)) {
            return Some(n);
        }
        cur = host.parent_of(&n);
    }
    None
}

/// Nodes from `target` up to (not including) the common ancestor with `related` that are
/// registered exactly for `name`, in target→root order.
fn registered_below_common<K, H>(
    host: &H,
    registry: &Registry<K>,
    target: K,
    related: Option<K>,
    name: PointerEventName,
) -> Vec<K>
where
    K: Copy + Ord,
    H: HostTree<K> + ?Sized,
{
    let stop = common_ancestor(host, target, related);
    let mut out = Vec::new();
    let mut cur = Some(target);
    while let Some(n) = cur {
        if Some(n) == stop {
            break;
        }
        if registry.is_registered_exact(Target::Node(n), name) {
            out.push(n);
        }
        cur = host.parent_of(&n);
    }
    out
}

/// Nodes that receive `pointerenter` when moving into `target` from `related`, root→target.
pub fn enter_path<K, H>(host: &H, registry: &Registry<K>, target: K, related: Option<K>) -> Vec<K>
where
    K: Copy + Ord,
    H: HostTree<K> + ?Sized,
{
    let mut path = registered_below_common(host, registry, target, related, PointerEventName::Enter);
    path.reverse();
    path
}

/// Nodes that receive `pointerleave` when moving out of `target` into `related`, target→root.
pub fn leave_path<K, H>(host: &H, registry: &Registry<K>, target: K, related: Option<K>) -> Vec<K>
where
    K: Copy + Ord,
    H: HostTree<K> + ?Sized,
{
    registered_below_common(host, registry, target, related, PointerEventName::Leave)
}
