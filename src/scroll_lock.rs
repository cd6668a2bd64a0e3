// src/scroll_lock.rs
//! Page scroll locking while an overlay is open.
//!
//! Locks are held per owner: the page stays locked until every owner that
//! locked it has unlocked, and repeated lock/unlock calls from one owner are
//! idempotent.

use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OwnerId(u64);

impl OwnerId {
    pub fn next() -> Self {
        thread_local! {
            static NEXT: Cell<u64> = const { Cell::new(1) };
        }
        NEXT.with(|next| {
            let id = next.get();
            next.set(id + 1);
            OwnerId(id)
        })
    }
}

pub trait ScrollLock {
    fn lock(&self, owner: OwnerId);
    fn unlock(&self, owner: OwnerId);
}

/// What a lock/unlock did to the page as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockChange {
    Engaged,
    Released,
    Unchanged,
}

#[derive(Debug, Default)]
pub struct OwnerSet {
    owners: BTreeSet<OwnerId>,
}

impl OwnerSet {
    pub fn insert(&mut self, owner: OwnerId) -> LockChange {
        let was_empty = self.owners.is_empty();
        if self.owners.insert(owner) && was_empty {
            LockChange::Engaged
        } else {
            LockChange::Unchanged
        }
    }

    pub fn remove(&mut self, owner: OwnerId) -> LockChange {
        if self.owners.remove(&owner) && self.owners.is_empty() {
            LockChange::Released
        } else {
            LockChange::Unchanged
        }
    }

    pub fn is_locked(&self) -> bool {
        !self.owners.is_empty()
    }
}

/// Locks scrolling by setting `overflow: hidden` on `<body>` and restoring the
/// previous inline value once the last owner releases.
pub struct BodyScrollLock;

thread_local! {
    static BODY_LOCK: RefCell<(OwnerSet, Option<String>)> = RefCell::new((OwnerSet::default(), None));
}

impl BodyScrollLock {
    pub fn is_locked() -> bool {
        BODY_LOCK.with(|state| state.borrow().0.is_locked())
    }
}

impl ScrollLock for BodyScrollLock {
    fn lock(&self, owner: OwnerId) {
        BODY_LOCK.with(|state| {
            let mut state = state.borrow_mut();
            if state.0.insert(owner) != LockChange::Engaged {
                return;
            }
            let Some(body) = gloo_utils::document().body() else {
                return;
            };
            let style = body.style();
            state.1 = style.get_property_value("overflow").ok();
            let _ = style.set_property("overflow", "hidden");
        });
    }

    fn unlock(&self, owner: OwnerId) {
        BODY_LOCK.with(|state| {
            let mut state = state.borrow_mut();
            if state.0.remove(owner) != LockChange::Released {
                return;
            }
            let previous = state.1.take().unwrap_or_default();
            let Some(body) = gloo_utils::document().body() else {
                return;
            };
            let style = body.style();
            let _ = if previous.is_empty() {
                style.remove_property("overflow").map(|_| ())
            } else {
                style.set_property("overflow", &previous)
            };
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_ids_are_unique() {
        let a = OwnerId::next();
        let b = OwnerId::next();
        assert_ne!(a, b);
    }

    #[test]
    fn test_lock_is_reference_counted_per_owner() {
        let mut set = OwnerSet::default();
        let a = OwnerId(1);
        let b = OwnerId(2);

        assert_eq!(set.insert(a), LockChange::Engaged);
        assert_eq!(set.insert(a), LockChange::Unchanged);
        assert_eq!(set.insert(b), LockChange::Unchanged);

        assert_eq!(set.remove(a), LockChange::Unchanged);
        assert!(set.is_locked());
        assert_eq!(set.remove(a), LockChange::Unchanged);
        assert_eq!(set.remove(b), LockChange::Released);
        assert!(!set.is_locked());
    }

    #[test]
    fn test_unlock_without_lock_is_noop() {
        let mut set = OwnerSet::default();
        assert_eq!(set.remove(OwnerId(9)), LockChange::Unchanged);
        assert!(!set.is_locked());
    }
}
