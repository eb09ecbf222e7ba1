//! Derived presence store.
//!
//! Holds the pixel-space view of ourselves and every peer for the active
//! reference frame. Each recompute builds a complete new snapshot and swaps
//! it in, so observers only ever see a whole snapshot: the previous one or
//! the new one.
//!
//! The page runs on a single UI thread, so the process-wide instance is a
//! thread-local service. Mounts receive a `PresenceStore` handle explicitly;
//! tests create their own with [`PresenceStore::new`].

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde::Serialize;

use super::feed::PresenceFeed;
use super::schema::User;
use crate::coord::{Dimensions, FrameSpace};
use crate::cursor::ReferenceFrame;
use crate::observer::{Subscribers, Subscription};

/// Denormalized snapshot consumed by rendering.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceWithCursors {
    pub my_id: Option<String>,
    pub myself: Option<User<FrameSpace>>,
    pub other_users: HashMap<String, User<FrameSpace>>,
    pub within: ReferenceFrame,
}

impl PresenceWithCursors {
    /// Read the feed and express every cursor in pixels of `bounds`.
    pub fn derive<F: PresenceFeed + ?Sized>(
        feed: &F,
        bounds: Dimensions<FrameSpace>,
        within: ReferenceFrame,
    ) -> Self {
        let other_users = feed
            .other_users()
            .iter()
            .map(|(id, user)| (id.clone(), user.denormalized(bounds)))
            .collect();

        Self {
            my_id: feed.my_id(),
            myself: feed.myself().map(|user| user.denormalized(bounds)),
            other_users,
            within,
        }
    }
}

struct StoreInner {
    snapshot: RefCell<Rc<PresenceWithCursors>>,
    observers: Subscribers<Rc<PresenceWithCursors>>,
}

#[derive(Clone)]
pub struct PresenceStore {
    inner: Rc<StoreInner>,
}

thread_local! {
    static PRESENCE_STORE: PresenceStore = PresenceStore::new();
}

impl Default for PresenceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PresenceStore {
    /// An isolated store starting from the empty snapshot.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(StoreInner {
                snapshot: RefCell::new(Rc::new(PresenceWithCursors::default())),
                observers: Subscribers::new(),
            }),
        }
    }

    /// The process-wide store.
    pub fn global() -> Self {
        PRESENCE_STORE.with(Clone::clone)
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> Rc<PresenceWithCursors> {
        Rc::clone(&self.inner.snapshot.borrow())
    }

    /// Swap in a new snapshot and notify observers.
    pub fn replace(&self, snapshot: PresenceWithCursors) {
        let snapshot = Rc::new(snapshot);
        {
            let mut current = self.inner.snapshot.borrow_mut();
            if **current == *snapshot {
                return;
            }
            *current = Rc::clone(&snapshot);
        }
        log::trace!(
            "[STORE] snapshot replaced ({} peers)",
            snapshot.other_users.len()
        );
        self.inner.observers.emit(&snapshot);
    }

    /// Back to the empty snapshot.
    pub fn reset(&self) {
        self.replace(PresenceWithCursors::default());
    }

    /// Observe replacements. An observer that replaces the snapshot from
    /// inside its notification supersedes the one being delivered; the
    /// remaining observers then only see the newer snapshot.
    pub fn subscribe(&self, observer: impl Fn(&Rc<PresenceWithCursors>) + 'static) -> Subscription {
        let inner = Rc::downgrade(&self.inner);
        self.inner.observers.subscribe(move |snapshot| {
            let Some(inner) = inner.upgrade() else {
                return;
            };
            let current = Rc::ptr_eq(&inner.snapshot.borrow(), snapshot);
            if current {
                observer(snapshot);
            }
        })
    }
}
