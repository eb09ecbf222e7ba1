//! Presence bridge.
//!
//! The overlay does not own the transport. It reads who is connected through
//! [`PresenceFeed`] and writes its own cursor back through
//! [`PresenceFeed::update_presence`]; delivery, rooms and reconnects are the
//! transport's business.

use std::cell::RefCell;
use std::collections::HashMap;

use super::schema::{Presence, PresencePatch, User};
use crate::observer::{Subscribers, Subscription};

/// Live view of the room, as maintained by the transport.
pub trait PresenceFeed {
    /// Our peer id, once the transport has assigned one.
    fn my_id(&self) -> Option<String>;

    /// Ourselves as published, once connected.
    fn myself(&self) -> Option<User>;

    /// Last-known state of every other peer. No ordering across peers.
    fn other_users(&self) -> HashMap<String, User>;

    /// Merge `patch` into the local presence and hand it to the transport.
    fn update_presence(&self, patch: PresencePatch);

    /// Call `on_change` whenever any of the above may have changed.
    ///
    /// `on_change` may be called again while it is still running, when a
    /// change is made from inside a notification.
    fn subscribe(&self, on_change: Box<dyn Fn()>) -> Subscription;
}

type Outlet = Box<dyn Fn(&PresencePatch)>;

#[derive(Default)]
struct FeedState {
    my_id: Option<String>,
    local: Presence,
    others: HashMap<String, User>,
}

/// In-process presence feed.
///
/// The transport adapter pushes the roster in (`connect`, `upsert_peer`,
/// `remove_peer`, ...) and receives local patches through the outlet.
/// Local presence is kept before a peer id is assigned so nothing published
/// early is lost.
#[derive(Default)]
pub struct LocalPresence {
    state: RefCell<FeedState>,
    changes: Subscribers<()>,
    outlet: Option<Outlet>,
}

impl LocalPresence {
    pub fn new(initial: Presence) -> Self {
        Self {
            state: RefCell::new(FeedState {
                local: initial,
                ..FeedState::default()
            }),
            ..Self::default()
        }
    }

    /// Forward every local patch to `outlet` (the transport).
    pub fn with_outlet(mut self, outlet: impl Fn(&PresencePatch) + 'static) -> Self {
        self.outlet = Some(Box::new(outlet));
        self
    }

    /// The transport assigned us `id`.
    pub fn connect(&self, id: impl Into<String>) {
        let id = id.into();
        log::info!("[PRESENCE] connected as {}", id);
        self.state.borrow_mut().my_id = Some(id);
        self.changes.emit(&());
    }

    /// The transport lost the room; peers are forgotten, local presence kept.
    pub fn disconnect(&self) {
        {
            let mut state = self.state.borrow_mut();
            state.my_id = None;
            state.others.clear();
        }
        log::info!("[PRESENCE] disconnected");
        self.changes.emit(&());
    }

    pub fn upsert_peer(&self, user: User) {
        self.state
            .borrow_mut()
            .others
            .insert(user.id.clone(), user);
        self.changes.emit(&());
    }

    pub fn remove_peer(&self, id: &str) {
        let removed = self.state.borrow_mut().others.remove(id).is_some();
        if removed {
            self.changes.emit(&());
        }
    }

    /// Replace the whole roster. Our own id is filtered out if present.
    pub fn replace_peers(&self, users: impl IntoIterator<Item = User>) {
        {
            let mut state = self.state.borrow_mut();
            let my_id = state.my_id.clone();
            state.others = users
                .into_iter()
                .filter(|user| Some(&user.id) != my_id.as_ref())
                .map(|user| (user.id.clone(), user))
                .collect();
        }
        self.changes.emit(&());
    }

    /// Local presence, whether or not we are connected.
    pub fn local_presence(&self) -> Presence {
        self.state.borrow().local.clone()
    }
}

impl PresenceFeed for LocalPresence {
    fn my_id(&self) -> Option<String> {
        self.state.borrow().my_id.clone()
    }

    fn myself(&self) -> Option<User> {
        let state = self.state.borrow();
        state.my_id.as_ref().map(|id| User {
            id: id.clone(),
            presence: state.local.clone(),
        })
    }

    fn other_users(&self) -> HashMap<String, User> {
        self.state.borrow().others.clone()
    }

    fn update_presence(&self, patch: PresencePatch) {
        if patch.is_empty() {
            return;
        }
        patch.apply_to(&mut self.state.borrow_mut().local);
        if let Some(outlet) = &self.outlet {
            outlet(&patch);
        }
        self.changes.emit(&());
    }

    fn subscribe(&self, on_change: Box<dyn Fn()>) -> Subscription {
        self.changes.subscribe(move |_| on_change())
    }
}
