//! Subscription handles and observer lists.
//!
//! Everything the overlay listens to (DOM events, presence changes, store
//! snapshots) hands back a [`Subscription`]. Dropping it detaches the
//! listener, so a mount that owns its subscriptions cannot leak them.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Detaches a listener when dropped.
#[must_use = "dropping a Subscription detaches the listener immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Keep the listener attached for the rest of the process.
    pub fn forget(mut self) {
        self.release = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("attached", &self.release.is_some())
            .finish()
    }
}

type Handler<E> = Rc<dyn Fn(&E)>;

struct SubscriberList<E: ?Sized> {
    next_id: u64,
    entries: Vec<(u64, Handler<E>)>,
}

/// Single-threaded list of callbacks notified with `&E`.
///
/// Handlers are `Fn` and may be re-entered: a handler that causes another
/// emit on the same list is called again for it. Handlers that keep state
/// hold it in `Cell`/`RefCell` and guard their own recursion.
pub struct Subscribers<E: ?Sized + 'static> {
    list: Rc<RefCell<SubscriberList<E>>>,
}

impl<E: ?Sized + 'static> Default for Subscribers<E> {
    fn default() -> Self {
        Self {
            list: Rc::new(RefCell::new(SubscriberList {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }
}

impl<E: ?Sized + 'static> Subscribers<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, handler: impl Fn(&E) + 'static) -> Subscription {
        let id = {
            let mut list = self.list.borrow_mut();
            let id = list.next_id;
            list.next_id += 1;
            let handler: Handler<E> = Rc::new(handler);
            list.entries.push((id, handler));
            id
        };

        let weak: Weak<RefCell<SubscriberList<E>>> = Rc::downgrade(&self.list);
        Subscription::new(move || {
            if let Some(list) = weak.upgrade() {
                list.borrow_mut().entries.retain(|(entry, _)| *entry != id);
            }
        })
    }

    /// Notify every subscriber.
    ///
    /// The list is copied before dispatch so handlers may subscribe or
    /// unsubscribe while being notified.
    pub fn emit(&self, event: &E) {
        let handlers: Vec<Handler<E>> = self
            .list
            .borrow()
            .entries
            .iter()
            .map(|(_, handler)| Rc::clone(handler))
            .collect();

        for handler in handlers {
            handler(event);
        }
    }

    pub fn len(&self) -> usize {
        self.list.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
