//! Cursor tracking mount.
//!
//! Wires one page host, one presence feed and the presence store together:
//!
//! ```text
//! host events ──> Tracker ──publish──> PresenceFeed ──> transport
//!                    │                      │
//!                    └─ bounds ──┐          └─ change ─┐
//!                                v                     v
//!                         PresenceWithCursors ──> PresenceStore
//! ```
//!
//! All listeners live in the mount's `ListenerSet` and the feed subscription;
//! dropping the mount releases both. Handlers only hold weak references, so
//! an event delivered after unmount is a no-op.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;

use crate::config::OverlayConfig;
use crate::coord::{Dimensions, DocumentSpace};
use crate::cursor::{Cursor, ReferenceFrame, Tracker, TrackerPhase};
use crate::error::CursorsResult;
use crate::host::{EventHandler, EventHost, ListenerSet, PointerEvent};
use crate::observer::Subscription;
use crate::presence::{PresenceFeed, PresencePatch, PresenceStore, PresenceWithCursors};

#[cfg(test)]
mod tests;

struct TrackingContext<F: ?Sized> {
    tracker: RefCell<Tracker>,
    /// Last value handed to the feed; `None` until the first publish.
    last_published: RefCell<Option<Option<Cursor>>>,
    /// A recompute was requested and has not run yet.
    dirty: Cell<bool>,
    /// `refresh` is on the stack.
    refreshing: Cell<bool>,
    feed: Rc<F>,
    store: PresenceStore,
}

impl<F: PresenceFeed + ?Sized> TrackingContext<F> {
    fn handle(&self, event: &PointerEvent) {
        let changed = self.tracker.borrow_mut().apply(event);
        if changed {
            self.publish();
            self.refresh();
        }
    }

    fn settle_document(&self, extent: Dimensions<DocumentSpace>) {
        let changed = self.tracker.borrow_mut().settle_document(extent);
        if changed {
            log::debug!(
                "[TRACKER] document settled at {}x{}",
                extent.width,
                extent.height
            );
            self.publish();
            self.refresh();
        }
    }

    /// Push the normalized cursor if it differs from the last push.
    ///
    /// The tracker borrow ends before the feed is called: the feed notifies
    /// synchronously and that notification re-enters `refresh`.
    fn publish(&self) {
        let cursor = self.tracker.borrow().published_cursor();
        {
            let mut last = self.last_published.borrow_mut();
            if last.as_ref() == Some(&cursor) {
                return;
            }
            *last = Some(cursor.clone());
        }
        self.feed.update_presence(PresencePatch::cursor(cursor));
    }

    /// Recompute until no request is pending.
    ///
    /// A feed change made while a recompute is running (typically by a store
    /// observer) only marks the mount dirty; the outer call picks it up.
    fn refresh(&self) {
        self.dirty.set(true);
        if self.refreshing.replace(true) {
            return;
        }
        while self.dirty.replace(false) {
            self.recompute();
        }
        self.refreshing.set(false);
    }

    fn recompute(&self) {
        let (bounds, within) = {
            let tracker = self.tracker.borrow();
            (tracker.active_bounds(), tracker.within())
        };
        let snapshot = PresenceWithCursors::derive(self.feed.as_ref(), bounds, within);
        self.store.replace(snapshot);
    }
}

/// A mounted tracker. Dropping it unmounts.
pub struct CursorTracking<F: PresenceFeed + ?Sized + 'static> {
    context: Rc<TrackingContext<F>>,
    listeners: ListenerSet,
    _feed_subscription: Subscription,
}

impl<F: PresenceFeed + ?Sized + 'static> CursorTracking<F> {
    /// Attach to `host`, measure it, publish through `feed`, derive into
    /// `store`.
    pub fn mount<H>(
        host: &Rc<H>,
        feed: Rc<F>,
        store: PresenceStore,
        config: &OverlayConfig,
    ) -> CursorsResult<Self>
    where
        H: EventHost + 'static,
    {
        let within = config.within;
        let context = Rc::new(TrackingContext {
            tracker: RefCell::new(Tracker::new(within)),
            last_published: RefCell::new(None),
            dirty: Cell::new(false),
            refreshing: Cell::new(false),
            feed: Rc::clone(&feed),
            store,
        });

        let listeners = ListenerSet::attach(host.as_ref(), |_kind| {
            let weak: Weak<TrackingContext<F>> = Rc::downgrade(&context);
            let handler: EventHandler = Box::new(move |event: &PointerEvent| {
                if let Some(context) = weak.upgrade() {
                    context.handle(event);
                }
            });
            handler
        })?;

        let weak = Rc::downgrade(&context);
        let feed_subscription = feed.subscribe(Box::new(move || {
            if let Some(context) = weak.upgrade() {
                context.refresh();
            }
        }));

        log::info!("[TRACKER] mounted within {:?}", within);

        // Initial measurement, as if the page had just resized and scrolled.
        context.handle(&PointerEvent::Resize {
            viewport: host.viewport(),
            document: host.document_extent(),
        });
        context.handle(&PointerEvent::Scroll {
            origin: host.viewport_origin(),
        });
        context.publish();
        context.refresh();

        // Layout often settles after first paint; measure the document once more.
        let weak_context = Rc::downgrade(&context);
        let weak_host = Rc::downgrade(host);
        host.defer(
            Duration::from_millis(config.document_settle_delay_ms as u64),
            Box::new(move || {
                if let (Some(context), Some(host)) = (weak_context.upgrade(), weak_host.upgrade()) {
                    context.settle_document(host.document_extent());
                }
            }),
        );

        Ok(Self {
            context,
            listeners,
            _feed_subscription: feed_subscription,
        })
    }

    pub fn within(&self) -> ReferenceFrame {
        self.context.tracker.borrow().within()
    }

    pub fn phase(&self) -> TrackerPhase {
        self.context.tracker.borrow().phase()
    }

    /// Cursor as last handed to the feed.
    pub fn published_cursor(&self) -> Option<Cursor> {
        self.context.last_published.borrow().clone().flatten()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn store(&self) -> &PresenceStore {
        &self.context.store
    }

    /// Unmount explicitly (same as dropping).
    pub fn unmount(self) {
        log::info!("[TRACKER] unmounted");
    }
}
