//! Boundary between the tracker and the page hosting it.
//!
//! The host turns DOM events into [`PointerEvent`]s that already carry every
//! measurement the tracker needs (positions, resolved cursor style, bounds,
//! scroll origin). Keeping DOM queries on the host side leaves the tracker a
//! pure state machine that runs the same natively and in the browser.

use std::time::Duration;

use crate::coord::{Coord, Dimensions, DocumentSpace, WindowSpace};
use crate::error::CursorsResult;
use crate::observer::Subscription;

/// The five window-level event sources a mount listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    MouseMove,
    TouchMove,
    TouchEnd,
    Resize,
    Scroll,
}

impl EventKind {
    pub const ALL: [EventKind; 5] = [
        EventKind::MouseMove,
        EventKind::TouchMove,
        EventKind::TouchEnd,
        EventKind::Resize,
        EventKind::Scroll,
    ];

    /// DOM event type name.
    pub fn dom_name(&self) -> &'static str {
        match self {
            EventKind::MouseMove => "mousemove",
            EventKind::TouchMove => "touchmove",
            EventKind::TouchEnd => "touchend",
            EventKind::Resize => "resize",
            EventKind::Scroll => "scroll",
        }
    }
}

/// A host event, already measured.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerEvent {
    MouseMove {
        client: Coord<WindowSpace>,
        page: Coord<DocumentSpace>,
        /// Resolved CSS `cursor` of the element under the pointer, if any.
        cursor_style: Option<String>,
    },
    TouchMove {
        client: Coord<WindowSpace>,
        page: Coord<DocumentSpace>,
    },
    TouchEnd,
    Resize {
        viewport: Dimensions<WindowSpace>,
        document: Dimensions<DocumentSpace>,
    },
    Scroll {
        /// Where the viewport's top-left sits in the document.
        origin: Coord<DocumentSpace>,
    },
}

impl PointerEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            PointerEvent::MouseMove { .. } => EventKind::MouseMove,
            PointerEvent::TouchMove { .. } => EventKind::TouchMove,
            PointerEvent::TouchEnd => EventKind::TouchEnd,
            PointerEvent::Resize { .. } => EventKind::Resize,
            PointerEvent::Scroll { .. } => EventKind::Scroll,
        }
    }
}

pub type EventHandler = Box<dyn FnMut(&PointerEvent)>;

/// A page the overlay can be mounted on.
pub trait EventHost {
    /// Register `handler` for `kind`; dropping the subscription unregisters it.
    fn listen(&self, kind: EventKind, handler: EventHandler) -> CursorsResult<Subscription>;

    /// Current visible window size.
    fn viewport(&self) -> Dimensions<WindowSpace>;

    /// Current full scrollable document size.
    fn document_extent(&self) -> Dimensions<DocumentSpace>;

    /// Current scroll offset of the viewport within the document.
    fn viewport_origin(&self) -> Coord<DocumentSpace>;

    /// Run `task` once after `delay`. Not cancellable.
    fn defer(&self, delay: Duration, task: Box<dyn FnOnce()>);
}

/// All listeners of one mount, released together.
///
/// Acquisition stops at the first failure; listeners acquired before it are
/// released when the partially built set is dropped on the error path.
#[derive(Debug)]
pub struct ListenerSet {
    subscriptions: Vec<(EventKind, Subscription)>,
}

impl ListenerSet {
    pub fn attach<H, F>(host: &H, mut make_handler: F) -> CursorsResult<Self>
    where
        H: EventHost + ?Sized,
        F: FnMut(EventKind) -> EventHandler,
    {
        let mut set = ListenerSet {
            subscriptions: Vec::with_capacity(EventKind::ALL.len()),
        };
        for kind in EventKind::ALL {
            let subscription = host.listen(kind, make_handler(kind))?;
            set.subscriptions.push((kind, subscription));
        }
        log::debug!("[TRACKER] attached {} listeners", set.len());
        Ok(set)
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}

impl Drop for ListenerSet {
    fn drop(&mut self) {
        if !self.subscriptions.is_empty() {
            log::debug!("[TRACKER] detaching {} listeners", self.subscriptions.len());
        }
    }
}
