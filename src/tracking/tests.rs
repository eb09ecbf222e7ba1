//! Tests for the tracking mount, driven by a simulated page.

#![cfg(test)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use super::CursorTracking;
use crate::config::OverlayConfig;
use crate::coord::{Coord, Dimensions, DocumentSpace, WindowSpace};
use crate::cursor::{
    cursor_css, overlay_cursor_svg, Cursor, Pointer, ReferenceFrame, TrackerPhase,
};
use crate::error::{CursorsError, CursorsResult};
use crate::host::{EventHandler, EventHost, EventKind, PointerEvent};
use crate::observer::{Subscribers, Subscription};
use crate::presence::{LocalPresence, Presence, PresenceFeed, PresenceStore, User};

/// A page with settable measurements and manually dispatched events.
struct SimulatedHost {
    listeners: HashMap<EventKind, Subscribers<PointerEvent>>,
    viewport: Cell<Dimensions<WindowSpace>>,
    document: Cell<Dimensions<DocumentSpace>>,
    origin: Cell<Coord<DocumentSpace>>,
    deferred: RefCell<Vec<(Duration, Box<dyn FnOnce()>)>>,
    refuse: Option<EventKind>,
}

impl SimulatedHost {
    fn new(viewport: (f64, f64), document: (f64, f64)) -> Rc<Self> {
        Rc::new(Self::build(viewport, document, None))
    }

    fn build(viewport: (f64, f64), document: (f64, f64), refuse: Option<EventKind>) -> Self {
        Self {
            listeners: EventKind::ALL
                .iter()
                .map(|kind| (*kind, Subscribers::new()))
                .collect(),
            viewport: Cell::new(Dimensions::new(viewport.0, viewport.1)),
            document: Cell::new(Dimensions::new(document.0, document.1)),
            origin: Cell::new(Coord::default()),
            deferred: RefCell::new(Vec::new()),
            refuse,
        }
    }

    fn dispatch(&self, event: PointerEvent) {
        self.listeners[&event.kind()].emit(&event);
    }

    fn mouse(&self, x: f64, y: f64) {
        let origin = self.origin.get();
        self.dispatch(PointerEvent::MouseMove {
            client: Coord::new(x, y),
            page: Coord::new(x + origin.x, y + origin.y),
            cursor_style: None,
        });
    }

    fn touch(&self, x: f64, y: f64) {
        let origin = self.origin.get();
        self.dispatch(PointerEvent::TouchMove {
            client: Coord::new(x, y),
            page: Coord::new(x + origin.x, y + origin.y),
        });
    }

    fn resize(&self, viewport: (f64, f64), document: (f64, f64)) {
        self.viewport.set(Dimensions::new(viewport.0, viewport.1));
        self.document.set(Dimensions::new(document.0, document.1));
        self.dispatch(PointerEvent::Resize {
            viewport: self.viewport.get(),
            document: self.document.get(),
        });
    }

    fn scroll(&self, x: f64, y: f64) {
        self.origin.set(Coord::new(x, y));
        self.dispatch(PointerEvent::Scroll {
            origin: self.origin.get(),
        });
    }

    fn run_deferred(&self) -> Vec<Duration> {
        let tasks: Vec<_> = self.deferred.borrow_mut().drain(..).collect();
        tasks
            .into_iter()
            .map(|(delay, task)| {
                task();
                delay
            })
            .collect()
    }

    fn live_listeners(&self) -> usize {
        self.listeners.values().map(Subscribers::len).sum()
    }
}

impl EventHost for SimulatedHost {
    fn listen(&self, kind: EventKind, handler: EventHandler) -> CursorsResult<Subscription> {
        if self.refuse == Some(kind) {
            return Err(CursorsError::HostError(format!("{} unavailable", kind.dom_name())));
        }
        let handler = RefCell::new(handler);
        Ok(self.listeners[&kind].subscribe(move |event| (*handler.borrow_mut())(event)))
    }

    fn viewport(&self) -> Dimensions<WindowSpace> {
        self.viewport.get()
    }

    fn document_extent(&self) -> Dimensions<DocumentSpace> {
        self.document.get()
    }

    fn viewport_origin(&self) -> Coord<DocumentSpace> {
        self.origin.get()
    }

    fn defer(&self, delay: Duration, task: Box<dyn FnOnce()>) {
        self.deferred.borrow_mut().push((delay, task));
    }
}

fn config(within: ReferenceFrame) -> OverlayConfig {
    OverlayConfig {
        within,
        ..OverlayConfig::default()
    }
}

fn connected_feed() -> Rc<LocalPresence> {
    let feed = Rc::new(LocalPresence::new(Presence::new("Me", "#ff0000")));
    feed.connect("me");
    feed
}

fn peer(id: &str, x: f64, y: f64) -> User {
    User {
        id: id.to_string(),
        presence: Presence {
            cursor: Some(Cursor::new(Coord::new(x, y), Pointer::Mouse)),
            ..Presence::new(id, "#0000ff")
        },
    }
}

#[test]
fn test_window_scenario_publish_and_render() {
    let host = SimulatedHost::new((1000.0, 500.0), (1000.0, 500.0));
    let feed = connected_feed();
    let store = PresenceStore::new();
    let tracking =
        CursorTracking::mount(&host, Rc::clone(&feed), store.clone(), &config(ReferenceFrame::Window))
            .unwrap();

    host.mouse(500.0, 250.0);
    let published = tracking.published_cursor().unwrap();
    assert!((published.x - 0.5).abs() < 1e-12);
    assert!((published.y - 0.5).abs() < 1e-12);
    assert_eq!(published.pointer, Pointer::Mouse);
    assert_eq!(feed.local_presence().cursor, Some(published));

    // A smaller local viewport renders the same fraction at smaller pixels.
    host.resize((800.0, 400.0), (800.0, 400.0));
    feed.upsert_peer(peer("peer", 0.25, 0.25));

    let snapshot = store.snapshot();
    let cursor = snapshot.other_users["peer"].presence.cursor.as_ref().unwrap();
    assert!((cursor.x - 200.0).abs() < 1e-9);
    assert!((cursor.y - 100.0).abs() < 1e-9);
    assert_eq!(snapshot.within, ReferenceFrame::Window);
    assert_eq!(snapshot.my_id.as_deref(), Some("me"));
}

#[test]
fn test_mount_publishes_null_before_pointer() {
    let host = SimulatedHost::new((1000.0, 500.0), (1000.0, 500.0));
    let sent = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&sent);
    let feed = Rc::new(
        LocalPresence::new(Presence::default())
            .with_outlet(move |patch| sink.borrow_mut().push(patch.to_json())),
    );

    let tracking = CursorTracking::mount(
        &host,
        feed,
        PresenceStore::new(),
        &config(ReferenceFrame::Window),
    )
    .unwrap();

    assert_eq!(tracking.phase(), TrackerPhase::Idle);
    assert_eq!(*sent.borrow(), vec![serde_json::json!({ "cursor": null })]);
}

#[test]
fn test_zero_viewport_publishes_null() {
    let host = SimulatedHost::new((0.0, 0.0), (0.0, 0.0));
    let feed = connected_feed();
    let tracking = CursorTracking::mount(
        &host,
        Rc::clone(&feed),
        PresenceStore::new(),
        &config(ReferenceFrame::Window),
    )
    .unwrap();

    host.mouse(10.0, 10.0);
    assert_eq!(tracking.phase(), TrackerPhase::Tracking);
    assert!(tracking.published_cursor().is_none());
    assert!(feed.local_presence().cursor.is_none());

    host.resize((100.0, 0.0), (100.0, 0.0));
    assert!(tracking.published_cursor().is_none());

    host.resize((100.0, 100.0), (100.0, 100.0));
    let published = tracking.published_cursor().unwrap();
    assert!((published.x - 0.1).abs() < 1e-12);
}

#[test]
fn test_touch_end_then_mouse() {
    let host = SimulatedHost::new((400.0, 400.0), (400.0, 400.0));
    let feed = connected_feed();
    let tracking = CursorTracking::mount(
        &host,
        Rc::clone(&feed),
        PresenceStore::new(),
        &config(ReferenceFrame::Window),
    )
    .unwrap();

    host.touch(100.0, 100.0);
    assert_eq!(tracking.published_cursor().unwrap().pointer, Pointer::Touch);

    host.dispatch(PointerEvent::TouchEnd);
    assert_eq!(tracking.phase(), TrackerPhase::Lifted);
    assert!(tracking.published_cursor().is_none());
    assert!(feed.local_presence().cursor.is_none());

    host.mouse(200.0, 300.0);
    let published = tracking.published_cursor().unwrap();
    assert_eq!(published.pointer, Pointer::Mouse);
    assert!((published.x - 0.5).abs() < 1e-12);
    assert!((published.y - 0.75).abs() < 1e-12);
}

#[test]
fn test_document_frame_scroll_and_deferred_settle() {
    // Document not laid out yet at mount time.
    let host = SimulatedHost::new((1000.0, 500.0), (0.0, 0.0));
    let feed = connected_feed();
    let store = PresenceStore::new();
    let tracking = CursorTracking::mount(
        &host,
        Rc::clone(&feed),
        store.clone(),
        &config(ReferenceFrame::Document),
    )
    .unwrap();

    host.mouse(100.0, 100.0);
    assert!(tracking.published_cursor().is_none());

    host.document.set(Dimensions::new(1000.0, 2000.0));
    let delays = host.run_deferred();
    assert_eq!(delays, vec![Duration::from_millis(100)]);

    let published = tracking.published_cursor().unwrap();
    assert!((published.y - 0.05).abs() < 1e-12);

    // Scrolling moves the document under the still pointer.
    host.scroll(0.0, 500.0);
    let published = tracking.published_cursor().unwrap();
    assert!((published.x - 0.1).abs() < 1e-12);
    assert!((published.y - 0.3).abs() < 1e-12);

    // Peers are rendered in document pixels.
    feed.upsert_peer(peer("p", 0.5, 0.5));
    let cursor = store.snapshot().other_users["p"]
        .presence
        .cursor
        .clone()
        .unwrap();
    assert_eq!(cursor.position().as_tuple(), (500.0, 1000.0));
}

#[test]
fn test_own_overlay_cursor_is_not_foreign() {
    let host = SimulatedHost::new((100.0, 100.0), (100.0, 100.0));
    let tracking = CursorTracking::mount(
        &host,
        connected_feed(),
        PresenceStore::new(),
        &config(ReferenceFrame::Window),
    )
    .unwrap();

    host.dispatch(PointerEvent::MouseMove {
        client: Coord::new(50.0, 50.0),
        page: Coord::new(50.0, 50.0),
        cursor_style: Some(cursor_css(&overlay_cursor_svg("#ff0000"))),
    });
    assert_eq!(tracking.published_cursor().unwrap().pointer, Pointer::Mouse);

    host.dispatch(PointerEvent::MouseMove {
        client: Coord::new(50.0, 50.0),
        page: Coord::new(50.0, 50.0),
        cursor_style: Some(r#"url("https://example.com/pen.png"), auto"#.to_string()),
    });
    assert_eq!(
        tracking.published_cursor().unwrap().pointer,
        Pointer::Custom("https://example.com/pen.png".to_string())
    );
}

#[test]
fn test_unmount_removes_all_listeners() {
    let host = SimulatedHost::new((1000.0, 500.0), (1000.0, 500.0));
    let feed = connected_feed();
    let store = PresenceStore::new();
    let tracking = CursorTracking::mount(
        &host,
        Rc::clone(&feed),
        store.clone(),
        &config(ReferenceFrame::Document),
    )
    .unwrap();
    assert_eq!(tracking.listener_count(), 5);
    assert_eq!(host.live_listeners(), 5);

    host.mouse(10.0, 10.0);
    let before_presence = feed.local_presence();
    let before_snapshot = store.snapshot();

    tracking.unmount();
    assert_eq!(host.live_listeners(), 0);

    host.mouse(900.0, 400.0);
    host.touch(1.0, 1.0);
    host.dispatch(PointerEvent::TouchEnd);
    host.resize((10.0, 10.0), (10.0, 10.0));
    host.scroll(0.0, 50.0);
    host.run_deferred();
    feed.upsert_peer(peer("late", 0.5, 0.5));

    assert_eq!(feed.local_presence(), before_presence);
    assert!(std::rc::Rc::ptr_eq(&store.snapshot(), &before_snapshot));
}

#[test]
fn test_failed_mount_leaves_no_listeners() {
    let host = Rc::new(SimulatedHost::build(
        (100.0, 100.0),
        (100.0, 100.0),
        Some(EventKind::Scroll),
    ));
    let result = CursorTracking::mount(
        &host,
        connected_feed(),
        PresenceStore::new(),
        &config(ReferenceFrame::Window),
    );
    assert!(matches!(result, Err(CursorsError::HostError(_))));
    assert_eq!(host.live_listeners(), 0);
}

#[test]
fn test_remount_does_not_leak() {
    let host = SimulatedHost::new((100.0, 100.0), (100.0, 100.0));
    let feed = connected_feed();
    for _ in 0..3 {
        let tracking = CursorTracking::mount(
            &host,
            Rc::clone(&feed),
            PresenceStore::new(),
            &config(ReferenceFrame::Window),
        )
        .unwrap();
        assert_eq!(host.live_listeners(), 5);
        drop(tracking);
    }
    assert_eq!(host.live_listeners(), 0);
}

#[test]
fn test_identical_moves_publish_once() {
    let host = SimulatedHost::new((100.0, 100.0), (100.0, 100.0));
    let count = Rc::new(Cell::new(0));
    let counter = Rc::clone(&count);
    let feed = Rc::new(
        LocalPresence::new(Presence::default()).with_outlet(move |_| counter.set(counter.get() + 1)),
    );
    let _tracking = CursorTracking::mount(
        &host,
        feed,
        PresenceStore::new(),
        &config(ReferenceFrame::Window),
    )
    .unwrap();
    let after_mount = count.get();

    host.mouse(10.0, 10.0);
    host.mouse(10.0, 10.0);
    assert_eq!(count.get(), after_mount + 1);
}

#[test]
fn test_roster_change_from_store_observer_reaches_store() {
    let host = SimulatedHost::new((800.0, 400.0), (800.0, 400.0));
    let feed = connected_feed();
    let store = PresenceStore::new();
    let _tracking = CursorTracking::mount(
        &host,
        Rc::clone(&feed),
        store.clone(),
        &config(ReferenceFrame::Window),
    )
    .unwrap();

    let roster = Rc::clone(&feed);
    let _observer = store.subscribe(move |snapshot| {
        if snapshot.other_users.contains_key("first") && !snapshot.other_users.contains_key("late") {
            roster.upsert_peer(peer("late", 0.5, 0.5));
        }
    });

    feed.upsert_peer(peer("first", 0.25, 0.25));

    assert!(feed.other_users().contains_key("late"));
    let snapshot = store.snapshot();
    assert!(snapshot.other_users.contains_key("first"));
    let late = snapshot.other_users["late"].presence.cursor.clone().unwrap();
    assert_eq!(late.position().as_tuple(), (400.0, 200.0));
}
