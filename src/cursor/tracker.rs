//! Pointer tracking state machine.
//!
//! Holds the raw (pixel) cursor for the window and, in the document frame,
//! the document, together with the bounds of each frame. The tracker never
//! touches the DOM: it consumes measured [`PointerEvent`]s and answers what
//! should be published and which bounds denormalize incoming cursors.

use serde::{Deserialize, Serialize};

use super::pointer::{Cursor, Pointer};
use super::style::detect_pointer;
use crate::coord::{
    Coord, Dimensions, DocumentSpace, FrameSpace, NormalizedSpace, WindowSpace,
};
use crate::host::PointerEvent;

/// Coordinate space pointer positions are measured and normalized against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReferenceFrame {
    /// The visible browser window.
    #[default]
    Window,
    /// The entire scrollable document.
    Document,
}

/// Lifecycle of the tracked pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerPhase {
    /// No pointer event seen yet.
    Idle,
    /// A pointer position is held.
    Tracking,
    /// A touch ended; nothing held until the next move.
    Lifted,
}

#[derive(Debug, Clone)]
pub struct Tracker {
    within: ReferenceFrame,
    phase: TrackerPhase,
    window_bounds: Dimensions<WindowSpace>,
    document_bounds: Dimensions<DocumentSpace>,
    window_cursor: Option<Cursor<WindowSpace>>,
    document_cursor: Option<Cursor<DocumentSpace>>,
    viewport_origin: Coord<DocumentSpace>,
}

impl Tracker {
    pub fn new(within: ReferenceFrame) -> Self {
        Self {
            within,
            phase: TrackerPhase::Idle,
            window_bounds: Dimensions::default(),
            document_bounds: Dimensions::default(),
            window_cursor: None,
            document_cursor: None,
            viewport_origin: Coord::default(),
        }
    }

    pub fn within(&self) -> ReferenceFrame {
        self.within
    }

    pub fn phase(&self) -> TrackerPhase {
        self.phase
    }

    pub fn window_cursor(&self) -> Option<&Cursor<WindowSpace>> {
        self.window_cursor.as_ref()
    }

    pub fn document_cursor(&self) -> Option<&Cursor<DocumentSpace>> {
        self.document_cursor.as_ref()
    }

    pub fn window_bounds(&self) -> Dimensions<WindowSpace> {
        self.window_bounds
    }

    pub fn document_bounds(&self) -> Dimensions<DocumentSpace> {
        self.document_bounds
    }

    fn tracks_document(&self) -> bool {
        self.within == ReferenceFrame::Document
    }

    /// Apply one host event. Returns `true` if tracked state changed.
    pub fn apply(&mut self, event: &PointerEvent) -> bool {
        match event {
            PointerEvent::MouseMove {
                client,
                page,
                cursor_style,
            } => {
                let pointer = detect_pointer(cursor_style.as_deref());
                self.record(*client, *page, pointer)
            }
            PointerEvent::TouchMove { client, page } => {
                self.record(*client, *page, Pointer::Touch)
            }
            PointerEvent::TouchEnd => self.lift(),
            PointerEvent::Resize { viewport, document } => {
                let mut changed = self.set_window_bounds(*viewport);
                if self.tracks_document() {
                    changed |= self.settle_document(*document);
                }
                changed
            }
            PointerEvent::Scroll { origin } => self.scroll_to(*origin),
        }
    }

    fn record(
        &mut self,
        client: Coord<WindowSpace>,
        page: Coord<DocumentSpace>,
        pointer: Pointer,
    ) -> bool {
        let window = Some(Cursor::new(client, pointer.clone()));
        let mut changed = self.window_cursor != window;
        self.window_cursor = window;

        if self.tracks_document() {
            let document = Some(Cursor::new(page, pointer));
            changed |= self.document_cursor != document;
            self.document_cursor = document;
        }

        if self.phase != TrackerPhase::Tracking {
            log::trace!("[TRACKER] {:?} -> Tracking", self.phase);
            self.phase = TrackerPhase::Tracking;
            changed = true;
        }
        changed
    }

    fn lift(&mut self) -> bool {
        let mut changed = self.window_cursor.take().is_some();
        if self.tracks_document() {
            changed |= self.document_cursor.take().is_some();
        }
        if self.phase == TrackerPhase::Tracking {
            log::trace!("[TRACKER] Tracking -> Lifted");
            self.phase = TrackerPhase::Lifted;
        }
        changed
    }

    fn set_window_bounds(&mut self, viewport: Dimensions<WindowSpace>) -> bool {
        if self.window_bounds == viewport {
            return false;
        }
        self.window_bounds = viewport;
        true
    }

    /// Replace the document bounds (resize, or the deferred pass after
    /// layout settles). Ignored in the window frame.
    pub fn settle_document(&mut self, document: Dimensions<DocumentSpace>) -> bool {
        if !self.tracks_document() || self.document_bounds == document {
            return false;
        }
        self.document_bounds = document;
        true
    }

    /// Scrolling moves the document under a still pointer without a move
    /// event, so the document cursor is rebuilt from the window cursor.
    fn scroll_to(&mut self, origin: Coord<DocumentSpace>) -> bool {
        self.viewport_origin = origin;
        if !self.tracks_document() {
            return false;
        }
        let document = self.window_cursor.as_ref().map(|cursor| {
            Cursor::new(
                Coord::from_window(cursor.position(), origin),
                cursor.pointer.clone(),
            )
        });
        let changed = self.document_cursor != document;
        self.document_cursor = document;
        changed
    }

    /// Bounds of the active frame, used to denormalize received cursors.
    pub fn active_bounds(&self) -> Dimensions<FrameSpace> {
        match self.within {
            ReferenceFrame::Window => self.window_bounds.into(),
            ReferenceFrame::Document => self.document_bounds.into(),
        }
    }

    /// Raw cursor of the active frame.
    pub fn active_cursor(&self) -> Option<Cursor<FrameSpace>> {
        match self.within {
            ReferenceFrame::Window => self.window_cursor.clone().map(Cursor::into_frame),
            ReferenceFrame::Document => self.document_cursor.clone().map(Cursor::into_frame),
        }
    }

    /// Cursor to publish: `None` without a pointer or before the active
    /// frame has been measured, otherwise the normalized position.
    pub fn published_cursor(&self) -> Option<Cursor<NormalizedSpace>> {
        self.active_cursor()?.normalize(self.active_bounds())
    }
}
