//! `EventHost` backed by the browser window.

use std::time::Duration;

use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use wasm_bindgen::JsCast;
use web_sys::{Event, MouseEvent, TouchEvent, Window};

use crate::coord::{Coord, Dimensions, DocumentSpace, WindowSpace};
use crate::error::{CursorsResult, OptionExt};
use crate::host::{EventHandler, EventHost, EventKind, PointerEvent};
use crate::observer::Subscription;

/// The page the module is loaded into.
#[derive(Clone)]
pub struct DomHost {
    window: Window,
}

impl DomHost {
    pub fn new() -> CursorsResult<Self> {
        let window = web_sys::window().context("No window")?;
        Ok(Self { window })
    }

    /// Current page URL, used to derive the default room.
    pub fn href(&self) -> Option<String> {
        self.window.location().href().ok()
    }

    fn measure(&self, kind: EventKind, event: &Event) -> Option<PointerEvent> {
        match kind {
            EventKind::MouseMove => {
                let event = event.dyn_ref::<MouseEvent>()?;
                let client = Coord::from_i32(event.client_x(), event.client_y());
                Some(PointerEvent::MouseMove {
                    client,
                    page: Coord::from_i32(event.page_x(), event.page_y()),
                    cursor_style: self.cursor_style_at(client),
                })
            }
            EventKind::TouchMove => {
                let event = event.dyn_ref::<TouchEvent>()?;
                let touch = event.touches().get(0)?;
                Some(PointerEvent::TouchMove {
                    client: Coord::from_i32(touch.client_x(), touch.client_y()),
                    page: Coord::from_i32(touch.page_x(), touch.page_y()),
                })
            }
            EventKind::TouchEnd => Some(PointerEvent::TouchEnd),
            EventKind::Resize => Some(PointerEvent::Resize {
                viewport: self.viewport(),
                document: self.document_extent(),
            }),
            EventKind::Scroll => Some(PointerEvent::Scroll {
                origin: self.viewport_origin(),
            }),
        }
    }

    /// Computed CSS `cursor` of the element under `point`.
    fn cursor_style_at(&self, point: Coord<WindowSpace>) -> Option<String> {
        let document = self.window.document()?;
        let element = document.element_from_point(point.x as f32, point.y as f32)?;
        let style = self.window.get_computed_style(&element).ok()??;
        style
            .get_property_value("cursor")
            .ok()
            .filter(|cursor| !cursor.is_empty())
    }
}

impl EventHost for DomHost {
    fn listen(&self, kind: EventKind, mut handler: EventHandler) -> CursorsResult<Subscription> {
        let host = self.clone();
        let listener = EventListener::new(&self.window, kind.dom_name(), move |event| {
            if let Some(measured) = host.measure(kind, event) {
                handler(&measured);
            }
        });
        Ok(Subscription::new(move || drop(listener)))
    }

    fn viewport(&self) -> Dimensions<WindowSpace> {
        let width = self.window.inner_width().ok().and_then(|v| v.as_f64());
        let height = self.window.inner_height().ok().and_then(|v| v.as_f64());
        Dimensions::new(width.unwrap_or_default(), height.unwrap_or_default())
    }

    fn document_extent(&self) -> Dimensions<DocumentSpace> {
        match self.window.document().and_then(|d| d.document_element()) {
            Some(root) => Dimensions::from_i32(root.scroll_width(), root.scroll_height()),
            None => Dimensions::default(),
        }
    }

    fn viewport_origin(&self) -> Coord<DocumentSpace> {
        if let (Ok(x), Ok(y)) = (self.window.scroll_x(), self.window.scroll_y()) {
            return Coord::new(x, y);
        }
        match self.window.document().and_then(|d| d.document_element()) {
            Some(root) => Coord::from_i32(root.scroll_left(), root.scroll_top()),
            None => Coord::default(),
        }
    }

    fn defer(&self, delay: Duration, task: Box<dyn FnOnce()>) {
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        Timeout::new(millis, task).forget();
    }
}
