//! JavaScript surface of the overlay.
//!
//! The page owns the transport. It constructs a `CursorOverlay` with a
//! function that sends presence patches, feeds the roster back in
//! (`connect`, `setOtherUsers`, `upsertUser`, ...) and renders whatever
//! `onChange` delivers.

use std::rc::Rc;

use js_sys::Function;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use super::host::DomHost;
use super::storage::LocalStorage;
use crate::config::overlay::{self, random_color, validate_color};
use crate::config::{StickyState, COLOR_KEY};
use crate::error::CursorsError;
use crate::observer::Subscription;
use crate::presence::{
    LocalPresence, Presence, PresenceFeed, PresencePatch, PresenceStore, User, DEFAULT_NAME,
};
use crate::tracking::CursorTracking;

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

fn from_js<T: serde::de::DeserializeOwned>(value: JsValue) -> Result<T, CursorsError> {
    serde_wasm_bindgen::from_value(value).map_err(|e| CursorsError::PresenceError(e.to_string()))
}

#[wasm_bindgen]
pub struct CursorOverlay {
    feed: Rc<LocalPresence>,
    store: PresenceStore,
    tracking: Option<CursorTracking<LocalPresence>>,
    color: StickyState<String, LocalStorage>,
    room: String,
    hide_cursors: bool,
    observers: Vec<Subscription>,
}

#[wasm_bindgen]
impl CursorOverlay {
    /// Mount on the current page. `update_presence` receives every local
    /// presence patch as a plain object.
    #[wasm_bindgen(constructor)]
    pub fn new(update_presence: Function) -> Result<CursorOverlay, JsValue> {
        let config = overlay::current();
        let host = Rc::new(DomHost::new()?);
        let room = config.room_for(host.href().as_deref());

        let mut color = StickyState::load(LocalStorage::new()?, COLOR_KEY, random_color)?;
        if let Some(chosen) = &config.color {
            color.set(chosen.clone())?;
        }

        let outlet = move |patch: &PresencePatch| {
            let sent = to_js(&patch.to_json())
                .and_then(|value| update_presence.call1(&JsValue::NULL, &value));
            if let Err(e) = sent {
                log::warn!("[PRESENCE] updatePresence failed: {:?}", e);
            }
        };
        let feed = Rc::new(
            LocalPresence::new(Presence::new(DEFAULT_NAME, color.get().clone())).with_outlet(outlet),
        );

        let store = PresenceStore::global();
        let tracking = CursorTracking::mount(&host, Rc::clone(&feed), store.clone(), &config)?;
        log::info!("[Cursors] overlay mounted in room {}", room);

        Ok(CursorOverlay {
            feed,
            store,
            tracking: Some(tracking),
            color,
            room,
            hide_cursors: config.hide_cursors,
            observers: Vec::new(),
        })
    }

    #[wasm_bindgen(getter)]
    pub fn room(&self) -> String {
        self.room.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn color(&self) -> String {
        self.color.get().clone()
    }

    #[wasm_bindgen(getter, js_name = hideCursors)]
    pub fn hide_cursors(&self) -> bool {
        self.hide_cursors
    }

    /// CSS `cursor` value of the overlay's own arrow in the current colour.
    #[wasm_bindgen(getter, js_name = cursorCss)]
    pub fn cursor_css(&self) -> String {
        crate::cursor::cursor_css(&crate::cursor::overlay_cursor_svg(self.color.get()))
    }

    /// Persist a new colour and publish it.
    #[wasm_bindgen(js_name = setColor)]
    pub fn set_color(&mut self, color: String) -> Result<(), JsValue> {
        validate_color(&color)?;
        self.color.set(color.clone())?;
        self.feed.update_presence(PresencePatch::color(color));
        Ok(())
    }

    pub fn connect(&self, id: String) {
        self.feed.connect(id);
    }

    pub fn disconnect(&self) {
        self.feed.disconnect();
    }

    #[wasm_bindgen(js_name = setOtherUsers)]
    pub fn set_other_users(&self, users: JsValue) -> Result<(), JsValue> {
        let users: Vec<User> = from_js(users)?;
        self.feed.replace_peers(users);
        Ok(())
    }

    #[wasm_bindgen(js_name = upsertUser)]
    pub fn upsert_user(&self, user: JsValue) -> Result<(), JsValue> {
        let user: User = from_js(user)?;
        self.feed.upsert_peer(user);
        Ok(())
    }

    #[wasm_bindgen(js_name = removeUser)]
    pub fn remove_user(&self, id: String) {
        self.feed.remove_peer(&id);
    }

    /// Current denormalized presence.
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        to_js(self.store.snapshot().as_ref())
    }

    /// Call `callback` with every new snapshot until `unmount`.
    #[wasm_bindgen(js_name = onChange)]
    pub fn on_change(&mut self, callback: Function) {
        let subscription = self.store.subscribe(move |snapshot| {
            let sent = to_js(snapshot.as_ref())
                .and_then(|value| callback.call1(&JsValue::NULL, &value));
            if let Err(e) = sent {
                log::warn!("[STORE] onChange callback failed: {:?}", e);
            }
        });
        self.observers.push(subscription);
    }

    /// Detach every listener and observer. Idempotent.
    pub fn unmount(&mut self) {
        self.observers.clear();
        if let Some(tracking) = self.tracking.take() {
            tracking.unmount();
        }
    }
}
