//! Browser adapter (wasm32 only).

mod bindings;
mod host;
mod storage;

pub use bindings::CursorOverlay;
pub use host::DomHost;
pub use storage::LocalStorage;

use wasm_bindgen::prelude::*;

use crate::config::{overlay, OverlayConfig};
use crate::error::CursorsError;

impl From<CursorsError> for JsValue {
    fn from(e: CursorsError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}

/// Initialize panic hook and logging for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    crate::logging::init();
}

/// Replace the overlay configuration read by the next `CursorOverlay`.
#[wasm_bindgen(js_name = configureOverlay)]
pub fn configure_overlay(config: JsValue) -> Result<(), JsValue> {
    let config: OverlayConfig = serde_wasm_bindgen::from_value(config)?;
    overlay::set_config(config)?;
    Ok(())
}

#[wasm_bindgen(js_name = setOverlayColor)]
pub fn set_overlay_color(color: &str) -> Result<(), JsValue> {
    overlay::set_color(color)?;
    Ok(())
}

#[wasm_bindgen(js_name = setHideCursors)]
pub fn set_hide_cursors(hide: bool) {
    overlay::set_hide_cursors(hide);
}
