//! Host-page overrides for the overlay.
//!
//! The embedding page may adjust the overlay through process-wide settings
//! before mounting it: colour, room, visibility, reference frame. They are
//! read once when a mount is created.
//!
//! Uses `parking_lot::RwLock` for fast, non-poisoning access.

use base64::Engine;
use lazy_static::lazy_static;
use parking_lot::RwLock;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::cursor::ReferenceFrame;
use crate::error::{CursorsError, CursorsResult};

/// Delay before re-measuring the document once layout has settled.
pub const DEFAULT_SETTLE_DELAY_MS: u32 = 100;

/// Room used when the page URL cannot be read.
pub const DEFAULT_ROOM: &str = "default";

lazy_static! {
    /// Global overlay configuration.
    pub static ref OVERLAY_CONFIG: RwLock<OverlayConfig> = RwLock::new(OverlayConfig::default());
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OverlayConfig {
    /// Colour chosen by the host. `None` = use the persisted or random colour.
    pub color: Option<String>,

    /// Room override. `None` = derive from the page URL.
    pub room: Option<String>,

    /// Keep tracking and publishing, but do not draw peers.
    pub hide_cursors: bool,

    /// Reference frame for new mounts.
    pub within: ReferenceFrame,

    /// Delay before the one-off document re-measure after mount.
    pub document_settle_delay_ms: u32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            color: None,
            room: None,
            hide_cursors: false,
            within: ReferenceFrame::Document,
            document_settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
        }
    }
}

impl OverlayConfig {
    /// Validate colour and clamp the settle delay.
    pub fn validate(&mut self) -> CursorsResult<()> {
        if let Some(color) = &self.color {
            validate_color(color)?;
        }
        if let Some(room) = &self.room {
            if room.trim().is_empty() {
                self.room = None;
            }
        }
        self.document_settle_delay_ms = self.document_settle_delay_ms.min(10_000);
        Ok(())
    }

    /// Room for the page at `href`, unless overridden.
    pub fn room_for(&self, href: Option<&str>) -> String {
        match (&self.room, href) {
            (Some(room), _) => room.clone(),
            (None, Some(href)) => room_for_page(href),
            (None, None) => DEFAULT_ROOM.to_string(),
        }
    }
}

// ============================================================================
// Getters / setters
// ============================================================================

/// Snapshot of the current configuration (read once per mount).
pub fn current() -> OverlayConfig {
    OVERLAY_CONFIG.read().clone()
}

/// Replace the whole configuration after validating it.
pub fn set_config(mut config: OverlayConfig) -> CursorsResult<()> {
    config.validate()?;
    log::debug!("[OVERLAY_CONFIG] set_config({:?})", config);
    *OVERLAY_CONFIG.write() = config;
    Ok(())
}

/// Set the host colour override.
pub fn set_color(color: &str) -> CursorsResult<()> {
    validate_color(color)?;
    log::debug!("[OVERLAY_CONFIG] set_color({})", color);
    OVERLAY_CONFIG.write().color = Some(color.to_string());
    Ok(())
}

pub fn set_hide_cursors(hide: bool) {
    log::debug!("[OVERLAY_CONFIG] set_hide_cursors({})", hide);
    OVERLAY_CONFIG.write().hide_cursors = hide;
}

pub fn set_room(room: Option<String>) {
    log::debug!("[OVERLAY_CONFIG] set_room({:?})", room);
    OVERLAY_CONFIG.write().room = room.filter(|room| !room.trim().is_empty());
}

// ============================================================================
// Helpers
// ============================================================================

/// Accept `#rgb` and `#rrggbb` hex colours.
pub fn validate_color(color: &str) -> CursorsResult<()> {
    let hex = color
        .strip_prefix('#')
        .ok_or_else(|| CursorsError::InvalidColor(color.to_string()))?;
    if !matches!(hex.len(), 3 | 6) || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(CursorsError::InvalidColor(color.to_string()));
    }
    Ok(())
}

/// A bright random colour for users who have not picked one.
pub fn random_color() -> String {
    let mut rng = rand::thread_rng();
    let hue: f64 = rng.gen_range(0.0..360.0);
    let saturation: f64 = rng.gen_range(0.65..0.95);
    let lightness: f64 = rng.gen_range(0.45..0.6);
    let (r, g, b) = hsl_to_rgb(hue, saturation, lightness);
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> (u8, u8, u8) {
    let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let sector = hue / 60.0;
    let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
    let (r, g, b) = match sector as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = lightness - chroma / 2.0;
    let to_byte = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    (to_byte(r), to_byte(g), to_byte(b))
}

/// Room id for a page: base64 of the URL without query or fragment.
pub fn room_for_page(href: &str) -> String {
    let page = href.split(['?', '#']).next().unwrap_or_default();
    if page.is_empty() {
        return DEFAULT_ROOM.to_string();
    }
    base64::engine::general_purpose::STANDARD.encode(page)
}
