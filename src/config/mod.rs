//! Overlay configuration.
//!
//! - `overlay`: process-wide host overrides (`OVERLAY_CONFIG`), colour and
//!   room helpers
//! - `sticky`: values persisted in key/value storage across page loads

pub mod overlay;
pub mod sticky;

pub use overlay::{OverlayConfig, OVERLAY_CONFIG};
pub use sticky::{KeyValueStorage, MemoryStorage, StickyState, COLOR_KEY};
