//! Cursor subsystem.
//!
//! - `pointer`: the `Cursor` value and its `Pointer` modality
//! - `style`: custom cursor CSS encoding and detection
//! - `tracker`: pointer tracking state machine per mount

pub mod pointer;
pub mod style;
pub mod tracker;

pub use pointer::{Cursor, Pointer};
pub use style::{
    canonical_prefix, cursor_css, detect_pointer, encode_icon, extract_icon_ref,
    overlay_cursor_svg,
};
pub use tracker::{ReferenceFrame, Tracker, TrackerPhase};
