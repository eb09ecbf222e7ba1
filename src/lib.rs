//! Live shared cursors.
//!
//! Tracks the local pointer over a page, publishes it as fractions of the
//! active reference frame (window or document) through a presence feed, and
//! turns the cursors received from peers back into local pixels for
//! rendering.
//!
//! Native targets get the whole pipeline behind the [`host::EventHost`] and
//! [`presence::PresenceFeed`] traits; on wasm32 the `web` module binds it to
//! the browser window and exports a `CursorOverlay` class to JavaScript.

pub mod config;
pub mod coord;
pub mod cursor;
pub mod error;
pub mod host;
pub mod logging;
pub mod observer;
pub mod presence;
pub mod tracking;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use coord::{Coord, Dimensions, DocumentSpace, FrameSpace, NormalizedSpace, WindowSpace};
pub use cursor::{Cursor, Pointer, ReferenceFrame, Tracker, TrackerPhase};
pub use error::{CursorsError, CursorsResult};
pub use host::{EventHost, EventKind, ListenerSet, PointerEvent};
pub use presence::{LocalPresence, Presence, PresenceFeed, PresenceStore, PresenceWithCursors, User};
pub use tracking::CursorTracking;
