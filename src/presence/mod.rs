//! Presence: wire schema, the bridge to the transport, and the derived store.

pub mod feed;
pub mod schema;
pub mod store;

pub use feed::{LocalPresence, PresenceFeed};
pub use schema::{Presence, PresencePatch, User, DEFAULT_NAME};
pub use store::{PresenceStore, PresenceWithCursors};
