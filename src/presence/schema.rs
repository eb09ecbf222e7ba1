//! Presence payloads exchanged with the transport.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::coord::{Dimensions, FrameSpace, NormalizedSpace};
use crate::cursor::Cursor;

/// Name every presence starts with until the host sets one.
pub const DEFAULT_NAME: &str = "Anonymous User";

/// What a user publishes about themselves.
///
/// Fields the overlay does not know about are kept in `extra` and survive a
/// round trip untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "", rename_all = "camelCase")]
pub struct Presence<S = NormalizedSpace> {
    #[serde(default)]
    pub cursor: Option<Cursor<S>>,
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_name() -> String {
    DEFAULT_NAME.to_string()
}

impl<S> Default for Presence<S> {
    fn default() -> Self {
        Self {
            cursor: None,
            name: default_name(),
            color: String::new(),
            extra: Map::new(),
        }
    }
}

impl<S> Presence<S> {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
            ..Self::default()
        }
    }
}

/// A connected user as seen through the presence feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "", rename_all = "camelCase")]
pub struct User<S = NormalizedSpace> {
    pub id: String,
    #[serde(default)]
    pub presence: Presence<S>,
}

impl User<NormalizedSpace> {
    /// Copy of this user with the cursor expressed in pixels of `bounds`.
    ///
    /// Identity and application fields are carried over unchanged. A
    /// received cursor with non-finite coordinates is dropped.
    pub fn denormalized(&self, bounds: Dimensions<FrameSpace>) -> User<FrameSpace> {
        let cursor = self.presence.cursor.as_ref().and_then(|cursor| {
            if cursor.position().is_finite() {
                Some(cursor.denormalize(bounds))
            } else {
                log::debug!("[PRESENCE] dropping non-finite cursor from {}", self.id);
                None
            }
        });

        User {
            id: self.id.clone(),
            presence: Presence {
                cursor,
                name: self.presence.name.clone(),
                color: self.presence.color.clone(),
                extra: self.presence.extra.clone(),
            },
        }
    }
}

/// Partial update merged into the local presence.
///
/// `cursor: Some(None)` clears the cursor; `cursor: None` leaves it alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PresencePatch {
    pub cursor: Option<Option<Cursor>>,
    pub name: Option<String>,
    pub color: Option<String>,
}

impl PresencePatch {
    pub fn cursor(cursor: Option<Cursor>) -> Self {
        Self {
            cursor: Some(cursor),
            ..Self::default()
        }
    }

    pub fn color(color: impl Into<String>) -> Self {
        Self {
            color: Some(color.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cursor.is_none() && self.name.is_none() && self.color.is_none()
    }

    pub fn apply_to(&self, presence: &mut Presence) {
        if let Some(cursor) = &self.cursor {
            presence.cursor = cursor.clone();
        }
        if let Some(name) = &self.name {
            presence.name = name.clone();
        }
        if let Some(color) = &self.color {
            presence.color = color.clone();
        }
    }

    /// JSON object holding only the patched keys; a cleared cursor is `null`.
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        if let Some(cursor) = &self.cursor {
            let value = match cursor {
                Some(cursor) => serde_json::to_value(cursor).unwrap_or(Value::Null),
                None => Value::Null,
            };
            map.insert("cursor".to_string(), value);
        }
        if let Some(name) = &self.name {
            map.insert("name".to_string(), Value::String(name.clone()));
        }
        if let Some(color) = &self.color {
            map.insert("color".to_string(), Value::String(color.clone()));
        }
        Value::Object(map)
    }
}
