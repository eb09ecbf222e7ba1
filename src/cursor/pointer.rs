//! Cursor value shared between the tracker, the wire and the store.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

use crate::coord::{Coord, Dimensions, FrameSpace, NormalizedSpace};

/// Input modality, or the icon of a foreign custom cursor under the pointer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Pointer {
    Mouse,
    Touch,
    /// URL of a custom cursor icon set by page content other than the overlay.
    Custom(String),
}

impl Pointer {
    pub fn as_str(&self) -> &str {
        match self {
            Pointer::Mouse => "mouse",
            Pointer::Touch => "touch",
            Pointer::Custom(icon) => icon,
        }
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Pointer {
    fn from(value: String) -> Self {
        match value.as_str() {
            "mouse" => Pointer::Mouse,
            "touch" => Pointer::Touch,
            _ => Pointer::Custom(value),
        }
    }
}

impl Serialize for Pointer {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Pointer {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Pointer::from)
    }
}

/// A pointer position in space `S`.
///
/// On the wire `S` is `NormalizedSpace` and `x`/`y` are fractions of the
/// sender's reference frame; locally they are pixels. "No pointer" is
/// `Option::None` at the use site, never a half-filled cursor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Cursor<S = NormalizedSpace> {
    pub x: f64,
    pub y: f64,
    pub pointer: Pointer,
    #[serde(skip)]
    _space: PhantomData<S>,
}

impl<S: Default> Cursor<S> {
    pub fn new(position: Coord<S>, pointer: Pointer) -> Self {
        Self {
            x: position.x,
            y: position.y,
            pointer,
            _space: PhantomData,
        }
    }

    pub fn position(&self) -> Coord<S> {
        Coord::new(self.x, self.y)
    }

    /// Normalize against `bounds`; `None` while the bounds are unmeasured.
    pub fn normalize(&self, bounds: Dimensions<S>) -> Option<Cursor<NormalizedSpace>> {
        self.position()
            .to_normalized(bounds)
            .map(|uv| Cursor::new(uv, self.pointer.clone()))
    }

    /// Re-tag the cursor into the active frame's pixel space.
    pub fn into_frame(self) -> Cursor<FrameSpace>
    where
        Coord<FrameSpace>: From<Coord<S>>,
    {
        Cursor::new(self.position().into(), self.pointer)
    }
}

impl Cursor<NormalizedSpace> {
    pub fn denormalize<T: Default>(&self, bounds: Dimensions<T>) -> Cursor<T> {
        Cursor::new(self.position().to_pixels(bounds), self.pointer.clone())
    }
}
