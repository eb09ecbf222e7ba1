//! Type-safe coordinate system for pointer positions.
//!
//! Pointer positions travel between clients with different viewport sizes,
//! so every coordinate carries the space it was measured in:
//!
//! ```text
//! WindowSpace ─┐                       ┌─> WindowSpace
//!              ├─> NormalizedSpace ────┤
//! DocumentSpace┘     (on the wire)     └─> DocumentSpace
//! ```
//!
//! Each coordinate space is a phantom type that prevents mixing coordinates
//! from different spaces at compile time. `FrameSpace` is the pixel space of
//! whichever reference frame a mount tracks, so window and document pixels can
//! be handled uniformly once the frame has been chosen.

use std::ops::{Add, Sub};

/// Viewport (client) pixels. `(0, 0)` is the top-left of the visible window.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowSpace;

/// Page pixels. `(0, 0)` is the top-left of the full scrollable document.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct DocumentSpace;

/// Pixels of the active reference frame (window or document).
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameSpace;

/// Resolution-independent fractions (0.0-1.0) of the active frame.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct NormalizedSpace;

/// A 2D coordinate with an associated coordinate space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Coord<TSpace> {
    pub x: f64,
    pub y: f64,
    _space: std::marker::PhantomData<TSpace>,
}

impl<TSpace: Default> Coord<TSpace> {
    /// Create a new coordinate in the specified space.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            _space: std::marker::PhantomData,
        }
    }

    /// Create a coordinate from i32 values (DOM event fields).
    pub fn from_i32(x: i32, y: i32) -> Self {
        Self::new(x as f64, y as f64)
    }

    /// Convert to a tuple.
    pub fn as_tuple(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// Both components are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Normalize against the bounds of this space.
    ///
    /// Returns `None` while the bounds are not measured yet, so callers never
    /// see `NaN` or infinite fractions.
    pub fn to_normalized(&self, bounds: Dimensions<TSpace>) -> Option<Coord<NormalizedSpace>> {
        if !bounds.is_measured() {
            return None;
        }
        Some(Coord::new(self.x / bounds.width, self.y / bounds.height))
    }
}

impl<T: Default> Add for Coord<T> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl<T: Default> Sub for Coord<T> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Coord<NormalizedSpace> {
    /// Convert fractions back to pixels of the given bounds.
    pub fn to_pixels<TSpace: Default>(&self, bounds: Dimensions<TSpace>) -> Coord<TSpace> {
        Coord::new(self.x * bounds.width, self.y * bounds.height)
    }
}

impl Coord<DocumentSpace> {
    /// Translate a viewport position into the document, given where the
    /// viewport's top-left currently sits in the document.
    pub fn from_window(window: Coord<WindowSpace>, viewport_origin: Coord<DocumentSpace>) -> Self {
        Coord::new(window.x + viewport_origin.x, window.y + viewport_origin.y)
    }
}

impl From<Coord<WindowSpace>> for Coord<FrameSpace> {
    fn from(coord: Coord<WindowSpace>) -> Self {
        Coord::new(coord.x, coord.y)
    }
}

impl From<Coord<DocumentSpace>> for Coord<FrameSpace> {
    fn from(coord: Coord<DocumentSpace>) -> Self {
        Coord::new(coord.x, coord.y)
    }
}

/// Pixel extent of a reference frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Dimensions<TSpace> {
    pub width: f64,
    pub height: f64,
    _space: std::marker::PhantomData<TSpace>,
}

impl<TSpace: Default> Dimensions<TSpace> {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            _space: std::marker::PhantomData,
        }
    }

    pub fn from_i32(width: i32, height: i32) -> Self {
        Self::new(width as f64, height as f64)
    }

    /// Not-yet-measured bounds are zero on at least one axis.
    pub fn is_measured(&self) -> bool {
        self.width != 0.0 && self.height != 0.0
    }
}

impl From<Dimensions<WindowSpace>> for Dimensions<FrameSpace> {
    fn from(dims: Dimensions<WindowSpace>) -> Self {
        Dimensions::new(dims.width, dims.height)
    }
}

impl From<Dimensions<DocumentSpace>> for Dimensions<FrameSpace> {
    fn from(dims: Dimensions<DocumentSpace>) -> Self {
        Dimensions::new(dims.width, dims.height)
    }
}

/// `point / bounds`, or `None` when the bounds are unmeasured.
pub fn normalize<S: Default>(
    point: Coord<S>,
    bounds: Dimensions<S>,
) -> Option<Coord<NormalizedSpace>> {
    point.to_normalized(bounds)
}

/// `fraction * bounds`.
pub fn denormalize<S: Default>(fraction: Coord<NormalizedSpace>, bounds: Dimensions<S>) -> Coord<S> {
    fraction.to_pixels(bounds)
}
