//! Surface-space geometry in canvas pixel units.
use std::fmt;

/// Real-valued point (or displacement) on the drawing surface.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Point) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    pub fn offset(self, by: Point) -> Point {
        Point::new(self.x + by.x, self.y + by.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

/// Width/height pair.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle, used for both source crops and draw destinations.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Extent of the mounted drawing surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub width: u32,
    pub height: u32,
}

impl Bounds {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns true while a box of `size` anchored at `position` lies fully
    /// inside the surface. Touching an edge still counts as inside.
    pub fn contains(&self, position: Point, size: Size) -> bool {
        position.x >= 0.0
            && position.y >= 0.0
            && position.x + size.width <= self.width as f32
            && position.y + size.height <= self.height as f32
    }

    /// Largest anchor coordinates that keep `size` inside the surface.
    ///
    /// Clamped at zero for actors larger than the surface.
    pub fn max_anchor(&self, size: Size) -> Point {
        Point::new(
            (self.width as f32 - size.width).max(0.0),
            (self.height as f32 - size.height).max(0.0),
        )
    }
}
