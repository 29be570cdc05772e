//! Core types for gfx-scene.
//!
//! These types define the vocabulary everything else builds on: integer pixel
//! geometry and the 4-bit grayscale color space of the target displays.

use std::fmt;
use std::ops::Add;

// =============================================================================
// Color
// =============================================================================

/// A 4-bit grayscale level, 0 (black) to 15 (white).
///
/// This is the color index every drawing call carries as its last argument.
/// Using an integer level keeps comparisons exact and matches what the
/// display firmware expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Color(u8);

impl Color {
    pub const BLACK: Self = Self(0);
    pub const WHITE: Self = Self(15);

    /// Maximum representable level.
    pub const MAX_LEVEL: u8 = 15;

    /// Create a color, clamping to the 4-bit range.
    pub const fn new(level: u8) -> Self {
        if level > Self::MAX_LEVEL {
            Self(Self::MAX_LEVEL)
        } else {
            Self(level)
        }
    }

    /// The raw grayscale level (0-15).
    #[inline]
    pub const fn level(self) -> u8 {
        self.0
    }
}

impl From<u8> for Color {
    fn from(level: u8) -> Self {
        Self::new(level)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Geometry
// =============================================================================

/// An integer pixel position or offset.
///
/// Offsets compose by addition: a primitive's absolute position is the sum of
/// all ancestor placements plus its own local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ZERO: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    #[inline]
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Pixel dimensions of a frame, component or bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A position plus a size, with derived edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bounds {
    pub position: Point,
    pub size: Size,
}

impl Bounds {
    pub const fn new(position: Point, size: Size) -> Self {
        Self { position, size }
    }

    #[inline]
    pub const fn left(&self) -> i32 {
        self.position.x
    }

    #[inline]
    pub const fn top(&self) -> i32 {
        self.position.y
    }

    /// One past the rightmost column.
    #[inline]
    pub const fn right(&self) -> i32 {
        self.position.x + self.size.width as i32
    }

    /// One past the bottom row.
    #[inline]
    pub const fn bottom(&self) -> i32 {
        self.position.y + self.size.height as i32
    }

    /// Check if a point falls inside these bounds.
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left()
            && point.x < self.right()
            && point.y >= self.top()
            && point.y < self.bottom()
    }
}

// =============================================================================
// Rasterizer masks
// =============================================================================

bitflags::bitflags! {
    /// Quadrant mask for the circle stroke helper.
    ///
    /// The values follow the Adafruit GFX corner-name convention, which is
    /// what lets a rounded rectangle stroke one arc per corner.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Corners: u8 {
        const TOP_LEFT = 1 << 0;
        const TOP_RIGHT = 1 << 1;
        const BOTTOM_RIGHT = 1 << 2;
        const BOTTOM_LEFT = 1 << 3;
        const ALL = Self::TOP_LEFT.bits()
            | Self::TOP_RIGHT.bits()
            | Self::BOTTOM_RIGHT.bits()
            | Self::BOTTOM_LEFT.bits();
    }
}

bitflags::bitflags! {
    /// Side mask for the circle fill helper.
    ///
    /// The fill helper draws vertical scanlines; the mask selects the +x
    /// and/or -x half, again following the Adafruit GFX convention.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Sides: u8 {
        const RIGHT = 1 << 0;
        const LEFT = 1 << 1;
        const BOTH = Self::RIGHT.bits() | Self::LEFT.bits();
    }
}

// =============================================================================
// Tests
// =============================================================================
