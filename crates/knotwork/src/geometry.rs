//! Core geometry types for knotwork.
//!
//! A knot is described by a planar graph of straight [`Stroke`]s. Stroke
//! endpoints are junctions; stroke midpoints are where ribbons cross, bounce
//! or glance. Both are plain [`Vec2`] values.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// A 2D point or vector.
///
/// `Vec2` is used as a map key (junction positions, node midpoints), so it
/// carries a total order: lexicographic by `x`, then `y`. Equality follows the
/// same order, which means `0.0` and `-0.0` compare equal and a NaN equals a
/// NaN with the same bit pattern.
#[derive(Debug, Clone, Copy, Default)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

/// How a ribbon behaves when it passes the midpoint of a stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StrokeType {
    /// Passes straight through and swaps over/under.
    #[default]
    Cross,
    /// Reflects back towards the junction it came from, same side.
    Bounce,
    /// Turns to the neighbouring junction without crossing anything.
    Glance,
}

/// A straight segment of the knot graph. `a` and `b` are junctions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub a: Vec2,
    pub b: Vec2,
    pub kind: StrokeType,
}

/// Input to the tracer: an order-independent collection of strokes.
pub type StrokeList = Vec<Stroke>;

// ============================================================================
// IMPLEMENTATIONS
// ============================================================================

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Angle of the vector in radians, `atan2(y, x)`.
    #[inline]
    pub fn angle(self) -> f64 {
        self.y.atan2(self.x)
    }

    #[inline]
    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    #[inline]
    pub fn distance(self, other: Vec2) -> f64 {
        (other - self).length()
    }

    /// The vector rotated a quarter turn: `(-y, x)`.
    #[inline]
    pub fn perp(self) -> Vec2 {
        Vec2::new(-self.y, self.x)
    }

    /// Unit vector at `angle` radians.
    #[inline]
    pub fn from_angle(angle: f64) -> Vec2 {
        Vec2::new(angle.cos(), angle.sin())
    }

    /// Unit vector in the same direction, or `None` for a (near) zero vector.
    pub fn normalized(self) -> Option<Vec2> {
        let len = self.length();
        if len > f64::EPSILON && len.is_finite() {
            Some(self * (1.0 / len))
        } else {
            None
        }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Key used for ordering. Adding `0.0` folds `-0.0` into `0.0`.
    #[inline]
    fn key(self) -> (f64, f64) {
        (self.x + 0.0, self.y + 0.0)
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;

    #[inline]
    fn mul(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;

    #[inline]
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl PartialEq for Vec2 {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Vec2 {}

impl PartialOrd for Vec2 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Vec2 {
    fn cmp(&self, other: &Self) -> Ordering {
        let (ax, ay) = self.key();
        let (bx, by) = other.key();
        ax.total_cmp(&bx).then_with(|| ay.total_cmp(&by))
    }
}

impl StrokeType {
    /// Get stroke type name as string.
    pub fn name(&self) -> &'static str {
        match self {
            StrokeType::Cross => "cross",
            StrokeType::Bounce => "bounce",
            StrokeType::Glance => "glance",
        }
    }

    /// Parse stroke type from string.
    pub fn from_name(name: &str) -> Option<StrokeType> {
        match name.trim().to_lowercase().as_str() {
            "cross" | "c" | "x" => Some(StrokeType::Cross),
            "bounce" | "b" => Some(StrokeType::Bounce),
            "glance" | "g" => Some(StrokeType::Glance),
            _ => None,
        }
    }

    /// All stroke types.
    pub fn all() -> &'static [StrokeType] {
        &[StrokeType::Cross, StrokeType::Bounce, StrokeType::Glance]
    }
}

impl Stroke {
    /// A `Cross` stroke from `a` to `b`.
    #[inline]
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self { a, b, kind: StrokeType::Cross }
    }

    #[inline]
    pub fn with_kind(a: Vec2, b: Vec2, kind: StrokeType) -> Self {
        Self { a, b, kind }
    }

    /// Angle of the stroke from `a` to `b`.
    #[inline]
    pub fn angle(&self) -> f64 {
        (self.b - self.a).angle()
    }

    #[inline]
    pub fn length(&self) -> f64 {
        (self.b - self.a).length()
    }

    #[inline]
    pub fn midpoint(&self) -> Vec2 {
        self.a + (self.b - self.a) * 0.5
    }

    /// Perpendicular of `b - a`. Not normalized: its length is the stroke length.
    #[inline]
    pub fn normal(&self) -> Vec2 {
        (self.b - self.a).perp()
    }
}

// ============================================================================
// TESTS
// ============================================================================
