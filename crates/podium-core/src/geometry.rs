//! Stage geometry.
//!
//! Coordinates are in meters on the horizontal plane. `x` grows toward stage
//! right (negative is the left side as seen from the microphones), `y` grows
//! away from the audience: the stage front edge is `y = 0` and the
//! microphones normally stand at negative `y`.

use serde::{Deserialize, Serialize};

/// Lengths below this are treated as zero when normalizing vectors.
const DEGENERATE_LENGTH: f32 = 1e-9;

/// A 2D vector / point in meters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing along `degrees`, measured from the +y axis.
    /// Negative angles turn toward -x (stage left).
    pub fn from_angle_deg(degrees: f32) -> Self {
        let rad = degrees.to_radians();
        Self::new(rad.sin(), rad.cos())
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance(self, other: Vec2) -> f32 {
        (other - self).length()
    }

    pub fn dot(self, other: Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Z component of the 3D cross product.
    pub fn cross(self, other: Vec2) -> f32 {
        self.x * other.y - self.y * other.x
    }

    /// Unit vector, or `None` for a (near) zero-length vector.
    pub fn normalized(self) -> Option<Vec2> {
        let len = self.length();
        if len.is_finite() && len > DEGENERATE_LENGTH {
            Some(Vec2::new(self.x / len, self.y / len))
        } else {
            None
        }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl core::ops::Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl core::ops::Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl core::ops::Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// Physical size of the virtual stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StageDimensions {
    /// Full stage width in meters (normalized x spans `-width/2..width/2`)
    pub width: f32,
    /// Stage depth in meters (normalized y spans `0..depth`)
    pub depth: f32,
}

impl StageDimensions {
    pub const DEFAULT_WIDTH: f32 = 20.0;
    pub const DEFAULT_DEPTH: f32 = 12.0;

    /// Non-finite or non-positive sizes fall back to the defaults.
    pub fn new(width: f32, depth: f32) -> Self {
        let width = if width.is_finite() && width > 0.0 {
            width
        } else {
            Self::DEFAULT_WIDTH
        };
        let depth = if depth.is_finite() && depth > 0.0 {
            depth
        } else {
            Self::DEFAULT_DEPTH
        };
        Self { width, depth }
    }
}

impl Default for StageDimensions {
    fn default() -> Self {
        Self {
            width: Self::DEFAULT_WIDTH,
            depth: Self::DEFAULT_DEPTH,
        }
    }
}

/// Normalized position of an instrument on stage.
///
/// `x` in `[-1, 1]` (left to right), `y` in `[0, 1]` (front edge to back wall).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SourcePosition {
    pub x: f32,
    pub y: f32,
}

impl SourcePosition {
    /// Create a position, clamping into the normalized stage. NaN maps to 0.
    pub fn new(x: f32, y: f32) -> Self {
        let x = if x.is_nan() { 0.0 } else { x.clamp(-1.0, 1.0) };
        let y = if y.is_nan() { 0.0 } else { y.clamp(0.0, 1.0) };
        Self { x, y }
    }

    /// Convert to stage meters.
    pub fn to_meters(self, stage: StageDimensions) -> Vec2 {
        Vec2::new(self.x * stage.width * 0.5, self.y * stage.depth)
    }
}
