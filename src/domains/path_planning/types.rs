use crate::common::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};

/// A position in planner space (workspace units).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        distance(self, other)
    }

    /// Linear interpolation: `t = 0` yields `self`, `t = 1` yields `other`.
    pub fn lerp(&self, other: &Point, t: f64) -> Point {
        Point {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}

/// A waypoint in the normalized frame consumed by the execution side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub x: f64,
    pub y: f64,
}

pub fn distance(a: &Point, b: &Point) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

pub fn midpoint(a: &Point, b: &Point) -> Point {
    a.lerp(b, 0.5)
}

/// Affine rescaling of `value` from `[old_min, old_max]` onto `[new_min, new_max]`.
///
/// Either range may be inverted; only a zero-width source range is rejected.
pub fn remap(value: f64, old_min: f64, old_max: f64, new_min: f64, new_max: f64) -> DomainResult<f64> {
    let old_range = old_max - old_min;
    if old_range == 0.0 {
        return Err(DomainError::DegenerateRange {
            min: old_min,
            max: old_max,
        });
    }
    Ok((value - old_min) * (new_max - new_min) / old_range + new_min)
}
