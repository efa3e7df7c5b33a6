use super::types::{distance, Point};
use crate::common::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl WorkspaceBounds {
    pub fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> DomainResult<Self> {
        if !(min_x < max_x) || !(min_y < max_y) {
            return Err(DomainError::InvalidConfiguration {
                reason: format!(
                    "workspace bounds must be non-empty, got x [{}, {}] y [{}, {}]",
                    min_x, max_x, min_y, max_y
                ),
            });
        }
        Ok(Self { min_x, max_x, min_y, max_y })
    }

    pub fn contains(&self, p: &Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub center: Point,
    pub radius: f64,
}

/// Circular exclusion zones accumulated over a session. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleField {
    obstacle_radius: f64,
    safety_margin: f64,
    obstacles: Vec<Obstacle>,
}

impl ObstacleField {
    pub fn new(obstacle_radius: f64, safety_margin: f64) -> Self {
        Self {
            obstacle_radius,
            safety_margin,
            obstacles: Vec::new(),
        }
    }

    /// Append an obstacle at `center` with the field's fixed radius.
    pub fn add(&mut self, center: Point) {
        self.obstacles.push(Obstacle {
            center,
            radius: self.obstacle_radius,
        });
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn obstacle_radius(&self) -> f64 {
        self.obstacle_radius
    }

    /// Radius within which a point counts as blocked.
    pub fn clearance(&self) -> f64 {
        self.obstacle_radius + self.safety_margin
    }

    pub fn is_blocked(&self, p: &Point) -> bool {
        let clearance = self.clearance();
        self.obstacles
            .iter()
            .any(|o| distance(p, &o.center) <= clearance)
    }

    /// True if any point of the segment `a`-`b` is blocked.
    pub fn segment_blocked(&self, a: &Point, b: &Point) -> bool {
        let clearance = self.clearance();
        self.obstacles
            .iter()
            .any(|o| distance(&closest_on_segment(a, b, &o.center), &o.center) <= clearance)
    }
}

fn closest_on_segment(a: &Point, b: &Point, p: &Point) -> Point {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return *a;
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    a.lerp(b, t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocked_boundary_is_inclusive() {
        let mut field = ObstacleField::new(18.0, 1.0);
        field.add(Point::new(50.0, 50.0));
        assert!(field.is_blocked(&Point::new(69.0, 50.0)));
        assert!(!field.is_blocked(&Point::new(69.001, 50.0)));
    }

    #[test]
    fn segment_passing_through_obstacle_is_blocked() {
        let mut field = ObstacleField::new(18.0, 1.0);
        field.add(Point::new(50.0, 50.0));
        let a = Point::new(20.0, 50.0);
        let b = Point::new(80.0, 50.0);
        assert!(!field.is_blocked(&a));
        assert!(!field.is_blocked(&b));
        assert!(field.segment_blocked(&a, &b));
        assert!(!field.segment_blocked(&Point::new(20.0, 80.0), &Point::new(80.0, 80.0)));
    }

    #[test]
    fn bounds_reject_inverted_ranges() {
        assert!(WorkspaceBounds::new(0.0, 150.0, 0.0, 150.0).is_ok());
        assert!(WorkspaceBounds::new(10.0, 10.0, 0.0, 150.0).is_err());
        assert!(WorkspaceBounds::new(0.0, 150.0, 5.0, -5.0).is_err());
    }
}
