use super::types::{distance, Point};
use crate::common::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};

/// Acceptance radius shared by every goal region on the board.
pub const GOAL_RADIUS: f64 = 6.0;

/// The nine goal cells of a 3x3 board, row-major from the top-left cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GoalSelector {
    TopLeft,
    TopCenter,
    TopRight,
    MiddleLeft,
    Center,
    MiddleRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

const BOARD: [GoalSelector; 9] = [
    GoalSelector::TopLeft,
    GoalSelector::TopCenter,
    GoalSelector::TopRight,
    GoalSelector::MiddleLeft,
    GoalSelector::Center,
    GoalSelector::MiddleRight,
    GoalSelector::BottomLeft,
    GoalSelector::BottomCenter,
    GoalSelector::BottomRight,
];

impl GoalSelector {
    /// Map a 1-based cell index onto its goal region.
    pub fn from_index(selector: i64) -> DomainResult<Self> {
        if !(1..=9).contains(&selector) {
            return Err(DomainError::InvalidGoalSelector { selector });
        }
        Ok(BOARD[(selector - 1) as usize])
    }

    pub fn index(&self) -> i64 {
        BOARD
            .iter()
            .position(|g| g == self)
            .map(|i| i as i64 + 1)
            .unwrap_or(0)
    }

    pub fn all() -> &'static [GoalSelector] {
        &BOARD
    }

    pub fn center(&self) -> Point {
        match self {
            GoalSelector::TopLeft => Point::new(16.5, 82.5),
            GoalSelector::TopCenter => Point::new(49.5, 82.5),
            GoalSelector::TopRight => Point::new(82.5, 82.5),
            GoalSelector::MiddleLeft => Point::new(16.5, 49.5),
            GoalSelector::Center => Point::new(49.5, 49.5),
            GoalSelector::MiddleRight => Point::new(82.5, 49.5),
            GoalSelector::BottomLeft => Point::new(16.5, 16.5),
            GoalSelector::BottomCenter => Point::new(49.5, 16.5),
            GoalSelector::BottomRight => Point::new(82.5, 16.5),
        }
    }

    pub fn goal(&self, radius: f64) -> Goal {
        Goal {
            center: self.center(),
            radius,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub center: Point,
    pub radius: f64,
}

impl Goal {
    pub fn new(center: Point, radius: f64) -> Self {
        Self { center, radius }
    }

    pub fn accepts(&self, p: &Point) -> bool {
        distance(p, &self.center) < self.radius
    }
}
