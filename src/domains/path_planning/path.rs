use super::tree::{NodeId, Tree};
use super::types::{remap, Point, Waypoint};
use crate::common::DomainResult;
use crate::config::OutputConfig;
use serde::{Deserialize, Serialize};

/// Affine map from planner space onto the normalized execution frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputFrame {
    pub source_x: [f64; 2],
    pub source_y: [f64; 2],
    pub target_x: [f64; 2],
    pub target_y: [f64; 2],
    pub swap_axes: bool,
}

impl Default for OutputFrame {
    fn default() -> Self {
        Self::from(&OutputConfig::default())
    }
}

impl From<&OutputConfig> for OutputFrame {
    fn from(config: &OutputConfig) -> Self {
        Self {
            source_x: config.source_x,
            source_y: config.source_y,
            target_x: config.target_x,
            target_y: config.target_y,
            swap_axes: config.swap_axes,
        }
    }
}

impl OutputFrame {
    pub fn map(&self, p: &Point) -> DomainResult<Waypoint> {
        let x = remap(p.x, self.source_x[0], self.source_x[1], self.target_x[0], self.target_x[1])?;
        let y = remap(p.y, self.source_y[0], self.source_y[1], self.target_y[0], self.target_y[1])?;
        Ok(if self.swap_axes {
            Waypoint { x: y, y: x }
        } else {
            Waypoint { x, y }
        })
    }

    /// Inverse of [`OutputFrame::map`].
    pub fn unmap(&self, w: &Waypoint) -> DomainResult<Point> {
        let (wx, wy) = if self.swap_axes { (w.y, w.x) } else { (w.x, w.y) };
        Ok(Point {
            x: remap(wx, self.target_x[0], self.target_x[1], self.source_x[0], self.source_x[1])?,
            y: remap(wy, self.target_y[0], self.target_y[1], self.source_y[0], self.source_y[1])?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedPath {
    /// Normalized waypoints, goal end first. Entry `i` is the parent of `nodes[i]`.
    pub waypoints: Vec<Waypoint>,
    /// Planner-space node positions from the terminal node back to the start.
    pub nodes: Vec<Point>,
    pub cost: f64,
}

impl PlannedPath {
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Waypoints in start-to-goal order.
    pub fn start_to_goal(&self) -> Vec<Waypoint> {
        self.waypoints.iter().rev().copied().collect()
    }
}

/// Walk from `terminal` to the root, emitting each non-root node's parent in the output frame.
pub fn extract_path(tree: &Tree, terminal: NodeId, frame: &OutputFrame) -> DomainResult<PlannedPath> {
    let ids = tree.path_to_root(terminal)?;
    let mut nodes = Vec::with_capacity(ids.len());
    let mut waypoints = Vec::with_capacity(ids.len().saturating_sub(1));
    for id in ids {
        let node = tree.get(id)?;
        nodes.push(node.point);
        if let Some(parent) = node.parent {
            waypoints.push(frame.map(&tree.point(parent)?)?);
        }
    }
    Ok(PlannedPath {
        waypoints,
        nodes,
        cost: tree.cost(terminal)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::DomainError;

    #[test]
    fn default_frame_maps_workspace_corners() {
        let frame = OutputFrame::default();
        assert_eq!(frame.map(&Point::new(0.0, 0.0)).unwrap(), Waypoint { x: 0.0, y: 0.4 });
        let far = frame.map(&Point::new(150.0, 150.0)).unwrap();
        assert!((far.x - 0.5).abs() < 1e-12);
        assert!((far.y - 0.8).abs() < 1e-12);
    }

    #[test]
    fn swapped_frame_round_trips() {
        let frame = OutputFrame {
            swap_axes: true,
            ..OutputFrame::default()
        };
        let p = Point::new(30.0, 120.0);
        let w = frame.map(&p).unwrap();
        assert!((w.x - 0.72).abs() < 1e-12);
        assert!((w.y - 0.1).abs() < 1e-12);
        let back = frame.unmap(&w).unwrap();
        assert!((back.x - p.x).abs() < 1e-9 && (back.y - p.y).abs() < 1e-9);
    }

    #[test]
    fn degenerate_frame_fails_loudly() {
        let frame = OutputFrame {
            source_x: [5.0, 5.0],
            ..OutputFrame::default()
        };
        assert!(matches!(
            frame.map(&Point::new(1.0, 1.0)),
            Err(DomainError::DegenerateRange { .. })
        ));
    }

    #[test]
    fn extraction_emits_parents_goal_end_first() {
        let mut tree = Tree::new(Point::new(150.0, 150.0));
        let a = tree.insert(Point::new(140.0, 150.0), tree.root()).unwrap();
        let b = tree.insert(Point::new(130.0, 150.0), a).unwrap();
        let frame = OutputFrame::default();

        let path = extract_path(&tree, b, &frame).unwrap();
        assert_eq!(path.nodes, vec![Point::new(130.0, 150.0), Point::new(140.0, 150.0), Point::new(150.0, 150.0)]);
        assert_eq!(path.waypoints.len(), 2);
        assert_eq!(path.waypoints[0], frame.map(&Point::new(140.0, 150.0)).unwrap());
        assert_eq!(path.waypoints[1], frame.map(&Point::new(150.0, 150.0)).unwrap());
        assert_eq!(path.cost, 20.0);
        assert_eq!(path.start_to_goal()[0], path.waypoints[1]);
    }

    #[test]
    fn root_terminal_yields_empty_path() {
        let tree = Tree::new(Point::new(10.0, 10.0));
        let path = extract_path(&tree, tree.root(), &OutputFrame::default()).unwrap();
        assert!(path.is_empty());
        assert_eq!(path.nodes.len(), 1);
    }
}
