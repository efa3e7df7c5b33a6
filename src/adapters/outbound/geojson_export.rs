use crate::common::{ApplicationError, ApplicationResult};
use crate::domains::path_planning::{EpisodeOutcome, EpisodeReport, Point};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value};
use std::fs;
use std::path::{Path, PathBuf};

fn position(p: &Point) -> Vec<f64> {
    vec![p.x, p.y]
}

fn feature(geometry: Value, props: &[(&str, JsonValue)]) -> Feature {
    let mut properties = JsonObject::new();
    for (key, value) in props {
        properties.insert(key.to_string(), value.clone());
    }
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(geometry)),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Obstacles, goal, tree edges and the solved path of one episode, in planner coordinates.
pub fn episode_features(report: &EpisodeReport) -> FeatureCollection {
    let mut features = Vec::new();

    for obstacle in report.obstacles.obstacles() {
        features.push(feature(
            Value::Point(position(&obstacle.center)),
            &[("kind", "obstacle".into()), ("radius", obstacle.radius.into())],
        ));
    }
    features.push(feature(
        Value::Point(position(&report.goal.center)),
        &[
            ("kind", "goal".into()),
            ("radius", report.goal.radius.into()),
            ("selector", report.selector.index().into()),
        ],
    ));

    if let EpisodeOutcome::Solved { path, solution } = &report.outcome {
        for node in solution.tree.nodes() {
            let Some(parent) = node.parent.and_then(|p| solution.tree.get(p).ok()) else {
                continue;
            };
            features.push(feature(
                Value::LineString(vec![position(&parent.point), position(&node.point)]),
                &[("kind", "edge".into())],
            ));
        }
        features.push(feature(
            Value::LineString(path.nodes.iter().map(position).collect()),
            &[("kind", "path".into()), ("cost", path.cost.into())],
        ));
    }

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Write the episode as `episode-<n>.geojson` under `dir`, creating it as needed.
pub fn write_episode_geojson(dir: &Path, report: &EpisodeReport) -> ApplicationResult<PathBuf> {
    fs::create_dir_all(dir).map_err(|e| ApplicationError::Export(format!("{}: {}", dir.display(), e)))?;
    let path = dir.join(format!("episode-{}.geojson", report.episode));
    let body = serde_json::to_string_pretty(&episode_features(report))
        .map_err(|e| ApplicationError::Export(e.to_string()))?;
    fs::write(&path, body).map_err(|e| ApplicationError::Export(format!("{}: {}", path.display(), e)))?;
    Ok(path)
}
