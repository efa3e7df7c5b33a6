use rrt_star_app::common::DomainError;
use rrt_star_app::config::Config;
use rrt_star_app::domains::path_planning::Point;
use std::fs;
use tempfile::tempdir;

const SAMPLE: &str = r#"
[planner]
epsilon = 5.0
seed = 42
max_iterations = 5000
start = { x = 140.0, y = 140.0 }

[output]
swap_axes = true

[session]
id = "board"
goal_sequence = [1, 5, 9]
"#;

#[tokio::test]
async fn test_config_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, SAMPLE).unwrap();

    let config = Config::from_file(&path).await.unwrap();
    assert_eq!(config.planner.epsilon, 5.0);
    assert_eq!(config.planner.seed, Some(42));
    assert_eq!(config.planner.max_iterations, Some(5000));
    assert_eq!(config.planner.start, Point::new(140.0, 140.0));
    // Unset values keep their defaults
    assert_eq!(config.planner.neighborhood_factor, 1.75);
    assert_eq!(config.workspace.obstacle_radius, 18.0);
    assert_eq!(config.output.target_y, [0.4, 0.8]);
    assert!(config.output.swap_axes);
    assert_eq!(config.session.id, "board");
    assert_eq!(config.session.goal_sequence, vec![1, 5, 9]);
    assert!(config.validate().is_ok());
}

#[tokio::test]
async fn test_config_from_missing_file_fails() {
    let dir = tempdir().unwrap();
    assert!(Config::from_file(dir.path().join("absent.toml")).await.is_err());
}

#[test]
fn test_layered_load_reads_file_and_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, SAMPLE).unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.planner.epsilon, 5.0);
    assert_eq!(config.session.goal_sequence, vec![1, 5, 9]);
    assert_eq!(config.logging.filter, "info");

    // A missing file is not an error for the layered loader
    let defaults = Config::load(dir.path().join("absent.toml")).unwrap();
    assert_eq!(defaults.planner.epsilon, 10.0);
    assert_eq!(defaults.planner.start, Point::new(150.0, 150.0));
    assert!(defaults.session.goal_sequence.is_empty());
}

#[test]
fn test_invalid_configurations_are_rejected() {
    let mut config = Config::default();
    config.planner.epsilon = 0.0;
    assert!(matches!(config.validate(), Err(DomainError::InvalidConfiguration { .. })));

    let mut config = Config::default();
    config.planner.neighborhood_factor = 1.0;
    assert!(matches!(config.validate(), Err(DomainError::InvalidConfiguration { .. })));

    let mut config = Config::default();
    config.planner.start = Point::new(200.0, 10.0);
    assert!(matches!(config.validate(), Err(DomainError::InvalidConfiguration { .. })));

    let mut config = Config::default();
    config.workspace.max_x = config.workspace.min_x;
    assert!(config.validate().is_err());
}
