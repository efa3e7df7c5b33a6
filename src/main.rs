use anyhow::{bail, Context};
use rrt_star_app::adapters::outbound::{init_session_logger, init_tracing};
use rrt_star_app::application::PathPlanningService;
use rrt_star_app::{ApplicationError, Config, DomainError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration: defaults, then config.toml (or $RRT_CONFIG), then RRT_* variables
    let config_path = std::env::var("RRT_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    let config = Config::load(&config_path).with_context(|| format!("loading {}", config_path))?;

    init_tracing(&config.logging.filter)?;

    info!("Starting RRT* planner");

    let selectors = goal_selectors(&config)?;
    let logger = init_session_logger(config.logging.file.as_deref(), &config.logging.filter, &config.session.id);
    let cancel = Arc::new(AtomicBool::new(false));
    let mut service = PathPlanningService::new(&config, logger)?.with_cancellation(cancel.clone());

    // Planning is CPU-bound; keep it off the runtime so Ctrl-C stays responsive
    let mut run = tokio::task::spawn_blocking(move || -> anyhow::Result<PathPlanningService> {
        for selector in selectors {
            match service.plan_for_selector(selector) {
                Ok(path) => println!("{}", serde_json::to_string(&path.waypoints)?),
                Err(ApplicationError::PlanningTimedOut { iterations, elapsed_ms }) => {
                    warn!(selector, iterations, elapsed_ms, "no path found within budget");
                }
                Err(ApplicationError::Domain(DomainError::Cancelled { iterations })) => {
                    warn!(selector, iterations, "planning cancelled");
                    break;
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(service)
    });

    let finished = tokio::select! {
        finished = &mut run => finished,
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, stopping the planner");
            cancel.store(true, Ordering::Relaxed);
            run.await
        }
    };

    let mut service = finished??;
    for envelope in service.drain_events()? {
        debug!(event = %serde_json::to_string(&envelope)?, "session event");
    }
    let stats = service.statistics();
    info!(
        episodes = stats.episodes,
        solved = stats.solved,
        timed_out = stats.timed_out,
        aborted = stats.aborted,
        mean_cost = stats.mean_cost().unwrap_or(0.0),
        "Session finished"
    );

    Ok(())
}

fn goal_selectors(config: &Config) -> anyhow::Result<Vec<i64>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let selectors = if args.is_empty() {
        config.session.goal_sequence.clone()
    } else {
        args.iter()
            .map(|a| a.parse::<i64>().with_context(|| format!("goal selector {:?} is not an integer", a)))
            .collect::<anyhow::Result<Vec<_>>>()?
    };
    if selectors.is_empty() {
        bail!("no goal selectors: pass cell numbers 1-9 as arguments or set session.goal_sequence");
    }
    Ok(selectors)
}
