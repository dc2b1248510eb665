//! Train command - automatic training with the ε-greedy policy

use std::{
    path::PathBuf,
    sync::{Arc, Mutex, PoisonError},
};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use crate::{
    cli::{
        config::LearnerArgs,
        output::{format_percent, print_section, print_stats_table},
    },
    grid_world::GridWorld,
    pipeline::{
        JsonlObserver, MetricsObserver, MetricsSummary, PolicySource, ProgressObserver,
        RenderObserver, TrainingConfig, TrainingPipeline, TrainingResult,
    },
    q_learning::QLearner,
    render::render_grid,
};

#[derive(Parser, Debug)]
#[command(about = "Train the agent automatically")]
pub struct TrainArgs {
    /// Stop when the episode counter reaches this value
    #[arg(long, short = 'e', default_value_t = 400)]
    pub episodes: usize,

    #[command(flatten)]
    pub learner: LearnerArgs,

    /// Draw the value grid after every move
    #[arg(long, default_value_t = false)]
    pub render: bool,

    /// Hide the progress bar
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,

    /// Optional file for JSONL episode records
    #[arg(long)]
    pub observations: Option<PathBuf>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Optional path for the error-ratio curve as CSV
    #[arg(long)]
    pub error_rates: Option<PathBuf>,
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let config = args.learner.resolve()?;
    let mut learner = QLearner::new(GridWorld::canonical(), config)?;
    let mut source = PolicySource::from_learner(&learner);

    let metrics = Arc::new(Mutex::new(MetricsObserver::new()));
    let mut pipeline = TrainingPipeline::new(TrainingConfig::automatic(args.episodes))
        .with_observer(Box::new(Arc::clone(&metrics)));
    if !args.no_progress && !args.render {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }
    if args.render {
        pipeline = pipeline.with_observer(Box::new(RenderObserver::stdout()));
    }
    if let Some(path) = &args.observations {
        pipeline = pipeline.with_observer(Box::new(JsonlObserver::new(path)?));
    }

    let result = pipeline
        .run(&mut learner, &mut source)
        .context("training aborted")?;

    let metrics = metrics
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .summary();

    print_section("Training Summary");
    print_stats_table(&summary_stats(&result, &metrics, learner.q_table().size()));
    println!();
    println!("{}", render_grid(&learner.snapshot()));

    if let Some(path) = &args.summary {
        result
            .save(path)
            .with_context(|| format!("failed to write summary {}", path.display()))?;
        info!(path = %path.display(), "summary written");
    }
    if let Some(path) = &args.error_rates {
        result
            .save_error_rates(path)
            .with_context(|| format!("failed to write error rates {}", path.display()))?;
        info!(path = %path.display(), samples = result.error_rates.len(), "error rates written");
    }

    Ok(())
}

fn summary_stats(
    result: &TrainingResult,
    metrics: &MetricsSummary,
    states_visited: usize,
) -> Vec<(&'static str, String)> {
    vec![
        ("Episodes", result.episodes_completed.to_string()),
        ("Successes", result.successes.to_string()),
        ("Failures", result.failures.to_string()),
        ("Moves", result.total_moves.to_string()),
        ("Error rate", format_percent(result.final_error_rate)),
        ("Success rate", format_percent(metrics.success_rate)),
        ("Avg episode length", format!("{:.2}", metrics.avg_episode_length)),
        (
            "Shortest episode",
            metrics
                .shortest_episode
                .map_or_else(|| "-".to_string(), |moves| moves.to_string()),
        ),
        ("Stationary moves", metrics.stationary_moves.to_string()),
        ("States visited", states_visited.to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_train_writes_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let summary = dir.path().join("summary.json");
        let error_rates = dir.path().join("rates.csv");

        let args = TrainArgs {
            episodes: 20,
            learner: LearnerArgs {
                seed: Some(5),
                ..LearnerArgs::default()
            },
            render: false,
            no_progress: true,
            observations: None,
            summary: Some(summary.clone()),
            error_rates: Some(error_rates.clone()),
        };
        execute(args).unwrap();

        let result = crate::pipeline::TrainingResult::load(&summary).unwrap();
        assert_eq!(result.final_episode, 20);
        assert_eq!(result.error_rates.len(), 4);

        let csv = std::fs::read_to_string(&error_rates).unwrap();
        assert_eq!(csv.lines().count(), 5);
        assert_eq!(csv.lines().next().unwrap(), "episode,error_rate");
    }

    #[test]
    fn test_summary_includes_shared_metrics() {
        let mut learner = QLearner::new(
            GridWorld::canonical(),
            crate::q_learning::LearnerConfig::default().with_seed(12),
        )
        .unwrap();
        let mut source = PolicySource::from_learner(&learner);
        let metrics = Arc::new(Mutex::new(MetricsObserver::new()));
        let result = TrainingPipeline::new(TrainingConfig::automatic(30))
            .with_observer(Box::new(Arc::clone(&metrics)))
            .run(&mut learner, &mut source)
            .unwrap();

        let summary = metrics.lock().unwrap().summary();
        assert_eq!(summary.episodes, result.episodes_completed);
        assert_eq!(summary.successes, result.successes);
        assert!(summary.shortest_episode.unwrap() >= 4);

        let stats = summary_stats(&result, &summary, learner.q_table().size());
        let value = |key: &str| {
            stats
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| value.clone())
                .unwrap()
        };
        assert_eq!(value("Episodes"), "29");
        assert_eq!(value("Avg episode length"), format!("{:.2}", summary.avg_episode_length));
        assert_eq!(value("Stationary moves"), summary.stationary_moves.to_string());
    }
}
