//! Observers shipped with the pipeline
//!
//! Progress display, episode metrics, per-step grid renders and a JSONL
//! episode log. Any number of them can be attached to one run.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use super::TrainingResult;
use crate::{
    Error, Result,
    ports::Observer,
    q_learning::{EpisodeEnd, EpisodeOutcome, QLearner, StepOutcome},
    render::render_grid,
};

fn template_error(err: impl std::fmt::Display) -> Error {
    Error::ProgressBarTemplate {
        message: err.to_string(),
    }
}

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    successes: usize,
    failures: usize,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            successes: 0,
            failures: 0,
        }
    }

    fn message(&self) -> String {
        format!("S:{} F:{}", self.successes, self.failures)
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, target_episodes: Option<usize>) -> Result<()> {
        let pb = match target_episodes {
            Some(total) => {
                let pb = ProgressBar::new(total as u64);
                pb.set_style(
                    ProgressStyle::default_bar()
                        .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes ({msg})")
                        .map_err(template_error)?
                        .progress_chars("=>-"),
                );
                pb
            }
            None => {
                let pb = ProgressBar::new_spinner();
                pb.set_style(
                    ProgressStyle::default_spinner()
                        .template("{spinner:.green} {pos} episodes ({msg})")
                        .map_err(template_error)?,
                );
                pb
            }
        };
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, learner: &QLearner, end: &EpisodeEnd) -> Result<()> {
        match end.outcome {
            EpisodeOutcome::Success => self.successes += 1,
            EpisodeOutcome::Failure => self.failures += 1,
        }

        if let Some(pb) = &self.progress_bar {
            pb.set_position(learner.episode() as u64);
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_training_end(&mut self, _result: &TrainingResult) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Metrics observer - Tracks training metrics
#[derive(Debug, Default)]
pub struct MetricsObserver {
    successes: usize,
    failures: usize,
    move_counts: Vec<usize>,
    stationary_moves: usize,
}

impl MetricsObserver {
    /// Create a new metrics observer
    pub fn new() -> Self {
        Self::default()
    }

    pub fn episodes(&self) -> usize {
        self.successes + self.failures
    }

    /// Share of observed episodes that ended on a success cell
    pub fn success_rate(&self) -> f64 {
        if self.episodes() == 0 {
            0.0
        } else {
            self.successes as f64 / self.episodes() as f64
        }
    }

    /// Get average episode length
    pub fn avg_episode_length(&self) -> f64 {
        if self.move_counts.is_empty() {
            0.0
        } else {
            self.move_counts.iter().sum::<usize>() as f64 / self.move_counts.len() as f64
        }
    }

    /// Get metrics summary
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            episodes: self.episodes(),
            successes: self.successes,
            failures: self.failures,
            success_rate: self.success_rate(),
            avg_episode_length: self.avg_episode_length(),
            shortest_episode: self.move_counts.iter().copied().min(),
            stationary_moves: self.stationary_moves,
        }
    }
}

/// Summary of training metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub episodes: usize,
    pub successes: usize,
    pub failures: usize,
    pub success_rate: f64,
    pub avg_episode_length: f64,
    pub shortest_episode: Option<usize>,
    /// Moves that left the agent where it was (walls and edges)
    pub stationary_moves: usize,
}

impl Observer for MetricsObserver {
    fn on_step(&mut self, _learner: &QLearner, step: &StepOutcome) -> Result<()> {
        if step.from == step.to {
            self.stationary_moves += 1;
        }
        Ok(())
    }

    fn on_episode_end(&mut self, _learner: &QLearner, end: &EpisodeEnd) -> Result<()> {
        match end.outcome {
            EpisodeOutcome::Success => self.successes += 1,
            EpisodeOutcome::Failure => self.failures += 1,
        }
        self.move_counts.push(end.moves);
        Ok(())
    }
}

/// Render observer - Draws the value grid after every step
pub struct RenderObserver<W> {
    writer: W,
}

impl<W: Write + Send> RenderObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn draw(&mut self, learner: &QLearner) -> Result<()> {
        writeln!(self.writer, "{}", render_grid(&learner.snapshot())).map_err(|source| {
            Error::Io {
                operation: "render grid".to_string(),
                source,
            }
        })
    }
}

impl RenderObserver<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> Observer for RenderObserver<W> {
    fn on_step(&mut self, learner: &QLearner, step: &StepOutcome) -> Result<()> {
        writeln!(
            self.writer,
            "Action: {} ({} -> {}, reward {:+.2})",
            step.action, step.from, step.to, step.reward
        )?;
        self.draw(learner)
    }

    fn on_training_end(&mut self, _result: &TrainingResult) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// One finished episode as written by [`JsonlObserver`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeRecord {
    pub episode: usize,
    pub outcome: EpisodeOutcome,
    pub moves: usize,
    pub reward: f64,
    /// Cumulative error ratio after the episode
    pub error_rate: f64,
}

/// JSONL observer - Writes one line per finished episode
pub struct JsonlObserver {
    writer: BufWriter<File>,
}

impl JsonlObserver {
    /// Create a new JSONL observer
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create {}", path.display()),
            source,
        })?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }
}

impl Observer for JsonlObserver {
    fn on_episode_end(&mut self, learner: &QLearner, end: &EpisodeEnd) -> Result<()> {
        let record = EpisodeRecord {
            episode: end.episode,
            outcome: end.outcome,
            moves: end.moves,
            reward: end.reward,
            error_rate: learner.errors() as f64 / end.episode as f64,
        };
        serde_json::to_writer(&mut self.writer, &record)?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn on_training_end(&mut self, _result: &TrainingResult) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
