//! Training pipeline driving a learner with an action source

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    Result,
    ports::{ActionSource, Directive, Observer},
    q_learning::{ERROR_SAMPLE_INTERVAL, EpisodeOutcome, QLearner},
};

/// Training configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Stop once the learner's episode index reaches this value.
    ///
    /// `None` keeps going until the action source aborts.
    pub episodes: Option<usize>,
}

impl TrainingConfig {
    /// Run until the episode index reaches `episodes`
    pub fn automatic(episodes: usize) -> Self {
        Self {
            episodes: Some(episodes),
        }
    }

    /// Run until the action source aborts
    pub fn until_abort() -> Self {
        Self { episodes: None }
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self::automatic(400)
    }
}

/// Result of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Episodes that reached a terminal cell during this run
    pub episodes_completed: usize,

    /// Episodes that ended on a success cell
    pub successes: usize,

    /// Episodes that ended on a failure cell
    pub failures: usize,

    /// Moves made during this run, including an unfinished episode
    pub total_moves: usize,

    /// Learner's episode index when the run stopped
    pub final_episode: usize,

    /// Learner's cumulative error ratio when the run stopped
    pub final_error_rate: f64,

    /// Error ratios sampled every five episodes
    pub error_rates: Vec<f64>,

    /// Whether the action source aborted the run
    pub aborted: bool,
}

#[derive(Serialize)]
struct ErrorRateRecord {
    episode: usize,
    error_rate: f64,
}

impl TrainingResult {
    /// Save result to JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }

    /// Write the error-ratio curve as `episode,error_rate` CSV rows.
    ///
    /// The n-th sample (0-based) was taken when episode `5 * (n + 1)` began.
    pub fn save_error_rates<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        for (idx, &error_rate) in self.error_rates.iter().enumerate() {
            writer.serialize(ErrorRateRecord {
                episode: (idx + 1) * ERROR_SAMPLE_INTERVAL,
                error_rate,
            })?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Training pipeline for a single learner
pub struct TrainingPipeline {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl TrainingPipeline {
    /// Create a new training pipeline
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Drive `learner` with directives from `source`.
    ///
    /// Stops when the learner's episode index reaches the configured target
    /// or when the source aborts. An abort leaves the running episode as it
    /// is. Any step error ends the run and is returned unchanged.
    pub fn run(
        &mut self,
        learner: &mut QLearner,
        source: &mut dyn ActionSource,
    ) -> Result<TrainingResult> {
        info!(
            source = source.name(),
            target = ?self.config.episodes,
            episode = learner.episode(),
            "training started"
        );
        for observer in &mut self.observers {
            observer.on_training_start(self.config.episodes)?;
        }

        let mut successes = 0;
        let mut failures = 0;
        let mut total_moves = 0;
        let mut aborted = false;

        loop {
            if self
                .config
                .episodes
                .is_some_and(|target| learner.episode() >= target)
            {
                break;
            }

            let action = match source.next_action(learner)? {
                Directive::Act(action) => action,
                Directive::Abort => {
                    info!(episode = learner.episode(), "training aborted");
                    aborted = true;
                    break;
                }
            };

            let step = learner.apply_action(action)?;
            total_moves += 1;

            for observer in &mut self.observers {
                observer.on_step(learner, &step)?;
            }

            if let Some(end) = &step.episode_end {
                match end.outcome {
                    EpisodeOutcome::Success => successes += 1,
                    EpisodeOutcome::Failure => failures += 1,
                }
                for observer in &mut self.observers {
                    observer.on_episode_end(learner, end)?;
                }
            }
        }

        let result = TrainingResult {
            episodes_completed: successes + failures,
            successes,
            failures,
            total_moves,
            final_episode: learner.episode(),
            final_error_rate: learner.error_rate(),
            error_rates: learner.error_rates().to_vec(),
            aborted,
        };

        for observer in &mut self.observers {
            observer.on_training_end(&result)?;
        }
        info!(
            episodes = result.episodes_completed,
            successes = result.successes,
            failures = result.failures,
            error_rate = result.final_error_rate,
            "training finished"
        );

        Ok(result)
    }
}
