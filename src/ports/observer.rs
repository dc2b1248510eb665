//! Observer port - callbacks fired by the training loop
//!
//! Observers see every step and every finished episode. They read the
//! learner but never drive it.

use std::sync::{Arc, Mutex, PoisonError};

use crate::{
    Result,
    pipeline::TrainingResult,
    q_learning::{EpisodeEnd, QLearner, StepOutcome},
};

/// Observer trait for monitoring training
///
/// Observers can be composed to collect different types of data during training.
/// Examples include:
/// - Progress bars for user feedback
/// - Rendering of the value table after every move
/// - JSONL export of finished episodes
///
/// # Event Sequence
///
/// 1. `on_training_start(target_episodes)` - Once at the beginning
/// 2. For each step:
///    - `on_step(...)` - After the transition and value update
///    - `on_episode_end(...)` - If the step reached a terminal cell
/// 3. `on_training_end(result)` - Once at the end, unless a step failed
///
/// By the time `on_step` runs for a terminal step, the learner has already
/// been reset into the next episode.
///
/// # Examples
///
/// ```no_run
/// use gridq::{ports::Observer, q_learning::{EpisodeEnd, QLearner}};
///
/// struct EpisodeCounter {
///     finished: usize,
/// }
///
/// impl Observer for EpisodeCounter {
///     fn on_episode_end(&mut self, _learner: &QLearner, _end: &EpisodeEnd) -> gridq::Result<()> {
///         self.finished += 1;
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called when training starts.
    ///
    /// `target_episodes` is `None` when the run only ends on an abort.
    fn on_training_start(&mut self, _target_episodes: Option<usize>) -> Result<()> {
        Ok(())
    }

    /// Called after every step.
    fn on_step(&mut self, _learner: &QLearner, _step: &StepOutcome) -> Result<()> {
        Ok(())
    }

    /// Called when a step finished an episode.
    fn on_episode_end(&mut self, _learner: &QLearner, _end: &EpisodeEnd) -> Result<()> {
        Ok(())
    }

    /// Called when training completes or is aborted.
    fn on_training_end(&mut self, _result: &TrainingResult) -> Result<()> {
        Ok(())
    }
}

/// Shared observer, so the caller can read it back after the run
impl<O: Observer> Observer for Arc<Mutex<O>> {
    fn on_training_start(&mut self, target_episodes: Option<usize>) -> Result<()> {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .on_training_start(target_episodes)
    }

    fn on_step(&mut self, learner: &QLearner, step: &StepOutcome) -> Result<()> {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .on_step(learner, step)
    }

    fn on_episode_end(&mut self, learner: &QLearner, end: &EpisodeEnd) -> Result<()> {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .on_episode_end(learner, end)
    }

    fn on_training_end(&mut self, result: &TrainingResult) -> Result<()> {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .on_training_end(result)
    }
}
