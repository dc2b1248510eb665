//! Q-learning agent
//!
//! Owns the grid world it learns in, selects actions ε-greedily, backs up
//! action values after every transition and keeps the episode statistics
//! used to judge convergence.

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{LearnerConfig, LearnerSnapshot, QTable, StateRow};
use crate::{
    Error, Result,
    grid_world::{Action, CellType, GridWorld, Position, StateId},
};

/// Episodes between two samples of the error ratio
pub const ERROR_SAMPLE_INTERVAL: usize = 5;

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// How an episode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EpisodeOutcome {
    Success,
    Failure,
}

/// Bookkeeping for an episode that just finished
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeEnd {
    /// Index of the episode that finished
    pub episode: usize,
    pub outcome: EpisodeOutcome,
    /// Moves made during the episode
    pub moves: usize,
    /// Final reward of the episode
    pub reward: f64,
}

/// Result of one environment step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepOutcome {
    pub action: Action,
    pub from: Position,
    /// Position reached, before any episode reset
    pub to: Position,
    pub reward: f64,
    /// Value of `Q(from, action)` after the update
    pub new_value: f64,
    pub episode_end: Option<EpisodeEnd>,
}

/// Tabular Q-learning agent for a [`GridWorld`]
///
/// The episode index starts at 1 and grows by one on every reset. Every
/// [`ERROR_SAMPLE_INTERVAL`] episodes the running ratio of failed episodes is
/// appended to [`QLearner::error_rates`].
#[derive(Debug, Clone)]
pub struct QLearner {
    world: GridWorld,
    q_table: QTable,
    config: LearnerConfig,
    rng: StdRng,
    episode: usize,
    moves: usize,
    errors: usize,
    error_rates: Vec<f64>,
    last_action: Option<Action>,
}

impl QLearner {
    /// Create a learner that owns `world`.
    ///
    /// The world is reset to its start cell and the first episode begins.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `config` fails validation.
    pub fn new(mut world: GridWorld, config: LearnerConfig) -> Result<Self> {
        config.validate()?;
        world.reset();
        Ok(Self {
            world,
            q_table: QTable::new(),
            rng: build_rng(config.seed),
            config,
            episode: 1,
            moves: 0,
            errors: 0,
            error_rates: Vec::new(),
            last_action: None,
        })
    }

    pub fn config(&self) -> &LearnerConfig {
        &self.config
    }

    pub fn world(&self) -> &GridWorld {
        &self.world
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    /// Index of the running episode, starting at 1
    pub fn episode(&self) -> usize {
        self.episode
    }

    /// Moves made in the running episode
    pub fn moves(&self) -> usize {
        self.moves
    }

    /// Episodes that ended with a negative reward
    pub fn errors(&self) -> usize {
        self.errors
    }

    pub fn error_rate(&self) -> f64 {
        self.errors as f64 / self.episode as f64
    }

    /// Error ratios sampled every [`ERROR_SAMPLE_INTERVAL`] episodes
    pub fn error_rates(&self) -> &[f64] {
        &self.error_rates
    }

    pub fn last_action(&self) -> Option<Action> {
        self.last_action
    }

    pub fn current_state(&self) -> StateId {
        self.world.current_state()
    }

    /// ε-greedy action selection
    ///
    /// With probability `exploration_rate` picks uniformly among the four
    /// actions, otherwise the action with the highest value (lowest index on
    /// ties).
    pub fn select_action(&mut self, state: StateId, exploration_rate: f64) -> Action {
        if self.rng.random::<f64>() < exploration_rate {
            // Explore: random action
            let action = Action::ALL[self.rng.random_range(0..Action::COUNT)];
            debug!(%state, %action, "action chosen (random)");
            action
        } else {
            // Exploit: greedy action based on Q-values
            let action = self.q_table.greedy_action(state);
            debug!(%state, %action, "action chosen (best)");
            action
        }
    }

    /// Temporal-difference backup of `Q(previous_state, action)`.
    ///
    /// Returns the new value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Precondition`] when `previous_state` is `None`, i.e. no
    /// transition happened since the last reset.
    pub fn update(
        &mut self,
        previous_state: Option<StateId>,
        action: Action,
        reward: f64,
        current_state: StateId,
    ) -> Result<f64> {
        let previous_state = previous_state.ok_or_else(|| Error::Precondition {
            message: "no transition recorded since the last reset".to_string(),
        })?;

        let new_value = self.q_table.q_learning_update(
            previous_state,
            action,
            reward,
            current_state,
            self.config.learning_rate,
            self.config.discount_factor,
        );
        debug!(
            state = %previous_state,
            %action,
            reward,
            new_value,
            "action value updated"
        );
        Ok(new_value)
    }

    /// Apply an externally chosen action as one atomic step.
    ///
    /// Steps the world, backs up the value of the move and, when a terminal
    /// cell was reached, records the outcome and starts the next episode.
    pub fn apply_action(&mut self, action: Action) -> Result<StepOutcome> {
        let from = self.world.current_position();
        let (to, reward) = self.world.step(action)?;

        self.moves += 1;
        self.last_action = Some(action);
        let new_value = self.update(
            self.world.previous_state(),
            action,
            reward,
            self.world.current_state(),
        )?;

        let episode_end = match self.world.cell(to) {
            Some(cell @ (CellType::Success | CellType::Failure)) => {
                if reward < 0.0 {
                    self.errors += 1;
                }
                let end = EpisodeEnd {
                    episode: self.episode,
                    outcome: if cell == CellType::Success {
                        EpisodeOutcome::Success
                    } else {
                        EpisodeOutcome::Failure
                    },
                    moves: self.moves,
                    reward,
                };
                debug!(
                    episode = end.episode,
                    outcome = ?end.outcome,
                    moves = end.moves,
                    errors = self.errors,
                    "episode finished"
                );
                self.reset_episode();
                Some(end)
            }
            _ => None,
        };

        Ok(StepOutcome {
            action,
            from,
            to,
            reward,
            new_value,
            episode_end,
        })
    }

    /// Select an action for the current state, apply it and learn from it.
    ///
    /// Returns whether the step ended the episode.
    pub fn run_step(&mut self, exploration_rate: f64) -> Result<bool> {
        let action = self.select_action(self.current_state(), exploration_rate);
        let outcome = self.apply_action(action)?;
        Ok(outcome.episode_end.is_some())
    }

    /// Start a new episode from the world's start cell.
    ///
    /// Safe to call mid-episode; the running episode is truncated.
    pub fn reset_episode(&mut self) {
        self.world.reset();
        self.episode += 1;
        self.moves = 0;
        self.last_action = None;
        if self.episode.is_multiple_of(ERROR_SAMPLE_INTERVAL) {
            self.error_rates.push(self.error_rate());
        }
    }

    /// Capture the learner's state for rendering
    pub fn snapshot(&self) -> LearnerSnapshot {
        let rows = self
            .q_table
            .iter()
            .filter_map(|(state, values)| {
                self.world.position_of(state).map(|position| StateRow {
                    position,
                    values: *values,
                })
            })
            .collect();

        LearnerSnapshot {
            episode: self.episode,
            moves: self.moves,
            error_rate: self.error_rate(),
            rows,
            current: self.world.current_position(),
            previous: self.world.previous_position(),
            cells: self.world.cells(),
        }
    }
}
