//! Hyper-parameters for a Q-learning agent.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Configuration for creating a [`QLearner`](super::QLearner).
///
/// Builder-style so several learners with different hyper-parameters can
/// coexist in one process.
///
/// # Examples
///
/// ```
/// use gridq::q_learning::LearnerConfig;
///
/// let config = LearnerConfig::default()
///     .with_learning_rate(0.3)
///     .with_exploration_rate(0.2)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearnerConfig {
    /// Learning rate α
    pub learning_rate: f64,
    /// Discount factor γ
    pub discount_factor: f64,
    /// Probability ε of taking a random action
    pub exploration_rate: f64,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl LearnerConfig {
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_discount_factor(mut self, discount_factor: f64) -> Self {
        self.discount_factor = discount_factor;
        self
    }

    pub fn with_exploration_rate(mut self, exploration_rate: f64) -> Self {
        self.exploration_rate = exploration_rate;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check that every parameter is finite and in range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] naming the first offending
    /// parameter.
    pub fn validate(&self) -> Result<()> {
        check_range("learning rate", self.learning_rate, 0.0, 1.0, false)?;
        check_range("discount factor", self.discount_factor, 0.0, 1.0, true)?;
        check_range("exploration rate", self.exploration_rate, 0.0, 1.0, true)?;
        Ok(())
    }
}

impl Default for LearnerConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.5,
            discount_factor: 0.9,
            exploration_rate: 0.1,
            seed: None,
        }
    }
}

/// `[min, max]` when `include_min`, `(min, max]` otherwise
fn check_range(name: &str, value: f64, min: f64, max: f64, include_min: bool) -> Result<()> {
    let above_min = if include_min { value >= min } else { value > min };
    if value.is_finite() && above_min && value <= max {
        Ok(())
    } else {
        let open = if include_min { '[' } else { '(' };
        Err(Error::InvalidConfiguration {
            message: format!("{name} {value} must be in {open}{min}, {max}]"),
        })
    }
}
