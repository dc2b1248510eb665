//! Shared configuration flags for CLI commands

use std::{fs::File, path::PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use crate::q_learning::LearnerConfig;

/// Hyper-parameter flags accepted by every command
#[derive(Args, Debug, Clone, Default)]
pub struct LearnerArgs {
    /// JSON file with learner settings; flags below override its fields
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Learning rate α
    #[arg(long)]
    pub learning_rate: Option<f64>,

    /// Discount factor γ
    #[arg(long)]
    pub discount_factor: Option<f64>,

    /// Probability of taking a random action
    #[arg(long)]
    pub exploration_rate: Option<f64>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,
}

impl LearnerArgs {
    /// Resolve defaults, then the config file, then individual flags
    pub fn resolve(&self) -> Result<LearnerConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let file = File::open(path)
                    .with_context(|| format!("failed to open config {}", path.display()))?;
                serde_json::from_reader(file)
                    .with_context(|| format!("failed to parse config {}", path.display()))?
            }
            None => LearnerConfig::default(),
        };

        if let Some(learning_rate) = self.learning_rate {
            config = config.with_learning_rate(learning_rate);
        }
        if let Some(discount_factor) = self.discount_factor {
            config = config.with_discount_factor(discount_factor);
        }
        if let Some(exploration_rate) = self.exploration_rate {
            config = config.with_exploration_rate(exploration_rate);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }

        config.validate()?;
        Ok(config)
    }
}
