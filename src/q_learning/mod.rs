//! Tabular Q-learning
//!
//! The learner keeps one row of four action values per visited state and
//! improves them with the off-policy temporal-difference rule
//!
//! ```text
//! Q(s,a) ← Q(s,a) + α [r + γ max_a' Q(s',a') − Q(s,a)]
//! ```
//!
//! while acting ε-greedily in a [`GridWorld`](crate::grid_world::GridWorld).
//!
//! ## Usage Example
//!
//! ```no_run
//! use gridq::{grid_world::GridWorld, q_learning::{LearnerConfig, QLearner}};
//!
//! let config = LearnerConfig::default().with_seed(7);
//! let mut learner = QLearner::new(GridWorld::canonical(), config)?;
//! while learner.episode() < 400 {
//!     learner.run_step(learner.config().exploration_rate)?;
//! }
//! println!("error rate: {:.2}", learner.error_rate());
//! # Ok::<(), gridq::Error>(())
//! ```

pub mod agent;
pub mod config;
pub mod q_table;
pub mod snapshot;

// Public re-exports
pub use agent::{ERROR_SAMPLE_INTERVAL, EpisodeEnd, EpisodeOutcome, QLearner, StepOutcome};
pub use config::LearnerConfig;
pub use q_table::{ActionValues, QTable};
pub use snapshot::{LearnerSnapshot, StateRow};
