//! Tabular Q-learning on a deterministic grid world
//!
//! This crate provides:
//! - A grid-world environment with walls, terminal cells and a fixed
//!   transition cost
//! - A Q-learning agent with ε-greedy exploration and error-rate tracking
//! - A training pipeline with pluggable action sources and observers
//! - Text rendering of the learned action values

pub mod cli;
pub mod error;
pub mod grid_world;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod render;

pub use error::{Error, Result};
pub use grid_world::{Action, CellType, GridWorld, Position};
pub use q_learning::{LearnerConfig, QLearner};
