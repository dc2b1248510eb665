//! Common test utilities for the gridq test suite.

#![allow(dead_code)]

use gridq::{
    grid_world::{GridWorld, GridWorldBuilder, Position},
    q_learning::{LearnerConfig, QLearner},
};

/// The reference map drawn top row first.
pub const CANONICAL_ROWS: [&str; 3] = ["...S", ".#.F", "...."];

/// Reference map with the agent starting at `start`.
pub fn canonical_from(start: Position) -> GridWorld {
    GridWorldBuilder::from_rows(&CANONICAL_ROWS)
        .unwrap()
        .with_start(start)
        .build()
        .unwrap()
}

/// Seeded learner on the reference map with default hyper-parameters.
pub fn seeded_learner(seed: u64) -> QLearner {
    QLearner::new(GridWorld::canonical(), LearnerConfig::default().with_seed(seed)).unwrap()
}
