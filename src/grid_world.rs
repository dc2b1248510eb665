//! Deterministic grid-world environment

pub mod action;
pub mod cell;
pub mod position;
pub mod world;

pub use action::Action;
pub use cell::CellType;
pub use position::{Position, StateId};
pub use world::{DEFAULT_TRANSITION_COST, GridWorld, GridWorldBuilder};
