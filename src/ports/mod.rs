//! Ports (trait boundaries) between the learning loop and its collaborators.
//!
//! The training pipeline only talks to action sources and observers through
//! these traits; concrete adapters live in [`crate::pipeline`].

pub mod action_source;
pub mod observer;

pub use action_source::{ActionSource, Directive};
pub use observer::Observer;
