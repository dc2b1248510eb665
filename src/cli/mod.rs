//! CLI infrastructure for the gridq binary
//!
//! Automatic training and manual play are separate subcommands; both build a
//! learner from the shared hyper-parameter flags.

pub mod commands;
pub mod config;
pub mod output;
