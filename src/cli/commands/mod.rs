//! Subcommands of the gridq binary

pub mod play;
pub mod train;
