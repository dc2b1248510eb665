//! Action source port - where the next action of the training loop comes from
//!
//! Automatic training asks the learner's own exploration policy; manual play
//! asks a person. Both are adapters of this port, picked by the caller.

use crate::{Result, grid_world::Action, q_learning::QLearner};

/// What the training loop should do next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    /// Apply this action to the learner
    Act(Action),
    /// Stop the training loop immediately, without finishing the episode
    Abort,
}

/// Supplies one directive per training step.
///
/// # Examples
///
/// ```no_run
/// use gridq::{
///     grid_world::Action,
///     ports::{ActionSource, Directive},
///     q_learning::QLearner,
/// };
///
/// struct AlwaysRight;
///
/// impl ActionSource for AlwaysRight {
///     fn next_action(&mut self, _learner: &mut QLearner) -> gridq::Result<Directive> {
///         Ok(Directive::Act(Action::Right))
///     }
///
///     fn name(&self) -> &str {
///         "always-right"
///     }
/// }
/// ```
pub trait ActionSource: Send {
    /// Choose the next directive for the learner's current state.
    ///
    /// The learner is passed mutably so policy-driven sources can draw from
    /// its random number generator.
    fn next_action(&mut self, learner: &mut QLearner) -> Result<Directive>;

    /// Source name used in logs
    fn name(&self) -> &str;
}
