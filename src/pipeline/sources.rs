//! Action sources: the learner's own policy and manual input

use std::{fmt, io::BufRead, str::FromStr};

use tracing::warn;

use crate::{
    Error, Result,
    grid_world::Action,
    ports::{ActionSource, Directive},
    q_learning::QLearner,
};

/// Automatic training: ε-greedy selection from the learner's table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolicySource {
    exploration_rate: f64,
}

impl PolicySource {
    pub fn new(exploration_rate: f64) -> Self {
        Self { exploration_rate }
    }

    /// Use the exploration rate from the learner's configuration
    pub fn from_learner(learner: &QLearner) -> Self {
        Self::new(learner.config().exploration_rate)
    }
}

impl ActionSource for PolicySource {
    fn next_action(&mut self, learner: &mut QLearner) -> Result<Directive> {
        let state = learner.current_state();
        Ok(Directive::Act(
            learner.select_action(state, self.exploration_rate),
        ))
    }

    fn name(&self) -> &str {
        "policy"
    }
}

/// A single token of manual input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManualInput {
    Move(Action),
    Abort,
}

impl FromStr for ManualInput {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let token = s.trim().to_ascii_lowercase();
        match token.as_str() {
            "" | "q" | "quit" | "abort" | "exit" => Ok(ManualInput::Abort),
            "w" | "k" => Ok(ManualInput::Move(Action::Up)),
            "s" | "j" => Ok(ManualInput::Move(Action::Down)),
            "a" | "h" => Ok(ManualInput::Move(Action::Left)),
            "d" | "l" => Ok(ManualInput::Move(Action::Right)),
            other => other
                .parse::<Action>()
                .map(ManualInput::Move)
                .map_err(|_| Error::ParseManualInput {
                    input: s.trim().to_string(),
                }),
        }
    }
}

impl fmt::Display for ManualInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManualInput::Move(action) => write!(f, "{action}"),
            ManualInput::Abort => f.write_str("abort"),
        }
    }
}

/// Manual play: one token per line from a reader.
///
/// Unrecognised lines are reported and skipped without touching the learner.
/// An empty line, an abort token or the end of input stops the run.
pub struct ManualSource<R> {
    reader: R,
    rejected: usize,
}

impl<R: BufRead + Send> ManualSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            rejected: 0,
        }
    }

    /// Lines that could not be parsed so far
    pub fn rejected(&self) -> usize {
        self.rejected
    }
}

impl<R: BufRead + Send> ActionSource for ManualSource<R> {
    fn next_action(&mut self, _learner: &mut QLearner) -> Result<Directive> {
        let mut line = String::new();
        loop {
            line.clear();
            let read = self.reader.read_line(&mut line).map_err(|source| Error::Io {
                operation: "read manual input".to_string(),
                source,
            })?;
            if read == 0 {
                return Ok(Directive::Abort);
            }

            match line.parse::<ManualInput>() {
                Ok(ManualInput::Move(action)) => return Ok(Directive::Act(action)),
                Ok(ManualInput::Abort) => return Ok(Directive::Abort),
                Err(err) => {
                    self.rejected += 1;
                    warn!("{err}");
                }
            }
        }
    }

    fn name(&self) -> &str {
        "manual"
    }
}
