//! Movement actions available to the agent

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// One of the four movement directions.
///
/// The discriminant is the action's column in the action-value table and the
/// tie-breaking order of greedy selection (lowest index wins).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
}

impl Action {
    /// Number of defined actions
    pub const COUNT: usize = 4;

    /// All actions in index order
    pub const ALL: [Action; Action::COUNT] =
        [Action::Up, Action::Down, Action::Left, Action::Right];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Action::Up => "up",
            Action::Down => "down",
            Action::Left => "left",
            Action::Right => "right",
        }
    }

    /// Column and row offset of a single move
    pub fn delta(self) -> (isize, isize) {
        match self {
            Action::Up => (0, 1),
            Action::Down => (0, -1),
            Action::Left => (-1, 0),
            Action::Right => (1, 0),
        }
    }
}

impl TryFrom<usize> for Action {
    type Error = Error;

    fn try_from(code: usize) -> Result<Self> {
        Action::ALL
            .get(code)
            .copied()
            .ok_or_else(|| Error::InvalidAction {
                action: code.to_string(),
            })
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(Action::Up),
            "down" => Ok(Action::Down),
            "left" => Ok(Action::Left),
            "right" => Ok(Action::Right),
            other => Err(Error::InvalidAction {
                action: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_order() {
        for (i, action) in Action::ALL.iter().enumerate() {
            assert_eq!(action.index(), i);
            assert_eq!(Action::try_from(i).unwrap(), *action);
        }
    }

    #[test]
    fn test_invalid_code() {
        let err = Action::try_from(4).unwrap_err();
        assert!(matches!(err, Error::InvalidAction { ref action } if action == "4"));
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("UP".parse::<Action>().unwrap(), Action::Up);
        assert_eq!(" left ".parse::<Action>().unwrap(), Action::Left);
        assert!("diagonal".parse::<Action>().is_err());
    }
}
