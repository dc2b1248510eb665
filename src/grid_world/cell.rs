//! Cell types of the grid map

use serde::{Deserialize, Serialize};

/// What occupies a single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellType {
    /// Enterable, non-terminal
    Room,
    /// Cannot be entered
    Wall,
    /// Terminal cell with a positive reward
    Success,
    /// Terminal cell with a negative reward
    Failure,
}

impl CellType {
    pub fn is_terminal(self) -> bool {
        matches!(self, CellType::Success | CellType::Failure)
    }

    pub fn to_char(self) -> char {
        match self {
            CellType::Room => '.',
            CellType::Wall => '#',
            CellType::Success => 'S',
            CellType::Failure => 'F',
        }
    }

    pub fn from_char(c: char) -> Option<CellType> {
        match c {
            '.' | ' ' => Some(CellType::Room),
            '#' => Some(CellType::Wall),
            'S' | 's' => Some(CellType::Success),
            'F' | 'f' => Some(CellType::Failure),
            _ => None,
        }
    }
}
