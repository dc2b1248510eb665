//! Read-only view of a learner for renderers and exporters

use serde::{Deserialize, Serialize};

use super::ActionValues;
use crate::grid_world::{Action, CellType, Position};

/// Action values of one visited state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateRow {
    pub position: Position,
    pub values: ActionValues,
}

/// Everything a renderer needs to draw the learner's progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnerSnapshot {
    pub episode: usize,
    pub moves: usize,
    /// Failures divided by episodes so far
    pub error_rate: f64,
    /// Visited states ordered by state identifier
    pub rows: Vec<StateRow>,
    pub current: Position,
    pub previous: Option<Position>,
    /// `cells[y][x]`, bottom row first
    pub cells: Vec<Vec<CellType>>,
}

impl LearnerSnapshot {
    pub fn width(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    pub fn height(&self) -> usize {
        self.cells.len()
    }

    /// Values recorded for a position; zeros for states never visited
    pub fn values_at(&self, position: Position) -> ActionValues {
        self.rows
            .iter()
            .find(|row| row.position == position)
            .map_or([0.0; Action::COUNT], |row| row.values)
    }

    pub fn cell(&self, position: Position) -> Option<CellType> {
        self.cells
            .get(position.y)
            .and_then(|row| row.get(position.x))
            .copied()
    }
}
