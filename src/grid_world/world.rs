//! Grid-world transition and reward model

use std::fmt;

use tracing::debug;

use super::{Action, CellType, Position, StateId};
use crate::{Error, Result};

/// Reward applied to every non-terminal transition, wall bounces included
pub const DEFAULT_TRANSITION_COST: f64 = -0.04;

/// A deterministic grid world with walls and terminal cells.
///
/// Cells and nominal rewards are fixed at construction. The only mutable
/// state is the current position and the position before the last move,
/// both changed exclusively through [`GridWorld::step`] and
/// [`GridWorld::reset`].
#[derive(Debug, Clone)]
pub struct GridWorld {
    width: usize,
    height: usize,
    /// Row-major cells, index `y * width + x`
    cells: Vec<CellType>,
    /// Nominal reward per cell; only read for terminal cells
    rewards: Vec<f64>,
    start: Position,
    transition_cost: f64,
    current: Position,
    previous: Option<Position>,
}

impl GridWorld {
    /// The reference 4x3 map.
    ///
    /// ```text
    /// y=2  .  .  .  S(+1)
    /// y=1  .  #  .  F(-1)
    /// y=0  .  .  .  .
    /// ```
    ///
    /// The agent starts at (0, 0) and pays [`DEFAULT_TRANSITION_COST`] per move.
    pub fn canonical() -> Self {
        use CellType::{Failure as F, Room as R, Success as S, Wall as W};

        let cells = vec![
            vec![R, R, R, R],
            vec![R, W, R, F],
            vec![R, R, R, S],
        ];
        let rewards = vec![
            vec![0.0, 0.0, 0.0, 0.0],
            vec![0.0, 0.0, 0.0, -1.0],
            vec![0.0, 0.0, 0.0, 1.0],
        ];

        Self::from_validated_parts(cells, rewards, Position::new(0, 0), DEFAULT_TRANSITION_COST)
    }

    /// Start building a custom map.
    ///
    /// `cells[y][x]` is the cell at `(x, y)`, with `y = 0` the bottom row.
    pub fn builder(cells: Vec<Vec<CellType>>) -> GridWorldBuilder {
        GridWorldBuilder::new(cells)
    }

    fn from_validated_parts(
        cells: Vec<Vec<CellType>>,
        rewards: Vec<Vec<f64>>,
        start: Position,
        transition_cost: f64,
    ) -> Self {
        let height = cells.len();
        let width = cells.first().map_or(0, Vec::len);
        Self {
            width,
            height,
            cells: cells.into_iter().flatten().collect(),
            rewards: rewards.into_iter().flatten().collect(),
            start,
            transition_cost,
            current: start,
            previous: None,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn transition_cost(&self) -> f64 {
        self.transition_cost
    }

    pub fn current_position(&self) -> Position {
        self.current
    }

    /// Position before the last move; `None` right after a reset
    pub fn previous_position(&self) -> Option<Position> {
        self.previous
    }

    pub fn current_state(&self) -> StateId {
        self.state_of(self.current)
    }

    pub fn previous_state(&self) -> Option<StateId> {
        self.previous.map(|pos| self.state_of(pos))
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x < self.width && position.y < self.height
    }

    /// State identifier for a position.
    ///
    /// The position must lie within the grid.
    pub fn state_of(&self, position: Position) -> StateId {
        debug_assert!(self.contains(position), "{position} is out of bounds");
        StateId::new(position.y * self.width + position.x)
    }

    /// Inverse of [`GridWorld::state_of`]
    pub fn position_of(&self, state: StateId) -> Option<Position> {
        let index = state.index();
        (index < self.cells.len()).then(|| Position::new(index % self.width, index / self.width))
    }

    /// Cell type at a position, `None` outside the grid
    pub fn cell(&self, position: Position) -> Option<CellType> {
        self.contains(position)
            .then(|| self.cells[position.y * self.width + position.x])
    }

    /// Nominal reward listed for a cell, `None` outside the grid
    pub fn reward_at(&self, position: Position) -> Option<f64> {
        self.contains(position)
            .then(|| self.rewards[position.y * self.width + position.x])
    }

    /// Cells as rows, `rows[y][x]`, bottom row first
    pub fn cells(&self) -> Vec<Vec<CellType>> {
        self.cells
            .chunks(self.width)
            .map(<[CellType]>::to_vec)
            .collect()
    }

    pub fn is_terminal(&self, position: Position) -> bool {
        self.cell(position).is_some_and(CellType::is_terminal)
    }

    /// Whether the current position ends the episode
    pub fn is_ended(&self) -> bool {
        self.is_terminal(self.current)
    }

    /// Move the agent one cell and return the new position and reward.
    ///
    /// Leaving the grid is a no-op on that axis. Walls bounce the agent back
    /// to where it was. Terminal cells pay their own reward; every other
    /// transition pays the transition cost regardless of the cell's nominal
    /// reward.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalState`] when called from a terminal position.
    pub fn step(&mut self, action: Action) -> Result<(Position, f64)> {
        if self.is_ended() {
            return Err(Error::IllegalState {
                position: self.current,
            });
        }

        let mut next = self.neighbour(self.current, action);
        let reward = match self.cells[next.y * self.width + next.x] {
            CellType::Success | CellType::Failure => self.rewards[next.y * self.width + next.x],
            CellType::Wall => {
                next = self.current;
                self.transition_cost
            }
            CellType::Room => self.transition_cost,
        };

        debug!(
            from = %self.current,
            to = %next,
            action = %action,
            reward,
            "grid transition"
        );

        self.previous = Some(self.current);
        self.current = next;
        Ok((next, reward))
    }

    /// Return the agent to the start cell and forget the previous position.
    pub fn reset(&mut self) -> Position {
        self.previous = None;
        self.current = self.start;
        self.current
    }

    fn neighbour(&self, position: Position, action: Action) -> Position {
        let (dx, dy) = action.delta();
        let shift = |value: usize, delta: isize, limit: usize| {
            value
                .checked_add_signed(delta)
                .filter(|&moved| moved < limit)
                .unwrap_or(value)
        };
        Position::new(
            shift(position.x, dx, self.width),
            shift(position.y, dy, self.height),
        )
    }
}

impl fmt::Display for GridWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (0..self.height).rev() {
            for x in 0..self.width {
                let position = Position::new(x, y);
                let c = if position == self.current {
                    '*'
                } else {
                    self.cells[y * self.width + x].to_char()
                };
                write!(f, "{c}")?;
            }
            if y > 0 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// Validating builder for custom grid maps
#[derive(Debug, Clone)]
pub struct GridWorldBuilder {
    cells: Vec<Vec<CellType>>,
    rewards: Option<Vec<Vec<f64>>>,
    start: Position,
    transition_cost: f64,
}

impl GridWorldBuilder {
    /// `cells[y][x]`, bottom row first.
    ///
    /// Defaults: start (0, 0), rewards +1.0 on success cells, -1.0 on failure
    /// cells and 0.0 elsewhere, [`DEFAULT_TRANSITION_COST`].
    pub fn new(cells: Vec<Vec<CellType>>) -> Self {
        Self {
            cells,
            rewards: None,
            start: Position::new(0, 0),
            transition_cost: DEFAULT_TRANSITION_COST,
        }
    }

    /// Parse a map drawn as text, top row first.
    ///
    /// `.` room, `#` wall, `S` success, `F` failure.
    pub fn from_rows(rows: &[&str]) -> Result<Self> {
        let mut cells = Vec::with_capacity(rows.len());
        for (row_idx, row) in rows.iter().rev().enumerate() {
            let parsed = row
                .chars()
                .enumerate()
                .map(|(x, c)| {
                    CellType::from_char(c).ok_or_else(|| Error::InvalidLayout {
                        message: format!("unknown cell character '{c}' at ({x}, {row_idx})"),
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            cells.push(parsed);
        }
        Ok(Self::new(cells))
    }

    pub fn with_rewards(mut self, rewards: Vec<Vec<f64>>) -> Self {
        self.rewards = Some(rewards);
        self
    }

    pub fn with_start(mut self, start: Position) -> Self {
        self.start = start;
        self
    }

    pub fn with_transition_cost(mut self, transition_cost: f64) -> Self {
        self.transition_cost = transition_cost;
        self
    }

    /// Validate the layout and build the world.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLayout`] for an empty or ragged grid, a reward
    /// grid of a different shape, non-finite rewards, or a start position that
    /// is out of bounds or not a room.
    pub fn build(self) -> Result<GridWorld> {
        let layout_error = |message: String| Error::InvalidLayout { message };

        let height = self.cells.len();
        let width = self.cells.first().map_or(0, Vec::len);
        if height == 0 || width == 0 {
            return Err(layout_error("grid must have at least one cell".into()));
        }
        if let Some(y) = self.cells.iter().position(|row| row.len() != width) {
            return Err(layout_error(format!(
                "row {y} has {} cells, expected {width}",
                self.cells[y].len()
            )));
        }

        let rewards = match self.rewards {
            Some(rewards) => {
                let same_shape =
                    rewards.len() == height && rewards.iter().all(|row| row.len() == width);
                if !same_shape {
                    return Err(layout_error(format!(
                        "reward grid must be {width}x{height} like the cell grid"
                    )));
                }
                rewards
            }
            None => self
                .cells
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|cell| match cell {
                            CellType::Success => 1.0,
                            CellType::Failure => -1.0,
                            CellType::Room | CellType::Wall => 0.0,
                        })
                        .collect()
                })
                .collect(),
        };
        if rewards.iter().flatten().any(|r| !r.is_finite()) {
            return Err(layout_error("rewards must be finite".into()));
        }
        if !self.transition_cost.is_finite() {
            return Err(layout_error(format!(
                "transition cost {} must be finite",
                self.transition_cost
            )));
        }

        let start = self.start;
        match self.cells.get(start.y).and_then(|row| row.get(start.x)) {
            Some(CellType::Room) => {}
            Some(other) => {
                return Err(layout_error(format!(
                    "start {start} must be a room, found {other:?}"
                )));
            }
            None => {
                return Err(layout_error(format!(
                    "start {start} is outside the {width}x{height} grid"
                )));
            }
        }

        Ok(GridWorld::from_validated_parts(
            self.cells,
            rewards,
            start,
            self.transition_cost,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_dimensions() {
        let world = GridWorld::canonical();
        assert_eq!(world.width(), 4);
        assert_eq!(world.height(), 3);
        assert_eq!(world.current_position(), Position::new(0, 0));
        assert_eq!(world.previous_position(), None);
        assert_eq!(world.cell(Position::new(1, 1)), Some(CellType::Wall));
        assert_eq!(world.cell(Position::new(3, 2)), Some(CellType::Success));
        assert_eq!(world.cell(Position::new(3, 1)), Some(CellType::Failure));
        assert_eq!(world.cell(Position::new(4, 0)), None);
    }

    #[test]
    fn test_state_mapping_is_bijective() {
        let world = GridWorld::canonical();
        for y in 0..world.height() {
            for x in 0..world.width() {
                let position = Position::new(x, y);
                let state = world.state_of(position);
                assert_eq!(state.index(), y * 4 + x);
                assert_eq!(world.position_of(state), Some(position));
            }
        }
        assert_eq!(world.position_of(StateId::new(12)), None);
    }

    #[test]
    fn test_display_marks_agent() {
        let world = GridWorld::canonical();
        assert_eq!(world.to_string(), "...S\n.#.F\n*...");
    }

    #[test]
    fn test_builder_from_rows_flips_vertically() {
        let world = GridWorldBuilder::from_rows(&["..S", "..F", "..."])
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(world.cell(Position::new(2, 2)), Some(CellType::Success));
        assert_eq!(world.cell(Position::new(2, 1)), Some(CellType::Failure));
        assert_eq!(world.reward_at(Position::new(2, 2)), Some(1.0));
        assert_eq!(world.reward_at(Position::new(2, 1)), Some(-1.0));
    }

    #[test]
    fn test_builder_rejects_bad_layouts() {
        assert!(GridWorldBuilder::from_rows(&["..x"]).is_err());
        assert!(GridWorld::builder(Vec::new()).build().is_err());

        let ragged = GridWorldBuilder::from_rows(&["...", ".."]).unwrap();
        assert!(matches!(ragged.build(), Err(Error::InvalidLayout { .. })));

        let walled_start = GridWorldBuilder::from_rows(&["..S", "#.."]).unwrap();
        assert!(walled_start.build().is_err());

        let outside = GridWorldBuilder::from_rows(&["..S"])
            .unwrap()
            .with_start(Position::new(5, 0));
        assert!(outside.build().is_err());

        let bad_rewards = GridWorldBuilder::from_rows(&["..S"])
            .unwrap()
            .with_rewards(vec![vec![0.0, 0.0]]);
        assert!(bad_rewards.build().is_err());

        let bad_cost = GridWorldBuilder::from_rows(&["..S"])
            .unwrap()
            .with_transition_cost(f64::NAN);
        assert!(bad_cost.build().is_err());
    }

    #[test]
    fn test_custom_transition_cost() {
        let mut world = GridWorldBuilder::from_rows(&["...S"])
            .unwrap()
            .with_transition_cost(-0.5)
            .build()
            .unwrap();
        let (position, reward) = world.step(Action::Right).unwrap();
        assert_eq!(position, Position::new(1, 0));
        assert_eq!(reward, -0.5);
    }
}
