//! Q-table implementation for temporal difference learning

use std::collections::HashMap;

use crate::grid_world::{Action, StateId};

/// One value per action, indexed by [`Action::index`]
pub type ActionValues = [f64; Action::COUNT];

/// Q-table mapping states to their action values
///
/// Rows are allocated the first time a state is written; reads of an unseen
/// state return an all-zero row.
#[derive(Debug, Clone, Default)]
pub struct QTable {
    rows: HashMap<StateId, ActionValues>,
}

impl QTable {
    /// Create an empty Q-table
    pub fn new() -> Self {
        Self::default()
    }

    /// Action values of a state
    pub fn row(&self, state: StateId) -> ActionValues {
        self.rows
            .get(&state)
            .copied()
            .unwrap_or([0.0; Action::COUNT])
    }

    /// Get Q-value for a state-action pair
    pub fn get(&self, state: StateId, action: Action) -> f64 {
        self.rows
            .get(&state)
            .map_or(0.0, |row| row[action.index()])
    }

    /// Set Q-value for a state-action pair
    pub fn set(&mut self, state: StateId, action: Action, value: f64) {
        self.row_mut(state)[action.index()] = value;
    }

    /// Mutable row, allocated as zeros on first access
    pub fn row_mut(&mut self, state: StateId) -> &mut ActionValues {
        self.rows.entry(state).or_insert([0.0; Action::COUNT])
    }

    /// Maximum Q-value over all actions in a state
    pub fn max_q(&self, state: StateId) -> f64 {
        self.row(state).into_iter().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Greedy action; on ties the lowest action index wins
    pub fn greedy_action(&self, state: StateId) -> Action {
        let row = self.row(state);
        let mut best = Action::ALL[0];
        for action in &Action::ALL[1..] {
            if row[action.index()] > row[best.index()] {
                best = *action;
            }
        }
        best
    }

    /// Q-learning update: off-policy TD control
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
    ///
    /// The next state's row is allocated if this is its first visit. Returns
    /// the new value of `Q(s,a)`.
    pub fn q_learning_update(
        &mut self,
        state: StateId,
        action: Action,
        reward: f64,
        next_state: StateId,
        learning_rate: f64,
        discount_factor: f64,
    ) -> f64 {
        let current_q = self.get(state, action);
        self.row_mut(next_state);
        let max_next_q = self.max_q(next_state);
        let td_target = reward + discount_factor * max_next_q;
        let td_error = td_target - current_q;
        let new_q = current_q + learning_rate * td_error;
        self.set(state, action, new_q);
        new_q
    }

    /// Visited states and their rows, ordered by state
    pub fn iter(&self) -> impl Iterator<Item = (StateId, &ActionValues)> {
        let mut states: Vec<_> = self.rows.keys().copied().collect();
        states.sort_unstable();
        states.into_iter().map(|state| (state, &self.rows[&state]))
    }

    /// Get total number of rows stored
    pub fn size(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
