//! Text rendering of a learner snapshot
//!
//! Each room shows its four action values around a marker: up on top, left
//! and right in the middle, down at the bottom. `*` marks the agent and `+`
//! the cell it just left.

use crate::{
    grid_world::{Action, CellType, Position},
    q_learning::LearnerSnapshot,
};

const CELL_WIDTH: usize = 13;

/// Draw the grid, top row first, under an episode header line
pub fn render_grid(snapshot: &LearnerSnapshot) -> String {
    let width = snapshot.width();
    let separator = format!("+{}", format!("{}+", "-".repeat(CELL_WIDTH)).repeat(width));

    let mut lines = vec![
        format!(
            "EPISODE: {}, MOVE: {}, ERROR RATE: {:.2}",
            snapshot.episode, snapshot.moves, snapshot.error_rate
        ),
        separator.clone(),
    ];

    for y in (0..snapshot.height()).rev() {
        let mut row = [String::from("|"), String::from("|"), String::from("|")];
        for x in 0..width {
            let [top, middle, bottom] = render_cell(snapshot, Position::new(x, y));
            row[0].push_str(&top);
            row[1].push_str(&middle);
            row[2].push_str(&bottom);
        }
        lines.extend(row);
        lines.push(separator.clone());
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn render_cell(snapshot: &LearnerSnapshot, position: Position) -> [String; 3] {
    let boxed = |label: &str| {
        [
            "+-----------+|".to_string(),
            format!("|{label}||"),
            "+-----------+|".to_string(),
        ]
    };

    match snapshot.cell(position) {
        Some(CellType::Wall) | None => {
            let wall = format!("{}|", "#".repeat(CELL_WIDTH));
            [wall.clone(), wall.clone(), wall]
        }
        Some(CellType::Success) => boxed("  Success  "),
        Some(CellType::Failure) => boxed("    Fail   "),
        Some(CellType::Room) => {
            let values = snapshot.values_at(position);
            let marker = if position == snapshot.current {
                '*'
            } else if Some(position) == snapshot.previous {
                '+'
            } else {
                ' '
            };
            [
                format!("    {:+.2}    |", values[Action::Up.index()]),
                format!(
                    "{:+.2} {marker} {:+.2}|",
                    values[Action::Left.index()],
                    values[Action::Right.index()]
                ),
                format!("    {:+.2}    |", values[Action::Down.index()]),
            ]
        }
    }
}
