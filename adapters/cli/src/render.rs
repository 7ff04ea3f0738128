use std::fmt::Write as _;

use snake_duel_core::{CellCoord, RoundSnapshot, SnakeId};

const EMPTY: char = '.';
const BARRIER: char = '#';
const FOOD: char = '*';

fn head_glyph(id: SnakeId) -> char {
    match id {
        SnakeId::One => '1',
        SnakeId::Two => '2',
    }
}

fn body_glyph(id: SnakeId) -> char {
    match id {
        SnakeId::One => 'o',
        SnakeId::Two => 'x',
    }
}

/// Draws the snapshot as one text row per grid row followed by a status line.
///
/// Later layers overwrite earlier ones: barrier, then food, then snake bodies
/// and finally heads.
pub(crate) fn render_text(snapshot: &RoundSnapshot) -> String {
    let columns = snapshot.grid.columns() as usize;
    let rows = snapshot.grid.rows() as usize;
    let mut cells = vec![EMPTY; columns * rows];
    let mut paint = |cell: CellCoord, glyph: char| {
        let (column, row) = (cell.column() as usize, cell.row() as usize);
        if column < columns && row < rows {
            cells[row * columns + column] = glyph;
        }
    };

    for &cell in &snapshot.barrier {
        paint(cell, BARRIER);
    }
    for food in &snapshot.food {
        paint(food.cell, FOOD);
    }
    for snake in &snapshot.snakes {
        for &cell in snake.segments.iter().skip(1) {
            paint(cell, body_glyph(snake.id));
        }
    }
    for snake in &snapshot.snakes {
        if let Some(head) = snake.head() {
            paint(head, head_glyph(snake.id));
        }
    }

    let mut out = String::with_capacity((columns + 1) * rows + 64);
    for row in cells.chunks(columns.max(1)) {
        out.extend(row.iter());
        out.push('\n');
    }

    let status = if snapshot.terminal {
        "round over"
    } else {
        "in progress"
    };
    let _ = write!(out, "{status}:");
    for snake in &snapshot.snakes {
        let _ = write!(
            out,
            " snake {} length {}{}",
            snake.id.number(),
            snake.segments.len(),
            if snake.alive { "" } else { " (dead)" }
        );
    }
    out.push('\n');
    out
}
