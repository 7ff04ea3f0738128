use std::ops::Range;

use snake_duel_core::{CellCoord, FoodRegion, GridDimensions};

/// Static pair of vertical barrier lines laid out at round start.
///
/// Each line sits `offset` columns in from its edge. Offsets are clamped into
/// the grid; when the clamped left line is not strictly left of the right
/// line the layout degenerates to no barrier at all. The clamped lines still
/// delimit the two food regions in that case.
#[derive(Clone, Debug)]
pub(crate) struct BarrierLayout {
    left_line: u32,
    right_line: u32,
    columns: u32,
    rows: u32,
    cells: Vec<CellCoord>,
}

impl BarrierLayout {
    pub(crate) fn build(grid: GridDimensions, offset: u32) -> Self {
        let last_column = i64::from(grid.columns()) - 1;
        let left_line = clamp_line(i64::from(offset), last_column);
        let right_line = clamp_line(last_column - i64::from(offset), last_column);

        let mut cells = Vec::new();
        if left_line < right_line {
            cells.reserve(grid.rows() as usize * 2);
            for column in [left_line, right_line] {
                cells.extend((0..grid.rows()).map(|row| CellCoord::new(column, row)));
            }
        }

        Self {
            left_line,
            right_line,
            columns: grid.columns(),
            rows: grid.rows(),
            cells,
        }
    }

    pub(crate) fn contains(&self, cell: CellCoord) -> bool {
        !self.cells.is_empty()
            && cell.row() < self.rows
            && (cell.column() == self.left_line || cell.column() == self.right_line)
    }

    pub(crate) fn cells(&self) -> &[CellCoord] {
        &self.cells
    }

    /// Half-open column range in which the region's food may spawn.
    pub(crate) fn region_columns(&self, region: FoodRegion) -> Range<u32> {
        match region {
            FoodRegion::Left => 0..self.left_line,
            FoodRegion::Right => self.right_line.saturating_add(1).min(self.columns)..self.columns,
        }
    }
}

fn clamp_line(value: i64, last_column: i64) -> u32 {
    u32::try_from(value.clamp(0, last_column.max(0))).unwrap_or(0)
}
