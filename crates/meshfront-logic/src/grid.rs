//! Discrete cell coordinates for the territory grid.
//!
//! Cells are addressed by `(col, row)` and stored densely at
//! `row * cols + col`. All math here is pure; bounds live with the grid
//! that owns the cells.

use serde::{Deserialize, Serialize};

/// A cell coordinate on the territory grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub col: i32,
    pub row: i32,
}

impl GridPos {
    pub fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// Manhattan distance to another cell.
    pub fn manhattan(&self, other: GridPos) -> i32 {
        (self.col - other.col).abs() + (self.row - other.row).abs()
    }

    /// The four cross-adjacent neighbors, unchecked against any bounds.
    pub fn cross_neighbors(&self) -> [GridPos; 4] {
        [
            GridPos::new(self.col + 1, self.row),
            GridPos::new(self.col - 1, self.row),
            GridPos::new(self.col, self.row + 1),
            GridPos::new(self.col, self.row - 1),
        ]
    }
}

/// True when `pos` lies inside a `cols` x `rows` grid.
pub fn in_bounds(pos: GridPos, cols: i32, rows: i32) -> bool {
    pos.col >= 0 && pos.col < cols && pos.row >= 0 && pos.row < rows
}

/// Dense index of `pos` in a `cols`-wide grid. Caller checks bounds first.
pub fn dense_index(pos: GridPos, cols: i32) -> usize {
    (pos.row * cols + pos.col) as usize
}

/// Map a continuous point to the cell containing it, or `None` when the
/// point falls outside the grid. `cell_px` is the cell edge length.
pub fn cell_at_point(x: f32, y: f32, cell_px: f32, cols: i32, rows: i32) -> Option<GridPos> {
    if !x.is_finite() || !y.is_finite() {
        return None;
    }
    let pos = GridPos::new((x / cell_px).floor() as i32, (y / cell_px).floor() as i32);
    in_bounds(pos, cols, rows).then_some(pos)
}
