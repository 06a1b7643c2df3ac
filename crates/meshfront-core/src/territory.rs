//! The discrete territory grid.
//!
//! A fixed `cols x rows` dense array of cells, separate from the free-form
//! node graph. The integrity pass in [`crate::connectivity`] is the only
//! writer of owner/signal/connected during updates; deployments reach
//! ownership exclusively through [`TerritoryGrid::capture`].

use log::{debug, info};
use serde::{Deserialize, Serialize};

use meshfront_logic::constants::{CELL_PIXELS, SIGNAL_MAX};
use meshfront_logic::grid::{self, GridPos};
use meshfront_logic::kinds::Faction;

/// One member of the territory grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerritoryCell {
    /// `None` is neutral ground.
    pub owner: Option<Faction>,
    /// Signal strength, 0..=100. Ownership persists while this is above 0.
    pub signal: f32,
    /// Faction home cell; flood fills start here.
    pub anchor: bool,
    /// Transient: recomputed by every integrity pass.
    pub connected: bool,
    pub fortified: bool,
    pub outpost: bool,
}

impl Default for TerritoryCell {
    fn default() -> Self {
        Self {
            owner: None,
            signal: 0.0,
            anchor: false,
            connected: false,
            fortified: false,
            outpost: false,
        }
    }
}

/// Dense `cols x rows` cell storage with the territory query surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerritoryGrid {
    cols: i32,
    rows: i32,
    cell_px: f32,
    cells: Vec<TerritoryCell>,
}

impl TerritoryGrid {
    pub fn new(cols: i32, rows: i32) -> Self {
        assert!(cols > 0 && rows > 0, "territory grid needs positive dimensions");
        Self {
            cols,
            rows,
            cell_px: CELL_PIXELS,
            cells: vec![TerritoryCell::default(); (cols * rows) as usize],
        }
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn cell_px(&self) -> f32 {
        self.cell_px
    }

    pub fn cell(&self, pos: GridPos) -> Option<&TerritoryCell> {
        if grid::in_bounds(pos, self.cols, self.rows) {
            Some(&self.cells[grid::dense_index(pos, self.cols)])
        } else {
            None
        }
    }

    pub fn cell_mut(&mut self, pos: GridPos) -> Option<&mut TerritoryCell> {
        if grid::in_bounds(pos, self.cols, self.rows) {
            Some(&mut self.cells[grid::dense_index(pos, self.cols)])
        } else {
            None
        }
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [TerritoryCell] {
        &mut self.cells
    }

    /// Mark a cell as a faction's home. Setup-time only.
    pub fn seed_anchor(&mut self, pos: GridPos, owner: Faction) -> bool {
        let Some(cell) = self.cell_mut(pos) else {
            return false;
        };
        cell.owner = Some(owner);
        cell.anchor = true;
        cell.signal = SIGNAL_MAX;
        debug!("anchor cell seeded for {owner:?} at ({}, {})", pos.col, pos.row);
        true
    }

    /// Direct ownership assignment, bypassing the gradual signal model.
    /// Only the deployment coordinator calls this. Out-of-bounds positions
    /// and anchor cells are refused.
    pub fn capture(&mut self, pos: GridPos, owner: Faction) -> bool {
        let Some(cell) = self.cell_mut(pos) else {
            return false;
        };
        if cell.anchor {
            debug!("capture at ({}, {}) refused: anchor cell", pos.col, pos.row);
            return false;
        }
        cell.owner = Some(owner);
        cell.signal = SIGNAL_MAX;
        cell.fortified = false;
        cell.outpost = false;
        info!("cell ({}, {}) captured by {owner:?}", pos.col, pos.row);
        true
    }

    // ── Query surface ───────────────────────────────────────────────────

    /// Cell containing a continuous point, or `None` outside the grid.
    pub fn cell_at_point(&self, x: f32, y: f32) -> Option<GridPos> {
        grid::cell_at_point(x, y, self.cell_px, self.cols, self.rows)
    }

    /// Positions of every cell a faction owns.
    pub fn cells_owned(&self, owner: Faction) -> Vec<GridPos> {
        self.positions()
            .filter(|&p| self.cells[grid::dense_index(p, self.cols)].owner == Some(owner))
            .collect()
    }

    pub fn owned_count(&self, owner: Faction) -> usize {
        self.cells.iter().filter(|c| c.owner == Some(owner)).count()
    }

    /// The owned cell closest to `target` by Manhattan distance.
    pub fn nearest_owned(&self, target: GridPos, owner: Faction) -> Option<GridPos> {
        self.cells_owned(owner)
            .into_iter()
            .min_by_key(|p| p.manhattan(target))
    }

    /// Anchor cells with their owners.
    pub fn anchor_cells(&self) -> Vec<(GridPos, Faction)> {
        self.positions()
            .filter_map(|p| {
                let cell = &self.cells[grid::dense_index(p, self.cols)];
                match (cell.anchor, cell.owner) {
                    (true, Some(owner)) => Some((p, owner)),
                    _ => None,
                }
            })
            .collect()
    }

    pub fn set_fortified(&mut self, pos: GridPos, fortified: bool) -> bool {
        match self.cell_mut(pos) {
            Some(cell) if cell.owner.is_some() => {
                cell.fortified = fortified;
                true
            }
            _ => false,
        }
    }

    pub fn set_outpost(&mut self, pos: GridPos, outpost: bool) -> bool {
        match self.cell_mut(pos) {
            Some(cell) if cell.owner.is_some() => {
                cell.outpost = outpost;
                true
            }
            _ => false,
        }
    }

    fn positions(&self) -> impl Iterator<Item = GridPos> + '_ {
        let cols = self.cols;
        (0..self.rows).flat_map(move |row| (0..cols).map(move |col| GridPos::new(col, row)))
    }
}

impl Default for TerritoryGrid {
    fn default() -> Self {
        Self::new(
            meshfront_logic::constants::DEFAULT_GRID_COLS,
            meshfront_logic::constants::DEFAULT_GRID_ROWS,
        )
    }
}
