//! A* pathfinding over the 4-connected territory grid.
//!
//! Pure: takes grid dimensions and two cells, returns the step sequence.
//! Every in-bounds cell is passable; ownership does not block movement.
//! Bookkeeping is dense arrays indexed by `row * cols + col`, with the open
//! set in a binary heap keyed by `f = g + h` (Manhattan heuristic, which is
//! admissible and consistent for 4-directional movement).

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::grid::{dense_index, in_bounds, GridPos};

/// Find a path from `start` to `target` on a `cols` x `rows` grid.
///
/// The returned path excludes `start` and includes `target`; a path to the
/// same cell is empty. Returns `None` when either endpoint is outside the
/// grid or the open set is exhausted without reaching the target.
pub fn find_path(cols: i32, rows: i32, start: GridPos, target: GridPos) -> Option<Vec<GridPos>> {
    if !in_bounds(start, cols, rows) || !in_bounds(target, cols, rows) {
        return None;
    }
    if start == target {
        return Some(Vec::new());
    }

    let cell_count = (cols * rows) as usize;
    let mut g = vec![i32::MAX; cell_count];
    let mut prev: Vec<Option<usize>> = vec![None; cell_count];
    let mut closed = vec![false; cell_count];

    let start_idx = dense_index(start, cols);
    let target_idx = dense_index(target, cols);
    g[start_idx] = 0;

    // Heap entries are (f, index); stale entries are skipped on pop.
    let mut open: BinaryHeap<Reverse<(i32, usize)>> = BinaryHeap::new();
    open.push(Reverse((start.manhattan(target), start_idx)));

    while let Some(Reverse((_, idx))) = open.pop() {
        if closed[idx] {
            continue;
        }
        closed[idx] = true;

        if idx == target_idx {
            return Some(reconstruct(&prev, cols, start_idx, target_idx));
        }

        let here = GridPos::new(idx as i32 % cols, idx as i32 / cols);
        for next in here.cross_neighbors() {
            if !in_bounds(next, cols, rows) {
                continue;
            }
            let next_idx = dense_index(next, cols);
            if closed[next_idx] {
                continue;
            }
            let step_g = g[idx] + 1;
            if step_g < g[next_idx] {
                g[next_idx] = step_g;
                prev[next_idx] = Some(idx);
                open.push(Reverse((step_g + next.manhattan(target), next_idx)));
            }
        }
    }

    None
}

/// Walk `prev` links back from the target, excluding the start cell.
fn reconstruct(prev: &[Option<usize>], cols: i32, start_idx: usize, target_idx: usize) -> Vec<GridPos> {
    let mut path = Vec::new();
    let mut idx = target_idx;
    while idx != start_idx {
        path.push(GridPos::new(idx as i32 % cols, idx as i32 / cols));
        idx = prev[idx].expect("path reconstruction hit a cell with no predecessor");
    }
    path.reverse();
    path
}
