//! The integrity pass: anchor flood fill plus signal decay/regen.
//!
//! Runs every tick against the territory grid and nothing else: the node
//! graph is a separate ownership model and is never touched from here.

use std::collections::VecDeque;

use log::debug;

use meshfront_logic::constants::{
    MAX_INTEGRITY_STEP, SIGNAL_DECAY_RATE, SIGNAL_MAX, SIGNAL_REGEN_RATE,
};
use meshfront_logic::grid::GridPos;
use meshfront_logic::kinds::Faction;

use crate::territory::TerritoryGrid;

/// One full integrity update.
///
/// Deltas that are non-positive or above [`MAX_INTEGRITY_STEP`] skip the
/// whole call (no partial update), so a paused frame cannot apply a burst
/// of decay. Otherwise: clear every `connected` flag, flood fill from each
/// anchor through same-owner cross-adjacent cells, then regenerate
/// connected cells and decay isolated ones, reverting to neutral at zero.
pub fn update_integrity(territory: &mut TerritoryGrid, delta_seconds: f32) {
    if delta_seconds <= 0.0 || delta_seconds > MAX_INTEGRITY_STEP {
        return;
    }

    for cell in territory.cells_mut() {
        cell.connected = false;
    }

    for (pos, owner) in territory.anchor_cells() {
        flood_fill(territory, pos, owner);
    }

    let regen = SIGNAL_REGEN_RATE * delta_seconds;
    let decay = SIGNAL_DECAY_RATE * delta_seconds;
    for cell in territory.cells_mut() {
        if cell.owner.is_none() {
            continue;
        }
        if cell.connected {
            cell.signal = (cell.signal + regen).min(SIGNAL_MAX);
        } else {
            cell.signal = (cell.signal - decay).max(0.0);
        }
        if cell.signal <= 0.0 {
            // No anchor special-case: an anchor is always connected to
            // itself, so decay can never bring one here.
            debug!("cell reverted to neutral (was {:?})", cell.owner);
            cell.owner = None;
            cell.anchor = false;
            cell.connected = false;
            cell.fortified = false;
            cell.outpost = false;
        }
    }
}

/// Mark every cell reachable from `start` through cells owned by `owner`
/// as connected, over 4-neighbor adjacency.
fn flood_fill(territory: &mut TerritoryGrid, start: GridPos, owner: Faction) {
    let Some(cell) = territory.cell_mut(start) else {
        return;
    };
    if cell.connected || cell.owner != Some(owner) {
        return;
    }
    cell.connected = true;

    let mut queue = VecDeque::new();
    queue.push_back(start);
    while let Some(pos) = queue.pop_front() {
        for next in pos.cross_neighbors() {
            let Some(cell) = territory.cell_mut(next) else {
                continue;
            };
            if cell.connected || cell.owner != Some(owner) {
                continue;
            }
            cell.connected = true;
            queue.push_back(next);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_grid() -> TerritoryGrid {
        let mut territory = TerritoryGrid::new(25, 16);
        territory.seed_anchor(GridPos::new(0, 0), Faction::Cobalt);
        territory
    }

    /// Run `seconds` of integrity updates in guard-sized steps.
    fn run(territory: &mut TerritoryGrid, seconds: f32) {
        let steps = (seconds / MAX_INTEGRITY_STEP).ceil() as usize;
        for _ in 0..steps {
            update_integrity(territory, MAX_INTEGRITY_STEP);
        }
    }

    #[test]
    fn test_guard_skips_bad_deltas() {
        let mut territory = seeded_grid();
        territory.capture(GridPos::new(5, 5), Faction::Cobalt);
        let before = *territory.cell(GridPos::new(5, 5)).unwrap();

        update_integrity(&mut territory, 0.0);
        update_integrity(&mut territory, -1.0);
        update_integrity(&mut territory, MAX_INTEGRITY_STEP * 2.0);

        assert_eq!(*territory.cell(GridPos::new(5, 5)).unwrap(), before);
    }

    #[test]
    fn test_connected_cells_regenerate_to_cap() {
        let mut territory = seeded_grid();
        territory.capture(GridPos::new(1, 0), Faction::Cobalt);
        let pos = GridPos::new(1, 0);
        territory.cell_mut(pos).unwrap().signal = 40.0;

        let mut last = 40.0;
        for _ in 0..5 {
            update_integrity(&mut territory, MAX_INTEGRITY_STEP);
            let cell = territory.cell(pos).unwrap();
            assert!(cell.connected);
            assert!(cell.signal > last);
            last = cell.signal;
        }

        run(&mut territory, 60.0);
        assert_eq!(territory.cell(pos).unwrap().signal, SIGNAL_MAX);
    }

    #[test]
    fn test_isolated_cell_decays_and_reverts() {
        let mut territory = seeded_grid();
        // Far from the anchor, no connecting cells.
        let pos = GridPos::new(10, 10);
        territory.capture(pos, Faction::Cobalt);
        territory.set_fortified(pos, true);

        update_integrity(&mut territory, MAX_INTEGRITY_STEP);
        let cell = territory.cell(pos).unwrap();
        assert!(!cell.connected);
        assert!(cell.signal < SIGNAL_MAX);

        // Full reversion after 100/decay seconds of accumulated decay.
        run(&mut territory, SIGNAL_MAX / SIGNAL_DECAY_RATE + 0.2);
        let cell = territory.cell(pos).unwrap();
        assert_eq!(cell.owner, None);
        assert_eq!(cell.signal, 0.0);
        assert!(!cell.fortified);
        assert!(!cell.connected);
    }

    #[test]
    fn test_flood_fill_follows_owned_corridor() {
        let mut territory = seeded_grid();
        for col in 1..=4 {
            territory.capture(GridPos::new(col, 0), Faction::Cobalt);
        }
        // A gap: (6, 0) is owned but unreachable.
        territory.capture(GridPos::new(6, 0), Faction::Cobalt);

        update_integrity(&mut territory, MAX_INTEGRITY_STEP);
        for col in 1..=4 {
            assert!(territory.cell(GridPos::new(col, 0)).unwrap().connected);
        }
        assert!(!territory.cell(GridPos::new(6, 0)).unwrap().connected);
    }

    #[test]
    fn test_flood_fill_does_not_cross_enemy_cells() {
        let mut territory = seeded_grid();
        territory.capture(GridPos::new(1, 0), Faction::Ember);
        territory.capture(GridPos::new(2, 0), Faction::Cobalt);

        update_integrity(&mut territory, MAX_INTEGRITY_STEP);
        assert!(!territory.cell(GridPos::new(1, 0)).unwrap().connected);
        assert!(!territory.cell(GridPos::new(2, 0)).unwrap().connected);
    }

    #[test]
    fn test_anchor_stays_owned() {
        let mut territory = seeded_grid();
        run(&mut territory, 30.0);
        let anchor = territory.cell(GridPos::new(0, 0)).unwrap();
        assert_eq!(anchor.owner, Some(Faction::Cobalt));
        assert!(anchor.anchor);
        assert_eq!(anchor.signal, SIGNAL_MAX);
    }

    #[test]
    fn test_neutral_cells_untouched() {
        let mut territory = seeded_grid();
        run(&mut territory, 5.0);
        let cell = territory.cell(GridPos::new(12, 12)).unwrap();
        assert_eq!(cell.owner, None);
        assert_eq!(cell.signal, 0.0);
    }
}
