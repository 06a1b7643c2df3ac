//! Remote-capture deployments.
//!
//! A deployment walks a precomputed path across the territory grid one
//! cell per transit interval, then captures its target and the target's
//! cross neighbors in two timed phases. Deployments are independent
//! records advanced in one single-threaded sweep; overlapping captures on
//! the same cell resolve last-writer-wins.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use meshfront_logic::constants::{IMPACT_DELAY, TRANSIT_INTERVAL};
use meshfront_logic::grid::GridPos;
use meshfront_logic::kinds::Faction;
use meshfront_logic::pathfinding::find_path;

use crate::error::DeployError;
use crate::territory::TerritoryGrid;

/// Deployment lifecycle phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeployPhase {
    /// Walking the path, one cell per interval.
    Transit,
    /// Capturing the target cell.
    Impact,
    /// Capturing the target's cross neighbors.
    Expansion,
    /// Finished; swept from the active set.
    Complete,
}

/// One in-flight remote capture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deployment {
    pub id: u32,
    pub owner: Faction,
    pub target: GridPos,
    /// Start-exclusive, target-inclusive path, computed once at initiate.
    pub path: Vec<GridPos>,
    pub path_index: usize,
    pub phase: DeployPhase,
    pub started_at: f64,
    pub next_action_at: f64,
    /// Cells already walked, kept for trail rendering only.
    pub traversed: Vec<GridPos>,
}

/// Active-set manager and phase driver.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeploymentCoordinator {
    active: Vec<Deployment>,
    next_id: u32,
}

impl DeploymentCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a deployment toward `target`. The source is the owner's cell
    /// nearest the target by Manhattan distance. Resource costs and any
    /// gating are the caller's business.
    pub fn initiate(
        &mut self,
        territory: &TerritoryGrid,
        target: GridPos,
        owner: Faction,
        now: f64,
    ) -> Result<u32, DeployError> {
        if territory.cell(target).is_none() {
            return Err(DeployError::NotFound);
        }
        let source = territory
            .nearest_owned(target, owner)
            .ok_or(DeployError::NotFound)?;
        let path = find_path(territory.cols(), territory.rows(), source, target)
            .ok_or(DeployError::NoPathFound)?;

        let id = self.next_id;
        self.next_id += 1;
        self.active.push(Deployment {
            id,
            owner,
            target,
            path,
            path_index: 0,
            phase: DeployPhase::Transit,
            started_at: now,
            next_action_at: now + TRANSIT_INTERVAL,
            traversed: Vec::new(),
        });
        info!(
            "deployment {id} launched by {owner:?} from ({}, {}) to ({}, {})",
            source.col, source.row, target.col, target.row
        );
        Ok(id)
    }

    /// Abort a deployment in any phase. Already-captured cells stay as they
    /// are. Unknown or already-swept ids are a no-op.
    pub fn cancel(&mut self, id: u32) {
        let before = self.active.len();
        self.active.retain(|d| d.id != id);
        if self.active.len() < before {
            info!("deployment {id} cancelled");
        }
    }

    /// Advance every deployment whose next action is due, one phase action
    /// per call, then sweep completed ones.
    pub fn update(&mut self, territory: &mut TerritoryGrid, now: f64) {
        for d in &mut self.active {
            if now < d.next_action_at {
                continue;
            }
            match d.phase {
                DeployPhase::Transit => {
                    if d.path_index < d.path.len() {
                        let cell = d.path[d.path_index];
                        d.traversed.push(cell);
                        d.path_index += 1;
                        d.next_action_at = now + TRANSIT_INTERVAL;
                    }
                    if d.path_index >= d.path.len() {
                        d.phase = DeployPhase::Impact;
                        d.next_action_at = now;
                        debug!("deployment {} reached its target", d.id);
                    }
                }
                DeployPhase::Impact => {
                    territory.capture(d.target, d.owner);
                    d.phase = DeployPhase::Expansion;
                    d.next_action_at = now + IMPACT_DELAY;
                }
                DeployPhase::Expansion => {
                    for neighbor in d.target.cross_neighbors() {
                        territory.capture(neighbor, d.owner);
                    }
                    d.phase = DeployPhase::Complete;
                    info!("deployment {} complete", d.id);
                }
                DeployPhase::Complete => {}
            }
        }
        self.active.retain(|d| d.phase != DeployPhase::Complete);
    }

    pub fn active(&self) -> &[Deployment] {
        &self.active
    }

    pub fn get(&self, id: u32) -> Option<&Deployment> {
        self.active.iter().find(|d| d.id == id)
    }
}
