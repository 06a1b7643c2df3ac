//! The simulation world object.
//!
//! One `Simulation` is one independent match: node graph, territory grid,
//! deployment coordinator, and the sim clock, all instantiated by the
//! caller, with no global state. The host loop calls [`Simulation::update`]
//! once per tick; placement and deployment entry points are synchronous.

use hecs::Entity;

use meshfront_logic::constants::{DEFAULT_GRID_COLS, DEFAULT_GRID_ROWS};
use meshfront_logic::grid::GridPos;
use meshfront_logic::kinds::{Faction, NodeKind};

use crate::connectivity;
use crate::deployment::DeploymentCoordinator;
use crate::error::{DeployError, PlacementError};
use crate::graph::NodeGraph;
use crate::territory::TerritoryGrid;

/// A complete, self-contained match state.
pub struct Simulation {
    pub graph: NodeGraph,
    pub territory: TerritoryGrid,
    pub deployments: DeploymentCoordinator,
    sim_time: f64,
}

impl Simulation {
    pub fn new(cols: i32, rows: i32) -> Self {
        Self {
            graph: NodeGraph::new(),
            territory: TerritoryGrid::new(cols, rows),
            deployments: DeploymentCoordinator::new(),
            sim_time: 0.0,
        }
    }

    /// Seed a faction: its anchor node on the plane and its anchor cell on
    /// the grid. Call once per faction before the first tick.
    pub fn seed_faction(
        &mut self,
        owner: Faction,
        x: f32,
        y: f32,
        home_cell: GridPos,
    ) -> Result<Entity, PlacementError> {
        if !self.territory.seed_anchor(home_cell, owner) {
            return Err(PlacementError::InvalidInput);
        }
        self.graph.spawn_anchor(x, y, owner, self.sim_time)
    }

    /// Advance one tick: deployments first (they may capture cells), then
    /// the territory integrity pass. Node mutations happen outside this
    /// call, synchronously, as placement requests arrive.
    pub fn update(&mut self, delta_seconds: f32) {
        self.sim_time += delta_seconds as f64;
        self.deployments.update(&mut self.territory, self.sim_time);
        connectivity::update_integrity(&mut self.territory, delta_seconds);
    }

    /// Place a node for a faction. The caller handles resource cost and
    /// refund around this.
    pub fn place_node(
        &mut self,
        x: f32,
        y: f32,
        owner: Faction,
        kind: NodeKind,
    ) -> Result<Entity, PlacementError> {
        self.graph.create_node(x, y, owner, kind, self.sim_time)
    }

    pub fn remove_node(&mut self, entity: Entity) -> bool {
        self.graph.remove_node(entity)
    }

    pub fn launch_deployment(&mut self, target: GridPos, owner: Faction) -> Result<u32, DeployError> {
        self.deployments
            .initiate(&self.territory, target, owner, self.sim_time)
    }

    pub fn cancel_deployment(&mut self, id: u32) {
        self.deployments.cancel(id);
    }

    /// Seconds of simulated time since construction.
    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    pub(crate) fn from_parts(
        graph: NodeGraph,
        territory: TerritoryGrid,
        deployments: DeploymentCoordinator,
        sim_time: f64,
    ) -> Self {
        Self {
            graph,
            territory,
            deployments,
            sim_time,
        }
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(DEFAULT_GRID_COLS, DEFAULT_GRID_ROWS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_simulation_is_empty() {
        let sim = Simulation::default();
        assert!(sim.graph.is_empty());
        assert_eq!(sim.sim_time(), 0.0);
        assert!(sim.deployments.active().is_empty());
    }

    #[test]
    fn test_seed_faction() {
        let mut sim = Simulation::default();
        let anchor = sim
            .seed_faction(Faction::Cobalt, 100.0, 100.0, GridPos::new(2, 2))
            .unwrap();
        assert!(sim.graph.node(anchor).unwrap().anchor);
        assert_eq!(sim.graph.anchors(Faction::Cobalt), vec![anchor]);
        assert!(sim.graph.anchors(Faction::Ember).is_empty());
        assert!(sim.territory.cell(GridPos::new(2, 2)).unwrap().anchor);
    }

    #[test]
    fn test_seed_faction_rejects_bad_cell() {
        let mut sim = Simulation::default();
        let err = sim
            .seed_faction(Faction::Cobalt, 0.0, 0.0, GridPos::new(-1, 0))
            .unwrap_err();
        assert_eq!(err, PlacementError::InvalidInput);
    }

    #[test]
    fn test_update_advances_clock() {
        let mut sim = Simulation::default();
        for _ in 0..20 {
            sim.update(0.05);
        }
        assert!((sim.sim_time() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_placement_stamps_sim_time() {
        let mut sim = Simulation::default();
        sim.seed_faction(Faction::Cobalt, 0.0, 0.0, GridPos::new(0, 0))
            .unwrap();
        for _ in 0..10 {
            sim.update(0.05);
        }
        let node = sim
            .place_node(80.0, 0.0, Faction::Cobalt, NodeKind::Relay)
            .unwrap();
        let created = sim.graph.node(node).unwrap().created_at;
        assert!((created - 0.5).abs() < 1e-6);
    }
}
