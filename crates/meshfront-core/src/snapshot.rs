//! Save/load for a whole simulation.
//!
//! Bincode with a versioned header. Entity handles never hit the wire:
//! nodes are flattened to id-keyed records and the graph (including its
//! spatial index and link sets) is rebuilt on load.

use std::collections::HashMap;
use std::io::{Read, Write};

use hecs::Entity;
use serde::{Deserialize, Serialize};

use meshfront_logic::kinds::{Faction, NodeKind};

use crate::components::{Node, Position};
use crate::deployment::DeploymentCoordinator;
use crate::engine::Simulation;
use crate::graph::NodeGraph;
use crate::territory::TerritoryGrid;

/// Increment when the snapshot format changes.
const SAVE_VERSION: u32 = 1;

/// One node, flattened for serialization.
#[derive(Debug, Serialize, Deserialize)]
struct NodeRecord {
    id: u32,
    x: f32,
    y: f32,
    owner: Faction,
    kind: NodeKind,
    power: u8,
    anchor: bool,
    created_at: f64,
    connections: Vec<u32>,
    direct: Vec<u32>,
}

/// Serializable snapshot of the simulation state.
#[derive(Serialize, Deserialize)]
struct SaveData {
    version: u32,
    sim_time: f64,
    nodes: Vec<NodeRecord>,
    territory: TerritoryGrid,
    deployments: DeploymentCoordinator,
}

/// Errors that can occur during save/load.
#[derive(Debug)]
pub enum SaveError {
    Io(std::io::Error),
    Bincode(Box<bincode::ErrorKind>),
    VersionMismatch { expected: u32, found: u32 },
}

impl From<std::io::Error> for SaveError {
    fn from(e: std::io::Error) -> Self {
        SaveError::Io(e)
    }
}

impl From<Box<bincode::ErrorKind>> for SaveError {
    fn from(e: Box<bincode::ErrorKind>) -> Self {
        SaveError::Bincode(e)
    }
}

impl std::fmt::Display for SaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveError::Io(e) => write!(f, "IO error: {}", e),
            SaveError::Bincode(e) => write!(f, "Serialization error: {}", e),
            SaveError::VersionMismatch { expected, found } => {
                write!(f, "Save version mismatch: expected {}, found {}", expected, found)
            }
        }
    }
}

impl std::error::Error for SaveError {}

/// Write a simulation snapshot.
pub fn save_simulation<W: Write>(writer: W, sim: &Simulation) -> Result<(), SaveError> {
    let save_data = SaveData {
        version: SAVE_VERSION,
        sim_time: sim.sim_time(),
        nodes: flatten_nodes(&sim.graph),
        territory: sim.territory.clone(),
        deployments: sim.deployments.clone(),
    };
    bincode::serialize_into(writer, &save_data)?;
    Ok(())
}

/// Read a snapshot back into a fresh simulation.
pub fn load_simulation<R: Read>(reader: R) -> Result<Simulation, SaveError> {
    let save_data: SaveData = bincode::deserialize_from(reader)?;
    if save_data.version != SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: SAVE_VERSION,
            found: save_data.version,
        });
    }
    let graph = rebuild_graph(save_data.nodes);
    Ok(Simulation::from_parts(
        graph,
        save_data.territory,
        save_data.deployments,
        save_data.sim_time,
    ))
}

fn flatten_nodes(graph: &NodeGraph) -> Vec<NodeRecord> {
    let entities = graph.entities();
    let id_of = |e: Entity| graph.node(e).expect("linked entity has no node").id;
    entities
        .iter()
        .map(|&e| {
            let node = graph.node(e).expect("listed entity has no node");
            let pos = graph.position(e).expect("node without position");
            NodeRecord {
                id: node.id,
                x: pos.x,
                y: pos.y,
                owner: node.owner,
                kind: node.kind,
                power: node.power,
                anchor: node.anchor,
                created_at: node.created_at,
                connections: graph
                    .connections(e)
                    .expect("node without links")
                    .into_iter()
                    .map(id_of)
                    .collect(),
                direct: graph
                    .direct_links(e)
                    .expect("node without links")
                    .into_iter()
                    .map(id_of)
                    .collect(),
            }
        })
        .collect()
}

/// Two passes: spawn every node, then resolve link ids to fresh entities.
fn rebuild_graph(records: Vec<NodeRecord>) -> NodeGraph {
    let mut graph = NodeGraph::new();
    let mut by_id: HashMap<u32, Entity> = HashMap::with_capacity(records.len());
    for r in &records {
        let entity = graph.spawn_raw(
            Node {
                id: r.id,
                kind: r.kind,
                owner: r.owner,
                power: r.power,
                anchor: r.anchor,
                created_at: r.created_at,
            },
            Position::new(r.x, r.y),
        );
        by_id.insert(r.id, entity);
    }
    for r in &records {
        let entity = by_id[&r.id];
        let resolve = |ids: &[u32]| {
            ids.iter()
                .map(|id| *by_id.get(id).expect("link references an unknown node id"))
                .collect::<Vec<_>>()
        };
        graph.set_links_raw(entity, resolve(&r.connections), resolve(&r.direct));
    }
    graph
}
