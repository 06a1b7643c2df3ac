//! The free-form node graph.
//!
//! Owns every placed node (a hecs world) and is the only writer of link
//! sets and of the spatial index, which it mirrors in the same call as any
//! mutation. Placement validates range and kind constraints, links the new
//! node to its nearest ally, then auto-meshes to everything allied within
//! mesh range. Removal cascades through neighbor link sets.

use std::collections::{HashSet, VecDeque};

use hecs::{Entity, World};
use log::debug;

use meshfront_logic::constants::{CONNECT_RANGE, MESH_RANGE, POWER_MAX, SPATIAL_CELL_SIZE};
use meshfront_logic::kinds::{placement_allowed, Faction, NodeKind};

use crate::components::{AnchorDistance, Links, Node, Position};
use crate::error::PlacementError;
use crate::spatial::SpatialIndex;

/// Node collection plus its derived spatial index.
pub struct NodeGraph {
    world: World,
    spatial: SpatialIndex,
    next_id: u32,
}

impl NodeGraph {
    pub fn new() -> Self {
        Self {
            world: World::new(),
            spatial: SpatialIndex::new(SPATIAL_CELL_SIZE),
            next_id: 0,
        }
    }

    fn alloc_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Seed a faction's home node. Setup-time only: skips the range and
    /// kind checks that ordinary placement runs.
    pub fn spawn_anchor(
        &mut self,
        x: f32,
        y: f32,
        owner: Faction,
        now: f64,
    ) -> Result<Entity, PlacementError> {
        if !x.is_finite() || !y.is_finite() {
            return Err(PlacementError::InvalidInput);
        }
        let id = self.alloc_id();
        let entity = self.world.spawn((
            Node {
                id,
                kind: NodeKind::Relay,
                owner,
                power: POWER_MAX,
                anchor: true,
                created_at: now,
            },
            Position::new(x, y),
            Links::default(),
        ));
        self.spatial.insert(entity, x, y, owner);
        debug!("anchor node {id} seeded for {owner:?} at ({x:.1}, {y:.1})");
        Ok(entity)
    }

    /// Place a node. Precondition order: finite coordinates, an allied node
    /// within connection range, kind constraints. On success the node is
    /// direct-linked to the nearest ally, indexed, and auto-meshed.
    pub fn create_node(
        &mut self,
        x: f32,
        y: f32,
        owner: Faction,
        kind: NodeKind,
        now: f64,
    ) -> Result<Entity, PlacementError> {
        if !x.is_finite() || !y.is_finite() {
            return Err(PlacementError::InvalidInput);
        }

        let nearest = self
            .nearest_in_range(x, y, CONNECT_RANGE, owner)
            .ok_or(PlacementError::OutOfRange)?;

        let spec = kind.spec();
        let prereq_ok = match spec.prerequisite {
            None => true,
            Some(p) => self
                .spatial
                .query(x, y, p.radius, Some(owner))
                .iter()
                .any(|&e| self.node(e).map(|n| n.kind) == Some(p.kind)),
        };
        if !placement_allowed(&spec, self.count_of_kind(owner, kind), prereq_ok) {
            return Err(PlacementError::ConstraintViolated);
        }

        let id = self.alloc_id();
        let entity = self.world.spawn((
            Node {
                id,
                kind,
                owner,
                power: spec.base_power,
                anchor: false,
                created_at: now,
            },
            Position::new(x, y),
            Links {
                connections: vec![nearest],
                direct: vec![nearest],
            },
        ));
        {
            let mut links = self
                .world
                .get::<&mut Links>(nearest)
                .expect("nearest ally vanished during placement");
            links.connections.push(entity);
            links.direct.push(entity);
        }
        self.spatial.insert(entity, x, y, owner);
        self.auto_mesh(entity, x, y, owner);
        debug!("node {id} placed for {owner:?} at ({x:.1}, {y:.1})");
        Ok(entity)
    }

    /// Symmetrically link the new node to every allied node within mesh
    /// range, skipping itself and anything already connected.
    fn auto_mesh(&mut self, entity: Entity, x: f32, y: f32, owner: Faction) {
        let already: Vec<Entity> = {
            let links = self.world.get::<&Links>(entity).expect("fresh node has links");
            links.connections.clone()
        };
        let mut added = Vec::new();
        for candidate in self.spatial.query(x, y, MESH_RANGE, Some(owner)) {
            if candidate == entity || already.contains(&candidate) {
                continue;
            }
            added.push(candidate);
        }
        for &other in &added {
            self.world
                .get::<&mut Links>(other)
                .expect("indexed node has no link set")
                .connections
                .push(entity);
        }
        self.world
            .get::<&mut Links>(entity)
            .expect("fresh node has links")
            .connections
            .extend(added);
    }

    /// Remove a node, stripping it from every neighbor's link sets and from
    /// the spatial index. Unknown entities and anchors are refused.
    pub fn remove_node(&mut self, entity: Entity) -> bool {
        let Some(node) = self.node(entity) else {
            return false;
        };
        if node.anchor {
            debug!("refusing to remove anchor node {}", node.id);
            return false;
        }
        let pos = self.position(entity).expect("node without position");
        let neighbors: Vec<Entity> = {
            let links = self.world.get::<&Links>(entity).expect("node without links");
            links.connections.clone()
        };
        for neighbor in neighbors {
            let mut links = self
                .world
                .get::<&mut Links>(neighbor)
                .expect("neighbor in link set is missing");
            links.connections.retain(|&e| e != entity);
            links.direct.retain(|&e| e != entity);
        }
        self.spatial.remove(entity, pos.x, pos.y);
        self.world
            .despawn(entity)
            .expect("node table and spatial index out of sync");
        debug!("node {} removed", node.id);
        true
    }

    /// Breadth-first distance from the owner's anchors, expanding in hops
    /// and accumulating Euclidean edge lengths. `None` when the node is
    /// unreachable from every anchor of its owner.
    pub fn distance_from_anchor(&self, target: Entity) -> Option<AnchorDistance> {
        let owner = self.node(target)?.owner;
        let mut visited: HashSet<Entity> = HashSet::new();
        let mut queue: VecDeque<(Entity, u32, f32)> = VecDeque::new();
        for (entity, node) in self.world.query::<&Node>().iter() {
            if node.anchor && node.owner == owner {
                visited.insert(entity);
                queue.push_back((entity, 0, 0.0));
            }
        }
        while let Some((current, hops, dist)) = queue.pop_front() {
            if current == target {
                return Some(AnchorDistance {
                    hops,
                    path_distance: dist,
                });
            }
            let current_pos = *self
                .world
                .get::<&Position>(current)
                .expect("queued node without position");
            let links = self
                .world
                .get::<&Links>(current)
                .expect("queued node without links");
            for &next in &links.connections {
                if visited.contains(&next) {
                    continue;
                }
                let next_node = self
                    .world
                    .get::<&Node>(next)
                    .expect("link set references a despawned node");
                if next_node.owner != owner {
                    continue;
                }
                let next_pos = *self
                    .world
                    .get::<&Position>(next)
                    .expect("linked node without position");
                visited.insert(next);
                queue.push_back((next, hops + 1, dist + current_pos.distance(&next_pos)));
            }
        }
        None
    }

    // ── Query surface ───────────────────────────────────────────────────

    /// Nearest allied node within `radius` of a point.
    fn nearest_in_range(&self, x: f32, y: f32, radius: f32, owner: Faction) -> Option<Entity> {
        let here = Position::new(x, y);
        self.spatial
            .query(x, y, radius, Some(owner))
            .into_iter()
            .min_by(|&a, &b| {
                let da = self.position(a).expect("indexed node without position");
                let db = self.position(b).expect("indexed node without position");
                here.distance_squared(&da)
                    .total_cmp(&here.distance_squared(&db))
            })
    }

    /// Nearest allied node to a point, unbounded. Full scan; meant for the
    /// UI surface, not the hot path.
    pub fn nearest_allied(&self, x: f32, y: f32, owner: Faction) -> Option<Entity> {
        let here = Position::new(x, y);
        let mut best: Option<(Entity, f32)> = None;
        for (entity, (node, pos)) in self.world.query::<(&Node, &Position)>().iter() {
            if node.owner != owner {
                continue;
            }
            let d = here.distance_squared(pos);
            if best.map_or(true, |(_, bd)| d < bd) {
                best = Some((entity, d));
            }
        }
        best.map(|(e, _)| e)
    }

    /// Every node within `radius` of a point, optionally owner-filtered.
    /// `radius` must stay within the spatial bucket size.
    pub fn nodes_within(&self, x: f32, y: f32, radius: f32, owner: Option<Faction>) -> Vec<Entity> {
        self.spatial.query(x, y, radius, owner)
    }

    pub fn node(&self, entity: Entity) -> Option<Node> {
        self.world.get::<&Node>(entity).ok().map(|n| *n)
    }

    pub fn position(&self, entity: Entity) -> Option<Position> {
        self.world.get::<&Position>(entity).ok().map(|p| *p)
    }

    pub fn connections(&self, entity: Entity) -> Option<Vec<Entity>> {
        self.world
            .get::<&Links>(entity)
            .ok()
            .map(|l| l.connections.clone())
    }

    pub fn direct_links(&self, entity: Entity) -> Option<Vec<Entity>> {
        self.world.get::<&Links>(entity).ok().map(|l| l.direct.clone())
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.world.contains(entity)
    }

    pub fn len(&self) -> usize {
        self.world.query::<&Node>().iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn entities(&self) -> Vec<Entity> {
        self.world.query::<&Node>().iter().map(|(e, _)| e).collect()
    }

    pub fn anchors(&self, owner: Faction) -> Vec<Entity> {
        self.world
            .query::<&Node>()
            .iter()
            .filter(|(_, n)| n.anchor && n.owner == owner)
            .map(|(e, _)| e)
            .collect()
    }

    pub fn count_of_kind(&self, owner: Faction, kind: NodeKind) -> u32 {
        self.world
            .query::<&Node>()
            .iter()
            .filter(|(_, n)| n.owner == owner && n.kind == kind)
            .count() as u32
    }

    // ── Snapshot support ────────────────────────────────────────────────

    pub(crate) fn spawn_raw(&mut self, node: Node, pos: Position) -> Entity {
        let owner = node.owner;
        let (x, y) = (pos.x, pos.y);
        self.next_id = self.next_id.max(node.id + 1);
        let entity = self.world.spawn((node, pos, Links::default()));
        self.spatial.insert(entity, x, y, owner);
        entity
    }

    pub(crate) fn set_links_raw(&mut self, entity: Entity, connections: Vec<Entity>, direct: Vec<Entity>) {
        let mut links = self
            .world
            .get::<&mut Links>(entity)
            .expect("restored node has no link set");
        links.connections = connections;
        links.direct = direct;
    }
}

impl Default for NodeGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_with_anchor() -> (NodeGraph, Entity) {
        let mut graph = NodeGraph::new();
        let anchor = graph.spawn_anchor(0.0, 0.0, Faction::Cobalt, 0.0).unwrap();
        (graph, anchor)
    }

    fn assert_symmetric(graph: &NodeGraph) {
        for e in graph.entities() {
            let links = graph.connections(e).unwrap();
            assert!(!links.contains(&e), "node linked to itself");
            for other in links {
                assert!(
                    graph.connections(other).unwrap().contains(&e),
                    "connection not symmetric"
                );
            }
        }
    }

    #[test]
    fn test_placement_out_of_range() {
        let (mut graph, _) = graph_with_anchor();
        let err = graph
            .create_node(500.0, 0.0, Faction::Cobalt, NodeKind::Relay, 0.0)
            .unwrap_err();
        assert_eq!(err, PlacementError::OutOfRange);
    }

    #[test]
    fn test_placement_rejects_non_finite() {
        let (mut graph, _) = graph_with_anchor();
        let err = graph
            .create_node(f32::NAN, 0.0, Faction::Cobalt, NodeKind::Relay, 0.0)
            .unwrap_err();
        assert_eq!(err, PlacementError::InvalidInput);
    }

    #[test]
    fn test_placement_enemy_nodes_do_not_count() {
        let (mut graph, _) = graph_with_anchor();
        // Ember has no presence near the Cobalt anchor.
        let err = graph
            .create_node(50.0, 0.0, Faction::Ember, NodeKind::Relay, 0.0)
            .unwrap_err();
        assert_eq!(err, PlacementError::OutOfRange);
    }

    #[test]
    fn test_placement_links_nearest_and_meshes() {
        let (mut graph, anchor) = graph_with_anchor();
        let a = graph
            .create_node(100.0, 0.0, Faction::Cobalt, NodeKind::Relay, 1.0)
            .unwrap();
        // Within mesh range of both the anchor and node a.
        let b = graph
            .create_node(60.0, 60.0, Faction::Cobalt, NodeKind::Relay, 2.0)
            .unwrap();

        let direct = graph.direct_links(b).unwrap();
        assert_eq!(direct.len(), 1);
        let b_links = graph.connections(b).unwrap();
        assert!(b_links.contains(&anchor));
        assert!(b_links.contains(&a));
        assert_symmetric(&graph);

        let ids: Vec<u32> = graph.entities().iter().map(|&e| graph.node(e).unwrap().id).collect();
        let unique: HashSet<u32> = ids.iter().copied().collect();
        assert_eq!(ids.len(), unique.len());
    }

    #[test]
    fn test_direct_subset_of_connections() {
        let (mut graph, _) = graph_with_anchor();
        let a = graph
            .create_node(80.0, 0.0, Faction::Cobalt, NodeKind::Relay, 0.0)
            .unwrap();
        let b = graph
            .create_node(80.0, 80.0, Faction::Cobalt, NodeKind::Relay, 0.0)
            .unwrap();
        for e in [a, b] {
            let links = graph.connections(e).unwrap();
            for d in graph.direct_links(e).unwrap() {
                assert!(links.contains(&d));
            }
        }
    }

    #[test]
    fn test_remove_strips_all_references() {
        let (mut graph, anchor) = graph_with_anchor();
        let a = graph
            .create_node(100.0, 0.0, Faction::Cobalt, NodeKind::Relay, 0.0)
            .unwrap();
        let b = graph
            .create_node(100.0, 100.0, Faction::Cobalt, NodeKind::Relay, 0.0)
            .unwrap();

        assert!(graph.remove_node(a));
        assert!(!graph.contains(a));
        for survivor in [anchor, b] {
            assert!(!graph.connections(survivor).unwrap().contains(&a));
            assert!(!graph.direct_links(survivor).unwrap().contains(&a));
        }
        assert!(graph.nodes_within(100.0, 0.0, 50.0, None).is_empty());
        assert_symmetric(&graph);
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let (mut graph, anchor) = graph_with_anchor();
        let a = graph
            .create_node(50.0, 0.0, Faction::Cobalt, NodeKind::Relay, 0.0)
            .unwrap();
        assert!(graph.remove_node(a));
        assert!(!graph.remove_node(a));
        assert!(graph.contains(anchor));
    }

    #[test]
    fn test_anchor_cannot_be_removed() {
        let (mut graph, anchor) = graph_with_anchor();
        assert!(!graph.remove_node(anchor));
        assert!(graph.contains(anchor));
    }

    #[test]
    fn test_anchor_distance_chain() {
        let (mut graph, anchor) = graph_with_anchor();
        // Chain spaced beyond mesh range so each link is placement-direct.
        let a = graph
            .create_node(110.0, 0.0, Faction::Cobalt, NodeKind::Relay, 0.0)
            .unwrap();
        let b = graph
            .create_node(220.0, 0.0, Faction::Cobalt, NodeKind::Relay, 0.0)
            .unwrap();

        assert_eq!(
            graph.distance_from_anchor(anchor),
            Some(AnchorDistance { hops: 0, path_distance: 0.0 })
        );
        let da = graph.distance_from_anchor(a).unwrap();
        assert_eq!(da.hops, 1);
        assert!((da.path_distance - 110.0).abs() < 0.01);
        let db = graph.distance_from_anchor(b).unwrap();
        assert_eq!(db.hops, 2);
        assert!((db.path_distance - 220.0).abs() < 0.01);
    }

    #[test]
    fn test_anchor_distance_unreachable_after_cut() {
        let (mut graph, _) = graph_with_anchor();
        let a = graph
            .create_node(110.0, 0.0, Faction::Cobalt, NodeKind::Relay, 0.0)
            .unwrap();
        let b = graph
            .create_node(220.0, 0.0, Faction::Cobalt, NodeKind::Relay, 0.0)
            .unwrap();
        // Cutting the middle node strands b.
        graph.remove_node(a);
        assert_eq!(graph.distance_from_anchor(b), None);
    }

    #[test]
    fn test_nearest_allied() {
        let (mut graph, anchor) = graph_with_anchor();
        let a = graph
            .create_node(100.0, 0.0, Faction::Cobalt, NodeKind::Relay, 0.0)
            .unwrap();
        assert_eq!(graph.nearest_allied(90.0, 0.0, Faction::Cobalt), Some(a));
        assert_eq!(graph.nearest_allied(-10.0, 0.0, Faction::Cobalt), Some(anchor));
        assert_eq!(graph.nearest_allied(0.0, 0.0, Faction::Ember), None);
    }
}
