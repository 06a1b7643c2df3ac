//! hecs components for placed nodes.

use hecs::Entity;
use meshfront_logic::kinds::{Faction, NodeKind};
use serde::{Deserialize, Serialize};

/// Core per-node state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique, monotonically assigned identifier.
    pub id: u32,
    pub kind: NodeKind,
    pub owner: Faction,
    /// Power level, 1..=100.
    pub power: u8,
    /// Faction home node. Anchors seed connectivity and cannot be removed
    /// by ordinary gameplay.
    pub anchor: bool,
    /// Simulation time at placement, seconds.
    pub created_at: f64,
}

impl Node {
    /// Aura radius, derived from the kind spec table.
    pub fn radius(&self) -> f32 {
        self.kind.spec().radius
    }
}

/// Continuous position on the plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_squared(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn distance(&self, other: &Position) -> f32 {
        self.distance_squared(other).sqrt()
    }
}

/// Link sets of a node. `connections` holds every edge; `direct` the
/// placement-time edges, always a subset of `connections`. Symmetry across
/// nodes is maintained by the graph, the only writer of this component.
/// Entity handles are not serialized; snapshots flatten links to node ids.
#[derive(Debug, Clone, Default)]
pub struct Links {
    pub connections: Vec<Entity>,
    pub direct: Vec<Entity>,
}

/// Result of an anchor-distance query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorDistance {
    /// Edge count along the hop-minimal path.
    pub hops: u32,
    /// Sum of Euclidean edge lengths along that hop-minimal path. Not the
    /// globally shortest metric distance; the hop-minimal path is what the
    /// game measures.
    pub path_distance: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_distance() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(3.0, 4.0);
        assert_eq!(a.distance(&b), 5.0);
        assert_eq!(a.distance_squared(&b), 25.0);
    }

    #[test]
    fn test_node_radius_from_spec() {
        let node = Node {
            id: 1,
            kind: NodeKind::Relay,
            owner: Faction::Cobalt,
            power: 60,
            anchor: false,
            created_at: 0.0,
        };
        assert_eq!(node.radius(), NodeKind::Relay.spec().radius);
    }
}
