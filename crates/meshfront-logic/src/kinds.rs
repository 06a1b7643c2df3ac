//! Factions, node kinds, and the per-kind spec table.
//!
//! `NodeKind` is a tagged enum with one variant today; the spec table keeps
//! per-kind data (cost, radius, structural constraints) out of the engine
//! so adding a kind is a table edit, not an engine change. Costs are query
//! points only; the core never spends resources.

use serde::{Deserialize, Serialize};

/// The two playable factions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    Cobalt,
    Ember,
}

impl Faction {
    /// The opposing faction.
    pub fn opponent(&self) -> Faction {
        match self {
            Faction::Cobalt => Faction::Ember,
            Faction::Ember => Faction::Cobalt,
        }
    }
}

/// Placeable node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Standard signal relay.
    Relay,
}

/// A structural prerequisite: a node of `kind` must already exist within
/// `radius` of the placement point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prerequisite {
    pub kind: NodeKind,
    pub radius: f32,
}

/// Per-kind constants consumed by placement checks and by the surrounding
/// game (cost display, aura radius).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KindSpec {
    /// Resource cost charged by the caller, not by the core.
    pub cost: u32,
    /// Visual/aura radius of the node.
    pub radius: f32,
    /// Power a fresh node starts with.
    pub base_power: u8,
    /// Cap on simultaneous nodes of this kind per faction.
    pub max_per_faction: Option<u32>,
    /// Required nearby node of another kind.
    pub prerequisite: Option<Prerequisite>,
}

impl NodeKind {
    /// Spec table lookup.
    pub fn spec(&self) -> KindSpec {
        match self {
            NodeKind::Relay => KindSpec {
                cost: 10,
                radius: 26.0,
                base_power: 60,
                max_per_faction: None,
                prerequisite: None,
            },
        }
    }
}

/// Kind-specific structural check for a placement.
///
/// `existing_of_kind` is the faction's current count of this kind;
/// `prerequisite_in_range` reports whether a node of the prerequisite kind
/// sits within the prerequisite radius (ignored when the spec has none).
pub fn placement_allowed(spec: &KindSpec, existing_of_kind: u32, prerequisite_in_range: bool) -> bool {
    if let Some(max) = spec.max_per_faction {
        if existing_of_kind >= max {
            return false;
        }
    }
    if spec.prerequisite.is_some() && !prerequisite_in_range {
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constrained_spec() -> KindSpec {
        KindSpec {
            cost: 25,
            radius: 40.0,
            base_power: 80,
            max_per_faction: Some(2),
            prerequisite: Some(Prerequisite {
                kind: NodeKind::Relay,
                radius: 60.0,
            }),
        }
    }

    #[test]
    fn test_opponent() {
        assert_eq!(Faction::Cobalt.opponent(), Faction::Ember);
        assert_eq!(Faction::Ember.opponent(), Faction::Cobalt);
    }

    #[test]
    fn test_relay_unconstrained() {
        let spec = NodeKind::Relay.spec();
        assert!(placement_allowed(&spec, 0, false));
        assert!(placement_allowed(&spec, 500, false));
    }

    #[test]
    fn test_max_per_faction() {
        let spec = constrained_spec();
        assert!(placement_allowed(&spec, 1, true));
        assert!(!placement_allowed(&spec, 2, true));
    }

    #[test]
    fn test_prerequisite() {
        let spec = constrained_spec();
        assert!(placement_allowed(&spec, 0, true));
        assert!(!placement_allowed(&spec, 0, false));
    }
}
