//! Meshfront simulation engine.
//!
//! The authoritative core of a two-faction territorial-control game: a
//! free-form node graph meshed by proximity, a discrete territory grid kept
//! alive by anchor connectivity, and timed multi-phase capture deployments.
//! Everything runs single-threaded from one tick loop; no rendering, audio,
//! or input lives here.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`components`] | hecs components for placed nodes |
//! | [`connectivity`] | Per-tick anchor flood fill, signal decay/regen |
//! | [`deployment`] | Phased remote-capture operations over the grid |
//! | [`engine`] | The `Simulation` world object and tick ordering |
//! | [`error`] | Expected-failure taxonomy for placement and deployment |
//! | [`graph`] | Node ownership, auto-meshing, anchor-distance queries |
//! | [`snapshot`] | Versioned binary save/load of a whole simulation |
//! | [`spatial`] | Uniform-grid index for O(k) radius queries |
//! | [`territory`] | The cell grid, capture primitive, query surface |

pub mod components;
pub mod connectivity;
pub mod deployment;
pub mod engine;
pub mod error;
pub mod graph;
pub mod snapshot;
pub mod spatial;
pub mod territory;

pub use components::{AnchorDistance, Node, Position};
pub use deployment::{DeployPhase, Deployment, DeploymentCoordinator};
pub use engine::Simulation;
pub use error::{DeployError, PlacementError};
pub use graph::NodeGraph;
pub use snapshot::{load_simulation, save_simulation, SaveError};
pub use spatial::SpatialIndex;
pub use territory::{TerritoryCell, TerritoryGrid};
