//! Pure simulation logic for Meshfront.
//!
//! This crate contains the parts of the territorial-control core that are
//! independent of any engine state or clock. Functions take plain data and
//! return results, making them unit-testable and reusable from the engine
//! crate, the headless harness, and any future tooling.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`constants`] | Tuning constants: ranges, rates, intervals, grid defaults |
//! | [`grid`] | Discrete cell coordinates, Manhattan math, pixel mapping |
//! | [`kinds`] | Factions, node kinds, per-kind spec table, placement checks |
//! | [`pathfinding`] | A* over the 4-connected territory grid |

pub mod constants;
pub mod grid;
pub mod kinds;
pub mod pathfinding;
