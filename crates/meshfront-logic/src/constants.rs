//! Tuning constants for the simulation core.
//!
//! Plain values with no engine dependency. Both the core engine and the
//! headless harness read these; the surrounding game decides costs and
//! balance on top of them.

/// Maximum distance at which a new node may be placed from an allied node.
pub const CONNECT_RANGE: f32 = 120.0;

/// Radius used by auto-mesh after placement. Every allied node within this
/// distance gets a symmetric link. Must be >= [`CONNECT_RANGE`].
pub const MESH_RANGE: f32 = 150.0;

/// Spatial index bucket size. Must be >= [`MESH_RANGE`] so a 3x3 bucket
/// neighborhood always covers any radius the engine queries.
pub const SPATIAL_CELL_SIZE: f32 = 160.0;

/// Upper bound for territory cell signal strength.
pub const SIGNAL_MAX: f32 = 100.0;

/// Signal gained per second by a cell connected to its faction's anchor.
pub const SIGNAL_REGEN_RATE: f32 = 12.0;

/// Signal lost per second by a cell cut off from its faction's anchor.
/// Deliberately larger than the regen rate so isolation is punishing.
pub const SIGNAL_DECAY_RATE: f32 = 20.0;

/// Integrity updates with a delta above this are skipped wholesale,
/// guarding against frame-pause spikes applying a burst of decay.
pub const MAX_INTEGRITY_STEP: f32 = 0.1;

/// Seconds between deployment transit steps (one path cell per step).
pub const TRANSIT_INTERVAL: f64 = 0.25;

/// Seconds between a deployment's impact and its expansion.
pub const IMPACT_DELAY: f64 = 0.4;

/// Default territory grid dimensions.
pub const DEFAULT_GRID_COLS: i32 = 25;
/// Default territory grid dimensions.
pub const DEFAULT_GRID_ROWS: i32 = 16;

/// Edge length of one territory cell in world/pixel units.
pub const CELL_PIXELS: f32 = 48.0;

/// Node power bounds (inclusive).
pub const POWER_MIN: u8 = 1;
/// Node power bounds (inclusive).
pub const POWER_MAX: u8 = 100;
