//! Expected-failure taxonomy.
//!
//! Everything here is a recoverable condition returned to callers, who
//! decide whether to refund resources or surface feedback. Invariant
//! violations inside the core are not represented here; those panic.

/// Why a node placement was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementError {
    /// Non-finite coordinates.
    InvalidInput,
    /// No allied node within connection range.
    OutOfRange,
    /// Kind-specific limit or prerequisite unmet.
    ConstraintViolated,
}

impl std::fmt::Display for PlacementError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlacementError::InvalidInput => write!(f, "invalid placement coordinates"),
            PlacementError::OutOfRange => write!(f, "no allied node within connection range"),
            PlacementError::ConstraintViolated => write!(f, "kind constraint not met"),
        }
    }
}

impl std::error::Error for PlacementError {}

/// Why a deployment could not be initiated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployError {
    /// Target cell does not exist, or the faction holds no source cell.
    NotFound,
    /// Pathfinding exhausted without reaching the target.
    NoPathFound,
}

impl std::fmt::Display for DeployError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeployError::NotFound => write!(f, "target or source cell not found"),
            DeployError::NoPathFound => write!(f, "no path to target"),
        }
    }
}

impl std::error::Error for DeployError {}
