//! Typed errors for the planning core.
//!
//! Per the error-handling design, domain errors are typed and returned by
//! value; the core performs no retries and does not log. `EmptyCoverage`
//! and `ObstacleSaturation` are intentionally *not* variants here — both
//! are non-fatal outcomes carried in the relevant result types instead.

use thiserror::Error;

/// Exhaustive error kind for the planning core.
#[derive(Debug, Clone, Error)]
pub enum PlanningError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("infeasible constraint: {0}")]
    InfeasibleConstraint(String),

    #[error("no path found after {iterations} iterations ({elapsed_secs:.3}s)")]
    NoPathFound { iterations: usize, elapsed_secs: f64 },

    #[error("search timed out after {elapsed_secs:.3}s")]
    Timeout { elapsed_secs: f64 },

    #[error("search cancelled after {elapsed_secs:.3}s")]
    Cancelled { elapsed_secs: f64 },

    #[error("spatial conflict between {} vehicle pair(s)", pairs.len())]
    SpatialConflict { pairs: Vec<(usize, usize)> },

    #[error("serialization error: {0}")]
    SerializationError(String),
}

pub type PlanningResult<T> = Result<T, PlanningError>;
