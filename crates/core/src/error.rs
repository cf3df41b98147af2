//! Error types for the spread engine
//!
//! Only conditions a caller or operator must see are errors. Per-neighbor
//! pruning (firebreaks, zero fuel, weak spread, already-burning points) is
//! ordinary control flow inside the engine, and a missing weather reading
//! degrades the run instead of failing it.

use crate::core_types::PointId;
use thiserror::Error;

/// Failure of an external store the engine reads from
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("grid point store unavailable: {reason}")]
    GridUnavailable { reason: String },

    #[error("weather store unavailable for station '{station}': {reason}")]
    WeatherUnavailable { station: String, reason: String },

    #[error("failed to read provider data: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed provider data: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Errors surfaced by Run Simulation and Grid Listing
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("ignition point {0} not found in the grid")]
    NotFound(PointId),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl SimulationError {
    /// True for infrastructure failures (as opposed to a bad request)
    pub fn is_provider_failure(&self) -> bool {
        matches!(self, Self::Provider(_))
    }
}

/// Boundary geometry that could not be produced for one time sample
///
/// Never fatal: the sample is dropped from the boundary sequence.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("convex hull of {points} points is degenerate")]
    DegenerateHull { points: usize },

    #[error("union of {discs} buffered discs is empty")]
    EmptyUnion { discs: usize },
}

/// Invalid engine configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be finite and positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("{field} must be at least {min}, got {value}")]
    TooSmall {
        field: &'static str,
        min: usize,
        value: usize,
    },
}
