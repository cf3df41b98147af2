//! Engine configuration
//!
//! Defaults reproduce the calibrated behaviour of the production service:
//! a 7-hour horizon, 10-minute boundary sampling, a 1.5 km firebreak that
//! only 10 m/s winds can cross, and up to 8 neighbors within 5 km.

use crate::core_types::units::{Kilometers, MetersPerSecond, Seconds};
use crate::core_types::weather::WeatherSnapshot;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Neighbor search limits for the spatial point index
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NeighborSearch {
    /// Half-width of the bounding box in degrees (both axes)
    pub box_radius_deg: f64,
    /// Exclusive upper bound on neighbor distance
    pub max_distance: Kilometers,
    /// Maximum number of neighbors returned, nearest first
    pub max_neighbors: usize,
}

impl Default for NeighborSearch {
    fn default() -> Self {
        Self {
            box_radius_deg: 0.03,
            max_distance: Kilometers::new(5.0),
            max_neighbors: 8,
        }
    }
}

/// Tunable parameters of a spread run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpreadConfig {
    /// Points igniting after this time are not expanded
    pub horizon: Seconds,
    /// Sampling interval of the boundary time series
    pub boundary_step: Seconds,
    /// Gaps wider than this are firebreaks under normal wind
    pub firebreak_distance: Kilometers,
    /// Wind speed at which embers cross firebreaks
    pub strong_wind: MetersPerSecond,
    /// Neighbor search limits
    pub neighbor_search: NeighborSearch,
    /// Spread with a lower ROS score dies out
    pub min_rate_of_spread: f64,
    /// Radius of the disc drawn around isolated burning points
    pub buffer_radius: Kilometers,
    /// Number of segments in each buffer disc
    pub buffer_segments: usize,
    /// Weather used where the station has no reading
    pub default_weather: WeatherSnapshot,
    /// Maximum cached results (`None` keeps every result)
    pub cache_capacity: Option<usize>,
}

impl Default for SpreadConfig {
    fn default() -> Self {
        Self {
            horizon: Seconds::from_hours(7.0),
            boundary_step: Seconds::new(600.0),
            firebreak_distance: Kilometers::new(1.5),
            strong_wind: MetersPerSecond::new(10.0),
            neighbor_search: NeighborSearch::default(),
            min_rate_of_spread: 1.0,
            buffer_radius: Kilometers::new(0.01),
            buffer_segments: 32,
            default_weather: WeatherSnapshot::default(),
            cache_capacity: None,
        }
    }
}

impl SpreadConfig {
    /// Check the configuration for values that would stall or break a run
    ///
    /// # Errors
    /// Returns [`ConfigError`] when a step, distance or count is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("boundaryStep", *self.boundary_step)?;
        positive("horizon", *self.horizon)?;
        positive("bufferRadius", *self.buffer_radius)?;
        positive("neighborSearch.boxRadiusDeg", self.neighbor_search.box_radius_deg)?;
        positive("neighborSearch.maxDistance", *self.neighbor_search.max_distance)?;
        positive("minRateOfSpread", self.min_rate_of_spread)?;

        if self.buffer_segments < 3 {
            return Err(ConfigError::TooSmall {
                field: "bufferSegments",
                min: 3,
                value: self.buffer_segments,
            });
        }
        if self.cache_capacity == Some(0) {
            return Err(ConfigError::TooSmall {
                field: "cacheCapacity",
                min: 1,
                value: 0,
            });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}
