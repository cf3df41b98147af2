//! Fire spread service
//!
//! `FireSpreadService` is the entry point for callers. A request names an
//! ignition point; the service answers from the result cache or runs the
//! full pipeline:
//!
//! 1. Load the grid points and index them for neighbor search
//! 2. Resolve the weather at the nearest station
//! 3. Propagate fire from the ignition point
//! 4. Sample the boundary time series
//!
//! All provider I/O happens in steps 1 and 2. A run that fails caches
//! nothing; a run that succeeds is shared by every later request for the
//! same ignition point.

pub mod cache;

pub use cache::{CacheStats, ResultCache};

use crate::core_types::geodesy::GeoCoord;
use crate::core_types::grid_point::PointId;
use crate::core_types::units::Seconds;
use crate::core_types::weather::Station;
use crate::error::{ConfigError, SimulationError};
use crate::grid::PointSet;
use crate::provider::{GridPointProvider, WeatherProvider};
use crate::solver::{generate_boundaries, PropagationEngine, PropagationStats, SpreadConfig, TimeBoundary};
use crate::weather::{resolve_weather, ResolvedWeather};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Burning point in a simulation result
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IgnitedPoint {
    /// Grid point id
    pub id: PointId,
    /// Location as `[lon, lat]`
    pub coordinates: GeoCoord,
    /// Seconds from ignition until this point catches fire
    pub ignition_time: Seconds,
    /// Seconds from ignition until this point stops burning
    pub burnout_time: Seconds,
    /// Id of the point the fire arrived from (absent for the ignition point)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignited_from: Option<PointId>,
}

/// Complete output of one simulation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    /// Id of the ignition point
    pub ignition_id: PointId,
    /// Every point that ignited, in dataset order
    pub features: Vec<IgnitedPoint>,
    /// Fire-front outlines, strictly increasing in time
    pub time_boundaries: Vec<TimeBoundary>,
    /// Weather the run used and where it came from
    pub weather: ResolvedWeather,
    /// Propagation counters
    pub stats: PropagationStats,
}

impl SimulationResult {
    /// Ignited point with `id`, if it burned
    pub fn feature(&self, id: PointId) -> Option<&IgnitedPoint> {
        self.features.iter().find(|f| f.id == id)
    }
}

/// Grid point record for the map listing
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridListingEntry {
    /// Grid point id
    pub id: PointId,
    /// Location as `[lon, lat]`
    pub coordinates: GeoCoord,
    /// Precomputed fuel score, when the provider has one for this point
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuel_score: Option<f64>,
}

/// Wildfire spread prediction service
///
/// Thread-safe: distinct ignition points can be simulated concurrently, and
/// concurrent requests for the same point share one run.
pub struct FireSpreadService {
    grid: Arc<dyn GridPointProvider>,
    weather: Arc<dyn WeatherProvider>,
    stations: Arc<[Station]>,
    config: SpreadConfig,
    cache: Arc<ResultCache>,
}

impl FireSpreadService {
    /// Create a service with its own result cache sized by `config`
    ///
    /// # Errors
    /// Returns [`ConfigError`] if `config` fails validation.
    pub fn new(
        grid: Arc<dyn GridPointProvider>,
        weather: Arc<dyn WeatherProvider>,
        stations: impl Into<Arc<[Station]>>,
        config: SpreadConfig,
    ) -> Result<Self, ConfigError> {
        let cache = Arc::new(ResultCache::new(config.cache_capacity));
        Self::with_cache(grid, weather, stations, config, cache)
    }

    /// Create a service that stores results in an existing cache
    ///
    /// # Errors
    /// Returns [`ConfigError`] if `config` fails validation.
    pub fn with_cache(
        grid: Arc<dyn GridPointProvider>,
        weather: Arc<dyn WeatherProvider>,
        stations: impl Into<Arc<[Station]>>,
        config: SpreadConfig,
        cache: Arc<ResultCache>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let stations = stations.into();
        info!(
            stations = stations.len(),
            cache_capacity = ?config.cache_capacity,
            "fire spread service ready"
        );
        Ok(Self {
            grid,
            weather,
            stations,
            config,
            cache,
        })
    }

    /// Predict fire spread from the grid point `id`
    ///
    /// # Errors
    /// Returns [`SimulationError::NotFound`] if no grid point has `id`, and
    /// [`SimulationError::Provider`] if a data store fails.
    pub fn run_simulation(&self, id: PointId) -> Result<Arc<SimulationResult>, SimulationError> {
        self.cache.get_or_compute(id, || self.simulate(id))
    }

    /// Every grid point with its precomputed fuel score, if available
    ///
    /// # Errors
    /// Returns [`SimulationError::Provider`] if the grid store fails.
    pub fn grid_listing(&self) -> Result<Vec<GridListingEntry>, SimulationError> {
        let points = self.grid.grid_points()?;
        let ratings = self.grid.fuel_ratings()?;

        let listing = points
            .iter()
            .map(|p| GridListingEntry {
                id: p.id,
                coordinates: p.coordinates,
                fuel_score: ratings.as_ref().and_then(|r| r.get(&p.id).copied()),
            })
            .collect::<Vec<_>>();
        debug!(points = listing.len(), rated = ratings.is_some(), "grid listing built");
        Ok(listing)
    }

    /// Result cache shared by this service
    pub fn cache(&self) -> &Arc<ResultCache> {
        &self.cache
    }

    /// Engine configuration
    pub fn config(&self) -> &SpreadConfig {
        &self.config
    }

    /// Registered weather stations
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// Release cached results
    pub fn shutdown(&self) {
        let stats = self.cache.stats();
        info!(
            cached = self.cache.len(),
            hits = stats.hits,
            misses = stats.misses,
            coalesced = stats.coalesced,
            reuse_ratio = stats.reuse_ratio(),
            "shutting down fire spread service"
        );
        self.cache.clear();
    }

    fn simulate(&self, id: PointId) -> Result<SimulationResult, SimulationError> {
        info!(id, "result cache miss, running simulation");
        let started = Instant::now();

        let points = PointSet::new(self.grid.grid_points()?);
        let origin = points.index_of(id).ok_or(SimulationError::NotFound(id))?;
        let weather = resolve_weather(
            self.weather.as_ref(),
            &self.stations,
            points.get(origin).coordinates,
            &self.config.default_weather,
        )?;

        let run = PropagationEngine::new(&points, &weather.snapshot, &self.config).run(origin);
        let features: Vec<IgnitedPoint> = run
            .ignited()
            .filter_map(|(index, state)| {
                let point = points.get(index);
                Some(IgnitedPoint {
                    id: point.id,
                    coordinates: point.coordinates,
                    ignition_time: state.ignition_time()?,
                    burnout_time: state.burnout_time()?,
                    ignited_from: state.ignited_from().map(|from| points.get(from).id),
                })
            })
            .collect();

        let ignited: Vec<(GeoCoord, Seconds)> =
            features.iter().map(|f| (f.coordinates, f.ignition_time)).collect();
        let time_boundaries = generate_boundaries(&ignited, &self.config);

        info!(
            id,
            ignited = features.len(),
            total = points.len(),
            boundaries = time_boundaries.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "simulation complete"
        );
        debug!(id, stats = ?run.stats, "propagation statistics");

        Ok(SimulationResult {
            ignition_id: id,
            features,
            time_boundaries,
            weather,
            stats: run.stats,
        })
    }
}

impl std::fmt::Debug for FireSpreadService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FireSpreadService")
            .field("stations", &self.stations.len())
            .field("config", &self.config)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
