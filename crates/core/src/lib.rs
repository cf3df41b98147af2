//! Wildfire Spread Core Library
//!
//! Predicts how a wildfire spreads across a fixed grid of terrain points from
//! a single ignition point, and renders that spread as a time series of
//! fire-front polygons.
//!
//! ## Pipeline
//!
//! - **Spread factors** map fuel, slope, soil and wind to a rate of spread
//! - **Point set** answers nearest-neighbor queries over the grid
//! - **Weather resolver** picks the nearest station's latest observation
//! - **Propagation engine** settles ignition and burnout times event by event
//! - **Boundary generator** samples fire-front outlines every ten minutes
//! - **Result cache** shares completed runs between requests
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use wildfire_spread_core::{
//!     FireSpreadService, InMemoryGridProvider, InMemoryWeatherProvider, SpreadConfig,
//! };
//!
//! let service = FireSpreadService::new(
//!     Arc::new(InMemoryGridProvider::new(points)),
//!     Arc::new(InMemoryWeatherProvider::new()),
//!     stations,
//!     SpreadConfig::default(),
//! )?;
//! let result = service.run_simulation(ignition_id)?;
//! println!("{} points burned", result.features.len());
//! ```

// Core types and utilities
pub mod core_types;
pub mod error;

// Spread model
pub mod grid;
pub mod physics;
pub mod solver;

// Service layer
pub mod provider;
pub mod simulation;
pub mod weather;

// Re-export core types
pub use core_types::{GeoCoord, GridPoint, PointId, Station, WeatherObservation, WeatherSnapshot};
pub use core_types::{Degrees, Kilometers, MetersPerSecond, Percent, Seconds};
pub use error::{ConfigError, GeometryError, ProviderError, SimulationError};

// Re-export spread model types
pub use grid::{compute_fuel_ratings, FuelRating, PointSet};
pub use solver::{BoundaryGeometry, PropagationStats, SpreadConfig, TimeBoundary};

// Re-export service types
pub use provider::{load_stations, GridPointProvider, InMemoryGridProvider, InMemoryWeatherProvider, WeatherProvider};
pub use simulation::{CacheStats, FireSpreadService, GridListingEntry, IgnitedPoint, ResultCache, SimulationResult};
pub use weather::{ResolvedWeather, WeatherSource};
