//! Shared fixtures for the integration test suites
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use wildfire_spread_core::core_types::geodesy::EARTH_RADIUS_KM;
use wildfire_spread_core::{
    FireSpreadService, GeoCoord, GridPoint, GridPointProvider, InMemoryGridProvider,
    InMemoryWeatherProvider, ProviderError, SpreadConfig, Station, WeatherObservation,
};

/// Route engine logs to the test harness (`RUST_LOG=debug cargo test`)
#[ctor::ctor]
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Degrees of arc spanning `km` on the mean earth sphere
pub fn km_to_degrees(km: f64) -> f64 {
    (km / EARTH_RADIUS_KM).to_degrees()
}

/// `size × size` grid centered on `center`, ids row-major from 0
///
/// Spacing is `spacing_km` along both axes measured at the center row and
/// column, so the center's four orthogonal neighbors are equidistant when
/// `center` is on the equator.
pub fn square_grid(size: usize, spacing_km: f64, center: GeoCoord, fuel_class: &str) -> Vec<GridPoint> {
    let step = km_to_degrees(spacing_km);
    let half = (size / 2) as f64;
    let mut points = Vec::with_capacity(size * size);
    for row in 0..size {
        for col in 0..size {
            let id = (row * size + col) as u64;
            let coord = GeoCoord::new(
                center.lon + (col as f64 - half) * step,
                center.lat + (row as f64 - half) * step,
            );
            points.push(GridPoint::new(id, coord).with_fuel_class(fuel_class));
        }
    }
    points
}

/// One station at `at` reporting the given conditions
pub fn station_reporting(at: GeoCoord, humidity: f64, wind_speed: f64, wind_direction: f64) -> (Vec<Station>, InMemoryWeatherProvider) {
    let stations = vec![Station::new("STN-1", "Test Ridge", at)];
    let weather = InMemoryWeatherProvider::new().with_observation(
        "STN-1",
        WeatherObservation {
            humidity: Some(humidity),
            wind_speed: Some(wind_speed),
            wind_direction: Some(wind_direction),
        },
    );
    (stations, weather)
}

/// Service over `points` with a single station at the first point
pub fn service(points: Vec<GridPoint>, humidity: f64, wind_speed: f64, wind_direction: f64) -> FireSpreadService {
    let at = points[0].coordinates;
    let (stations, weather) = station_reporting(at, humidity, wind_speed, wind_direction);
    FireSpreadService::new(
        Arc::new(InMemoryGridProvider::new(points)),
        Arc::new(weather),
        stations,
        SpreadConfig::default(),
    )
    .unwrap()
}

/// Grid provider that counts how often the grid is loaded
pub struct CountingGrid {
    inner: InMemoryGridProvider,
    loads: AtomicUsize,
}

impl CountingGrid {
    pub fn new(points: Vec<GridPoint>) -> Self {
        Self {
            inner: InMemoryGridProvider::new(points),
            loads: AtomicUsize::new(0),
        }
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl GridPointProvider for CountingGrid {
    fn grid_points(&self) -> Result<Arc<[GridPoint]>, ProviderError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.inner.grid_points()
    }
}

/// Grid provider whose store is always down
pub struct OfflineGrid;

impl GridPointProvider for OfflineGrid {
    fn grid_points(&self) -> Result<Arc<[GridPoint]>, ProviderError> {
        Err(ProviderError::GridUnavailable {
            reason: "connection pool exhausted".to_string(),
        })
    }
}
