//! Data providers consumed by the spread service
//!
//! The service never talks to a database or weather feed directly. It reads
//! grid points and observations through these traits, once per run, before
//! propagation starts. The in-memory implementations back the tests and the
//! command-line driver, and can be loaded from the same JSON record shapes
//! the production stores hold.

use crate::core_types::grid_point::{GridPoint, PointId};
use crate::core_types::weather::{Station, WeatherObservation};
use crate::error::ProviderError;
use crate::grid::fuel_ratings::{ratings_by_id, FuelRating};
use rustc_hash::FxHashMap;
use std::io::Read;
use std::sync::Arc;

/// Source of the static grid point dataset
pub trait GridPointProvider: Send + Sync {
    /// Every grid point, in dataset order
    ///
    /// # Errors
    /// Returns [`ProviderError`] when the store cannot be read.
    fn grid_points(&self) -> Result<Arc<[GridPoint]>, ProviderError>;

    /// Precomputed fuel scores by point id, if the store has them
    ///
    /// # Errors
    /// Returns [`ProviderError`] when the store cannot be read.
    fn fuel_ratings(&self) -> Result<Option<FxHashMap<PointId, f64>>, ProviderError> {
        Ok(None)
    }
}

/// Source of live weather observations keyed by station id
pub trait WeatherProvider: Send + Sync {
    /// Most recent observation for `station_id`, or `None` if it has none
    ///
    /// # Errors
    /// Returns [`ProviderError`] when the store is unreachable. A station
    /// without data is `Ok(None)`, not an error.
    fn latest_observation(&self, station_id: &str) -> Result<Option<WeatherObservation>, ProviderError>;
}

/// Grid points held in memory
#[derive(Debug, Clone)]
pub struct InMemoryGridProvider {
    points: Arc<[GridPoint]>,
    ratings: Option<FxHashMap<PointId, f64>>,
}

impl InMemoryGridProvider {
    /// Serve `points` as the grid dataset
    pub fn new(points: impl Into<Arc<[GridPoint]>>) -> Self {
        Self {
            points: points.into(),
            ratings: None,
        }
    }

    /// Read a JSON array of grid point records
    ///
    /// # Errors
    /// Returns [`ProviderError`] if the reader fails or the JSON does not
    /// describe grid points.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, ProviderError> {
        let points: Vec<GridPoint> = serde_json::from_reader(reader)?;
        Ok(Self::new(points))
    }

    /// Attach precomputed fuel ratings for the grid listing
    pub fn with_fuel_ratings(mut self, ratings: &[FuelRating]) -> Self {
        self.ratings = Some(ratings_by_id(ratings));
        self
    }
}

impl GridPointProvider for InMemoryGridProvider {
    fn grid_points(&self) -> Result<Arc<[GridPoint]>, ProviderError> {
        Ok(Arc::clone(&self.points))
    }

    fn fuel_ratings(&self) -> Result<Option<FxHashMap<PointId, f64>>, ProviderError> {
        Ok(self.ratings.clone())
    }
}

/// Weather observations held in memory, keyed by station id
#[derive(Debug, Clone, Default)]
pub struct InMemoryWeatherProvider {
    observations: FxHashMap<String, WeatherObservation>,
}

impl InMemoryWeatherProvider {
    /// Create a provider with no observations
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the observation for `station_id`
    pub fn with_observation(mut self, station_id: impl Into<String>, observation: WeatherObservation) -> Self {
        self.insert(station_id, observation);
        self
    }

    /// Add or replace the observation for `station_id`
    pub fn insert(&mut self, station_id: impl Into<String>, observation: WeatherObservation) {
        self.observations.insert(station_id.into(), observation);
    }

    /// Read a JSON object mapping station ids to observation records
    ///
    /// ```json
    /// { "1910": { "hm2m": 48.2, "ws2m": 2.7, "wd2m": 225.0 } }
    /// ```
    ///
    /// # Errors
    /// Returns [`ProviderError`] if the reader fails or the JSON is malformed.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, ProviderError> {
        let observations: FxHashMap<String, WeatherObservation> = serde_json::from_reader(reader)?;
        Ok(Self { observations })
    }

    /// Number of stations with an observation
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// True when no station has an observation
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

impl WeatherProvider for InMemoryWeatherProvider {
    fn latest_observation(&self, station_id: &str) -> Result<Option<WeatherObservation>, ProviderError> {
        Ok(self.observations.get(station_id).copied())
    }
}

/// Read a JSON array of weather station records
///
/// # Errors
/// Returns [`ProviderError`] if the reader fails or the JSON is malformed.
pub fn load_stations<R: Read>(reader: R) -> Result<Vec<Station>, ProviderError> {
    Ok(serde_json::from_reader(reader)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::geodesy::GeoCoord;
    use crate::grid::fuel_ratings::compute_fuel_ratings;

    #[test]
    fn test_grid_from_json() {
        let json = r#"[
            {"id": 1, "coordinates": [127.0, 37.0], "fuelClass": "1", "slopeCode": "01", "soilCode": "03"},
            {"id": 2, "coordinates": [127.01, 37.0]}
        ]"#;
        let provider = InMemoryGridProvider::from_json_reader(json.as_bytes()).unwrap();
        let points = provider.grid_points().unwrap();

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].fuel_class(), Some("1"));
        assert_eq!(points[1].coordinates, GeoCoord::new(127.01, 37.0));
        assert_eq!(points[1].soil_code(), None);
        assert!(provider.fuel_ratings().unwrap().is_none());
    }

    #[test]
    fn test_malformed_grid_is_an_error() {
        let err = InMemoryGridProvider::from_json_reader(&b"[{\"id\": \"x\"}]"[..]).unwrap_err();
        assert!(matches!(err, ProviderError::Malformed(_)));
    }

    #[test]
    fn test_ratings_attach_to_listing() {
        let points = vec![GridPoint::new(5, GeoCoord::new(127.0, 37.0)).with_fuel_class("2")];
        let ratings = compute_fuel_ratings(&points);
        let provider = InMemoryGridProvider::new(points).with_fuel_ratings(&ratings);

        let by_id = provider.fuel_ratings().unwrap().unwrap();
        assert_eq!(by_id.get(&5), Some(&3.0));
    }

    #[test]
    fn test_weather_from_json() {
        let json = r#"{"1910": {"hm2m": 48.2, "ws2m": 2.7}, "2005": {}}"#;
        let provider = InMemoryWeatherProvider::from_json_reader(json.as_bytes()).unwrap();

        assert_eq!(provider.len(), 2);
        let obs = provider.latest_observation("1910").unwrap().unwrap();
        assert_eq!(obs.humidity, Some(48.2));
        assert_eq!(obs.wind_direction, None);
        assert!(provider.latest_observation("2005").unwrap().unwrap().is_empty());
        assert_eq!(provider.latest_observation("9999").unwrap(), None);
    }

    #[test]
    fn test_load_stations() {
        let json = r#"[{"id": "1910", "name": "Gwanaksan", "coordinates": [126.96, 37.44]}]"#;
        let stations = load_stations(json.as_bytes()).unwrap();
        assert_eq!(stations, vec![Station::new("1910", "Gwanaksan", GeoCoord::new(126.96, 37.44))]);
    }
}
