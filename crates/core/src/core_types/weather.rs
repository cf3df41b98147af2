//! Weather inputs for a spread run
//!
//! A run sees exactly one [`WeatherSnapshot`], taken from the station nearest
//! the ignition point before propagation begins. Observations from the live
//! store may be partial; each missing field falls back to its default
//! independently.

use crate::core_types::geodesy::GeoCoord;
use crate::core_types::units::{Degrees, MetersPerSecond, Percent};
use serde::{Deserialize, Serialize};

/// Humidity assumed when the station has no reading
pub const DEFAULT_HUMIDITY: Percent = Percent::new(50.0);
/// Wind speed assumed when the station has no reading
pub const DEFAULT_WIND_SPEED: MetersPerSecond = MetersPerSecond::new(3.0);
/// Wind direction assumed when the station has no reading
pub const DEFAULT_WIND_DIRECTION: Degrees = Degrees::new(0.0);

/// Weather conditions held fixed for the duration of one run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    /// Relative humidity at 2 m
    pub humidity: Percent,
    /// Wind speed at 2 m
    pub wind_speed: MetersPerSecond,
    /// Direction the wind blows from (meteorological convention)
    pub wind_direction: Degrees,
}

impl WeatherSnapshot {
    /// Create a snapshot from raw values
    pub fn new(humidity: f64, wind_speed: f64, wind_direction: f64) -> Self {
        Self {
            humidity: Percent::new(humidity),
            wind_speed: MetersPerSecond::new(wind_speed),
            wind_direction: Degrees::new(wind_direction),
        }
    }

    /// Calm, moderately humid conditions
    pub fn calm() -> Self {
        Self::new(50.0, 0.0, 0.0)
    }
}

impl Default for WeatherSnapshot {
    fn default() -> Self {
        Self {
            humidity: DEFAULT_HUMIDITY,
            wind_speed: DEFAULT_WIND_SPEED,
            wind_direction: DEFAULT_WIND_DIRECTION,
        }
    }
}

/// One record from the live weather store, any field of which may be missing
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    /// Relative humidity at 2 m (%)
    #[serde(default, rename = "hm2m")]
    pub humidity: Option<f64>,
    /// Wind speed at 2 m (m/s)
    #[serde(default, rename = "ws2m")]
    pub wind_speed: Option<f64>,
    /// Wind direction at 2 m (degrees)
    #[serde(default, rename = "wd2m")]
    pub wind_direction: Option<f64>,
}

impl WeatherObservation {
    /// Complete the observation, filling gaps from `defaults`
    pub fn or_defaults(&self, defaults: &WeatherSnapshot) -> WeatherSnapshot {
        WeatherSnapshot {
            humidity: self.humidity.map_or(defaults.humidity, Percent::new),
            wind_speed: self.wind_speed.map_or(defaults.wind_speed, MetersPerSecond::new),
            wind_direction: self
                .wind_direction
                .map_or(defaults.wind_direction, Degrees::new),
        }
    }

    /// True when no field carries a reading
    pub fn is_empty(&self) -> bool {
        self.humidity.is_none() && self.wind_speed.is_none() && self.wind_direction.is_none()
    }
}

/// Mountain weather observation station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    /// Station identifier used as the weather store key
    pub id: String,
    /// Human-readable station name
    pub name: String,
    /// Station location as `[lon, lat]`
    pub coordinates: GeoCoord,
}

impl Station {
    /// Create a station record
    pub fn new(id: impl Into<String>, name: impl Into<String>, coordinates: GeoCoord) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            coordinates,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_observation_fills_each_field() {
        let obs = WeatherObservation {
            humidity: Some(82.0),
            wind_speed: None,
            wind_direction: Some(270.0),
        };
        let snapshot = obs.or_defaults(&WeatherSnapshot::default());
        assert_eq!(*snapshot.humidity, 82.0);
        assert_eq!(*snapshot.wind_speed, 3.0);
        assert_eq!(*snapshot.wind_direction, 270.0);
    }

    #[test]
    fn test_observation_uses_store_field_names() {
        let obs: WeatherObservation =
            serde_json::from_str(r#"{"hm2m": 41.5, "ws2m": 6.2}"#).unwrap();
        assert_eq!(obs.humidity, Some(41.5));
        assert_eq!(obs.wind_speed, Some(6.2));
        assert_eq!(obs.wind_direction, None);
        assert!(!obs.is_empty());
        assert!(WeatherObservation::default().is_empty());
    }
}
