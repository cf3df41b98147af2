//! Terrain grid points

use crate::core_types::geodesy::GeoCoord;
use serde::{Deserialize, Serialize};

/// Identifier of a grid point, unique across the dataset
pub type PointId = u64;

/// Immutable terrain unit supplied by the grid point store
///
/// Classification codes are kept as the store's raw strings. An empty code
/// means the same as an absent one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridPoint {
    /// Unique point identifier
    pub id: PointId,
    /// Location as `[lon, lat]`
    pub coordinates: GeoCoord,
    /// Forest-type (fuel class) code
    #[serde(default)]
    pub fuel_class: Option<String>,
    /// Soil topographic group code (drives the slope factor)
    #[serde(default)]
    pub slope_code: Option<String>,
    /// Soil drainage / land-cover code (drives the moisture factor)
    #[serde(default)]
    pub soil_code: Option<String>,
}

impl GridPoint {
    /// Create a point with no classification codes
    pub fn new(id: PointId, coordinates: GeoCoord) -> Self {
        Self {
            id,
            coordinates,
            fuel_class: None,
            slope_code: None,
            soil_code: None,
        }
    }

    /// Set the fuel class code
    pub fn with_fuel_class(mut self, code: impl Into<String>) -> Self {
        self.fuel_class = Some(code.into());
        self
    }

    /// Set the slope group code
    pub fn with_slope_code(mut self, code: impl Into<String>) -> Self {
        self.slope_code = Some(code.into());
        self
    }

    /// Set the soil drainage code
    pub fn with_soil_code(mut self, code: impl Into<String>) -> Self {
        self.soil_code = Some(code.into());
        self
    }

    /// Fuel class code, with empty strings treated as absent
    pub fn fuel_class(&self) -> Option<&str> {
        non_empty(self.fuel_class.as_deref())
    }

    /// Slope group code, with empty strings treated as absent
    pub fn slope_code(&self) -> Option<&str> {
        non_empty(self.slope_code.as_deref())
    }

    /// Soil drainage code, with empty strings treated as absent
    pub fn soil_code(&self) -> Option<&str> {
        non_empty(self.soil_code.as_deref())
    }
}

fn non_empty(code: Option<&str>) -> Option<&str> {
    code.filter(|c| !c.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_codes_read_as_absent() {
        let point = GridPoint::new(1, GeoCoord::new(127.0, 37.0))
            .with_fuel_class("")
            .with_slope_code("01");
        assert_eq!(point.fuel_class(), None);
        assert_eq!(point.slope_code(), Some("01"));
        assert_eq!(point.soil_code(), None);
    }

    #[test]
    fn test_deserialize_store_record() {
        let json = r#"{"id": 42, "coordinates": [128.1, 35.9], "fuelClass": "1", "soilCode": "82"}"#;
        let point: GridPoint = serde_json::from_str(json).unwrap();
        assert_eq!(point.id, 42);
        assert_eq!(point.coordinates, GeoCoord::new(128.1, 35.9));
        assert_eq!(point.fuel_class(), Some("1"));
        assert_eq!(point.slope_code(), None);
        assert_eq!(point.soil_code(), Some("82"));
    }
}
