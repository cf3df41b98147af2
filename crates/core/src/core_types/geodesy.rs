//! Spherical-earth geodesy for grid points
//!
//! Great-circle distance, initial bearing and destination projection on a
//! sphere of mean earth radius. Grid spacing is on the order of a kilometre,
//! so the spherical model is well within the accuracy of the spread model.

use crate::core_types::units::{Degrees, Kilometers};
use serde::{Deserialize, Serialize};

/// Mean earth radius in kilometres (IUGG)
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Geographic coordinate in degrees
///
/// Serialized as a `[lon, lat]` pair, matching `GeoJSON` position order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct GeoCoord {
    /// Longitude in degrees (east positive)
    pub lon: f64,
    /// Latitude in degrees (north positive)
    pub lat: f64,
}

impl GeoCoord {
    /// Create a coordinate from longitude and latitude
    #[must_use]
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

impl From<[f64; 2]> for GeoCoord {
    fn from([lon, lat]: [f64; 2]) -> Self {
        Self { lon, lat }
    }
}

impl From<GeoCoord> for [f64; 2] {
    fn from(c: GeoCoord) -> Self {
        [c.lon, c.lat]
    }
}

/// Great-circle distance between two coordinates (haversine formula)
#[must_use]
pub fn haversine_distance(from: GeoCoord, to: GeoCoord) -> Kilometers {
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lon = (to.lon - from.lon).to_radians();
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + (d_lon / 2.0).sin().powi(2) * lat1.cos() * lat2.cos();
    let central_angle = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    Kilometers::new(central_angle * EARTH_RADIUS_KM)
}

/// Initial compass bearing from one coordinate toward another
///
/// Returns degrees in (-180, 180], 0 = north, 90 = east.
///
/// # Example
/// ```
/// use wildfire_spread_core::core_types::geodesy::{initial_bearing, GeoCoord};
///
/// let bearing = initial_bearing(GeoCoord::new(0.0, 0.0), GeoCoord::new(1.0, 0.0));
/// assert!((*bearing - 90.0).abs() < 1e-9);
/// ```
#[must_use]
pub fn initial_bearing(from: GeoCoord, to: GeoCoord) -> Degrees {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let d_lon = (to.lon - from.lon).to_radians();

    let y = d_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();

    Degrees::new(y.atan2(x).to_degrees())
}

/// Project a coordinate along a great circle
///
/// # Arguments
/// * `origin` - Starting coordinate
/// * `distance` - Distance to travel
/// * `bearing` - Initial compass bearing
#[must_use]
pub fn destination(origin: GeoCoord, distance: Kilometers, bearing: Degrees) -> GeoCoord {
    let lat1 = origin.lat.to_radians();
    let lon1 = origin.lon.to_radians();
    let theta = bearing.to_radians();
    let delta = *distance / EARTH_RADIUS_KM;

    let lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * theta.cos()).asin();
    let lon2 = lon1
        + (theta.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * lat2.sin());

    GeoCoord::new(lon2.to_degrees(), lat2.to_degrees())
}
