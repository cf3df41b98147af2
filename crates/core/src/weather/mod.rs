//! Weather Context Resolver
//!
//! Picks the station nearest the ignition point and fetches its latest
//! observation. The selection policy is part of the engine contract: the
//! station with the smallest geodesic distance wins, and on an exact tie the
//! one listed first.
//!
//! Missing data degrades a run instead of failing it. With no stations, no
//! observation, or an observation with no readings, the run proceeds on the
//! configured default weather and the result says so. An unreachable store is
//! a real failure and is returned as an error.

use crate::core_types::geodesy::{haversine_distance, GeoCoord};
use crate::core_types::weather::{Station, WeatherSnapshot};
use crate::error::ProviderError;
use crate::provider::WeatherProvider;
use serde::Serialize;
use tracing::{info, warn};

/// Where the weather of a run came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum WeatherSource {
    /// Observation from the nearest station; absent fields use defaults
    Observed,
    /// Defaults used throughout
    Defaulted { reason: String },
}

impl WeatherSource {
    /// True when the run used default weather throughout
    pub fn is_defaulted(&self) -> bool {
        matches!(self, Self::Defaulted { .. })
    }
}

/// Weather context of one run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedWeather {
    /// Station the weather was taken from
    pub station: Option<Station>,
    /// Conditions used for the whole run
    #[serde(flatten)]
    pub snapshot: WeatherSnapshot,
    /// Provenance of `snapshot`
    pub source: WeatherSource,
}

/// Station nearest to `at`, first listed on ties
pub fn nearest_station(stations: &[Station], at: GeoCoord) -> Option<&Station> {
    let mut best: Option<(&Station, f64)> = None;
    for station in stations {
        let distance = *haversine_distance(at, station.coordinates);
        let closer = match best {
            Some((_, nearest)) => distance < nearest,
            None => true,
        };
        if closer {
            best = Some((station, distance));
        }
    }
    best.map(|(station, _)| station)
}

/// Resolve the weather snapshot for an ignition at `at`
///
/// # Errors
/// Returns [`ProviderError`] only when the weather store itself fails.
pub fn resolve_weather(
    provider: &dyn WeatherProvider,
    stations: &[Station],
    at: GeoCoord,
    defaults: &WeatherSnapshot,
) -> Result<ResolvedWeather, ProviderError> {
    let Some(station) = nearest_station(stations, at) else {
        return Ok(degraded(None, *defaults, "no weather stations registered".to_string()));
    };

    let resolved = match provider.latest_observation(&station.id)? {
        Some(observation) if !observation.is_empty() => ResolvedWeather {
            station: Some(station.clone()),
            snapshot: observation.or_defaults(defaults),
            source: WeatherSource::Observed,
        },
        Some(_) => degraded(
            Some(station.clone()),
            *defaults,
            format!("observation for station {} has no readings", station.id),
        ),
        None => degraded(
            Some(station.clone()),
            *defaults,
            format!("no observation for station {}", station.id),
        ),
    };

    if !resolved.source.is_defaulted() {
        info!(
            station = %station.name,
            humidity = *resolved.snapshot.humidity,
            wind_speed = *resolved.snapshot.wind_speed,
            wind_direction = *resolved.snapshot.wind_direction,
            "weather resolved"
        );
    }
    Ok(resolved)
}

fn degraded(station: Option<Station>, defaults: WeatherSnapshot, reason: String) -> ResolvedWeather {
    warn!(%reason, "using default weather");
    ResolvedWeather {
        station,
        snapshot: defaults,
        source: WeatherSource::Defaulted { reason },
    }
}
