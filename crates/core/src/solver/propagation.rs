//! Propagation Engine
//!
//! Discrete-event fire spread over the grid point graph. Points move one way
//! from unreached to ignited, and a point is settled by the first predecessor
//! that reaches it: later discoveries never revise an ignition time, even a
//! shorter one. Events are processed in ascending ignition time.
//!
//! # Algorithm
//! 1. Settle the origin at t = 0 and queue it
//! 2. Pop the earliest settled point P; past the horizon it is not expanded
//! 3. For every unreached neighbor N of P:
//!    - no fuel at N: skip
//!    - gap wider than the firebreak distance without strong wind: skip
//!    - ROS = fuel × slope × moisture × wind, with slope and moisture
//!      square-rooted for spotting jumps across a firebreak
//!    - ROS below the minimum: skip
//!    - settle N at `P + d·3600/ROS` and queue it
//! 4. Stop when the queue is empty
//!
//! Each point is settled and queued at most once, so a run always terminates.

use crate::core_types::grid_point::GridPoint;
use crate::core_types::geodesy::initial_bearing;
use crate::core_types::units::{Kilometers, Seconds};
use crate::core_types::weather::WeatherSnapshot;
use crate::grid::PointSet;
use crate::physics::{burnout_duration, fuel_score, moisture_factor, slope_factor, wind_factor};
use crate::solver::config::SpreadConfig;
use crate::solver::event_queue::EventQueue;
use serde::Serialize;
use tracing::{debug, trace};

/// State of one grid point within one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimPointState {
    ignition_time: Option<Seconds>,
    burnout_time: Option<Seconds>,
    #[serde(skip)]
    ignited_from: Option<usize>,
}

impl SimPointState {
    /// Seconds from ignition until this point catches fire
    pub fn ignition_time(&self) -> Option<Seconds> {
        self.ignition_time
    }

    /// Seconds from ignition until this point stops burning
    pub fn burnout_time(&self) -> Option<Seconds> {
        self.burnout_time
    }

    /// Index of the point that ignited this one (`None` for the origin)
    pub fn ignited_from(&self) -> Option<usize> {
        self.ignited_from
    }

    /// True once an ignition time has been assigned
    pub fn is_settled(&self) -> bool {
        self.ignition_time.is_some()
    }

    /// Assign ignition and burnout together, once
    ///
    /// Returns `false` and leaves the state untouched if the point is
    /// already settled.
    pub fn settle(&mut self, ignition: Seconds, burnout: Seconds, from: Option<usize>) -> bool {
        if self.is_settled() {
            return false;
        }
        self.ignition_time = Some(ignition);
        self.burnout_time = Some(burnout.max(ignition));
        self.ignited_from = from;
        true
    }
}

/// Counters describing one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropagationStats {
    /// Points assigned an ignition time (origin included)
    pub settled: usize,
    /// Points whose neighbors were examined
    pub expanded: usize,
    /// Points not expanded because they ignite after the horizon
    pub beyond_horizon: usize,
    /// Neighbor visits to points that were already burning
    pub already_settled: usize,
    /// Neighbors skipped for lack of fuel
    pub no_fuel: usize,
    /// Neighbors behind a firebreak the wind could not cross
    pub firebreak: usize,
    /// Neighbors where the rate of spread was too weak
    pub weak_spread: usize,
    /// Ignitions by embers jumping a firebreak
    pub spotting_jumps: usize,
}

/// Outcome of a completed run
#[derive(Debug, Clone)]
pub struct Propagation {
    /// Index of the ignition point
    pub origin: usize,
    /// Final state of every point, in dataset order
    pub states: Vec<SimPointState>,
    /// Run counters
    pub stats: PropagationStats,
}

impl Propagation {
    /// Settled points as `(index, state)` in dataset order
    pub fn ignited(&self) -> impl Iterator<Item = (usize, &SimPointState)> + '_ {
        self.states
            .iter()
            .enumerate()
            .filter(|(_, state)| state.is_settled())
    }

    /// Latest ignition time of any settled point
    pub fn max_ignition_time(&self) -> Seconds {
        self.ignited()
            .filter_map(|(_, state)| state.ignition_time())
            .max()
            .unwrap_or(Seconds::ZERO)
    }
}

/// Result of trying to carry fire from one point to a neighbor
#[derive(Debug, Clone, Copy, PartialEq)]
enum SpreadAttempt {
    Ignites {
        travel_time: Seconds,
        fuel: f64,
        spotting: bool,
    },
    NoFuel,
    Firebreak,
    WeakSpread,
}

/// Fire spread simulator over a read-only point set
///
/// Neighbors of each expanded point are searched with
/// `config.neighbor_search`.
pub struct PropagationEngine<'a> {
    points: &'a PointSet,
    weather: &'a WeatherSnapshot,
    config: &'a SpreadConfig,
}

impl<'a> PropagationEngine<'a> {
    /// Create an engine for one weather snapshot
    pub fn new(points: &'a PointSet, weather: &'a WeatherSnapshot, config: &'a SpreadConfig) -> Self {
        Self {
            points,
            weather,
            config,
        }
    }

    /// Run to completion from the point at index `origin`
    pub fn run(&self, origin: usize) -> Propagation {
        let humidity = self.weather.humidity;
        let mut states = vec![SimPointState::default(); self.points.len()];
        let mut stats = PropagationStats::default();
        let mut queue = EventQueue::new();

        let origin_fuel = fuel_score(self.points.get(origin).fuel_class());
        let origin_burnout = burnout_duration(origin_fuel, humidity, Kilometers::new(0.0));
        states[origin].settle(Seconds::ZERO, origin_burnout, None);
        stats.settled += 1;
        queue.push(origin, Seconds::ZERO);

        while let Some(event) = queue.pop() {
            if event.time > self.config.horizon {
                trace!(point = self.points.get(event.index).id, time = *event.time, "beyond horizon");
                stats.beyond_horizon += 1;
                continue;
            }
            stats.expanded += 1;

            let source = self.points.get(event.index);
            for neighbor in self.points.neighbors(event.index, &self.config.neighbor_search) {
                if states[neighbor.index].is_settled() {
                    stats.already_settled += 1;
                    continue;
                }

                let target = self.points.get(neighbor.index);
                match self.attempt_spread(source, target, neighbor.distance) {
                    SpreadAttempt::Ignites {
                        travel_time,
                        fuel,
                        spotting,
                    } => {
                        let ignition = event.time + travel_time;
                        let burnout =
                            ignition + burnout_duration(fuel, humidity, neighbor.distance);
                        states[neighbor.index].settle(ignition, burnout, Some(event.index));
                        queue.push(neighbor.index, ignition);

                        stats.settled += 1;
                        if spotting {
                            stats.spotting_jumps += 1;
                        }
                        trace!(
                            from = source.id,
                            to = target.id,
                            ignition = *ignition,
                            spotting,
                            "ignited"
                        );
                    }
                    SpreadAttempt::NoFuel => stats.no_fuel += 1,
                    SpreadAttempt::Firebreak => {
                        trace!(from = source.id, to = target.id, distance = *neighbor.distance, "firebreak");
                        stats.firebreak += 1;
                    }
                    SpreadAttempt::WeakSpread => stats.weak_spread += 1,
                }
            }
        }

        debug!(?stats, "propagation finished");

        Propagation {
            origin,
            states,
            stats,
        }
    }

    /// Decide whether fire crosses from `source` to `target`, and how fast
    fn attempt_spread(&self, source: &GridPoint, target: &GridPoint, distance: Kilometers) -> SpreadAttempt {
        let fuel = fuel_score(target.fuel_class());
        if fuel == 0.0 {
            return SpreadAttempt::NoFuel;
        }

        let spotting = distance > self.config.firebreak_distance;
        if spotting && self.weather.wind_speed < self.config.strong_wind {
            return SpreadAttempt::Firebreak;
        }

        let bearing = initial_bearing(source.coordinates, target.coordinates);
        let mut slope = slope_factor(target.slope_code());
        let mut moisture = moisture_factor(target.soil_code(), self.weather.humidity);
        let wind = wind_factor(self.weather.wind_speed, self.weather.wind_direction, bearing);

        // Embers crossing open ground feel the terrain less
        if spotting {
            slope = slope.sqrt();
            moisture = moisture.sqrt();
        }

        let rate_of_spread = fuel * slope * moisture * wind;
        if rate_of_spread < self.config.min_rate_of_spread {
            return SpreadAttempt::WeakSpread;
        }

        SpreadAttempt::Ignites {
            travel_time: Seconds::new(*distance * 3600.0 / rate_of_spread),
            fuel,
            spotting,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::geodesy::{haversine_distance, GeoCoord};
    use crate::solver::config::NeighborSearch;
    use approx::assert_relative_eq;

    fn line_of_points(spacing_deg: f64, fuel: &[Option<&str>]) -> PointSet {
        let points: Vec<GridPoint> = fuel
            .iter()
            .enumerate()
            .map(|(i, code)| {
                let p = GridPoint::new(i as u64, GeoCoord::new(127.0, 37.0 + i as f64 * spacing_deg));
                match code {
                    Some(c) => p.with_fuel_class(*c),
                    None => p,
                }
            })
            .collect();
        PointSet::new(points.into())
    }

    #[test]
    fn test_settle_only_once() {
        let mut state = SimPointState::default();
        assert!(state.settle(Seconds::new(10.0), Seconds::new(20.0), Some(3)));
        assert!(!state.settle(Seconds::new(5.0), Seconds::new(6.0), Some(4)));
        assert_eq!(state.ignition_time(), Some(Seconds::new(10.0)));
        assert_eq!(state.burnout_time(), Some(Seconds::new(20.0)));
        assert_eq!(state.ignited_from(), Some(3));
    }

    #[test]
    fn test_origin_settles_at_zero_even_without_neighbors() {
        let points = line_of_points(0.005, &[Some("1")]);
        let weather = WeatherSnapshot::calm();
        let config = SpreadConfig::default();
        let run = PropagationEngine::new(&points, &weather, &config).run(0);

        let origin = run.states[0];
        assert_eq!(origin.ignition_time(), Some(Seconds::ZERO));
        assert_eq!(origin.burnout_time(), Some(Seconds::new(6000.0)));
        assert_eq!(origin.ignited_from(), None);
        assert_eq!(run.stats.settled, 1);
        assert_eq!(run.max_ignition_time(), Seconds::ZERO);
    }

    #[test]
    fn test_travel_time_on_a_line() {
        // ~0.556 km apart due north, calm air, conifer fuel: ROS 5
        let points = line_of_points(0.005, &[Some("1"), Some("1")]);
        let weather = WeatherSnapshot::calm();
        let config = SpreadConfig::default();
        let run = PropagationEngine::new(&points, &weather, &config).run(0);

        let d = haversine_distance(points.get(0).coordinates, points.get(1).coordinates);
        let ignition = run.states[1].ignition_time().unwrap();
        assert_relative_eq!(*ignition, *d * 3600.0 / 5.0, max_relative = 1e-12);
        assert_relative_eq!(
            *run.states[1].burnout_time().unwrap(),
            *ignition + 6000.0,
            max_relative = 1e-12
        );
        assert_eq!(run.states[1].ignited_from(), Some(0));
    }

    #[test]
    fn test_weak_spread_dies_out() {
        // Bamboo (2) on flat ground (0.5) in wet air (0.4): ROS 0.4
        let points: Vec<GridPoint> = vec![
            GridPoint::new(0, GeoCoord::new(127.0, 37.0)).with_fuel_class("1"),
            GridPoint::new(1, GeoCoord::new(127.0, 37.005))
                .with_fuel_class("4")
                .with_slope_code("10"),
        ];
        let points = PointSet::new(points.into());
        let weather = WeatherSnapshot::new(90.0, 0.0, 180.0);
        let config = SpreadConfig::default();
        let run = PropagationEngine::new(&points, &weather, &config).run(0);

        assert!(!run.states[1].is_settled());
        assert_eq!(run.stats.weak_spread, 1);
    }

    #[test]
    fn test_non_combustible_soil_blocks_spread() {
        let points: Vec<GridPoint> = vec![
            GridPoint::new(0, GeoCoord::new(127.0, 37.0)).with_fuel_class("1"),
            GridPoint::new(1, GeoCoord::new(127.0, 37.005))
                .with_fuel_class("1")
                .with_soil_code("91"),
        ];
        let points = PointSet::new(points.into());
        let weather = WeatherSnapshot::calm();
        let config = SpreadConfig::default();
        let run = PropagationEngine::new(&points, &weather, &config).run(0);

        assert!(!run.states[1].is_settled());
        assert_eq!(run.stats.weak_spread, 1);
    }

    #[test]
    fn test_horizon_stops_expansion() {
        // Five points ~0.556 km apart with a tiny horizon: the origin
        // expands, its neighbor settles past the horizon and goes no further
        let points = line_of_points(0.005, &[Some("1"); 5]);
        let weather = WeatherSnapshot::calm();
        let config = SpreadConfig {
            horizon: Seconds::new(60.0),
            neighbor_search: NeighborSearch {
                max_distance: Kilometers::new(0.6),
                ..NeighborSearch::default()
            },
            ..SpreadConfig::default()
        };
        let run = PropagationEngine::new(&points, &weather, &config).run(0);

        assert!(run.states[1].is_settled());
        assert!(!run.states[2].is_settled());
        assert_eq!(run.stats.expanded, 1);
        assert_eq!(run.stats.beyond_horizon, 1);
    }

    #[test]
    fn test_first_settlement_wins_over_shorter_path() {
        // Origin 0 reaches 1 (near) and 2 (far, slow fuel) directly. The
        // path 0 -> 1 -> 2 would be quicker, but 2 was settled first.
        let points: Vec<GridPoint> = vec![
            GridPoint::new(0, GeoCoord::new(127.0, 37.0)).with_fuel_class("1"),
            GridPoint::new(1, GeoCoord::new(127.0, 37.004)).with_fuel_class("1"),
            GridPoint::new(2, GeoCoord::new(127.0, 37.008)).with_fuel_class("4"),
        ];
        let points = PointSet::new(points.into());
        let weather = WeatherSnapshot::calm();
        let config = SpreadConfig::default();
        let run = PropagationEngine::new(&points, &weather, &config).run(0);

        assert_eq!(run.states[2].ignited_from(), Some(0));
        assert!(run.states[1].ignition_time() < run.states[2].ignition_time());
        // Points 1 and 2 each find both other points already burning
        assert_eq!(run.stats.already_settled, 4);
    }
}
