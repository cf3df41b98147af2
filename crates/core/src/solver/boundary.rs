//! Boundary Generator
//!
//! Turns the sparse per-point ignition times of a run into a time series of
//! fire-front polygons. The burned area at time `t` is approximated by the
//! convex hull of every point ignited by `t`; with fewer than three points a
//! hull has no area, so each point is drawn as a small geodesic disc instead
//! and the discs are merged.
//!
//! Samples are taken every `boundary_step` from `t = 0` through
//! `max(horizon, latest ignition)` inclusive. A sample whose geometry cannot
//! be built is skipped with a warning; it never fails the run.

use crate::core_types::geodesy::{destination, GeoCoord};
use crate::core_types::units::{Degrees, Seconds};
use crate::error::GeometryError;
use crate::solver::config::SpreadConfig;
use geo::{Area, BooleanOps, ConvexHull, Coord, LineString, MultiPoint, MultiPolygon, Point, Polygon};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Linear ring of `[lon, lat]` positions, first == last
pub type Ring = Vec<GeoCoord>;

/// Fire-front outline shaped like a `GeoJSON` geometry object
///
/// Serializes as `{"type": "Polygon", "coordinates": [...]}` or the
/// `MultiPolygon` equivalent. The first ring of a polygon is its exterior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum BoundaryGeometry {
    Polygon(Vec<Ring>),
    MultiPolygon(Vec<Vec<Ring>>),
}

impl BoundaryGeometry {
    /// Number of disjoint polygons in the outline
    pub fn polygon_count(&self) -> usize {
        match self {
            Self::Polygon(_) => 1,
            Self::MultiPolygon(polygons) => polygons.len(),
        }
    }

    /// Convert back to `geo` types for area and containment queries
    pub fn to_multi_polygon(&self) -> MultiPolygon<f64> {
        match self {
            Self::Polygon(rings) => MultiPolygon::new(vec![rings_to_polygon(rings)]),
            Self::MultiPolygon(polygons) => {
                MultiPolygon::new(polygons.iter().map(|rings| rings_to_polygon(rings)).collect())
            }
        }
    }

    /// Planar area in square degrees
    pub fn area_deg2(&self) -> f64 {
        self.to_multi_polygon().unsigned_area()
    }

    fn from_polygon(polygon: &Polygon<f64>) -> Self {
        Self::Polygon(polygon_to_rings(polygon))
    }

    fn from_multi_polygon(mut multi: MultiPolygon<f64>) -> Self {
        if multi.0.len() == 1 {
            return Self::from_polygon(&multi.0.remove(0));
        }
        Self::MultiPolygon(multi.0.iter().map(polygon_to_rings).collect())
    }
}

/// Fire-front outline at one sample time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeBoundary {
    /// Seconds since ignition
    pub time: Seconds,
    /// Outline of all points ignited by `time`
    pub polygon: BoundaryGeometry,
}

/// Build the boundary time series for a set of ignited points
///
/// `ignited` holds the coordinates and ignition time of every settled point,
/// in any order. Returns one entry per sample that has at least one ignited
/// point and a valid outline, strictly increasing in time.
pub fn generate_boundaries(ignited: &[(GeoCoord, Seconds)], config: &SpreadConfig) -> Vec<TimeBoundary> {
    let mut by_time: Vec<(GeoCoord, Seconds)> = ignited.to_vec();
    by_time.sort_by_key(|&(_, time)| time);

    let latest = by_time.last().map_or(Seconds::ZERO, |&(_, time)| time);
    let end = latest.max(config.horizon);
    let step = *config.boundary_step;
    let samples = (*end / step).floor() as usize;

    let mut boundaries = Vec::with_capacity(samples + 1);
    let mut burning = 0;
    let mut skipped = 0usize;

    for k in 0..=samples {
        let time = Seconds::new(k as f64 * step);
        while burning < by_time.len() && by_time[burning].1 <= time {
            burning += 1;
        }
        if burning == 0 {
            continue;
        }

        let points: Vec<GeoCoord> = by_time[..burning].iter().map(|&(coord, _)| coord).collect();
        match outline(&points, config) {
            Ok(polygon) => boundaries.push(TimeBoundary { time, polygon }),
            Err(e) => {
                warn!(time = *time, points = burning, "boundary sample skipped: {}", e);
                skipped += 1;
            }
        }
    }

    debug!(samples = boundaries.len(), skipped, "boundary series generated");
    boundaries
}

/// Outline of a non-empty set of burning points
fn outline(points: &[GeoCoord], config: &SpreadConfig) -> Result<BoundaryGeometry, GeometryError> {
    if points.len() >= 3 {
        convex_outline(points)
    } else {
        buffered_outline(points, config)
    }
}

fn convex_outline(points: &[GeoCoord]) -> Result<BoundaryGeometry, GeometryError> {
    let cloud: MultiPoint<f64> = points.iter().map(|c| Point::new(c.lon, c.lat)).collect();
    let hull = cloud.convex_hull();

    let area = hull.unsigned_area();
    if !(area.is_finite() && area > 0.0) {
        return Err(GeometryError::DegenerateHull {
            points: points.len(),
        });
    }
    Ok(BoundaryGeometry::from_polygon(&hull))
}

fn buffered_outline(points: &[GeoCoord], config: &SpreadConfig) -> Result<BoundaryGeometry, GeometryError> {
    let mut discs = points.iter().map(|&center| buffer_disc(center, config));
    let Some(first) = discs.next() else {
        return Err(GeometryError::EmptyUnion { discs: 0 });
    };

    let merged = discs.fold(MultiPolygon::new(vec![first]), |acc, disc| {
        acc.union(&MultiPolygon::new(vec![disc]))
    });

    if merged.0.is_empty() || merged.unsigned_area() <= 0.0 {
        return Err(GeometryError::EmptyUnion {
            discs: points.len(),
        });
    }
    Ok(BoundaryGeometry::from_multi_polygon(merged))
}

/// Geodesic disc of `buffer_radius` around `center`, counter-clockwise
fn buffer_disc(center: GeoCoord, config: &SpreadConfig) -> Polygon<f64> {
    let segments = config.buffer_segments;
    let ring: Vec<Coord<f64>> = (0..segments)
        .rev()
        .map(|i| {
            let bearing = Degrees::new(360.0 * i as f64 / segments as f64);
            let vertex = destination(center, config.buffer_radius, bearing);
            Coord {
                x: vertex.lon,
                y: vertex.lat,
            }
        })
        .collect();
    // Polygon::new closes the ring
    Polygon::new(LineString::new(ring), Vec::new())
}

fn polygon_to_rings(polygon: &Polygon<f64>) -> Vec<Ring> {
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .map(|ring| ring.coords().map(|c| GeoCoord::new(c.x, c.y)).collect())
        .collect()
}

fn rings_to_polygon(rings: &[Ring]) -> Polygon<f64> {
    let to_line = |ring: &Ring| -> LineString<f64> {
        ring.iter().map(|c| Coord { x: c.lon, y: c.lat }).collect()
    };
    let mut rings = rings.iter().map(to_line);
    let exterior = rings.next().unwrap_or_else(|| LineString::new(Vec::new()));
    Polygon::new(exterior, rings.collect())
}
