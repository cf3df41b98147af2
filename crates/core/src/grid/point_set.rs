//! Indexed grid point set with neighbor search
//!
//! Neighbor candidates for a point P are the points strictly inside the box
//! `P ± box_radius_deg` on both axes (P's id excluded), at a geodesic
//! distance `0 < d < max_distance`, nearest first with ties kept in dataset
//! order, capped at `max_neighbors`. The hash grid only narrows the scan; it
//! never changes which points qualify or their order.

use crate::core_types::geodesy::haversine_distance;
use crate::core_types::grid_point::{GridPoint, PointId};
use crate::core_types::spatial::SpatialIndex;
use crate::core_types::units::Kilometers;
use crate::solver::config::NeighborSearch;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Neighbor candidate of a point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Index of the neighbor in the point set
    pub index: usize,
    /// Geodesic distance from the queried point
    pub distance: Kilometers,
}

/// Side of a spatial hash cell in degrees
const CELL_SIZE_DEG: f64 = 0.03;

/// Read-only grid point set shared by every run
///
/// Search limits are supplied per query, so one indexed set serves any
/// [`NeighborSearch`].
#[derive(Debug, Clone)]
pub struct PointSet {
    points: Arc<[GridPoint]>,
    by_id: FxHashMap<PointId, usize>,
    spatial: SpatialIndex,
}

impl PointSet {
    /// Index `points` for id lookup and neighbor search
    ///
    /// If an id occurs more than once, lookups resolve to its last occurrence.
    pub fn new(points: Arc<[GridPoint]>) -> Self {
        let by_id = points
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id, i))
            .collect::<FxHashMap<_, _>>();
        let spatial = SpatialIndex::build(&points, CELL_SIZE_DEG);

        Self { points, by_id, spatial }
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when the set holds no points
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// All points in dataset order
    pub fn points(&self) -> &[GridPoint] {
        &self.points
    }

    /// Point at `index`
    pub fn get(&self, index: usize) -> &GridPoint {
        &self.points[index]
    }

    /// Dataset index of the point with `id`
    pub fn index_of(&self, id: PointId) -> Option<usize> {
        self.by_id.get(&id).copied()
    }

    /// Nearest neighbor candidates of the point at `index` under `search`
    pub fn neighbors(&self, index: usize, search: &NeighborSearch) -> Vec<Neighbor> {
        let origin = &self.points[index];
        let center = origin.coordinates;
        let radius = search.box_radius_deg;

        let mut candidates: Vec<Neighbor> = self
            .spatial
            .query_box(center, radius)
            .into_iter()
            .filter_map(|i| {
                let p = &self.points[i];
                let c = p.coordinates;
                let in_box = c.lat > center.lat - radius
                    && c.lat < center.lat + radius
                    && c.lon > center.lon - radius
                    && c.lon < center.lon + radius;
                if p.id == origin.id || !in_box {
                    return None;
                }
                let distance = haversine_distance(center, c);
                (*distance > 0.0 && distance < search.max_distance)
                    .then_some(Neighbor { index: i, distance })
            })
            .collect();

        candidates.sort_by(|a, b| a.distance.cmp(&b.distance).then(a.index.cmp(&b.index)));
        candidates.truncate(search.max_neighbors);
        candidates
    }
}
