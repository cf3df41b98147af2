use crate::core_types::grid_point::GridPoint;
use crate::core_types::geodesy::GeoCoord;
use rustc_hash::FxHashMap;

/// Spatial index using a uniform lon/lat hash grid for fast neighbor queries
///
/// Stores indices into the point slice it was built from. Queries return a
/// superset of the points inside the requested box; callers apply the exact
/// geometric filter.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    cells: FxHashMap<(i64, i64), Vec<usize>>,
    cell_size: f64,
}

impl SpatialIndex {
    /// Build an index over `points` with square cells of `cell_size` degrees
    pub fn build(points: &[GridPoint], cell_size: f64) -> Self {
        let mut index = SpatialIndex {
            cells: FxHashMap::default(),
            cell_size,
        };
        for (i, point) in points.iter().enumerate() {
            index.insert(i, point.coordinates);
        }
        index
    }

    /// Hash a coordinate to its cell
    fn cell_of(&self, coord: GeoCoord) -> (i64, i64) {
        (
            (coord.lon / self.cell_size).floor() as i64,
            (coord.lat / self.cell_size).floor() as i64,
        )
    }

    /// Insert a point index at a coordinate
    pub fn insert(&mut self, index: usize, coord: GeoCoord) {
        let cell = self.cell_of(coord);
        self.cells.entry(cell).or_default().push(index);
    }

    /// Query all indices whose cell may intersect the box `center ± half_extent`
    ///
    /// One extra ring of cells is scanned so that rounding at cell edges can
    /// never drop a point lying strictly inside the box.
    pub fn query_box(&self, center: GeoCoord, half_extent: f64) -> Vec<usize> {
        let cells_needed = (half_extent / self.cell_size).ceil() as i64 + 1;
        let (cx, cy) = self.cell_of(center);

        let mut results = Vec::new();
        for dx in -cells_needed..=cells_needed {
            for dy in -cells_needed..=cells_needed {
                if let Some(indices) = self.cells.get(&(cx + dx, cy + dy)) {
                    results.extend_from_slice(indices);
                }
            }
        }

        results
    }

    /// Get number of occupied cells in the index
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Get number of points in the index
    pub fn point_count(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }
}
