//! Precomputed fuel ratings for grid display
//!
//! The fuel score of every grid point is fixed by its forest-type code, so
//! the listing shown on the map can be decorated from a table computed once
//! ahead of time instead of per request.

use crate::core_types::grid_point::{GridPoint, PointId};
use crate::physics::fuel_score;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Fuel score of one grid point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelRating {
    /// Grid point the rating belongs to
    pub grid_id: PointId,
    /// Fuel score of the point's forest type
    pub fuel_score: f64,
}

/// Compute the fuel rating of every point, in dataset order
pub fn compute_fuel_ratings(points: &[GridPoint]) -> Vec<FuelRating> {
    points
        .par_iter()
        .map(|p| FuelRating {
            grid_id: p.id,
            fuel_score: fuel_score(p.fuel_class()),
        })
        .collect()
}

/// Index ratings by grid id
pub fn ratings_by_id(ratings: &[FuelRating]) -> FxHashMap<PointId, f64> {
    ratings.iter().map(|r| (r.grid_id, r.fuel_score)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::geodesy::GeoCoord;

    #[test]
    fn test_ratings_follow_forest_type() {
        let points = vec![
            GridPoint::new(1, GeoCoord::new(127.0, 37.0)).with_fuel_class("1"),
            GridPoint::new(2, GeoCoord::new(127.01, 37.0)).with_fuel_class("4"),
            GridPoint::new(3, GeoCoord::new(127.02, 37.0)),
        ];
        let ratings = compute_fuel_ratings(&points);
        assert_eq!(
            ratings,
            vec![
                FuelRating { grid_id: 1, fuel_score: 5.0 },
                FuelRating { grid_id: 2, fuel_score: 2.0 },
                FuelRating { grid_id: 3, fuel_score: 0.0 },
            ]
        );

        let by_id = ratings_by_id(&ratings);
        assert_eq!(by_id.get(&2), Some(&2.0));
    }

    #[test]
    fn test_large_grid_keeps_order() {
        let points: Vec<GridPoint> = (0..5000u64)
            .map(|id| GridPoint::new(id, GeoCoord::new(127.0, 37.0)).with_fuel_class("3"))
            .collect();
        let ratings = compute_fuel_ratings(&points);
        assert_eq!(ratings.len(), 5000);
        assert!(ratings
            .iter()
            .enumerate()
            .all(|(i, r)| r.grid_id == i as u64 && r.fuel_score == 4.0));
    }
}
