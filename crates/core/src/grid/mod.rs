//! Grid point storage, indexing and display ratings

pub mod fuel_ratings;
pub mod point_set;

// Re-export main types
pub use fuel_ratings::{compute_fuel_ratings, ratings_by_id, FuelRating};
pub use point_set::{Neighbor, PointSet};
