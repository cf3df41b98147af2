//! Core types and utilities

pub mod geodesy;
pub mod grid_point;
pub mod spatial;
pub mod units;
pub mod weather;

pub use geodesy::{destination, haversine_distance, initial_bearing, GeoCoord};
pub use grid_point::{GridPoint, PointId};
pub use spatial::SpatialIndex;
pub use units::*;
pub use weather::*;
