//! Physics modules for the spread model

pub mod spread_factors;

pub use spread_factors::{
    burnout_duration, fuel_score, moisture_factor, slope_factor, wind_factor, ForestType,
    SoilDrainage, TerrainClass, ONE_GRID_UNIT_KM,
};
