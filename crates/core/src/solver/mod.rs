//! Fire spread solver
//!
//! The solver has two stages. [`PropagationEngine`] runs the discrete-event
//! spread from one ignition point and settles an ignition and burnout time
//! for every reachable point. [`generate_boundaries`] then turns those times
//! into a sampled series of fire-front polygons.
//!
//! # Example
//!
//! ```rust,ignore
//! use wildfire_spread_core::solver::{generate_boundaries, PropagationEngine, SpreadConfig};
//!
//! let engine = PropagationEngine::new(&points, &weather, &config);
//! let run = engine.run(origin);
//! let ignited: Vec<_> = run
//!     .ignited()
//!     .filter_map(|(i, s)| Some((points.get(i).coordinates, s.ignition_time()?)))
//!     .collect();
//! let boundaries = generate_boundaries(&ignited, &config);
//! ```

pub mod boundary;
pub mod config;
mod event_queue;
pub mod propagation;

// Re-exports
pub use boundary::{generate_boundaries, BoundaryGeometry, Ring, TimeBoundary};
pub use config::{NeighborSearch, SpreadConfig};
pub use propagation::{Propagation, PropagationEngine, PropagationStats, SimPointState};
