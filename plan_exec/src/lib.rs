//! # Planning library.
//!
//! Fuses the path and speed profile produced by the planner into the trajectory followed by the
//! vehicle controller.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Trajectory aggregator - combines path and speed data into a trajectory
pub mod aggregator;

/// Planning context - reference line and decision data carried through the cycle
pub mod context;

/// Executable parameters
pub mod params;

/// Path data - the spatial curve indexed by arc length
pub mod path;

/// Planning data - everything produced during one planning cycle
pub mod planning_data;

/// Scenario generators - simple paths and speed profiles
pub mod scenario;

/// Indexed series - interpolated lookup over monotonic samples
pub mod series;

/// Speed data - the motion law indexed by time
pub mod speed;

/// Trajectory - the time ordered output of aggregation
pub mod trajectory;

// ------------------------------------------------------------------------------------------------
// REEXPORTS
// ------------------------------------------------------------------------------------------------

pub use aggregator::{AggregateError, TrajectoryAggregator};
pub use planning_data::PlanningData;
