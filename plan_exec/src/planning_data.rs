//! # Planning data
//!
//! Holds everything produced for one planning cycle: the reference line, behavioural decisions,
//! the initial planning point, and the path and speed profile which are aggregated into the
//! cycle's trajectory.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::fmt;

use crate::{
    aggregator::{AggregateError, TrajectoryAggregator},
    context::{DecisionData, ReferenceLine, ReferencePoint},
    path::PathData,
    speed::SpeedData,
    trajectory::{Trajectory, TrajectoryPoint},
};

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// The data of a single planning cycle.
///
/// Built up by the planning stages during the cycle and dropped once the cycle's trajectory has
/// been produced.
#[derive(Debug, Clone, Default)]
pub struct PlanningData {
    reference_line: ReferenceLine,
    decision_data: DecisionData,
    init_planning_point: TrajectoryPoint,
    path_data: PathData,
    speed_data: SpeedData,
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl PlanningData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reference_line(&self) -> &ReferenceLine {
        &self.reference_line
    }

    pub fn set_reference_line(&mut self, ref_points: Vec<ReferencePoint>) {
        self.reference_line = ReferenceLine::new(ref_points);
    }

    pub fn decision_data(&self) -> &DecisionData {
        &self.decision_data
    }

    pub fn decision_data_mut(&mut self) -> &mut DecisionData {
        &mut self.decision_data
    }

    pub fn set_decision_data(&mut self, decision_data: DecisionData) {
        self.decision_data = decision_data;
    }

    pub fn init_planning_point(&self) -> &TrajectoryPoint {
        &self.init_planning_point
    }

    pub fn set_init_planning_point(&mut self, init_planning_point: TrajectoryPoint) {
        self.init_planning_point = init_planning_point;
    }

    pub fn path_data(&self) -> &PathData {
        &self.path_data
    }

    pub fn path_data_mut(&mut self) -> &mut PathData {
        &mut self.path_data
    }

    pub fn set_path_data(&mut self, path_data: PathData) {
        self.path_data = path_data;
    }

    pub fn speed_data(&self) -> &SpeedData {
        &self.speed_data
    }

    pub fn speed_data_mut(&mut self) -> &mut SpeedData {
        &mut self.speed_data
    }

    pub fn set_speed_data(&mut self, speed_data: SpeedData) {
        self.speed_data = speed_data;
    }

    /// Combine this cycle's path and speed data into a trajectory.
    ///
    /// See [`TrajectoryAggregator::aggregate`].
    pub fn aggregate(&self, time_resolution_s: f64) -> Result<Trajectory, AggregateError> {
        TrajectoryAggregator::aggregate(
            time_resolution_s,
            &self.init_planning_point,
            &self.path_data,
            &self.speed_data,
        )
    }

    /// Combine this cycle's path and speed data, appending the points to `trajectory`.
    ///
    /// `trajectory` is unmodified if aggregation fails.
    pub fn aggregate_into(
        &self,
        time_resolution_s: f64,
        trajectory: &mut Trajectory,
    ) -> Result<(), AggregateError> {
        TrajectoryAggregator::aggregate_into(
            time_resolution_s,
            &self.init_planning_point,
            &self.path_data,
            &self.speed_data,
            trajectory,
        )
    }

    /// Get a human readable summary of the path and speed data.
    pub fn debug_string(&self) -> String {
        format!("{}", self)
    }
}

impl fmt::Display for PlanningData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "path_data:{}", self.path_data)?;
        write!(f, "speed_data:{}", self.speed_data)
    }
}
