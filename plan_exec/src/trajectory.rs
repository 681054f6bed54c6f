//! # Trajectory
//!
//! The output of aggregation: a time ordered sequence of poses with the motion state the vehicle
//! should have at each of them.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use util::maths::lin_map;

use crate::{
    path::PathPoint,
    series::{interpolate_at, LookupError, Sample, SeriesKind},
};

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// A pose on the path combined with the motion state at that pose.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    pub path_point: PathPoint,

    /// Velocity
    pub v_ms: f64,

    /// Acceleration
    pub a_mss: f64,

    /// Time offset from the planning cycle's reference instant
    pub relative_time_s: f64,
}

/// A sequence of trajectory points ordered by non-decreasing relative time.
///
/// Consecutive points may share a relative time, for example when the speed profile holds its
/// last sample. Points can only be added in order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Trajectory {
    /// Absolute time the relative times of the points are measured from
    pub header_time_s: f64,

    points: Vec<TrajectoryPoint>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TrajectoryError {
    #[error(
        "Cannot add a point at relative time {next_s} after a point at relative time {prev_s}"
    )]
    OutOfOrder { prev_s: f64, next_s: f64 },
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl Sample for TrajectoryPoint {
    fn key(&self) -> f64 {
        self.relative_time_s
    }

    fn interpolate(&self, other: &Self, relative_time_s: f64) -> Self {
        let src = (self.relative_time_s, other.relative_time_s);

        // Interpolate the pose by arc length so heading wrapping is handled by the path point
        let s_m = lin_map(src, (self.path_point.s_m, other.path_point.s_m), relative_time_s);
        let path_point = if other.path_point.s_m > self.path_point.s_m {
            self.path_point.interpolate(&other.path_point, s_m)
        } else {
            self.path_point
        };

        TrajectoryPoint {
            path_point,
            v_ms: lin_map(src, (self.v_ms, other.v_ms), relative_time_s),
            a_mss: lin_map(src, (self.a_mss, other.a_mss), relative_time_s),
            relative_time_s,
        }
    }
}

impl Trajectory {
    pub fn new(header_time_s: f64) -> Self {
        Self {
            header_time_s,
            points: Vec::new(),
        }
    }

    /// Append a point to the end of the trajectory.
    ///
    /// The point's relative time must not be less than that of the current last point, otherwise
    /// the point is rejected and the trajectory is unchanged.
    pub fn add_trajectory_point(&mut self, point: TrajectoryPoint) -> Result<(), TrajectoryError> {
        self.check_order(&point)?;
        self.points.push(point);
        Ok(())
    }

    /// Move all points of `other` onto the end of this trajectory.
    ///
    /// Fails without modifying either trajectory if the first point of `other` is earlier than
    /// the last point of this one.
    pub fn append(&mut self, other: &mut Trajectory) -> Result<(), TrajectoryError> {
        if let Some(first) = other.start_point() {
            self.check_order(first)?;
        }
        self.points.append(&mut other.points);
        Ok(())
    }

    fn check_order(&self, next: &TrajectoryPoint) -> Result<(), TrajectoryError> {
        match self.end_point() {
            // NaN times are rejected too
            Some(prev) if !(next.relative_time_s >= prev.relative_time_s) => {
                Err(TrajectoryError::OutOfOrder {
                    prev_s: prev.relative_time_s,
                    next_s: next.relative_time_s,
                })
            }
            _ => Ok(()),
        }
    }

    pub fn points(&self) -> &[TrajectoryPoint] {
        &self.points
    }

    pub fn trajectory_point_at(&self, index: usize) -> Option<&TrajectoryPoint> {
        self.points.get(index)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn start_point(&self) -> Option<&TrajectoryPoint> {
        self.points.first()
    }

    pub fn end_point(&self) -> Option<&TrajectoryPoint> {
        self.points.last()
    }

    /// Time between the first and last points, or zero if there are fewer than two points.
    pub fn time_length(&self) -> f64 {
        match (self.start_point(), self.end_point()) {
            (Some(s), Some(e)) => e.relative_time_s - s.relative_time_s,
            _ => 0.0,
        }
    }

    /// Get the interpolated trajectory point at the given relative time.
    pub fn evaluate(&self, relative_time_s: f64) -> Result<TrajectoryPoint, LookupError> {
        interpolate_at(SeriesKind::Trajectory, &self.points, relative_time_s)
    }

    /// Index of the first point at or after the given relative time.
    ///
    /// Times beyond the end of the trajectory give the index of the last point. Returns `None`
    /// if the trajectory is empty.
    pub fn query_nearest_point(&self, relative_time_s: f64) -> Option<usize> {
        if self.points.is_empty() {
            return None;
        }

        let idx = self
            .points
            .partition_point(|p| p.relative_time_s < relative_time_s);

        Some(idx.min(self.points.len() - 1))
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}
