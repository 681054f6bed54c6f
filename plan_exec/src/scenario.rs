//! # Scenarios
//!
//! Simple path and speed profile generators used to drive the planner without the upstream path
//! and speed optimisers.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use nalgebra::Vector2;
use serde::Deserialize;

use crate::{
    path::PathData,
    series::SeriesError,
    speed::{SpeedData, SpeedPoint},
};

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// Parameters of a constant curvature path starting at the origin.
#[derive(Debug, Clone, Deserialize)]
pub struct ArcPathParams {
    pub curvature_m: f64,
    pub length_m: f64,
    pub separation_m: f64,
    pub start_heading_rad: f64,
}

/// Parameters of a constant acceleration speed profile.
#[derive(Debug, Clone, Deserialize)]
pub struct SpeedProfileParams {
    pub init_speed_ms: f64,
    pub accel_mss: f64,
    pub max_speed_ms: f64,
    pub total_time_s: f64,
    pub time_step_s: f64,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("Invalid scenario parameter: {0}")]
    InvalidParameter(String),

    #[error("Generated points do not form a valid series: {0}")]
    SeriesError(#[from] SeriesError),
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Generate a path of constant curvature starting at the origin.
///
/// Points are evenly spaced in arc length, at most `separation_m` apart. A curvature of
/// (approximately) zero gives a straight line.
pub fn arc_path(params: &ArcPathParams) -> Result<PathData, ScenarioError> {
    if !(params.length_m > 0.0) {
        return Err(ScenarioError::InvalidParameter(format!(
            "path length must be > 0 (got {})",
            params.length_m
        )));
    }
    if !(params.separation_m > 0.0) {
        return Err(ScenarioError::InvalidParameter(format!(
            "point separation must be > 0 (got {})",
            params.separation_m
        )));
    }

    let num_segments = (params.length_m / params.separation_m).ceil() as usize;
    let step_m = params.length_m / num_segments as f64;
    let head_rad = params.start_heading_rad;
    let curv_m = params.curvature_m;

    let positions: Vec<Vector2<f64>> = (0..=num_segments)
        .map(|i| {
            let s_m = i as f64 * step_m;

            // The 1/curv below blows up for straight lines
            if curv_m.abs() <= std::f64::EPSILON {
                Vector2::new(s_m * head_rad.cos(), s_m * head_rad.sin())
            } else {
                let phi = head_rad + s_m * curv_m;
                Vector2::new(
                    (phi.sin() - head_rad.sin()) / curv_m,
                    (head_rad.cos() - phi.cos()) / curv_m,
                )
            }
        })
        .collect();

    Ok(PathData::from_positions(&positions)?)
}

/// Generate a speed profile with constant acceleration, saturated between standstill and the
/// maximum speed.
pub fn const_accel_profile(params: &SpeedProfileParams) -> Result<SpeedData, ScenarioError> {
    if !(params.time_step_s > 0.0) {
        return Err(ScenarioError::InvalidParameter(format!(
            "time step must be > 0 (got {})",
            params.time_step_s
        )));
    }
    if !(params.total_time_s >= 0.0) {
        return Err(ScenarioError::InvalidParameter(format!(
            "total time must be >= 0 (got {})",
            params.total_time_s
        )));
    }
    if !(params.init_speed_ms >= 0.0 && params.init_speed_ms <= params.max_speed_ms) {
        return Err(ScenarioError::InvalidParameter(format!(
            "initial speed {} is not within [0, {}]",
            params.init_speed_ms, params.max_speed_ms
        )));
    }

    let num_steps = (params.total_time_s / params.time_step_s).ceil() as usize;

    let saturated_accel = |v_ms: f64| {
        if (params.accel_mss > 0.0 && v_ms >= params.max_speed_ms)
            || (params.accel_mss < 0.0 && v_ms <= 0.0)
        {
            0.0
        } else {
            params.accel_mss
        }
    };

    let mut points = Vec::with_capacity(num_steps + 1);
    points.push(SpeedPoint {
        t_s: 0.0,
        s_m: 0.0,
        v_ms: params.init_speed_ms,
        a_mss: saturated_accel(params.init_speed_ms),
    });

    if num_steps > 0 {
        let dt_s = params.total_time_s / num_steps as f64;

        for i in 1..=num_steps {
            let prev = points[i - 1];
            let v_ms = (prev.v_ms + params.accel_mss * dt_s).clamp(0.0, params.max_speed_ms);

            points.push(SpeedPoint {
                t_s: i as f64 * dt_s,
                s_m: prev.s_m + 0.5 * (prev.v_ms + v_ms) * dt_s,
                v_ms,
                a_mss: saturated_accel(v_ms),
            });
        }
    }

    Ok(SpeedData::new(points)?)
}
