//! # Path data
//!
//! The path is the planned spatial curve, independent of time. It is stored as a series of
//! [`PathPoint`]s indexed by arc length.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::fmt;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use util::maths::{get_ang_dist_2pi, interp_angle, lin_map};

use crate::series::{IndexedSeries, LookupError, Sample, Series, SeriesError, SeriesKind};

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// A single pose on the path.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PathPoint {
    /// Position along the X axis
    pub x_m: f64,

    /// Position along the Y axis
    pub y_m: f64,

    /// Angle of the path tangent to the +ve X axis
    pub heading_rad: f64,

    /// Signed curvature of the path, positive turning left
    pub curvature_m: f64,

    /// Arc length from the start of the path
    pub s_m: f64,
}

/// The spatial curve of the plan, looked up by arc length.
#[derive(Debug, Clone, PartialEq)]
pub struct PathData {
    points: Series<PathPoint>,

    /// Cached arc length of the final point
    param_length_m: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl PathPoint {
    pub fn position_m(&self) -> Vector2<f64> {
        Vector2::new(self.x_m, self.y_m)
    }
}

impl Sample for PathPoint {
    fn key(&self) -> f64 {
        self.s_m
    }

    fn interpolate(&self, other: &Self, s_m: f64) -> Self {
        let src = (self.s_m, other.s_m);
        let ratio = lin_map(src, (0.0, 1.0), s_m);

        PathPoint {
            x_m: lin_map(src, (self.x_m, other.x_m), s_m),
            y_m: lin_map(src, (self.y_m, other.y_m), s_m),
            heading_rad: interp_angle(self.heading_rad, other.heading_rad, ratio),
            curvature_m: lin_map(src, (self.curvature_m, other.curvature_m), s_m),
            s_m,
        }
    }
}

impl Default for PathData {
    fn default() -> Self {
        Self {
            points: Series::empty(SeriesKind::Path),
            param_length_m: 0.0,
        }
    }
}

impl PathData {
    /// Create a new path from a sequence of points with strictly increasing arc length.
    pub fn new(points: Vec<PathPoint>) -> Result<Self, SeriesError> {
        let points = Series::new_from_zero(SeriesKind::Path, points)?;
        let param_length_m = points.back().map(|p| p.s_m).unwrap_or(0.0);

        Ok(Self {
            points,
            param_length_m,
        })
    }

    /// Build a path from raw positions.
    ///
    /// Arc length is the cumulative distance between positions, heading is the direction of the
    /// segment leaving each point (the final point takes the heading of the segment entering it),
    /// and curvature is the change in heading over the mean length of the neighbouring segments.
    /// Repeated positions result in a `NotStrictlyIncreasing` error.
    pub fn from_positions(positions: &[Vector2<f64>]) -> Result<Self, SeriesError> {
        if positions.is_empty() {
            return Err(SeriesError::Empty(SeriesKind::Path));
        }

        // Heading and length of each segment
        let segments: Vec<(f64, f64)> = positions
            .windows(2)
            .map(|w| {
                let diff = w[1] - w[0];
                (diff.y.atan2(diff.x), diff.norm())
            })
            .collect();

        let mut points = Vec::with_capacity(positions.len());
        let mut s_m = 0.0;

        for (i, pos) in positions.iter().enumerate() {
            if i > 0 {
                s_m += segments[i - 1].1;
            }

            let heading_rad = match (segments.get(i), i.checked_sub(1).map(|j| segments[j])) {
                (Some(seg), _) => seg.0,
                (None, Some(prev)) => prev.0,
                (None, None) => 0.0,
            };

            points.push(PathPoint {
                x_m: pos.x,
                y_m: pos.y,
                heading_rad,
                curvature_m: 0.0,
                s_m,
            });
        }

        // Curvature at each interior point, endpoints copy their neighbour
        for i in 1..segments.len() {
            let (h_0, l_0) = segments[i - 1];
            let (h_1, l_1) = segments[i];
            let mean_len = 0.5 * (l_0 + l_1);
            if mean_len > 0.0 {
                points[i].curvature_m = get_ang_dist_2pi(h_0, h_1) / mean_len;
            }
        }
        let n = points.len();
        if n > 2 {
            points[0].curvature_m = points[1].curvature_m;
            points[n - 1].curvature_m = points[n - 2].curvature_m;
        }

        Self::new(points)
    }

    /// Get the interpolated point at the given arc length.
    ///
    /// Fails if `s_m` is negative, beyond the end of the path, or the path is empty.
    pub fn get_path_point_with_path_s(&self, s_m: f64) -> Result<PathPoint, LookupError> {
        self.points.lookup(s_m)
    }

    /// Arc length of the final point on the path, or zero if the path is empty.
    pub fn param_length(&self) -> f64 {
        self.param_length_m
    }

    pub fn points(&self) -> &[PathPoint] {
        self.points.samples()
    }

    pub fn start_point(&self) -> Option<&PathPoint> {
        self.points.front()
    }

    pub fn end_point(&self) -> Option<&PathPoint> {
        self.points.back()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl IndexedSeries for PathData {
    type Value = PathPoint;

    fn lookup(&self, s_m: f64) -> Result<PathPoint, LookupError> {
        self.get_path_point_with_path_s(s_m)
    }

    fn domain_bounds(&self) -> Option<(f64, f64)> {
        self.points.domain_bounds()
    }
}

impl fmt::Display for PathPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(x: {:.3}, y: {:.3}, heading: {:.3}, curvature: {:.4}, s: {:.3})",
            self.x_m, self.y_m, self.heading_rad, self.curvature_m, self.s_m
        )
    }
}

impl fmt::Display for PathData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "num_points: {}, param_length: {:.3}",
            self.len(),
            self.param_length_m
        )?;

        if let (Some(start), Some(end)) = (self.start_point(), self.end_point()) {
            write!(f, ", start: {}, end: {}", start, end)?;
        }

        Ok(())
    }
}
