//! # Speed data
//!
//! The speed profile is the motion law along the path, stored as a series of [`SpeedPoint`]s
//! indexed by time.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::fmt;

use serde::{Deserialize, Serialize};
use util::maths::lin_map;

use crate::series::{IndexedSeries, LookupError, Sample, Series, SeriesError, SeriesKind};

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// The motion state at one instant of the speed profile.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SpeedPoint {
    /// Time offset from the start of the profile
    pub t_s: f64,

    /// Arc length travelled along the path
    pub s_m: f64,

    /// Velocity
    pub v_ms: f64,

    /// Acceleration
    pub a_mss: f64,
}

/// The motion law of the plan, looked up by time.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedData {
    points: Series<SpeedPoint>,

    /// Cached time of the final point
    total_time_s: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl Sample for SpeedPoint {
    fn key(&self) -> f64 {
        self.t_s
    }

    fn interpolate(&self, other: &Self, t_s: f64) -> Self {
        let src = (self.t_s, other.t_s);

        SpeedPoint {
            t_s,
            s_m: lin_map(src, (self.s_m, other.s_m), t_s),
            v_ms: lin_map(src, (self.v_ms, other.v_ms), t_s),
            a_mss: lin_map(src, (self.a_mss, other.a_mss), t_s),
        }
    }
}

impl Default for SpeedData {
    fn default() -> Self {
        Self {
            points: Series::empty(SeriesKind::Speed),
            total_time_s: 0.0,
        }
    }
}

impl SpeedData {
    /// Create a new speed profile from a sequence of points with strictly increasing time.
    pub fn new(points: Vec<SpeedPoint>) -> Result<Self, SeriesError> {
        let points = Series::new_from_zero(SeriesKind::Speed, points)?;
        let total_time_s = points.back().map(|p| p.t_s).unwrap_or(0.0);

        Ok(Self {
            points,
            total_time_s,
        })
    }

    /// Get the interpolated speed point at the given time.
    ///
    /// Fails if `t_s` is negative, beyond `total_time`, or the profile is empty.
    pub fn get_speed_point_with_time(&self, t_s: f64) -> Result<SpeedPoint, LookupError> {
        self.points.lookup(t_s)
    }

    /// Time of the final point in the profile, or zero if the profile is empty.
    pub fn total_time(&self) -> f64 {
        self.total_time_s
    }

    pub fn points(&self) -> &[SpeedPoint] {
        self.points.samples()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl IndexedSeries for SpeedData {
    type Value = SpeedPoint;

    fn lookup(&self, t_s: f64) -> Result<SpeedPoint, LookupError> {
        self.get_speed_point_with_time(t_s)
    }

    fn domain_bounds(&self) -> Option<(f64, f64)> {
        self.points.domain_bounds()
    }
}

impl fmt::Display for SpeedData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "num_points: {}, total_time: {:.3}",
            self.len(),
            self.total_time_s
        )?;

        if let (Some(start), Some(end)) = (self.points.front(), self.points.back()) {
            write!(f, ", s: [{:.3}, {:.3}]", start.s_m, end.s_m)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn const_speed(v_ms: f64, total_time_s: f64) -> SpeedData {
        SpeedData::new(
            (0..=(total_time_s as usize))
                .map(|i| SpeedPoint {
                    t_s: i as f64,
                    s_m: v_ms * i as f64,
                    v_ms,
                    a_mss: 0.0,
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_speed_lookup() {
        let speed = const_speed(2.0, 5.0);

        assert_eq!(speed.total_time(), 5.0);

        let p = speed.get_speed_point_with_time(1.5).unwrap();
        assert_eq!(p.t_s, 1.5);
        assert_eq!(p.s_m, 3.0);
        assert_eq!(p.v_ms, 2.0);

        assert!(speed.get_speed_point_with_time(5.0).is_ok());
        assert!(speed.get_speed_point_with_time(-1e-6).is_err());
        assert!(speed.get_speed_point_with_time(5.1).is_err());
    }

    #[test]
    fn test_non_monotonic_time() {
        let res = SpeedData::new(vec![
            SpeedPoint {
                t_s: 0.0,
                ..Default::default()
            },
            SpeedPoint {
                t_s: 1.0,
                ..Default::default()
            },
            SpeedPoint {
                t_s: 0.5,
                ..Default::default()
            },
        ]);

        assert_eq!(
            res,
            Err(SeriesError::NotStrictlyIncreasing {
                series: SeriesKind::Speed,
                index: 2,
                prev: 1.0,
                key: 0.5
            })
        );
    }

    #[test]
    fn test_speed_must_start_at_zero() {
        let res = SpeedData::new(vec![
            SpeedPoint {
                t_s: -1.0,
                v_ms: 1.0,
                ..Default::default()
            },
            SpeedPoint {
                t_s: 1.0,
                s_m: 2.0,
                v_ms: 1.0,
                ..Default::default()
            },
        ]);

        assert_eq!(
            res,
            Err(SeriesError::NonZeroStart {
                series: SeriesKind::Speed,
                key: -1.0
            })
        );
    }

    #[test]
    fn test_display() {
        let speed = const_speed(1.0, 2.0);
        assert_eq!(
            format!("{}", speed),
            "num_points: 3, total_time: 2.000, s: [0.000, 2.000]"
        );
        assert_eq!(
            format!("{}", SpeedData::default()),
            "num_points: 0, total_time: 0.000"
        );
    }
}
