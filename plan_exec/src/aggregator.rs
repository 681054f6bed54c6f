//! # Trajectory aggregator
//!
//! Fuses a path (indexed by arc length) and a speed profile (indexed by time) into a single
//! trajectory. The speed profile is sampled at a fixed time resolution, and the arc length of
//! each sample is used to look up the pose on the path.
//!
//! If the speed profile travels further than the path covers, aggregation stops at the end of the
//! path and the points produced so far are returned. Any other lookup failure aborts the whole
//! aggregation.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{debug, error, trace};

use crate::{
    path::PathPoint,
    series::{IndexedSeries, LookupError},
    speed::SpeedPoint,
    trajectory::{Trajectory, TrajectoryError, TrajectoryPoint},
};

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// Combines path and speed data into a trajectory.
pub struct TrajectoryAggregator;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AggregateError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The speed profile could not provide a point at a time inside its own duration.
    #[error("Failed to get speed point with relative time {t_s}: {source}")]
    SpeedLookupFailure { t_s: f64, source: LookupError },

    /// The path could not provide a point at an arc length inside its own length.
    #[error("Failed to get path point with s {s_m}, path total length {param_length_m}: {source}")]
    PathLookupFailure {
        s_m: f64,
        param_length_m: f64,
        source: LookupError,
    },

    /// The produced points could not be added to the trajectory in time order.
    #[error("Aggregated points are out of time order: {0}")]
    OutOfOrder(#[from] TrajectoryError),
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl AggregateError {
    /// True if the error came from a failed path or speed lookup.
    pub fn is_lookup_failure(&self) -> bool {
        matches!(
            self,
            AggregateError::SpeedLookupFailure { .. } | AggregateError::PathLookupFailure { .. }
        )
    }
}

impl TrajectoryAggregator {
    /// Sample the speed profile every `time_resolution_s` seconds and merge each sample with the
    /// path pose at the sample's arc length.
    ///
    /// The relative time of each produced point is `init_point.relative_time_s` plus the time of
    /// the speed sample it was built from.
    pub fn aggregate<P, S>(
        time_resolution_s: f64,
        init_point: &TrajectoryPoint,
        path: &P,
        speed: &S,
    ) -> Result<Trajectory, AggregateError>
    where
        P: IndexedSeries<Value = PathPoint>,
        S: IndexedSeries<Value = SpeedPoint>,
    {
        if !(time_resolution_s > 0.0) || !time_resolution_s.is_finite() {
            error!("time_resolution: {} <= 0.0", time_resolution_s);
            return Err(AggregateError::InvalidArgument(format!(
                "time_resolution must be > 0 (got {})",
                time_resolution_s
            )));
        }

        let total_time_s = speed.domain_bounds().map(|b| b.1).unwrap_or(0.0);
        let param_length_m = path.domain_bounds().map(|b| b.1).unwrap_or(0.0);

        let mut trajectory = Trajectory::default();

        // The cursor is derived from the sample index rather than accumulated so that rounding
        // errors don't build up over long profiles.
        let mut sample_idx: u64 = 0;
        loop {
            let cur_t_s = sample_idx as f64 * time_resolution_s;
            if !(cur_t_s < total_time_s) {
                break;
            }

            let speed_point = speed.lookup(cur_t_s).map_err(|e| {
                error!("Fail to get speed point with relative time {}: {}", cur_t_s, e);
                AggregateError::SpeedLookupFailure {
                    t_s: cur_t_s,
                    source: e,
                }
            })?;

            // The speed profile may run past the end of the path, in which case the trajectory
            // is truncated at the path's end.
            if speed_point.s_m > param_length_m {
                debug!(
                    "Speed point s {} at t {} is beyond the path length {}, stopping aggregation",
                    speed_point.s_m, speed_point.t_s, param_length_m
                );
                break;
            }

            let path_point = path.lookup(speed_point.s_m).map_err(|e| {
                error!(
                    "Fail to get path data with s {}, path total length {}: {}",
                    speed_point.s_m, param_length_m, e
                );
                AggregateError::PathLookupFailure {
                    s_m: speed_point.s_m,
                    param_length_m,
                    source: e,
                }
            })?;

            let point = TrajectoryPoint {
                path_point,
                v_ms: speed_point.v_ms,
                a_mss: speed_point.a_mss,
                relative_time_s: init_point.relative_time_s + speed_point.t_s,
            };
            trace!(
                "Trajectory point {}: t {:.3}, s {:.3}, v {:.3}",
                sample_idx,
                point.relative_time_s,
                point.path_point.s_m,
                point.v_ms
            );
            trajectory.add_trajectory_point(point).map_err(|e| {
                error!("Fail to add aggregated point: {}", e);
                AggregateError::from(e)
            })?;

            sample_idx += 1;
        }

        Ok(trajectory)
    }

    /// Aggregate into an existing trajectory.
    ///
    /// The produced points are appended to `trajectory` only if aggregation succeeds, on failure
    /// `trajectory` is left untouched. Aggregating into a trajectory which already ends later
    /// than the first produced point fails with `OutOfOrder`.
    pub fn aggregate_into<P, S>(
        time_resolution_s: f64,
        init_point: &TrajectoryPoint,
        path: &P,
        speed: &S,
        trajectory: &mut Trajectory,
    ) -> Result<(), AggregateError>
    where
        P: IndexedSeries<Value = PathPoint>,
        S: IndexedSeries<Value = SpeedPoint>,
    {
        let mut produced = Self::aggregate(time_resolution_s, init_point, path, speed)?;
        trajectory.append(&mut produced).map_err(|e| {
            error!("Fail to append aggregated trajectory: {}", e);
            AggregateError::from(e)
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        path::PathData,
        series::SeriesKind,
        speed::SpeedData,
    };

    /// Path along the X axis with `x = s`, one point per meter.
    fn straight_path(length_m: usize) -> PathData {
        PathData::new(
            (0..=length_m)
                .map(|i| PathPoint {
                    x_m: i as f64,
                    s_m: i as f64,
                    ..Default::default()
                })
                .collect(),
        )
        .unwrap()
    }

    /// Constant velocity profile with one point per second.
    fn const_speed(v_ms: f64, total_time_s: usize) -> SpeedData {
        SpeedData::new(
            (0..=total_time_s)
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

    fn init_point(relative_time_s: f64) -> TrajectoryPoint {
        TrajectoryPoint {
            relative_time_s,
            ..Default::default()
        }
    }

    /// A speed profile which fails to look up times in `[fail_from_s, fail_to_s)`.
    struct FaultySpeed {
        inner: SpeedData,
        fail_from_s: f64,
        fail_to_s: f64,
    }

    impl IndexedSeries for FaultySpeed {
        type Value = SpeedPoint;

        fn lookup(&self, t_s: f64) -> Result<SpeedPoint, LookupError> {
            if t_s >= self.fail_from_s && t_s < self.fail_to_s {
                Err(LookupError::Empty {
                    series: SeriesKind::Speed,
                    key: t_s,
                })
            } else {
                self.inner.lookup(t_s)
            }
        }

        fn domain_bounds(&self) -> Option<(f64, f64)> {
            self.inner.domain_bounds()
        }
    }

    /// A path which fails to look up arc lengths at or beyond `fail_from_s`, despite reporting the
    /// full length of `inner`.
    struct FaultyPath {
        inner: PathData,
        fail_from_s: f64,
    }

    impl IndexedSeries for FaultyPath {
        type Value = PathPoint;

        fn lookup(&self, s_m: f64) -> Result<PathPoint, LookupError> {
            if s_m >= self.fail_from_s {
                Err(LookupError::Empty {
                    series: SeriesKind::Path,
                    key: s_m,
                })
            } else {
                self.inner.lookup(s_m)
            }
        }

        fn domain_bounds(&self) -> Option<(f64, f64)> {
            self.inner.domain_bounds()
        }
    }

    /// A speed profile which snaps lookups down to the nearest half second.
    struct SnappingSpeed(SpeedData);

    impl IndexedSeries for SnappingSpeed {
        type Value = SpeedPoint;

        fn lookup(&self, t_s: f64) -> Result<SpeedPoint, LookupError> {
            self.0.lookup((t_s * 2.0).floor() / 2.0)
        }

        fn domain_bounds(&self) -> Option<(f64, f64)> {
            self.0.domain_bounds()
        }
    }

    #[test]
    fn test_aggregate_matching_inputs() {
        let path = straight_path(10);
        let speed = const_speed(1.0, 5);

        let traj = TrajectoryAggregator::aggregate(1.0, &init_point(2.0), &path, &speed).unwrap();

        assert_eq!(traj.len(), 5);
        for (i, p) in traj.points().iter().enumerate() {
            assert_eq!(p.path_point.s_m, i as f64);
            assert_eq!(p.path_point.x_m, i as f64);
            assert_eq!(p.v_ms, 1.0);
            assert_eq!(p.a_mss, 0.0);
            assert_eq!(p.relative_time_s, 2.0 + i as f64);
        }
    }

    #[test]
    fn test_aggregate_speed_beyond_path() {
        let path = straight_path(10);
        let speed = const_speed(2.0, 10);

        let traj = TrajectoryAggregator::aggregate(1.0, &init_point(0.0), &path, &speed).unwrap();

        // s = 2t, so the sample at t = 5 lands exactly on the end of the path and the one at
        // t = 6 is the first beyond it. Only samples strictly beyond the path length stop
        // aggregation, matching the planner this aggregator feeds.
        assert_eq!(traj.len(), 6);
        assert_eq!(traj.end_point().unwrap().path_point.s_m, 10.0);
        assert_eq!(traj.end_point().unwrap().relative_time_s, 5.0);
        assert!(traj
            .points()
            .iter()
            .all(|p| p.path_point.s_m <= path.param_length()));

        // With a path just short of 10 m the boundary sample is dropped too
        let short_path = PathData::new(vec![
            PathPoint::default(),
            PathPoint {
                x_m: 9.5,
                s_m: 9.5,
                ..Default::default()
            },
        ])
        .unwrap();
        let traj =
            TrajectoryAggregator::aggregate(1.0, &init_point(0.0), &short_path, &speed).unwrap();
        assert_eq!(traj.len(), 5);
        assert_eq!(traj.end_point().unwrap().relative_time_s, 4.0);
    }

    #[test]
    fn test_aggregate_time_stamps() {
        let path = straight_path(100);
        let speed = const_speed(1.5, 8);

        let traj = TrajectoryAggregator::aggregate(0.1, &init_point(10.0), &path, &speed).unwrap();

        assert_eq!(traj.len(), 80);
        for (k, pair) in traj.points().windows(2).enumerate() {
            assert!(pair[1].relative_time_s > pair[0].relative_time_s);
            assert!((pair[0].relative_time_s - (10.0 + k as f64 * 0.1)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_aggregate_uses_speed_sample_time() {
        let path = straight_path(10);
        let speed = SnappingSpeed(const_speed(1.0, 2));

        let traj = TrajectoryAggregator::aggregate(0.25, &init_point(1.0), &path, &speed).unwrap();

        // Cursor 0.0, 0.25, 0.5, ... 1.75 snaps to 0.0, 0.0, 0.5, 0.5, 1.0, 1.0, 1.5, 1.5
        let times: Vec<f64> = traj.points().iter().map(|p| p.relative_time_s).collect();
        assert_eq!(times, vec![1.0, 1.0, 1.5, 1.5, 2.0, 2.0, 2.5, 2.5]);
    }

    #[test]
    fn test_aggregate_invalid_resolution() {
        let path = straight_path(10);
        let speed = const_speed(1.0, 5);

        for time_res in &[0.0, -1.0, std::f64::NAN, std::f64::INFINITY] {
            let mut traj = Trajectory::new(3.0);
            traj.add_trajectory_point(init_point(0.0)).unwrap();
            let before = traj.clone();

            let res = TrajectoryAggregator::aggregate_into(
                *time_res,
                &init_point(0.0),
                &path,
                &speed,
                &mut traj,
            );

            match res {
                Err(AggregateError::InvalidArgument(_)) => (),
                r => panic!("Expected invalid argument, got {:?}", r),
            }
            assert_eq!(traj, before);
        }
    }

    #[test]
    fn test_aggregate_empty_results() {
        let path = straight_path(10);

        // Zero duration profile
        let speed = SpeedData::new(vec![SpeedPoint::default()]).unwrap();
        assert_eq!(speed.total_time(), 0.0);
        let traj = TrajectoryAggregator::aggregate(0.1, &init_point(0.0), &path, &speed).unwrap();
        assert!(traj.is_empty());

        // Empty profile
        let traj =
            TrajectoryAggregator::aggregate(0.1, &init_point(0.0), &path, &SpeedData::default())
                .unwrap();
        assert!(traj.is_empty());

        // Profile starting beyond the end of the path
        let speed = SpeedData::new(vec![
            SpeedPoint {
                t_s: 0.0,
                s_m: 20.0,
                v_ms: 1.0,
                a_mss: 0.0,
            },
            SpeedPoint {
                t_s: 1.0,
                s_m: 21.0,
                v_ms: 1.0,
                a_mss: 0.0,
            },
        ])
        .unwrap();
        let traj = TrajectoryAggregator::aggregate(0.1, &init_point(0.0), &path, &speed).unwrap();
        assert!(traj.is_empty());
    }

    #[test]
    fn test_aggregate_speed_lookup_failure() {
        let path = straight_path(10);
        let speed = FaultySpeed {
            inner: const_speed(1.0, 5),
            fail_from_s: 2.0,
            fail_to_s: 3.0,
        };

        let mut traj = Trajectory::default();
        let res =
            TrajectoryAggregator::aggregate_into(0.5, &init_point(0.0), &path, &speed, &mut traj);

        let err = res.unwrap_err();
        assert!(err.is_lookup_failure());
        match err {
            AggregateError::SpeedLookupFailure { t_s, .. } => assert_eq!(t_s, 2.0),
            e => panic!("Expected speed lookup failure, got {:?}", e),
        }
        assert!(traj.is_empty());
    }

    #[test]
    fn test_aggregate_path_lookup_failure() {
        let path = FaultyPath {
            inner: straight_path(5),
            fail_from_s: 2.0,
        };
        let speed = const_speed(1.0, 5);

        match TrajectoryAggregator::aggregate(1.0, &init_point(0.0), &path, &speed) {
            Err(AggregateError::PathLookupFailure {
                s_m,
                param_length_m,
                ..
            }) => {
                assert_eq!(s_m, 2.0);
                assert_eq!(param_length_m, 5.0);
            }
            r => panic!("Expected path lookup failure, got {:?}", r),
        }

        // An empty path fails as soon as it is queried
        match TrajectoryAggregator::aggregate(1.0, &init_point(0.0), &PathData::default(), &speed)
        {
            Err(AggregateError::PathLookupFailure { source, .. }) => assert_eq!(
                source,
                LookupError::Empty {
                    series: SeriesKind::Path,
                    key: 0.0
                }
            ),
            r => panic!("Expected path lookup failure, got {:?}", r),
        }
    }

    #[test]
    fn test_aggregate_into_out_of_order() {
        let path = straight_path(10);
        let speed = const_speed(1.0, 5);

        let mut traj = Trajectory::new(0.0);
        TrajectoryAggregator::aggregate_into(1.0, &init_point(3.0), &path, &speed, &mut traj)
            .unwrap();
        assert_eq!(traj.end_point().unwrap().relative_time_s, 7.0);
        let before = traj.clone();

        // A later cycle starting before the destination ends is rejected
        let err =
            TrajectoryAggregator::aggregate_into(1.0, &init_point(0.0), &path, &speed, &mut traj)
                .unwrap_err();
        assert_eq!(
            err,
            AggregateError::OutOfOrder(TrajectoryError::OutOfOrder {
                prev_s: 7.0,
                next_s: 0.0
            })
        );
        assert!(!err.is_lookup_failure());
        assert_eq!(traj, before);

        // Continuing from the end time is fine
        TrajectoryAggregator::aggregate_into(1.0, &init_point(7.0), &path, &speed, &mut traj)
            .unwrap();
        assert_eq!(traj.len(), 10);
    }
}
