//! Planning executable entry point.
//!
//! # Architecture
//!
//! Each planning cycle consists of:
//!
//!     - Building the cycle's planning data:
//!         - Initial planning point
//!         - Reference line and decisions
//!         - Path and speed profile
//!     - Aggregating the path and speed profile into a trajectory
//!     - Archiving the trajectory
//!
//! The path and speed profile are generated from the scenario given in the parameters, standing
//! in for the path and speed optimisers.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::{eyre, WrapErr}, Report};
use log::{debug, info, warn};
use serde::Serialize;
use std::thread;
use std::time::{Duration, Instant};

// Internal
use plan_lib::{
    context::{DecisionType, ReferencePoint},
    params::Params,
    scenario,
    trajectory::{Trajectory, TrajectoryPoint},
    PlanningData,
};
use util::{
    archive::Archiver,
    logger::logger_init,
    session::{self, Session},
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A single archived trajectory point.
#[derive(Serialize)]
struct TrajectoryRecord {
    cycle: usize,
    header_time_s: f64,
    relative_time_s: f64,
    x_m: f64,
    y_m: f64,
    heading_rad: f64,
    curvature_m: f64,
    s_m: f64,
    v_ms: f64,
    a_mss: f64,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {

    // ---- EARLY INITIALISATION ----

    color_eyre::install()?;

    // Parameters are needed before logging starts as they hold the log levels
    let params: Params = util::params::load(
        "plan_exec.toml"
    ).wrap_err("Could not load plan_exec params")?;

    // Initialise session
    let session = Session::new(
        "plan_exec",
        "sessions"
    ).wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(&params.log, &session)
        .wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Trajectory Planning Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- CHECK PARAMETERS ----

    if !(params.cycle_period_s >= 0.0 && params.cycle_period_s.is_finite()) {
        return Err(eyre!(
            "Expected a non-negative cycle period, found {}", params.cycle_period_s
        ));
    }

    info!("Exec parameters loaded");

    // ---- BUILD SCENARIO ----

    let path_data = scenario::arc_path(&params.path)
        .wrap_err("Failed to generate the scenario path")?;
    let speed_data = scenario::const_accel_profile(&params.speed)
        .wrap_err("Failed to generate the scenario speed profile")?;

    info!("Scenario path: {}", path_data);
    info!("Scenario speed profile: {}\n", speed_data);

    // The path is planned along the reference line, so just use the path poses as the line
    let ref_points: Vec<ReferencePoint> = path_data
        .points()
        .iter()
        .map(|p| ReferencePoint {
            x_m: p.x_m,
            y_m: p.y_m,
            heading_rad: p.heading_rad,
            curvature_m: p.curvature_m,
        })
        .collect();

    let mut archiver = Archiver::from_path(&session, "trajectory.csv")
        .wrap_err("Failed to create the trajectory archive")?;

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    let header_time_s = session::get_elapsed_seconds();
    let mut num_published = 0;

    for cycle in 0..params.num_cycles {

        let cycle_start_instant = Instant::now();

        // ---- PLANNING DATA ----

        let mut planning_data = PlanningData::new();
        planning_data.set_init_planning_point(TrajectoryPoint {
            relative_time_s: cycle as f64 * params.cycle_period_s,
            ..Default::default()
        });
        planning_data.set_reference_line(ref_points.clone());
        planning_data.decision_data_mut().add("static_obstacle_0", DecisionType::Ignore);
        planning_data.set_path_data(path_data.clone());
        planning_data.set_speed_data(speed_data.clone());

        debug!("Planning data: {}", planning_data.debug_string());

        // ---- AGGREGATION ----

        let mut trajectory = Trajectory::new(header_time_s);
        match planning_data.aggregate_into(params.time_resolution_s, &mut trajectory) {
            Ok(()) => {
                info!(
                    "Cycle {}: trajectory with {} points over {:.03} s",
                    cycle,
                    trajectory.len(),
                    trajectory.time_length()
                );
                num_published += 1;
            }
            Err(e) => {
                warn!("Cycle {}: aggregation failed, no trajectory published: {}", cycle, e);
            }
        }

        // ---- ARCHIVE ----

        // Failed cycles leave the trajectory empty, so nothing is archived for them
        for p in trajectory.points() {
            archiver.serialise(TrajectoryRecord {
                cycle,
                header_time_s: trajectory.header_time_s,
                relative_time_s: p.relative_time_s,
                x_m: p.path_point.x_m,
                y_m: p.path_point.y_m,
                heading_rad: p.path_point.heading_rad,
                curvature_m: p.path_point.curvature_m,
                s_m: p.path_point.s_m,
                v_ms: p.v_ms,
                a_mss: p.a_mss,
            }).wrap_err("Failed to archive the trajectory")?;
        }

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        // Get sleep duration
        match Duration::from_secs_f64(params.cycle_period_s)
            .checked_sub(cycle_dur)
        {
            Some(d) => thread::sleep(d),
            None => {
                warn!(
                    "Cycle overran by {:.06} s",
                    cycle_dur.as_secs_f64() - params.cycle_period_s
                );
            }
        }
    }

    info!(
        "Published {} trajectories in {} cycles",
        num_published,
        params.num_cycles
    );

    Ok(())
}
