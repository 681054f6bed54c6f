//! Planning executable parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// Internal
use crate::scenario::{ArcPathParams, SpeedProfileParams};
use util::logger::LogParams;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the planning executable
#[derive(Deserialize, Debug, Clone)]
pub struct Params {

    /// Logging levels, defaulting to `Info` everywhere if not given
    #[serde(default)]
    pub log: LogParams,

    /// Time between consecutive points of the aggregated trajectory
    pub time_resolution_s: f64,

    /// Number of planning cycles to run
    pub num_cycles: usize,

    /// Time between the start of consecutive planning cycles
    pub cycle_period_s: f64,

    /// Path used each cycle
    pub path: ArcPathParams,

    /// Speed profile used each cycle
    pub speed: SpeedProfileParams
}
