use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::{AircraftState, ControlInputs, EngineState};

/// Steady flight condition to trim for. Airspeed is true airspeed (m/s),
/// altitude in metres, climb angle in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TrimCondition {
    StraightAndLevel { airspeed: f64, altitude: f64 },
    SteadyClimb { airspeed: f64, altitude: f64, gamma: f64 },
}

impl TrimCondition {
    pub fn airspeed(&self) -> f64 {
        match *self {
            TrimCondition::StraightAndLevel { airspeed, .. }
            | TrimCondition::SteadyClimb { airspeed, .. } => airspeed,
        }
    }

    pub fn altitude(&self) -> f64 {
        match *self {
            TrimCondition::StraightAndLevel { altitude, .. }
            | TrimCondition::SteadyClimb { altitude, .. } => altitude,
        }
    }

    pub fn flight_path_angle(&self) -> f64 {
        match *self {
            TrimCondition::StraightAndLevel { .. } => 0.0,
            TrimCondition::SteadyClimb { gamma, .. } => gamma,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LongitudinalBounds {
    pub elevator_range: (f64, f64),
    pub throttle_range: (f64, f64),
    pub alpha_range: (f64, f64),
}

impl Default for LongitudinalBounds {
    fn default() -> Self {
        Self {
            elevator_range: (-1.0, 1.0),
            throttle_range: (0.0, 1.0),
            alpha_range: (-10f64.to_radians(), 20f64.to_radians()),
        }
    }
}

/// Configuration for the trim solver
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct TrimSolverConfig {
    /// Maximum number of iterations
    pub max_iterations: u64,
    /// Cost below which the trim counts as converged
    pub cost_tolerance: f64,
    /// Simplex standard deviation at which the search stops
    pub sd_tolerance: f64,
    pub bounds: LongitudinalBounds,
}

impl Default for TrimSolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 2000,
            cost_tolerance: 1e-10,
            sd_tolerance: 1e-16,
            bounds: LongitudinalBounds::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrimResult {
    pub condition: TrimCondition,
    /// Trimmed rigid-body state, heading north at the requested altitude.
    pub state: AircraftState,
    pub controls: ControlInputs,
    /// Engines settled at the trim throttle.
    pub engines: Vec<EngineState>,
    pub alpha: f64,
    pub cost: f64,
    pub converged: bool,
    pub iterations: u64,
}
