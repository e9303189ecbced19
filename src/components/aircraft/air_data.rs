use bevy::prelude::*;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::utils::constants::ISA_SEA_LEVEL_DENSITY;

/// Represents aerodynamic data for the aircraft.
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AirData {
    /// True airspeed of the aircraft (m/s).
    pub true_airspeed: f64,
    /// Equivalent airspeed, TAS scaled by √σ (m/s).
    pub equivalent_airspeed: f64,
    /// Angle of attack (α) in radians.
    pub alpha: f64,
    /// Sideslip angle (β) in radians.
    pub beta: f64,
    /// Rate of change of α estimated from the previous step (rad/s).
    pub alpha_dot: f64,
    /// Dynamic pressure acting on the aircraft (Pa).
    pub dynamic_pressure: f64,
    /// Air density (kg/m³).
    pub density: f64,
    pub mach: f64,
    /// Velocity relative to the air mass, body axes (m/s).
    pub relative_velocity: Vector3<f64>,
    /// Wind velocity resolved into body axes (m/s).
    pub wind_velocity: Vector3<f64>,
}

impl Default for AirData {
    /// Provides a default state for zero airspeed and no wind.
    fn default() -> Self {
        Self {
            true_airspeed: 0.0,
            equivalent_airspeed: 0.0,
            alpha: 0.0,
            beta: 0.0,
            alpha_dot: 0.0,
            dynamic_pressure: 0.0,
            density: ISA_SEA_LEVEL_DENSITY,
            mach: 0.0,
            relative_velocity: Vector3::zeros(),
            wind_velocity: Vector3::zeros(),
        }
    }
}
