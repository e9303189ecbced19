use bevy::prelude::*;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Live condition of one engine. Created from the engine list at run start
/// and advanced once per step by the propulsion model.
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineState {
    /// Lagged power (or thrust) fraction, 0 at idle and 1 at full power.
    pub power_fraction: f64,
    /// Engine or propeller speed (rev/min).
    pub rpm: f64,
    /// Manifold pressure for piston engines, compressor delivery pressure
    /// for turbines (Pa).
    pub manifold_pressure: f64,
    /// Shaft power delivered to the propeller (W); zero for jets.
    pub shaft_power: f64,
    /// Fuel flow (kg/s).
    pub fuel_flow: f64,
    /// Thrust along the engine axis (N).
    pub thrust: f64,
    /// Shaft torque (N·m).
    pub torque: f64,
}

impl Default for EngineState {
    fn default() -> Self {
        Self {
            power_fraction: 0.0,
            rpm: 0.0,
            manifold_pressure: 0.0,
            shaft_power: 0.0,
            fuel_flow: 0.0,
            thrust: 0.0,
            torque: 0.0,
        }
    }
}

impl EngineState {
    /// Engine settled at the given power fraction.
    pub fn settled(power_fraction: f64) -> Self {
        Self {
            power_fraction: power_fraction.clamp(0.0, 1.0),
            ..Default::default()
        }
    }

    pub fn is_finite(&self) -> bool {
        [
            self.power_fraction,
            self.rpm,
            self.manifold_pressure,
            self.shaft_power,
            self.fuel_flow,
            self.thrust,
            self.torque,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// What one engine update returns to the force assembly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropulsionOutput {
    pub state: EngineState,
    /// Thrust force, body axes (N).
    pub force: Vector3<f64>,
    /// Thrust moment about the c.g., body axes (N·m).
    pub moment: Vector3<f64>,
    /// Fuel flow (kg/s).
    pub fuel_flow: f64,
}
