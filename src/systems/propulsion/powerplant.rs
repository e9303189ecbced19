use nalgebra::Vector3;

use crate::components::{
    AirData, EngineControls, EngineKind, EngineModel, EngineState, PowerplantConfig,
    PropulsionOutput,
};
use crate::resources::EnvironmentSample;

/// Lever position below which the mixture (or condition lever) cuts fuel.
pub const FUEL_CUTOFF: f64 = 0.05;

/// Air conditions an engine sees during one update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConditions {
    pub density: f64,
    pub density_ratio: f64,
    pub pressure: f64,
    pub speed_of_sound: f64,
    /// Airspeed along the thrust axis, never negative (m/s).
    pub axial_airspeed: f64,
}

impl EngineConditions {
    pub fn new(env: &EnvironmentSample, air_data: &AirData, thrust_axis: &Vector3<f64>) -> Self {
        Self {
            density: env.density,
            density_ratio: env.density_ratio(),
            pressure: env.pressure,
            speed_of_sound: env.speed_of_sound,
            axial_airspeed: air_data.relative_velocity.dot(thrust_axis).max(0.0),
        }
    }
}

/// Capability every engine variant offers: advance its own state one step.
/// The returned state carries thrust along the engine axis and fuel flow.
pub trait Powerplant {
    fn kind(&self) -> EngineKind;

    fn update_state(
        &self,
        state: &EngineState,
        controls: &EngineControls,
        conditions: &EngineConditions,
        dt: f64,
    ) -> EngineState;

    /// State of an engine that has been running long enough at `controls`
    /// for its spool dynamics to settle.
    fn settled_state(
        &self,
        controls: &EngineControls,
        conditions: &EngineConditions,
    ) -> EngineState {
        // An infinitely long step lands on the commanded fraction.
        self.update_state(&EngineState::default(), controls, conditions, f64::INFINITY)
    }
}

impl Powerplant for EngineModel {
    fn kind(&self) -> EngineKind {
        EngineModel::kind(self)
    }

    fn update_state(
        &self,
        state: &EngineState,
        controls: &EngineControls,
        conditions: &EngineConditions,
        dt: f64,
    ) -> EngineState {
        match self {
            EngineModel::FixedPitchPropeller(config) => {
                config.update_state(state, controls, conditions, dt)
            }
            EngineModel::Turboprop(config) => config.update_state(state, controls, conditions, dt),
            EngineModel::Turbojet(config) => config.update_state(state, controls, conditions, dt),
        }
    }
}

/// First-order response toward `target`, with separate time constants for
/// increasing and decreasing values.
pub fn first_order_lag(current: f64, target: f64, tau_up: f64, tau_down: f64, dt: f64) -> f64 {
    let time_constant = if target > current { tau_up } else { tau_down };
    let next = if time_constant > 1e-6 {
        // Exponential decay: s(t+dt) = target + (s(t) - target) * exp(-dt/T)
        let decay = (-dt / time_constant).exp();
        target + (current - target) * decay
    } else {
        target
    };
    next.clamp(0.0, 1.0)
}

/// One installed engine: its variant data plus mounting.
#[derive(Debug, Clone, PartialEq)]
pub struct Engine {
    config: PowerplantConfig,
}

impl Engine {
    pub fn new(config: PowerplantConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PowerplantConfig {
        &self.config
    }

    pub fn conditions(&self, env: &EnvironmentSample, air_data: &AirData) -> EngineConditions {
        EngineConditions::new(env, air_data, &self.config.thrust_axis)
    }

    /// Advances the engine and resolves its thrust into body axes, with the
    /// moment taken about `cg`.
    pub fn update(
        &self,
        state: &EngineState,
        controls: &EngineControls,
        env: &EnvironmentSample,
        air_data: &AirData,
        cg: &Vector3<f64>,
        dt: f64,
    ) -> PropulsionOutput {
        let conditions = self.conditions(env, air_data);
        let next = self.config.model.update_state(state, controls, &conditions, dt);
        self.output(next, cg)
    }

    pub fn settled(
        &self,
        controls: &EngineControls,
        env: &EnvironmentSample,
        air_data: &AirData,
        cg: &Vector3<f64>,
    ) -> PropulsionOutput {
        let conditions = self.conditions(env, air_data);
        let next = self.config.model.settled_state(controls, &conditions);
        self.output(next, cg)
    }

    fn output(&self, state: EngineState, cg: &Vector3<f64>) -> PropulsionOutput {
        let force = self.config.thrust_axis * state.thrust;
        let moment = (self.config.position - cg).cross(&force);
        PropulsionOutput {
            state,
            force,
            moment,
            fuel_flow: state.fuel_flow,
        }
    }
}
