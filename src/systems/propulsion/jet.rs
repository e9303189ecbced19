use super::powerplant::{first_order_lag, EngineConditions, Powerplant, FUEL_CUTOFF};
use crate::components::{EngineControls, EngineKind, EngineState, TurbojetConfig};

/// Idle spool speed as a fraction of maximum.
const IDLE_RPM_FRACTION: f64 = 0.6;

impl Powerplant for TurbojetConfig {
    fn kind(&self) -> EngineKind {
        EngineKind::Turbojet
    }

    fn update_state(
        &self,
        state: &EngineState,
        controls: &EngineControls,
        conditions: &EngineConditions,
        dt: f64,
    ) -> EngineState {
        let running = controls.mixture >= FUEL_CUTOFF;
        let target = if running {
            controls.throttle.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let thrust_fraction = first_order_lag(
            state.power_fraction,
            target,
            self.spool_up_time,
            self.spool_down_time,
            dt,
        );

        if !running {
            return EngineState {
                power_fraction: thrust_fraction,
                manifold_pressure: conditions.pressure,
                ..Default::default()
            };
        }

        // Simple density correction (power 0.5) and ram drag with Mach
        let rho_factor = conditions.density_ratio.max(0.01).sqrt();
        let mach = (conditions.axial_airspeed / conditions.speed_of_sound).max(0.0);
        let ram_factor = (1.0 - 0.1 * mach).max(0.0);

        let max_available = (self.max_thrust * rho_factor * ram_factor).max(0.0);
        let min_available = (self.min_thrust * rho_factor).max(0.0);
        let effective_max = max_available.max(min_available);
        let thrust = min_available + (effective_max - min_available) * thrust_fraction;

        let fuel_flow = thrust * self.tsfc * (1.0 + 0.2 * thrust_fraction);

        EngineState {
            power_fraction: thrust_fraction,
            rpm: self.max_rpm * (IDLE_RPM_FRACTION + (1.0 - IDLE_RPM_FRACTION) * thrust_fraction),
            manifold_pressure: conditions.pressure * (1.0 + 11.0 * thrust_fraction),
            shaft_power: 0.0,
            fuel_flow,
            thrust,
            torque: 0.0,
        }
    }
}
