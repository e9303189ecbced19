use std::f64::consts::PI;

use super::powerplant::{first_order_lag, EngineConditions, Powerplant, FUEL_CUTOFF};
use crate::components::{
    EngineControls, EngineKind, EngineState, PistonPropellerConfig, TurbopropConfig,
};

/// Propeller thrust from shaft power. The static limit follows momentum
/// theory, `FM·(2ρA·P²)^(1/3)`; in forward flight thrust is `ηP/V`. The
/// smaller of the two applies, which blends them without a switch speed.
pub fn propeller_thrust(
    shaft_power: f64,
    diameter: f64,
    efficiency: f64,
    figure_of_merit: f64,
    density: f64,
    airspeed: f64,
) -> f64 {
    if shaft_power <= 0.0 || density <= 0.0 {
        return 0.0;
    }
    let disk_area = PI * diameter * diameter / 4.0;
    let static_thrust =
        figure_of_merit * (2.0 * density * disk_area * shaft_power * shaft_power).cbrt();
    if airspeed <= 0.0 {
        return static_thrust;
    }
    static_thrust.min(efficiency * shaft_power / airspeed)
}

fn shaft_torque(shaft_power: f64, rpm: f64) -> f64 {
    let omega = rpm * 2.0 * PI / 60.0;
    if omega > 1.0 {
        shaft_power / omega
    } else {
        0.0
    }
}

/// Gagg-Ferrar power lapse for normally aspirated piston engines.
pub fn piston_power_lapse(density_ratio: f64) -> f64 {
    (1.132 * density_ratio - 0.132).clamp(0.0, 1.2)
}

/// Power multiplier for the mixture lever: best power near full rich,
/// falling off as the mixture is leaned.
pub fn mixture_factor(mixture: f64) -> f64 {
    if mixture < FUEL_CUTOFF {
        0.0
    } else {
        1.0 - 0.3 * (1.0 - mixture).powi(2)
    }
}

impl Powerplant for PistonPropellerConfig {
    fn kind(&self) -> EngineKind {
        EngineKind::FixedPitchPropeller
    }

    fn update_state(
        &self,
        state: &EngineState,
        controls: &EngineControls,
        conditions: &EngineConditions,
        dt: f64,
    ) -> EngineState {
        let running = controls.mixture >= FUEL_CUTOFF;
        let throttle = controls.throttle.clamp(0.0, 1.0);
        let target = if running {
            self.idle_power_fraction + (1.0 - self.idle_power_fraction) * throttle
        } else {
            0.0
        };
        let power_fraction = first_order_lag(
            state.power_fraction,
            target,
            self.response_time,
            self.response_time,
            dt,
        );

        let shaft_power = self.max_power
            * piston_power_lapse(conditions.density_ratio)
            * mixture_factor(controls.mixture)
            * power_fraction;

        let rpm = if running {
            self.idle_rpm + (self.rated_rpm - self.idle_rpm) * power_fraction
        } else {
            0.0
        };

        let thrust = propeller_thrust(
            shaft_power,
            self.prop_diameter,
            self.prop_efficiency,
            self.figure_of_merit,
            conditions.density,
            conditions.axial_airspeed,
        );

        let manifold_pressure = if running {
            conditions.pressure * (0.3 + 0.7 * throttle)
        } else {
            conditions.pressure
        };

        EngineState {
            power_fraction,
            rpm,
            manifold_pressure,
            shaft_power,
            fuel_flow: self.sfc * shaft_power,
            thrust,
            torque: shaft_torque(shaft_power, rpm),
        }
    }
}

impl Powerplant for TurbopropConfig {
    fn kind(&self) -> EngineKind {
        EngineKind::Turboprop
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
            self.idle_power_fraction + (1.0 - self.idle_power_fraction) * controls.throttle
        } else {
            0.0
        };
        let power_fraction = first_order_lag(
            state.power_fraction,
            target,
            self.spool_up_time,
            self.spool_down_time,
            dt,
        );

        // Flat-rated turbine, lapse weaker than a piston engine
        let lapse = conditions.density_ratio.max(0.0).powf(0.7);
        let shaft_power = self.max_power * lapse * power_fraction;

        // Constant-speed propeller: the governor holds the selected RPM
        let rpm = if running {
            self.min_prop_rpm + (self.max_prop_rpm - self.min_prop_rpm) * controls.prop_pitch
        } else {
            0.0
        };
        // Coarse pitch trades a little static thrust for cruise efficiency
        let coarse = 1.0 - controls.prop_pitch.clamp(0.0, 1.0);
        let thrust = propeller_thrust(
            shaft_power,
            self.prop_diameter,
            self.prop_efficiency * (1.0 + 0.03 * coarse),
            self.figure_of_merit * (1.0 - 0.15 * coarse),
            conditions.density,
            conditions.axial_airspeed,
        );

        EngineState {
            power_fraction,
            rpm,
            manifold_pressure: conditions.pressure * (1.0 + 8.0 * power_fraction),
            shaft_power,
            fuel_flow: self.sfc * shaft_power,
            thrust,
            torque: shaft_torque(shaft_power, rpm),
        }
    }
}
