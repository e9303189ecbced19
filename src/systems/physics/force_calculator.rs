use nalgebra::Vector3;

use crate::components::{
    AircraftGeometry, AircraftState, ForceAccumulator, ForceCategory, MassModel, Wrench,
};

/// Static gear deflection under the full weight (m).
const STATIC_DEFLECTION: f64 = 0.05;
/// Damping ratio of each gear leg.
const GEAR_DAMPING_RATIO: f64 = 0.6;
/// Rolling friction coefficient with the brakes released.
const ROLLING_FRICTION: f64 = 0.02;
/// Extra friction at full brake pressure.
const BRAKE_FRICTION: f64 = 0.6;
/// Sideways tyre friction coefficient.
const SIDE_FRICTION: f64 = 0.6;
/// Wheel speed at which friction reaches its full value (m/s).
const FRICTION_SLIP_SPEED: f64 = 0.5;

/// Tricycle undercarriage contact points relative to the c.g., body axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GearLayout {
    pub wheels: [Vector3<f64>; 3],
    /// Spring rate per leg (N/m).
    pub stiffness: f64,
    /// Damping per leg (N·s/m).
    pub damping: f64,
}

impl GearLayout {
    pub fn new(geometry: &AircraftGeometry, mass: &MassModel, gravity: f64) -> Self {
        let h = geometry.gear_height;
        let nose_x = 0.8 * geometry.mac;
        let main_x = -0.3 * geometry.mac;
        let track = 0.12 * geometry.wing_span;
        let leg_mass = mass.mass / 3.0;
        let stiffness = mass.mass * gravity / (3.0 * STATIC_DEFLECTION);
        Self {
            wheels: [
                Vector3::new(nose_x, 0.0, h),
                Vector3::new(main_x, -track, h),
                Vector3::new(main_x, track, h),
            ],
            stiffness,
            damping: 2.0 * GEAR_DAMPING_RATIO * (stiffness * leg_mass).sqrt(),
        }
    }
}

fn saturate(speed: f64) -> f64 {
    (speed / FRICTION_SLIP_SPEED).clamp(-1.0, 1.0)
}

/// Spring-damper ground reaction with tyre friction, body axes about the
/// c.g. Zero while every wheel is above the ground plane.
///
/// `ground_elevation` is the height of the ground plane (m) and `brakes`
/// the normalized brake pressure.
pub fn calculate_ground_forces(
    state: &AircraftState,
    gear: &GearLayout,
    ground_elevation: f64,
    brakes: f64,
) -> Wrench {
    let c_bn = state.body_to_ned();
    let c_nb = c_bn.transpose();
    let longitudinal_friction = ROLLING_FRICTION + BRAKE_FRICTION * brakes.clamp(0.0, 1.0);

    let mut total = Wrench::default();
    for wheel in &gear.wheels {
        let wheel_ned = state.position + c_bn * wheel;
        let penetration = wheel_ned.z + ground_elevation;
        if penetration <= 0.0 {
            continue;
        }

        let wheel_velocity = state.velocity + state.angular_rate.cross(wheel);
        let sink_rate = (c_bn * wheel_velocity).z;
        let normal = (gear.stiffness * penetration + gear.damping * sink_rate).max(0.0);
        if normal == 0.0 {
            continue;
        }

        let support = c_nb * Vector3::new(0.0, 0.0, -normal);
        let friction = Vector3::new(
            -longitudinal_friction * normal * saturate(wheel_velocity.x),
            -SIDE_FRICTION * normal * saturate(wheel_velocity.y),
            0.0,
        );
        total += Wrench::from_force_at(support + friction, wheel);
    }
    total
}

/// Weight resolved into body axes. Reported for the load breakdown; the
/// integrator applies gravity itself.
pub fn calculate_gravity_force(state: &AircraftState, mass: &MassModel, gravity: f64) -> Wrench {
    let weight_ned = Vector3::new(0.0, 0.0, mass.mass * gravity);
    Wrench::new(state.body_to_ned().transpose() * weight_ned, Vector3::zeros())
}

/// Sum of the loads the integrator treats as external, i.e. everything
/// except gravity.
pub fn calculate_net_forces_moments(forces: &ForceAccumulator) -> Wrench {
    forces.sum_of(&[
        ForceCategory::Aerodynamic,
        ForceCategory::Propulsive,
        ForceCategory::Ground,
        ForceCategory::External,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::AircraftParameters;
    use crate::utils::constants::GRAVITY;
    use approx::assert_relative_eq;

    fn gear() -> (GearLayout, AircraftParameters) {
        let params = AircraftParameters::light_single();
        (
            GearLayout::new(&params.geometry, &params.mass, GRAVITY),
            params,
        )
    }

    #[test]
    fn test_airborne_has_no_ground_load() {
        let (gear, _) = gear();
        let state = AircraftState::level_flight(50.0, 100.0, 0.0);
        assert_eq!(calculate_ground_forces(&state, &gear, 0.0, 0.0), Wrench::default());
    }

    #[test]
    fn test_static_deflection_carries_weight() {
        let (gear, params) = gear();
        let state = AircraftState::at_rest(params.geometry.gear_height - STATIC_DEFLECTION, 0.0);
        let wrench = calculate_ground_forces(&state, &gear, 0.0, 0.0);
        assert_relative_eq!(wrench.force.z, -params.mass.mass * GRAVITY, max_relative = 1e-9);
        assert_relative_eq!(wrench.force.x, 0.0);
        assert_relative_eq!(wrench.moment.x, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_brakes_oppose_rolling() {
        let (gear, params) = gear();
        let mut state = AircraftState::at_rest(params.geometry.gear_height - STATIC_DEFLECTION, 0.0);
        state.velocity.x = 5.0;
        let free = calculate_ground_forces(&state, &gear, 0.0, 0.0);
        let braked = calculate_ground_forces(&state, &gear, 0.0, 1.0);
        assert!(free.force.x < 0.0);
        assert!(braked.force.x < free.force.x);
    }

    #[test]
    fn test_level_gravity_force() {
        let (_, params) = gear();
        let state = AircraftState::level_flight(50.0, 100.0, 1.0);
        let weight = calculate_gravity_force(&state, &params.mass, GRAVITY);
        assert_relative_eq!(weight.force, Vector3::new(0.0, 0.0, params.mass.mass * GRAVITY), epsilon = 1e-9);
    }
}
