use bevy::prelude::*;
use nalgebra::{Matrix3, Vector3};

use crate::components::{AircraftState, MassModel, StateVector, Wrench};
use crate::resources::IntegrationScheme;
use crate::utils::{FaultOrigin, NumericFault};

const STATE_NAMES: [&str; 12] = [
    "u", "v", "w", "p", "q", "r", "roll", "pitch", "yaw", "north", "east", "down",
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegratorSettings {
    pub scheme: IntegrationScheme,
    /// Pitch magnitude beyond which sec θ is clamped (rad).
    pub pitch_guard: f64,
}

impl Default for IntegratorSettings {
    fn default() -> Self {
        Self {
            scheme: IntegrationScheme::RungeKutta4,
            pitch_guard: 89.5f64.to_radians(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegrationOutcome {
    pub state: AircraftState,
    /// True when the sec θ clamp was active at any stage of the step.
    pub pitch_guard_engaged: bool,
}

/// Rigid-body constants reused across the stages of one step.
struct RigidBody {
    mass: f64,
    inertia: Matrix3<f64>,
    inertia_inv: Matrix3<f64>,
    min_cos_pitch: f64,
}

/// Time derivative of the packed 12-state vector.
///
/// Forces and moments are held constant; gravity is resolved into body axes
/// from the attitude in `x`. Returns whether the sec θ clamp engaged.
pub fn state_derivative(
    x: &StateVector,
    mass: &MassModel,
    wrench: &Wrench,
    gravity: f64,
    pitch_guard: f64,
) -> (StateVector, bool) {
    let body = RigidBody {
        mass: mass.mass,
        inertia: mass.inertia(),
        inertia_inv: mass.inertia_inv(),
        min_cos_pitch: pitch_guard.cos(),
    };
    derivative(x, &body, wrench, gravity)
}

fn derivative(
    x: &StateVector,
    body: &RigidBody,
    wrench: &Wrench,
    gravity: f64,
) -> (StateVector, bool) {
    let state = AircraftState::from_vector(x);
    let velocity = state.velocity;
    let omega = state.angular_rate;
    let (sin_phi, cos_phi) = state.roll().sin_cos();
    let (sin_theta, cos_theta) = state.pitch().sin_cos();

    // Translational
    let gravity_body = Vector3::new(
        -gravity * sin_theta,
        gravity * sin_phi * cos_theta,
        gravity * cos_phi * cos_theta,
    );
    let velocity_dot = wrench.force / body.mass - omega.cross(&velocity) + gravity_body;

    // Rotational: I·ω̇ = M − ω × (I·ω)
    let omega_dot = body.inertia_inv * (wrench.moment - omega.cross(&(body.inertia * omega)));

    // Kinematic, with sec θ bounded near the vertical
    let guard_engaged = cos_theta.abs() < body.min_cos_pitch;
    let cos_theta_eff = if guard_engaged {
        body.min_cos_pitch.copysign(cos_theta)
    } else {
        cos_theta
    };
    let (p, q, r) = (omega.x, omega.y, omega.z);
    let q_sin_r_cos = q * sin_phi + r * cos_phi;
    let euler_dot = Vector3::new(
        p + sin_theta / cos_theta_eff * q_sin_r_cos,
        q * cos_phi - r * sin_phi,
        q_sin_r_cos / cos_theta_eff,
    );

    // Navigation
    let position_dot = state.body_to_ned() * velocity;

    let mut x_dot = StateVector::zeros();
    x_dot.fixed_rows_mut::<3>(0).copy_from(&velocity_dot);
    x_dot.fixed_rows_mut::<3>(3).copy_from(&omega_dot);
    x_dot.fixed_rows_mut::<3>(6).copy_from(&euler_dot);
    x_dot.fixed_rows_mut::<3>(9).copy_from(&position_dot);
    (x_dot, guard_engaged)
}

fn first_non_finite(x: &StateVector) -> Option<&'static str> {
    x.iter()
        .position(|v| !v.is_finite())
        .map(|i| STATE_NAMES[i])
}

/// Advances the rigid body one step under a held net force and moment.
///
/// Euler angles are returned in canonical range. Any non-finite value in
/// the inputs or the result rejects the step with a [`NumericFault`].
pub fn integrate(
    state: &AircraftState,
    mass: &MassModel,
    wrench: &Wrench,
    gravity: f64,
    dt: f64,
    settings: &IntegratorSettings,
) -> Result<IntegrationOutcome, NumericFault> {
    if !wrench.is_finite() {
        return Err(NumericFault::new(
            FaultOrigin::Integrator,
            format!(
                "net load is not finite: force {:?}, moment {:?}",
                wrench.force, wrench.moment
            ),
        ));
    }
    if !gravity.is_finite() || !dt.is_finite() {
        return Err(NumericFault::new(
            FaultOrigin::Integrator,
            format!("gravity {} or time step {} is not finite", gravity, dt),
        ));
    }

    let body = RigidBody {
        mass: mass.mass,
        inertia: mass.inertia(),
        inertia_inv: mass.inertia_inv(),
        min_cos_pitch: settings.pitch_guard.cos(),
    };
    let x0 = state.to_vector();

    let (x1, engaged) = match settings.scheme {
        IntegrationScheme::RungeKutta4 => {
            let (k1, e1) = derivative(&x0, &body, wrench, gravity);
            let (k2, e2) = derivative(&(x0 + k1 * (dt / 2.0)), &body, wrench, gravity);
            let (k3, e3) = derivative(&(x0 + k2 * (dt / 2.0)), &body, wrench, gravity);
            let (k4, e4) = derivative(&(x0 + k3 * dt), &body, wrench, gravity);
            (
                x0 + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (dt / 6.0),
                e1 || e2 || e3 || e4,
            )
        }
        IntegrationScheme::ForwardEuler => {
            let (k1, e1) = derivative(&x0, &body, wrench, gravity);
            (x0 + k1 * dt, e1)
        }
    };

    if let Some(name) = first_non_finite(&x1) {
        return Err(NumericFault::new(
            FaultOrigin::Integrator,
            format!("state {} became non-finite after a {} s step", name, dt),
        ));
    }
    if engaged {
        debug!("Pitch guard engaged at θ = {:.2}°", state.pitch().to_degrees());
    }

    Ok(IntegrationOutcome {
        state: AircraftState::from_vector(&x1).normalized(),
        pitch_guard_engaged: engaged,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::constants::GRAVITY;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    fn mass() -> MassModel {
        MassModel::light_single()
    }

    #[test]
    fn test_free_fall_matches_kinematics() {
        let settings = IntegratorSettings::default();
        let mut state = AircraftState::level_flight(0.0, 1000.0, 0.0);
        let dt = 0.01;
        for _ in 0..300 {
            state = integrate(&state, &mass(), &Wrench::default(), GRAVITY, dt, &settings)
                .unwrap()
                .state;
        }
        let t = 3.0;
        assert_relative_eq!(state.velocity.z, GRAVITY * t, max_relative = 1e-9);
        assert_relative_eq!(state.altitude(), 1000.0 - 0.5 * GRAVITY * t * t, max_relative = 1e-9);
        assert_relative_eq!(state.velocity.x, 0.0);
    }

    #[test]
    fn test_euler_scheme_is_first_order() {
        let settings = IntegratorSettings {
            scheme: IntegrationScheme::ForwardEuler,
            ..Default::default()
        };
        let mut state = AircraftState::level_flight(0.0, 1000.0, 0.0);
        for _ in 0..100 {
            state = integrate(&state, &mass(), &Wrench::default(), GRAVITY, 0.01, &settings)
                .unwrap()
                .state;
        }
        // Velocity is exact, position lags by g·dt·t/2.
        assert_relative_eq!(state.velocity.z, GRAVITY, max_relative = 1e-9);
        let exact_drop = 0.5 * GRAVITY;
        let drop = 1000.0 - state.altitude();
        assert_relative_eq!(exact_drop - drop, 0.5 * GRAVITY * 0.01, max_relative = 1e-6);
    }

    #[test]
    fn test_torque_free_spin_conserves_momentum() {
        let mut state = AircraftState::level_flight(0.0, 1000.0, 0.0);
        state.angular_rate = Vector3::new(0.3, 0.2, -0.1);
        let m = MassModel::new(1000.0, 1200.0, 1800.0, 2600.0, 80.0);
        let h0 = m.inertia() * state.angular_rate;
        let energy0 = state.angular_rate.dot(&h0);
        let settings = IntegratorSettings::default();
        for _ in 0..1000 {
            state = integrate(&state, &m, &Wrench::default(), 0.0, 0.01, &settings)
                .unwrap()
                .state;
        }
        let h = m.inertia() * state.angular_rate;
        assert_relative_eq!(h.norm(), h0.norm(), max_relative = 1e-6);
        assert_relative_eq!(state.angular_rate.dot(&h), energy0, max_relative = 1e-6);
    }

    #[test]
    fn test_pitch_guard_clamps_near_vertical() {
        let mut x = AircraftState::level_flight(50.0, 1000.0, 0.0);
        x.attitude.y = FRAC_PI_2 - 1e-9;
        x.angular_rate = Vector3::new(0.0, 0.0, 0.2);
        let guard = 89.5f64.to_radians();
        let (dx, engaged) = state_derivative(&x.to_vector(), &mass(), &Wrench::default(), GRAVITY, guard);
        assert!(engaged);
        assert!(dx[8].abs() <= 0.2 / guard.cos() + 1e-9);
        assert!(dx.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_non_finite_load_is_rejected() {
        let state = AircraftState::level_flight(50.0, 1000.0, 0.0);
        let wrench = Wrench::new(Vector3::new(f64::NAN, 0.0, 0.0), Vector3::zeros());
        let fault = integrate(&state, &mass(), &wrench, GRAVITY, 0.01, &IntegratorSettings::default())
            .unwrap_err();
        assert_eq!(fault.origin, FaultOrigin::Integrator);
    }

    #[test]
    fn test_overflow_is_rejected() {
        let mut state = AircraftState::level_flight(50.0, 1000.0, 0.0);
        state.angular_rate = Vector3::new(1e200, 1e200, 1e200);
        let result = integrate(&state, &mass(), &Wrench::default(), GRAVITY, 0.01, &IntegratorSettings::default());
        assert!(result.is_err());
    }
}
