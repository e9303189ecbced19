use nalgebra::Vector3;
use std::f64::consts::{FRAC_PI_2, PI};

use crate::components::{
    AirData, AircraftAeroCoefficients, AircraftGeometry, ControlInputs, Wrench,
};
use crate::utils::constants::MIN_AIRSPEED;

/// Angle of attack range the linear coefficient model is evaluated over.
const ALPHA_LIMITS: (f64, f64) = (-0.35, 0.52); // about -20° to 30°
/// Sideslip range the linear coefficient model is evaluated over.
const BETA_LIMIT: f64 = 0.35;

/// Non-dimensional force and moment coefficients. Roll and yaw are about
/// stability axes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AeroCoefficientValues {
    pub c_l: f64,
    pub c_d: f64,
    pub c_y: f64,
    pub c_roll: f64,
    pub c_m: f64,
    pub c_n: f64,
}

/// Builds up the six coefficients from the linear derivative set.
pub fn calculate_coefficients(
    geometry: &AircraftGeometry,
    coeffs: &AircraftAeroCoefficients,
    air_data: &AirData,
    angular_rate: &Vector3<f64>,
    controls: &ControlInputs,
) -> AeroCoefficientValues {
    let airspeed = air_data.true_airspeed;
    if airspeed <= MIN_AIRSPEED {
        return AeroCoefficientValues::default();
    }

    // Flow from behind sees a reversed wing, which keeps the coefficients
    // continuous through α = ±π
    let raw_alpha = if air_data.alpha.abs() > FRAC_PI_2 {
        air_data.alpha - PI.copysign(air_data.alpha)
    } else {
        air_data.alpha
    };
    let alpha = raw_alpha.clamp(ALPHA_LIMITS.0, ALPHA_LIMITS.1);
    let beta = air_data.beta.clamp(-BETA_LIMIT, BETA_LIMIT);
    // Unsteady terms only inside the range the derivatives were fitted over
    let in_linear_range = (ALPHA_LIMITS.0..=ALPHA_LIMITS.1).contains(&air_data.alpha);

    // Non-dimensional rates
    let span_factor = geometry.wing_span / (2.0 * airspeed);
    let chord_factor = geometry.mac / (2.0 * airspeed);
    let p_hat = angular_rate.x * span_factor;
    let q_hat = angular_rate.y * chord_factor;
    let r_hat = angular_rate.z * span_factor;
    let alpha_dot_hat = if in_linear_range {
        air_data.alpha_dot * chord_factor
    } else {
        0.0
    };

    let limits = &geometry.control_limits;
    let elevator = controls.elevator * limits.elevator;
    let aileron = controls.aileron * limits.aileron;
    let rudder = controls.rudder * limits.rudder;
    let flap = controls.flaps * limits.flap;

    let lift = &coeffs.lift;
    let c_l = lift.c_l_0
        + lift.c_l_alpha * alpha
        + lift.c_l_q * q_hat
        + lift.c_l_alphadot * alpha_dot_hat
        + lift.c_l_elevator * elevator
        + lift.c_l_flap * flap;

    let drag = &coeffs.drag;
    let c_d = drag.c_d_0
        + drag.c_d_alpha * alpha
        + drag.c_d_alpha2 * alpha * alpha
        + drag.c_d_elevator * elevator.abs()
        + drag.c_d_flap * flap
        + drag.c_d_gear * controls.gear;

    let side = &coeffs.side_force;
    let c_y = side.c_y_beta * beta
        + side.c_y_p * p_hat
        + side.c_y_r * r_hat
        + side.c_y_aileron * aileron
        + side.c_y_rudder * rudder;

    let roll = &coeffs.roll;
    let c_roll = roll.c_l_beta * beta
        + roll.c_l_p * p_hat
        + roll.c_l_r * r_hat
        + roll.c_l_aileron * aileron
        + roll.c_l_rudder * rudder;

    let pitch = &coeffs.pitch;
    let c_m = pitch.c_m_0
        + pitch.c_m_alpha * alpha
        + pitch.c_m_q * q_hat
        + pitch.c_m_alphadot * alpha_dot_hat
        + pitch.c_m_elevator * elevator
        + pitch.c_m_flap * flap;

    let yaw = &coeffs.yaw;
    let c_n = yaw.c_n_beta * beta
        + yaw.c_n_p * p_hat
        + yaw.c_n_r * r_hat
        + yaw.c_n_aileron * aileron
        + yaw.c_n_rudder * rudder;

    AeroCoefficientValues {
        c_l,
        c_d,
        c_y,
        c_roll,
        c_m,
        c_n,
    }
}

/// Calculates aerodynamic forces and moments in the BODY frame, with the
/// moment taken about the centre of gravity.
///
/// Lift and drag act in the stability frame (rotated from body axes by α);
/// the moments are referenced to the aerodynamic centre and transferred to
/// the c.g. through the moment arm.
pub fn calculate_aerodynamic_forces_moments(
    geometry: &AircraftGeometry,
    coeffs: &AircraftAeroCoefficients,
    air_data: &AirData,
    angular_rate: &Vector3<f64>,
    controls: &ControlInputs,
) -> Wrench {
    if air_data.dynamic_pressure <= 0.0 || air_data.true_airspeed <= MIN_AIRSPEED {
        return Wrench::default();
    }

    let c = calculate_coefficients(geometry, coeffs, air_data, angular_rate, controls);
    let q_s = air_data.dynamic_pressure * geometry.wing_area;

    let lift = q_s * c.c_l;
    let drag = q_s * c.c_d;
    let side = q_s * c.c_y;

    let (sin_a, cos_a) = air_data.alpha.sin_cos();
    let force = Vector3::new(
        -drag * cos_a + lift * sin_a,
        side,
        -drag * sin_a - lift * cos_a,
    );

    let roll_stab = q_s * geometry.wing_span * c.c_roll;
    let pitch = q_s * geometry.mac * c.c_m;
    let yaw_stab = q_s * geometry.wing_span * c.c_n;
    let moment_ac = Vector3::new(
        roll_stab * cos_a - yaw_stab * sin_a,
        pitch,
        roll_stab * sin_a + yaw_stab * cos_a,
    );

    Wrench::new(force, moment_ac + geometry.ac_arm().cross(&force))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::AircraftParameters;
    use approx::assert_relative_eq;

    fn air_data(airspeed: f64, alpha: f64, beta: f64) -> AirData {
        let density = 1.225;
        AirData {
            true_airspeed: airspeed,
            alpha,
            beta,
            dynamic_pressure: 0.5 * density * airspeed * airspeed,
            density,
            ..Default::default()
        }
    }

    #[test]
    fn test_zero_airspeed_no_loads() {
        let params = AircraftParameters::light_single();
        let wrench = calculate_aerodynamic_forces_moments(
            &params.geometry,
            &params.aero_coef,
            &AirData::default(),
            &Vector3::new(0.1, 0.1, 0.1),
            &ControlInputs::default(),
        );
        assert_eq!(wrench, Wrench::default());
    }

    #[test]
    fn test_lift_points_up_at_positive_alpha() {
        let params = AircraftParameters::light_single();
        let wrench = calculate_aerodynamic_forces_moments(
            &params.geometry,
            &params.aero_coef,
            &air_data(50.0, 0.05, 0.0),
            &Vector3::zeros(),
            &ControlInputs::default(),
        );
        assert!(wrench.force.z < 0.0);
        assert_relative_eq!(wrench.force.y, 0.0);
    }

    #[test]
    fn test_pitch_stiffness_is_restoring() {
        let params = AircraftParameters::light_single();
        let moment_at = |alpha: f64| {
            calculate_aerodynamic_forces_moments(
                &params.geometry,
                &params.aero_coef,
                &air_data(50.0, alpha, 0.0),
                &Vector3::zeros(),
                &ControlInputs::default(),
            )
            .moment
            .y
        };
        assert!(moment_at(0.1) < moment_at(0.0));
    }

    #[test]
    fn test_roll_damping_opposes_rate() {
        let params = AircraftParameters::light_single();
        let wrench = calculate_aerodynamic_forces_moments(
            &params.geometry,
            &params.aero_coef,
            &air_data(50.0, 0.0, 0.0),
            &Vector3::new(0.5, 0.0, 0.0),
            &ControlInputs::default(),
        );
        assert!(wrench.moment.x < 0.0);
    }

    #[test]
    fn test_reverse_flow_is_continuous_through_pi() {
        let params = AircraftParameters::light_single();
        let loads_at = |alpha: f64| {
            calculate_aerodynamic_forces_moments(
                &params.geometry,
                &params.aero_coef,
                &air_data(10.0, alpha, 0.0),
                &Vector3::zeros(),
                &ControlInputs::default(),
            )
        };
        let above = loads_at(std::f64::consts::PI - 1e-4);
        let below = loads_at(-std::f64::consts::PI + 1e-4);
        assert_relative_eq!(above.force, below.force, epsilon = 1.0);
        assert_relative_eq!(above.moment, below.moment, epsilon = 1.0);
    }

    #[test]
    fn test_alpha_rate_ignored_outside_linear_range() {
        let params = AircraftParameters::light_single();
        let loads_with_rate = |alpha: f64, alpha_dot: f64| {
            let mut air = air_data(10.0, alpha, 0.0);
            air.alpha_dot = alpha_dot;
            calculate_aerodynamic_forces_moments(
                &params.geometry,
                &params.aero_coef,
                &air,
                &Vector3::zeros(),
                &ControlInputs::default(),
            )
        };
        let reversed = 3.0;
        assert_eq!(loads_with_rate(reversed, 600.0), loads_with_rate(reversed, 0.0));
        assert_ne!(loads_with_rate(0.05, 1.0), loads_with_rate(0.05, 0.0));
    }

    #[test]
    fn test_ac_offset_transfers_moment() {
        let mut params = AircraftParameters::light_single();
        let centred = calculate_aerodynamic_forces_moments(
            &params.geometry,
            &params.aero_coef,
            &air_data(50.0, 0.05, 0.0),
            &Vector3::zeros(),
            &ControlInputs::default(),
        );
        params.geometry.ac_position = Vector3::new(-0.2, 0.0, 0.0);
        let aft = calculate_aerodynamic_forces_moments(
            &params.geometry,
            &params.aero_coef,
            &air_data(50.0, 0.05, 0.0),
            &Vector3::zeros(),
            &ControlInputs::default(),
        );
        assert_relative_eq!(aft.force, centred.force);
        // Lift behind the c.g. pitches the nose down.
        assert_relative_eq!(
            aft.moment.y - centred.moment.y,
            0.2 * centred.force.z,
            max_relative = 1e-12
        );
    }
}
