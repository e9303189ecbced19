use nalgebra::Vector3;

use crate::components::{AirData, AircraftState};
use crate::resources::EnvironmentSample;
use crate::utils::{
    constants::MIN_AIRSPEED,
    math::{ned_to_body, wrap_pi},
};

/// Computes air-relative quantities from the rigid-body state.
///
/// `gust_ned` is added to the mean wind of the sample. `previous` is the
/// air data of the last accepted step and is used only for α̇.
pub fn calculate_air_data(
    state: &AircraftState,
    env: &EnvironmentSample,
    gust_ned: &Vector3<f64>,
    previous: Option<&AirData>,
    dt: f64,
) -> AirData {
    let wind_ned = env.wind_ned + gust_ned;
    let wind_body = ned_to_body(state.roll(), state.pitch(), state.heading(), &wind_ned);
    let relative_velocity = state.velocity - wind_body;
    let airspeed = relative_velocity.norm();

    let (alpha, beta) = if airspeed > MIN_AIRSPEED {
        (
            relative_velocity.z.atan2(relative_velocity.x),
            (relative_velocity.y / airspeed).clamp(-1.0, 1.0).asin(),
        )
    } else {
        (0.0, 0.0)
    };

    let alpha_dot = match previous {
        Some(prev) if dt > 0.0 && airspeed > MIN_AIRSPEED && prev.true_airspeed > MIN_AIRSPEED => {
            // α from atan2 jumps by 2π when the flow passes ±π
            wrap_pi(alpha - prev.alpha) / dt
        }
        _ => 0.0,
    };

    let dynamic_pressure = if airspeed > MIN_AIRSPEED {
        0.5 * env.density * airspeed * airspeed
    } else {
        0.0
    };

    AirData {
        true_airspeed: airspeed,
        equivalent_airspeed: airspeed * env.density_ratio().max(0.0).sqrt(),
        alpha,
        beta,
        alpha_dot,
        dynamic_pressure,
        density: env.density,
        mach: airspeed / env.speed_of_sound,
        relative_velocity,
        wind_velocity: wind_body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{AtmosphereConfig, AtmosphereModel};
    use approx::assert_relative_eq;

    #[test]
    fn test_still_air_is_zero() {
        let env = AtmosphereModel::sample(0.0, &AtmosphereConfig::default());
        let air = calculate_air_data(&AircraftState::at_rest(0.0, 1.0), &env, &Vector3::zeros(), None, 0.01);
        assert_eq!(air.alpha, 0.0);
        assert_eq!(air.beta, 0.0);
        assert_eq!(air.dynamic_pressure, 0.0);
    }

    #[test]
    fn test_alpha_beta_from_velocity() {
        let env = AtmosphereModel::sample(0.0, &AtmosphereConfig::default());
        let mut state = AircraftState::level_flight(50.0, 0.0, 0.0);
        state.velocity = Vector3::new(50.0, 5.0, 5.0);
        let air = calculate_air_data(&state, &env, &Vector3::zeros(), None, 0.01);
        assert_relative_eq!(air.alpha, (5.0f64).atan2(50.0));
        assert_relative_eq!(air.beta, (5.0 / state.velocity.norm()).asin());
        assert_relative_eq!(air.dynamic_pressure, 0.5 * env.density * state.velocity.norm_squared());
    }

    #[test]
    fn test_headwind_adds_airspeed() {
        // Air moving toward the south hits a north-bound aircraft head on.
        let config = AtmosphereConfig::new(20.0, 180.0, 0.0);
        let env = AtmosphereModel::sample(0.0, &config);
        let state = AircraftState::level_flight(40.0, 0.0, 0.0);
        let air = calculate_air_data(&state, &env, &Vector3::zeros(), None, 0.01);
        assert_relative_eq!(air.true_airspeed, 40.0 + 20.0 * 0.514444, epsilon = 1e-9);
        assert_relative_eq!(air.alpha, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_alpha_rate_from_previous_step() {
        let env = AtmosphereModel::sample(0.0, &AtmosphereConfig::default());
        let state = AircraftState::level_flight(50.0, 0.0, 0.0);
        let previous = AirData {
            true_airspeed: 50.0,
            alpha: -0.01,
            ..Default::default()
        };
        let air = calculate_air_data(&state, &env, &Vector3::zeros(), Some(&previous), 0.01);
        assert_relative_eq!(air.alpha_dot, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_alpha_rate_across_reverse_flow() {
        let env = AtmosphereModel::sample(0.0, &AtmosphereConfig::default());
        let mut state = AircraftState::at_rest(0.0, 0.0);
        // Air from behind, α just past -π
        state.velocity = Vector3::new(-20.0 * 0.005f64.cos(), 0.0, -20.0 * 0.005f64.sin());
        let previous = AirData {
            true_airspeed: 20.0,
            alpha: std::f64::consts::PI - 0.005,
            ..Default::default()
        };
        let air = calculate_air_data(&state, &env, &Vector3::zeros(), Some(&previous), 0.01);
        assert_relative_eq!(air.alpha, -std::f64::consts::PI + 0.005, epsilon = 1e-12);
        assert_relative_eq!(air.alpha_dot, 1.0, epsilon = 1e-6);
    }
}
