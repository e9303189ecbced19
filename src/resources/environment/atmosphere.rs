use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use super::AtmosphereConfig;
use crate::utils::constants::{
    AIR_GAS_CONSTANT, AIR_HEAT_RATIO, EARTH_RADIUS, GRAVITY, ISA_LAPSE_RATE,
    ISA_SEA_LEVEL_PRESSURE, ISA_SEA_LEVEL_TEMP, KNOTS_TO_MS, TROPOPAUSE_ALTITUDE,
};

/// Air properties and wind at one altitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentSample {
    /// Static temperature (K).
    pub temperature: f64,
    /// Static pressure (Pa).
    pub pressure: f64,
    /// Air density (kg/m³).
    pub density: f64,
    /// Speed of sound (m/s).
    pub speed_of_sound: f64,
    /// Local gravitational acceleration (m/s²).
    pub gravity: f64,
    /// Mean wind, north/east/down (m/s).
    pub wind_ned: Vector3<f64>,
    /// Gust intensity passed through from the configuration.
    pub turbulence_intensity: f64,
}

impl EnvironmentSample {
    pub fn is_finite(&self) -> bool {
        [
            self.temperature,
            self.pressure,
            self.density,
            self.speed_of_sound,
            self.gravity,
            self.turbulence_intensity,
        ]
        .iter()
        .chain(self.wind_ned.iter())
        .all(|v| v.is_finite())
    }

    /// Density relative to ISA sea level.
    pub fn density_ratio(&self) -> f64 {
        self.density / crate::utils::constants::ISA_SEA_LEVEL_DENSITY
    }
}

/// Two-layer International Standard Atmosphere with a constant wind field.
pub struct AtmosphereModel;

impl AtmosphereModel {
    /// Exponent of the troposphere pressure law, g0 / (R·L).
    const PRESSURE_EXPONENT: f64 = GRAVITY / (AIR_GAS_CONSTANT * ISA_LAPSE_RATE);

    /// Samples the atmosphere at a geometric altitude (m).
    pub fn sample(altitude: f64, config: &AtmosphereConfig) -> EnvironmentSample {
        let standard_temp = Self::standard_temperature(altitude);
        let pressure = Self::pressure(altitude);
        let temperature = standard_temp + config.temperature_offset();
        let density = pressure / (AIR_GAS_CONSTANT * temperature);

        EnvironmentSample {
            temperature,
            pressure,
            density,
            speed_of_sound: (AIR_HEAT_RATIO * AIR_GAS_CONSTANT * temperature).sqrt(),
            gravity: Self::gravity(altitude),
            wind_ned: Self::wind(config),
            turbulence_intensity: config.turbulence(),
        }
    }

    /// ISA temperature without the configured offset (K).
    pub fn standard_temperature(altitude: f64) -> f64 {
        let h = altitude.min(TROPOPAUSE_ALTITUDE);
        ISA_SEA_LEVEL_TEMP - ISA_LAPSE_RATE * h
    }

    pub fn pressure(altitude: f64) -> f64 {
        if altitude <= TROPOPAUSE_ALTITUDE {
            let ratio = Self::standard_temperature(altitude) / ISA_SEA_LEVEL_TEMP;
            ISA_SEA_LEVEL_PRESSURE * ratio.powf(Self::PRESSURE_EXPONENT)
        } else {
            let tropopause_temp = Self::standard_temperature(TROPOPAUSE_ALTITUDE);
            let tropopause_pressure = Self::pressure(TROPOPAUSE_ALTITUDE);
            tropopause_pressure
                * (-GRAVITY * (altitude - TROPOPAUSE_ALTITUDE)
                    / (AIR_GAS_CONSTANT * tropopause_temp))
                    .exp()
        }
    }

    /// Inverse-square gravity with altitude.
    pub fn gravity(altitude: f64) -> f64 {
        let ratio = EARTH_RADIUS / (EARTH_RADIUS + altitude);
        GRAVITY * ratio * ratio
    }

    /// Mean wind in NED (m/s). Down component is always zero.
    pub fn wind(config: &AtmosphereConfig) -> Vector3<f64> {
        let speed = config.wind_speed_kt() * KNOTS_TO_MS;
        let direction = config.wind_direction_deg().to_radians();
        Vector3::new(speed * direction.cos(), speed * direction.sin(), 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::constants::ISA_SEA_LEVEL_DENSITY;
    use approx::assert_relative_eq;

    #[test]
    fn test_sea_level_standard() {
        let env = AtmosphereModel::sample(0.0, &AtmosphereConfig::default());
        assert_relative_eq!(env.temperature, 288.15);
        assert_relative_eq!(env.pressure, 101325.0);
        assert_relative_eq!(env.density, ISA_SEA_LEVEL_DENSITY, epsilon = 1e-3);
        assert_relative_eq!(env.speed_of_sound, 340.29, epsilon = 0.05);
        assert_relative_eq!(env.gravity, GRAVITY);
        assert_eq!(env.wind_ned, Vector3::zeros());
    }

    #[test]
    fn test_known_altitudes() {
        let config = AtmosphereConfig::default();
        let env = AtmosphereModel::sample(5000.0, &config);
        assert_relative_eq!(env.temperature, 255.65, epsilon = 1e-9);
        assert_relative_eq!(env.pressure, 54020.0, max_relative = 1e-4);
        assert_relative_eq!(env.density, 0.7361, max_relative = 1e-3);

        let env = AtmosphereModel::sample(15000.0, &config);
        assert_relative_eq!(env.temperature, 216.65, epsilon = 1e-9);
        assert_relative_eq!(env.pressure, 12045.0, max_relative = 2e-3);
    }

    #[test]
    fn test_temperature_offset_changes_density_only_through_temperature() {
        let hot = AtmosphereConfig::new(0.0, 0.0, 20.0);
        let standard = AtmosphereModel::sample(1000.0, &AtmosphereConfig::default());
        let env = AtmosphereModel::sample(1000.0, &hot);
        assert_relative_eq!(env.temperature, standard.temperature + 20.0);
        assert_relative_eq!(env.pressure, standard.pressure);
        assert!(env.density < standard.density);
        assert!(env.speed_of_sound > standard.speed_of_sound);
    }

    #[test]
    fn test_gravity_attenuates() {
        let g = AtmosphereModel::gravity(10_000.0);
        assert!(g < GRAVITY);
        assert_relative_eq!(g, 9.7759, epsilon = 1e-3);
    }
}
