use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::utils::{
    constants::{MAX_TEMPERATURE_OFFSET, MAX_WIND_SPEED_KT},
    math::wrap_two_pi,
};

/// Run-owned atmosphere settings. Changes take effect at the next step.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AtmosphereConfig {
    /// Mean wind speed (kt), within [0, 100].
    wind_speed_kt: f64,
    /// Bearing the air mass moves toward, clockwise from north (deg), [0, 360).
    wind_direction_deg: f64,
    /// Deviation from ISA temperature (K), within ±100.
    temperature_offset: f64,
    /// Gust intensity, 0 is calm air and 1 is severe.
    turbulence: f64,
}

impl Default for AtmosphereConfig {
    fn default() -> Self {
        Self {
            wind_speed_kt: 0.0,
            wind_direction_deg: 0.0,
            temperature_offset: 0.0,
            turbulence: 0.0,
        }
    }
}

impl AtmosphereConfig {
    pub fn new(wind_speed_kt: f64, wind_direction_deg: f64, temperature_offset: f64) -> Self {
        let mut config = Self::default();
        config.set_wind_speed(wind_speed_kt);
        config.set_wind_direction(wind_direction_deg);
        config.set_temperature_offset(temperature_offset);
        config
    }

    pub fn with_turbulence(mut self, intensity: f64) -> Self {
        self.set_turbulence(intensity);
        self
    }

    /// Sets the mean wind speed, clamped to [0, 100] kt. Non-finite input
    /// is ignored.
    pub fn set_wind_speed(&mut self, knots: f64) {
        if knots.is_finite() {
            self.wind_speed_kt = knots.clamp(0.0, MAX_WIND_SPEED_KT);
        } else {
            warn!("Ignoring non-finite wind speed");
        }
    }

    pub fn set_wind_direction(&mut self, degrees: f64) {
        if degrees.is_finite() {
            self.wind_direction_deg = wrap_two_pi(degrees.to_radians()).to_degrees();
            if self.wind_direction_deg >= 360.0 {
                self.wind_direction_deg = 0.0;
            }
        } else {
            warn!("Ignoring non-finite wind direction");
        }
    }

    /// Sets the ISA deviation, clamped to ±100 K so the temperature stays
    /// positive at every altitude.
    pub fn set_temperature_offset(&mut self, kelvin: f64) {
        if kelvin.is_finite() {
            let clamped = kelvin.clamp(-MAX_TEMPERATURE_OFFSET, MAX_TEMPERATURE_OFFSET);
            if clamped != kelvin {
                warn!("Temperature offset {} K clamped to {} K", kelvin, clamped);
            }
            self.temperature_offset = clamped;
        } else {
            warn!("Ignoring non-finite temperature offset");
        }
    }

    pub fn set_turbulence(&mut self, intensity: f64) {
        if intensity.is_finite() {
            self.turbulence = intensity.clamp(0.0, 1.0);
        } else {
            warn!("Ignoring non-finite turbulence intensity");
        }
    }

    pub fn wind_speed_kt(&self) -> f64 {
        self.wind_speed_kt
    }

    pub fn wind_direction_deg(&self) -> f64 {
        self.wind_direction_deg
    }

    pub fn temperature_offset(&self) -> f64 {
        self.temperature_offset
    }

    pub fn turbulence(&self) -> f64 {
        self.turbulence
    }
}
