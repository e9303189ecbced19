use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::utils::{
    constants::{MAX_TIMESTEP, MIN_TIMESTEP},
    ConfigError,
};

/// Whether the loop paces steps against the wall clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionMode {
    /// One step per `time_step` of wall-clock time.
    RealTime,
    /// Steps run back to back with no pacing.
    Analysis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntegrationScheme {
    RungeKutta4,
    /// First-order scheme. Low fidelity, only for quick analysis runs.
    ForwardEuler,
}

impl IntegrationScheme {
    pub fn is_low_fidelity(&self) -> bool {
        matches!(self, IntegrationScheme::ForwardEuler)
    }
}

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Integration step (s).
    pub time_step: f64,
    pub mode: ExecutionMode,
    pub scheme: IntegrationScheme,
    /// Pitch magnitude beyond which sec θ is clamped (deg).
    pub pitch_guard_deg: f64,
    /// Height of the ground plane above the datum (m).
    pub ground_elevation: f64,
    pub origin_latitude_deg: f64,
    pub origin_longitude_deg: f64,
    pub turbulence_seed: u64,
    /// Most steps a real-time loop runs in one go to catch up after a stall.
    pub max_catch_up_steps: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            time_step: 0.01,
            mode: ExecutionMode::RealTime,
            scheme: IntegrationScheme::RungeKutta4,
            pitch_guard_deg: 89.5,
            ground_elevation: 0.0,
            origin_latitude_deg: 0.0,
            origin_longitude_deg: 0.0,
            turbulence_seed: 0,
            max_catch_up_steps: 5,
        }
    }
}

impl SimulationConfig {
    /// Unpaced configuration for offline studies.
    pub fn analysis() -> Self {
        Self {
            mode: ExecutionMode::Analysis,
            ..Default::default()
        }
    }

    pub fn with_time_step(mut self, time_step: f64) -> Self {
        self.time_step = time_step;
        self
    }

    pub fn with_scheme(mut self, scheme: IntegrationScheme) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path)?;
        let config: SimulationConfig = serde_yaml::from_reader(file)?;
        Ok(config.sanitized())
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let file = std::fs::File::create(path)?;
        serde_yaml::to_writer(file, self)?;
        Ok(())
    }

    /// Replaces out-of-range values with their defaults.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !self.time_step.is_finite() || !(MIN_TIMESTEP..=MAX_TIMESTEP).contains(&self.time_step)
        {
            warn!(
                "Time step {} s outside [{}, {}], using {} s",
                self.time_step, MIN_TIMESTEP, MAX_TIMESTEP, defaults.time_step
            );
            self.time_step = defaults.time_step;
        }
        if !self.pitch_guard_deg.is_finite()
            || self.pitch_guard_deg <= 45.0
            || self.pitch_guard_deg >= 90.0
        {
            warn!(
                "Pitch guard {}° outside (45°, 90°), using {}°",
                self.pitch_guard_deg, defaults.pitch_guard_deg
            );
            self.pitch_guard_deg = defaults.pitch_guard_deg;
        }
        if !self.ground_elevation.is_finite() {
            warn!("Non-finite ground elevation, using sea level");
            self.ground_elevation = defaults.ground_elevation;
        }
        if !self.origin_latitude_deg.is_finite() || self.origin_latitude_deg.abs() > 89.0 {
            warn!("Origin latitude out of range, using the equator");
            self.origin_latitude_deg = defaults.origin_latitude_deg;
        }
        if !self.origin_longitude_deg.is_finite() {
            self.origin_longitude_deg = defaults.origin_longitude_deg;
        }
        if self.max_catch_up_steps == 0 {
            self.max_catch_up_steps = 1;
        }
        if self.scheme.is_low_fidelity() {
            warn!("Forward Euler integration selected: results are low fidelity");
        }
        self
    }

    /// Sec θ clamp in radians.
    pub fn pitch_guard(&self) -> f64 {
        self.pitch_guard_deg.to_radians()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = SimulationConfig::default();
        assert_eq!(config.time_step, 0.01);
        assert_eq!(config.mode, ExecutionMode::RealTime);
        assert_eq!(config.scheme, IntegrationScheme::RungeKutta4);
    }

    #[test]
    fn test_config_save_load() -> Result<(), Box<dyn std::error::Error>> {
        let config = SimulationConfig::analysis().with_time_step(0.005);
        let temp_file = NamedTempFile::new()?;

        config.save(temp_file.path())?;
        let loaded = SimulationConfig::load(temp_file.path())?;
        assert_eq!(loaded, config);
        Ok(())
    }

    #[test]
    fn test_partial_document_uses_defaults() {
        let config: SimulationConfig = serde_yaml::from_str("time_step: 0.02\n").unwrap();
        assert_eq!(config.time_step, 0.02);
        assert_eq!(config.pitch_guard_deg, 89.5);
    }

    #[test]
    fn test_invalid_values_sanitized() {
        let config = SimulationConfig {
            time_step: -1.0,
            pitch_guard_deg: 90.0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(config.time_step, 0.01);
        assert_eq!(config.pitch_guard_deg, 89.5);
    }

    #[test]
    fn test_invalid_config_load() {
        assert!(SimulationConfig::load("nonexistent_file.yaml").is_err());
    }
}
