use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::components::aircraft::config::{
    AircraftAeroCoefficients, AircraftGeometry, MassModel, PropulsionConfig, RawAircraftConfig,
};
use crate::utils::ConfigError;

/// Everything needed to fly one airframe: mass, geometry, aerodynamic
/// derivatives and installed engines.
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AircraftParameters {
    /// Name of the aircraft.
    pub name: String,
    /// Mass and inertia properties.
    pub mass: MassModel,
    /// Reference dimensions and reference points.
    pub geometry: AircraftGeometry,
    /// Aerodynamic coefficients for calculating forces and moments.
    pub aero_coef: AircraftAeroCoefficients,
    /// Installed engines, one to four.
    pub propulsion: PropulsionConfig,
}

impl Default for AircraftParameters {
    fn default() -> Self {
        Self::light_single()
    }
}

impl AircraftParameters {
    /// Four-seat single piston trainer used as the baseline airframe.
    pub fn light_single() -> Self {
        Self {
            name: "LightSingle".to_string(),
            mass: MassModel::light_single(),
            geometry: AircraftGeometry::light_single(),
            aero_coef: AircraftAeroCoefficients::light_single(),
            propulsion: PropulsionConfig::light_single(),
        }
    }

    /// Strict parse of a YAML parameter document.
    pub fn try_from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        let raw: RawAircraftConfig = serde_yaml::from_str(contents)?;
        Self::from_raw_config(raw)
    }

    /// Strict load from a YAML file.
    pub fn try_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let file_contents = std::fs::read_to_string(path)?;
        Self::try_from_yaml_str(&file_contents)
    }

    /// Parses a YAML document, never failing. An unreadable document yields
    /// the default airframe; individual invalid groups fall back to their
    /// defaults. Every substitution is logged as a warning.
    pub fn from_yaml_str(contents: &str) -> Self {
        match serde_yaml::from_str::<RawAircraftConfig>(contents) {
            Ok(raw) => Self::from_raw_lenient(raw),
            Err(e) => {
                warn!("Aircraft parameters unreadable ({}), using default airframe", e);
                Self::default()
            }
        }
    }

    /// Loads a YAML file, never failing. See [`Self::from_yaml_str`].
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Self {
        match std::fs::read_to_string(path.as_ref()) {
            Ok(contents) => Self::from_yaml_str(&contents),
            Err(e) => {
                warn!(
                    "Failed to read aircraft file {}: {}, using default airframe",
                    path.as_ref().display(),
                    e
                );
                Self::default()
            }
        }
    }

    fn from_raw_config(raw: RawAircraftConfig) -> Result<Self, ConfigError> {
        let propulsion = match &raw.engines {
            Some(spec) => PropulsionConfig::from_engine_list(spec)?,
            None => PropulsionConfig::light_single(),
        };
        let params = Self {
            name: raw.name.clone(),
            mass: MassModel::from_raw(&raw),
            geometry: AircraftGeometry::from_raw(&raw),
            aero_coef: AircraftAeroCoefficients::from_raw(&raw),
            propulsion,
        };
        params.validate()?;
        Ok(params)
    }

    fn from_raw_lenient(raw: RawAircraftConfig) -> Self {
        let propulsion = match &raw.engines {
            Some(spec) => match PropulsionConfig::from_engine_list(spec) {
                Ok(config) => config,
                Err(e) => {
                    warn!("{}, falling back to a single piston engine", e);
                    PropulsionConfig::light_single()
                }
            },
            None => PropulsionConfig::light_single(),
        };
        Self {
            name: raw.name.clone(),
            mass: MassModel::from_raw(&raw),
            geometry: AircraftGeometry::from_raw(&raw),
            aero_coef: AircraftAeroCoefficients::from_raw(&raw),
            propulsion,
        }
        .sanitized()
    }

    /// Checks every parameter group, reporting the first one out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.mass.is_valid() {
            return Err(ConfigError::ValidationError(format!(
                "mass properties of {} are not physical",
                self.name
            )));
        }
        if !self.geometry.is_valid() {
            return Err(ConfigError::ValidationError(format!(
                "geometry of {} is not physical",
                self.name
            )));
        }
        if !self.aero_coef.is_finite() {
            return Err(ConfigError::ValidationError(format!(
                "aerodynamic coefficients of {} are not finite",
                self.name
            )));
        }
        if self.propulsion.engines.is_empty()
            || self.propulsion.engines.len() > crate::utils::constants::MAX_ENGINES
        {
            return Err(ConfigError::InvalidEngineCount(
                self.propulsion.engines.len() as i64,
            ));
        }
        if !self.propulsion.is_valid() {
            return Err(ConfigError::ValidationError(format!(
                "engine data of {} is not physical",
                self.name
            )));
        }
        Ok(())
    }

    /// Replaces each invalid parameter group with the default one.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::light_single();
        if !self.mass.is_valid() {
            warn!("Invalid mass properties for {}, using defaults", self.name);
            self.mass = defaults.mass;
        }
        if !self.geometry.is_valid() {
            warn!("Invalid geometry for {}, using defaults", self.name);
            self.geometry = defaults.geometry;
        }
        if !self.aero_coef.is_finite() {
            warn!(
                "Non-finite aerodynamic coefficients for {}, using defaults",
                self.name
            );
            self.aero_coef = defaults.aero_coef;
        }
        if !self.propulsion.is_valid() {
            warn!(
                "Invalid engine configuration for {} ({} engines), using a single piston engine",
                self.name,
                self.propulsion.engines.len()
            );
            self.propulsion = defaults.propulsion;
        }
        self
    }
}
