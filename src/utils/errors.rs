use std::fmt;
use std::io;
use thiserror::Error;

/// Sub-model that produced a non-finite value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FaultOrigin {
    Atmosphere,
    Aerodynamics,
    Propulsion,
    Ground,
    /// Load applied from outside the model.
    External,
    Integrator,
}

impl fmt::Display for FaultOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FaultOrigin::Atmosphere => "atmosphere",
            FaultOrigin::Aerodynamics => "aerodynamics",
            FaultOrigin::Propulsion => "propulsion",
            FaultOrigin::Ground => "ground contact",
            FaultOrigin::External => "external load",
            FaultOrigin::Integrator => "integrator",
        };
        f.write_str(name)
    }
}

/// A non-finite result anywhere in the step pipeline. Fatal to the run.
#[derive(Error, Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[error("non-finite {origin} result at t={sim_time:.3}s: {detail}")]
pub struct NumericFault {
    pub origin: FaultOrigin,
    pub detail: String,
    pub sim_time: f64,
}

impl NumericFault {
    pub fn new(origin: FaultOrigin, detail: impl Into<String>) -> Self {
        Self {
            origin,
            detail: detail.into(),
            sim_time: 0.0,
        }
    }

    pub fn at_time(mut self, sim_time: f64) -> Self {
        self.sim_time = sim_time;
        self
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileError(#[from] io::Error),
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),
    #[error("Invalid aircraft configuration: {0}")]
    ValidationError(String),
    #[error("Invalid engine count: {0}")]
    InvalidEngineCount(i64),
}

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Numeric fault: {0}")]
    NumericFault(#[from] NumericFault),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Trim error: {0}")]
    Trim(String),

    #[error("Loop state error: {0}")]
    LoopState(String),
}

impl SimError {
    pub fn as_numeric_fault(&self) -> Option<&NumericFault> {
        match self {
            SimError::NumericFault(fault) => Some(fault),
            _ => None,
        }
    }
}
