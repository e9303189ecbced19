pub mod config;
pub mod environment;

pub use config::{ExecutionMode, IntegrationScheme, SimulationConfig};
pub use environment::{AtmosphereConfig, AtmosphereModel, EnvironmentSample, Turbulence};
