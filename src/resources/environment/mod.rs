mod atmosphere;
mod config;
mod turbulence;

pub use atmosphere::{AtmosphereModel, EnvironmentSample};
pub use config::AtmosphereConfig;
pub use turbulence::Turbulence;
