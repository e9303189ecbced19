mod aero_coef;
mod aircraft;
mod geometry;
mod loader;
mod mass;
mod propulsion;

pub use aero_coef::*;
pub use aircraft::AircraftParameters;
pub use geometry::{AircraftGeometry, ControlLimits};
pub use loader::RawAircraftConfig;
pub use mass::MassModel;
pub use propulsion::*;
