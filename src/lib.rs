//! Nonlinear six-degree-of-freedom flight dynamics for a rigid aircraft.
//!
//! [`simulation::Simulation`] advances one aircraft through the atmosphere
//! a fixed step at a time; [`simulation::SimulationLoop`] drives it on its
//! own thread and publishes immutable snapshots. [`plugins`] bridges the
//! loop into a bevy app.

pub mod components;
pub mod plugins;
pub mod resources;
pub mod simulation;
pub mod systems;
pub mod utils;

pub use components::{AircraftParameters, AircraftState, ControlInputs};
pub use resources::{AtmosphereConfig, SimulationConfig};
pub use simulation::{Simulation, SimulationLoop, Snapshot};
pub use utils::{FaultOrigin, NumericFault, SimError};
