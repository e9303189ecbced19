mod simulation;

pub use simulation::{ExecutionMode, IntegrationScheme, SimulationConfig};
