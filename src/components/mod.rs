pub mod aircraft;
pub mod controls;
pub mod physics;
pub mod propulsion;
pub mod trim;

pub use aircraft::*;
pub use controls::{ControlAxis, ControlInputs, EngineControls};
pub use physics::{ForceAccumulator, ForceCategory, Wrench};
pub use propulsion::{EngineState, PropulsionOutput};
pub use trim::{LongitudinalBounds, TrimCondition, TrimResult, TrimSolverConfig};
