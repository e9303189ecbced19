mod runner;
#[allow(clippy::module_inception)]
mod simulation;
mod slot;
mod snapshot;

pub use runner::{LoopStatus, SimulationLoop};
pub use simulation::Simulation;
pub use slot::{SnapshotReader, SnapshotSlot};
pub use snapshot::{
    Diagnostics, FlightData, FlightDataInputs, FlightDataKey, GeoOrigin, Snapshot, Unit,
};
