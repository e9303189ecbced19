mod flight;

pub use flight::{
    forward_atmosphere_system, forward_controls_system, sync_snapshot_system, FlightBridgeSet,
    FlightDynamicsPlugin, FlightLoop, LatestFlightData, SimulatedAircraft,
};
