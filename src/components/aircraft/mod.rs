pub mod air_data;
pub mod config;
pub mod state;

pub use air_data::AirData;
pub use config::{
    AircraftAeroCoefficients, AircraftGeometry, AircraftParameters, ControlLimits, EngineKind,
    EngineListSpec, EngineModel, MassModel, PistonPropellerConfig, PowerplantConfig,
    PropulsionConfig, RawAircraftConfig, TurbojetConfig, TurbopropConfig,
};
pub use state::{AircraftState, StateVector, STATE_SIZE};
