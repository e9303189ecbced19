pub mod constants;
pub mod errors;
pub mod math;

pub use errors::{ConfigError, FaultOrigin, NumericFault, SimError};
