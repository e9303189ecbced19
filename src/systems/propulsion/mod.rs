mod jet;
mod powerplant;
mod propeller;

pub use powerplant::{first_order_lag, Engine, EngineConditions, Powerplant, FUEL_CUTOFF};
pub use propeller::{mixture_factor, piston_power_lapse, propeller_thrust};
