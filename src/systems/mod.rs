pub mod aerodynamics;
pub mod physics;
pub mod propulsion;
pub mod trim;

pub use aerodynamics::{calculate_aerodynamic_forces_moments, calculate_air_data};
pub use physics::{
    calculate_ground_forces, calculate_net_forces_moments, integrate, GearLayout,
    IntegratorSettings,
};
pub use propulsion::{Engine, Powerplant};
