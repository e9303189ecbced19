mod force_calculator;
mod integrator;

pub use force_calculator::{
    calculate_gravity_force, calculate_ground_forces, calculate_net_forces_moments, GearLayout,
};
pub use integrator::{
    integrate, state_derivative, IntegrationOutcome, IntegratorSettings,
};
