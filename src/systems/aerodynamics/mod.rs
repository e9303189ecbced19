mod air_data;
mod force_calculator;

pub use air_data::calculate_air_data;
pub use force_calculator::{
    calculate_aerodynamic_forces_moments, calculate_coefficients, AeroCoefficientValues,
};
