pub const GRAVITY: f64 = 9.80665; // m/s^2
pub const AIR_GAS_CONSTANT: f64 = 287.05287; // J/(kg·K)
pub const AIR_HEAT_RATIO: f64 = 1.4;
pub const ISA_SEA_LEVEL_TEMP: f64 = 288.15; // K
pub const ISA_SEA_LEVEL_PRESSURE: f64 = 101325.0; // Pa
pub const ISA_SEA_LEVEL_DENSITY: f64 = 1.225; // kg/m^3
pub const ISA_LAPSE_RATE: f64 = 0.0065; // K/m, temperature falls with height
pub const TROPOPAUSE_ALTITUDE: f64 = 11_000.0; // m
pub const EARTH_RADIUS: f64 = 6_356_766.0; // m

// Unit conversions
pub const KNOTS_TO_MS: f64 = 0.514444;
pub const MS_TO_KNOTS: f64 = 1.0 / KNOTS_TO_MS;
pub const METERS_TO_FEET: f64 = 3.28084;
pub const MS_TO_FPM: f64 = METERS_TO_FEET * 60.0;

/// Wind speed above this is clamped before resolution into components (kt).
pub const MAX_WIND_SPEED_KT: f64 = 100.0;

/// Bound on the ISA temperature deviation (K). Keeps the stratosphere
/// above absolute zero with a wide margin.
pub const MAX_TEMPERATURE_OFFSET: f64 = 100.0;

/// Below this true airspeed (m/s) the aerodynamic model produces nothing.
pub const MIN_AIRSPEED: f64 = 0.1;

/// Highest engine count an engine list may request.
pub const MAX_ENGINES: usize = 4;

pub const MIN_TIMESTEP: f64 = 1.0 / 2000.0;
pub const MAX_TIMESTEP: f64 = 1.0 / 10.0;
