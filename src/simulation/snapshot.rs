use serde::{Deserialize, Serialize};

use crate::components::{
    AirData, AircraftState, ControlInputs, EngineState, ForceAccumulator, ForceCategory,
};
use crate::resources::EnvironmentSample;
use crate::utils::{
    constants::{EARTH_RADIUS, METERS_TO_FEET, MS_TO_FPM, MS_TO_KNOTS},
    math::wrap_two_pi,
    NumericFault,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unit {
    Knots,
    FeetPerMinute,
    Feet,
    Degrees,
    DegreesPerSecond,
    G,
    Meters,
    Rpm,
    KilogramsPerHour,
    Seconds,
}

impl Unit {
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Knots => "kt",
            Unit::FeetPerMinute => "ft/min",
            Unit::Feet => "ft",
            Unit::Degrees => "deg",
            Unit::DegreesPerSecond => "deg/s",
            Unit::G => "g",
            Unit::Meters => "m",
            Unit::Rpm => "rpm",
            Unit::KilogramsPerHour => "kg/h",
            Unit::Seconds => "s",
        }
    }
}

/// Closed set of quantities published with every snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlightDataKey {
    IndicatedAirspeed,
    TrueAirspeed,
    VerticalSpeed,
    Altitude,
    Roll,
    Pitch,
    Heading,
    TurnRate,
    LateralAcceleration,
    AngleOfAttack,
    Sideslip,
    FlightPathAngle,
    GroundTrack,
    North,
    East,
    Latitude,
    Longitude,
    EngineRpm,
    FuelFlow,
    ElapsedTime,
}

impl FlightDataKey {
    pub const COUNT: usize = 20;

    pub const ALL: [FlightDataKey; Self::COUNT] = [
        FlightDataKey::IndicatedAirspeed,
        FlightDataKey::TrueAirspeed,
        FlightDataKey::VerticalSpeed,
        FlightDataKey::Altitude,
        FlightDataKey::Roll,
        FlightDataKey::Pitch,
        FlightDataKey::Heading,
        FlightDataKey::TurnRate,
        FlightDataKey::LateralAcceleration,
        FlightDataKey::AngleOfAttack,
        FlightDataKey::Sideslip,
        FlightDataKey::FlightPathAngle,
        FlightDataKey::GroundTrack,
        FlightDataKey::North,
        FlightDataKey::East,
        FlightDataKey::Latitude,
        FlightDataKey::Longitude,
        FlightDataKey::EngineRpm,
        FlightDataKey::FuelFlow,
        FlightDataKey::ElapsedTime,
    ];

    pub fn unit(&self) -> Unit {
        match self {
            FlightDataKey::IndicatedAirspeed | FlightDataKey::TrueAirspeed => Unit::Knots,
            FlightDataKey::VerticalSpeed => Unit::FeetPerMinute,
            FlightDataKey::Altitude => Unit::Feet,
            FlightDataKey::Roll
            | FlightDataKey::Pitch
            | FlightDataKey::Heading
            | FlightDataKey::AngleOfAttack
            | FlightDataKey::Sideslip
            | FlightDataKey::FlightPathAngle
            | FlightDataKey::GroundTrack
            | FlightDataKey::Latitude
            | FlightDataKey::Longitude => Unit::Degrees,
            FlightDataKey::TurnRate => Unit::DegreesPerSecond,
            FlightDataKey::LateralAcceleration => Unit::G,
            FlightDataKey::North | FlightDataKey::East => Unit::Meters,
            FlightDataKey::EngineRpm => Unit::Rpm,
            FlightDataKey::FuelFlow => Unit::KilogramsPerHour,
            FlightDataKey::ElapsedTime => Unit::Seconds,
        }
    }

    /// Stable snake_case name used for text output.
    pub fn name(&self) -> &'static str {
        match self {
            FlightDataKey::IndicatedAirspeed => "indicated_airspeed",
            FlightDataKey::TrueAirspeed => "true_airspeed",
            FlightDataKey::VerticalSpeed => "vertical_speed",
            FlightDataKey::Altitude => "altitude",
            FlightDataKey::Roll => "roll",
            FlightDataKey::Pitch => "pitch",
            FlightDataKey::Heading => "heading",
            FlightDataKey::TurnRate => "turn_rate",
            FlightDataKey::LateralAcceleration => "lateral_acceleration",
            FlightDataKey::AngleOfAttack => "angle_of_attack",
            FlightDataKey::Sideslip => "sideslip",
            FlightDataKey::FlightPathAngle => "flight_path_angle",
            FlightDataKey::GroundTrack => "ground_track",
            FlightDataKey::North => "north",
            FlightDataKey::East => "east",
            FlightDataKey::Latitude => "latitude",
            FlightDataKey::Longitude => "longitude",
            FlightDataKey::EngineRpm => "engine_rpm",
            FlightDataKey::FuelFlow => "fuel_flow",
            FlightDataKey::ElapsedTime => "elapsed_time",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Geodetic origin of the local NED frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GeoOrigin {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
}

/// Everything the flight-data mapping reads for one step.
pub struct FlightDataInputs<'a> {
    pub time: f64,
    pub state: &'a AircraftState,
    pub air_data: &'a AirData,
    pub engines: &'a [EngineState],
    pub forces: &'a ForceAccumulator,
    pub mass: f64,
    pub gravity: f64,
    pub origin: GeoOrigin,
    pub pitch_guard: f64,
}

/// Flight-data values indexed by [`FlightDataKey`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FlightData {
    values: [f64; FlightDataKey::COUNT],
}

impl FlightData {
    pub fn get(&self, key: FlightDataKey) -> f64 {
        self.values[key.index()]
    }

    pub fn set(&mut self, key: FlightDataKey, value: f64) {
        self.values[key.index()] = value;
    }

    /// (key, value, unit) for every quantity, in declaration order.
    pub fn entries(&self) -> impl Iterator<Item = (FlightDataKey, f64, Unit)> + '_ {
        FlightDataKey::ALL
            .iter()
            .map(move |key| (*key, self.get(*key), key.unit()))
    }

    pub fn compute(inputs: &FlightDataInputs<'_>) -> Self {
        let state = inputs.state;
        let air = inputs.air_data;
        let ned_velocity = state.ned_velocity();

        let (roll, pitch) = (state.roll(), state.pitch());
        let cos_pitch = pitch.cos().abs().max(inputs.pitch_guard.cos());
        let turn_rate = (state.angular_rate.y * roll.sin() + state.angular_rate.z * roll.cos())
            / cos_pitch;

        // Specific force sensed along the body y axis; gravity does not register
        let contact = inputs.forces.sum_of(&[
            ForceCategory::Aerodynamic,
            ForceCategory::Propulsive,
            ForceCategory::Ground,
            ForceCategory::External,
        ]);
        let lateral_g = if inputs.mass > 0.0 && inputs.gravity > 0.0 {
            contact.force.y / (inputs.mass * inputs.gravity)
        } else {
            0.0
        };

        let origin_lat = inputs.origin.latitude_deg.to_radians();
        let latitude = inputs.origin.latitude_deg + (state.position.x / EARTH_RADIUS).to_degrees();
        let longitude = inputs.origin.longitude_deg
            + (state.position.y / (EARTH_RADIUS * origin_lat.cos())).to_degrees();

        let fuel_flow: f64 = inputs.engines.iter().map(|e| e.fuel_flow).sum();
        let engine_rpm = inputs.engines.first().map(|e| e.rpm).unwrap_or(0.0);

        let mut data = Self::default();
        data.set(
            FlightDataKey::IndicatedAirspeed,
            air.equivalent_airspeed * MS_TO_KNOTS,
        );
        data.set(FlightDataKey::TrueAirspeed, air.true_airspeed * MS_TO_KNOTS);
        data.set(FlightDataKey::VerticalSpeed, -ned_velocity.z * MS_TO_FPM);
        data.set(FlightDataKey::Altitude, state.altitude() * METERS_TO_FEET);
        data.set(FlightDataKey::Roll, roll.to_degrees());
        data.set(FlightDataKey::Pitch, pitch.to_degrees());
        data.set(FlightDataKey::Heading, state.heading().to_degrees());
        data.set(FlightDataKey::TurnRate, turn_rate.to_degrees());
        data.set(FlightDataKey::LateralAcceleration, lateral_g);
        data.set(FlightDataKey::AngleOfAttack, air.alpha.to_degrees());
        data.set(FlightDataKey::Sideslip, air.beta.to_degrees());
        data.set(
            FlightDataKey::FlightPathAngle,
            state.flight_path_angle().to_degrees(),
        );
        data.set(
            FlightDataKey::GroundTrack,
            wrap_two_pi(state.ground_track()).to_degrees(),
        );
        data.set(FlightDataKey::North, state.position.x);
        data.set(FlightDataKey::East, state.position.y);
        data.set(FlightDataKey::Latitude, latitude);
        data.set(FlightDataKey::Longitude, longitude);
        data.set(FlightDataKey::EngineRpm, engine_rpm);
        data.set(FlightDataKey::FuelFlow, fuel_flow * 3600.0);
        data.set(FlightDataKey::ElapsedTime, inputs.time);
        data
    }

    /// Name-keyed JSON object: `{"altitude": {"value": .., "unit": "ft"}, ..}`.
    pub fn to_json(&self) -> serde_json::Value {
        let map = self
            .entries()
            .map(|(key, value, unit)| {
                (
                    key.name().to_string(),
                    serde_json::json!({ "value": value, "unit": unit.symbol() }),
                )
            })
            .collect::<serde_json::Map<_, _>>();
        serde_json::Value::Object(map)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Accepted steps since the run began.
    pub step_count: u64,
    /// Accepted steps during which the sec θ clamp was active.
    pub pitch_guard_count: u64,
    /// Set when the run integrates with a first-order scheme.
    pub low_fidelity: bool,
    pub last_fault: Option<NumericFault>,
}

/// Immutable, fully-formed result of one accepted step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Elapsed simulation time (s).
    pub time: f64,
    pub state: AircraftState,
    pub air_data: AirData,
    pub engines: Vec<EngineState>,
    pub environment: EnvironmentSample,
    pub controls: ControlInputs,
    pub forces: ForceAccumulator,
    pub flight_data: FlightData,
    pub diagnostics: Diagnostics,
}

impl Snapshot {
    pub fn flight_value(&self, key: FlightDataKey) -> f64 {
        self.flight_data.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Wrench;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    fn inputs<'a>(
        state: &'a AircraftState,
        air: &'a AirData,
        engines: &'a [EngineState],
        forces: &'a ForceAccumulator,
    ) -> FlightDataInputs<'a> {
        FlightDataInputs {
            time: 12.5,
            state,
            air_data: air,
            engines,
            forces,
            mass: 1000.0,
            gravity: 9.8,
            origin: GeoOrigin {
                latitude_deg: 52.0,
                longitude_deg: 4.0,
            },
            pitch_guard: 89.5f64.to_radians(),
        }
    }

    #[test]
    fn test_level_flight_values() {
        let mut state = AircraftState::level_flight(51.444, 304.8, 90f64.to_radians());
        state.position.x = 1000.0;
        let air = AirData {
            true_airspeed: 51.444,
            equivalent_airspeed: 50.0,
            ..Default::default()
        };
        let engines = [EngineState {
            rpm: 2400.0,
            fuel_flow: 0.01,
            ..EngineState::default()
        }];
        let forces = ForceAccumulator::default();
        let data = FlightData::compute(&inputs(&state, &air, &engines, &forces));

        assert_relative_eq!(data.get(FlightDataKey::TrueAirspeed), 100.0, epsilon = 0.01);
        assert_relative_eq!(data.get(FlightDataKey::Altitude), 1000.0, epsilon = 1e-3);
        assert_relative_eq!(data.get(FlightDataKey::Heading), 90.0, epsilon = 1e-9);
        assert_relative_eq!(data.get(FlightDataKey::GroundTrack), 90.0, epsilon = 1e-9);
        assert_relative_eq!(data.get(FlightDataKey::VerticalSpeed), 0.0, epsilon = 1e-9);
        assert_relative_eq!(data.get(FlightDataKey::FuelFlow), 36.0, epsilon = 1e-9);
        assert_relative_eq!(data.get(FlightDataKey::EngineRpm), 2400.0);
        assert_relative_eq!(data.get(FlightDataKey::ElapsedTime), 12.5);
        assert!(data.get(FlightDataKey::Latitude) > 52.0);
        assert_relative_eq!(data.get(FlightDataKey::Longitude), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_turn_rate_and_side_force() {
        let mut state = AircraftState::level_flight(50.0, 500.0, 0.0);
        state.attitude.x = 30f64.to_radians();
        state.angular_rate = Vector3::new(0.0, 0.05, 0.0866);
        let air = AirData::default();
        let mut forces = ForceAccumulator::default();
        forces.add(
            ForceCategory::Aerodynamic,
            Wrench::new(Vector3::new(0.0, 980.0, 0.0), Vector3::zeros()),
        );
        forces.add(
            ForceCategory::Gravitational,
            Wrench::new(Vector3::new(0.0, 4900.0, 0.0), Vector3::zeros()),
        );
        let data = FlightData::compute(&inputs(&state, &air, &[], &forces));

        let expected = (0.05 * 0.5 + 0.0866 * 30f64.to_radians().cos()).to_degrees();
        assert_relative_eq!(data.get(FlightDataKey::TurnRate), expected, epsilon = 1e-9);
        assert_relative_eq!(data.get(FlightDataKey::LateralAcceleration), 0.1, epsilon = 1e-12);
        assert_eq!(data.get(FlightDataKey::EngineRpm), 0.0);
    }

    #[test]
    fn test_every_key_has_a_unit_and_name() {
        let data = FlightData::default();
        let json = data.to_json();
        for key in FlightDataKey::ALL {
            assert_eq!(json[key.name()]["unit"], key.unit().symbol());
        }
        assert_eq!(data.entries().count(), FlightDataKey::COUNT);
    }
}
