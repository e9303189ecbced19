use flight6dof::{
    components::{
        AircraftParameters, AircraftState, ControlInputs, TrimCondition, TrimResult,
        TrimSolverConfig,
    },
    resources::{AtmosphereConfig, SimulationConfig},
    simulation::Simulation,
    systems::trim,
};
use std::io::Write;
use tempfile::NamedTempFile;

pub const CRUISE_AIRSPEED: f64 = 55.0;
pub const CRUISE_ALTITUDE: f64 = 1000.0;

pub fn cruise_condition() -> TrimCondition {
    TrimCondition::StraightAndLevel {
        airspeed: CRUISE_AIRSPEED,
        altitude: CRUISE_ALTITUDE,
    }
}

/// Baseline airframe trimmed for cruise in still air.
pub fn trimmed_cruise() -> (AircraftParameters, TrimResult) {
    let params = AircraftParameters::light_single();
    let result = trim::solve(
        &params,
        cruise_condition(),
        &AtmosphereConfig::default(),
        &TrimSolverConfig::default(),
    )
    .expect("cruise trim");
    assert!(result.converged, "cruise trim cost {}", result.cost);
    (params, result)
}

pub fn trimmed_simulation(config: SimulationConfig) -> Simulation {
    let (params, result) = trimmed_cruise();
    Simulation::from_trim(params, config, AtmosphereConfig::default(), &result)
        .expect("trimmed simulation")
}

/// Untrimmed cruise start, enough for tests that only need a live run.
pub fn cruise_simulation(config: SimulationConfig) -> Simulation {
    Simulation::new(
        AircraftParameters::light_single(),
        config,
        AtmosphereConfig::default(),
        AircraftState::level_flight(CRUISE_AIRSPEED, CRUISE_ALTITUDE, 0.0),
        ControlInputs::default().with_throttle(0.65),
    )
    .expect("cruise simulation")
}

/// Writes `contents` to a temporary YAML file that lives as long as the
/// returned handle.
pub fn write_yaml(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".yaml")
        .tempfile()
        .expect("temp file");
    file.write_all(contents.as_bytes()).expect("write yaml");
    file
}

/// Flat aircraft document with every required field.
pub const TWIN_AIRCRAFT_YAML: &str = r#"
name: TestTwin
mass: 2300.0
ixx: 8500.0
iyy: 6200.0
izz: 13800.0
ixz: 150.0
wing_area: 20.0
wing_span: 12.0
mac: 1.7
gear_height: 1.4
c_L_0: 0.25
c_L_alpha: 5.2
c_L_q: 4.0
c_L_alphadot: 1.6
c_L_deltae: 0.45
c_L_flap: 0.7
c_D_0: 0.028
c_D_alpha: 0.1
c_D_alpha2: 1.3
c_D_deltae: 0.05
c_D_flap: 0.1
c_D_gear: 0.015
c_Y_beta: -0.35
c_Y_p: -0.04
c_Y_r: 0.2
c_Y_deltaa: 0.0
c_Y_deltar: 0.18
c_l_beta: -0.09
c_l_p: -0.45
c_l_r: 0.1
c_l_deltaa: 0.17
c_l_deltar: 0.015
c_m_0: 0.035
c_m_alpha: -0.9
c_m_q: -12.0
c_m_alphadot: -5.0
c_m_deltae: -1.2
c_m_flap: -0.18
c_n_beta: 0.07
c_n_p: -0.03
c_n_r: -0.1
c_n_deltaa: -0.005
c_n_deltar: -0.065
"#;
