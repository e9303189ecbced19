//! Trims the aircraft over a range of cruise speeds, flies each trim point
//! unpaced for a fixed time and prints the results as JSON.
//!
//! Usage: `flight_sweep [aircraft.yaml] [duration_s] [altitude_m]`

use serde_json::json;
use std::process::ExitCode;

use flight6dof::{
    components::{AircraftParameters, TrimCondition, TrimResult, TrimSolverConfig},
    resources::{AtmosphereConfig, SimulationConfig},
    simulation::Simulation,
    systems::trim,
    utils::SimError,
};

const AIRSPEEDS: [f64; 5] = [45.0, 50.0, 55.0, 60.0, 65.0];
const DEFAULT_DURATION: f64 = 60.0;
const DEFAULT_ALTITUDE: f64 = 1000.0;

fn fly(
    params: &AircraftParameters,
    trim: &TrimResult,
    duration: f64,
) -> Result<serde_json::Value, SimError> {
    let mut simulation = Simulation::from_trim(
        params.clone(),
        SimulationConfig::analysis(),
        AtmosphereConfig::default(),
        trim,
    )?;
    let snapshot = simulation.run_for(duration)?;
    Ok(snapshot.flight_data.to_json())
}

fn parse_arg(args: &[String], index: usize, default: f64) -> Result<f64, String> {
    match args.get(index) {
        Some(value) => value
            .parse::<f64>()
            .map_err(|e| format!("invalid number '{}': {}", value, e)),
        None => Ok(default),
    }
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let params = match args.first() {
        Some(path) => AircraftParameters::from_yaml_file(path),
        None => AircraftParameters::default(),
    };
    let (duration, altitude) = match (
        parse_arg(&args, 1, DEFAULT_DURATION),
        parse_arg(&args, 2, DEFAULT_ALTITUDE),
    ) {
        (Ok(duration), Ok(altitude)) => (duration, altitude),
        (Err(e), _) | (_, Err(e)) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let conditions: Vec<TrimCondition> = AIRSPEEDS
        .iter()
        .map(|&airspeed| TrimCondition::StraightAndLevel { airspeed, altitude })
        .collect();
    let results = trim::sweep(
        &params,
        &conditions,
        &AtmosphereConfig::default(),
        &TrimSolverConfig::default(),
    );

    let report: Vec<serde_json::Value> = conditions
        .iter()
        .zip(results)
        .map(|(condition, result)| match result {
            Ok(trim) => {
                let flight = if trim.converged {
                    fly(&params, &trim, duration)
                        .unwrap_or_else(|e| json!({ "error": e.to_string() }))
                } else {
                    serde_json::Value::Null
                };
                json!({
                    "airspeed": condition.airspeed(),
                    "altitude": condition.altitude(),
                    "trim": {
                        "converged": trim.converged,
                        "cost": trim.cost,
                        "iterations": trim.iterations,
                        "alpha_deg": trim.alpha.to_degrees(),
                        "elevator": trim.controls.elevator,
                        "throttle": trim.controls.engines[0].throttle,
                    },
                    "after": flight,
                })
            }
            Err(e) => json!({
                "airspeed": condition.airspeed(),
                "altitude": condition.altitude(),
                "error": e.to_string(),
            }),
        })
        .collect();

    let output = json!({
        "aircraft": params.name,
        "duration_s": duration,
        "points": report,
    });
    match serde_json::to_string_pretty(&output) {
        Ok(text) => {
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("failed to encode results: {}", e);
            ExitCode::FAILURE
        }
    }
}
