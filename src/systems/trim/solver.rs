use argmin::{core::Executor, solver::neldermead::NelderMead};
use bevy::prelude::*;
use rayon::prelude::*;

use crate::{
    components::{AircraftParameters, TrimCondition, TrimResult, TrimSolverConfig},
    resources::AtmosphereConfig,
    systems::trim::{TrimPoint, TrimProblem},
    utils::SimError,
};

/// Simplex edge length per parameter [alpha, elevator, throttle].
const SIMPLEX_STEP: [f64; 3] = [0.02, 0.05, 0.1];

fn initial_simplex(guess: &[f64]) -> Vec<Vec<f64>> {
    let mut simplex = Vec::with_capacity(guess.len() + 1);
    simplex.push(guess.to_vec());
    for (i, step) in SIMPLEX_STEP.iter().enumerate() {
        let mut vertex = guess.to_vec();
        vertex[i] += step;
        simplex.push(vertex);
    }
    simplex
}

/// Finds the wings-level, zero-sideslip state and controls that hold
/// `condition` with zero body accelerations.
///
/// A run that ends above the cost tolerance is still returned, with
/// `converged` cleared.
pub fn solve(
    params: &AircraftParameters,
    condition: TrimCondition,
    atmosphere: &AtmosphereConfig,
    config: &TrimSolverConfig,
) -> Result<TrimResult, SimError> {
    if !(condition.airspeed() > 0.0) || !condition.altitude().is_finite() {
        return Err(SimError::Trim(format!(
            "Cannot trim for {:?}: airspeed must be positive",
            condition
        )));
    }

    let problem = TrimProblem::new(params, atmosphere, condition, config.bounds);
    let guess = problem.initial_guess();

    let solver = NelderMead::new(initial_simplex(&guess))
        .with_sd_tolerance(config.sd_tolerance)
        .map_err(|e| SimError::Trim(e.to_string()))?;

    let result = Executor::new(problem.clone(), solver)
        .configure(|state| {
            state
                .max_iters(config.max_iterations)
                .target_cost(config.cost_tolerance)
        })
        .run()
        .map_err(|e| SimError::Trim(e.to_string()))?;

    let best = result
        .state
        .best_param
        .clone()
        .ok_or_else(|| SimError::Trim("Solver returned no parameters".to_string()))?;
    let cost = result.state.best_cost;
    let iterations = result.state.iter;

    let point = TrimPoint::from_param(&best, &config.bounds);
    let evaluation = problem.evaluate(&point);
    let converged = cost <= config.cost_tolerance;

    if converged {
        info!(
            "{} trimmed: elevator={:.3}, throttle={:.3}, alpha={:.2}°, cost={:.3e}, iterations={}",
            params.name,
            point.elevator,
            point.throttle,
            point.alpha.to_degrees(),
            cost,
            iterations
        );
    } else {
        warn!(
            "{} trim did not converge for {:?}: cost={:.3e} after {} iterations",
            params.name, condition, cost, iterations
        );
    }

    Ok(TrimResult {
        condition,
        state: evaluation.state,
        controls: evaluation.controls,
        engines: evaluation.engines,
        alpha: point.alpha,
        cost,
        converged,
        iterations,
    })
}

/// Trims each condition independently on the rayon pool. Results keep the
/// order of `conditions`.
pub fn sweep(
    params: &AircraftParameters,
    conditions: &[TrimCondition],
    atmosphere: &AtmosphereConfig,
    config: &TrimSolverConfig,
) -> Vec<Result<TrimResult, SimError>> {
    conditions
        .par_iter()
        .map(|condition| solve(params, *condition, atmosphere, config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn cruise() -> TrimCondition {
        TrimCondition::StraightAndLevel {
            airspeed: 55.0,
            altitude: 1000.0,
        }
    }

    #[test]
    fn test_cruise_trim_converges() {
        let params = AircraftParameters::light_single();
        let result = solve(
            &params,
            cruise(),
            &AtmosphereConfig::default(),
            &TrimSolverConfig::default(),
        )
        .unwrap();

        assert!(result.converged, "cost {}", result.cost);
        assert!(result.alpha > 0.0 && result.alpha < 6f64.to_radians());
        assert!(result.controls.engines[0].throttle > 0.2);
        assert!(result.controls.engines[0].throttle < 1.0);
        assert_relative_eq!(result.state.velocity.norm(), 55.0, epsilon = 1e-9);
        assert_relative_eq!(result.state.altitude(), 1000.0, epsilon = 1e-9);
        assert_relative_eq!(result.state.pitch(), result.alpha, epsilon = 1e-12);
    }

    #[test]
    fn test_trim_is_symmetric() {
        let params = AircraftParameters::light_single();
        let result = solve(
            &params,
            cruise(),
            &AtmosphereConfig::new(15.0, 90.0, 0.0),
            &TrimSolverConfig::default(),
        )
        .unwrap();

        assert_eq!(result.state.velocity.y, 0.0);
        assert_eq!(result.state.roll(), 0.0);
        assert_eq!(result.controls.aileron, 0.0);
        assert_eq!(result.controls.rudder, 0.0);
    }

    #[test]
    fn test_climb_needs_more_throttle() {
        let params = AircraftParameters::light_single();
        let config = TrimSolverConfig::default();
        let conditions = [
            cruise(),
            TrimCondition::SteadyClimb {
                airspeed: 55.0,
                altitude: 1000.0,
                gamma: 2f64.to_radians(),
            },
        ];
        let results = sweep(&params, &conditions, &AtmosphereConfig::default(), &config);
        assert_eq!(results.len(), 2);
        let level = results[0].as_ref().unwrap();
        let climb = results[1].as_ref().unwrap();
        assert!(level.converged && climb.converged);
        assert!(climb.controls.engines[0].throttle > level.controls.engines[0].throttle);
        assert_relative_eq!(
            climb.state.flight_path_angle(),
            2f64.to_radians(),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_rejects_zero_airspeed() {
        let params = AircraftParameters::light_single();
        let result = solve(
            &params,
            TrimCondition::StraightAndLevel {
                airspeed: 0.0,
                altitude: 1000.0,
            },
            &AtmosphereConfig::default(),
            &TrimSolverConfig::default(),
        );
        assert!(matches!(result, Err(SimError::Trim(_))));
    }
}
