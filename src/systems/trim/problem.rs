use argmin::core::{CostFunction, Error as ArgminError};
use nalgebra::Vector3;

use crate::components::{
    AircraftParameters, AircraftState, ControlInputs, EngineState, LongitudinalBounds,
    TrimCondition, Wrench,
};
use crate::resources::{AtmosphereConfig, AtmosphereModel, EnvironmentSample};
use crate::systems::{
    aerodynamics::{calculate_aerodynamic_forces_moments, calculate_air_data},
    physics::state_derivative,
    propulsion::Engine,
};

/// Weight applied to the squared distance outside the bounds.
const BOUNDS_PENALTY: f64 = 1e3;

/// Candidate trim point decoded from the optimiser's parameter vector
/// `[alpha, elevator, throttle]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrimPoint {
    pub alpha: f64,
    pub elevator: f64,
    pub throttle: f64,
}

impl TrimPoint {
    pub fn from_param(param: &[f64], bounds: &LongitudinalBounds) -> Self {
        Self {
            alpha: param[0].clamp(bounds.alpha_range.0, bounds.alpha_range.1),
            elevator: param[1].clamp(bounds.elevator_range.0, bounds.elevator_range.1),
            throttle: param[2].clamp(bounds.throttle_range.0, bounds.throttle_range.1),
        }
    }
}

fn bounds_penalty(value: f64, range: (f64, f64)) -> f64 {
    let (min, max) = range;
    let below = if value < min { (min - value).powi(2) } else { 0.0 };
    let above = if value > max { (value - max).powi(2) } else { 0.0 };
    BOUNDS_PENALTY * (below + above)
}

/// Everything the trim cost depends on.
#[derive(Clone)]
pub struct TrimProblem<'a> {
    pub params: &'a AircraftParameters,
    pub condition: TrimCondition,
    pub bounds: LongitudinalBounds,
    pub base_controls: ControlInputs,
    engines: Vec<Engine>,
    env: EnvironmentSample,
}

/// Loads and state derivative of one candidate trim point.
#[derive(Debug, Clone)]
pub struct TrimEvaluation {
    pub state: AircraftState,
    pub controls: ControlInputs,
    pub engines: Vec<EngineState>,
    pub loads: Wrench,
    /// [u̇, v̇, ẇ, ṗ, q̇, ṙ]
    pub accelerations: [f64; 6],
}

impl<'a> TrimProblem<'a> {
    pub fn new(
        params: &'a AircraftParameters,
        atmosphere: &AtmosphereConfig,
        condition: TrimCondition,
        bounds: LongitudinalBounds,
    ) -> Self {
        // Trim is solved in still air; only the temperature offset applies
        let still_air = AtmosphereConfig::new(0.0, 0.0, atmosphere.temperature_offset());
        Self {
            params,
            condition,
            bounds,
            base_controls: ControlInputs::default(),
            engines: params
                .propulsion
                .engines
                .iter()
                .cloned()
                .map(Engine::new)
                .collect(),
            env: AtmosphereModel::sample(condition.altitude(), &still_air),
        }
    }

    pub fn environment(&self) -> &EnvironmentSample {
        &self.env
    }

    /// Starting guess: lift coefficient for 1 g, neutral elevator, half
    /// throttle.
    pub fn initial_guess(&self) -> Vec<f64> {
        let v = self.condition.airspeed();
        let q_s = 0.5 * self.env.density * v * v * self.params.geometry.wing_area;
        let lift = &self.params.aero_coef.lift;
        let alpha = if q_s > 0.0 && lift.c_l_alpha.abs() > 1e-9 {
            let c_l = self.params.mass.mass * self.env.gravity / q_s;
            ((c_l - lift.c_l_0) / lift.c_l_alpha)
                .clamp(self.bounds.alpha_range.0, self.bounds.alpha_range.1)
        } else {
            0.0
        };
        vec![alpha, 0.0, 0.5]
    }

    pub fn evaluate(&self, point: &TrimPoint) -> TrimEvaluation {
        let v = self.condition.airspeed();
        let gamma = self.condition.flight_path_angle();
        let state = AircraftState {
            velocity: Vector3::new(v * point.alpha.cos(), 0.0, v * point.alpha.sin()),
            angular_rate: Vector3::zeros(),
            attitude: Vector3::new(0.0, point.alpha + gamma, 0.0),
            position: Vector3::new(0.0, 0.0, -self.condition.altitude()),
        };

        let mut controls = self.base_controls.with_throttle(point.throttle);
        controls.elevator = point.elevator;
        controls.aileron = 0.0;
        controls.rudder = 0.0;

        let air_data = calculate_air_data(&state, &self.env, &Vector3::zeros(), None, 0.0);
        let mut loads = calculate_aerodynamic_forces_moments(
            &self.params.geometry,
            &self.params.aero_coef,
            &air_data,
            &state.angular_rate,
            &controls,
        );

        let cg = self.params.geometry.cg_position;
        let mut engines = Vec::with_capacity(self.engines.len());
        for (engine, engine_controls) in self.engines.iter().zip(controls.engines.iter()) {
            let output = engine.settled(engine_controls, &self.env, &air_data, &cg);
            loads += Wrench::new(output.force, output.moment);
            engines.push(output.state);
        }

        let (x_dot, _) = state_derivative(
            &state.to_vector(),
            &self.params.mass,
            &loads,
            self.env.gravity,
            89.5f64.to_radians(),
        );

        TrimEvaluation {
            state,
            controls,
            engines,
            loads,
            accelerations: [x_dot[0], x_dot[1], x_dot[2], x_dot[3], x_dot[4], x_dot[5]],
        }
    }

    /// Squared body accelerations in g plus squared pitch acceleration.
    pub fn residual(&self, evaluation: &TrimEvaluation) -> f64 {
        let g = self.env.gravity;
        let [u_dot, _, w_dot, _, q_dot, _] = evaluation.accelerations;
        (u_dot / g).powi(2) + (w_dot / g).powi(2) + q_dot.powi(2)
    }
}

impl CostFunction for TrimProblem<'_> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, param: &Self::Param) -> Result<Self::Output, ArgminError> {
        if param.len() != 3 {
            return Err(ArgminError::msg(
                "Param vector must have length 3 [alpha, elevator, throttle]",
            ));
        }
        let point = TrimPoint::from_param(param, &self.bounds);
        let evaluation = self.evaluate(&point);
        let penalty = bounds_penalty(param[0], self.bounds.alpha_range)
            + bounds_penalty(param[1], self.bounds.elevator_range)
            + bounds_penalty(param[2], self.bounds.throttle_range);
        let cost = self.residual(&evaluation) + penalty;
        if cost.is_finite() {
            Ok(cost)
        } else {
            Err(ArgminError::msg("trim cost is not finite"))
        }
    }
}
