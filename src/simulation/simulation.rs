use nalgebra::Vector3;
use std::sync::Arc;

use crate::{
    components::{
        AirData, AircraftParameters, AircraftState, ControlInputs, EngineState, ForceAccumulator,
        ForceCategory, TrimResult, Wrench,
    },
    resources::{AtmosphereConfig, AtmosphereModel, EnvironmentSample, SimulationConfig, Turbulence},
    simulation::{Diagnostics, FlightData, FlightDataInputs, GeoOrigin, Snapshot},
    systems::{
        aerodynamics::{calculate_aerodynamic_forces_moments, calculate_air_data},
        physics::{
            calculate_gravity_force, calculate_ground_forces, calculate_net_forces_moments,
            integrate, GearLayout, IntegratorSettings,
        },
        propulsion::Engine,
    },
    utils::{FaultOrigin, NumericFault, SimError},
};

/// Loads and sub-model outputs evaluated at one state.
struct Loads {
    air_data: AirData,
    engines: Vec<EngineState>,
    forces: ForceAccumulator,
}

/// Everything a successful step changes. Built without touching the
/// simulation, then committed in one go.
struct StepResult {
    state: AircraftState,
    /// Air data the step's loads were computed from.
    air_data: AirData,
    /// Air data at the new state, for reporting.
    reported_air_data: AirData,
    engines: Vec<EngineState>,
    environment: EnvironmentSample,
    forces: ForceAccumulator,
    turbulence: Turbulence,
    pitch_guard_engaged: bool,
}

/// One aircraft run: the per-step pipeline from controls to a new state.
///
/// Atmosphere → turbulence → air data → aerodynamics → propulsion → ground
/// contact → net load → integrator. A non-finite value at any stage rejects
/// the whole step: state, engines, turbulence and the published snapshot
/// stay as they were and the fault is returned.
pub struct Simulation {
    params: Arc<AircraftParameters>,
    config: SimulationConfig,
    atmosphere: AtmosphereConfig,
    integrator: IntegratorSettings,
    engines: Vec<Engine>,
    gear: GearLayout,
    turbulence: Turbulence,
    state: AircraftState,
    air_data: AirData,
    engine_states: Vec<EngineState>,
    controls: ControlInputs,
    external_load: Option<Wrench>,
    time: f64,
    diagnostics: Diagnostics,
    latest: Arc<Snapshot>,
}

impl Simulation {
    /// Builds a run with engines already settled at `controls`. Parameters
    /// and config are sanitized first; an initial state that is not finite
    /// is rejected.
    pub fn new(
        params: AircraftParameters,
        config: SimulationConfig,
        atmosphere: AtmosphereConfig,
        initial_state: AircraftState,
        controls: ControlInputs,
    ) -> Result<Self, SimError> {
        let params = Arc::new(params.sanitized());
        let config = config.sanitized();
        let controls = controls.sanitized();

        if !initial_state.is_finite() {
            return Err(NumericFault::new(
                FaultOrigin::Integrator,
                format!("initial state is not finite: {:?}", initial_state),
            )
            .into());
        }

        let environment = sample_environment(&initial_state, &atmosphere)?;
        let engines: Vec<Engine> = params
            .propulsion
            .engines
            .iter()
            .cloned()
            .map(Engine::new)
            .collect();
        let gear = GearLayout::new(&params.geometry, &params.mass, environment.gravity);
        let integrator = IntegratorSettings {
            scheme: config.scheme,
            pitch_guard: config.pitch_guard(),
        };

        let air_data = calculate_air_data(&initial_state, &environment, &Vector3::zeros(), None, 0.0);
        let cg = params.geometry.cg_position;
        let engine_states = engines
            .iter()
            .zip(controls.engines.iter())
            .map(|(engine, engine_controls)| {
                engine.settled(engine_controls, &environment, &air_data, &cg).state
            })
            .collect();

        let mut simulation = Self {
            turbulence: Turbulence::new(config.turbulence_seed),
            diagnostics: Diagnostics {
                low_fidelity: config.scheme.is_low_fidelity(),
                ..Default::default()
            },
            latest: Arc::new(placeholder_snapshot(&initial_state, &environment, &controls)),
            params,
            config,
            atmosphere,
            integrator,
            engines,
            gear,
            state: initial_state,
            air_data,
            engine_states,
            controls,
            external_load: None,
            time: 0.0,
        };

        let loads = simulation.evaluate_loads(
            &initial_state,
            &controls,
            &environment,
            &Vector3::zeros(),
            0.0,
        )?;
        simulation.engine_states = loads.engines.clone();
        simulation.air_data = loads.air_data;
        simulation.latest = Arc::new(simulation.build_snapshot(
            &initial_state,
            &loads.air_data,
            &environment,
            loads.forces,
        ));
        Ok(simulation)
    }

    /// Starts a run from a trim solution, with the trim controls held.
    pub fn from_trim(
        params: AircraftParameters,
        config: SimulationConfig,
        atmosphere: AtmosphereConfig,
        trim: &TrimResult,
    ) -> Result<Self, SimError> {
        Self::new(params, config, atmosphere, trim.state, trim.controls)
    }

    pub fn params(&self) -> &AircraftParameters {
        &self.params
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn state(&self) -> &AircraftState {
        &self.state
    }

    pub fn controls(&self) -> &ControlInputs {
        &self.controls
    }

    pub fn engine_states(&self) -> &[EngineState] {
        &self.engine_states
    }

    /// Elapsed simulation time (s).
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn last_fault(&self) -> Option<&NumericFault> {
        self.diagnostics.last_fault.as_ref()
    }

    pub fn atmosphere(&self) -> &AtmosphereConfig {
        &self.atmosphere
    }

    /// Takes effect from the next step.
    pub fn set_atmosphere(&mut self, atmosphere: AtmosphereConfig) {
        self.atmosphere = atmosphere;
    }

    /// Replaces the held controls without stepping.
    pub fn set_controls(&mut self, controls: &ControlInputs) {
        self.controls = controls.sanitized();
    }

    /// Extra body-axis load about the c.g. applied on every step until
    /// cleared, e.g. a store release or a test disturbance.
    pub fn set_external_load(&mut self, load: Option<Wrench>) {
        self.external_load = load;
    }

    /// Snapshot of the last accepted step.
    pub fn latest_snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.latest)
    }

    /// Advances one step. `None` reuses the controls of the previous step.
    pub fn step(&mut self, controls: Option<&ControlInputs>) -> Result<Arc<Snapshot>, SimError> {
        let controls = controls.map_or(self.controls, |c| c.sanitized());
        let dt = self.config.time_step;

        match self.advance(&controls, dt) {
            Ok(result) => {
                self.commit(result, controls, dt);
                Ok(self.latest_snapshot())
            }
            Err(fault) => {
                let fault = fault.at_time(self.time);
                self.diagnostics.last_fault = Some(fault.clone());
                Err(fault.into())
            }
        }
    }

    /// Steps with held controls until at least `duration` seconds of
    /// simulation time have passed.
    pub fn run_for(&mut self, duration: f64) -> Result<Arc<Snapshot>, SimError> {
        let steps = (duration / self.config.time_step).round().max(0.0) as u64;
        for _ in 0..steps {
            self.step(None)?;
        }
        Ok(self.latest_snapshot())
    }

    fn advance(&self, controls: &ControlInputs, dt: f64) -> Result<StepResult, NumericFault> {
        let environment = sample_environment(&self.state, &self.atmosphere)?;

        let mut turbulence = self.turbulence.clone();
        let gust = turbulence.update(
            dt,
            self.air_data.true_airspeed,
            environment.turbulence_intensity,
        );
        if !gust.iter().all(|g| g.is_finite()) {
            return Err(NumericFault::new(
                FaultOrigin::Atmosphere,
                format!("turbulence gust {:?}", gust),
            ));
        }

        let loads = self.evaluate_loads(&self.state, controls, &environment, &gust, dt)?;
        let net = calculate_net_forces_moments(&loads.forces);
        let outcome = integrate(
            &self.state,
            &self.params.mass,
            &net,
            environment.gravity,
            dt,
            &self.integrator,
        )?;

        // Air data and environment are reported for the new state
        let next_environment = sample_environment(&outcome.state, &self.atmosphere)?;
        let reported_air_data = calculate_air_data(
            &outcome.state,
            &next_environment,
            &gust,
            Some(&loads.air_data),
            dt,
        );
        check_air_data(&reported_air_data)?;

        Ok(StepResult {
            state: outcome.state,
            air_data: loads.air_data,
            reported_air_data,
            engines: loads.engines,
            environment: next_environment,
            forces: loads.forces,
            turbulence,
            pitch_guard_engaged: outcome.pitch_guard_engaged,
        })
    }

    fn commit(&mut self, result: StepResult, controls: ControlInputs, dt: f64) {
        self.state = result.state;
        self.air_data = result.air_data;
        self.engine_states = result.engines;
        self.turbulence = result.turbulence;
        self.controls = controls;
        self.time += dt;
        self.diagnostics.step_count += 1;
        if result.pitch_guard_engaged {
            self.diagnostics.pitch_guard_count += 1;
        }
        self.latest = Arc::new(self.build_snapshot(
            &result.state,
            &result.reported_air_data,
            &result.environment,
            result.forces,
        ));
    }

    /// Evaluates every load on the airframe at `state`. Engines advance by
    /// `dt` from their current state.
    fn evaluate_loads(
        &self,
        state: &AircraftState,
        controls: &ControlInputs,
        environment: &EnvironmentSample,
        gust: &Vector3<f64>,
        dt: f64,
    ) -> Result<Loads, NumericFault> {
        let air_data = calculate_air_data(state, environment, gust, Some(&self.air_data), dt);
        check_air_data(&air_data)?;

        let mut forces = ForceAccumulator::default();

        let aero = calculate_aerodynamic_forces_moments(
            &self.params.geometry,
            &self.params.aero_coef,
            &air_data,
            &state.angular_rate,
            controls,
        );
        if !aero.is_finite() {
            return Err(NumericFault::new(
                FaultOrigin::Aerodynamics,
                format!(
                    "force {:?}, moment {:?} at V={:.3} m/s, α={:.4}, β={:.4}",
                    aero.force, aero.moment, air_data.true_airspeed, air_data.alpha, air_data.beta
                ),
            ));
        }
        forces.add(ForceCategory::Aerodynamic, aero);

        let cg = self.params.geometry.cg_position;
        let mut engines = Vec::with_capacity(self.engines.len());
        for ((engine, engine_state), engine_controls) in self
            .engines
            .iter()
            .zip(self.engine_states.iter())
            .zip(controls.engines.iter())
        {
            let output = engine.update(engine_state, engine_controls, environment, &air_data, &cg, dt);
            let wrench = Wrench::new(output.force, output.moment);
            if !output.state.is_finite() || !wrench.is_finite() {
                return Err(NumericFault::new(
                    FaultOrigin::Propulsion,
                    format!(
                        "engine '{}' produced {:?} with throttle {:.3}",
                        engine.config().name,
                        output.state,
                        engine_controls.throttle
                    ),
                ));
            }
            forces.add(ForceCategory::Propulsive, wrench);
            engines.push(output.state);
        }

        let ground = calculate_ground_forces(
            state,
            &self.gear,
            self.config.ground_elevation,
            controls.brakes,
        );
        if !ground.is_finite() {
            return Err(NumericFault::new(
                FaultOrigin::Ground,
                format!("ground load {:?} at altitude {:.3} m", ground.force, state.altitude()),
            ));
        }
        forces.add(ForceCategory::Ground, ground);

        if let Some(load) = self.external_load {
            if !load.is_finite() {
                return Err(NumericFault::new(
                    FaultOrigin::External,
                    format!("force {:?}, moment {:?}", load.force, load.moment),
                ));
            }
            forces.add(ForceCategory::External, load);
        }

        forces.add(
            ForceCategory::Gravitational,
            calculate_gravity_force(state, &self.params.mass, environment.gravity),
        );

        Ok(Loads {
            air_data,
            engines,
            forces,
        })
    }

    fn build_snapshot(
        &self,
        state: &AircraftState,
        air_data: &AirData,
        environment: &EnvironmentSample,
        forces: ForceAccumulator,
    ) -> Snapshot {
        let flight_data = FlightData::compute(&FlightDataInputs {
            time: self.time,
            state,
            air_data,
            engines: &self.engine_states,
            forces: &forces,
            mass: self.params.mass.mass,
            gravity: environment.gravity,
            origin: GeoOrigin {
                latitude_deg: self.config.origin_latitude_deg,
                longitude_deg: self.config.origin_longitude_deg,
            },
            pitch_guard: self.integrator.pitch_guard,
        });

        Snapshot {
            time: self.time,
            state: *state,
            air_data: *air_data,
            engines: self.engine_states.clone(),
            environment: *environment,
            controls: self.controls,
            forces,
            flight_data,
            diagnostics: self.diagnostics.clone(),
        }
    }
}

fn sample_environment(
    state: &AircraftState,
    atmosphere: &AtmosphereConfig,
) -> Result<EnvironmentSample, NumericFault> {
    let environment = AtmosphereModel::sample(state.altitude(), atmosphere);
    if environment.is_finite() {
        Ok(environment)
    } else {
        Err(NumericFault::new(
            FaultOrigin::Atmosphere,
            format!(
                "sample {:?} at altitude {:.3} m",
                environment,
                state.altitude()
            ),
        ))
    }
}

fn check_air_data(air_data: &AirData) -> Result<(), NumericFault> {
    let finite = [
        air_data.true_airspeed,
        air_data.alpha,
        air_data.beta,
        air_data.alpha_dot,
        air_data.dynamic_pressure,
        air_data.mach,
    ]
    .iter()
    .all(|v| v.is_finite());
    if finite {
        Ok(())
    } else {
        Err(NumericFault::new(
            FaultOrigin::Aerodynamics,
            format!("air data {:?}", air_data),
        ))
    }
}

fn placeholder_snapshot(
    state: &AircraftState,
    environment: &EnvironmentSample,
    controls: &ControlInputs,
) -> Snapshot {
    Snapshot {
        time: 0.0,
        state: *state,
        air_data: AirData::default(),
        engines: Vec::new(),
        environment: *environment,
        controls: *controls,
        forces: ForceAccumulator::default(),
        flight_data: FlightData::default(),
        diagnostics: Diagnostics::default(),
    }
}
