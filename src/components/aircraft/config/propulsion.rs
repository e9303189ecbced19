use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::utils::{constants::MAX_ENGINES, ConfigError};

/// Engine families the propulsion model knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EngineKind {
    FixedPitchPropeller,
    Turboprop,
    Turbojet,
}

/// Configuration for one installed engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerplantConfig {
    /// Name of the powerplant
    pub name: String,
    /// Mount position in the same body-axis frame as the c.g. (m)
    pub position: Vector3<f64>,
    /// Unit thrust line direction in body axes
    pub thrust_axis: Vector3<f64>,
    pub model: EngineModel,
}

/// Per-variant performance data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EngineModel {
    FixedPitchPropeller(PistonPropellerConfig),
    Turboprop(TurbopropConfig),
    Turbojet(TurbojetConfig),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PistonPropellerConfig {
    /// Rated shaft power at sea level, full rich, full throttle (W)
    pub max_power: f64,
    pub idle_rpm: f64,
    pub rated_rpm: f64,
    /// Fraction of rated power delivered at closed throttle
    pub idle_power_fraction: f64,
    /// Propeller diameter (m)
    pub prop_diameter: f64,
    /// Propulsive efficiency in forward flight
    pub prop_efficiency: f64,
    /// Static figure of merit, caps thrust at low airspeed
    pub figure_of_merit: f64,
    /// Brake specific fuel consumption (kg/J)
    pub sfc: f64,
    /// Time constant of the manifold/RPM response (s)
    pub response_time: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TurbopropConfig {
    /// Rated shaft power at sea level (W)
    pub max_power: f64,
    pub idle_power_fraction: f64,
    /// Governed propeller speed range selected by the pitch lever
    pub min_prop_rpm: f64,
    pub max_prop_rpm: f64,
    pub prop_diameter: f64,
    pub prop_efficiency: f64,
    pub figure_of_merit: f64,
    /// Power specific fuel consumption (kg/J)
    pub sfc: f64,
    pub spool_up_time: f64,
    pub spool_down_time: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TurbojetConfig {
    /// Maximum thrust at sea level static conditions (N)
    pub max_thrust: f64,
    /// Idle thrust at sea level (N)
    pub min_thrust: f64,
    /// Spool speed at full thrust
    pub max_rpm: f64,
    /// Thrust specific fuel consumption (kg/N/s)
    pub tsfc: f64,
    /// Time constant for engine spool-up (s)
    pub spool_up_time: f64,
    /// Time constant for engine spool-down (s)
    pub spool_down_time: f64,
}

impl Default for PistonPropellerConfig {
    fn default() -> Self {
        Self {
            max_power: 134_000.0, // 180 hp
            idle_rpm: 600.0,
            rated_rpm: 2700.0,
            idle_power_fraction: 0.05,
            prop_diameter: 1.93,
            prop_efficiency: 0.8,
            figure_of_merit: 0.75,
            sfc: 0.35 / 3.6e6, // kg/kWh to kg/J
            response_time: 0.5,
        }
    }
}

impl Default for TurbopropConfig {
    fn default() -> Self {
        Self {
            max_power: 507_000.0,
            idle_power_fraction: 0.08,
            min_prop_rpm: 1600.0,
            max_prop_rpm: 2200.0,
            prop_diameter: 2.59,
            prop_efficiency: 0.82,
            figure_of_merit: 0.75,
            sfc: 0.36 / 3.6e6,
            spool_up_time: 2.5,
            spool_down_time: 1.8,
        }
    }
}

impl Default for TurbojetConfig {
    fn default() -> Self {
        Self {
            max_thrust: 20000.0,
            min_thrust: 1000.0,
            max_rpm: 10000.0,
            tsfc: 0.8 / 3600.0,
            spool_up_time: 3.0,
            spool_down_time: 2.0,
        }
    }
}

impl EngineModel {
    pub fn default_for(kind: EngineKind) -> Self {
        match kind {
            EngineKind::FixedPitchPropeller => {
                EngineModel::FixedPitchPropeller(PistonPropellerConfig::default())
            }
            EngineKind::Turboprop => EngineModel::Turboprop(TurbopropConfig::default()),
            EngineKind::Turbojet => EngineModel::Turbojet(TurbojetConfig::default()),
        }
    }

    pub fn kind(&self) -> EngineKind {
        match self {
            EngineModel::FixedPitchPropeller(_) => EngineKind::FixedPitchPropeller,
            EngineModel::Turboprop(_) => EngineKind::Turboprop,
            EngineModel::Turbojet(_) => EngineKind::Turbojet,
        }
    }
}

impl PowerplantConfig {
    pub fn new(name: impl Into<String>, position: Vector3<f64>, model: EngineModel) -> Self {
        Self {
            name: name.into(),
            position,
            thrust_axis: Vector3::x(),
            model,
        }
    }

    pub fn is_valid(&self) -> bool {
        let axis_ok = self.thrust_axis.iter().all(|v| v.is_finite())
            && (self.thrust_axis.norm() - 1.0).abs() < 1e-6;
        let position_ok = self.position.iter().all(|v| v.is_finite());
        let model_ok = match &self.model {
            EngineModel::FixedPitchPropeller(c) => {
                c.max_power > 0.0
                    && c.rated_rpm > c.idle_rpm
                    && c.idle_rpm >= 0.0
                    && c.prop_diameter > 0.0
                    && c.prop_efficiency > 0.0
                    && c.prop_efficiency <= 1.0
                    && c.figure_of_merit > 0.0
                    && c.sfc >= 0.0
                    && c.response_time >= 0.0
            }
            EngineModel::Turboprop(c) => {
                c.max_power > 0.0
                    && c.max_prop_rpm >= c.min_prop_rpm
                    && c.min_prop_rpm > 0.0
                    && c.prop_diameter > 0.0
                    && c.prop_efficiency > 0.0
                    && c.prop_efficiency <= 1.0
                    && c.figure_of_merit > 0.0
                    && c.sfc >= 0.0
                    && c.spool_up_time >= 0.0
                    && c.spool_down_time >= 0.0
            }
            EngineModel::Turbojet(c) => {
                c.max_thrust > 0.0
                    && c.min_thrust >= 0.0
                    && c.max_thrust >= c.min_thrust
                    && c.max_rpm > 0.0
                    && c.tsfc >= 0.0
                    && c.spool_up_time >= 0.0
                    && c.spool_down_time >= 0.0
            }
        };
        axis_ok && position_ok && model_ok
    }
}

/// Engine list as it arrives from a parameter document: a signed count
/// (so malformed documents can be detected), one kind for all engines and
/// optional explicit mount positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineListSpec {
    pub count: i64,
    pub kind: EngineKind,
    #[serde(default)]
    pub mount_positions: Vec<[f64; 3]>,
    /// Lateral spacing used when positions are not given (m)
    #[serde(default = "default_engine_spacing")]
    pub spacing: f64,
}

fn default_engine_spacing() -> f64 {
    2.5
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropulsionConfig {
    /// Configurations for each engine
    pub engines: Vec<PowerplantConfig>,
}

impl PropulsionConfig {
    /// Creates a new single-engine configuration
    pub fn single_engine(engine: PowerplantConfig) -> Self {
        Self {
            engines: vec![engine],
        }
    }

    /// The documented fallback: one nose-mounted fixed-pitch piston engine.
    pub fn light_single() -> Self {
        Self::single_engine(PowerplantConfig::new(
            "Piston 180hp",
            Vector3::new(1.8, 0.0, 0.0),
            EngineModel::FixedPitchPropeller(PistonPropellerConfig::default()),
        ))
    }

    /// Builds engines from a list specification. Invalid counts are
    /// reported; the caller decides on the fallback.
    pub fn from_engine_list(spec: &EngineListSpec) -> Result<Self, ConfigError> {
        if spec.count < 1 || spec.count > MAX_ENGINES as i64 {
            return Err(ConfigError::InvalidEngineCount(spec.count));
        }
        let count = spec.count as usize;

        let positions: Vec<Vector3<f64>> = if spec.mount_positions.len() == count {
            spec.mount_positions
                .iter()
                .map(|p| Vector3::new(p[0], p[1], p[2]))
                .collect()
        } else {
            if !spec.mount_positions.is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "{} mount positions given for {} engines",
                    spec.mount_positions.len(),
                    count
                )));
            }
            symmetric_layout(count, spec.spacing)
        };

        let model = EngineModel::default_for(spec.kind);
        let engines = positions
            .into_iter()
            .enumerate()
            .map(|(i, position)| PowerplantConfig::new(format!("Engine {}", i + 1), position, model))
            .collect::<Vec<_>>();

        let config = Self { engines };
        if config.engines.iter().all(PowerplantConfig::is_valid) {
            Ok(config)
        } else {
            Err(ConfigError::ValidationError(
                "engine mount position is not finite".to_string(),
            ))
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.engines.is_empty()
            && self.engines.len() <= MAX_ENGINES
            && self.engines.iter().all(PowerplantConfig::is_valid)
    }
}

impl Default for PropulsionConfig {
    fn default() -> Self {
        Self::light_single()
    }
}

/// Spreads engines symmetrically about the centreline, wing-mounted.
fn symmetric_layout(count: usize, spacing: f64) -> Vec<Vector3<f64>> {
    if count == 1 {
        return vec![Vector3::new(1.8, 0.0, 0.0)];
    }
    let half = (count as f64 - 1.0) / 2.0;
    (0..count)
        .map(|i| Vector3::new(0.5, (i as f64 - half) * spacing, 0.0))
        .collect()
}
