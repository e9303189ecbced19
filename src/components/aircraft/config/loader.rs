use serde::Deserialize;

use crate::components::aircraft::config::{
    aero_coef::{
        AircraftAeroCoefficients, DragCoefficients, LiftCoefficients, PitchCoefficients,
        RollCoefficients, SideForceCoefficients, YawCoefficients,
    },
    geometry::{AircraftGeometry, ControlLimits},
    mass::MassModel,
    propulsion::EngineListSpec,
};

/// Flat aircraft parameter document. Optional entries fall back to the
/// light single defaults when omitted.
#[allow(non_snake_case)]
#[derive(Debug, Deserialize)]
pub struct RawAircraftConfig {
    /// Aircraft identification
    pub name: String,

    /// Mass properties
    pub mass: f64,
    pub ixx: f64,
    pub iyy: f64,
    pub izz: f64,
    #[serde(default)]
    pub ixz: f64,

    /// Geometry
    pub wing_area: f64,
    pub wing_span: f64,
    pub mac: f64,
    #[serde(default)]
    pub cg_position: Option<[f64; 3]>,
    #[serde(default)]
    pub ac_position: Option<[f64; 3]>,
    #[serde(default)]
    pub gear_height: Option<f64>,
    /// Surface travel limits in degrees
    #[serde(default)]
    pub max_elevator_deg: Option<f64>,
    #[serde(default)]
    pub max_aileron_deg: Option<f64>,
    #[serde(default)]
    pub max_rudder_deg: Option<f64>,
    #[serde(default)]
    pub max_flap_deg: Option<f64>,

    /// Lift coefficients
    pub c_L_0: f64,
    pub c_L_alpha: f64,
    pub c_L_q: f64,
    #[serde(default)]
    pub c_L_alphadot: f64,
    pub c_L_deltae: f64,
    #[serde(default)]
    pub c_L_flap: f64,

    /// Drag coefficients
    pub c_D_0: f64,
    #[serde(default)]
    pub c_D_alpha: f64,
    pub c_D_alpha2: f64,
    #[serde(default)]
    pub c_D_deltae: f64,
    #[serde(default)]
    pub c_D_flap: f64,
    #[serde(default)]
    pub c_D_gear: f64,

    /// Side-force coefficients
    pub c_Y_beta: f64,
    #[serde(default)]
    pub c_Y_p: f64,
    #[serde(default)]
    pub c_Y_r: f64,
    #[serde(default)]
    pub c_Y_deltaa: f64,
    pub c_Y_deltar: f64,

    /// Roll coefficients
    pub c_l_beta: f64,
    pub c_l_p: f64,
    pub c_l_r: f64,
    pub c_l_deltaa: f64,
    #[serde(default)]
    pub c_l_deltar: f64,

    /// Pitch coefficients
    pub c_m_0: f64,
    pub c_m_alpha: f64,
    pub c_m_q: f64,
    #[serde(default)]
    pub c_m_alphadot: f64,
    pub c_m_deltae: f64,
    #[serde(default)]
    pub c_m_flap: f64,

    /// Yaw coefficients
    pub c_n_beta: f64,
    pub c_n_p: f64,
    pub c_n_r: f64,
    #[serde(default)]
    pub c_n_deltaa: f64,
    pub c_n_deltar: f64,

    /// Installed engines
    #[serde(default)]
    pub engines: Option<EngineListSpec>,
}

impl AircraftAeroCoefficients {
    pub fn from_raw(raw: &RawAircraftConfig) -> Self {
        AircraftAeroCoefficients {
            lift: LiftCoefficients {
                c_l_0: raw.c_L_0,
                c_l_alpha: raw.c_L_alpha,
                c_l_q: raw.c_L_q,
                c_l_alphadot: raw.c_L_alphadot,
                c_l_elevator: raw.c_L_deltae,
                c_l_flap: raw.c_L_flap,
            },
            drag: DragCoefficients {
                c_d_0: raw.c_D_0,
                c_d_alpha: raw.c_D_alpha,
                c_d_alpha2: raw.c_D_alpha2,
                c_d_elevator: raw.c_D_deltae,
                c_d_flap: raw.c_D_flap,
                c_d_gear: raw.c_D_gear,
            },
            side_force: SideForceCoefficients {
                c_y_beta: raw.c_Y_beta,
                c_y_p: raw.c_Y_p,
                c_y_r: raw.c_Y_r,
                c_y_aileron: raw.c_Y_deltaa,
                c_y_rudder: raw.c_Y_deltar,
            },
            roll: RollCoefficients {
                c_l_beta: raw.c_l_beta,
                c_l_p: raw.c_l_p,
                c_l_r: raw.c_l_r,
                c_l_aileron: raw.c_l_deltaa,
                c_l_rudder: raw.c_l_deltar,
            },
            pitch: PitchCoefficients {
                c_m_0: raw.c_m_0,
                c_m_alpha: raw.c_m_alpha,
                c_m_q: raw.c_m_q,
                c_m_alphadot: raw.c_m_alphadot,
                c_m_elevator: raw.c_m_deltae,
                c_m_flap: raw.c_m_flap,
            },
            yaw: YawCoefficients {
                c_n_beta: raw.c_n_beta,
                c_n_p: raw.c_n_p,
                c_n_r: raw.c_n_r,
                c_n_aileron: raw.c_n_deltaa,
                c_n_rudder: raw.c_n_deltar,
            },
        }
    }
}

impl AircraftGeometry {
    pub fn from_raw(raw: &RawAircraftConfig) -> Self {
        let defaults = ControlLimits::default();
        let limit = |deg: Option<f64>, fallback: f64| deg.map(f64::to_radians).unwrap_or(fallback);
        let mut geometry = AircraftGeometry::new(raw.wing_area, raw.wing_span, raw.mac);
        if let Some(cg) = raw.cg_position {
            geometry.cg_position = cg.into();
        }
        if let Some(ac) = raw.ac_position {
            geometry.ac_position = ac.into();
        }
        if let Some(height) = raw.gear_height {
            geometry.gear_height = height;
        }
        geometry.control_limits = ControlLimits {
            elevator: limit(raw.max_elevator_deg, defaults.elevator),
            aileron: limit(raw.max_aileron_deg, defaults.aileron),
            rudder: limit(raw.max_rudder_deg, defaults.rudder),
            flap: limit(raw.max_flap_deg, defaults.flap),
        };
        geometry
    }
}

impl MassModel {
    pub fn from_raw(raw: &RawAircraftConfig) -> Self {
        MassModel::new(raw.mass, raw.ixx, raw.iyy, raw.izz, raw.ixz)
    }
}
