use serde::{Deserialize, Serialize};

/// Linear stability and control derivative set, one group per force or
/// moment coefficient. Angles and deflections are in radians, rates are
/// non-dimensional (`p·b/2V`, `q·c/2V`, `r·b/2V`).
#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AircraftAeroCoefficients {
    pub lift: LiftCoefficients,
    pub drag: DragCoefficients,
    pub side_force: SideForceCoefficients,
    pub roll: RollCoefficients,
    pub pitch: PitchCoefficients,
    pub yaw: YawCoefficients,
}

/// Lift coefficients
#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LiftCoefficients {
    /// Lift at zero angle of attack.
    pub c_l_0: f64,
    /// Lift curve slope (per rad).
    pub c_l_alpha: f64,
    /// Lift due to pitch rate.
    pub c_l_q: f64,
    /// Lift due to rate of change of angle of attack.
    pub c_l_alphadot: f64,
    /// Lift due to elevator deflection.
    pub c_l_elevator: f64,
    /// Lift due to flap deflection.
    pub c_l_flap: f64,
}

/// Drag coefficients
#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragCoefficients {
    /// Parasite drag.
    pub c_d_0: f64,
    /// Linear drag growth with angle of attack.
    pub c_d_alpha: f64,
    /// Quadratic (induced) drag growth with angle of attack.
    pub c_d_alpha2: f64,
    /// Drag due to elevator deflection magnitude.
    pub c_d_elevator: f64,
    /// Drag due to flap deflection.
    pub c_d_flap: f64,
    /// Drag of the extended landing gear.
    pub c_d_gear: f64,
}

/// Side force coefficients
#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SideForceCoefficients {
    pub c_y_beta: f64,
    pub c_y_p: f64,
    pub c_y_r: f64,
    pub c_y_aileron: f64,
    pub c_y_rudder: f64,
}

/// Roll moment coefficients
#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RollCoefficients {
    /// Dihedral effect.
    pub c_l_beta: f64,
    /// Roll damping.
    pub c_l_p: f64,
    pub c_l_r: f64,
    pub c_l_aileron: f64,
    pub c_l_rudder: f64,
}

/// Pitch moment coefficients
#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PitchCoefficients {
    pub c_m_0: f64,
    /// Static longitudinal stability, negative for a stable airframe.
    pub c_m_alpha: f64,
    /// Pitch damping.
    pub c_m_q: f64,
    pub c_m_alphadot: f64,
    pub c_m_elevator: f64,
    pub c_m_flap: f64,
}

/// Yaw moment coefficients
#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YawCoefficients {
    /// Weathercock stability.
    pub c_n_beta: f64,
    pub c_n_p: f64,
    /// Yaw damping.
    pub c_n_r: f64,
    pub c_n_aileron: f64,
    pub c_n_rudder: f64,
}

impl AircraftAeroCoefficients {
    /// Derivatives of a four-seat, high-wing, fixed-gear single. Moments
    /// are referenced to the aerodynamic center, which coincides with the
    /// c.g. on the baseline airframe.
    pub fn light_single() -> Self {
        Self {
            lift: LiftCoefficients {
                c_l_0: 0.31,
                c_l_alpha: 5.143,
                c_l_q: 3.9,
                c_l_alphadot: 1.7,
                c_l_elevator: 0.43,
                c_l_flap: 0.76,
            },
            drag: DragCoefficients {
                c_d_0: 0.031,
                c_d_alpha: 0.13,
                c_d_alpha2: 1.4,
                c_d_elevator: 0.06,
                c_d_flap: 0.12,
                c_d_gear: 0.01,
            },
            side_force: SideForceCoefficients {
                c_y_beta: -0.31,
                c_y_p: -0.037,
                c_y_r: 0.21,
                c_y_aileron: 0.0,
                c_y_rudder: 0.187,
            },
            roll: RollCoefficients {
                c_l_beta: -0.089,
                c_l_p: -0.47,
                c_l_r: 0.096,
                c_l_aileron: 0.178,
                c_l_rudder: 0.0147,
            },
            pitch: PitchCoefficients {
                c_m_0: 0.04,
                c_m_alpha: -0.89,
                c_m_q: -12.4,
                c_m_alphadot: -5.2,
                c_m_elevator: -1.28,
                c_m_flap: -0.2,
            },
            yaw: YawCoefficients {
                c_n_beta: 0.065,
                c_n_p: -0.03,
                c_n_r: -0.099,
                c_n_aileron: -0.0053,
                c_n_rudder: -0.0657,
            },
        }
    }

    /// True when every derivative is finite.
    pub fn is_finite(&self) -> bool {
        self.values().iter().all(|v| v.is_finite())
    }

    fn values(&self) -> [f64; 33] {
        let (l, d, y, r, m, n) = (
            &self.lift,
            &self.drag,
            &self.side_force,
            &self.roll,
            &self.pitch,
            &self.yaw,
        );
        [
            l.c_l_0,
            l.c_l_alpha,
            l.c_l_q,
            l.c_l_alphadot,
            l.c_l_elevator,
            l.c_l_flap,
            d.c_d_0,
            d.c_d_alpha,
            d.c_d_alpha2,
            d.c_d_elevator,
            d.c_d_flap,
            d.c_d_gear,
            y.c_y_beta,
            y.c_y_p,
            y.c_y_r,
            y.c_y_aileron,
            y.c_y_rudder,
            r.c_l_beta,
            r.c_l_p,
            r.c_l_r,
            r.c_l_aileron,
            r.c_l_rudder,
            m.c_m_0,
            m.c_m_alpha,
            m.c_m_q,
            m.c_m_alphadot,
            m.c_m_elevator,
            m.c_m_flap,
            n.c_n_beta,
            n.c_n_p,
            n.c_n_r,
            n.c_n_aileron,
            n.c_n_rudder,
        ]
    }
}
