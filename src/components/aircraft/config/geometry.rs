use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Configuration for the geometry of an aircraft.
///
/// Reference points are body-axis offsets (x forward, y right, z down, m)
/// from an arbitrary airframe datum; only differences between them matter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AircraftGeometry {
    /// The total wing area of the aircraft (m²).
    pub wing_area: f64,
    /// The wingspan of the aircraft (m).
    pub wing_span: f64,
    /// The mean aerodynamic chord of the aircraft (m).
    pub mac: f64,
    /// Center of gravity.
    pub cg_position: Vector3<f64>,
    /// Point the aerodynamic coefficients are referenced to.
    pub ac_position: Vector3<f64>,
    /// Distance from the c.g. down to the wheel contact plane (m).
    pub gear_height: f64,
    /// Full-scale control surface travel.
    pub control_limits: ControlLimits,
}

/// Maximum surface deflections (rad) that normalized inputs of ±1 map onto.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlLimits {
    pub elevator: f64,
    pub aileron: f64,
    pub rudder: f64,
    pub flap: f64,
}

impl Default for ControlLimits {
    fn default() -> Self {
        Self {
            elevator: 25f64.to_radians(),
            aileron: 20f64.to_radians(),
            rudder: 16f64.to_radians(),
            flap: 30f64.to_radians(),
        }
    }
}

impl AircraftGeometry {
    /// Creates a geometry with coincident c.g. and aerodynamic center.
    ///
    /// # Arguments
    /// * `wing_area` - The total wing area of the aircraft (m²).
    /// * `wing_span` - The wing span of the aircraft (m).
    /// * `mac` - The mean aerodynamic chord (m).
    pub fn new(wing_area: f64, wing_span: f64, mac: f64) -> Self {
        Self {
            wing_area,
            wing_span,
            mac,
            cg_position: Vector3::zeros(),
            ac_position: Vector3::zeros(),
            gear_height: 1.0,
            control_limits: ControlLimits::default(),
        }
    }

    pub fn light_single() -> Self {
        Self {
            gear_height: 1.2,
            ..Self::new(16.2, 10.9, 1.49)
        }
    }

    /// Moment arm from the c.g. to the aerodynamic center.
    pub fn ac_arm(&self) -> Vector3<f64> {
        self.ac_position - self.cg_position
    }

    pub fn is_valid(&self) -> bool {
        let lengths = [self.wing_area, self.wing_span, self.mac];
        lengths.iter().all(|v| v.is_finite() && *v > 0.0)
            && self.cg_position.iter().all(|v| v.is_finite())
            && self.ac_position.iter().all(|v| v.is_finite())
            && self.gear_height.is_finite()
            && self.gear_height >= 0.0
    }
}

impl Default for AircraftGeometry {
    fn default() -> Self {
        Self::light_single()
    }
}
