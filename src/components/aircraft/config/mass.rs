use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

/// Mass and inertia of the airframe. The inertia tensor assumes a lateral
/// plane of symmetry, so the only product of inertia is `ixz`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MassModel {
    /// Total mass of the aircraft (kg).
    pub mass: f64,
    /// Roll moment of inertia (kg·m²).
    pub ixx: f64,
    /// Pitch moment of inertia (kg·m²).
    pub iyy: f64,
    /// Yaw moment of inertia (kg·m²).
    pub izz: f64,
    /// Product of inertia between the x and z axes (kg·m²).
    pub ixz: f64,
}

impl MassModel {
    pub fn new(mass: f64, ixx: f64, iyy: f64, izz: f64, ixz: f64) -> Self {
        Self {
            mass,
            ixx,
            iyy,
            izz,
            ixz,
        }
    }

    pub fn light_single() -> Self {
        Self::new(1043.0, 1285.3, 1824.9, 2666.9, 0.0)
    }

    pub fn inertia(&self) -> Matrix3<f64> {
        Matrix3::from_columns(&[
            Vector3::new(self.ixx, 0.0, -self.ixz),
            Vector3::new(0.0, self.iyy, 0.0),
            Vector3::new(-self.ixz, 0.0, self.izz),
        ])
    }

    /// Closed-form inverse of [`MassModel::inertia`].
    pub fn inertia_inv(&self) -> Matrix3<f64> {
        let gamma = self.ixx * self.izz - self.ixz * self.ixz;
        Matrix3::from_columns(&[
            Vector3::new(self.izz / gamma, 0.0, self.ixz / gamma),
            Vector3::new(0.0, 1.0 / self.iyy, 0.0),
            Vector3::new(self.ixz / gamma, 0.0, self.ixx / gamma),
        ])
    }

    /// Positive mass and a positive-definite inertia tensor.
    pub fn is_valid(&self) -> bool {
        let all_finite = [self.mass, self.ixx, self.iyy, self.izz, self.ixz]
            .iter()
            .all(|v| v.is_finite());
        all_finite
            && self.mass > 0.0
            && self.ixx > 0.0
            && self.iyy > 0.0
            && self.izz > 0.0
            && self.ixx * self.izz - self.ixz * self.ixz > 0.0
    }
}

impl Default for MassModel {
    fn default() -> Self {
        Self::light_single()
    }
}
