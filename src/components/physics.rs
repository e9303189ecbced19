use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::utils::math::is_finite_vector;

/// Sources of external load on the airframe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ForceCategory {
    Aerodynamic,
    Propulsive,
    Gravitational,
    Ground,
    External,
}

impl ForceCategory {
    pub const COUNT: usize = 5;

    pub const ALL: [ForceCategory; Self::COUNT] = [
        ForceCategory::Aerodynamic,
        ForceCategory::Propulsive,
        ForceCategory::Gravitational,
        ForceCategory::Ground,
        ForceCategory::External,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// Force and moment about the c.g., both in body axes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Wrench {
    pub force: Vector3<f64>,
    pub moment: Vector3<f64>,
}

impl Wrench {
    pub fn new(force: Vector3<f64>, moment: Vector3<f64>) -> Self {
        Self { force, moment }
    }

    /// A force applied at `arm` from the c.g.
    pub fn from_force_at(force: Vector3<f64>, arm: &Vector3<f64>) -> Self {
        Self {
            force,
            moment: arm.cross(&force),
        }
    }

    pub fn is_finite(&self) -> bool {
        is_finite_vector(&self.force) && is_finite_vector(&self.moment)
    }
}

impl std::ops::Add for Wrench {
    type Output = Wrench;

    fn add(self, rhs: Wrench) -> Wrench {
        Wrench::new(self.force + rhs.force, self.moment + rhs.moment)
    }
}

impl std::ops::AddAssign for Wrench {
    fn add_assign(&mut self, rhs: Wrench) {
        self.force += rhs.force;
        self.moment += rhs.moment;
    }
}

/// Per-category load breakdown for one step.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ForceAccumulator {
    contributions: [Wrench; ForceCategory::COUNT],
}

impl ForceAccumulator {
    pub fn add(&mut self, category: ForceCategory, wrench: Wrench) {
        self.contributions[category.index()] += wrench;
    }

    pub fn get(&self, category: ForceCategory) -> Wrench {
        self.contributions[category.index()]
    }

    /// Sum over the given categories.
    pub fn sum_of(&self, categories: &[ForceCategory]) -> Wrench {
        categories
            .iter()
            .fold(Wrench::default(), |acc, c| acc + self.get(*c))
    }

    pub fn net(&self) -> Wrench {
        self.sum_of(&ForceCategory::ALL)
    }
}
