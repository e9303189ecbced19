use bevy::prelude::*;
use nalgebra::{SVector, Vector3};
use serde::{Deserialize, Serialize};

use crate::utils::{
    constants::MIN_AIRSPEED,
    math::{body_to_ned, canonical_euler, is_finite_vector, wrap_two_pi},
};

/// Number of integrated scalars in [`AircraftState`].
pub const STATE_SIZE: usize = 12;

pub type StateVector = SVector<f64, STATE_SIZE>;

/// Rigid-body state of the aircraft.
///
/// Layout of the packed state vector:
/// `[u, v, w, p, q, r, φ, θ, ψ, north, east, down]`.
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AircraftState {
    /// Body-axis velocity relative to the ground (m/s).
    pub velocity: Vector3<f64>,
    /// Body-axis angular rate p, q, r (rad/s).
    pub angular_rate: Vector3<f64>,
    /// Euler attitude roll, pitch, yaw (rad).
    pub attitude: Vector3<f64>,
    /// Position north, east, down relative to the run origin (m).
    pub position: Vector3<f64>,
}

impl Default for AircraftState {
    fn default() -> Self {
        Self {
            velocity: Vector3::zeros(),
            angular_rate: Vector3::zeros(),
            attitude: Vector3::zeros(),
            position: Vector3::zeros(),
        }
    }
}

impl AircraftState {
    /// Wings-level flight along `heading` with the body x-axis on the
    /// velocity vector.
    pub fn level_flight(airspeed: f64, altitude: f64, heading: f64) -> Self {
        Self {
            velocity: Vector3::new(airspeed, 0.0, 0.0),
            attitude: Vector3::new(0.0, 0.0, wrap_two_pi(heading)),
            position: Vector3::new(0.0, 0.0, -altitude),
            ..Default::default()
        }
    }

    /// Stationary on the ground at the given altitude.
    pub fn at_rest(altitude: f64, heading: f64) -> Self {
        Self::level_flight(0.0, altitude, heading)
    }

    pub fn to_vector(&self) -> StateVector {
        let mut x = StateVector::zeros();
        x.fixed_rows_mut::<3>(0).copy_from(&self.velocity);
        x.fixed_rows_mut::<3>(3).copy_from(&self.angular_rate);
        x.fixed_rows_mut::<3>(6).copy_from(&self.attitude);
        x.fixed_rows_mut::<3>(9).copy_from(&self.position);
        x
    }

    pub fn from_vector(x: &StateVector) -> Self {
        Self {
            velocity: x.fixed_rows::<3>(0).into_owned(),
            angular_rate: x.fixed_rows::<3>(3).into_owned(),
            attitude: x.fixed_rows::<3>(6).into_owned(),
            position: x.fixed_rows::<3>(9).into_owned(),
        }
    }

    /// Returns the state with its Euler angles in canonical range.
    pub fn normalized(mut self) -> Self {
        self.attitude = canonical_euler(self.attitude.x, self.attitude.y, self.attitude.z);
        self
    }

    pub fn roll(&self) -> f64 {
        self.attitude.x
    }

    pub fn pitch(&self) -> f64 {
        self.attitude.y
    }

    pub fn heading(&self) -> f64 {
        self.attitude.z
    }

    pub fn altitude(&self) -> f64 {
        -self.position.z
    }

    /// Body-to-NED direction cosine matrix for the current attitude.
    pub fn body_to_ned(&self) -> nalgebra::Matrix3<f64> {
        body_to_ned(self.attitude.x, self.attitude.y, self.attitude.z)
    }

    /// Velocity over the ground in the NED frame (m/s).
    pub fn ned_velocity(&self) -> Vector3<f64> {
        self.body_to_ned() * self.velocity
    }

    /// Speed relative to the ground (m/s).
    pub fn ground_speed(&self) -> f64 {
        self.velocity.norm()
    }

    /// Climb angle of the velocity vector above the horizon (rad).
    pub fn flight_path_angle(&self) -> f64 {
        let v = self.ned_velocity();
        let horizontal = v.x.hypot(v.y);
        if horizontal < MIN_AIRSPEED && v.z.abs() < MIN_AIRSPEED {
            0.0
        } else {
            (-v.z).atan2(horizontal)
        }
    }

    /// Direction of travel over the ground, [0, 2π). Falls back to the
    /// heading when not moving.
    pub fn ground_track(&self) -> f64 {
        let v = self.ned_velocity();
        if v.x.hypot(v.y) < MIN_AIRSPEED {
            self.heading()
        } else {
            wrap_two_pi(v.y.atan2(v.x))
        }
    }

    pub fn is_finite(&self) -> bool {
        is_finite_vector(&self.velocity)
            && is_finite_vector(&self.angular_rate)
            && is_finite_vector(&self.attitude)
            && is_finite_vector(&self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_vector_layout() {
        let state = AircraftState {
            velocity: Vector3::new(1.0, 2.0, 3.0),
            angular_rate: Vector3::new(4.0, 5.0, 6.0),
            attitude: Vector3::new(0.1, 0.2, 0.3),
            position: Vector3::new(10.0, 11.0, -12.0),
        };
        let x = state.to_vector();
        assert_eq!(x[0], 1.0);
        assert_eq!(x[5], 6.0);
        assert_eq!(x[8], 0.3);
        assert_eq!(x[11], -12.0);
        assert_eq!(AircraftState::from_vector(&x), state);
        assert_relative_eq!(state.altitude(), 12.0);
    }

    #[test]
    fn test_track_and_path_angle() {
        let mut state = AircraftState::level_flight(50.0, 1000.0, FRAC_PI_2);
        assert_relative_eq!(state.ground_track(), FRAC_PI_2, epsilon = 1e-12);
        assert_relative_eq!(state.flight_path_angle(), 0.0, epsilon = 1e-12);

        state.attitude.y = 0.1;
        assert_relative_eq!(state.flight_path_angle(), 0.1, epsilon = 1e-12);
    }
}
