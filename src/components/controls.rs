use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::utils::constants::MAX_ENGINES;

/// Lever positions for one engine, each normalized to [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineControls {
    pub throttle: f64,
    /// 1 is full rich.
    pub mixture: f64,
    /// 1 is fine pitch / maximum governed RPM.
    pub prop_pitch: f64,
}

impl Default for EngineControls {
    fn default() -> Self {
        Self {
            throttle: 0.0,
            mixture: 1.0,
            prop_pitch: 1.0,
        }
    }
}

/// Pilot or autopilot command vector for one step.
///
/// Primary surfaces are normalized to [-1, 1] and scaled by the airframe's
/// control limits; everything else is normalized to [0, 1].
#[derive(Component, Resource, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlInputs {
    /// Positive is trailing edge down (nose-down pitching moment).
    pub elevator: f64,
    /// Positive rolls right.
    pub aileron: f64,
    /// Positive yaws left (trailing edge left).
    pub rudder: f64,
    pub flaps: f64,
    /// 1 is fully extended.
    pub gear: f64,
    pub brakes: f64,
    pub engines: [EngineControls; MAX_ENGINES],
}

impl Default for ControlInputs {
    fn default() -> Self {
        Self {
            elevator: 0.0,
            aileron: 0.0,
            rudder: 0.0,
            flaps: 0.0,
            gear: 1.0,
            brakes: 0.0,
            engines: [EngineControls::default(); MAX_ENGINES],
        }
    }
}

/// The closed set of control axes an input source may drive. Engine levers
/// carry the engine index, which must be below [`MAX_ENGINES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlAxis {
    Elevator,
    Aileron,
    Rudder,
    Flaps,
    Gear,
    Brakes,
    Throttle(usize),
    Mixture(usize),
    PropPitch(usize),
}

impl ControlAxis {
    /// Every axis, engine levers included.
    pub fn all() -> impl Iterator<Item = ControlAxis> {
        [
            ControlAxis::Elevator,
            ControlAxis::Aileron,
            ControlAxis::Rudder,
            ControlAxis::Flaps,
            ControlAxis::Gear,
            ControlAxis::Brakes,
        ]
        .into_iter()
        .chain((0..MAX_ENGINES).flat_map(|i| {
            [
                ControlAxis::Throttle(i),
                ControlAxis::Mixture(i),
                ControlAxis::PropPitch(i),
            ]
        }))
    }

    /// Allowed range for the axis.
    pub fn range(&self) -> (f64, f64) {
        match self {
            ControlAxis::Elevator | ControlAxis::Aileron | ControlAxis::Rudder => (-1.0, 1.0),
            _ => (0.0, 1.0),
        }
    }

    /// Primary flight controls return to neutral when not commanded; levers,
    /// flaps, gear and brakes stay where they were last set.
    pub fn holds_last_value(&self) -> bool {
        !matches!(
            self,
            ControlAxis::Elevator | ControlAxis::Aileron | ControlAxis::Rudder
        )
    }

    fn engine_index(&self) -> Option<usize> {
        match self {
            ControlAxis::Throttle(i) | ControlAxis::Mixture(i) | ControlAxis::PropPitch(i) => {
                Some(*i)
            }
            _ => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.engine_index().map_or(true, |i| i < MAX_ENGINES)
    }
}

impl ControlInputs {
    /// Builds a command vector from a partial axis mapping. Axes not present
    /// follow [`ControlAxis::holds_last_value`]: held from `previous` or
    /// reset to neutral. Out-of-range values are clamped; non-finite values
    /// and unknown engine indices are ignored.
    pub fn from_axis_values<I>(values: I, previous: &ControlInputs) -> Self
    where
        I: IntoIterator<Item = (ControlAxis, f64)>,
    {
        let mut inputs = *previous;
        inputs.elevator = 0.0;
        inputs.aileron = 0.0;
        inputs.rudder = 0.0;
        for (axis, value) in values {
            inputs.set(axis, value);
        }
        inputs
    }

    /// Sets one axis, clamped to its range. Returns false when the value
    /// was rejected.
    pub fn set(&mut self, axis: ControlAxis, value: f64) -> bool {
        if !value.is_finite() || !axis.is_valid() {
            return false;
        }
        let (lo, hi) = axis.range();
        let value = value.clamp(lo, hi);
        match axis {
            ControlAxis::Elevator => self.elevator = value,
            ControlAxis::Aileron => self.aileron = value,
            ControlAxis::Rudder => self.rudder = value,
            ControlAxis::Flaps => self.flaps = value,
            ControlAxis::Gear => self.gear = value,
            ControlAxis::Brakes => self.brakes = value,
            ControlAxis::Throttle(i) => self.engines[i].throttle = value,
            ControlAxis::Mixture(i) => self.engines[i].mixture = value,
            ControlAxis::PropPitch(i) => self.engines[i].prop_pitch = value,
        }
        true
    }

    pub fn get(&self, axis: ControlAxis) -> Option<f64> {
        if !axis.is_valid() {
            return None;
        }
        Some(match axis {
            ControlAxis::Elevator => self.elevator,
            ControlAxis::Aileron => self.aileron,
            ControlAxis::Rudder => self.rudder,
            ControlAxis::Flaps => self.flaps,
            ControlAxis::Gear => self.gear,
            ControlAxis::Brakes => self.brakes,
            ControlAxis::Throttle(i) => self.engines[i].throttle,
            ControlAxis::Mixture(i) => self.engines[i].mixture,
            ControlAxis::PropPitch(i) => self.engines[i].prop_pitch,
        })
    }

    /// Sets the throttle of every engine.
    pub fn with_throttle(mut self, throttle: f64) -> Self {
        for i in 0..MAX_ENGINES {
            self.set(ControlAxis::Throttle(i), throttle);
        }
        self
    }

    /// Clamps every axis into range, replacing non-finite values with the
    /// default position.
    pub fn sanitized(&self) -> Self {
        let defaults = ControlInputs::default();
        let mut out = defaults;
        for axis in ControlAxis::all() {
            if let Some(value) = self.get(axis) {
                out.set(axis, value);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_default_policy() {
        let mut previous = ControlInputs::default().with_throttle(0.7);
        previous.elevator = -0.3;
        previous.flaps = 0.5;

        let next = ControlInputs::from_axis_values([(ControlAxis::Aileron, 0.2)], &previous);
        assert_eq!(next.elevator, 0.0);
        assert_eq!(next.aileron, 0.2);
        assert_eq!(next.flaps, 0.5);
        assert_eq!(next.engines[0].throttle, 0.7);
    }

    #[test]
    fn test_values_clamped_and_rejected() {
        let inputs = ControlInputs::from_axis_values(
            [
                (ControlAxis::Elevator, 3.0),
                (ControlAxis::Throttle(1), -2.0),
                (ControlAxis::Rudder, f64::NAN),
                (ControlAxis::Mixture(MAX_ENGINES), 0.1),
            ],
            &ControlInputs::default(),
        );
        assert_eq!(inputs.elevator, 1.0);
        assert_eq!(inputs.engines[1].throttle, 0.0);
        assert_eq!(inputs.rudder, 0.0);
        assert_eq!(inputs.get(ControlAxis::Mixture(MAX_ENGINES)), None);
    }

    #[test]
    fn test_axis_set_is_closed() {
        assert_eq!(ControlAxis::all().count(), 6 + 3 * MAX_ENGINES);
        assert!(ControlAxis::all().all(|a| a.is_valid()));
    }

    #[test]
    fn test_sanitized_replaces_nan() {
        let mut inputs = ControlInputs::default();
        inputs.aileron = f64::NAN;
        inputs.flaps = 4.0;
        let clean = inputs.sanitized();
        assert_eq!(clean.aileron, 0.0);
        assert_eq!(clean.flaps, 1.0);
    }
}
