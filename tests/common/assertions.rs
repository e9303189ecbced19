use approx::assert_relative_eq;
use flight6dof::{components::AircraftState, simulation::Snapshot};
use nalgebra::Vector3;
use std::f64::consts::{FRAC_PI_2, PI};

/// Assert that every state variable is finite
#[track_caller]
pub fn assert_state_finite(state: &AircraftState) {
    assert!(
        state.velocity.iter().all(|v| v.is_finite()),
        "Velocity is not finite: {:?}",
        state.velocity
    );
    assert!(
        state.angular_rate.iter().all(|v| v.is_finite()),
        "Angular rate is not finite: {:?}",
        state.angular_rate
    );
    assert!(
        state.attitude.iter().all(|v| v.is_finite()),
        "Attitude is not finite: {:?}",
        state.attitude
    );
    assert!(
        state.position.iter().all(|v| v.is_finite()),
        "Position is not finite: {:?}",
        state.position
    );
}

/// Assert that a published snapshot is fully formed
#[track_caller]
pub fn assert_snapshot_finite(snapshot: &Snapshot) {
    assert_state_finite(&snapshot.state);
    assert!(snapshot.time.is_finite() && snapshot.time >= 0.0);
    assert!(snapshot.environment.is_finite());
    for (key, value, _) in snapshot.flight_data.entries() {
        assert!(value.is_finite(), "{:?} is not finite", key);
    }
}

/// Roll in [-π, π), pitch in [-π/2, π/2], heading in [0, 2π)
#[track_caller]
pub fn assert_canonical_attitude(state: &AircraftState) {
    let (roll, pitch, heading) = (state.roll(), state.pitch(), state.heading());
    assert!((-PI..PI).contains(&roll), "Roll {} outside [-π, π)", roll);
    assert!(
        (-FRAC_PI_2..=FRAC_PI_2).contains(&pitch),
        "Pitch {} outside [-π/2, π/2]",
        pitch
    );
    assert!(
        (0.0..2.0 * PI).contains(&heading),
        "Heading {} outside [0, 2π)",
        heading
    );
}

/// Assert that two vectors are approximately equal
#[track_caller]
pub fn assert_vector_eq(actual: &Vector3<f64>, expected: &Vector3<f64>, epsilon: f64) {
    assert_relative_eq!(actual.x, expected.x, epsilon = epsilon);
    assert_relative_eq!(actual.y, expected.y, epsilon = epsilon);
    assert_relative_eq!(actual.z, expected.z, epsilon = epsilon);
}
