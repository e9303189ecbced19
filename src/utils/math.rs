use nalgebra::{Matrix3, Vector3};
use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// Wraps an angle into [-π, π).
///
/// Values already inside the range are returned untouched, so the wrap is
/// idempotent bit-for-bit.
pub fn wrap_pi(angle: f64) -> f64 {
    if (-PI..PI).contains(&angle) || !angle.is_finite() {
        return angle;
    }
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    // rem_euclid can round up to exactly TAU
    if wrapped >= PI {
        -PI
    } else {
        wrapped
    }
}

/// Wraps an angle into [0, 2π).
pub fn wrap_two_pi(angle: f64) -> f64 {
    if (0.0..TAU).contains(&angle) || !angle.is_finite() {
        return angle;
    }
    let wrapped = angle.rem_euclid(TAU);
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Brings (φ, θ, ψ) into the canonical Euler range: θ ∈ [-π/2, π/2],
/// φ ∈ [-π, π), ψ ∈ [0, 2π). A pitch beyond the vertical is folded back and
/// the roll/yaw shifted by π, which describes the same orientation.
pub fn canonical_euler(roll: f64, pitch: f64, yaw: f64) -> Vector3<f64> {
    let mut roll = roll;
    let mut yaw = yaw;
    let mut pitch = wrap_pi(pitch);
    if pitch > FRAC_PI_2 {
        pitch = PI - pitch;
        roll += PI;
        yaw += PI;
    } else if pitch < -FRAC_PI_2 {
        pitch = -PI - pitch;
        roll += PI;
        yaw += PI;
    }
    Vector3::new(wrap_pi(roll), pitch, wrap_two_pi(yaw))
}

/// Direction cosine matrix rotating body-axis vectors into the NED frame
/// (3-2-1 yaw, pitch, roll sequence).
pub fn body_to_ned(roll: f64, pitch: f64, yaw: f64) -> Matrix3<f64> {
    let (sphi, cphi) = roll.sin_cos();
    let (sth, cth) = pitch.sin_cos();
    let (spsi, cpsi) = yaw.sin_cos();

    Matrix3::new(
        cth * cpsi,
        sphi * sth * cpsi - cphi * spsi,
        cphi * sth * cpsi + sphi * spsi,
        cth * spsi,
        sphi * sth * spsi + cphi * cpsi,
        cphi * sth * spsi - sphi * cpsi,
        -sth,
        sphi * cth,
        cphi * cth,
    )
}

/// Resolves a NED vector into body axes (transpose of [`body_to_ned`]).
pub fn ned_to_body(roll: f64, pitch: f64, yaw: f64, v_ned: &Vector3<f64>) -> Vector3<f64> {
    body_to_ned(roll, pitch, yaw).transpose() * v_ned
}

pub fn is_finite_vector(v: &Vector3<f64>) -> bool {
    v.iter().all(|x| x.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_wrap_pi_is_idempotent() {
        let samples = [
            0.0, 1.0, -1.0, PI, -PI, 3.5, -3.5, 7.0 * PI, -7.0 * PI, 1.0e6, -1.0e6, 123.456,
            TAU, -TAU, PI - 1e-15, 1e-300,
        ];
        for &angle in &samples {
            let once = wrap_pi(angle);
            let twice = wrap_pi(once);
            assert_eq!(once.to_bits(), twice.to_bits(), "angle {}", angle);
            assert!((-PI..PI).contains(&once), "angle {} wrapped to {}", angle, once);
        }
    }

    #[test]
    fn test_wrap_two_pi_is_idempotent() {
        let samples = [0.0, -1e-18, -0.5, TAU, 3.0 * TAU + 0.25, -1.0e5, 9.99e7];
        for &angle in &samples {
            let once = wrap_two_pi(angle);
            assert_eq!(once.to_bits(), wrap_two_pi(once).to_bits());
            assert!((0.0..TAU).contains(&once));
        }
    }

    #[test]
    fn test_canonical_euler_folds_pitch() {
        let folded = canonical_euler(0.0, 100f64.to_radians(), 0.0);
        assert_relative_eq!(folded.y, 80f64.to_radians(), epsilon = 1e-12);
        assert_relative_eq!(folded.x, -PI, epsilon = 1e-12);
        assert_relative_eq!(folded.z, PI, epsilon = 1e-12);

        // Same orientation either way
        let a = body_to_ned(0.0, 100f64.to_radians(), 0.0);
        let b = body_to_ned(folded.x, folded.y, folded.z);
        assert_relative_eq!(a, b, epsilon = 1e-12);

        let again = canonical_euler(folded.x, folded.y, folded.z);
        assert_eq!(folded, again);
    }

    #[test]
    fn test_dcm_is_orthonormal() {
        let dcm = body_to_ned(0.3, -0.2, 2.1);
        assert_relative_eq!(dcm * dcm.transpose(), Matrix3::identity(), epsilon = 1e-12);
        assert_relative_eq!(dcm.determinant(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_ned_to_body_level_gravity() {
        let g = ned_to_body(0.0, 0.0, 1.2, &Vector3::new(0.0, 0.0, GRAVITY_TEST));
        assert_relative_eq!(g, Vector3::new(0.0, 0.0, GRAVITY_TEST), epsilon = 1e-12);

        // Nose up: gravity picks up a rearward component
        let g = ned_to_body(0.0, 0.1, 0.0, &Vector3::new(0.0, 0.0, GRAVITY_TEST));
        assert!(g.x < 0.0);
    }

    const GRAVITY_TEST: f64 = 9.80665;
}
