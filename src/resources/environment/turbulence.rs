use nalgebra::Vector3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, StandardNormal};

/// RMS gust velocity at full intensity (m/s).
const MAX_GUST_RMS: f64 = 3.0;
/// Gust correlation length (m).
const CORRELATION_LENGTH: f64 = 300.0;
/// Airspeed floor for the correlation time (m/s).
const MIN_CORRELATION_SPEED: f64 = 10.0;

/// Seeded first-order Gauss-Markov gust generator. The same seed and input
/// sequence always yield the same gusts.
#[derive(Debug, Clone)]
pub struct Turbulence {
    rng: ChaCha8Rng,
    gust: Vector3<f64>,
}

impl Turbulence {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            gust: Vector3::zeros(),
        }
    }

    /// Advances the gust process by `dt` and returns the new NED gust.
    /// Zero intensity decays any remaining gust without drawing samples.
    pub fn update(&mut self, dt: f64, airspeed: f64, intensity: f64) -> Vector3<f64> {
        let intensity = intensity.clamp(0.0, 1.0);
        let tau = CORRELATION_LENGTH / airspeed.abs().max(MIN_CORRELATION_SPEED);
        let decay = (-dt / tau).exp();

        if intensity <= 0.0 {
            self.gust *= decay;
            return self.gust;
        }

        let sigma = intensity * MAX_GUST_RMS;
        let drive = sigma * (1.0 - decay * decay).sqrt();
        let mut draw = || -> f64 { StandardNormal.sample(&mut self.rng) };
        // Vertical component at half the horizontal intensity
        let noise = Vector3::new(draw(), draw(), 0.5 * draw());
        self.gust = self.gust * decay + noise * drive;
        self.gust
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_gusts() {
        let mut a = Turbulence::new(7);
        let mut b = Turbulence::new(7);
        for _ in 0..100 {
            assert_eq!(a.update(0.01, 50.0, 0.6), b.update(0.01, 50.0, 0.6));
        }
    }

    #[test]
    fn test_calm_air_has_no_gusts() {
        let mut t = Turbulence::new(1);
        for _ in 0..100 {
            assert_eq!(t.update(0.01, 50.0, 0.0), Vector3::zeros());
        }
    }

    #[test]
    fn test_gust_level_bounded() {
        let mut t = Turbulence::new(42);
        let mut sum_sq = 0.0;
        let n = 20_000;
        for _ in 0..n {
            let g = t.update(0.05, 50.0, 1.0);
            sum_sq += g.x * g.x;
        }
        let rms = (sum_sq / n as f64).sqrt();
        assert!(rms > 1.0 && rms < 6.0, "rms {}", rms);
    }
}
