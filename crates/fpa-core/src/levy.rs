//! Mantegna-style Lévy flight step generator.
//!
//! ```text
//! σ = ( Γ(1+β)·sin(πβ/2) / ( Γ((1+β)/2)·β·2^((β−1)/2) ) )^(1/β)
//! L = 0.01 · r₁ · σ / |r₂|^(1/β)        r₁, r₂ ~ U(0,1)
//! ```
//!
//! `r₂` is drawn from the open interval (0, 1), so `L` is always finite. Draws
//! of `r₂` close to zero produce very long steps; that heavy tail is what makes
//! the global pollination move explore, and the bound projector absorbs it.

use std::f64::consts::PI;

use rand::distributions::Open01;
use rand::Rng;
use statrs::function::gamma::gamma;

use crate::error::{FpaError, FpaResult};

/// Scale applied to every step, as in the classic FPA formulation.
const STEP_SCALE: f64 = 0.01;

/// Lévy step generator for a fixed stability exponent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevyFlight {
    beta: f64,
    sigma: f64,
}

impl LevyFlight {
    /// Build a generator for `beta ∈ (0, 2]`.
    pub fn new(beta: f64) -> FpaResult<Self> {
        if !(beta > 0.0 && beta <= 2.0) {
            return Err(FpaError::invalid(format!(
                "Lévy exponent must be in (0, 2], got {beta}"
            )));
        }
        Ok(Self {
            beta,
            sigma: mantegna_sigma(beta),
        })
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Draw one step length. Consumes exactly two values from `rng`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let r1: f64 = rng.gen();
        let r2: f64 = rng.sample(Open01);
        (STEP_SCALE * r1 * self.sigma) / r2.abs().powf(1.0 / self.beta)
    }
}

fn mantegna_sigma(beta: f64) -> f64 {
    let numerator = gamma(1.0 + beta) * (PI * beta / 2.0).sin();
    let denominator = gamma((1.0 + beta) / 2.0) * beta * 2f64.powf((beta - 1.0) / 2.0);
    (numerator / denominator).powf(1.0 / beta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn sigma_matches_reference_value_for_three_halves() {
        let levy = LevyFlight::new(1.5).unwrap();
        assert!((levy.sigma() - 0.696_6).abs() < 1e-3, "sigma = {}", levy.sigma());
    }

    #[test]
    fn rejects_exponent_outside_range() {
        assert!(LevyFlight::new(0.0).is_err());
        assert!(LevyFlight::new(-1.0).is_err());
        assert!(LevyFlight::new(2.5).is_err());
        assert!(LevyFlight::new(f64::NAN).is_err());
        assert!(LevyFlight::new(2.0).is_ok());
    }

    #[test]
    fn samples_are_finite_and_non_negative() {
        let levy = LevyFlight::new(1.5).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..100_000 {
            let step = levy.sample(&mut rng);
            assert!(step.is_finite(), "non-finite step {step}");
            assert!(step >= 0.0, "negative step {step}");
        }
    }

    #[test]
    fn same_seed_same_steps() {
        let levy = LevyFlight::new(1.2).unwrap();
        let mut a = StdRng::seed_from_u64(5);
        let mut b = StdRng::seed_from_u64(5);
        let xs: Vec<f64> = (0..32).map(|_| levy.sample(&mut a)).collect();
        let ys: Vec<f64> = (0..32).map(|_| levy.sample(&mut b)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn median_step_is_small() {
        // The bulk of the distribution sits near 0.01·σ; only the tail is long.
        let levy = LevyFlight::new(1.5).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let mut steps: Vec<f64> = (0..10_001).map(|_| levy.sample(&mut rng)).collect();
        steps.sort_by(|a, b| a.total_cmp(b));
        let median = steps[steps.len() / 2];
        assert!(median < 0.1, "median = {median}");
    }
}
