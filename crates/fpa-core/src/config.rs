use serde::{Deserialize, Serialize};

use crate::error::{FpaError, FpaResult};

/// Default fitness used by objectives to reject a candidate.
pub const DEFAULT_REJECTION_SENTINEL: f64 = 1e9;

/// FPA run parameters.
///
/// Defaults follow the usual FPA settings: 100 flowers, 100 sweeps,
/// `gamma = 0.1`, `lambda = 1.5`, switch probability `0.75`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FpaConfig {
    /// Population size (at least 3).
    pub flowers: usize,
    /// Number of pollination sweeps over the whole population.
    pub iterations: usize,
    /// Step scale of the global pollination move.
    pub gamma: f64,
    /// Lévy stability exponent, in (0, 2].
    pub lambda: f64,
    /// Probability of a global move, in [0, 1].
    pub switch_probability: f64,
    /// Fitness that marks a rejected candidate. Compared like any other value.
    pub rejection_sentinel: f64,
    /// Seed for the run's `StdRng`; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for FpaConfig {
    fn default() -> Self {
        Self {
            flowers: 100,
            iterations: 100,
            gamma: 0.1,
            lambda: 1.5,
            switch_probability: 0.75,
            rejection_sentinel: DEFAULT_REJECTION_SENTINEL,
            seed: None,
        }
    }
}

impl FpaConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flowers(mut self, flowers: usize) -> Self {
        self.flowers = flowers;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    pub fn with_lambda(mut self, lambda: f64) -> Self {
        self.lambda = lambda;
        self
    }

    pub fn with_switch_probability(mut self, p: f64) -> Self {
        self.switch_probability = p;
        self
    }

    pub fn with_rejection_sentinel(mut self, sentinel: f64) -> Self {
        self.rejection_sentinel = sentinel;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check every parameter. Called before any objective evaluation.
    pub fn validate(&self) -> FpaResult<()> {
        if self.flowers < 3 {
            return Err(FpaError::invalid(format!(
                "flowers must be >= 3 so local pollination can pick two distinct flowers, got {}",
                self.flowers
            )));
        }
        if !(0.0..=1.0).contains(&self.switch_probability) {
            return Err(FpaError::invalid(format!(
                "switch probability must be in [0, 1], got {}",
                self.switch_probability
            )));
        }
        if !(self.lambda > 0.0 && self.lambda <= 2.0) {
            return Err(FpaError::invalid(format!(
                "lambda must be in (0, 2], got {}",
                self.lambda
            )));
        }
        if !self.gamma.is_finite() {
            return Err(FpaError::invalid(format!(
                "gamma must be finite, got {}",
                self.gamma
            )));
        }
        if self.rejection_sentinel.is_nan() {
            return Err(FpaError::invalid("rejection sentinel must not be NaN"));
        }
        Ok(())
    }
}
