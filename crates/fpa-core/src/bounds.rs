//! Box bounds and the bound projector.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{FpaError, FpaResult};

/// Independent per-coordinate `[min, max]` limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    min: Vec<f64>,
    max: Vec<f64>,
}

impl Bounds {
    /// Validate and build bounds from parallel lower/upper vectors.
    pub fn new(min: Vec<f64>, max: Vec<f64>) -> FpaResult<Self> {
        if min.is_empty() {
            return Err(FpaError::invalid("bounds must have at least one dimension"));
        }
        if min.len() != max.len() {
            return Err(FpaError::invalid(format!(
                "lower bounds have {} entries but upper bounds have {}",
                min.len(),
                max.len()
            )));
        }
        for (j, (lo, hi)) in min.iter().zip(&max).enumerate() {
            if !lo.is_finite() || !hi.is_finite() {
                return Err(FpaError::invalid(format!(
                    "bounds for dimension {j} must be finite, got [{lo}, {hi}]"
                )));
            }
            if lo > hi {
                return Err(FpaError::invalid(format!(
                    "lower bound {lo} exceeds upper bound {hi} in dimension {j}"
                )));
            }
        }
        Ok(Self { min, max })
    }

    /// Same `[lo, hi]` interval for each of `dims` coordinates.
    pub fn uniform(dims: usize, lo: f64, hi: f64) -> FpaResult<Self> {
        Self::new(vec![lo; dims], vec![hi; dims])
    }

    pub fn dims(&self) -> usize {
        self.min.len()
    }

    pub fn min(&self) -> &[f64] {
        &self.min
    }

    pub fn max(&self) -> &[f64] {
        &self.max
    }

    pub fn contains(&self, x: &[f64]) -> bool {
        x.len() == self.dims()
            && x
                .iter()
                .zip(self.min.iter().zip(&self.max))
                .all(|(v, (lo, hi))| *v >= *lo && *v <= *hi)
    }

    /// Clamp every coordinate of `x` into its own interval, in place.
    ///
    /// Total: a NaN coordinate lands on its lower bound.
    pub fn project(&self, x: &mut [f64]) {
        for (v, (lo, hi)) in x.iter_mut().zip(self.min.iter().zip(&self.max)) {
            *v = v.max(*lo).min(*hi);
        }
    }

    /// Draw a point uniformly from the box.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<f64> {
        self.min
            .iter()
            .zip(&self.max)
            .map(|(lo, hi)| if lo == hi { *lo } else { rng.gen_range(*lo..=*hi) })
            .collect()
    }
}

/// Clamp `x` element-wise into `[min[j], max[j]]`, returning a new vector.
pub fn project(x: &[f64], min: &[f64], max: &[f64]) -> Vec<f64> {
    x.iter()
        .zip(min.iter().zip(max))
        .map(|(v, (lo, hi))| v.max(*lo).min(*hi))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn rejects_malformed_bounds() {
        assert!(Bounds::new(vec![], vec![]).is_err());
        assert!(Bounds::new(vec![0.0], vec![1.0, 2.0]).is_err());
        assert!(Bounds::new(vec![0.0, 2.0], vec![1.0, 1.0]).is_err());
        assert!(Bounds::new(vec![f64::NEG_INFINITY], vec![1.0]).is_err());
        assert!(Bounds::new(vec![0.5], vec![0.5]).is_ok());
    }

    #[test]
    fn project_clamps_each_coordinate_independently() {
        let bounds = Bounds::new(vec![-1.0, 0.0, 2.0], vec![1.0, 0.5, 3.0]).unwrap();
        let mut x = vec![-5.0, 0.25, 10.0];
        bounds.project(&mut x);
        assert_eq!(x, vec![-1.0, 0.25, 3.0]);
        assert!(bounds.contains(&x));
    }

    #[test]
    fn project_sends_nan_to_lower_bound() {
        assert_eq!(project(&[f64::NAN], &[0.2], &[0.8]), vec![0.2]);
    }

    #[test]
    fn samples_stay_inside_box() {
        let bounds = Bounds::new(vec![-1.0, 4.0, 0.0], vec![1.0, 4.0, 1e-9]).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..1_000 {
            let x = bounds.sample(&mut rng);
            assert!(bounds.contains(&x), "{x:?}");
            assert_eq!(x[1], 4.0);
        }
    }
}
