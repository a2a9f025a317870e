//! The objective contract consumed by the optimizer.

use crate::error::{FpaError, FpaResult, ObjectiveError, Phase};

/// Scalar fitness over a decision vector; lower is better.
///
/// Implementations may be expensive and stateful (an external simulation with
/// temporary files, for example). The optimizer calls `evaluate` strictly
/// sequentially and never retries a failed call.
pub trait Objective {
    fn evaluate(&mut self, x: &[f64]) -> Result<f64, ObjectiveError>;
}

impl<F> Objective for F
where
    F: FnMut(&[f64]) -> f64,
{
    fn evaluate(&mut self, x: &[f64]) -> Result<f64, ObjectiveError> {
        Ok(self(x))
    }
}

/// Adapter for closures that can fail.
///
/// ```
/// use fpa_core::{Fallible, Objective};
///
/// let mut objective = Fallible(|x: &[f64]| -> Result<f64, std::io::Error> { Ok(x[0]) });
/// assert_eq!(objective.evaluate(&[2.0]).unwrap(), 2.0);
/// ```
pub struct Fallible<F>(pub F);

impl<F, E> Objective for Fallible<F>
where
    F: FnMut(&[f64]) -> Result<f64, E>,
    E: Into<ObjectiveError>,
{
    fn evaluate(&mut self, x: &[f64]) -> Result<f64, ObjectiveError> {
        (self.0)(x).map_err(Into::into)
    }
}

/// Evaluate `x` and attach run context to any failure.
///
/// The rejection sentinel is accepted as-is even when it is infinite; any
/// other NaN or infinity is a fault.
pub(crate) fn evaluate_checked<O: Objective + ?Sized>(
    objective: &mut O,
    x: &[f64],
    phase: Phase,
    index: usize,
    rejection_sentinel: f64,
) -> FpaResult<f64> {
    let value = objective
        .evaluate(x)
        .map_err(|source| FpaError::ObjectiveFault {
            phase,
            index,
            source,
        })?;
    if value.is_finite() || value == rejection_sentinel {
        Ok(value)
    } else {
        Err(FpaError::NonFiniteFitness {
            phase,
            index,
            value,
        })
    }
}
