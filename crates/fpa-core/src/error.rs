//! Error types for the FPA optimizer.
//!
//! Configuration problems are reported before the objective is called for the
//! first time. Objective failures abort the run and carry the phase and
//! candidate index at which they happened.

use std::fmt;
use thiserror::Error;

/// Error returned by an [`Objective`](crate::Objective) evaluation.
pub type ObjectiveError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Where in the run an objective evaluation happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Evaluation of the random initial population.
    Initialization,
    /// Pollination sweep (zero-based).
    Sweep(usize),
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Initialization => write!(f, "initialization"),
            Phase::Sweep(sweep) => write!(f, "sweep {}", sweep + 1),
        }
    }
}

/// Errors produced by the optimizer.
#[derive(Debug, Error)]
pub enum FpaError {
    /// Bounds or algorithm parameters are malformed.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The objective itself failed; the population is left partially updated.
    #[error("Objective failed during {phase} at flower {index}: {source}")]
    ObjectiveFault {
        phase: Phase,
        index: usize,
        #[source]
        source: ObjectiveError,
    },

    /// The objective returned NaN or an infinity that is not the rejection sentinel.
    #[error("Objective returned non-finite fitness {value} during {phase} at flower {index}")]
    NonFiniteFitness {
        phase: Phase,
        index: usize,
        value: f64,
    },
}

impl FpaError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        FpaError::InvalidConfiguration(msg.into())
    }

    /// Phase and flower index of an objective failure, if this is one.
    pub fn location(&self) -> Option<(Phase, usize)> {
        match self {
            FpaError::InvalidConfiguration(_) => None,
            FpaError::ObjectiveFault { phase, index, .. }
            | FpaError::NonFiniteFitness { phase, index, .. } => Some((*phase, *index)),
        }
    }
}

/// Convenience alias for optimizer results.
pub type FpaResult<T> = Result<T, FpaError>;
