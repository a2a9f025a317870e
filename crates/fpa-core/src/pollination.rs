//! One pollination step for a single flower.
//!
//! ```text
//! global (r < p):  x = xᵢ + γ · L · (g* − xᵢ)        L ~ Lévy(λ), one draw per call
//! local  (r ≥ p):  x = xᵢ + ε · (xₐ − x_b)           ε ~ U(0,1), a ≠ b
//! ```
//!
//! The candidate is projected into the bounds, evaluated, and replaces flower
//! `i` only if strictly better. Flowers are swept in index order, so a global
//! best found by flower `i` already attracts flower `i + 1` in the same sweep.

use rand::seq::index;
use rand::Rng;

use crate::bounds::Bounds;
use crate::error::{FpaResult, Phase};
use crate::levy::LevyFlight;
use crate::objective::{evaluate_checked, Objective};
use crate::population::Population;

/// Which move a pollination step took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pollination {
    /// Biotic, cross-pollination: Lévy flight toward the global best.
    Global,
    /// Abiotic, self-pollination: difference of two random flowers.
    Local,
}

/// Result of a single step, used for run statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    pub kind: Pollination,
    pub improved: bool,
}

/// Fixed parameters shared by every step of a run.
#[derive(Debug, Clone, Copy)]
pub struct PollinationParams {
    pub gamma: f64,
    pub switch_probability: f64,
    pub levy: LevyFlight,
    pub rejection_sentinel: f64,
}

/// Run one pollination step for flower `index` during sweep `sweep`.
pub fn pollinate<O, R>(
    population: &mut Population,
    index: usize,
    sweep: usize,
    params: &PollinationParams,
    bounds: &Bounds,
    objective: &mut O,
    rng: &mut R,
) -> FpaResult<StepOutcome>
where
    O: Objective + ?Sized,
    R: Rng + ?Sized,
{
    let kind = if rng.gen::<f64>() < params.switch_probability {
        Pollination::Global
    } else {
        Pollination::Local
    };

    let current = &population.member(index).position;
    let mut candidate = match kind {
        Pollination::Global => {
            let step = params.gamma * params.levy.sample(rng);
            let best = &population.best().position;
            current
                .iter()
                .zip(best)
                .map(|(x, g)| x + step * (g - x))
                .collect::<Vec<f64>>()
        }
        Pollination::Local => {
            // The pair may include `index` itself.
            let pair = index::sample(rng, population.len(), 2);
            let (a, b) = (pair.index(0), pair.index(1));
            let epsilon: f64 = rng.gen();
            let xa = &population.member(a).position;
            let xb = &population.member(b).position;
            current
                .iter()
                .zip(xa.iter().zip(xb))
                .map(|(x, (pa, pb))| x + epsilon * (pa - pb))
                .collect::<Vec<f64>>()
        }
    };

    bounds.project(&mut candidate);
    let fitness = evaluate_checked(
        objective,
        &candidate,
        Phase::Sweep(sweep),
        index,
        params.rejection_sentinel,
    )?;
    let improved = population.replace_if_better(index, candidate, fitness);
    Ok(StepOutcome { kind, improved })
}
