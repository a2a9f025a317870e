//! Optimization driver: Init → Iterate → Done.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::bounds::Bounds;
use crate::config::FpaConfig;
use crate::error::FpaResult;
use crate::levy::LevyFlight;
use crate::objective::Objective;
use crate::pollination::{pollinate, Pollination, PollinationParams};
use crate::population::Population;

/// Best solution of a run plus bookkeeping gathered along the way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FpaSolution {
    /// Best decision vector ever observed (always inside the bounds).
    pub position: Vec<f64>,
    /// Objective value observed for `position`.
    pub fitness: f64,
    /// Best fitness after initialization, then after each sweep.
    pub history: Vec<f64>,
    /// Total objective evaluations, initialization included.
    pub evaluations: usize,
    pub global_moves: usize,
    pub local_moves: usize,
    /// Steps that replaced a flower.
    pub improvements: usize,
}

/// A validated FPA problem: parameters plus search box.
#[derive(Debug, Clone)]
pub struct FlowerPollination {
    config: FpaConfig,
    bounds: Bounds,
    levy: LevyFlight,
}

impl FlowerPollination {
    /// Validate `config` against `bounds`. No objective is called here.
    pub fn new(config: FpaConfig, bounds: Bounds) -> FpaResult<Self> {
        config.validate()?;
        let levy = LevyFlight::new(config.lambda)?;
        Ok(Self {
            config,
            bounds,
            levy,
        })
    }

    pub fn config(&self) -> &FpaConfig {
        &self.config
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Run with a `StdRng` seeded from `config.seed`, or from entropy.
    pub fn run<O: Objective + ?Sized>(&self, objective: &mut O) -> FpaResult<FpaSolution> {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.run_with_rng(objective, &mut rng)
    }

    /// Run with a caller-supplied random source.
    ///
    /// Any objective failure aborts the run; the partially updated population
    /// is dropped.
    pub fn run_with_rng<O, R>(&self, objective: &mut O, rng: &mut R) -> FpaResult<FpaSolution>
    where
        O: Objective + ?Sized,
        R: Rng + ?Sized,
    {
        let config = &self.config;
        let params = PollinationParams {
            gamma: config.gamma,
            switch_probability: config.switch_probability,
            levy: self.levy,
            rejection_sentinel: config.rejection_sentinel,
        };

        debug!(
            "Initializing {} flowers over {} dimensions",
            config.flowers,
            self.bounds.dims()
        );
        let mut population = Population::initialize(
            config.flowers,
            &self.bounds,
            objective,
            rng,
            config.rejection_sentinel,
        )?;

        let mut history = Vec::with_capacity(config.iterations + 1);
        history.push(population.best().fitness);
        let mut evaluations = config.flowers;
        let (mut global_moves, mut local_moves, mut improvements) = (0, 0, 0);

        for sweep in 0..config.iterations {
            for index in 0..population.len() {
                let outcome = pollinate(
                    &mut population,
                    index,
                    sweep,
                    &params,
                    &self.bounds,
                    objective,
                    rng,
                )?;
                evaluations += 1;
                match outcome.kind {
                    Pollination::Global => global_moves += 1,
                    Pollination::Local => local_moves += 1,
                }
                if outcome.improved {
                    improvements += 1;
                }
            }
            let best = population.best().fitness;
            history.push(best);
            info!("Iteration {}: best fitness = {:.4}", sweep + 1, best);
        }

        let best = population.into_best();
        debug!(
            evaluations,
            global_moves, local_moves, improvements, "pollination finished"
        );
        Ok(FpaSolution {
            position: best.position,
            fitness: best.fitness,
            history,
            evaluations,
            global_moves,
            local_moves,
            improvements,
        })
    }
}

/// Minimize `objective` over `[min_values, max_values]`.
///
/// Parameter names follow the classic FPA write-up (`gama`, `lamb`, `p`).
/// Seeds the generator from entropy; use [`FlowerPollination`] for seeded runs
/// and run statistics.
#[allow(clippy::too_many_arguments)]
pub fn run<O: Objective + ?Sized>(
    flowers: usize,
    min_values: &[f64],
    max_values: &[f64],
    iterations: usize,
    gama: f64,
    lamb: f64,
    p: f64,
    objective: &mut O,
) -> FpaResult<(Vec<f64>, f64)> {
    let config = FpaConfig::default()
        .with_flowers(flowers)
        .with_iterations(iterations)
        .with_gamma(gama)
        .with_lambda(lamb)
        .with_switch_probability(p);
    let bounds = Bounds::new(min_values.to_vec(), max_values.to_vec())?;
    let solution = FlowerPollination::new(config, bounds)?.run(objective)?;
    Ok((solution.position, solution.fitness))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FpaError, Phase};
    use crate::objective::Fallible;

    #[test]
    fn history_has_one_entry_per_sweep_and_never_rises() {
        let bounds = Bounds::uniform(3, -2.0, 2.0).unwrap();
        let fpa = FlowerPollination::new(
            FpaConfig::default().with_flowers(15).with_iterations(25).with_seed(17),
            bounds,
        )
        .unwrap();
        let mut sphere = |x: &[f64]| x.iter().map(|v| v * v).sum::<f64>();
        let solution = fpa.run(&mut sphere).unwrap();
        assert_eq!(solution.history.len(), 26);
        assert!(solution.history.windows(2).all(|w| w[1] <= w[0]));
        assert_eq!(*solution.history.last().unwrap(), solution.fitness);
        assert_eq!(solution.evaluations, 15 * 26);
        assert_eq!(solution.global_moves + solution.local_moves, 15 * 25);
    }

    #[test]
    fn invalid_configuration_fails_before_any_evaluation() {
        let mut calls = 0usize;
        let mut counting = |_: &[f64]| {
            calls += 1;
            0.0
        };
        let err = run(2, &[0.0], &[1.0], 10, 0.1, 1.5, 0.75, &mut counting).unwrap_err();
        assert!(matches!(err, FpaError::InvalidConfiguration(_)));
        let err = run(10, &[1.0], &[0.0], 10, 0.1, 1.5, 0.75, &mut counting).unwrap_err();
        assert!(matches!(err, FpaError::InvalidConfiguration(_)));
        let err = run(10, &[], &[], 10, 0.1, 1.5, 0.75, &mut counting).unwrap_err();
        assert!(matches!(err, FpaError::InvalidConfiguration(_)));
        assert_eq!(calls, 0);
    }

    #[test]
    fn objective_fault_reports_sweep_and_flower() {
        let bounds = Bounds::uniform(1, 0.0, 1.0).unwrap();
        let fpa = FlowerPollination::new(
            FpaConfig::default().with_flowers(4).with_iterations(3).with_seed(1),
            bounds,
        )
        .unwrap();
        let mut calls = 0usize;
        let mut flaky = Fallible(|x: &[f64]| {
            calls += 1;
            if calls == 7 {
                Err("simulator exited with status 3")
            } else {
                Ok(x[0])
            }
        });
        let err = fpa.run(&mut flaky).unwrap_err();
        // 4 initial evaluations, then the third step of the first sweep.
        assert_eq!(err.location(), Some((Phase::Sweep(0), 2)));
        assert!(err.to_string().contains("simulator exited with status 3"));
    }
}
