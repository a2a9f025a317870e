//! # fpa-core: Flower Pollination Algorithm
//!
//! A population-based minimizer for expensive black-box objectives over a box
//! of real parameters. Each sweep visits every flower once and either
//!
//! - **global pollination**: a Lévy flight toward the best flower seen so far, or
//! - **local pollination**: a random fraction of the difference between two
//!   distinct flowers,
//!
//! then clamps the candidate into the bounds, evaluates it, and keeps it only
//! if it is strictly better than the flower it came from.
//!
//! | Component | Item |
//! |-----------|------|
//! | Lévy step generator | [`LevyFlight`] |
//! | Bound projector | [`Bounds::project`], [`project`] |
//! | Objective adapter | [`Objective`], [`Fallible`] |
//! | Population store | [`Population`] |
//! | Pollination step | [`pollinate`] |
//! | Driver | [`FlowerPollination`], [`run`] |
//!
//! The optimizer knows nothing about the objective beyond its return value. It
//! evaluates strictly sequentially, so objectives backed by a stateful external
//! simulator are safe to use.
//!
//! ## Example
//!
//! ```
//! use fpa_core::{Bounds, FlowerPollination, FpaConfig};
//!
//! let bounds = Bounds::uniform(2, 0.0, 1.0)?;
//! let config = FpaConfig::default()
//!     .with_flowers(20)
//!     .with_iterations(50)
//!     .with_seed(42);
//! let mut objective = |x: &[f64]| x.iter().sum::<f64>();
//! let solution = FlowerPollination::new(config, bounds)?.run(&mut objective)?;
//! assert!(solution.fitness < 1.0);
//! # Ok::<(), fpa_core::FpaError>(())
//! ```

pub mod bounds;
pub mod config;
pub mod driver;
pub mod error;
pub mod levy;
pub mod objective;
pub mod pollination;
pub mod population;

pub use bounds::{project, Bounds};
pub use config::{FpaConfig, DEFAULT_REJECTION_SENTINEL};
pub use driver::{run, FlowerPollination, FpaSolution};
pub use error::{FpaError, FpaResult, ObjectiveError, Phase};
pub use levy::LevyFlight;
pub use objective::{Fallible, Objective};
pub use pollination::{pollinate, Pollination, PollinationParams, StepOutcome};
pub use population::{Candidate, Population};
