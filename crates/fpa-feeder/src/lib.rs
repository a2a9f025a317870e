//! # fpa-feeder: PV power-factor tuning for regulator tap reduction
//!
//! Wraps a distribution feeder model behind the [`fpa_core::Objective`]
//! contract: each evaluation applies one power factor per PV inverter,
//! simulates a day in daily mode, and counts voltage-regulator tap operations
//! in the exported event log. Candidates that tap more than the unity power
//! factor reference are rejected with the optimizer's sentinel fitness.
//!
//! - [`FeederSimulator`]: port to the circuit simulator; [`OpenDssProcess`]
//!   drives the OpenDSS command-line engine.
//! - [`TapObjective`]: the tap-count objective.
//! - [`run_study`]: search, re-simulate the optimum, write the setpoint CSV and
//!   a JSON summary.

pub mod config;
pub mod dss;
pub mod error;
pub mod event_log;
pub mod objective;
pub mod power_factor;
pub mod report;
pub mod simulator;
pub mod study;

pub use config::{load_config, StudyConfig};
pub use dss::{daily_script, discover_pv_systems, DssSettings};
pub use error::{SimulatorError, SimulatorResult};
pub use event_log::{count_tap_operations, count_tap_operations_from_reader, DEFAULT_REGULATORS};
pub use objective::TapObjective;
pub use power_factor::{sanitize_all, sanitize_pf, MIN_PF_MAGNITUDE};
pub use report::{read_setpoints_csv, write_setpoints_csv, SetpointRow, StudySummary};
pub use simulator::{find_simulator, FeederSimulator, OpenDssProcess, DEFAULT_SIMULATOR_BINARY};
pub use study::{open_dss_simulator, run_study, run_study_with};
