//! Errors raised while driving the external circuit simulator.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimulatorError {
    /// No simulator binary configured and none found on PATH.
    #[error("Simulator binary '{binary}' not found. Install OpenDSS or set `simulator` in the study config")]
    NotInstalled { binary: String },

    /// Configured simulator path does not exist.
    #[error("Simulator binary {0} does not exist")]
    MissingBinary(PathBuf),

    /// The process could not be spawned.
    #[error("Failed to start simulator process: {0}")]
    ProcessStart(#[source] std::io::Error),

    /// The process ran but exited unsuccessfully.
    #[error("Simulator exited with code {code:?}: {stderr}")]
    ProcessFailed { code: Option<i32>, stderr: String },

    /// Number of power factors does not match the number of PV systems.
    #[error("Expected {expected} power factors (one per PV system), got {actual}")]
    SetpointCount { expected: usize, actual: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SimulatorResult<T> = Result<T, SimulatorError>;
