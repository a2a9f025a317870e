//! Regulator tap counting over an exported simulator event log.
//!
//! The event log is a CSV-like text file with one line per control action.
//! A line counts as a tap operation when it mentions `TAP` and the name of one
//! of the regulators of interest (case-insensitive).

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::warn;

/// Regulators counted when the study config does not name any.
pub const DEFAULT_REGULATORS: [&str; 3] = ["Reg1", "Reg2", "Reg3"];

/// Count tap operations of `regulators` in the event log at `path`.
///
/// A missing file is logged and counts as zero operations.
pub fn count_tap_operations<S: AsRef<str>>(path: &Path, regulators: &[S]) -> Result<usize> {
    if !path.exists() {
        warn!("Event log not found: {}", path.display());
        return Ok(0);
    }
    let file =
        File::open(path).with_context(|| format!("opening event log '{}'", path.display()))?;
    count_tap_operations_from_reader(BufReader::new(file), regulators)
        .with_context(|| format!("reading event log '{}'", path.display()))
}

/// Same as [`count_tap_operations`] over any buffered reader.
pub fn count_tap_operations_from_reader<R, S>(reader: R, regulators: &[S]) -> Result<usize>
where
    R: BufRead,
    S: AsRef<str>,
{
    let wanted: Vec<String> = regulators
        .iter()
        .map(|r| r.as_ref().to_uppercase())
        .collect();
    let mut taps = 0;
    for line in reader.lines() {
        let line = line?.to_uppercase();
        if !line.contains("TAP") {
            continue;
        }
        if wanted.iter().any(|reg| line.contains(reg.as_str())) {
            taps += 1;
        }
    }
    Ok(taps)
}
