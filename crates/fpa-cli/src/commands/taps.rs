use std::path::Path;

use anyhow::Result;
use fpa_feeder::{count_tap_operations, DEFAULT_REGULATORS};

pub fn handle(event_log: &Path, regulators: &[String]) -> Result<()> {
    let taps = if regulators.is_empty() {
        count_tap_operations(event_log, &DEFAULT_REGULATORS[..])?
    } else {
        count_tap_operations(event_log, regulators)?
    };
    println!("{taps}");
    Ok(())
}
