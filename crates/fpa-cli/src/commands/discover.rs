use std::path::Path;

use anyhow::{bail, Result};
use fpa_feeder::discover_pv_systems;

pub fn handle(dss_file: &Path) -> Result<()> {
    let pv_systems = discover_pv_systems(dss_file)?;
    if pv_systems.is_empty() {
        bail!("no PVSystem definitions found in '{}'", dss_file.display());
    }
    for name in &pv_systems {
        println!("{name}");
    }
    Ok(())
}
