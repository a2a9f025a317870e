//! DSS script generation and PV system discovery for OpenDSS feeder models.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Solution settings shared by every simulated day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DssSettings {
    /// Base voltages (kV) passed to `set voltagebases`.
    pub voltage_bases: Vec<f64>,
    /// Control mode for the daily solve.
    pub control_mode: String,
    /// Number of daily-mode solution steps (2880 = 30 s resolution).
    pub daily_steps: usize,
}

impl Default for DssSettings {
    fn default() -> Self {
        Self {
            voltage_bases: vec![115.0, 4.16, 0.48],
            control_mode: "STATIC".to_string(),
            daily_steps: 2880,
        }
    }
}

/// Script that compiles `master`, applies one power factor per PV system,
/// solves a day and exports the event log to `event_log`.
pub fn daily_script(
    master: &Path,
    settings: &DssSettings,
    setpoints: &[(&str, f64)],
    event_log: &Path,
) -> String {
    let bases = settings
        .voltage_bases
        .iter()
        .map(|kv| kv.to_string())
        .collect::<Vec<_>>()
        .join(", ");

    let mut script = String::new();
    let _ = writeln!(script, "clear");
    let _ = writeln!(script, "compile [{}]", master.display());
    let _ = writeln!(script, "set voltagebases=[{bases}]");
    let _ = writeln!(script, "calcvoltagebases");
    let _ = writeln!(script, "set controlmode={}", settings.control_mode);
    for (name, pf) in setpoints {
        let _ = writeln!(script, "edit PVSystem.{name} pf={pf:.6}");
    }
    let _ = writeln!(
        script,
        "set mode=daily number={}",
        settings.daily_steps
    );
    let _ = writeln!(script, "solve");
    let _ = writeln!(script, "export eventlog [{}]", event_log.display());
    script
}

/// Names of all `PVSystem` elements defined by `master` and the files it
/// redirects to, in definition order.
pub fn discover_pv_systems(master: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    let mut visited = HashSet::new();
    scan_file(master, &mut names, &mut visited)?;
    Ok(names)
}

fn scan_file(path: &Path, names: &mut Vec<String>, visited: &mut HashSet<PathBuf>) -> Result<()> {
    let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    if !visited.insert(canonical) {
        return Ok(());
    }
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading DSS file '{}'", path.display()))?;
    let dir = path.parent().unwrap_or_else(|| Path::new("."));

    for raw in text.lines() {
        let line = strip_comment(raw).trim();
        if line.is_empty() {
            continue;
        }
        let lower = line.to_ascii_lowercase();
        if lower.starts_with("redirect") || lower.starts_with("compile") {
            if let Some(target) = line.split_whitespace().nth(1) {
                let target = target.trim_matches(|c| matches!(c, '[' | ']' | '"' | '\'' | '(' | ')'));
                scan_file(&dir.join(target), names, visited)?;
            }
            continue;
        }
        if let Some(name) = defined_pv_system(line) {
            if !names.iter().any(|n| n.eq_ignore_ascii_case(name)) {
                names.push(name.to_string());
            }
        }
    }
    Ok(())
}

/// Name of the PV system a `New` command defines, if it defines one.
///
/// Only the object being created counts; `PVSystem.x` references in the
/// properties of other elements (monitors, inverter controls) are ignored.
fn defined_pv_system(line: &str) -> Option<&str> {
    let mut tokens = line.split_whitespace();
    if !tokens.next()?.eq_ignore_ascii_case("new") {
        return None;
    }
    let object = tokens.next()?;
    let object = match object.split_once('=') {
        Some((key, value)) if key.eq_ignore_ascii_case("object") => value,
        Some(_) => return None,
        None => object,
    };
    let (class, name) = object.split_once('.')?;
    if class.eq_ignore_ascii_case("pvsystem") && !name.is_empty() {
        Some(name)
    } else {
        None
    }
}

fn strip_comment(line: &str) -> &str {
    let cut = [line.find('!'), line.find("//")]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(line.len());
    &line[..cut]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn script_applies_each_setpoint_before_solving() {
        let script = daily_script(
            Path::new("/feeders/ieee13/Master.dss"),
            &DssSettings::default(),
            &[("pv_634", 0.95), ("pv_675", -0.9)],
            Path::new("/tmp/run/EventLog.csv"),
        );
        let lines: Vec<&str> = script.lines().collect();
        assert_eq!(lines[1], "compile [/feeders/ieee13/Master.dss]");
        assert_eq!(lines[2], "set voltagebases=[115, 4.16, 0.48]");
        assert_eq!(lines[4], "set controlmode=STATIC");
        assert_eq!(lines[5], "edit PVSystem.pv_634 pf=0.950000");
        assert_eq!(lines[6], "edit PVSystem.pv_675 pf=-0.900000");
        assert_eq!(lines[7], "set mode=daily number=2880");
        assert_eq!(lines[8], "solve");
        assert_eq!(lines[9], "export eventlog [/tmp/run/EventLog.csv]");
    }

    #[test]
    fn discovers_pv_systems_across_redirects() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("Master.dss"),
            "Clear\n\
             New Circuit.ieee13 basekv=115\n\
             Redirect PV.dss\n\
             ! New PVSystem.commented phases=3\n\
             New Monitor.m_680 element=PVSystem.PV_680 terminal=1\n\
             New InvControl.vv1 DERList=[PVSystem.pv_634] mode=VOLTVAR\n\
             New PVSystem.PV_680 phases=3 bus1=680 kV=4.16 pf=1\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("PV.dss"),
            "new pvsystem.pv_634 phases=3 bus1=634 kV=0.48 // rooftop\n\
             New Object=PVSystem.pv_675 phases=3 bus1=675\n\
             Redirect Master.dss\n",
        )
        .unwrap();

        let names = discover_pv_systems(&dir.path().join("Master.dss")).unwrap();
        assert_eq!(names, vec!["pv_634", "pv_675", "PV_680"]);
    }

    #[test]
    fn references_to_pv_systems_are_not_definitions() {
        let dir = tempdir().unwrap();
        let master = dir.path().join("Master.dss");
        fs::write(
            &master,
            "New PVSystem.pv1 phases=1 bus1=611\n\
             New InvControl.ic1 DERList=[PVSystem.pv1]\n\
             New Monitor.m_ghost element=PVSystem.ghost terminal=1\n\
             New Monitor.m_pv2 element=PVSystem.pv2 terminal=1\n\
             New Load.l1 bus1=611 kW=10\n\
             New PVSystem.pv2 phases=1 bus1=652\n",
        )
        .unwrap();
        assert_eq!(discover_pv_systems(&master).unwrap(), vec!["pv1", "pv2"]);
    }

    #[test]
    fn missing_master_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(discover_pv_systems(&dir.path().join("nope.dss")).is_err());
    }
}
