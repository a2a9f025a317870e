use std::{
    fs,
    path::Path,
};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub run_id: String,
    pub command: String,
    pub version: String,
    pub timestamp: String,
    pub status: String,
    #[serde(default)]
    pub duration_ms: Option<u128>,
    pub outputs: Vec<String>,
    pub params: Vec<Param>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub value: String,
}

/// Writes `run-<uuid>.json` next to `output` and returns its path.
pub fn record_manifest(
    output: &Path,
    command: &str,
    params: &[(&str, &str)],
    status: &str,
    duration_ms: Option<u128>,
) -> Result<std::path::PathBuf> {
    let run_id = Uuid::new_v4().to_string();
    let dir = output
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();
    fs::create_dir_all(&dir)?;
    let manifest = ManifestEntry {
        run_id: run_id.clone(),
        command: command.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
        status: status.to_string(),
        duration_ms,
        outputs: vec![output.display().to_string()],
        params: params
            .iter()
            .map(|(k, v)| Param {
                name: k.to_string(),
                value: v.to_string(),
            })
            .collect(),
    };
    let json = serde_json::to_string_pretty(&manifest)?;
    let path = dir.join(format!("run-{}.json", run_id));
    fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

pub fn read_manifest(path: &Path) -> Result<ManifestEntry> {
    let json = fs::read_to_string(path)?;
    let manifest = serde_json::from_str(&json)?;
    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn manifest_lands_next_to_output() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("study").join("study_summary.json");
        let path = record_manifest(
            &output,
            "optimize",
            &[("config", "feeder.toml"), ("seed", "7")],
            "failure",
            Some(12),
        )
        .unwrap();
        assert_eq!(path.parent().unwrap(), dir.path().join("study"));

        let manifest = read_manifest(&path).unwrap();
        assert_eq!(manifest.command, "optimize");
        assert_eq!(manifest.status, "failure");
        assert_eq!(manifest.duration_ms, Some(12));
        assert_eq!(manifest.params.len(), 2);
        assert_eq!(manifest.params[1].value, "7");
        assert!(path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("run-"));
    }
}
