use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap_complete::{generate, Shell};

use fpa_cli::cli::build_cli_command;

/// Emit the completion script for `shell` to `out`, or stdout.
pub fn handle(shell: Shell, out: Option<&Path>) -> Result<()> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            let mut file =
                File::create(path).with_context(|| format!("creating {}", path.display()))?;
            write_completions(shell, &mut file)?;
            println!("Wrote {shell} completions to {}", path.display());
        }
        None => write_completions(shell, &mut io::stdout().lock())?,
    }
    Ok(())
}

fn write_completions<W: Write>(shell: Shell, writer: &mut W) -> Result<()> {
    let mut cmd = build_cli_command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, writer);
    writer.flush().context("flushing completion script")?;
    Ok(())
}
