// src/exec/marker.rs

//! Per-project tool version marker (`.bun-version`) refreshed by `update`.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tokio::process::Command;

use crate::exec::deadline::{within, Deadline};

/// Where to write the marker and how to ask the tool for its version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionMarker {
    pub path: PathBuf,
    /// argv of the version query, e.g. `["bun", "--version"]`.
    pub query: Vec<String>,
}

impl VersionMarker {
    /// Query the installed tool version in `cwd` and overwrite the marker
    /// file with it (single line, trailing newline). Returns the version.
    pub async fn refresh(&self, cwd: &Path, limit: Duration) -> Result<String> {
        let Some((program, args)) = self.query.split_first() else {
            bail!("empty version query");
        };

        let mut cmd = Command::new(program);
        cmd.args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match within(limit, cmd.output()).await {
            Deadline::Finished(res) => {
                res.with_context(|| format!("running {:?} in {:?}", self.query, cwd))?
            }
            Deadline::Expired => bail!(
                "{:?} did not answer within {}ms",
                self.query,
                limit.as_millis()
            ),
        };

        if !output.status.success() {
            bail!(
                "{:?} exited with {}: {}",
                self.query,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if version.is_empty() {
            bail!("{:?} printed no version", self.query);
        }

        tokio::fs::write(&self.path, format!("{version}\n"))
            .await
            .with_context(|| format!("writing version marker {:?}", self.path))?;

        Ok(version)
    }
}
