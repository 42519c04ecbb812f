// src/config/validate.rs

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::env::EnvSnapshot;
use crate::config::model::{Operation, RawConfigFile, RunConfig, RunOverrides};
use crate::errors::{MonorunError, Result};
use crate::types::{Capability, StdioMode, Strategy};

const DEFAULT_TOOL: &str = "bun";
const DEFAULT_VERSION_FILE: &str = ".bun-version";
const DEFAULT_RESERVED: &[&str] = &["_"];

impl RunConfig {
    /// Merge every configuration source into one validated `RunConfig`.
    ///
    /// Precedence per value: CLI override > environment > config file >
    /// built-in default. Rejects zero timeouts, an empty tool name, an empty
    /// root list and unparsable `*_TIMEOUT_MS` values.
    pub fn resolve(
        operation: Operation,
        workspace_dir: impl Into<PathBuf>,
        file: &RawConfigFile,
        env: &EnvSnapshot,
        overrides: &RunOverrides,
    ) -> Result<RunConfig> {
        let workspace_dir = workspace_dir.into();
        let capability = operation.capability();

        let roots = resolve_roots(capability, &workspace_dir, file, overrides)?;
        let timeout = resolve_timeout(capability, file, env, overrides)?;
        let tool = resolve_tool(file, overrides)?;

        let reserved = file
            .workspace
            .reserved
            .clone()
            .unwrap_or_else(|| DEFAULT_RESERVED.iter().map(|s| s.to_string()).collect());

        let strategy = if overrides.parallel {
            Strategy::Parallel
        } else {
            file.workspace.strategy.unwrap_or_default()
        };

        let stdio = if overrides.capture {
            StdioMode::Capture
        } else {
            file.workspace.stdio.unwrap_or_default()
        };

        let include_workspace_root = capability == Capability::Update
            && overrides
                .include_workspace_root
                .or(file.update.include_workspace_root)
                .unwrap_or(true);

        let version_file = match file.workspace.version_file.as_deref() {
            Some(name) if name.trim().is_empty() || name.contains(['/', '\\']) => {
                return Err(MonorunError::ConfigError(format!(
                    "[workspace].version_file must be a plain file name (got {name:?})"
                )));
            }
            Some(name) => name.to_string(),
            None => DEFAULT_VERSION_FILE.to_string(),
        };

        Ok(RunConfig {
            operation,
            workspace_dir,
            roots,
            reserved,
            include_workspace_root,
            tool,
            strategy,
            stdio,
            timeout,
            version_file,
        })
    }
}

fn default_roots(capability: Capability) -> Vec<String> {
    match capability {
        Capability::Lint | Capability::Typecheck => {
            vec!["apps".to_string(), "packages".to_string()]
        }
        Capability::Update => vec!["apps".to_string()],
    }
}

fn resolve_roots(
    capability: Capability,
    workspace_dir: &Path,
    file: &RawConfigFile,
    overrides: &RunOverrides,
) -> Result<Vec<PathBuf>> {
    let roots: Vec<PathBuf> = if !overrides.roots.is_empty() {
        overrides.roots.clone()
    } else {
        let from_file = match capability {
            Capability::Update => file
                .update
                .roots
                .clone()
                .or_else(|| file.workspace.roots.clone()),
            _ => file.workspace.roots.clone(),
        };
        from_file
            .unwrap_or_else(|| default_roots(capability))
            .into_iter()
            .map(PathBuf::from)
            .collect()
    };

    if roots.is_empty() {
        return Err(MonorunError::ConfigError(format!(
            "no project roots configured for {capability}"
        )));
    }

    Ok(roots
        .into_iter()
        .map(|root| {
            if root.is_absolute() {
                root
            } else {
                workspace_dir.join(root)
            }
        })
        .collect())
}

fn resolve_timeout(
    capability: Capability,
    file: &RawConfigFile,
    env: &EnvSnapshot,
    overrides: &RunOverrides,
) -> Result<Duration> {
    let var = capability.timeout_env_var();

    // The env var is only consulted (and validated) when the CLI is silent.
    let from_env = match (overrides.timeout_ms, env.get(var)) {
        (None, Some(raw)) => Some(raw.trim().parse::<u64>().map_err(|e| {
            MonorunError::ConfigError(format!("{var} must be a number of milliseconds ({raw:?}: {e})"))
        })?),
        _ => None,
    };

    let ms = overrides
        .timeout_ms
        .or(from_env)
        .or(file.timeouts.for_capability(capability))
        .unwrap_or_else(|| capability.default_timeout_ms());

    if ms == 0 {
        return Err(MonorunError::ConfigError(format!(
            "{capability} timeout must be >= 1ms (got 0)"
        )));
    }

    Ok(Duration::from_millis(ms))
}

fn resolve_tool(file: &RawConfigFile, overrides: &RunOverrides) -> Result<String> {
    let tool = overrides
        .tool
        .clone()
        .or_else(|| file.workspace.tool.clone())
        .unwrap_or_else(|| DEFAULT_TOOL.to_string());

    if tool.trim().is_empty() {
        return Err(MonorunError::ConfigError(
            "tool must not be empty".to_string(),
        ));
    }

    Ok(tool)
}
