// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::{Operation, RunOverrides};

/// Command-line arguments for `monorun`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "monorun",
    version,
    about = "Run lint, typecheck or dependency updates across every project of a workspace.",
    long_about = None
)]
pub struct CliArgs {
    /// Operation to run. Defaults to `lint`.
    #[command(subcommand)]
    pub command: Option<OperationCommand>,

    /// Workspace directory; roots and the config file resolve against it.
    #[arg(long, global = true, value_name = "DIR", default_value = ".")]
    pub workspace: PathBuf,

    /// Config file (TOML). Optional; missing means built-in defaults.
    ///
    /// Relative paths resolve against `--workspace`.
    #[arg(long, global = true, value_name = "PATH", default_value = "monorun.toml")]
    pub config: PathBuf,

    /// Project root to scan (repeatable). Replaces the configured roots.
    #[arg(long = "root", global = true, value_name = "DIR")]
    pub roots: Vec<PathBuf>,

    /// Run every project at once instead of one after another.
    #[arg(long, global = true)]
    pub parallel: bool,

    /// Capture child output and print it only for failing projects.
    #[arg(long, global = true)]
    pub capture: bool,

    /// Per-project timeout in milliseconds (overrides `*_TIMEOUT_MS`).
    #[arg(long, global = true, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Package manager binary used to run scripts.
    #[arg(long, global = true, value_name = "BIN")]
    pub tool: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `MONORUN_LOG` or a default level will be used.
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Scan and probe, print what would run, but don't execute anything.
    #[arg(long, global = true)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum OperationCommand {
    /// Run each project's `lint` script.
    Lint(LintArgs),
    /// Run each project's `typecheck` script.
    Typecheck(TypecheckArgs),
    /// Update dependencies and refresh the tool version marker.
    Update(UpdateArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct LintArgs {
    /// Run `format` instead of `lint`.
    #[arg(long)]
    pub fix: bool,

    /// Use the `:staged` script variant.
    #[arg(long)]
    pub staged: bool,

    /// Forward `--debug` to the script.
    #[arg(long)]
    pub debug: bool,
}

#[derive(Debug, Clone, Default, Args)]
pub struct TypecheckArgs {
    /// Use the alternate `typecheck:tsgo` script.
    #[arg(long)]
    pub tsgo: bool,
}

#[derive(Debug, Clone, Default, Args)]
pub struct UpdateArgs {
    /// Update to the latest versions instead of compatible ones.
    #[arg(long)]
    pub latest: bool,

    /// Do not update the workspace directory itself.
    #[arg(long)]
    pub no_root: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl CliArgs {
    /// The operation and its variant, fixed for the whole run.
    pub fn operation(&self) -> Operation {
        match &self.command {
            None => Operation::default(),
            Some(OperationCommand::Lint(a)) => Operation::Lint {
                fix: a.fix,
                staged: a.staged,
                debug: a.debug,
            },
            Some(OperationCommand::Typecheck(a)) => Operation::Typecheck { tsgo: a.tsgo },
            Some(OperationCommand::Update(a)) => Operation::Update { latest: a.latest },
        }
    }

    pub fn overrides(&self) -> RunOverrides {
        let include_workspace_root = match &self.command {
            Some(OperationCommand::Update(a)) if a.no_root => Some(false),
            _ => None,
        };

        RunOverrides {
            roots: self.roots.clone(),
            parallel: self.parallel,
            capture: self.capture,
            timeout_ms: self.timeout_ms,
            tool: self.tool.clone(),
            include_workspace_root,
        }
    }

    /// Config file path, resolved against the workspace directory.
    pub fn config_path(&self) -> PathBuf {
        if self.config.is_absolute() {
            self.config.clone()
        } else {
            self.workspace.join(&self.config)
        }
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
