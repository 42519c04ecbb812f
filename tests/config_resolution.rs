// tests/config_resolution.rs

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use tempfile::NamedTempFile;

use monorun::config::{
    load_from_path, load_optional, EnvSnapshot, Operation, RawConfigFile, RunConfig, RunOverrides,
};
use monorun::errors::MonorunError;
use monorun::probe::ScriptName;
use monorun::types::{StdioMode, Strategy};

fn resolve(
    operation: Operation,
    file: &RawConfigFile,
    env: &EnvSnapshot,
    overrides: &RunOverrides,
) -> Result<RunConfig, MonorunError> {
    RunConfig::resolve(operation, "/ws", file, env, overrides)
}

#[test]
fn defaults_depend_on_the_operation_family() {
    let env = EnvSnapshot::default();
    let file = RawConfigFile::default();
    let overrides = RunOverrides::default();

    let lint = resolve(Operation::default(), &file, &env, &overrides).unwrap();
    assert_eq!(
        lint.roots,
        vec![PathBuf::from("/ws/apps"), PathBuf::from("/ws/packages")]
    );
    assert_eq!(lint.timeout, Duration::from_secs(600));
    assert_eq!(lint.strategy, Strategy::Sequential);
    assert_eq!(lint.stdio, StdioMode::Inherit);
    assert_eq!(lint.tool, "bun");
    assert_eq!(lint.reserved, vec!["_".to_string()]);
    assert!(!lint.include_workspace_root);

    let update = resolve(Operation::Update { latest: false }, &file, &env, &overrides).unwrap();
    assert_eq!(update.roots, vec![PathBuf::from("/ws/apps")]);
    assert_eq!(update.timeout, Duration::from_secs(300));
    assert!(update.include_workspace_root);
}

#[test]
fn timeout_precedence_is_cli_then_env_then_file() {
    let mut file = RawConfigFile::default();
    file.timeouts.typecheck_ms = Some(1_000);
    let op = Operation::Typecheck { tsgo: false };

    let cfg = resolve(op.clone(), &file, &EnvSnapshot::default(), &RunOverrides::default()).unwrap();
    assert_eq!(cfg.timeout, Duration::from_millis(1_000));

    let env = EnvSnapshot::from_pairs([("TYPECHECK_TIMEOUT_MS", "2000")]);
    let cfg = resolve(op.clone(), &file, &env, &RunOverrides::default()).unwrap();
    assert_eq!(cfg.timeout, Duration::from_millis(2_000));

    let overrides = RunOverrides {
        timeout_ms: Some(3_000),
        ..RunOverrides::default()
    };
    let cfg = resolve(op, &file, &env, &overrides).unwrap();
    assert_eq!(cfg.timeout, Duration::from_millis(3_000));
}

#[test]
fn cli_timeout_wins_over_a_broken_env_value() {
    let env = EnvSnapshot::from_pairs([("LINT_TIMEOUT_MS", "oops")]);
    let overrides = RunOverrides {
        timeout_ms: Some(1_000),
        ..RunOverrides::default()
    };

    let cfg = resolve(Operation::default(), &RawConfigFile::default(), &env, &overrides).unwrap();
    assert_eq!(cfg.timeout, Duration::from_millis(1_000));
}

#[test]
fn env_override_only_applies_to_its_own_family() {
    let env = EnvSnapshot::from_pairs([("UPDATE_TIMEOUT_MS", "50")]);
    let cfg = resolve(
        Operation::default(),
        &RawConfigFile::default(),
        &env,
        &RunOverrides::default(),
    )
    .unwrap();
    assert_eq!(cfg.timeout, Duration::from_secs(600));
}

#[test]
fn invalid_or_zero_timeouts_are_config_errors() {
    let env = EnvSnapshot::from_pairs([("LINT_TIMEOUT_MS", "ten minutes")]);
    match resolve(Operation::default(), &RawConfigFile::default(), &env, &RunOverrides::default()) {
        Err(MonorunError::ConfigError(msg)) => assert!(msg.contains("LINT_TIMEOUT_MS")),
        other => panic!("expected ConfigError, got {other:?}"),
    }

    let overrides = RunOverrides {
        timeout_ms: Some(0),
        ..RunOverrides::default()
    };
    assert!(matches!(
        resolve(Operation::default(), &RawConfigFile::default(), &EnvSnapshot::default(), &overrides),
        Err(MonorunError::ConfigError(_))
    ));
}

#[test]
fn cli_roots_replace_configured_roots() {
    let mut file = RawConfigFile::default();
    file.workspace.roots = Some(vec!["services".to_string()]);

    let cfg = resolve(
        Operation::default(),
        &file,
        &EnvSnapshot::default(),
        &RunOverrides::default(),
    )
    .unwrap();
    assert_eq!(cfg.roots, vec![PathBuf::from("/ws/services")]);

    let overrides = RunOverrides {
        roots: vec![PathBuf::from("tools"), PathBuf::from("/abs/libs")],
        ..RunOverrides::default()
    };
    let cfg = resolve(Operation::default(), &file, &EnvSnapshot::default(), &overrides).unwrap();
    assert_eq!(
        cfg.roots,
        vec![PathBuf::from("/ws/tools"), PathBuf::from("/abs/libs")]
    );
}

#[test]
fn empty_roots_and_empty_tool_are_rejected() {
    let mut file = RawConfigFile::default();
    file.workspace.roots = Some(vec![]);
    assert!(matches!(
        resolve(Operation::default(), &file, &EnvSnapshot::default(), &RunOverrides::default()),
        Err(MonorunError::ConfigError(_))
    ));

    let overrides = RunOverrides {
        tool: Some("  ".to_string()),
        ..RunOverrides::default()
    };
    assert!(matches!(
        resolve(Operation::default(), &RawConfigFile::default(), &EnvSnapshot::default(), &overrides),
        Err(MonorunError::ConfigError(_))
    ));
}

#[test]
fn commands_follow_the_selected_variant() {
    let env = EnvSnapshot::default();
    let file = RawConfigFile::default();
    let overrides = RunOverrides::default();

    let lint = resolve(
        Operation::Lint {
            fix: false,
            staged: true,
            debug: true,
        },
        &file,
        &env,
        &overrides,
    )
    .unwrap();
    let script = lint.operation.script_name();
    assert_eq!(script, ScriptName::new("lint:staged"));
    assert_eq!(
        lint.command_for(&script),
        vec!["bun", "run", "lint:staged", "--", "--debug"]
    );
    assert!(lint.version_marker(&PathBuf::from("/ws/apps/web")).is_none());

    let update = resolve(Operation::Update { latest: true }, &file, &env, &overrides).unwrap();
    let script = update.operation.script_name();
    assert_eq!(update.command_for(&script), vec!["bun", "update", "--latest"]);

    let marker = update
        .version_marker(&PathBuf::from("/ws/apps/web"))
        .expect("update writes a version marker");
    assert_eq!(marker.path, PathBuf::from("/ws/apps/web/.bun-version"));
    assert_eq!(marker.query, vec!["bun", "--version"]);
}

#[test]
fn config_file_sections_are_parsed() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[workspace]
roots = ["apps"]
reserved = ["_", "templates"]
tool = "pnpm"
strategy = "parallel"
stdio = "capture"

[timeouts]
lint_ms = 1234

[update]
include_workspace_root = false
"#
    )
    .unwrap();

    let raw = load_from_path(file.path()).unwrap();
    let cfg = resolve(
        Operation::default(),
        &raw,
        &EnvSnapshot::default(),
        &RunOverrides::default(),
    )
    .unwrap();

    assert_eq!(cfg.tool, "pnpm");
    assert_eq!(cfg.strategy, Strategy::Parallel);
    assert_eq!(cfg.stdio, StdioMode::Capture);
    assert_eq!(cfg.timeout, Duration::from_millis(1234));
    assert_eq!(cfg.reserved, vec!["_".to_string(), "templates".to_string()]);

    let update = resolve(
        Operation::Update { latest: false },
        &raw,
        &EnvSnapshot::default(),
        &RunOverrides::default(),
    )
    .unwrap();
    assert!(!update.include_workspace_root);
}

#[test]
fn unknown_strategy_in_file_is_a_toml_error() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "[workspace]\nstrategy = \"sometimes\"\n").unwrap();

    match load_from_path(file.path()) {
        Err(MonorunError::TomlError(_)) => {}
        other => panic!("expected TomlError, got {other:?}"),
    }
}

#[test]
fn missing_config_file_means_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let raw = load_optional(dir.path().join("monorun.toml")).unwrap();
    assert!(raw.workspace.roots.is_none());
    assert!(raw.timeouts.lint_ms.is_none());
}
