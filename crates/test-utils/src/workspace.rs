#![allow(dead_code)]

//! Real on-disk workspaces for end-to-end tests.
//!
//! Each workspace ships a fake package-manager binary (`fake-bun`, a POSIX
//! shell script) so tests don't need `bun` installed:
//!
//! - `fake-bun --version` prints the version stored next to the tool.
//! - `fake-bun run <script> [args]` runs `.fake/<script>.sh` in the project.
//! - `fake-bun update [--latest]` runs `.fake/update.sh` if present.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use tempfile::TempDir;

const FAKE_TOOL: &str = r#"#!/bin/sh
case "$1" in
  --version)
    cat "$(dirname "$0")/fake-bun.version"
    ;;
  run)
    shift
    script="$1"
    shift
    exec sh "./.fake/$script.sh" "$@"
    ;;
  update)
    if [ -f ./.fake/update.sh ]; then
      exec sh ./.fake/update.sh "$@"
    fi
    ;;
  *)
    echo "fake-bun: unknown command $1" >&2
    exit 64
    ;;
esac
"#;

pub struct TempWorkspace {
    dir: TempDir,
}

impl TempWorkspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("creating temp workspace");
        let ws = Self { dir };
        ws.install_tool("1.1.38");
        ws
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn tool_path(&self) -> PathBuf {
        self.path().join(".tool").join("fake-bun")
    }

    /// Change the version the fake tool reports.
    pub fn set_tool_version(&self, version: &str) {
        let dir = self.path().join(".tool");
        fs::write(dir.join("fake-bun.version"), format!("{version}\n")).unwrap();
    }

    fn install_tool(&self, version: &str) {
        let dir = self.path().join(".tool");
        fs::create_dir_all(&dir).unwrap();
        let tool = dir.join("fake-bun");
        fs::write(&tool, FAKE_TOOL).unwrap();
        make_executable(&tool);
        self.set_tool_version(version);
    }

    /// Create a project directory with a `package.json` whose `scripts`
    /// map each name to its shell body; the fake tool runs the same body.
    pub fn project(&self, rel: &str, scripts: &[(&str, &str)]) -> PathBuf {
        let dir = self.path().join(rel);
        fs::create_dir_all(dir.join(".fake")).unwrap();

        let table: serde_json::Map<String, serde_json::Value> = scripts
            .iter()
            .map(|(name, body)| (name.to_string(), json!(body)))
            .collect();
        let manifest = json!({ "name": rel, "scripts": table });
        fs::write(
            dir.join("package.json"),
            serde_json::to_string_pretty(&manifest).unwrap(),
        )
        .unwrap();

        for (name, body) in scripts {
            fs::write(dir.join(".fake").join(format!("{name}.sh")), body).unwrap();
        }
        dir
    }

    /// Create a directory without any manifest.
    pub fn bare_dir(&self, rel: &str) -> PathBuf {
        let dir = self.path().join(rel);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    pub fn write_file(&self, rel: &str, contents: &str) -> PathBuf {
        let path = self.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, contents).unwrap();
        path
    }

    pub fn read_file(&self, rel: &str) -> String {
        fs::read_to_string(self.path().join(rel)).unwrap()
    }
}

impl Default for TempWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = fs::metadata(path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms).unwrap();
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) {}
