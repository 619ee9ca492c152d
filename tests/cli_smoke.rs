#![allow(clippy::unwrap_used)]
//! CLI smoke tests against the built binary.
//!
//! Every test points `XDG_CONFIG_HOME` and the working directory at a fresh
//! temporary directory so no real configuration is read or written.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("project")).unwrap();
        Self { dir }
    }

    fn config_file(&self) -> PathBuf {
        self.dir
            .path()
            .join("xdg")
            .join("openrouter-cli")
            .join("config.json")
    }

    fn project_dir(&self) -> PathBuf {
        self.dir.path().join("project")
    }

    #[allow(deprecated)]
    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("openrouter").unwrap();
        cmd.current_dir(self.project_dir())
            .env("XDG_CONFIG_HOME", self.dir.path().join("xdg"))
            .env("HOME", self.dir.path())
            .env("NO_COLOR", "1")
            .env_remove("OPENROUTER_API_KEY")
            .env_remove("OPENAI_API_KEY")
            .env_remove("OPENROUTER_MODEL")
            .env_remove("OPENROUTER_LOG");
        cmd
    }
}

#[test]
fn test_help_displays_usage() {
    Sandbox::new()
        .cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("OpenAI-compatible"))
        .stdout(predicate::str::contains("ask"))
        .stdout(predicate::str::contains("repl"))
        .stdout(predicate::str::contains("--profile"));
}

#[test]
fn test_version_displays_version() {
    Sandbox::new()
        .cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_ask_help() {
    Sandbox::new()
        .cmd()
        .args(["ask", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--model"))
        .stdout(predicate::str::contains("--system"))
        .stdout(predicate::str::contains("--no-stream"));
}

#[test]
fn test_config_without_file_prints_empty_document() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("{}"));
    assert!(!sandbox.config_file().exists());
}

#[test]
fn test_config_masks_api_key() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["config", "--api-key", "sk-or-v1-abcdefghijklmnop"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sk-o****mnop"))
        .stdout(predicate::str::contains("abcdefghijkl").not());

    let stored = std::fs::read_to_string(sandbox.config_file()).unwrap();
    assert!(stored.contains("\"apiKey\": \"sk-or-v1-abcdefghijklmnop\""));
}

#[cfg(unix)]
#[test]
fn test_config_file_is_private() {
    use std::os::unix::fs::PermissionsExt;

    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["config", "--model", "openai/gpt-4o-mini"])
        .assert()
        .success();

    let mode = std::fs::metadata(sandbox.config_file())
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn test_config_profile_target() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["config", "--model", "openai/gpt-4o-mini", "--profile-target", "work"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"profiles\""))
        .stdout(predicate::str::contains("\"work\""));

    sandbox
        .cmd()
        .arg("profile")
        .assert()
        .success()
        .stdout(predicate::str::contains("work"));
}

#[test]
fn test_unknown_profile_fails() {
    Sandbox::new()
        .cmd()
        .args(["profile", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown profile: missing"));
}

#[test]
fn test_error_is_reported_once() {
    let output = Sandbox::new()
        .cmd()
        .args(["profile", "missing"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert_eq!(stderr.matches("Unknown profile: missing").count(), 1, "{stderr}");
}

#[test]
fn test_import_invalid_document_fails() {
    let sandbox = Sandbox::new();
    let import = sandbox.dir.path().join("bad.json");
    std::fs::write(&import, "[1, 2, 3]").unwrap();

    sandbox
        .cmd()
        .args(["config", "--import", import.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration document"));
    assert!(!sandbox.config_file().exists());
}

#[test]
fn test_reset_requires_confirmation() {
    Sandbox::new()
        .cmd()
        .args(["config", "--reset"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--yes"));
}

#[test]
fn test_ask_without_key_exits_with_config_code() {
    Sandbox::new()
        .cmd()
        .args(["ask", "hello"])
        .assert()
        .code(exitcode::CONFIG)
        .stderr(predicate::str::contains(
            "Missing API key. Set OPENROUTER_API_KEY / OPENAI_API_KEY",
        ));
}

#[test]
fn test_models_falls_back_when_unreachable() {
    let sandbox = Sandbox::new();
    std::fs::write(
        sandbox.project_dir().join(".openrouterrc.json"),
        r#"{"domain":"http://127.0.0.1:9/v1"}"#,
    )
    .unwrap();

    sandbox
        .cmd()
        .args(["--quiet", "models"])
        .assert()
        .success()
        .stdout(predicate::str::contains("meta-llama/llama-3.1-8b-instruct"));

    sandbox
        .cmd()
        .args(["--quiet", "models"])
        .env("OPENROUTER_MODEL", "openai/gpt-4o-mini")
        .assert()
        .success()
        .stdout(predicate::str::contains("openai/gpt-4o-mini"));
}
