//! End-to-end runs of the `apphub` binary against temporary catalogs.

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

/// A throwaway catalog repository.
struct TestRepo {
    dir: TempDir,
}

impl TestRepo {
    fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        std::fs::create_dir_all(dir.path().join("apps")).unwrap();
        std::fs::write(dir.path().join("apps/.gitkeep"), b"").unwrap();
        std::fs::create_dir_all(dir.path().join("public")).unwrap();
        std::fs::write(dir.path().join("public/package.json"), br#"{"name":"app-hub"}"#).unwrap();
        Self { dir }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn add_app(&self, id: &str, name: &str, href: &str) {
        let app = self.path().join("apps").join(id);
        std::fs::create_dir_all(&app).unwrap();
        let manifest = serde_json::json!({
            "name": name,
            "href": href,
            "desc": "A dapp",
            "category": "defi",
            "tags": ["swap"],
            "isVeWorldSupported": true
        });
        std::fs::write(app.join("manifest.json"), manifest.to_string()).unwrap();
        std::fs::write(app.join("logo.png"), png_header(512, 512)).unwrap();
    }

    fn apphub(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_apphub"));
        cmd.arg("--root").arg(self.path());
        for var in [
            "CI",
            "GITHUB_EVENT_NAME",
            "GITHUB_BASE_REF",
            "GITHUB_TOKEN",
            "GITHUB_EVENT_PATH",
            "GITHUB_REPOSITORY",
        ] {
            cmd.env_remove(var);
        }
        cmd
    }

    fn run(&self, args: &[&str]) -> Output {
        self.apphub().args(args).output().expect("failed to run apphub")
    }
}

fn png_header(width: u32, height: u32) -> Vec<u8> {
    let mut out = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    out.extend_from_slice(&13u32.to_be_bytes());
    out.extend_from_slice(b"IHDR");
    out.extend_from_slice(&width.to_be_bytes());
    out.extend_from_slice(&height.to_be_bytes());
    out.extend_from_slice(&[8, 6, 0, 0, 0, 0, 0, 0, 0]);
    out
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn git_available() -> bool {
    Command::new("git").arg("--version").output().is_ok()
}

#[test]
fn test_help_command() {
    let output = Command::new(env!("CARGO_BIN_EXE_apphub"))
        .arg("--help")
        .output()
        .expect("failed to run apphub");
    assert!(output.status.success());
    let stdout = stdout(&output);
    assert!(stdout.contains("Usage:"));
    assert!(stdout.contains("validate"));
    assert!(stdout.contains("pack"));
}

#[test]
fn test_unknown_subcommand_is_usage_error() {
    let output = Command::new(env!("CARGO_BIN_EXE_apphub"))
        .arg("publish")
        .output()
        .expect("failed to run apphub");
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_validate_passes() {
    let repo = TestRepo::new();
    repo.add_app("io.a.app", "A", "https://a.io");
    repo.add_app("io.b.app", "B", "https://b.io");

    let output = repo.run(&["validate"]);
    assert!(output.status.success(), "{}", stdout(&output));
    assert!(stdout(&output).contains("Validation passed, processed 2 apps. Congrats!"));
}

#[test]
fn test_validate_reports_first_failure() {
    let repo = TestRepo::new();
    repo.add_app("io.a.app", "A", "https://a.io");
    repo.add_app("io.b.app", "B", "https://b.io");
    std::fs::remove_file(repo.path().join("apps/io.b.app/logo.png")).unwrap();

    let output = repo.run(&["validate"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("Validation failed: check io.b.app -> logo.png is required"));
}

#[test]
fn test_validate_duplicate_domain_name() {
    let repo = TestRepo::new();
    repo.add_app("io.a.app", "Swap", "https://example.com");
    repo.add_app("io.b.app", "Swap", "https://www.example.com/b");

    let output = repo.run(&["validate"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("duplicate name \"Swap\" for domain example.com"));

    std::fs::write(
        repo.path().join("apphub.toml"),
        "[schema]\nenforce_domain_uniqueness = false\n",
    )
    .unwrap();
    let output = repo.run(&["validate"]);
    assert!(output.status.success(), "{}", stdout(&output));
}

#[test]
fn test_ds_store_rejected_in_ci() {
    let repo = TestRepo::new();
    repo.add_app("io.a.app", "A", "https://a.io");
    std::fs::write(repo.path().join("apps/io.a.app/.DS_Store"), b"").unwrap();

    assert!(repo.run(&["validate"]).status.success());

    let output = repo.apphub().env("CI", "true").arg("validate").output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains(".DS_Store is not allowed"));
}

#[test]
fn test_pack_requires_template() {
    if !git_available() {
        return;
    }
    let repo = TestRepo::new();
    std::fs::remove_file(repo.path().join("public/package.json")).unwrap();

    let output = repo.run(&["pack", "--no-compress"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("Pack apps failed: failed to copy package template"));
}

#[test]
fn test_pack_from_git_history() {
    if !git_available() {
        return;
    }
    let repo = TestRepo::new();
    repo.add_app("io.a.app", "A", "https://a.io");

    let git = |args: &[&str]| {
        let status = Command::new("git")
            .args([
                "-c",
                "user.name=apphub",
                "-c",
                "user.email=apphub@example.com",
                "-c",
                "commit.gpgsign=false",
            ])
            .args(args)
            .current_dir(repo.path())
            .output()
            .unwrap()
            .status;
        assert!(status.success(), "git {args:?}");
    };
    git(&["init", "-q"]);
    git(&["add", "."]);
    git(&["commit", "-q", "-m", "add io.a.app"]);

    let output = repo.run(&["pack", "--no-compress"]);
    assert!(output.status.success(), "{}", stdout(&output));
    assert!(stdout(&output).contains("Packed 1 apps. Congrats!"));

    let dist = repo.path().join("dist");
    let index: serde_json::Value =
        serde_json::from_slice(&std::fs::read(dist.join("index.json")).unwrap()).unwrap();
    assert_eq!(index[0]["id"], "io.a.app");
    assert!(index[0]["createAt"].as_i64().unwrap() > 0);
    assert!(dist.join("sync.json").exists());
    assert!(dist.join("imgs/io.a.app.png").exists());
    assert!(dist.join("package.json").exists());
}
