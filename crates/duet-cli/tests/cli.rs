//! End-to-end tests for the `duet` binary.

use std::fs;
use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

const MANIFEST: &str = r#"{
  "name": "web",
  "dependencies": { "react": "^16.13.1", "express": "^4.17.1" }
}"#;

fn project() -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("package.json"), MANIFEST).expect("manifest");
    dir
}

fn touch(root: &Path, rel: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().expect("parent")).expect("dirs");
    fs::write(path, "").expect("touch");
}

fn duet(root: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("duet");
    cmd.arg("--root")
        .arg(root)
        .arg("--no-color")
        .env_remove("RUST_LOG")
        .env("NODE_ENV", "production")
        .env("SERVICE_NAME", "web")
        .env("BASE_URL", "https://example.com")
        .env("DB_PASSWORD", "hunter2");
    cmd
}

fn stdout_json(cmd: &mut Command) -> Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).expect("stdout is JSON")
}

#[test]
fn profile_prints_client_json() {
    let dir = project();
    let json = stdout_json(duet(dir.path()).args(["profile", "--target", "client"]));

    assert_eq!(json["name"], "client");
    assert_eq!(json["target"], "web");
    assert_eq!(json["mode"], "production");
    assert_eq!(json["output"]["filename"], "[name].[hash:8].js");
    assert_eq!(json["env"]["values"]["kind"], "literals");
    assert_eq!(json["env"]["values"]["values"]["SERVICE_NAME"], "\"web\"");
    assert!(json["env"]["values"]["values"].get("DB_PASSWORD").is_none());
}

#[test]
fn profile_all_prints_both_profiles() {
    let dir = project();
    let json = stdout_json(duet(dir.path()).arg("profile"));

    assert_eq!(json["client"]["target"], "web");
    assert_eq!(json["server"]["target"], "node");
    assert_eq!(json["server"]["output"]["filename"], "server.js");
    assert_eq!(json["server"]["env"]["values"]["kind"], "pass_through");
}

#[test]
fn profile_honors_config_file_and_mode_overrides() {
    let dir = project();
    fs::write(
        dir.path().join("duet.toml"),
        r#"
[client]
public_path = "/assets/"

[profiles.production.client]
public_path = "https://cdn.example.com/assets/"
"#,
    )
    .expect("config");

    let json = stdout_json(duet(dir.path()).args(["profile", "-t", "client"]));
    assert_eq!(json["output"]["public_path"], "https://cdn.example.com/assets/");

    let json = stdout_json(
        duet(dir.path())
            .env("NODE_ENV", "development")
            .args(["profile", "-t", "client"]),
    );
    assert_eq!(json["output"]["public_path"], "/assets/");
    assert_eq!(json["devtool"], "cheap-module-source-map");
}

#[test]
fn missing_manifest_fails_with_hint() {
    let dir = TempDir::new().expect("tempdir");
    duet(dir.path())
        .arg("profile")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Package manifest not found"))
        .stderr(predicate::str::contains("--root"));
}

#[test]
fn check_passes_for_complete_project() {
    let dir = project();
    for file in [
        "src/client/index.tsx",
        "src/server/index.ts",
        "tsconfig.json",
        "src/client/favicon.png",
    ] {
        touch(dir.path(), file);
    }

    duet(dir.path())
        .arg("check")
        .assert()
        .success()
        .stderr(predicate::str::contains("Configuration is valid"));
}

#[test]
fn check_reports_missing_entry() {
    let dir = project();
    touch(dir.path(), "tsconfig.json");
    touch(dir.path(), "src/client/favicon.png");

    duet(dir.path())
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("index.tsx"));
}

#[test]
fn check_rejects_hashed_server_filename() {
    let dir = project();
    fs::write(
        dir.path().join("duet.toml"),
        "[server]\nfilename = \"server.[hash].js\"\n",
    )
    .expect("config");

    duet(dir.path()).arg("check").assert().failure();
}

#[test]
fn plan_write_emits_stats_manifest() {
    let dir = project();
    let modules = dir.path().join("modules.json");
    fs::write(
        &modules,
        r#"[
  { "id": "/app/src/client/index.tsx", "source": "render()", "origin": { "entry": "main" } },
  { "id": "/app/node_modules/react/index.js", "source": "react", "origin": { "entry": "main" } },
  { "id": "/app/src/client/about.tsx", "source": "about", "origin": { "dynamic": "about" } }
]"#,
    )
    .expect("modules");

    let json = stdout_json(
        duet(dir.path())
            .args(["plan", "--write", "--modules"])
            .arg(&modules),
    );
    let chunks = json["chunks"].as_array().expect("chunks");
    assert_eq!(chunks.len(), 3);

    let stats_path = dir.path().join("dist/client/stats.json");
    let stats: Value =
        serde_json::from_str(&fs::read_to_string(stats_path).expect("stats written")).expect("json");
    assert_eq!(stats["publicPath"], "/static/");
    assert!(stats["assetsByChunkName"]["vendor"].is_array());
    assert!(stats["assetsByChunkName"]["main"].is_array());
}

#[test]
fn plan_server_collapses_to_one_file() {
    let dir = project();
    let modules = dir.path().join("modules.json");
    fs::write(
        &modules,
        r#"[
  { "id": "/app/src/server/index.ts", "source": "listen()", "origin": { "entry": "server" } },
  { "id": "/app/src/server/a.ts", "source": "a", "origin": { "dynamic": "a" } },
  { "id": "/app/src/server/b.ts", "source": "b", "origin": { "dynamic": "b" } },
  { "id": "/app/node_modules/express/index.js", "source": "express", "origin": { "entry": "server" } }
]"#,
    )
    .expect("modules");

    let json = stdout_json(
        duet(dir.path())
            .args(["plan", "--target", "server", "--modules"])
            .arg(&modules),
    );
    let chunks = json["chunks"].as_array().expect("chunks");
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0]["file"], "server.js");
    assert_eq!(chunks[0]["modules"].as_array().expect("modules").len(), 3);
    assert_eq!(json["externals"], serde_json::json!(["express"]));
}

#[test]
fn plan_rejects_malformed_listing() {
    let dir = project();
    let modules = dir.path().join("modules.json");
    fs::write(&modules, "{ not json").expect("modules");

    duet(dir.path())
        .args(["plan", "--modules"])
        .arg(&modules)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid module listing"));
}
