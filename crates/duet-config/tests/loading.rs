//! Tests for layered config loading and the I/O entry point.

use std::fs;
use std::path::PathBuf;

use duet_config::{
    BuildEnv, ConfigDiscovery, ConfigError, EnvValues, Mode, PluginDescriptor, load_profiles,
};
use serial_test::serial;
use tempfile::TempDir;

fn write_project(dir: &TempDir, toml: &str) {
    fs::write(dir.path().join("duet.toml"), toml).expect("write config");
    fs::write(
        dir.path().join("package.json"),
        r#"{ "name": "web", "dependencies": { "react": "^16.13.1", "express": "^4.17.1" } }"#,
    )
    .expect("write manifest");
}

#[test]
#[serial]
fn env_vars_override_file() {
    let dir = TempDir::new().expect("tempdir");
    write_project(
        &dir,
        r#"
[client]
public_path = "/from-file/"
output_dir = "build/client"
"#,
    );

    unsafe {
        std::env::set_var("DUETTEST_CLIENT__PUBLIC_PATH", "/from-env/");
    }
    let config = ConfigDiscovery::new(dir.path())
        .with_env_prefix("DUETTEST_")
        .load();
    unsafe {
        std::env::remove_var("DUETTEST_CLIENT__PUBLIC_PATH");
    }

    let config = config.expect("load");
    assert_eq!(config.client.public_path, "/from-env/");
    assert_eq!(config.client.output_dir, PathBuf::from("build/client"));
}

#[test]
#[serial]
fn mode_overrides_apply_after_layering() {
    let dir = TempDir::new().expect("tempdir");
    write_project(
        &dir,
        r#"
[server]
internal_packages = "^@acme/"

[profiles.production.client]
public_path = "https://cdn.example.com/static/"
"#,
    );

    let config = ConfigDiscovery::new(dir.path())
        .load_with_profile("production")
        .expect("load");
    assert_eq!(config.client.public_path, "https://cdn.example.com/static/");
    assert_eq!(config.server.internal_packages, "^@acme/");
}

#[test]
#[serial]
fn load_profiles_reads_manifest_and_node_modules() {
    let dir = TempDir::new().expect("tempdir");
    write_project(
        &dir,
        r#"
[cdn]
packages = ["react"]
"#,
    );
    fs::create_dir_all(dir.path().join("node_modules/pg")).expect("node_modules");

    let config = ConfigDiscovery::new(dir.path()).load().expect("load");
    let env = BuildEnv::from_pairs([
        ("NODE_ENV", "production"),
        ("BASE_URL", "https://x.com"),
        ("SERVICE_NAME", "web"),
        ("DB_PASSWORD", "secret"),
    ]);
    let pair = load_profiles(&config, &env).expect("profiles");

    assert_eq!(pair.client.mode, Mode::Production);
    assert_eq!(pair.client.output.path, dir.path().join("dist/client"));
    assert_eq!(pair.client.cdn_scripts.len(), 1);
    assert_eq!(pair.client.cdn_scripts[0].version, "16.13.1");

    let EnvValues::Literals(values) = &pair.client.env.values else {
        panic!("client env must be literals");
    };
    assert!(!values.contains_key("DB_PASSWORD"));
    assert_eq!(values["SERVICE_NAME"], "\"web\"");

    let externals = pair.server.externals_policy().expect("compile").expect("rule");
    assert!(externals.is_external("pg"));
    assert!(externals.is_external("express"));

    assert!(matches!(
        pair.client.plugin("favicon"),
        Some(PluginDescriptor::Favicon { title, .. }) if title == "web"
    ));
}

#[test]
#[serial]
fn missing_manifest_is_fatal() {
    let dir = TempDir::new().expect("tempdir");
    let config = ConfigDiscovery::new(dir.path()).load().expect("load");

    let err = load_profiles(&config, &BuildEnv::default()).unwrap_err();
    assert!(matches!(err, ConfigError::ManifestNotFound(_)));
}

#[test]
#[serial]
fn server_chunk_limit_cannot_be_raised_from_file() {
    let dir = TempDir::new().expect("tempdir");
    write_project(&dir, "[server]\nmax_chunks = 2\n");

    let err = ConfigDiscovery::new(dir.path()).load().unwrap_err();
    assert!(matches!(err, ConfigError::Load(_)));
}
