#![cfg(unix)]

mod common;

use assert_cmd::cargo::cargo_bin_cmd;
use common::TestEnv;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

#[test]
fn sources_lists_in_extension_order_without_debug() {
    let env = TestEnv::new();
    env.cmd()
        .arg("sources")
        .assert()
        .success()
        .stdout("editor/scene.cpp\nexport.cpp\nmath/vec2.c\nrenderer/gl.cc\n");
}

#[test]
fn flags_prints_program_then_args() {
    let env = TestEnv::new();
    env.cmd()
        .args(["flags", "--profile", "release"])
        .assert()
        .success()
        .stdout(contains("fake-emcc\neditor/scene.cpp\n"))
        .stdout(contains("-sMIN_WEBGL_VERSION=2\n-sMAX_WEBGL_VERSION=2\n-sUSE_WEBGL2\n"))
        .stdout(contains("-DGK_CONF_DIST=1\n-O3\n"));
}

#[test]
fn profiles_marks_default() {
    let env = TestEnv::new();
    env.cmd()
        .arg("profiles")
        .assert()
        .success()
        .stdout(contains("debug\t-O0"))
        .stdout(contains("release (default)\t-O3"));
}

#[test]
fn validate_and_doctor_on_fixture() {
    let env = TestEnv::new();
    env.cmd()
        .arg("validate")
        .assert()
        .success()
        .stdout(contains("config valid"));
    env.cmd()
        .arg("doctor")
        .assert()
        .success()
        .stdout(contains("compiler\tok"))
        .stdout(contains("sources\tok"));
}

#[test]
fn missing_config_points_at_init() {
    let dir = TempDir::new().unwrap();
    cargo_bin_cmd!("emkit")
        .current_dir(dir.path())
        .env_remove("EMKIT_CONFIG")
        .arg("sources")
        .assert()
        .failure()
        .stderr(contains("emkit init"));
}

#[test]
fn init_writes_threaded_preset_and_refuses_overwrite() {
    let dir = TempDir::new().unwrap();
    let home = TempDir::new().unwrap();
    let run = |args: &[&str]| {
        let mut cmd = cargo_bin_cmd!("emkit");
        cmd.current_dir(dir.path())
            .env("HOME", home.path())
            .env_remove("EMKIT_CONFIG")
            .args(args);
        cmd
    };

    run(&["init", "--preset", "threaded"]).assert().success();
    let text = std::fs::read_to_string(dir.path().join("emkit.toml")).unwrap();
    assert!(text.contains("navigator.hardwareConcurrency"));
    assert!(text.contains("createModule"));

    run(&["validate"]).assert().success();
    run(&["init"])
        .assert()
        .failure()
        .stderr(contains("--force"));
    run(&["init", "--force"]).assert().success();
    let text = std::fs::read_to_string(dir.path().join("emkit.toml")).unwrap();
    assert!(text.contains("desynchronized"));
}

#[test]
fn doctor_flags_missing_config() {
    let dir = TempDir::new().unwrap();
    cargo_bin_cmd!("emkit")
        .current_dir(dir.path())
        .env_remove("EMKIT_CONFIG")
        .arg("doctor")
        .assert()
        .success()
        .stdout(contains("config\tmissing"))
        .stdout(contains("overall: needs_attention"));
}

#[test]
fn invalid_config_is_rejected() {
    let env = TestEnv::new();
    std::fs::write(
        env.project.join("emkit.toml"),
        "output = \"out.js\"\nextensions = [\".cpp\"]\n",
    )
    .unwrap();
    env.cmd()
        .arg("validate")
        .assert()
        .failure()
        .stderr(contains("without a leading dot"));
    env.cmd()
        .arg("doctor")
        .assert()
        .success()
        .stdout(contains("config\tinvalid"));
}

#[test]
fn verbose_logs_go_to_stderr() {
    let env = TestEnv::new();
    env.cmd()
        .args(["-v", "--json", "build"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("{"))
        .stderr(contains("compiling 4 sources with profile release"));
}
