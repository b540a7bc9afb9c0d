use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

fn run_help(home: &TempDir, args: &[&str]) {
    let mut cmd = cargo_bin_cmd!("emkit");
    cmd.env("HOME", home.path())
        .current_dir(home.path())
        .args(args)
        .arg("--help")
        .assert()
        .success();
}

#[test]
fn every_cli_command_has_help_path() {
    let home = TempDir::new().expect("temp home");

    // top-level
    run_help(&home, &[]);

    // build commands
    run_help(&home, &["build"]);
    run_help(&home, &["sources"]);
    run_help(&home, &["flags"]);
    run_help(&home, &["patch"]);
    run_help(&home, &["profiles"]);
    run_help(&home, &["status"]);
    run_help(&home, &["clean"]);

    // admin commands
    run_help(&home, &["init"]);
    run_help(&home, &["validate"]);
    run_help(&home, &["doctor"]);
}
