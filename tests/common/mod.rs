#![allow(dead_code)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const LOADER_BEFORE: &str =
    r#"var attrs={"alpha":!!HEAP32[a>>2],"stencil":!!HEAP32[a+(8>>2)],"antialias":!!HEAP32[a+(12>>2)]};"#;

const FAKE_EMCC: &str = r##"#!/bin/sh
dir="$(cd "$(dirname "$0")" && pwd)"
printf '%s\n' "$@" > "$dir/args.txt"
pwd > "$dir/cwd.txt"
out=""
prev=""
for a in "$@"; do
  if [ "$prev" = "-o" ]; then out="$a"; fi
  prev="$a"
done
if [ -n "$FAKE_EMCC_EXIT" ]; then
  exit "$FAKE_EMCC_EXIT"
fi
cat "$dir/loader.js" > "$out"
"##;

const CONFIG: &str = r#"compiler = "@COMPILER@"
output = "../public/editor.js"
std = "c++17"
libraries = ["embind"]
defines = ["EMSCRIPTEN=1"]
default_profile = "release"

[features]
allow_memory_growth = true
webgl = 2
exported_functions = ["_malloc", "_free"]

[profiles.debug]
debug_info = true
assertions = true
exceptions = true
defines = ["GK_CONF_DEBUG=1"]

[profiles.release]
opt_level = "3"
rtti = false
exceptions = false
defines = ["GK_CONF_DIST=1"]

[[patches]]
find = '"stencil":!!HEAP32[a+(8>>2)],"antialias"'
replace = '"stencil":!!HEAP32[a+(8>>2)],"desynchronized":true,"antialias"'
"#;

pub struct TestEnv {
    _tmp: TempDir,
    pub home: PathBuf,
    /// Directory holding `emkit.toml` and the C++ sources.
    pub project: PathBuf,
    pub tools: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let home = tmp.path().join("home");
        fs::create_dir_all(&home).expect("create isolated home");

        let tools = tmp.path().join("tools");
        let compiler = make_fake_compiler(&tools);
        let project = make_fixture_project(tmp.path(), &compiler);

        Self {
            _tmp: tmp,
            home,
            project,
            tools,
        }
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("emkit");
        cmd.current_dir(&self.project)
            .env("HOME", &self.home)
            .env_remove("EMKIT_CONFIG")
            .env_remove("EMKIT_COMPILER")
            .env_remove("EMKIT_LOG")
            .env_remove("FAKE_EMCC_EXIT");
        cmd
    }

    pub fn run_json(&self, args: &[&str]) -> Value {
        let mut cmd = self.cmd();
        let out = cmd
            .arg("--json")
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }

    pub fn output(&self) -> PathBuf {
        self.project.join("../public/editor.js")
    }

    /// Arguments the fake compiler received on its last run, one per line.
    pub fn compiler_args(&self) -> Vec<String> {
        fs::read_to_string(self.tools.join("args.txt"))
            .expect("fake compiler ran")
            .lines()
            .map(str::to_string)
            .collect()
    }

    pub fn compiler_cwd(&self) -> PathBuf {
        PathBuf::from(
            fs::read_to_string(self.tools.join("cwd.txt"))
                .expect("fake compiler ran")
                .trim(),
        )
    }

    pub fn compiler_ran(&self) -> bool {
        self.tools.join("args.txt").exists()
    }
}

fn make_fake_compiler(tools: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    fs::create_dir_all(tools).expect("create tools dir");
    let script = tools.join("fake-emcc");
    fs::write(&script, FAKE_EMCC).expect("write fake compiler");
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).expect("chmod fake compiler");
    fs::write(tools.join("loader.js"), LOADER_BEFORE).expect("write loader template");
    script
}

fn make_fixture_project(base: &Path, compiler: &Path) -> PathBuf {
    let project = base.join("wasm-src");
    let files = [
        "export.cpp",
        "editor/scene.cpp",
        "editor/scene.h",
        "math/vec2.c",
        "renderer/gl.cc",
        "debug/graphick-debug/src/main.cpp",
        "debugger.cpp",
    ];
    for f in files {
        let p = project.join(f);
        fs::create_dir_all(p.parent().expect("has parent")).expect("create source dir");
        fs::write(&p, format!("// {}\n", f)).expect("write source");
    }
    let config = CONFIG.replace("@COMPILER@", compiler.to_str().expect("utf8 path"));
    fs::write(project.join("emkit.toml"), config).expect("write config");
    project
}
