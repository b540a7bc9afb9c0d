use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_FILE: &str = "emkit.toml";

#[derive(Parser, Debug)]
#[command(name = "emkit", version, about = "Emscripten build driver")]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(
        long,
        global = true,
        env = "EMKIT_CONFIG",
        default_value = DEFAULT_CONFIG_FILE,
        help = "Project config file (emkit.toml)"
    )]
    pub config: PathBuf,
    #[arg(
        long,
        global = true,
        env = "EMKIT_COMPILER",
        help = "Override the compiler binary from the config"
    )]
    pub compiler: Option<String>,
    #[arg(short, long, global = true, action = ArgAction::Count, help = "Raise log verbosity (-v, -vv)")]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Discover sources, invoke the compiler, then patch the loader.
    Build {
        #[arg(long)]
        profile: Option<String>,
        #[arg(long, default_value_t = false, help = "Print the command without running it")]
        dry_run: bool,
        #[arg(long, default_value_t = false, help = "Skip loader patches")]
        no_patch: bool,
        #[arg(long, default_value_t = false, help = "Skip when sources and flags are unchanged")]
        if_changed: bool,
        #[arg(long = "define", value_name = "NAME[=VALUE]")]
        defines: Vec<String>,
        #[arg(long = "flag", value_name = "FLAG", allow_hyphen_values = true)]
        flags: Vec<String>,
    },
    /// List the source files that would be compiled.
    Sources,
    /// Print the assembled compiler command.
    Flags {
        #[arg(long)]
        profile: Option<String>,
    },
    /// Apply the configured loader patches to an existing output.
    Patch {
        #[arg(long, help = "Patch this file instead of the configured targets")]
        file: Option<PathBuf>,
    },
    Profiles,
    Status,
    Clean,
    /// Write a starter config file.
    Init {
        #[arg(long, value_enum, default_value_t = Preset::Editor)]
        preset: Preset,
        #[arg(long, default_value_t = false)]
        force: bool,
    },
    Validate,
    Doctor,
}

#[derive(Clone, Debug, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Single-threaded ES6 module with the desynchronized context patch.
    Editor,
    /// Pthreads + SIMD build exported as `createModule`.
    Threaded,
}
