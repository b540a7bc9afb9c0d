use clap::Parser;

mod cli;
mod commands;
mod domain;
mod services;

pub use cli::{Cli, Commands};
pub use commands::{handle_admin_commands, handle_build_commands};
pub use domain::models::{BuildRecord, CleanReport, Overrides, ProfileItem};
pub use services::config::{load_project, render_preset, Project};
pub use services::discovery::discover_sources;
pub use services::doctor::doctor;
pub use services::output::{print_json, print_one, print_out};
pub use services::patch::apply_patches;
pub use services::pipeline::{plan, run_build, BuildRequest};
pub use services::storage::{audit, clear_state, load_state};

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("EMKIT_LOG", level))
        .format_timestamp(None)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Commands::Init { .. } | Commands::Validate | Commands::Doctor => {
            handle_admin_commands(&cli)
        }
        _ => {
            let project = load_project(&cli.config)?;
            handle_build_commands(&cli, &project)
        }
    }
}
