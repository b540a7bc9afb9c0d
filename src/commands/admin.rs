use crate::*;

pub fn handle_admin_commands(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Init { preset, force } => {
            let path = &cli.config;
            if path.exists() && !force {
                anyhow::bail!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                );
            }
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, render_preset(preset)?)?;
            audit(
                "init",
                serde_json::json!({"config": path.display().to_string(), "preset": preset}),
            );
            print_one(
                cli.json,
                serde_json::json!({"config": path.display().to_string(), "preset": preset}),
                |_| format!("wrote {}", path.display()),
            )?;
        }
        Commands::Validate => {
            let project = load_project(&cli.config)?;
            let (name, _) = project.profile(None)?;
            print_one(
                cli.json,
                serde_json::json!({
                    "config": project.config_path.display().to_string(),
                    "default_profile": name,
                    "patches": project.config.patches.len(),
                }),
                |_| "config valid".to_string(),
            )?;
        }
        Commands::Doctor => {
            let overrides = Overrides {
                compiler: cli.compiler.clone(),
                ..Overrides::default()
            };
            let report = doctor(&cli.config, &overrides);
            if cli.json {
                print_json(report)?;
            } else {
                println!("overall: {}", report.overall);
                for c in report.checks {
                    println!("{}\t{}", c.name, c.status);
                }
            }
        }
        _ => anyhow::bail!("build commands need a loaded project"),
    }
    Ok(())
}
