use crate::*;

pub fn handle_build_commands(cli: &Cli, project: &Project) -> anyhow::Result<()> {
    let base_overrides = Overrides {
        compiler: cli.compiler.clone(),
        ..Overrides::default()
    };
    match &cli.command {
        Commands::Build {
            profile,
            dry_run,
            no_patch,
            if_changed,
            defines,
            flags,
        } => {
            let req = BuildRequest {
                profile: profile.clone(),
                dry_run: *dry_run,
                no_patch: *no_patch,
                if_changed: *if_changed,
                overrides: Overrides {
                    defines: defines.clone(),
                    flags: flags.clone(),
                    ..base_overrides
                },
            };
            let report = run_build(project, &req)?;
            if cli.json {
                print_json(report)?;
            } else {
                match report.status.as_str() {
                    "planned" => println!("{}", report.command.display_line()),
                    "up_to_date" => println!("{} is up to date", report.profile),
                    _ => {
                        println!(
                            "built {} ({} sources, profile {})",
                            report.output, report.source_count, report.profile
                        );
                        for p in &report.patches {
                            println!("patch\t{}\t{}", p.status, p.file);
                        }
                    }
                }
            }
        }
        Commands::Sources => {
            let sources = discover_sources(
                &project.source_root(),
                &project.config.extensions,
                &project.config.exclude_prefixes,
            )?;
            print_out(cli.json, &sources, |s| s.clone())?;
        }
        Commands::Flags { profile } => {
            let plan = plan(project, profile.as_deref(), &base_overrides)?;
            if cli.json {
                print_json(plan.command)?;
            } else {
                println!("{}", plan.command.program);
                for a in &plan.command.args {
                    println!("{}", a);
                }
            }
        }
        Commands::Patch { file } => {
            if project.config.patches.is_empty() {
                log::warn!("no patches configured in {}", project.config_path.display());
            }
            let reports = apply_patches(project, file.as_deref())?;
            audit("patch", serde_json::json!({"count": reports.len()}));
            print_out(cli.json, &reports, |r| {
                format!("{}\t{}\t{}", r.status, r.replacements, r.file)
            })?;
        }
        Commands::Profiles => {
            let mut items: Vec<ProfileItem> = project
                .config
                .profiles
                .iter()
                .map(|(name, p)| ProfileItem {
                    name: name.clone(),
                    default: *name == project.config.default_profile,
                    opt_level: p.opt_level.clone(),
                    debug_info: p.debug_info,
                })
                .collect();
            if items.is_empty() {
                items.push(ProfileItem {
                    name: project.config.default_profile.clone(),
                    default: true,
                    opt_level: None,
                    debug_info: false,
                });
            }
            print_out(cli.json, &items, |p| {
                format!(
                    "{}{}\t-O{}",
                    p.name,
                    if p.default { " (default)" } else { "" },
                    p.opt_level.as_deref().unwrap_or("0")
                )
            })?;
        }
        Commands::Status => {
            let state = load_state(project)?;
            let records: Vec<BuildRecord> = state.builds.into_values().collect();
            print_out(cli.json, &records, |r| {
                format!(
                    "{}\t{}\t{}\t{}",
                    r.profile,
                    r.status,
                    r.fingerprint.get(..12).unwrap_or(&r.fingerprint),
                    r.output
                )
            })?;
        }
        Commands::Clean => {
            let output = project.output_path();
            let mut removed = Vec::new();
            let mut candidates = vec![output.clone(), output.with_extension("wasm")];
            if let Some(stem) = output.file_stem() {
                let worker = format!("{}.worker.js", stem.to_string_lossy());
                candidates.push(output.with_file_name(worker));
            }
            for path in candidates {
                if path.is_file() {
                    std::fs::remove_file(&path)?;
                    removed.push(path.display().to_string());
                }
            }
            let cleared_records = clear_state(project)?;
            audit("clean", serde_json::json!({"removed": removed}));
            print_one(
                cli.json,
                CleanReport {
                    removed,
                    cleared_records,
                },
                |r| format!("removed {} files", r.removed.len()),
            )?;
        }
        Commands::Init { .. } | Commands::Validate | Commands::Doctor => {
            anyhow::bail!("admin commands are dispatched before a project is loaded")
        }
    }
    Ok(())
}
