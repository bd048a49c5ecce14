use anyhow::{Context, Result};
use clap::Parser;
use playlist_prep::cache::{IndexCheck, check_indexes, clear_indexes};
use playlist_prep::cli::{Cli, Commands, OutputFormat};
use playlist_prep::config::resolve_settings;
use playlist_prep::indexer::{ensure_volume_root, index_volume};
use playlist_prep::report::{CategoryStatus, VolumeReport};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = parse_cli();
    init_tracing(cli.verbose);

    let settings = resolve_settings(&cli)?;

    match cli.command.clone() {
        Commands::Index {
            root,
            dry_run,
            format,
        } => {
            ensure_volume_root(&root)?;
            let report = index_volume(&root, &settings, dry_run);
            write_index_report(&report, format)?;
        }
        Commands::Clear { root } => {
            ensure_volume_root(&root)?;
            let removed = clear_indexes(&root, &settings)?;
            for path in removed.iter() {
                println!("removed {}", path.display());
            }
            println!("cleared {} cache file(s)", removed.len());
        }
        Commands::Check { root, format } => {
            ensure_volume_root(&root)?;
            let checks = check_indexes(&root, &settings)
                .with_context(|| format!("Failed to check cache files in {}", root.display()))?;
            write_check_report(&checks, format)?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose {
        "playlist_prep=debug"
    } else {
        "playlist_prep=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_cli() -> Cli {
    let args: Vec<String> = std::env::args().collect();
    Cli::parse_from(rewrite_args_for_implicit_index(args))
}

/// `playlist-prep [OPTIONS] <ROOT>` is shorthand for
/// `playlist-prep index [OPTIONS] <ROOT>`. The subcommand goes first so that
/// index options given before the root still parse.
fn rewrite_args_for_implicit_index(mut args: Vec<String>) -> Vec<String> {
    if args.len() <= 1 {
        return args;
    }

    let subcommands = ["index", "clear", "check", "help"];

    let mut idx = 1usize;
    while idx < args.len() {
        let a = args[idx].as_str();
        if a == "--" {
            idx += 1;
            break;
        }

        if a == "--config" || a == "--format" || a == "-f" {
            idx += 2;
            continue;
        }

        if a.starts_with('-') {
            idx += 1;
            continue;
        }

        break;
    }

    if idx < args.len() {
        let token = args[idx].as_str();
        if !subcommands.contains(&token) {
            args.insert(1, "index".to_string());
        }
    }

    args
}

fn write_index_report(report: &VolumeReport, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!("volume root: {}", report.root);
    println!("{}", "-".repeat(40));
    for category in report.categories.iter() {
        let cleaned = category.cleaned.removed_count();
        let duplicates = category.deduplicated.removed_count();
        if cleaned > 0 || duplicates > 0 {
            println!(
                "{}: removed {cleaned} non-audio file(s), {duplicates} duplicate(s)",
                category.category
            );
        }
        let index_name = category
            .index_file
            .as_deref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match category.status {
            CategoryStatus::Indexed => println!(
                "{}: wrote {index_name} ({} tracks)",
                category.category,
                category.tracks.len()
            ),
            CategoryStatus::DryRun => println!(
                "{}: would write {index_name} ({} tracks)",
                category.category,
                category.tracks.len()
            ),
            CategoryStatus::Empty => println!("{}: empty, skipped", category.category),
            CategoryStatus::Missing => println!("{}: folder not found, skipped", category.category),
            CategoryStatus::WriteFailed => println!(
                "{}: failed to write {index_name}: {}",
                category.category,
                category.write_error.as_deref().unwrap_or("unknown error")
            ),
        }
    }
    for failure in report.failures() {
        println!("failed to remove {}: {}", failure.path.display(), failure.reason);
    }
    println!("{}", "-".repeat(40));
    println!("done, indexed {} tracks", report.total_tracks);
    if !report.dry_run {
        println!("the card can now be ejected and inserted into the player");
    }
    Ok(())
}

fn write_check_report(checks: &[IndexCheck], format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(checks)?);
        return Ok(());
    }

    for check in checks {
        if !check.present {
            println!("{}: no cache file", check.category);
            continue;
        }
        println!(
            "{}: {} entries, {} missing",
            check.category,
            check.entries,
            check.missing_tracks.len()
        );
        for track in check.missing_tracks.iter() {
            println!("  missing {track}");
        }
    }
    Ok(())
}
