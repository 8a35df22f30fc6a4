//! Application flow behind the binary: resolve settings, scan, report.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use yansi::Paint;

use crate::cli::{Cli, Commands, ScanArgs};
use crate::config::Config;
use crate::duplicates::DuplicateFinder;
use crate::error::ExitCode;
use crate::interactive;
use crate::logging::{current_level_name, init_logging};
use crate::output::{console, output_path, write_json_file, JsonReport};
use crate::progress::Progress;
use crate::signal::install_handler;
use crate::APP_NAME;

/// Global flags that shape a run regardless of how scan options were given.
#[derive(Debug, Clone, Copy)]
struct RunFlags<'a> {
    config_path: Option<&'a Path>,
    quiet: bool,
    detailed: bool,
}

/// Run the application for parsed command-line arguments.
///
/// # Errors
///
/// Returns an error for fatal conditions: bad configuration, a missing or
/// unreadable root, a scan interrupted during collection, or a result file
/// that cannot be written. The caller maps these to exit codes.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    init_logging(cli.verbose, cli.quiet);
    if cli.no_color {
        yansi::disable();
    }

    let flags = RunFlags {
        config_path: cli.config.as_deref(),
        quiet: cli.quiet,
        detailed: cli.verbose > 0,
    };

    match cli.command {
        Some(Commands::Config) => show_config(flags.config_path, &cli.scan),
        Some(Commands::Interactive) => run_interactive(flags),
        Some(Commands::Version) => {
            println!("{}", version_banner());
            Ok(ExitCode::Success)
        }
        None if cli.scan.target().is_none() => {
            log::debug!("No directory given, starting interactive mode");
            run_interactive(flags)
        }
        None => run_scan(&cli.scan, flags),
    }
}

fn version_banner() -> String {
    format!(
        "{APP_NAME} v{}\nMade with ❤️ by {}",
        env!("CARGO_PKG_VERSION"),
        env!("CARGO_PKG_AUTHORS")
    )
}

fn show_config(config_path: Option<&Path>, args: &ScanArgs) -> Result<ExitCode> {
    let config = Config::load(config_path, &args.overrides())
        .context("Failed to load configuration")?;

    match config_path.map(Path::to_path_buf).or_else(Config::default_path) {
        Some(path) if path.is_file() => println!("# Loaded from {}", path.display()),
        Some(path) => println!("# No config file at {} (using defaults)", path.display()),
        None => println!("# No config directory available (using defaults)"),
    }
    println!("# Log level: {}", current_level_name());
    print!("{}", config.to_toml()?);
    Ok(ExitCode::Success)
}

fn run_interactive(flags: RunFlags<'_>) -> Result<ExitCode> {
    let defaults = Config::load(flags.config_path, &Default::default())
        .context("Failed to load configuration")?;
    let choices = interactive::prompt(&defaults)?;
    run_scan(
        &choices.args,
        RunFlags {
            detailed: flags.detailed || choices.verbose,
            ..flags
        },
    )
}

fn run_scan(args: &ScanArgs, flags: RunFlags<'_>) -> Result<ExitCode> {
    let config = Config::load(flags.config_path, &args.overrides())
        .context("Failed to load configuration")?;
    let root = args.target().context("No directory to scan was given")?;
    let output = output_path(&config.output_dir, &config.filename);

    if !flags.quiet {
        console::print_banner(&root, config.algorithm, &config.effective_excludes(), &output);
    }

    let shutdown = install_handler()?;
    let finder_config = config
        .finder_config()
        .with_shutdown_flag(shutdown.flag())
        .with_progress_callback(Arc::new(Progress::new(flags.quiet)));
    let finder = DuplicateFinder::new(finder_config);

    let report = finder
        .find_duplicates(&root)
        .with_context(|| format!("Search failed for {}", root.display()))?;

    if report.interrupted {
        eprintln!("{}", "Scan interrupted; no results were written".yellow());
        return Ok(ExitCode::Interrupted);
    }

    if !flags.quiet {
        println!("{}", "Search completed".green());
        console::print_summary(&report);
    }

    let json = JsonReport::new(&report, args.with_stats);
    write_json_file(&json, &output)
        .with_context(|| format!("Failed to save results to {}", output.display()))?;

    if !flags.quiet {
        let saved = format!("Results saved to {}", output.display());
        println!("{}", saved.green());
    }

    if args.terminal {
        println!("\n=== Output Data ===");
        println!("{}", json.to_json_pretty()?);
        println!("===================\n");
    }

    if flags.detailed && !flags.quiet {
        console::print_details(&report);
    }

    if !flags.quiet {
        println!("\n{}", format!("{APP_NAME} Complete!").bold());
    }

    Ok(ExitCode::for_report(&report))
}
