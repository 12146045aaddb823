//! Command-line interface entry point for `StudyHub`

mod args;
mod commands;

use args::{Cli, Command};
use clap::Parser;
use std::path::PathBuf;
use studyhub::config::Config;
use studyhub::logger::{enable_debug, enable_verbose, init_file_logging, set_level, Level};
use studyhub::{error, info};

fn main() {
    let args = Cli::parse();

    // Load configuration once at startup and apply CLI overrides to it
    let mut config = Config::load();
    let defaults = Config::from_defaults();
    config.apply_overrides(&args.to_config_overrides());

    // CLI flag wins over config logging.level; fallback warn
    let mut level = args
        .log_level
        .map(Level::from)
        .or_else(|| config.logging.level.parse().ok())
        .unwrap_or(Level::Warn);
    if args.debug_flag || level == Level::Debug {
        level = Level::Debug;
        enable_debug();
    }

    let verbose = args.verbose || config.logging.verbose;
    if verbose {
        enable_verbose();
    }
    set_level(level);

    let config_log_path = (!config.logging.file.is_empty()).then(|| PathBuf::from(&config.logging.file));
    if let Some(log_path) = args.log_file.as_ref().or(config_log_path.as_ref()) {
        let display_path = log_path.to_string_lossy();
        if init_file_logging(log_path) {
            if verbose {
                eprintln!("✓ File logging initialized at: {display_path}");
            } else {
                info!("File logging initialized at: {display_path}");
            }
        } else {
            eprintln!("✗ Failed to initialize file logging at: {display_path}");
        }
    }

    let result = match args.command {
        Command::Config { subcommand } => commands::config::run(subcommand, &mut config, &defaults),
        Command::Syllabus { subcommand } => commands::syllabus::run(subcommand, &config),
        Command::Todo { subcommand } => commands::todo::run(subcommand, &config),
        Command::Progress {
            key,
            mark,
            topic,
            undo,
        } => {
            let mark = mark.zip(topic).map(|(subject, topic)| commands::progress::MarkRequest {
                subject,
                topic,
                done: !undo,
            });
            commands::progress::run(&key, mark, &config)
        }
        Command::Report {
            key,
            format,
            output,
        } => commands::report::run(&key, &format, output.as_deref(), &config),
        Command::Review { subcommand } => commands::review::run(subcommand, &config),
        Command::Simulate {
            frames,
            seed,
            width,
            height,
            icons,
            particles,
            trace,
        } => {
            let options = commands::simulate::SimulateOptions {
                frames,
                seed,
                width,
                height,
                icons,
                particles,
                trace,
            };
            commands::simulate::run(&options, &config)
        }
    };

    if let Err(e) = result {
        error!("{e}");
        eprintln!("✗ {e}");
        std::process::exit(1);
    }
}
