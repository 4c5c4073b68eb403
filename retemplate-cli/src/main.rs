use anyhow::{Context, Result};
use clap::Parser;
use retemplate_core::{Config, OutputFormatter, ValidationError, VersionResult};
use std::io::{self, IsTerminal};
use std::path::Path;
use std::process;

mod check;
mod cli;
mod rename;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    // Handle -C directory flag
    if let Some(ref dir) = cli.directory {
        std::env::set_current_dir(dir)
            .with_context(|| format!("Failed to change to directory: {}", dir.display()))
            .unwrap_or_else(|e| {
                eprintln!("Error: {e:#}");
                process::exit(2);
            });
    }

    let result = run(cli);

    match result {
        Ok(()) => process::exit(0),
        Err(e) => {
            eprintln!("Error: {e:#}");

            // Invalid parameters are the caller's fault, everything else is ours
            let exit_code = if e.downcast_ref::<ValidationError>().is_some() {
                2
            } else {
                3
            };

            process::exit(exit_code);
        },
    }
}

fn run(cli: Cli) -> Result<()> {
    let root = std::env::current_dir().context("Failed to determine current directory")?;

    match cli.command {
        Commands::Version => handle_version(),
        Commands::Check { target } => check::handle_check(target),
        Commands::Rename { target, dry_run } => {
            let config = load_config(&root, cli.config.as_deref())?;
            let use_color = !cli.no_color
                && config
                    .defaults
                    .use_color
                    .unwrap_or_else(|| io::stdout().is_terminal());
            rename::handle_rename(&root, target, dry_run, &config, use_color)
        },
    }
}

fn load_config(root: &Path, explicit: Option<&Path>) -> Result<Config> {
    match explicit {
        Some(path) => Config::load_from_path(&root.join(path)),
        None => Config::load(root),
    }
}

fn handle_version() -> Result<()> {
    let version_result = VersionResult {
        name: "retemplate".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    println!("{}", version_result.format_summary());
    Ok(())
}
