use clap::builder::FalseyValueParser;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Turn a project template into your own project by renaming its module,
/// package directories, and placeholder words
#[derive(Parser, Debug)]
#[command(name = "retemplate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR", value_parser = FalseyValueParser::new())]
    pub no_color: bool,

    /// Run as if started in <path> instead of the current working directory
    #[arg(short = 'C', global = true, value_name = "PATH")]
    pub directory: Option<PathBuf>,

    /// Load configuration from this file instead of .retemplate/config.toml
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Target names shared by `rename` and `check`
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// New project name (letters, digits, underscores), e.g. MyLibrary
    #[arg(long, env = "RETEMPLATE_PROJECT_NAME")]
    pub project_name: Option<String>,

    /// New package namespace, e.g. org.example.mylib
    #[arg(long, env = "RETEMPLATE_PACKAGE_NAME")]
    pub package_name: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rename the template: module directory, package directories, and file contents
    Rename {
        #[command(flatten)]
        target: TargetArgs,

        /// Show what would change without touching the project
        #[arg(long, env = "RETEMPLATE_DRY_RUN", value_parser = FalseyValueParser::new())]
        dry_run: bool,
    },

    /// Validate the names and show what a rename would derive from them
    Check {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Show version information
    Version,
}
