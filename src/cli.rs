//! CLI argument parsing module for autobump

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Pin-aware package update publisher
#[derive(Parser, Debug, Clone)]
#[command(
    name = "autobump",
    version,
    about = "Publish proposed package updates as branches and pull requests"
)]
pub struct CliArgs {
    /// Catalog checkout directory (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Read update proposals from this file instead of stdin
    #[arg(short = 'i', long)]
    pub input: Option<PathBuf>,

    // General options
    /// Dry run mode - report what would be published without running
    /// any external command
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long)]
    pub quiet: bool,

    // Package filters
    /// Exclude specific packages (can be specified multiple times)
    #[arg(long, action = ArgAction::Append)]
    pub exclude: Vec<String>,

    /// Publish only specific packages (can be specified multiple times)
    #[arg(long, action = ArgAction::Append)]
    pub only: Vec<String>,

    // Output options
    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,

    // Repository options
    /// Base branch updates fork from
    #[arg(long, default_value = "master")]
    pub base: String,

    /// Remote the update branches are pushed to
    #[arg(long, default_value = "origin")]
    pub remote: String,

    /// Clone the catalog from this URL when the directory is not yet a
    /// repository
    #[arg(long)]
    pub clone_url: Option<String>,

    // Publish options
    /// Command template run to apply a bump; supports {package}, {old}
    /// and {new} placeholders
    #[arg(long)]
    pub apply: Option<String>,

    /// Forge credential (default: GH_TOKEN environment variable)
    #[arg(long)]
    pub token: Option<String>,
}

impl CliArgs {
    /// Check if a package should be processed based on filters
    pub fn should_process_package(&self, name: &str) -> bool {
        // If --only is specified, only process those packages
        if !self.only.is_empty() {
            return self.only.iter().any(|p| p == name);
        }
        // If --exclude is specified, skip those packages
        if self.exclude.iter().any(|p| p == name) {
            return false;
        }
        true
    }

    /// Forge credential: the flag value first, then the GH_TOKEN
    /// environment variable
    pub fn resolve_token(&self) -> Option<String> {
        self.token
            .clone()
            .or_else(|| std::env::var("GH_TOKEN").ok())
    }
}
