//! Command-line arguments

use crate::types::{Category, DuplicatePolicy};
use clap::Parser;
use std::path::PathBuf;

/// Sort files into category folders
#[derive(Debug, Parser)]
#[command(name = "sortfiles", version, about, long_about = None)]
pub struct Cli {
    /// Directory to organize
    pub source: PathBuf,

    /// Root of the categorized tree
    pub destination: PathBuf,

    /// Descend into subdirectories of the source
    #[arg(short, long)]
    pub recursive: bool,

    /// Only take files directly inside the source, overriding the config file
    #[arg(long, conflicts_with = "recursive")]
    pub no_recursive: bool,

    /// Show what would happen without touching any file
    #[arg(short = 'n', long, visible_alias = "test")]
    pub dry_run: bool,

    /// Move files instead of copying them
    #[arg(long)]
    pub delete_source: bool,

    /// Copy files even if the config file asks for moves
    #[arg(long, conflicts_with = "delete_source")]
    pub keep_source: bool,

    /// Only organize files of this category
    #[arg(short = 't', long = "type", value_enum, visible_alias = "file-type")]
    pub category: Option<Category>,

    /// Remove empty source directories even if the config file disables it
    #[arg(long)]
    pub cleanup: bool,

    /// Leave empty source directories in place
    #[arg(long, conflicts_with = "cleanup")]
    pub no_cleanup: bool,

    /// Clean nested empty directories even if the config file disables it
    #[arg(long)]
    pub recursive_cleanup: bool,

    /// Only clean direct children of the source directory
    #[arg(long, conflicts_with = "recursive_cleanup")]
    pub no_recursive_cleanup: bool,

    /// Directory name pattern cleanup must never remove (repeatable)
    #[arg(long = "ignore", value_name = "PATTERN")]
    pub ignore: Vec<String>,

    /// What to do when a destination holds different content
    #[arg(long, value_enum, value_name = "POLICY")]
    pub on_duplicate: Option<DuplicatePolicy>,

    /// Number of concurrent transfers
    #[arg(short = 'j', long, value_name = "N")]
    pub threads: Option<usize>,

    /// TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Emit progress events as JSON lines on stdout
    #[arg(long)]
    pub json: bool,

    /// Disable the progress spinner
    #[arg(long)]
    pub no_progress: bool,

    /// Log run details to stderr
    #[arg(short, long)]
    pub verbose: bool,
}
