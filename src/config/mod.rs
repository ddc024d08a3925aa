//! Configuration management

mod cli;
mod file;

pub use cli::Cli;
pub use file::{CleanupSection, FileConfig};

use crate::classify::CategoryRules;
use crate::types::{default_ignore_patterns, OrganizeOptions, SortError};
use std::path::PathBuf;

/// Validated configuration for one CLI run
#[derive(Debug, Clone)]
pub struct Config {
    /// Source directory
    pub source: PathBuf,

    /// Destination root
    pub destination: PathBuf,

    /// Engine options after merging file and flags
    pub options: OrganizeOptions,

    /// Extension table
    pub rules: CategoryRules,

    /// Emit JSON events instead of the spinner
    pub json: bool,

    /// Show the progress spinner
    pub show_progress: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: PathBuf::new(),
            destination: PathBuf::new(),
            options: OrganizeOptions::default(),
            rules: CategoryRules::default(),
            json: false,
            show_progress: true,
        }
    }
}

impl Config {
    /// Merge a config file with command-line flags; flags win
    pub fn from_parts(cli: Cli, file: FileConfig) -> Self {
        let mut ignore_patterns = file
            .cleanup
            .ignore_patterns
            .clone()
            .unwrap_or_else(default_ignore_patterns);
        ignore_patterns.extend(cli.ignore);

        let options = OrganizeOptions {
            recursive: switch(cli.recursive, cli.no_recursive, file.recursive, false),
            dry_run: cli.dry_run,
            delete_source: switch(cli.delete_source, cli.keep_source, file.delete_source, false),
            category_filter: cli.category,
            cleanup_enabled: switch(cli.cleanup, cli.no_cleanup, file.cleanup.enabled, true),
            cleanup_recursive: switch(
                cli.recursive_cleanup,
                cli.no_recursive_cleanup,
                file.cleanup.recursive,
                true,
            ),
            ignore_patterns,
            duplicate_policy: cli
                .on_duplicate
                .or(file.duplicate_policy)
                .unwrap_or_default(),
            workers: cli.threads.or(file.workers).unwrap_or(1),
        };

        Self {
            source: cli.source,
            destination: cli.destination,
            options,
            rules: file.category_rules(),
            json: cli.json,
            show_progress: !cli.no_progress && !cli.json,
        }
    }

    /// Validate configuration
    ///
    /// Checks what can be checked without touching the disk beyond the
    /// source; the engine re-validates the pair when it is built.
    pub fn validate(&self) -> Result<(), SortError> {
        if !self.source.exists() {
            return Err(SortError::Config(format!(
                "Source path does not exist: {}",
                self.source.display()
            )));
        }

        if !self.source.is_dir() {
            return Err(SortError::Config(format!(
                "Source path is not a directory: {}",
                self.source.display()
            )));
        }

        if self.source == self.destination {
            return Err(SortError::Config(
                "Source and destination cannot be the same".to_string(),
            ));
        }

        if self.options.workers == 0 {
            return Err(SortError::Config(
                "Thread count must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// Resolve an on/off flag pair: either flag beats the file, the file beats
/// the default
fn switch(on: bool, off: bool, file: Option<bool>, default: bool) -> bool {
    if on {
        true
    } else if off {
        false
    } else {
        file.unwrap_or(default)
    }
}

impl TryFrom<Cli> for Config {
    type Error = SortError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };

        let config = Config::from_parts(cli, file);
        config.validate()?;
        Ok(config)
    }
}
