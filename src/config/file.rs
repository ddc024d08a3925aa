//! TOML configuration file
//!
//! ```toml
//! duplicate_policy = "rename"
//! workers = 4
//! recursive = true
//! delete_source = false
//!
//! [categories]
//! image = ["heic", "raw"]
//! code = ["zig"]
//!
//! [cleanup]
//! enabled = true
//! recursive = true
//! ignore_patterns = [".git", "node_modules"]
//! ```

use crate::classify::CategoryRules;
use crate::types::{Category, DuplicatePolicy, SortError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Settings loaded from a config file; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub duplicate_policy: Option<DuplicatePolicy>,
    pub workers: Option<usize>,
    pub recursive: Option<bool>,
    pub delete_source: Option<bool>,

    /// Extra extensions per category; these override the built-in table
    #[serde(default)]
    pub categories: BTreeMap<Category, Vec<String>>,

    #[serde(default)]
    pub cleanup: CleanupSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CleanupSection {
    pub enabled: Option<bool>,
    pub recursive: Option<bool>,
    pub ignore_patterns: Option<Vec<String>>,
}

impl FileConfig {
    /// Read and parse a config file
    pub fn load(path: &Path) -> Result<Self, SortError> {
        let content = fs::read_to_string(path).map_err(|e| {
            SortError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            SortError::Config(msg) => {
                SortError::Config(format!("{} ({})", msg, path.display()))
            }
            other => other,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, SortError> {
        toml::from_str(content)
            .map_err(|e| SortError::Config(format!("Invalid config file: {}", e)))
    }

    /// Built-in rules extended with the `[categories]` table
    pub fn category_rules(&self) -> CategoryRules {
        let mut rules = CategoryRules::default();
        for (category, extensions) in &self.categories {
            rules.extend(*category, extensions);
        }
        rules
    }
}
