//! Extension-based file classification
//!
//! Maps a file's extension to one of the closed set of [`Category`] values.
//! Lookups are case-insensitive and anything unmatched lands in
//! [`Category::Other`].
//!
//! # Examples
//!
//! ```
//! use sortfiles::classify::{classify, CategoryRules};
//! use sortfiles::Category;
//!
//! let rules = CategoryRules::default();
//! assert_eq!(classify(Some("JPG"), &rules), Category::Image);
//! assert_eq!(classify(Some("mp3"), &rules), Category::Audio);
//! assert_eq!(classify(None, &rules), Category::Other);
//! ```

use crate::types::Category;
use std::collections::HashMap;
use std::path::Path;

const IMAGE: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "bmp", "tiff", "tif", "webp", "svg", "ico", "heic", "heif",
];
const VIDEO: &[&str] = &["mp4", "avi", "mov", "wmv", "flv", "mkv", "webm", "m4v", "3gp", "mpeg"];
const AUDIO: &[&str] = &["mp3", "wav", "ogg", "m4a", "aac", "flac", "wma", "opus"];
const DOCUMENT: &[&str] = &[
    "pdf", "txt", "doc", "docx", "odt", "rtf", "md", "html", "htm", "xls", "xlsx", "csv",
    "ppt", "pptx", "epub",
];
const ARCHIVE: &[&str] = &["zip", "rar", "7z", "tar", "gz", "bz2", "xz", "tgz", "zst"];
const CODE: &[&str] = &[
    "rs", "py", "js", "ts", "java", "c", "cpp", "h", "hpp", "go", "rb", "sh", "bash", "json",
    "toml", "yaml", "yml", "xml", "css",
];

/// Extension table used by the classifier.
///
/// Extensions are stored lower-case without a leading dot.
#[derive(Debug, Clone)]
pub struct CategoryRules {
    extension_map: HashMap<String, Category>,
}

impl CategoryRules {
    /// Rules with no mappings; every file classifies as `Other`
    pub fn empty() -> Self {
        Self {
            extension_map: HashMap::new(),
        }
    }

    /// Map an extension to a category, replacing any earlier mapping
    pub fn insert(&mut self, extension: &str, category: Category) {
        let key = normalize(extension);
        if !key.is_empty() {
            self.extension_map.insert(key, category);
        }
    }

    /// Map several extensions to one category
    pub fn extend<I, S>(&mut self, category: Category, extensions: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for ext in extensions {
            self.insert(ext.as_ref(), category);
        }
    }

    /// Category registered for an extension, if any
    pub fn lookup(&self, extension: &str) -> Option<Category> {
        self.extension_map.get(&normalize(extension)).copied()
    }

    /// Number of registered extensions
    pub fn len(&self) -> usize {
        self.extension_map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extension_map.is_empty()
    }
}

impl Default for CategoryRules {
    fn default() -> Self {
        let mut rules = Self::empty();
        rules.extend(Category::Image, IMAGE);
        rules.extend(Category::Video, VIDEO);
        rules.extend(Category::Audio, AUDIO);
        rules.extend(Category::Document, DOCUMENT);
        rules.extend(Category::Archive, ARCHIVE);
        rules.extend(Category::Code, CODE);
        rules
    }
}

fn normalize(extension: &str) -> String {
    extension.trim().trim_start_matches('.').to_ascii_lowercase()
}

/// Classify an extension against a rule table.
///
/// Pure and total: missing or unknown extensions yield `Category::Other`.
pub fn classify(extension: Option<&str>, rules: &CategoryRules) -> Category {
    extension
        .and_then(|ext| rules.lookup(ext))
        .unwrap_or(Category::Other)
}

/// Classifies paths using a fixed rule table
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    rules: CategoryRules,
}

impl Classifier {
    pub fn new(rules: CategoryRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &CategoryRules {
        &self.rules
    }

    /// Classify a path by its final extension
    pub fn classify_path(&self, path: &Path) -> Category {
        let extension = path.extension().and_then(|e| e.to_str());
        classify(extension, &self.rules)
    }
}
