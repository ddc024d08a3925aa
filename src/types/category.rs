//! Category - Closed set of destination buckets

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Broad file category a FileEntry is sorted into.
///
/// Serialized (config files, CLI, JSON events) by its lower-case singular
/// name; laid out on disk by [`Category::dir_name`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Photos and other raster/vector images
    Image,
    /// Video files
    Video,
    /// Audio files
    Audio,
    /// Documents and plain text
    Document,
    /// Compressed archives
    Archive,
    /// Source code and structured data
    Code,
    /// Anything no rule matched
    Other,
}

impl Category {
    /// Every category, in layout order.
    pub const ALL: [Category; 7] = [
        Category::Image,
        Category::Video,
        Category::Audio,
        Category::Document,
        Category::Archive,
        Category::Code,
        Category::Other,
    ];

    /// Directory name used under the destination root.
    ///
    /// ```
    /// use sortfiles::Category;
    ///
    /// assert_eq!(Category::Image.dir_name(), "images");
    /// assert_eq!(Category::Audio.dir_name(), "audio");
    /// assert_eq!(Category::Other.dir_name(), "other");
    /// ```
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Image => "images",
            Category::Video => "videos",
            Category::Audio => "audio",
            Category::Document => "documents",
            Category::Archive => "archives",
            Category::Code => "code",
            Category::Other => "other",
        }
    }

    /// Name used in configuration and events.
    pub fn name(&self) -> &'static str {
        match self {
            Category::Image => "image",
            Category::Video => "video",
            Category::Audio => "audio",
            Category::Document => "document",
            Category::Archive => "archive",
            Category::Code => "code",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.name() == wanted || c.dir_name() == wanted)
            .ok_or_else(|| format!("unknown category '{}'", s))
    }
}
