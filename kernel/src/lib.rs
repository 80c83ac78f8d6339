#![warn(clippy::unwrap_in_result)]
#![warn(clippy::unwrap_used)]

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub mod size;
mod wire;

pub use size::format_size;

/// Days a non permanent file survives before the storage service sweeps it.
pub const RETENTION_DAYS: i64 = 7;

/// Opaque, stable identifier of a stored file.
///
/// The storage service may encode it as a JSON string or a JSON number,
/// both are kept in their textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FileId(String);

impl FileId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for FileId {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        wire::text(d).map(FileId)
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FileId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Server side partition a file belongs to.
///
/// Anything the service reports outside the four known partitions maps to
/// `Other` and is presented like a document. The service's own name stays on
/// [`MediaFile::category_name`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Images,
    Videos,
    Audios,
    Documents,
    Other,
}

impl Category {
    /// Partitions a user can select, in display order.
    pub const SELECTABLE: [Category; 4] = [
        Category::Images,
        Category::Videos,
        Category::Audios,
        Category::Documents,
    ];

    /// Maps a wire name to a category. Never fails.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "images" => Category::Images,
            "videos" => Category::Videos,
            "audios" => Category::Audios,
            "documents" => Category::Documents,
            _ => Category::Other,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Images => "images",
            Category::Videos => "videos",
            Category::Audios => "audios",
            Category::Documents => "documents",
            Category::Other => "other",
        }
    }

    /// Short label used in tables in place of an icon.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Category::Images => "image",
            Category::Videos => "video",
            Category::Audios => "audio",
            Category::Documents | Category::Other => "document",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a category name outside the selectable set is parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "unknown category '{}', expected one of: all, images, videos, audios, documents",
            self.0
        )
    }
}

impl std::error::Error for UnknownCategory {}

/// Server side filter applied when listing files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    /// Value of the `category` query parameter, `None` means unfiltered.
    #[must_use]
    pub fn query_value(self) -> Option<&'static str> {
        match self {
            CategoryFilter::All => None,
            CategoryFilter::Only(c) => Some(c.as_str()),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(CategoryFilter::All);
        }
        match Category::from_name(s) {
            Category::Other => Err(UnknownCategory(s.to_owned())),
            c => Ok(CategoryFilter::Only(c)),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("all"),
            CategoryFilter::Only(c) => c.fmt(f),
        }
    }
}

/// One stored asset as reported by the storage service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaFile {
    pub id: FileId,
    /// Storage internal name
    pub filename: String,
    /// Name the user uploaded the file with
    pub original_name: String,
    #[serde(default)]
    pub mime_type: String,
    /// Category as named by the service, possibly outside the known set
    #[serde(rename = "category", deserialize_with = "wire::text")]
    pub category_name: String,
    #[serde(default)]
    pub file_size: u64,
    #[serde(default, deserialize_with = "wire::optional_text")]
    pub platform: Option<String>,
    #[serde(default, deserialize_with = "wire::optional_text")]
    pub chat_id: Option<String>,
    /// Set by the knowledge pipeline, read only on this side
    #[serde(default, deserialize_with = "wire::flag")]
    pub processed: bool,
    #[serde(default)]
    pub created_at: String,
    /// Exempt from the retention sweep. Absent, null and 0 all mean `false`.
    #[serde(default, deserialize_with = "wire::flag")]
    pub is_permanent: bool,
}

impl MediaFile {
    /// Subtype segment of the mime type, e.g. `png` for `image/png`.
    #[must_use]
    pub fn mime_subtype(&self) -> &str {
        match self.mime_type.split_once('/') {
            Some((_, subtype)) => subtype,
            None => &self.mime_type,
        }
    }

    /// Known partition of the file, `Other` for names outside the set.
    #[must_use]
    pub fn category(&self) -> Category {
        Category::from_name(&self.category_name)
    }

    #[must_use]
    pub fn created(&self) -> Option<DateTime<Utc>> {
        let raw = self.created_at.trim();
        if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
            return Some(t.with_timezone(&Utc));
        }
        ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map(|n| n.and_utc())
    }

    /// When the retention sweep becomes eligible to remove this file.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        if self.is_permanent {
            return None;
        }
        self.created()
            .map(|created| created + TimeDelta::days(RETENTION_DAYS))
    }
}

/// Count and total size of one category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStats {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub size: u64,
}

/// Aggregate usage snapshot computed by the storage service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileStats {
    #[serde(default)]
    pub total_files: u64,
    #[serde(default)]
    pub total_size: u64,
    #[serde(default)]
    pub by_category: BTreeMap<String, CategoryStats>,
}

impl FileStats {
    #[must_use]
    pub fn category(&self, category: Category) -> CategoryStats {
        self.by_category
            .get(category.as_str())
            .copied()
            .unwrap_or_default()
    }
}

/// Body of the retention toggle request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermanentRequest {
    pub is_permanent: bool,
}

/// Retention value the service actually applied.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PermanentResponse {
    #[serde(default, deserialize_with = "wire::flag")]
    pub is_permanent: bool,
}

/// Root directory the storage service keeps files in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoragePath {
    pub path: String,
}
