use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Sort keys for a directory listing.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SortKey {
    /// Case-sensitive base name.
    #[default]
    Name,
    /// Dot-separated name segments, last segment first.
    Extension,
    /// File size in bytes.
    Size,
    /// Last modified time.
    Time,
    /// Length of the full path string.
    Length,
}

impl SortKey {
    /// All keys in cycling order.
    pub const ALL: [SortKey; 5] = [
        SortKey::Name,
        SortKey::Extension,
        SortKey::Size,
        SortKey::Time,
        SortKey::Length,
    ];

    /// Next key in cycling order (wraps around).
    pub fn next(self) -> Self {
        match self {
            SortKey::Name => SortKey::Extension,
            SortKey::Extension => SortKey::Size,
            SortKey::Size => SortKey::Time,
            SortKey::Time => SortKey::Length,
            SortKey::Length => SortKey::Name,
        }
    }

    /// Lowercase name used by `Display`/`FromStr`.
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::Extension => "extension",
            SortKey::Size => "size",
            SortKey::Time => "time",
            SortKey::Length => "length",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = ParseSortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(SortKey::Name),
            "extension" | "ext" => Ok(SortKey::Extension),
            "size" => Ok(SortKey::Size),
            "time" => Ok(SortKey::Time),
            "length" => Ok(SortKey::Length),
            _ => Err(ParseSortError(s.to_string())),
        }
    }
}

/// Sort direction.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

impl SortDirection {
    /// The opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Apply this direction to an ascending comparison result.
    pub fn apply(self, ord: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    }

    /// Lowercase name used by `Display`/`FromStr`.
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Ascending => "ascending",
            SortDirection::Descending => "descending",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = ParseSortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ascending" | "asc" => Ok(SortDirection::Ascending),
            "descending" | "desc" => Ok(SortDirection::Descending),
            _ => Err(ParseSortError(s.to_string())),
        }
    }
}

/// Active sort configuration of one listing view.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SortConfig {
    /// Key compared after the special-entry and type-bucket levels.
    pub key: SortKey,
    /// Direction applied to the type bucket and the key.
    pub direction: SortDirection,
}

impl SortConfig {
    /// Create a configuration from a key and a direction.
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Same key, opposite direction.
    pub fn reversed(self) -> Self {
        Self {
            key: self.key,
            direction: self.direction.reversed(),
        }
    }

    /// Classic column-header behavior: choosing the active key again flips the
    /// direction, choosing another key starts it ascending.
    pub fn toggle_key(self, key: SortKey) -> Self {
        if self.key == key {
            self.reversed()
        } else {
            Self::new(key, SortDirection::Ascending)
        }
    }
}

impl fmt::Display for SortConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.key, self.direction)
    }
}

/// Error returned when parsing a sort key or direction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown sort option: {0:?}")]
pub struct ParseSortError(pub String);

/// Errors returned by the commander core.
#[derive(Error, Debug)]
pub enum CommanderError {
    /// No archive rule matches, or packing was requested for an unpack-only format.
    #[error("unsupported archive format: {0}")]
    UnsupportedArchiveFormat(String),
    /// A configured regular expression failed to compile.
    #[error("invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        /// Pattern source text.
        pattern: String,
        /// Underlying regex error.
        #[source]
        source: regex::Error,
    },
    /// I/O error from the filesystem collaborator.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
